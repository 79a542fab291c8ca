/// Object identifier: (object_number, generation_number).
/// Generation is always 0 for documents we write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjId(pub u32, pub u16);

impl ObjId {
    pub fn new(num: u32) -> Self {
        ObjId(num, 0)
    }
}

/// The subset of PDF 32000-1:2008 §7.3 object types an invoice needs.
#[derive(Debug, Clone)]
pub enum PdfObject {
    Integer(i64),
    Real(f64),
    /// PDF name object (stored without the leading `/`).
    Name(String),
    /// PDF literal string (stored without the enclosing parens).
    LiteralString(String),
    Array(Vec<PdfObject>),
    /// Key-value pairs. Uses Vec for deterministic output order.
    Dictionary(Vec<(String, PdfObject)>),
    Stream {
        dict: Vec<(String, PdfObject)>,
        data: Vec<u8>,
    },
    Reference(ObjId),
}

impl PdfObject {
    pub fn name(s: &str) -> Self {
        PdfObject::Name(s.to_string())
    }

    pub fn literal_string(s: &str) -> Self {
        PdfObject::LiteralString(s.to_string())
    }

    pub fn array(items: Vec<PdfObject>) -> Self {
        PdfObject::Array(items)
    }

    /// Build an array of integers, e.g. a font bounding box.
    pub fn int_array(values: &[i64]) -> Self {
        PdfObject::Array(values.iter().map(|&v| PdfObject::Integer(v)).collect())
    }

    pub fn dict(entries: Vec<(&str, PdfObject)>) -> Self {
        PdfObject::Dictionary(owned_entries(entries))
    }

    pub fn stream(dict_entries: Vec<(&str, PdfObject)>, data: Vec<u8>) -> Self {
        PdfObject::Stream {
            dict: owned_entries(dict_entries),
            data,
        }
    }

    /// A `/Font`-style resource sub-dictionary mapping resource names
    /// (`F1`, `Im1`, ...) to object references.
    pub fn resource_map<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, ObjId)>,
    {
        PdfObject::Dictionary(
            entries
                .into_iter()
                .map(|(k, id)| (k.to_string(), PdfObject::Reference(id)))
                .collect(),
        )
    }
}

fn owned_entries(entries: Vec<(&str, PdfObject)>) -> Vec<(String, PdfObject)> {
    entries
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dict_keeps_insertion_order() {
        let obj = PdfObject::dict(vec![
            ("Type", PdfObject::name("Catalog")),
            ("Pages", PdfObject::Reference(ObjId::new(2))),
        ]);
        match obj {
            PdfObject::Dictionary(entries) => {
                assert_eq!(entries[0].0, "Type");
                assert_eq!(entries[1].0, "Pages");
            }
            _ => panic!("expected Dictionary"),
        }
    }

    #[test]
    fn resource_map_holds_references() {
        let obj = PdfObject::resource_map([("F1", ObjId::new(3)), ("F2", ObjId::new(4))]);
        match obj {
            PdfObject::Dictionary(entries) => {
                assert_eq!(entries.len(), 2);
                assert!(matches!(entries[1].1, PdfObject::Reference(ObjId(4, 0))));
            }
            _ => panic!("expected Dictionary"),
        }
    }

    #[test]
    fn int_array_converts_values() {
        match PdfObject::int_array(&[-10, 0, 1000]) {
            PdfObject::Array(items) => assert_eq!(items.len(), 3),
            _ => panic!("expected Array"),
        }
    }
}
