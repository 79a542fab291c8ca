use std::collections::{BTreeMap, BTreeSet};

use crate::error::PdfError;
use crate::objects::{ObjId, PdfObject};

/// Object ids reserved for one embedded TrueType font. Allocated when
/// the font is loaded; the objects are written at end of document once
/// the set of used glyphs is known.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FontObjIds {
    pub type0: ObjId,
    pub cid_font: ObjId,
    pub descriptor: ObjId,
    pub font_file: ObjId,
    pub to_unicode: ObjId,
}

/// A loaded TrueType font with the metrics needed to place and embed it.
pub struct TrueTypeFont {
    pub(crate) postscript_name: String,
    pub(crate) font_data: Vec<u8>,
    units_per_em: u16,
    ascent: i16,
    descent: i16,
    bbox: [i16; 4],
    cap_height: i16,
    italic_angle: f64,
    flags: u32,
    stem_v: i16,
    /// Unicode codepoint -> glyph ID
    cmap: BTreeMap<u32, u16>,
    /// Glyph ID -> advance width in font units
    glyph_widths: Vec<u16>,
    /// Glyph IDs placed so far; drives the /W array and ToUnicode map.
    used_glyphs: BTreeSet<u16>,
    glyph_to_unicode: BTreeMap<u16, u32>,
    /// PDF resource name (e.g. "F4")
    pub(crate) pdf_name: String,
}

impl TrueTypeFont {
    /// Parse a TrueType font from raw .ttf bytes.
    pub fn from_bytes(data: Vec<u8>, pdf_name: String) -> Result<Self, PdfError> {
        let face = ttf_parser::Face::parse(&data, 0)
            .map_err(|e| PdfError::FontParse(e.to_string()))?;

        let units_per_em = face.units_per_em();
        let ascent = face.ascender();
        let bbox = face.global_bounding_box();

        let mut cmap = BTreeMap::new();
        let mut glyph_to_unicode = BTreeMap::new();
        let subtables = face
            .tables()
            .cmap
            .ok_or_else(|| PdfError::FontParse("font has no cmap table".to_string()))?;
        for subtable in subtables.subtables {
            if !subtable.is_unicode() {
                continue;
            }
            subtable.codepoints(|cp| {
                if let Some(gid) = subtable.glyph_index(cp) {
                    cmap.insert(cp, gid.0);
                    glyph_to_unicode.entry(gid.0).or_insert(cp);
                }
            });
        }

        let glyph_widths = (0..face.number_of_glyphs())
            .map(|gid| face.glyph_hor_advance(ttf_parser::GlyphId(gid)).unwrap_or(0))
            .collect();

        let postscript_name = face
            .names()
            .into_iter()
            .find(|n| n.name_id == ttf_parser::name_id::POST_SCRIPT_NAME && n.is_unicode())
            .and_then(|n| n.to_string())
            .unwrap_or_else(|| pdf_name.clone());

        Ok(TrueTypeFont {
            postscript_name,
            units_per_em,
            ascent,
            descent: face.descender(),
            bbox: [bbox.x_min, bbox.y_min, bbox.x_max, bbox.y_max],
            cap_height: face.capital_height().unwrap_or(ascent),
            italic_angle: face.italic_angle() as f64,
            flags: descriptor_flags(&face),
            stem_v: estimate_stem_v(&face),
            cmap,
            glyph_widths,
            used_glyphs: BTreeSet::new(),
            glyph_to_unicode,
            pdf_name,
            font_data: data,
        })
    }

    /// Scale a font-unit value to PDF glyph space (1/1000 em).
    fn to_pdf_units(&self, value: i32) -> i64 {
        (value as i64 * 1000) / self.units_per_em as i64
    }

    fn glyph_width(&self, gid: u16) -> u16 {
        self.glyph_widths
            .get(gid as usize)
            .or_else(|| self.glyph_widths.first())
            .copied()
            .unwrap_or(0)
    }

    /// Measure text width in points.
    pub fn measure_text(&self, text: &str, font_size: f64) -> f64 {
        let total: i64 = text
            .chars()
            .map(|ch| {
                let gid = self.cmap.get(&(ch as u32)).copied().unwrap_or(0);
                self.to_pdf_units(self.glyph_width(gid) as i32)
            })
            .sum();
        total as f64 * font_size / 1000.0
    }

    /// Encode text as hex glyph IDs (`<0048006C>`), recording each glyph
    /// as used.
    pub fn encode_text_hex(&mut self, text: &str) -> String {
        let mut hex = String::with_capacity(text.len() * 4 + 2);
        hex.push('<');
        for ch in text.chars() {
            let gid = self.cmap.get(&(ch as u32)).copied().unwrap_or(0);
            self.used_glyphs.insert(gid);
            hex.push_str(&format!("{:04X}", gid));
        }
        hex.push('>');
        hex
    }

    /// `/W` array entries for the used glyphs, grouping consecutive ids:
    /// `[cid [w1 w2 ...] cid [w ...] ...]`.
    fn w_array(&self) -> Vec<PdfObject> {
        let glyphs: Vec<u16> = self.used_glyphs.iter().copied().collect();
        let mut result = Vec::new();
        let mut i = 0;
        while i < glyphs.len() {
            let start = glyphs[i];
            let mut widths = Vec::new();
            let mut j = i;
            while j < glyphs.len() && glyphs[j] as usize == start as usize + (j - i) {
                widths.push(PdfObject::Integer(
                    self.to_pdf_units(self.glyph_width(glyphs[j]) as i32),
                ));
                j += 1;
            }
            result.push(PdfObject::Integer(start as i64));
            result.push(PdfObject::Array(widths));
            i = j;
        }
        result
    }

    fn to_unicode_cmap(&self) -> Vec<u8> {
        let mut cmap = String::from(
            "/CIDInit /ProcSet findresource begin\n\
             12 dict begin\n\
             begincmap\n\
             /CIDSystemInfo << /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def\n\
             /CMapName /Adobe-Identity-UCS def\n\
             /CMapType 2 def\n\
             1 begincodespacerange\n<0000> <FFFF>\nendcodespacerange\n",
        );
        let mappings: Vec<(u16, u32)> = self
            .used_glyphs
            .iter()
            .filter_map(|gid| self.glyph_to_unicode.get(gid).map(|&cp| (*gid, cp)))
            .collect();
        // At most 100 entries per beginbfchar section.
        for chunk in mappings.chunks(100) {
            cmap.push_str(&format!("{} beginbfchar\n", chunk.len()));
            for &(gid, cp) in chunk {
                cmap.push_str(&format!("<{:04X}> <{:04X}>\n", gid, cp));
            }
            cmap.push_str("endbfchar\n");
        }
        cmap.push_str("endcmap\nCMapName currentdict /CMap defineresource pop\nend\nend\n");
        cmap.into_bytes()
    }

    /// Build the five objects embedding this font as a CID-keyed Type0
    /// font. `pack` turns raw stream bytes into `(data, extra dict entries)`
    /// so the caller decides on compression.
    pub(crate) fn pdf_objects(
        &self,
        ids: FontObjIds,
        pack: impl Fn(Vec<u8>) -> (Vec<u8>, Vec<(&'static str, PdfObject)>),
    ) -> Vec<(ObjId, PdfObject)> {
        let base_font = PdfObject::name(&self.postscript_name);

        let type0 = PdfObject::dict(vec![
            ("Type", PdfObject::name("Font")),
            ("Subtype", PdfObject::name("Type0")),
            ("BaseFont", base_font.clone()),
            ("Encoding", PdfObject::name("Identity-H")),
            ("DescendantFonts", PdfObject::array(vec![PdfObject::Reference(ids.cid_font)])),
            ("ToUnicode", PdfObject::Reference(ids.to_unicode)),
        ]);

        let cid_font = PdfObject::dict(vec![
            ("Type", PdfObject::name("Font")),
            ("Subtype", PdfObject::name("CIDFontType2")),
            ("BaseFont", base_font.clone()),
            (
                "CIDSystemInfo",
                PdfObject::dict(vec![
                    ("Registry", PdfObject::literal_string("Adobe")),
                    ("Ordering", PdfObject::literal_string("Identity")),
                    ("Supplement", PdfObject::Integer(0)),
                ]),
            ),
            ("FontDescriptor", PdfObject::Reference(ids.descriptor)),
            ("DW", PdfObject::Integer(self.to_pdf_units(self.glyph_width(0) as i32))),
            ("W", PdfObject::Array(self.w_array())),
            ("CIDToGIDMap", PdfObject::name("Identity")),
        ]);

        let descriptor = PdfObject::dict(vec![
            ("Type", PdfObject::name("FontDescriptor")),
            ("FontName", base_font),
            ("Flags", PdfObject::Integer(self.flags as i64)),
            (
                "FontBBox",
                PdfObject::int_array(&self.bbox.map(|v| self.to_pdf_units(v as i32))),
            ),
            ("ItalicAngle", PdfObject::Real(self.italic_angle)),
            ("Ascent", PdfObject::Integer(self.to_pdf_units(self.ascent as i32))),
            ("Descent", PdfObject::Integer(self.to_pdf_units(self.descent as i32))),
            ("CapHeight", PdfObject::Integer(self.to_pdf_units(self.cap_height as i32))),
            ("StemV", PdfObject::Integer(self.stem_v as i64)),
            ("FontFile2", PdfObject::Reference(ids.font_file)),
        ]);

        let (file_data, mut file_dict) = pack(self.font_data.clone());
        file_dict.push(("Length1", PdfObject::Integer(self.font_data.len() as i64)));
        let font_file = PdfObject::stream(file_dict, file_data);

        let (cmap_data, cmap_dict) = pack(self.to_unicode_cmap());
        let to_unicode = PdfObject::stream(cmap_dict, cmap_data);

        vec![
            (ids.type0, type0),
            (ids.cid_font, cid_font),
            (ids.descriptor, descriptor),
            (ids.font_file, font_file),
            (ids.to_unicode, to_unicode),
        ]
    }
}

/// PDF font descriptor flags: FixedPitch (1), Nonsymbolic (32), Italic (64).
fn descriptor_flags(face: &ttf_parser::Face) -> u32 {
    let mut flags = 32u32;
    if face.is_monospaced() {
        flags |= 1;
    }
    if face.is_italic() {
        flags |= 64;
    }
    flags
}

/// Rough StemV from the OS/2 weight class: 10 + 220 * (weight/1000)^2.
fn estimate_stem_v(face: &ttf_parser::Face) -> i16 {
    let w = face.weight().to_number() as f64 / 1000.0;
    (10.0 + 220.0 * w * w) as i16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_bytes_are_rejected() {
        let err = TrueTypeFont::from_bytes(vec![0u8; 16], "F4".to_string())
            .err()
            .expect("parse should fail");
        assert!(matches!(err, PdfError::FontParse(_)));
    }
}
