use std::io::{self, Write};

use flate2::write::ZlibEncoder;
use flate2::Compression;

use crate::error::PdfError;
use crate::fonts::{encode_win_ansi, BuiltinFont, FontMetrics, FontRef, TextStyle, TrueTypeFontId};
use crate::graphics::{Color, Rect};
use crate::images::{self, ImageAnchor, ImageFormat, ImageId};
use crate::objects::{ObjId, PdfObject};
use crate::truetype::{FontObjIds, TrueTypeFont};
use crate::writer::{escape_pdf_bytes, PdfWriter};

const CATALOG_OBJ: ObjId = ObjId(1, 0);
const PAGES_OBJ: ObjId = ObjId(2, 0);
const FIRST_BUILTIN_FONT_OBJ: u32 = 3;
const FIRST_FREE_OBJ_NUM: u32 = FIRST_BUILTIN_FONT_OBJ + BuiltinFont::ALL.len() as u32;

/// High-level API for building PDF documents.
///
/// Generic over `Write` so it works with in-memory buffers (`Vec<u8>`),
/// buffered files, or any other writer.
///
/// Pages are written incrementally: `end_page()` flushes page data
/// to the writer and frees page content from memory. Images are
/// written as soon as they are loaded; embedded TrueType fonts are
/// written by `end_document()` once every used glyph is known.
pub struct PdfDocument<W: Write> {
    writer: PdfWriter<W>,
    info: Vec<(String, String)>,
    page_obj_ids: Vec<ObjId>,
    current_page: Option<PageBuilder>,
    next_obj_num: u32,
    compress: bool,
    images: Vec<LoadedImage>,
    tt_fonts: Vec<(TrueTypeFont, FontObjIds)>,
}

struct PageBuilder {
    width: f64,
    height: f64,
    content_ops: Vec<u8>,
}

struct LoadedImage {
    obj_id: ObjId,
    pdf_name: String,
    width: u32,
    height: u32,
}

impl<W: Write> PdfDocument<W> {
    /// Create a new PDF document that writes to the given writer.
    /// Writes the PDF header and the shared Helvetica font objects
    /// immediately.
    pub fn new(writer: W) -> io::Result<Self> {
        let mut pdf_writer = PdfWriter::new(writer);
        pdf_writer.write_header()?;

        for (i, font) in BuiltinFont::ALL.iter().enumerate() {
            let font_obj = PdfObject::dict(vec![
                ("Type", PdfObject::name("Font")),
                ("Subtype", PdfObject::name("Type1")),
                ("BaseFont", PdfObject::name(font.pdf_base_name())),
                ("Encoding", PdfObject::name("WinAnsiEncoding")),
            ]);
            pdf_writer.write_object(ObjId::new(FIRST_BUILTIN_FONT_OBJ + i as u32), &font_obj)?;
        }

        Ok(PdfDocument {
            writer: pdf_writer,
            info: Vec::new(),
            page_obj_ids: Vec::new(),
            current_page: None,
            next_obj_num: FIRST_FREE_OBJ_NUM,
            compress: false,
            images: Vec::new(),
            tt_fonts: Vec::new(),
        })
    }

    /// Set a document info entry (e.g. "Creator", "Title").
    pub fn set_info(&mut self, key: &str, value: &str) -> &mut Self {
        self.info.push((key.to_string(), value.to_string()));
        self
    }

    /// Enable FlateDecode compression for streams written from now on.
    pub fn set_compression(&mut self, compress: bool) -> &mut Self {
        self.compress = compress;
        self
    }

    /// Number of pages completed so far.
    pub fn page_count(&self) -> usize {
        self.page_obj_ids.len()
    }

    fn alloc_obj_id(&mut self) -> ObjId {
        let id = ObjId::new(self.next_obj_num);
        self.next_obj_num += 1;
        id
    }

    fn page(&mut self) -> &mut PageBuilder {
        self.current_page
            .as_mut()
            .expect("drawing operation called with no open page")
    }

    fn push_ops(&mut self, ops: &str) -> &mut Self {
        self.page().content_ops.extend_from_slice(ops.as_bytes());
        self
    }

    /// Turn raw stream bytes into stored bytes plus the dictionary
    /// entries describing their encoding.
    fn pack_stream(&self, data: Vec<u8>) -> (Vec<u8>, Vec<(&'static str, PdfObject)>) {
        pack(self.compress, data)
    }

    /// Begin a new page with the given dimensions in points.
    /// If a page is currently open, it is closed first.
    pub fn begin_page(&mut self, width: f64, height: f64) -> io::Result<&mut Self> {
        if self.current_page.is_some() {
            self.end_page()?;
        }
        self.current_page = Some(PageBuilder {
            width,
            height,
            content_ops: Vec::new(),
        });
        Ok(self)
    }

    // -------------------------------------------------------
    // Graphics state and paths
    // -------------------------------------------------------

    pub fn save_state(&mut self) -> &mut Self {
        self.push_ops("q\n")
    }

    pub fn restore_state(&mut self) -> &mut Self {
        self.push_ops("Q\n")
    }

    pub fn set_fill_color(&mut self, c: Color) -> &mut Self {
        let ops = format!(
            "{} {} {} rg\n",
            format_coord(c.r),
            format_coord(c.g),
            format_coord(c.b)
        );
        self.push_ops(&ops)
    }

    pub fn set_stroke_color(&mut self, c: Color) -> &mut Self {
        let ops = format!(
            "{} {} {} RG\n",
            format_coord(c.r),
            format_coord(c.g),
            format_coord(c.b)
        );
        self.push_ops(&ops)
    }

    pub fn set_line_width(&mut self, width: f64) -> &mut Self {
        let ops = format!("{} w\n", format_coord(width));
        self.push_ops(&ops)
    }

    pub fn move_to(&mut self, x: f64, y: f64) -> &mut Self {
        let ops = format!("{} {} m\n", format_coord(x), format_coord(y));
        self.push_ops(&ops)
    }

    pub fn line_to(&mut self, x: f64, y: f64) -> &mut Self {
        let ops = format!("{} {} l\n", format_coord(x), format_coord(y));
        self.push_ops(&ops)
    }

    /// Append a rectangle path; (x, y) is the lower-left corner.
    pub fn rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> &mut Self {
        let ops = format!(
            "{} {} {} {} re\n",
            format_coord(x),
            format_coord(y),
            format_coord(width),
            format_coord(height)
        );
        self.push_ops(&ops)
    }

    pub fn fill(&mut self) -> &mut Self {
        self.push_ops("f\n")
    }

    pub fn stroke(&mut self) -> &mut Self {
        self.push_ops("S\n")
    }

    // -------------------------------------------------------
    // Text
    // -------------------------------------------------------

    /// Place text at position (x, y) using default 12pt Helvetica.
    /// Coordinates use PDF's default bottom-left origin.
    pub fn place_text(&mut self, text: &str, x: f64, y: f64) -> &mut Self {
        self.place_text_styled(text, x, y, &TextStyle::default())
    }

    /// Place text with its baseline starting at (x, y).
    pub fn place_text_styled(&mut self, text: &str, x: f64, y: f64, style: &TextStyle) -> &mut Self {
        let (font_name, encoded) = match style.font {
            FontRef::Builtin(font) => {
                let mut literal = b"(".to_vec();
                literal.extend(escape_pdf_bytes(&encode_win_ansi(text)));
                literal.push(b')');
                (font.pdf_name().to_string(), literal)
            }
            FontRef::TrueType(TrueTypeFontId(idx)) => {
                let (font, _) = &mut self.tt_fonts[idx];
                (font.pdf_name.clone(), font.encode_text_hex(text).into_bytes())
            }
        };

        let page = self.page();
        page.content_ops.extend_from_slice(
            format!(
                "BT\n/{} {} Tf\n{} {} Td\n",
                font_name,
                format_coord(style.font_size),
                format_coord(x),
                format_coord(y),
            )
            .as_bytes(),
        );
        page.content_ops.extend_from_slice(&encoded);
        page.content_ops.extend_from_slice(b" Tj\nET\n");
        self
    }

    /// Width of `text` in points when set in `style`.
    pub fn measure_text(&self, text: &str, style: &TextStyle) -> f64 {
        match style.font {
            FontRef::Builtin(font) => FontMetrics::measure_text(text, font, style.font_size),
            FontRef::TrueType(TrueTypeFontId(idx)) => {
                self.tt_fonts[idx].0.measure_text(text, style.font_size)
            }
        }
    }

    // -------------------------------------------------------
    // Fonts
    // -------------------------------------------------------

    /// Load a TrueType font from raw bytes for embedding.
    pub fn load_font_bytes(&mut self, data: Vec<u8>) -> Result<FontRef, PdfError> {
        let pdf_name = format!("F{}", BuiltinFont::ALL.len() + self.tt_fonts.len() + 1);
        let font = TrueTypeFont::from_bytes(data, pdf_name)?;
        let ids = FontObjIds {
            type0: self.alloc_obj_id(),
            cid_font: self.alloc_obj_id(),
            descriptor: self.alloc_obj_id(),
            font_file: self.alloc_obj_id(),
            to_unicode: self.alloc_obj_id(),
        };
        self.tt_fonts.push((font, ids));
        Ok(FontRef::TrueType(TrueTypeFontId(self.tt_fonts.len() - 1)))
    }

    // -------------------------------------------------------
    // Images
    // -------------------------------------------------------

    /// Decode a JPEG or PNG and write it as an image XObject.
    pub fn load_image_bytes(&mut self, data: Vec<u8>) -> Result<ImageId, PdfError> {
        let image = images::load_image(data)?;
        let (width, height) = (image.width, image.height);

        let smask_id = match &image.smask_data {
            Some(alpha) => {
                let id = self.alloc_obj_id();
                let (bytes, filter) = self.pack_stream(alpha.clone());
                let mut dict = image_dict(width, height, "DeviceGray");
                dict.extend(filter);
                self.writer.write_object(id, &PdfObject::stream(dict, bytes))?;
                Some(id)
            }
            None => None,
        };

        let obj_id = self.alloc_obj_id();
        let mut dict = image_dict(width, height, image.color_space.pdf_name());
        if let Some(id) = smask_id {
            dict.push(("SMask", PdfObject::Reference(id)));
        }
        let bytes = match image.format {
            ImageFormat::Jpeg => {
                dict.push(("Filter", PdfObject::name("DCTDecode")));
                image.data
            }
            ImageFormat::Png => {
                let (bytes, filter) = self.pack_stream(image.data);
                dict.extend(filter);
                bytes
            }
        };
        self.writer.write_object(obj_id, &PdfObject::stream(dict, bytes))?;

        self.images.push(LoadedImage {
            obj_id,
            pdf_name: format!("Im{}", self.images.len() + 1),
            width,
            height,
        });
        Ok(ImageId(self.images.len() - 1))
    }

    /// Draw a loaded image scaled to fit `rect` (upper-left origin).
    pub fn place_image(&mut self, image: &ImageId, rect: &Rect, anchor: ImageAnchor) -> &mut Self {
        let page_height = self.page().height;
        let img = &self.images[image.0];
        let p = images::calculate_placement(img.width, img.height, rect, anchor, page_height);
        let ops = format!(
            "q\n{} 0 0 {} {} {} cm\n/{} Do\nQ\n",
            format_coord(p.width),
            format_coord(p.height),
            format_coord(p.x),
            format_coord(p.y),
            img.pdf_name,
        );
        self.push_ops(&ops)
    }

    // -------------------------------------------------------
    // Page and document completion
    // -------------------------------------------------------

    fn page_resources(&self) -> PdfObject {
        let mut fonts: Vec<(&str, ObjId)> = BuiltinFont::ALL
            .iter()
            .enumerate()
            .map(|(i, f)| (f.pdf_name(), ObjId::new(FIRST_BUILTIN_FONT_OBJ + i as u32)))
            .collect();
        fonts.extend(
            self.tt_fonts
                .iter()
                .map(|(font, ids)| (font.pdf_name.as_str(), ids.type0)),
        );
        let mut entries = vec![("Font", PdfObject::resource_map(fonts))];
        if !self.images.is_empty() {
            entries.push((
                "XObject",
                PdfObject::resource_map(
                    self.images.iter().map(|img| (img.pdf_name.as_str(), img.obj_id)),
                ),
            ));
        }
        PdfObject::dict(entries)
    }

    /// End the current page. Writes page objects to the
    /// writer and frees page content from memory.
    pub fn end_page(&mut self) -> io::Result<()> {
        let page = self
            .current_page
            .take()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "end_page called with no open page"))?;

        let content_id = self.alloc_obj_id();
        let page_id = self.alloc_obj_id();

        let (data, dict) = self.pack_stream(page.content_ops);
        self.writer
            .write_object(content_id, &PdfObject::stream(dict, data))?;

        let page_dict = PdfObject::dict(vec![
            ("Type", PdfObject::name("Page")),
            ("Parent", PdfObject::Reference(PAGES_OBJ)),
            (
                "MediaBox",
                PdfObject::array(vec![
                    PdfObject::Integer(0),
                    PdfObject::Integer(0),
                    PdfObject::Real(page.width),
                    PdfObject::Real(page.height),
                ]),
            ),
            ("Contents", PdfObject::Reference(content_id)),
            ("Resources", self.page_resources()),
        ]);
        self.writer.write_object(page_id, &page_dict)?;

        self.page_obj_ids.push(page_id);
        Ok(())
    }

    /// Finish the document. Writes embedded fonts, the info dictionary,
    /// pages tree, catalog, xref table, and trailer.
    /// Consumes self; no further operations are possible.
    pub fn end_document(mut self) -> io::Result<W> {
        if self.current_page.is_some() {
            self.end_page()?;
        }

        let compress = self.compress;
        for (font, ids) in &self.tt_fonts {
            for (id, obj) in font.pdf_objects(*ids, |data| pack(compress, data)) {
                self.writer.write_object(id, &obj)?;
            }
        }

        let info_id = if self.info.is_empty() {
            None
        } else {
            let id = self.alloc_obj_id();
            let entries = self
                .info
                .iter()
                .map(|(k, v)| (k.as_str(), PdfObject::literal_string(v)))
                .collect();
            self.writer.write_object(id, &PdfObject::dict(entries))?;
            Some(id)
        };

        let kids = self
            .page_obj_ids
            .iter()
            .map(|id| PdfObject::Reference(*id))
            .collect();
        let pages = PdfObject::dict(vec![
            ("Type", PdfObject::name("Pages")),
            ("Kids", PdfObject::Array(kids)),
            ("Count", PdfObject::Integer(self.page_obj_ids.len() as i64)),
        ]);
        self.writer.write_object(PAGES_OBJ, &pages)?;

        let catalog = PdfObject::dict(vec![
            ("Type", PdfObject::name("Catalog")),
            ("Pages", PdfObject::Reference(PAGES_OBJ)),
        ]);
        self.writer.write_object(CATALOG_OBJ, &catalog)?;

        self.writer.write_xref_and_trailer(CATALOG_OBJ, info_id)?;
        Ok(self.writer.into_inner())
    }
}

fn image_dict(width: u32, height: u32, color_space: &str) -> Vec<(&'static str, PdfObject)> {
    vec![
        ("Type", PdfObject::name("XObject")),
        ("Subtype", PdfObject::name("Image")),
        ("Width", PdfObject::Integer(width as i64)),
        ("Height", PdfObject::Integer(height as i64)),
        ("ColorSpace", PdfObject::name(color_space)),
        ("BitsPerComponent", PdfObject::Integer(8)),
    ]
}

/// Deflate `data` when compression is on. Falls back to storing the
/// bytes raw if the encoder fails.
fn pack(compress: bool, data: Vec<u8>) -> (Vec<u8>, Vec<(&'static str, PdfObject)>) {
    if !compress {
        return (data, Vec::new());
    }
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    match encoder.write_all(&data).and_then(|_| encoder.finish()) {
        Ok(compressed) => (compressed, vec![("Filter", PdfObject::name("FlateDecode"))]),
        Err(_) => (data, Vec::new()),
    }
}

/// Format a coordinate value for PDF content streams.
pub(crate) fn format_coord(v: f64) -> String {
    if v == v.floor() && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        let s = format!("{:.4}", v);
        let s = s.trim_end_matches('0');
        let s = s.trim_end_matches('.');
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_coord_drops_needless_decimals() {
        assert_eq!(format_coord(56.0), "56");
        assert_eq!(format_coord(12.5), "12.5");
        assert_eq!(format_coord(0.11764705), "0.1176");
        assert_eq!(format_coord(-3.0), "-3");
    }

    #[test]
    fn pack_is_identity_without_compression() {
        let (data, dict) = pack(false, b"BT ET".to_vec());
        assert_eq!(data, b"BT ET");
        assert!(dict.is_empty());
    }

    #[test]
    fn pack_deflates_with_compression() {
        let raw = b"0 0 0 rg\n".repeat(200);
        let (data, dict) = pack(true, raw.clone());
        assert!(data.len() < raw.len());
        assert_eq!(dict.len(), 1);
    }
}
