use tradebill_pdf::{FontRef, PdfDocument, TextStyle};

const DEJAVU_SANS: &[u8] = include_bytes!("fixtures/DejaVuSans.ttf");

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

fn render_with_font(text: &str, compress: bool) -> Vec<u8> {
    let mut doc = PdfDocument::new(Vec::<u8>::new()).unwrap();
    doc.set_compression(compress);
    let font = doc.load_font_bytes(DEJAVU_SANS.to_vec()).unwrap();
    doc.begin_page(595.0, 842.0).unwrap();
    doc.place_text_styled(text, 56.0, 700.0, &TextStyle { font, font_size: 11.0 });
    doc.end_page().unwrap();
    doc.end_document().unwrap()
}

#[test]
fn loads_as_truetype_ref() {
    let mut doc = PdfDocument::new(Vec::<u8>::new()).unwrap();
    let font = doc.load_font_bytes(DEJAVU_SANS.to_vec()).unwrap();
    assert!(matches!(font, FontRef::TrueType(_)));
}

#[test]
fn embeds_cid_keyed_font() {
    let bytes = render_with_font("Amount Due", false);
    assert!(contains(&bytes, b"/Subtype /Type0 /BaseFont /DejaVuSans /Encoding /Identity-H"));
    assert!(contains(&bytes, b"/Subtype /CIDFontType2"));
    assert!(contains(&bytes, b"/CIDToGIDMap /Identity"));
    assert!(contains(&bytes, format!("/Length1 {}", DEJAVU_SANS.len()).as_bytes()));
    // First TrueType font follows the three builtin faces.
    assert!(contains(&bytes, b"/F4 "));
    assert!(contains(&bytes, b"BT\n/F4 11 Tf\n56 700 Td\n<"));
}

#[test]
fn text_is_written_as_glyph_ids() {
    let bytes = render_with_font("Total", false);
    assert!(!contains(&bytes, b"(Total) Tj"));
    assert!(contains(&bytes, b"> Tj\nET\n"));
}

#[test]
fn to_unicode_maps_pound_sign() {
    let bytes = render_with_font("£5", false);
    assert!(contains(&bytes, b"beginbfchar"));
    assert!(contains(&bytes, b"<00A3>\n"));
    assert!(contains(&bytes, b"<0035>\n"));
}

#[test]
fn width_array_lists_only_used_glyphs() {
    let few = render_with_font("a", false);
    let many = render_with_font("The quick brown fox", false);
    assert!(contains(&few, b"/W ["));
    assert!(many.len() > few.len());
}

#[test]
fn measurement_scales_with_size() {
    let mut doc = PdfDocument::new(Vec::<u8>::new()).unwrap();
    let font = doc.load_font_bytes(DEJAVU_SANS.to_vec()).unwrap();
    let small = doc.measure_text("Subtotal", &TextStyle { font, font_size: 10.0 });
    let large = doc.measure_text("Subtotal", &TextStyle { font, font_size: 20.0 });
    assert!(small > 0.0);
    assert!((large - 2.0 * small).abs() < 1e-9);
}

#[test]
fn compressed_font_file_keeps_length1() {
    let bytes = render_with_font("Invoice", true);
    assert!(contains(&bytes, b"/Filter /FlateDecode"));
    assert!(contains(&bytes, format!("/Length1 {}", DEJAVU_SANS.len()).as_bytes()));
    assert!(bytes.len() < DEJAVU_SANS.len());
}
