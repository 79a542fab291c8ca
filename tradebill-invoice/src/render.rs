//! Drives `tradebill-pdf` with laid-out pages.

use std::io::Write;
use std::path::PathBuf;

use tracing::warn;
use tradebill_pdf::{BuiltinFont, FontRef, ImageAnchor, ImageId, PdfDocument, TextStyle};

use crate::error::{InvoiceError, InvoiceResult};
use crate::geometry::Geometry;
use crate::layout::{Align, DrawOp, Face, LaidOutInvoice, TextOp};
use crate::model::InvoiceDocument;

/// File contents read by the caller, tagged with where they came from.
#[derive(Debug, Clone)]
pub struct Asset {
    pub path: PathBuf,
    pub data: Vec<u8>,
}

/// Optional binary inputs for one render.
#[derive(Debug, Clone, Default)]
pub struct RenderAssets {
    pub logo: Option<Asset>,
    pub regular_font: Option<Asset>,
    pub bold_font: Option<Asset>,
}

/// Font for each typeface role.
struct Fonts {
    regular: FontRef,
    bold: FontRef,
    italic: FontRef,
}

impl Fonts {
    fn load<W: Write>(pdf: &mut PdfDocument<W>, assets: &mut RenderAssets) -> InvoiceResult<Self> {
        let regular = match assets.regular_font.take() {
            Some(asset) => embed_font(pdf, asset)?,
            None => FontRef::Builtin(BuiltinFont::Helvetica),
        };
        let bold = match assets.bold_font.take() {
            Some(asset) => embed_font(pdf, asset)?,
            None => FontRef::Builtin(BuiltinFont::HelveticaBold),
        };
        Ok(Fonts {
            regular,
            bold,
            italic: FontRef::Builtin(BuiltinFont::HelveticaOblique),
        })
    }

    fn style(&self, face: Face, size: f64) -> TextStyle {
        let font = match face {
            Face::Regular => self.regular,
            Face::Bold => self.bold,
            Face::Italic => self.italic,
        };
        TextStyle { font, font_size: size }
    }
}

fn embed_font<W: Write>(pdf: &mut PdfDocument<W>, asset: Asset) -> InvoiceResult<FontRef> {
    pdf.load_font_bytes(asset.data)
        .map_err(|source| InvoiceError::Asset { path: asset.path, source })
}

/// Render `laid_out` as a complete PDF into `writer`.
///
/// A logo that fails to decode is skipped with a warning; an embedded
/// font that fails to parse is an [`InvoiceError::Asset`].
pub fn render_pdf<W: Write>(
    doc: &InvoiceDocument,
    laid_out: &LaidOutInvoice,
    geometry: &Geometry,
    mut assets: RenderAssets,
    compress: bool,
    writer: W,
) -> InvoiceResult<W> {
    let mut pdf = PdfDocument::new(writer)?;
    pdf.set_compression(compress);
    pdf.set_info("Title", &format!("Invoice {}", doc.invoice_number.trim()));
    let creator = doc.business.name.trim();
    if !creator.is_empty() {
        pdf.set_info("Creator", creator);
    }

    let fonts = Fonts::load(&mut pdf, &mut assets)?;
    let logo = assets.logo.and_then(|asset| match pdf.load_image_bytes(asset.data) {
        Ok(id) => Some(id),
        Err(err) => {
            warn!(path = %asset.path.display(), error = %err, "logo could not be decoded, omitting it");
            None
        }
    });

    for page in &laid_out.pages {
        pdf.begin_page(geometry.page_width, geometry.page_height)?;
        for op in &page.ops {
            draw(&mut pdf, op, &fonts, logo.as_ref(), geometry.page_height);
        }
        pdf.end_page()?;
    }
    Ok(pdf.end_document()?)
}

fn draw<W: Write>(pdf: &mut PdfDocument<W>, op: &DrawOp, fonts: &Fonts, logo: Option<&ImageId>, page_height: f64) {
    match op {
        DrawOp::Text(text) => draw_text(pdf, text, fonts, page_height),
        DrawOp::FillRect { rect, color } => {
            let (x, y) = rect.to_pdf_origin(page_height);
            pdf.save_state()
                .set_fill_color(*color)
                .rect(x, y, rect.width, rect.height)
                .fill()
                .restore_state();
        }
        DrawOp::Line { x1, y1, x2, y2, width, color } => {
            pdf.save_state()
                .set_stroke_color(*color)
                .set_line_width(*width)
                .move_to(*x1, page_height - y1)
                .line_to(*x2, page_height - y2)
                .stroke()
                .restore_state();
        }
        DrawOp::Logo { rect } => {
            if let Some(image) = logo {
                pdf.place_image(image, rect, ImageAnchor::TopRight);
            }
        }
    }
}

fn draw_text<W: Write>(pdf: &mut PdfDocument<W>, text: &TextOp, fonts: &Fonts, page_height: f64) {
    let style = fonts.style(text.face, text.size);
    let x = match text.align {
        Align::Left => text.x,
        Align::Right => text.x - pdf.measure_text(&text.text, &style),
        Align::Center => text.x - pdf.measure_text(&text.text, &style) / 2.0,
    };
    pdf.save_state()
        .set_fill_color(text.color)
        .place_text_styled(&text.text, x, page_height - text.baseline, &style)
        .restore_state();
}
