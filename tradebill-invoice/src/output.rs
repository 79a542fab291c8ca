//! Render an invoice to bytes or to `<out_dir>/<invoice_id>.pdf`.
//!
//! Each call owns its document copy, cursor and PDF writer; only the
//! configuration is shared, read-only. Concurrent calls for distinct
//! invoice ids never touch the same file.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};
use tradebill_pdf::images::detect_format;
use tradebill_pdf::truetype::TrueTypeFont;
use tradebill_pdf::PdfError;

use crate::config::InvoiceConfig;
use crate::error::{InvoiceError, InvoiceResult};
use crate::layout::{lay_out_with_metrics, TextMetrics};
use crate::model::InvoiceDocument;
use crate::render::{render_pdf, Asset, RenderAssets};

/// A finished PDF held in memory.
#[derive(Debug, Clone)]
pub struct RenderedInvoice {
    pub bytes: Vec<u8>,
    pub page_count: usize,
}

/// Validate, recompute totals, lay out and render `doc`.
pub fn render_invoice(doc: &InvoiceDocument, config: &InvoiceConfig) -> InvoiceResult<RenderedInvoice> {
    config.validate()?;
    doc.validate()?;

    let mut doc = doc.clone();
    doc.recompute_totals()?;

    let assets = load_assets(&doc, config)?;
    let metrics = TextMetrics::with_fonts(
        parse_font(assets.regular_font.as_ref())?,
        parse_font(assets.bold_font.as_ref())?,
    );
    let options = config.layout_options(assets.logo.is_some());
    let laid_out = lay_out_with_metrics(&doc, &config.geometry, &options, &metrics);
    let page_count = laid_out.page_count();
    let bytes = render_pdf(&doc, &laid_out, &config.geometry, assets, config.compress, Vec::new())?;

    Ok(RenderedInvoice { bytes, page_count })
}

/// Render `doc` and write it to `<out_dir>/<invoice_id>.pdf`, creating
/// the directory if needed. Returns the written path.
pub fn generate_invoice_pdf<P: AsRef<Path>>(
    doc: &InvoiceDocument,
    out_dir: P,
    config: &InvoiceConfig,
) -> InvoiceResult<PathBuf> {
    let rendered = render_invoice(doc, config)?;

    let out_dir = out_dir.as_ref();
    fs::create_dir_all(out_dir).map_err(|source| InvoiceError::CreateDir {
        path: out_dir.to_path_buf(),
        source,
    })?;

    let path = out_dir.join(format!("{}.pdf", doc.invoice_id.trim()));
    fs::write(&path, &rendered.bytes).map_err(|source| InvoiceError::Write {
        path: path.clone(),
        source,
    })?;

    info!(
        invoice_id = %doc.invoice_id,
        path = %path.display(),
        pages = rendered.page_count,
        bytes = rendered.bytes.len(),
        "invoice written"
    );
    Ok(path)
}

fn load_assets(doc: &InvoiceDocument, config: &InvoiceConfig) -> InvoiceResult<RenderAssets> {
    let branding = &config.branding;
    let logo = doc
        .business
        .logo
        .as_deref()
        .or(branding.logo.as_deref())
        .and_then(load_logo);

    Ok(RenderAssets {
        logo,
        regular_font: load_font(branding.regular_font.as_deref())?,
        bold_font: load_font(branding.bold_font.as_deref())?,
    })
}

/// A logo is optional: anything unusable is logged and dropped.
fn load_logo(path: &Path) -> Option<Asset> {
    let data = match fs::read(path) {
        Ok(data) => data,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "logo not readable, omitting it");
            return None;
        }
    };
    if let Err(err) = detect_format(&data) {
        warn!(path = %path.display(), error = %err, "logo format not supported, omitting it");
        return None;
    }
    Some(Asset {
        path: path.to_path_buf(),
        data,
    })
}

fn load_font(path: Option<&Path>) -> InvoiceResult<Option<Asset>> {
    let Some(path) = path else {
        return Ok(None);
    };
    let data = fs::read(path).map_err(|err| InvoiceError::Asset {
        path: path.to_path_buf(),
        source: PdfError::Io(err),
    })?;
    Ok(Some(Asset {
        path: path.to_path_buf(),
        data,
    }))
}

/// Parse a configured font for layout measurement.
fn parse_font(asset: Option<&Asset>) -> InvoiceResult<Option<TrueTypeFont>> {
    let Some(asset) = asset else {
        return Ok(None);
    };
    TrueTypeFont::from_bytes(asset.data.clone(), String::new())
        .map(Some)
        .map_err(|source| InvoiceError::Asset {
            path: asset.path.clone(),
            source,
        })
}
