/// Render an invoice described in JSON.
///
/// The input is either a full `InvoiceDocument` or a bare
/// `CreateInvoiceRequest`, which is completed from the configured
/// defaults and dated today.
///
/// Run with:
///   cargo run --example render_json -p tradebill-demos -- \
///       demos/data/request.json [demos/data/config.json] [out_dir]
use std::env;
use std::fs;

use chrono::Local;
use tracing::info;
use tradebill_invoice::{generate_invoice_pdf, telemetry, CreateInvoiceRequest, InvoiceConfig, InvoiceDocument};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    telemetry::init();

    let mut args = env::args().skip(1);
    let input = args.next().ok_or("usage: render_json <invoice.json> [config.json] [out_dir]")?;
    let config = match args.next() {
        Some(path) => InvoiceConfig::from_json_file(path)?,
        None => InvoiceConfig::default(),
    };
    let out_dir = args.next().unwrap_or_else(|| "demos/output".to_string());

    let json = fs::read_to_string(&input)?;
    let doc = match serde_json::from_str::<InvoiceDocument>(&json) {
        Ok(doc) => doc,
        Err(_) => {
            let request: CreateInvoiceRequest = serde_json::from_str(&json)?;
            info!(input = %input, "completing request from configured defaults");
            request.into_document(&config.branding.defaults, Local::now().date_naive())?
        }
    };

    let path = generate_invoice_pdf(&doc, out_dir, &config)?;
    println!("Written: {}", path.display());
    Ok(())
}
