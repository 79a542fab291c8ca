/// Multi-page example: enough line items to spill over several pages.
///
/// Shows the repeated table header, the "Continued on next page" marker,
/// totals kept with the last row, and "Page N of M" footers.
///
/// Run with:
///   cargo run --example generate_multipage -p tradebill-demos
///
/// Writes to: demos/output/<invoice id>.pdf
use chrono::NaiveDate;
use rust_decimal::Decimal;
use tradebill_invoice::request::RequestItem;
use tradebill_invoice::{generate_invoice_pdf, render_invoice, telemetry, CreateInvoiceRequest, InvoiceConfig};

const JOBS: &[(&str, i64)] = &[
    ("Gutter clearance", 6500),
    ("Replace ridge tile", 12000),
    ("Moss treatment", 8500),
    ("Fascia repair", 17500),
    ("Chimney repoint", 42000),
    ("Skylight reseal", 9500),
];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    telemetry::init();

    let mut config = InvoiceConfig::default();
    config.branding.defaults.tax_rate = Decimal::from(20);
    config.branding.defaults.business.name = "Calder Roofing".to_string();

    let items = (0..84)
        .map(|i| {
            let (job, pence) = JOBS[i % JOBS.len()];
            RequestItem {
                description: format!("{job}, property {}", i / JOBS.len() + 1),
                quantity: Decimal::ONE,
                unit_price: Decimal::new(pence, 2),
            }
        })
        .collect();

    let request = CreateInvoiceRequest {
        customer_name: "Upper Calder Housing Co-operative".to_string(),
        customer_email: "maintenance@uchc.example".to_string(),
        customer_address: "The Old Mill\nMytholmroyd\nHX7 5DL".to_string(),
        items,
    };
    let issue_date = NaiveDate::from_ymd_opt(2025, 6, 2).ok_or("bad date")?;
    let doc = request.into_document(&config.branding.defaults, issue_date)?;

    let rendered = render_invoice(&doc, &config)?;
    println!("{} items over {} pages", doc.items.len(), rendered.page_count);

    let path = generate_invoice_pdf(&doc, "demos/output", &config)?;
    println!("Written: {}", path.display());
    Ok(())
}
