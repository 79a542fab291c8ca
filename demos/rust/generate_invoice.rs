/// Invoice example: a single-page invoice with payment details.
///
/// Run with:
///   cargo run --example generate_invoice -p tradebill-demos
///
/// Writes to: demos/output/<invoice id>.pdf
use chrono::NaiveDate;
use rust_decimal::Decimal;
use tradebill_invoice::{
    generate_invoice_pdf, telemetry, Address, BusinessInfo, CustomerInfo, InvoiceConfig, InvoiceDocument,
    LineItem, PaymentInfo, Totals,
};

fn money(units: i64, cents: u32) -> Decimal {
    Decimal::new(units * 100 + i64::from(cents), 2)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    telemetry::init();

    let items = vec![
        LineItem::new("Boiler service and safety check", Decimal::ONE, money(95, 0)),
        LineItem::new("Thermostatic radiator valve", Decimal::from(4), money(18, 50)),
        LineItem::new("Labour (hours)", Decimal::new(25, 1), money(45, 0)),
    ];

    let doc = InvoiceDocument {
        invoice_id: "2f9c41e7-5a0b-4c53-9a6e-0d1f2c3b4a59".to_string(),
        invoice_number: "INV-2f9c41e7".to_string(),
        issue_date: NaiveDate::from_ymd_opt(2025, 3, 3).ok_or("bad date")?,
        due_date: NaiveDate::from_ymd_opt(2025, 3, 17).ok_or("bad date")?,
        business: BusinessInfo {
            name: "Pennine Heating Ltd".to_string(),
            address: Address::from_multiline("Unit 7, Canal Works\nHebden Bridge\nHX7 8AD\nUnited Kingdom"),
            email: "accounts@pennineheating.example".to_string(),
            phone: "+44 1422 000000".to_string(),
            website: "https://pennineheating.example".to_string(),
            vat_number: "GB 123 4567 89".to_string(),
            company_reg: "09876543".to_string(),
            logo: None,
        },
        customer: CustomerInfo {
            name: "Mrs A. Holroyd".to_string(),
            email: "a.holroyd@example.com".to_string(),
            address: Address::from_multiline("14 Birchcliffe Road\nHebden Bridge\nHX7 8JA"),
        },
        items,
        totals: Totals {
            tax_rate: Decimal::from(20),
            ..Totals::default()
        },
        payment: PaymentInfo {
            bank_name: "Example Bank".to_string(),
            account_name: "Pennine Heating Ltd".to_string(),
            sort_code: "00-00-00".to_string(),
            account_number: "00000000".to_string(),
            payment_link: "https://pay.pennineheating.example/INV-2f9c41e7".to_string(),
            notes: "Please quote the invoice number with your payment.".to_string(),
            ..PaymentInfo::default()
        },
        footer_notes: "Thank you for your business.\nPayments are due within 14 days unless otherwise agreed."
            .to_string(),
    };

    let path = generate_invoice_pdf(&doc, "demos/output", &InvoiceConfig::default())?;
    println!("Written: {}", path.display());
    Ok(())
}
