use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;

use tradebill_invoice::layout::{lay_out_with_metrics, page_caption, Align, TextMetrics, TextOp, CONTINUED_MARKER};
use tradebill_pdf::truetype::TrueTypeFont;
use tradebill_invoice::{
    lay_out, Address, BusinessInfo, CustomerInfo, DrawOp, Geometry, InvoiceDocument, LaidOutInvoice,
    LayoutOptions, LineItem, Page, PaymentInfo, Reserve, Totals,
};

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn invoice(items: Vec<LineItem>) -> InvoiceDocument {
    let mut doc = InvoiceDocument {
        invoice_id: "0b7a51de-0000-4000-8000-000000000001".into(),
        invoice_number: "INV-0001".into(),
        issue_date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
        due_date: NaiveDate::from_ymd_opt(2025, 3, 15).unwrap(),
        business: BusinessInfo {
            name: "Northwind Studio".into(),
            address: Address::from_multiline("12 Wharf Road\nBristol\nBS1 4RN"),
            email: "accounts@northwind.example".into(),
            ..Default::default()
        },
        customer: CustomerInfo {
            name: "Contoso Ltd".into(),
            email: "ap@contoso.example".into(),
            address: Address::from_multiline("5 Market Street\nLeeds\nLS1 6DT"),
        },
        items,
        totals: Totals {
            tax_rate: dec("20"),
            ..Default::default()
        },
        payment: PaymentInfo::default(),
        footer_notes: String::new(),
    };
    doc.recompute_totals().unwrap();
    doc
}

fn numbered_items(n: usize) -> Vec<LineItem> {
    (0..n)
        .map(|i| LineItem::new(format!("Item {i}"), Decimal::ONE, dec("10.00")))
        .collect()
}

fn text_baseline(page: &Page, text: &str) -> f64 {
    page.find_text(text)
        .unwrap_or_else(|| panic!("{text:?} not on page {}", page.number))
        .baseline
}

fn item_baselines(page: &Page) -> Vec<f64> {
    page.texts()
        .filter(|t| t.text.starts_with("Item "))
        .map(|t| t.baseline)
        .collect()
}

fn page_of_item(out: &LaidOutInvoice, index: usize) -> usize {
    out.pages
        .iter()
        .find(|p| p.item_indices.contains(&index))
        .map(|p| p.number)
        .unwrap()
}

/// Geometry whose first page holds `rows` item rows plus half a row of slack.
fn geometry_fitting(rows: f64) -> Geometry {
    let probe = Geometry::a4();
    let out = lay_out(&invoice(numbered_items(1)), &probe, &LayoutOptions::default());
    let header_baseline = text_baseline(&out.pages[0], "Description");
    let header_top = header_baseline - (probe.row_height + 9.0 * 0.7) / 2.0;
    let first_row_top = header_top + probe.row_height;

    let mut g = probe.clone();
    g.page_height = first_row_top + (rows + 0.5) * g.row_height + g.margin_bottom + g.footer_height;
    g
}

#[test]
fn three_items_fit_on_one_page() {
    let items = vec![
        LineItem::new("Design", dec("2"), dec("25.00")),
        LineItem::new("Build", dec("1"), dec("40.00")),
        LineItem::new("Hosting", dec("1"), dec("10.00")),
    ];
    let doc = invoice(items);
    assert_eq!(doc.totals.subtotal, dec("100.00"));
    assert_eq!(doc.totals.tax_amount, dec("20.00"));
    assert_eq!(doc.totals.total_amount, dec("120.00"));

    let out = lay_out(&doc, &Geometry::a4(), &LayoutOptions::default());
    assert_eq!(out.page_count(), 1);
    let page = &out.pages[0];
    assert!(page.contains_text("Page 1 of 1"));
    assert!(page.contains_text("Tax (20%)"));
    assert!(page.contains_text("£100.00"));
    assert!(page.contains_text("£20.00"));
    assert!(page.contains_text("£120.00"));
    assert!(page.contains_text("£50.00"));
    assert!(page.contains_text("2.00"));
    assert!(!page.contains_text(CONTINUED_MARKER));
}

#[test]
fn sections_appear_in_reading_order() {
    let mut doc = invoice(numbered_items(2));
    doc.payment.bank_name = "Example Bank".into();
    doc.footer_notes = "Thank you for your business.".into();
    let out = lay_out(&doc, &Geometry::a4(), &LayoutOptions::default());
    let page = &out.pages[0];

    let order = [
        "Northwind Studio",
        "INVOICE",
        "Bill To:",
        "Description",
        "Item 0",
        "Item 1",
        "Amount Due",
        "Payment Details",
        "Thank you for your business.",
    ];
    let baselines: Vec<f64> = order.iter().map(|t| text_baseline(page, t)).collect();
    for pair in baselines.windows(2) {
        assert!(pair[0] < pair[1], "{baselines:?}");
    }
}

#[test]
fn forty_items_break_after_twenty_five() {
    let g = geometry_fitting(25.0);
    let out = lay_out(&invoice(numbered_items(40)), &g, &LayoutOptions::default());

    assert_eq!(out.page_count(), 2);
    assert_eq!(out.pages[0].item_indices, (0..25).collect::<Vec<_>>());
    assert_eq!(out.pages[1].item_indices, (25..40).collect::<Vec<_>>());

    assert!(out.pages[0].contains_text(CONTINUED_MARKER));
    assert!(out.pages[0].contains_text("Page 1 of 2"));
    assert!(out.pages[1].contains_text("Page 2 of 2"));
    assert!(!out.pages[1].contains_text(CONTINUED_MARKER));

    // Header row repeated above the continuation rows.
    let page2 = &out.pages[1];
    let header = text_baseline(page2, "Description");
    assert!(item_baselines(page2).iter().all(|&b| b > header));
    assert_eq!(header, text_baseline(page2, "Unit Price"));
    assert_eq!(out.page_of("Amount Due"), Some(2));
}

#[test]
fn exact_fit_keeps_rows_on_one_page() {
    // Room for 25.5 rows: 25 fit, the 26th breaks.
    let g = geometry_fitting(25.0);
    let out = lay_out(&invoice(numbered_items(26)), &g, &LayoutOptions::default());
    assert_eq!(out.pages[0].item_indices.len(), 25);
    assert_eq!(out.pages[1].item_indices, vec![25]);
}

#[test]
fn header_repeats_on_every_continuation_page() {
    let out = lay_out(&invoice(numbered_items(150)), &Geometry::a4(), &LayoutOptions::default());
    assert!(out.page_count() >= 4);
    for page in &out.pages {
        if page.item_indices.is_empty() {
            continue;
        }
        let header = text_baseline(page, "Description");
        let first_row = item_baselines(page).into_iter().fold(f64::INFINITY, f64::min);
        assert!(header < first_row, "page {}", page.number);
    }
}

#[test]
fn rows_never_enter_the_footer_band() {
    let g = Geometry::a4();
    let out = lay_out(&invoice(numbered_items(150)), &g, &LayoutOptions::default());
    for page in &out.pages {
        for op in &page.ops {
            if let DrawOp::FillRect { rect, .. } = op {
                assert!(rect.bottom() <= g.usable_bottom(Reserve::Footer) + 1e-9, "page {}", page.number);
            }
        }
    }
}

#[test]
fn page_captions_match_final_count() {
    for n in [1, 12, 30, 31, 75, 200] {
        let out = lay_out(&invoice(numbered_items(n)), &Geometry::a4(), &LayoutOptions::default());
        let total = out.page_count();
        for page in &out.pages {
            let captions: Vec<&TextOp> = page.texts().filter(|t| t.text.starts_with("Page ")).collect();
            assert_eq!(captions.len(), 1, "{n} items, page {}", page.number);
            assert_eq!(captions[0].text, page_caption(page.number, total));
            assert_eq!(captions[0].align, Align::Center);
        }
    }
}

#[test]
fn totals_stay_with_the_last_row() {
    for n in 1..90 {
        let out = lay_out(&invoice(numbered_items(n)), &Geometry::a4(), &LayoutOptions::default());
        let totals_page = out.page_of("Amount Due").unwrap();
        assert_eq!(totals_page, page_of_item(&out, n - 1), "{n} items");
    }
}

#[test]
fn blank_optional_fields_are_omitted() {
    let mut doc = invoice(numbered_items(1));
    doc.business.phone = "   ".into();
    doc.business.vat_number = String::new();
    doc.customer.email = String::new();
    doc.payment = PaymentInfo {
        bank_name: "Example Bank".into(),
        sort_code: "00-11-22".into(),
        ..Default::default()
    };
    let out = lay_out(&doc, &Geometry::a4(), &LayoutOptions::default());
    let page = &out.pages[0];

    assert!(page.contains_text("Bank: Example Bank"));
    assert!(page.contains_text("Sort Code: 00-11-22"));
    for prefix in ["IBAN", "BIC", "Pay online", "VAT No", "Account Number"] {
        assert!(!page.texts().any(|t| t.text.starts_with(prefix)), "{prefix}");
    }
    assert!(!page.contains_text("ap@contoso.example"));
    assert!(page.texts().all(|t| !t.text.trim().is_empty()));
}

#[test]
fn empty_payment_section_is_skipped() {
    let out = lay_out(&invoice(numbered_items(1)), &Geometry::a4(), &LayoutOptions::default());
    assert!(!out.pages[0].contains_text("Payment Details"));
}

#[test]
fn payment_link_and_vat_are_shown_when_present() {
    let mut doc = invoice(numbered_items(1));
    doc.business.vat_number = "GB123456789".into();
    doc.payment.payment_link = "https://pay.example/inv-0001".into();
    let out = lay_out(&doc, &Geometry::a4(), &LayoutOptions::default());
    assert!(out.pages[0].contains_text("VAT No: GB123456789"));
    assert!(out.pages[0].contains_text("Pay online: https://pay.example/inv-0001"));
}

#[test]
fn continued_marker_can_be_disabled() {
    let options = LayoutOptions {
        continued_marker: false,
        ..Default::default()
    };
    let out = lay_out(&invoice(numbered_items(80)), &Geometry::a4(), &options);
    assert!(out.page_count() > 1);
    assert!(out.pages.iter().all(|p| !p.contains_text(CONTINUED_MARKER)));
}

#[test]
fn long_descriptions_are_truncated_to_the_column() {
    let long = "Emergency call-out including diagnostics, parts sourcing and a follow-up visit";
    let doc = invoice(vec![LineItem::new(long, Decimal::ONE, dec("95"))]);
    let out = lay_out(&doc, &Geometry::a4(), &LayoutOptions::default());
    let cell = out.pages[0]
        .texts()
        .find(|t| t.text.starts_with("Emergency"))
        .unwrap();
    assert!(cell.text.ends_with("..."));
    assert!(TextMetrics::default().measure(&cell.text, cell.face, cell.size) <= 243.0 - 12.0);
}

#[test]
fn truncation_follows_the_embedded_font() {
    let data = std::fs::read(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/../tradebill-pdf/tests/fixtures/DejaVuSans.ttf"
    ))
    .unwrap();
    let metrics = TextMetrics::with_fonts(Some(TrueTypeFont::from_bytes(data, "F4".into()).unwrap()), None);

    let long = "Emergency call-out including diagnostics, parts sourcing and a follow-up visit";
    let doc = invoice(vec![LineItem::new(long, Decimal::ONE, dec("95"))]);
    let description = |out: &LaidOutInvoice| {
        out.pages[0]
            .texts()
            .find(|t| t.text.starts_with("Emergency"))
            .unwrap()
            .clone()
    };

    let builtin = description(&lay_out(&doc, &Geometry::a4(), &LayoutOptions::default()));
    let embedded = description(&lay_out_with_metrics(&doc, &Geometry::a4(), &LayoutOptions::default(), &metrics));

    assert!(embedded.text.ends_with("..."));
    assert!(metrics.measure(&embedded.text, embedded.face, embedded.size) <= 243.0 - 12.0);
    assert_ne!(embedded.text, builtin.text);
}

#[test]
fn long_footer_notes_flow_onto_new_pages() {
    let mut doc = invoice(numbered_items(30));
    doc.footer_notes = "Terms apply. ".repeat(600);
    let out = lay_out(&doc, &Geometry::a4(), &LayoutOptions::default());
    let last = out.pages.last().unwrap();
    assert!(out.page_count() >= 3);
    assert!(last.item_indices.is_empty());
    assert!(last.texts().any(|t| t.text.contains("Terms apply.")));
}

#[test]
fn currency_symbol_follows_options() {
    let options = LayoutOptions {
        currency_symbol: "€".into(),
        ..Default::default()
    };
    let out = lay_out(&invoice(numbered_items(1)), &Geometry::a4(), &options);
    assert!(out.pages[0].contains_text("€12.00"));
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, ..ProptestConfig::default() })]

    #[test]
    fn layout_is_deterministic_and_complete(
        n in 1usize..160,
        marker in any::<bool>(),
        notes in "[a-z ]{0,400}",
    ) {
        let mut doc = invoice(numbered_items(n));
        doc.footer_notes = notes;
        let options = LayoutOptions { continued_marker: marker, ..Default::default() };
        let g = Geometry::a4();

        let first = lay_out(&doc, &g, &options);
        let second = lay_out(&doc, &g, &options);
        prop_assert_eq!(&first, &second);

        let placed: Vec<usize> = first.pages.iter().flat_map(|p| p.item_indices.iter().copied()).collect();
        prop_assert_eq!(placed, (0..n).collect::<Vec<_>>());
        for (i, page) in first.pages.iter().enumerate() {
            prop_assert_eq!(page.number, i + 1);
            let caption = page_caption(page.number, first.page_count());
            prop_assert!(page.contains_text(&caption));
        }
    }
}
