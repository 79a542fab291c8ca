//! Invoice layout: turns an [`InvoiceDocument`] into positioned pages.
//!
//! Sections are emitted top to bottom through a single [`PageCursor`]:
//! header, title, bill-to, items table, totals, payment details, footer
//! notes. Every block checks for overflow before drawing and starts a new
//! page when it would cross the usable bottom. Inside the items table a
//! break repeats the header row. The running "Page N of M" caption is
//! added once all pages exist.

mod ops;
mod text;

pub use ops::{Align, DrawOp, Face, Page, TextOp};
pub use text::{truncate, wrap, TextMetrics};

use serde::{Deserialize, Serialize};
use tracing::debug;
use tradebill_pdf::{Color, Rect};

use crate::cursor::PageCursor;
use crate::format;
use crate::geometry::{Column, Geometry, Reserve, TOTALS_GAP};
use crate::model::{Address, BusinessInfo, CustomerInfo, InvoiceDocument, LineItem, PaymentInfo, Totals};

const NAVY: Color = Color { r: 0.118, g: 0.227, b: 0.373 };
const INK: Color = Color { r: 0.13, g: 0.13, b: 0.13 };
const MUTED: Color = Color { r: 0.47, g: 0.47, b: 0.47 };
const STRIPE: Color = Color { r: 0.95, g: 0.96, b: 0.98 };
const RULE: Color = Color { r: 0.8, g: 0.8, b: 0.8 };

const NAME_SIZE: f64 = 14.0;
const TITLE_SIZE: f64 = 20.0;
const HEADING_SIZE: f64 = 11.0;
const BODY_SIZE: f64 = 9.0;
const NOTE_SIZE: f64 = 8.0;

const NAME_LINE: f64 = 18.0;
const TITLE_LINE: f64 = 26.0;
const HEADING_LINE: f64 = 16.0;
const BODY_LINE: f64 = 12.0;
const NOTE_LINE: f64 = 11.0;
const SECTION_GAP: f64 = 16.0;

pub const CONTINUED_MARKER: &str = "Continued on next page";

/// Presentation choices that are not geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutOptions {
    pub currency_symbol: String,
    pub title: String,
    /// Print a "Continued on next page" marker before table breaks.
    pub continued_marker: bool,
    /// Reserve the logo box in the header.
    pub logo: bool,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        LayoutOptions {
            currency_symbol: "£".to_string(),
            title: "INVOICE".to_string(),
            continued_marker: true,
            logo: false,
        }
    }
}

/// Positioned pages ready for rendering, each carrying its final
/// "Page N of M" caption.
#[derive(Debug, Clone, PartialEq)]
pub struct LaidOutInvoice {
    pub pages: Vec<Page>,
}

impl LaidOutInvoice {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Page holding the first text op equal to `text`.
    pub fn page_of(&self, text: &str) -> Option<usize> {
        self.pages.iter().find(|p| p.contains_text(text)).map(|p| p.number)
    }
}

/// Caption printed in the footer band of every page.
pub fn page_caption(number: usize, total: usize) -> String {
    format!("Page {number} of {total}")
}

/// Lay out `doc` on pages of `geometry`, measuring text with the builtin
/// Helvetica metrics.
///
/// Totals on `doc` are drawn as given; callers recompute them first.
/// `geometry` is assumed valid (see [`Geometry::validate`]); even when it
/// is not, every page receives at least one block so layout terminates.
pub fn lay_out(doc: &InvoiceDocument, geometry: &Geometry, options: &LayoutOptions) -> LaidOutInvoice {
    lay_out_with_metrics(doc, geometry, options, &TextMetrics::default())
}

/// [`lay_out`] with text widths taken from `metrics`, which must match
/// the fonts the renderer will embed.
pub fn lay_out_with_metrics(
    doc: &InvoiceDocument,
    geometry: &Geometry,
    options: &LayoutOptions,
    metrics: &TextMetrics,
) -> LaidOutInvoice {
    let mut builder = Builder::new(geometry, options, metrics);
    builder.header(doc);
    builder.title();
    builder.bill_to(&doc.customer);
    builder.items_table(&doc.items);
    builder.totals(&doc.totals);
    builder.payment(&doc.payment);
    builder.footer_notes(&doc.footer_notes);

    let laid_out = finalize(builder.pages, geometry);
    debug!(
        invoice_id = %doc.invoice_id,
        items = doc.items.len(),
        pages = laid_out.page_count(),
        "layout complete"
    );
    laid_out
}

/// Append the running footer now that the page total is known.
fn finalize(mut pages: Vec<Page>, geometry: &Geometry) -> LaidOutInvoice {
    let total = pages.len();
    let center = geometry.content_left() + geometry.content_width() / 2.0;
    for page in &mut pages {
        page.ops.push(DrawOp::Text(TextOp {
            text: page_caption(page.number, total),
            x: center,
            baseline: geometry.footer_baseline(),
            align: Align::Center,
            face: Face::Regular,
            size: NOTE_SIZE,
            color: MUTED,
        }));
    }
    LaidOutInvoice { pages }
}

/// Baseline that vertically centres text of `size` in a line box.
fn baseline_in(top: f64, line_height: f64, size: f64) -> f64 {
    top + (line_height + size * 0.7) / 2.0
}

struct Builder<'a> {
    geometry: &'a Geometry,
    options: &'a LayoutOptions,
    metrics: &'a TextMetrics,
    cursor: PageCursor<'a>,
    pages: Vec<Page>,
}

impl<'a> Builder<'a> {
    fn new(geometry: &'a Geometry, options: &'a LayoutOptions, metrics: &'a TextMetrics) -> Self {
        Builder {
            geometry,
            options,
            metrics,
            cursor: PageCursor::new(geometry),
            pages: vec![Page::new(1)],
        }
    }

    fn page(&mut self) -> &mut Page {
        let index = self.cursor.page_index();
        &mut self.pages[index]
    }

    fn emit(&mut self, op: DrawOp) {
        self.page().ops.push(op);
    }

    #[allow(clippy::too_many_arguments)]
    fn text(&mut self, text: impl Into<String>, x: f64, baseline: f64, align: Align, face: Face, size: f64, color: Color) {
        self.emit(DrawOp::Text(TextOp {
            text: text.into(),
            x,
            baseline,
            align,
            face,
            size,
            color,
        }));
    }

    fn rule(&mut self, y: f64, x1: f64, x2: f64, width: f64, color: Color) {
        self.emit(DrawOp::Line { x1, y1: y, x2, y2: y, width, color });
    }

    fn break_page(&mut self) {
        let brk = self.cursor.break_page();
        self.pages.push(Page::new(brk.page_index + 1));
        if brk.repeat_table_header {
            self.table_header();
        }
    }

    /// Break unless `h` fits above the reserve. A fresh page never breaks.
    fn ensure_room(&mut self, h: f64, reserve: Reserve) {
        if !self.cursor.is_fresh() && self.cursor.would_overflow(h, reserve) {
            self.break_page();
        }
    }

    /// Vertical gap between sections, dropped at the top of a page.
    fn gap(&mut self, h: f64) {
        if !self.cursor.is_fresh() {
            self.cursor.advance(h);
        }
    }

    fn line(&mut self, text: &str, face: Face, size: f64, line_height: f64, color: Color) {
        self.ensure_room(line_height, Reserve::Footer);
        let baseline = baseline_in(self.cursor.y(), line_height, size);
        let x = self.geometry.content_left();
        self.text(text, x, baseline, Align::Left, face, size, color);
        self.cursor.advance(line_height);
    }

    fn paragraph(&mut self, text: &str, face: Face, size: f64, line_height: f64, color: Color, max_width: f64) {
        for line in wrap(self.metrics, text, face, size, max_width) {
            self.line(&line, face, size, line_height, color);
        }
    }

    fn address(&mut self, address: &Address, max_width: f64) {
        for line in address.lines() {
            self.paragraph(line, Face::Regular, BODY_SIZE, BODY_LINE, INK, max_width);
        }
    }

    // -------------------------------------------------------
    // Sections
    // -------------------------------------------------------

    fn header(&mut self, doc: &InvoiceDocument) {
        let g = self.geometry;
        let right = g.content_right();

        let mut right_y = g.margin_top;
        if self.options.logo {
            let rect = Rect {
                x: right - g.logo_width,
                y: right_y,
                width: g.logo_width,
                height: g.logo_height,
            };
            self.emit(DrawOp::Logo { rect });
            right_y += g.logo_height + 8.0;
        }
        let meta = [
            (format!("Invoice No: {}", doc.invoice_number.trim()), Face::Bold),
            (format!("Issue Date: {}", format::date(doc.issue_date)), Face::Regular),
            (format!("Due Date: {}", format::date(doc.due_date)), Face::Regular),
        ];
        let mut right_width: f64 = if self.options.logo { g.logo_width } else { 0.0 };
        for (text, face) in meta {
            right_width = right_width.max(self.metrics.measure(&text, face, BODY_SIZE));
            let baseline = baseline_in(right_y, BODY_LINE, BODY_SIZE);
            self.text(text, right, baseline, Align::Right, face, BODY_SIZE, INK);
            right_y += BODY_LINE;
        }

        let left_width = g.content_width() - right_width - 16.0;
        self.business(&doc.business, left_width);

        self.cursor.advance_to(right_y);
        self.gap(SECTION_GAP);
    }

    fn business(&mut self, business: &BusinessInfo, max_width: f64) {
        let name = business.name.trim();
        if !name.is_empty() {
            self.paragraph(name, Face::Bold, NAME_SIZE, NAME_LINE, NAVY, max_width);
        }
        self.address(&business.address, max_width);

        let contacts = [
            ("", &business.email),
            ("", &business.phone),
            ("", &business.website),
            ("VAT No: ", &business.vat_number),
            ("Company No: ", &business.company_reg),
        ];
        for (label, value) in contacts {
            let value = value.trim();
            if !value.is_empty() {
                self.paragraph(&format!("{label}{value}"), Face::Regular, BODY_SIZE, BODY_LINE, INK, max_width);
            }
        }
    }

    fn title(&mut self) {
        let g = self.geometry;
        let title = self.options.title.trim().to_string();
        if title.is_empty() {
            return;
        }
        self.ensure_room(TITLE_LINE + 6.0, Reserve::Footer);
        self.line(&title, Face::Bold, TITLE_SIZE, TITLE_LINE, NAVY);
        let y = self.cursor.y() + 2.0;
        self.rule(y, g.content_left(), g.content_right(), 1.5, NAVY);
        self.cursor.advance(6.0);
        self.gap(SECTION_GAP - 6.0);
    }

    fn bill_to(&mut self, customer: &CustomerInfo) {
        let width = self.geometry.content_width();
        self.ensure_room(HEADING_LINE + 2.0 * BODY_LINE, Reserve::Footer);
        self.line("Bill To:", Face::Bold, HEADING_SIZE, HEADING_LINE, NAVY);
        self.paragraph(customer.name.trim(), Face::Bold, 10.0, 14.0, INK, width);
        self.address(&customer.address, width);
        let email = customer.email.trim();
        if !email.is_empty() {
            self.paragraph(email, Face::Regular, BODY_SIZE, BODY_LINE, INK, width);
        }
        self.gap(SECTION_GAP);
    }

    fn table_header(&mut self) {
        let g = self.geometry;
        let y = self.cursor.y();
        let pad = g.cell_padding;
        self.emit(DrawOp::FillRect {
            rect: Rect {
                x: g.content_left(),
                y,
                width: g.columns.sum(),
                height: g.row_height,
            },
            color: NAVY,
        });

        let baseline = baseline_in(y, g.row_height, BODY_SIZE);
        let (x, _) = g.column(Column::Description);
        self.text("Description", x + pad, baseline, Align::Left, Face::Bold, BODY_SIZE, Color::WHITE);
        for (column, caption) in [
            (Column::Quantity, "Qty"),
            (Column::UnitPrice, "Unit Price"),
            (Column::Total, "Total"),
        ] {
            let (x, w) = g.column(column);
            self.text(caption, x + w - pad, baseline, Align::Right, Face::Bold, BODY_SIZE, Color::WHITE);
        }
        self.cursor.advance(g.row_height);
    }

    fn items_table(&mut self, items: &[LineItem]) {
        let row_height = self.geometry.row_height;
        let last = items.len().saturating_sub(1);
        let first_reserve = if items.len() == 1 {
            Reserve::FooterAndTotals
        } else {
            Reserve::Footer
        };

        // Header and first row stay together.
        self.ensure_room(2.0 * row_height, first_reserve);
        self.cursor.enter_table();
        self.table_header();

        let mut rows_on_page = 0;
        for (index, item) in items.iter().enumerate() {
            // The last row keeps the totals block with it.
            let reserve = if index == last {
                Reserve::FooterAndTotals
            } else {
                Reserve::Footer
            };
            if rows_on_page > 0 && self.cursor.would_overflow(row_height, reserve) {
                if self.options.continued_marker {
                    self.continued_marker();
                }
                self.break_page();
                rows_on_page = 0;
            }
            self.item_row(index, item);
            rows_on_page += 1;
        }
        self.cursor.leave_table();
    }

    fn item_row(&mut self, index: usize, item: &LineItem) {
        let g = self.geometry;
        let y = self.cursor.y();
        let pad = g.cell_padding;
        let left = g.content_left();
        let table_width = g.columns.sum();

        if index % 2 == 1 {
            self.emit(DrawOp::FillRect {
                rect: Rect { x: left, y, width: table_width, height: g.row_height },
                color: STRIPE,
            });
        }

        let baseline = baseline_in(y, g.row_height, BODY_SIZE);
        let (x, w) = g.column(Column::Description);
        let description = truncate(self.metrics, &item.description, Face::Regular, BODY_SIZE, w - 2.0 * pad);
        self.text(description, x + pad, baseline, Align::Left, Face::Regular, BODY_SIZE, INK);

        let symbol = &self.options.currency_symbol;
        let cells = [
            (Column::Quantity, format::quantity(item.quantity)),
            (Column::UnitPrice, format::money(item.unit_price, symbol)),
            (Column::Total, format::money(item.line_total, symbol)),
        ];
        for (column, value) in cells {
            let (x, w) = g.column(column);
            self.text(value, x + w - pad, baseline, Align::Right, Face::Regular, BODY_SIZE, INK);
        }

        self.rule(y + g.row_height, left, left + table_width, 0.5, RULE);
        self.page().item_indices.push(index);
        self.cursor.advance(g.row_height);
    }

    fn continued_marker(&mut self) {
        let baseline = self.cursor.y() + 10.0;
        let x = self.geometry.content_left() + self.geometry.columns.sum();
        self.text(CONTINUED_MARKER, x, baseline, Align::Right, Face::Italic, NOTE_SIZE, MUTED);
    }

    fn totals(&mut self, totals: &Totals) {
        let g = self.geometry;
        self.ensure_room(g.totals_block_height, Reserve::Footer);

        let pad = g.cell_padding;
        let (price_x, price_w) = g.column(Column::UnitPrice);
        let (total_x, total_w) = g.column(Column::Total);
        let label_right = total_x - pad;
        let amount_right = total_x + total_w - pad;
        let symbol = self.options.currency_symbol.clone();

        let mut y = self.cursor.y() + TOTALS_GAP;
        let rows = [
            ("Subtotal".to_string(), totals.subtotal),
            (format!("Tax ({})", format::percent(totals.tax_rate)), totals.tax_amount),
        ];
        for (label, amount) in rows {
            let baseline = baseline_in(y, g.row_height, BODY_SIZE);
            self.text(label, label_right, baseline, Align::Right, Face::Regular, BODY_SIZE, INK);
            self.text(format::money(amount, &symbol), amount_right, baseline, Align::Right, Face::Regular, BODY_SIZE, INK);
            y += g.row_height;
        }

        self.emit(DrawOp::FillRect {
            rect: Rect { x: price_x, y, width: price_w + total_w, height: g.row_height },
            color: STRIPE,
        });
        self.rule(y, price_x, total_x + total_w, 1.0, NAVY);
        let baseline = baseline_in(y, g.row_height, HEADING_SIZE);
        self.text("Amount Due", label_right, baseline, Align::Right, Face::Bold, HEADING_SIZE, NAVY);
        self.text(
            format::money(totals.total_amount, &symbol),
            amount_right,
            baseline,
            Align::Right,
            Face::Bold,
            HEADING_SIZE,
            NAVY,
        );

        self.cursor.advance(g.totals_block_height);
    }

    fn payment(&mut self, payment: &PaymentInfo) {
        if payment.is_empty() {
            return;
        }
        let width = self.geometry.content_width();
        self.gap(SECTION_GAP);
        self.ensure_room(HEADING_LINE + BODY_LINE, Reserve::Footer);
        self.line("Payment Details", Face::Bold, HEADING_SIZE, HEADING_LINE, NAVY);
        for (label, value) in payment.detail_lines() {
            self.paragraph(&format!("{label}: {value}"), Face::Regular, BODY_SIZE, BODY_LINE, INK, width);
        }
        let notes = payment.notes.trim();
        if !notes.is_empty() {
            self.paragraph(notes, Face::Regular, BODY_SIZE, BODY_LINE, MUTED, width);
        }
    }

    fn footer_notes(&mut self, notes: &str) {
        let notes = notes.trim();
        if notes.is_empty() {
            return;
        }
        let g = self.geometry;
        self.gap(SECTION_GAP);
        self.ensure_room(g.footer_notes_min_height, Reserve::Footer);
        let y = self.cursor.y();
        self.rule(y, g.content_left(), g.content_right(), 0.5, RULE);
        self.cursor.advance(6.0);
        self.paragraph(notes, Face::Italic, NOTE_SIZE, NOTE_LINE, MUTED, g.content_width());
    }
}
