//! Invoice data handed to the layout engine.
//!
//! Optional text fields use the empty string for "absent"; layout skips
//! any line whose value is blank.

use std::path::PathBuf;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{InvoiceError, InvoiceResult};
use crate::totals;

/// Postal address. Each non-empty field renders on its own line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Address {
    pub line1: String,
    pub line2: String,
    pub city: String,
    pub postcode: String,
    pub country: String,
}

impl Address {
    /// Build an address from free text, one line per field in order.
    ///
    /// Blank lines are dropped. With more than five lines the middle
    /// ones are folded into `line2` so that city, postcode and country
    /// keep the last three.
    pub fn from_multiline(text: &str) -> Self {
        let lines: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();

        let mut address = Address::default();
        if lines.len() > 5 {
            let n = lines.len();
            address.line1 = lines[0].to_string();
            address.line2 = lines[1..n - 3].join(", ");
            address.city = lines[n - 3].to_string();
            address.postcode = lines[n - 2].to_string();
            address.country = lines[n - 1].to_string();
            return address;
        }

        let slots = [
            &mut address.line1,
            &mut address.line2,
            &mut address.city,
            &mut address.postcode,
            &mut address.country,
        ];
        for (slot, line) in slots.into_iter().zip(lines) {
            *slot = line.to_string();
        }
        address
    }

    /// Non-blank lines in display order.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        [
            &self.line1,
            &self.line2,
            &self.city,
            &self.postcode,
            &self.country,
        ]
        .into_iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.lines().next().is_none()
    }
}

/// The issuing business.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusinessInfo {
    pub name: String,
    pub address: Address,
    pub email: String,
    pub phone: String,
    pub website: String,
    pub vat_number: String,
    pub company_reg: String,
    /// Per-invoice logo. Takes precedence over the branding logo.
    pub logo: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomerInfo {
    pub name: String,
    pub email: String,
    pub address: Address,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub description: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    /// Overwritten with `quantity * unit_price` when totals are computed.
    #[serde(default)]
    pub line_total: Decimal,
}

impl LineItem {
    pub fn new(description: impl Into<String>, quantity: Decimal, unit_price: Decimal) -> Self {
        let mut item = LineItem {
            description: description.into(),
            quantity,
            unit_price,
            line_total: Decimal::ZERO,
        };
        item.line_total = item.amount().unwrap_or_default();
        item
    }

    /// `quantity * unit_price`, rounded to the currency unit, or `None`
    /// if the product overflows.
    pub fn amount(&self) -> Option<Decimal> {
        self.quantity.checked_mul(self.unit_price).map(totals::round_currency)
    }
}

/// Monetary summary. `tax_rate` is a percentage (20 means 20%).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Totals {
    pub subtotal: Decimal,
    pub tax_rate: Decimal,
    pub tax_amount: Decimal,
    pub total_amount: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentInfo {
    pub bank_name: String,
    pub account_name: String,
    pub sort_code: String,
    pub account_number: String,
    pub iban: String,
    pub bic: String,
    pub payment_link: String,
    pub notes: String,
}

impl PaymentInfo {
    /// Labelled detail lines with blank values removed.
    pub fn detail_lines(&self) -> Vec<(&'static str, &str)> {
        [
            ("Account Name", &self.account_name),
            ("Bank", &self.bank_name),
            ("Sort Code", &self.sort_code),
            ("Account Number", &self.account_number),
            ("IBAN", &self.iban),
            ("BIC", &self.bic),
            ("Pay online", &self.payment_link),
        ]
        .into_iter()
        .map(|(label, value)| (label, value.trim()))
        .filter(|(_, value)| !value.is_empty())
        .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.detail_lines().is_empty() && self.notes.trim().is_empty()
    }
}

/// Complete input for one rendered invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceDocument {
    /// Unique id; also the output file stem.
    pub invoice_id: String,
    pub invoice_number: String,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    pub business: BusinessInfo,
    pub customer: CustomerInfo,
    pub items: Vec<LineItem>,
    #[serde(default)]
    pub totals: Totals,
    #[serde(default)]
    pub payment: PaymentInfo,
    #[serde(default)]
    pub footer_notes: String,
}

impl InvoiceDocument {
    /// Reject documents that cannot be rendered.
    pub fn validate(&self) -> InvoiceResult<()> {
        let id = self.invoice_id.trim();
        if id.is_empty() {
            return Err(InvoiceError::validation("invoice id is empty"));
        }
        if id.contains(['/', '\\']) || id.starts_with('.') {
            return Err(InvoiceError::validation(format!(
                "invoice id {id:?} is not a safe file name"
            )));
        }
        if self.customer.name.trim().is_empty() {
            return Err(InvoiceError::validation("customer name is empty"));
        }
        if self.items.is_empty() {
            return Err(InvoiceError::validation("invoice has no line items"));
        }
        if let Some(i) = self.items.iter().position(|i| i.quantity < Decimal::ZERO) {
            return Err(InvoiceError::validation(format!(
                "line item {} has a negative quantity",
                i + 1
            )));
        }
        if self.totals.tax_rate < Decimal::ZERO {
            return Err(InvoiceError::validation("tax rate is negative"));
        }
        if self.due_date < self.issue_date {
            return Err(InvoiceError::validation("due date precedes issue date"));
        }
        Ok(())
    }

    /// Overwrite line totals and the summary from quantities and prices.
    pub fn recompute_totals(&mut self) -> InvoiceResult<()> {
        self.totals = totals::compute(&mut self.items, self.totals.tax_rate)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn sample() -> InvoiceDocument {
        InvoiceDocument {
            invoice_id: "abc123".into(),
            invoice_number: "INV-0001".into(),
            issue_date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            due_date: NaiveDate::from_ymd_opt(2025, 3, 15).unwrap(),
            business: BusinessInfo::default(),
            customer: CustomerInfo {
                name: "Acme Ltd".into(),
                ..Default::default()
            },
            items: vec![LineItem::new("Widget", dec("1"), dec("10"))],
            totals: Totals::default(),
            payment: PaymentInfo::default(),
            footer_notes: String::new(),
        }
    }

    #[test]
    fn from_multiline_fills_fields_in_order() {
        let a = Address::from_multiline("1 High St\n\n  London \nSW1A 1AA\n");
        assert_eq!(a.line1, "1 High St");
        assert_eq!(a.line2, "London");
        assert_eq!(a.city, "SW1A 1AA");
        assert_eq!(a.lines().collect::<Vec<_>>(), ["1 High St", "London", "SW1A 1AA"]);
    }

    #[test]
    fn from_multiline_folds_extra_lines() {
        let a = Address::from_multiline("Unit 4\nMill Yard\nCanal Rd\nLeeds\nLS1 1AA\nUK");
        assert_eq!(a.line1, "Unit 4");
        assert_eq!(a.line2, "Mill Yard, Canal Rd");
        assert_eq!(a.city, "Leeds");
        assert_eq!(a.postcode, "LS1 1AA");
        assert_eq!(a.country, "UK");
    }

    #[test]
    fn blank_address_is_empty() {
        assert!(Address::from_multiline(" \n\n").is_empty());
    }

    #[test]
    fn payment_lines_skip_blank_values() {
        let p = PaymentInfo {
            bank_name: "Example Bank".into(),
            iban: "  ".into(),
            payment_link: "https://pay.example/1".into(),
            ..Default::default()
        };
        let lines = p.detail_lines();
        assert_eq!(lines, vec![("Bank", "Example Bank"), ("Pay online", "https://pay.example/1")]);
        assert!(PaymentInfo::default().is_empty());
    }

    #[test]
    fn line_item_amount_rounds_half_up() {
        let item = LineItem::new("Hourly", dec("1.5"), dec("0.01"));
        assert_eq!(item.line_total, dec("0.02"));
    }

    #[test]
    fn validate_accepts_sample() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_documents() {
        let mut doc = sample();
        doc.items.clear();
        assert!(matches!(doc.validate(), Err(InvoiceError::Validation(_))));

        let mut doc = sample();
        doc.invoice_id = "../etc/passwd".into();
        assert!(doc.validate().is_err());

        let mut doc = sample();
        doc.customer.name = "   ".into();
        assert!(doc.validate().is_err());

        let mut doc = sample();
        doc.totals.tax_rate = dec("-1");
        assert!(doc.validate().is_err());

        let mut doc = sample();
        doc.due_date = NaiveDate::from_ymd_opt(2025, 2, 1).unwrap();
        assert!(doc.validate().is_err());
    }

    #[test]
    fn deserializes_numbers_and_strings_as_decimals() {
        let item: LineItem =
            serde_json::from_str(r#"{"description":"x","quantity":2,"unit_price":"12.50"}"#).unwrap();
        assert_eq!(item.quantity, dec("2"));
        assert_eq!(item.unit_price, dec("12.50"));
        assert_eq!(item.line_total, Decimal::ZERO);
    }
}
