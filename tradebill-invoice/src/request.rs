//! Building an [`InvoiceDocument`] from a bare create-invoice request.

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::InvoiceDefaults;
use crate::error::{InvoiceError, InvoiceResult};
use crate::model::{Address, CustomerInfo, InvoiceDocument, LineItem, Totals};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestItem {
    pub description: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
}

/// Customer and items as submitted by a caller. Everything else comes
/// from [`InvoiceDefaults`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateInvoiceRequest {
    pub customer_name: String,
    #[serde(default)]
    pub customer_email: String,
    /// Newline-separated address.
    #[serde(default)]
    pub customer_address: String,
    pub items: Vec<RequestItem>,
}

impl CreateInvoiceRequest {
    pub fn validate(&self) -> InvoiceResult<()> {
        if self.customer_name.trim().is_empty() {
            return Err(InvoiceError::validation("customer name is required"));
        }
        if self.items.is_empty() {
            return Err(InvoiceError::validation("invoice must include at least one item"));
        }
        for (i, item) in self.items.iter().enumerate() {
            if item.quantity < Decimal::ZERO || item.unit_price < Decimal::ZERO {
                return Err(InvoiceError::validation(format!(
                    "item {} has a negative quantity or unit price",
                    i + 1
                )));
            }
        }
        Ok(())
    }

    /// Assemble a document issued on `issue_date`, with a fresh id and
    /// recomputed totals.
    pub fn into_document(self, defaults: &InvoiceDefaults, issue_date: NaiveDate) -> InvoiceResult<InvoiceDocument> {
        self.validate()?;

        let id = Uuid::new_v4().to_string();
        let invoice_number = format!("INV-{}", &id[..8]);
        let due_date = issue_date
            .checked_add_days(Days::new(u64::from(defaults.payment_terms_days)))
            .ok_or_else(|| InvoiceError::validation("due date out of range"))?;

        let items = self
            .items
            .into_iter()
            .map(|item| LineItem::new(item.description, item.quantity, item.unit_price))
            .collect();

        let mut doc = InvoiceDocument {
            invoice_id: id,
            invoice_number,
            issue_date,
            due_date,
            business: defaults.business.clone(),
            customer: CustomerInfo {
                name: self.customer_name.trim().to_string(),
                email: self.customer_email.trim().to_string(),
                address: Address::from_multiline(&self.customer_address),
            },
            items,
            totals: Totals {
                tax_rate: defaults.tax_rate,
                ..Totals::default()
            },
            payment: defaults.payment.clone(),
            footer_notes: defaults.footer_notes.clone(),
        };
        doc.recompute_totals()?;
        Ok(doc)
    }
}
