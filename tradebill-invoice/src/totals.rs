//! Monetary arithmetic. All amounts are decimals rounded half-up to
//! two places.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{InvoiceError, InvoiceResult};
use crate::model::{LineItem, Totals};

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Round to the currency unit, halves away from zero.
pub fn round_currency(amount: Decimal) -> Decimal {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

fn out_of_range() -> InvoiceError {
    InvoiceError::validation("amount out of range")
}

/// Recompute every line total from quantity and price, then derive the
/// summary. Caller-supplied line totals are overwritten.
///
/// Fails with [`InvoiceError::Validation`] when an amount does not fit
/// in a `Decimal`.
pub fn compute(items: &mut [LineItem], tax_rate: Decimal) -> InvoiceResult<Totals> {
    let mut subtotal = Decimal::ZERO;
    for item in items.iter_mut() {
        item.line_total = item.amount().ok_or_else(out_of_range)?;
        subtotal = subtotal.checked_add(item.line_total).ok_or_else(out_of_range)?;
    }
    let subtotal = round_currency(subtotal);
    let tax_amount = subtotal
        .checked_mul(tax_rate)
        .and_then(|t| t.checked_div(HUNDRED))
        .map(round_currency)
        .ok_or_else(out_of_range)?;
    let total_amount = subtotal.checked_add(tax_amount).ok_or_else(out_of_range)?;

    Ok(Totals {
        subtotal,
        tax_rate,
        tax_amount,
        total_amount: round_currency(total_amount),
    })
}
