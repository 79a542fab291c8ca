//! Text formatting for amounts, quantities and dates.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::totals::round_currency;

/// Display format for issue and due dates, e.g. `05 Mar 2025`.
pub const DATE_FORMAT: &str = "%d %b %Y";

/// `£1,234.50`; negatives as `-£5.00`.
pub fn money(amount: Decimal, symbol: &str) -> String {
    let rounded = round_currency(amount);
    let sign = if rounded < Decimal::ZERO { "-" } else { "" };
    format!("{sign}{symbol}{}", group_thousands(&rounded.abs().to_string()))
}

/// Quantities always carry two decimal places.
pub fn quantity(q: Decimal) -> String {
    round_currency(q).to_string()
}

/// Tax rate without trailing zeros: `20%`, `17.5%`.
pub fn percent(rate: Decimal) -> String {
    format!("{}%", rate.normalize())
}

pub fn date(d: NaiveDate) -> String {
    d.format(DATE_FORMAT).to_string()
}

fn group_thousands(plain: &str) -> String {
    let (int_part, frac) = match plain.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (plain, None),
    };
    let digits = int_part.as_bytes();
    let mut out = String::with_capacity(plain.len() + digits.len() / 3);
    for (i, &b) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(b as char);
    }
    if let Some(f) = frac {
        out.push('.');
        out.push_str(f);
    }
    out
}
