use rust_decimal::{Decimal, RoundingStrategy};

use crate::domain::cart::CartLine;

pub const DEFAULT_CURRENCY: &str = "SAR";

/// Formats `amount` as `<currency> <amount>` with exactly two decimals.
pub fn format_money(currency: &str, amount: Decimal) -> String {
    format!("{currency} {}", format_amount(amount))
}

pub fn format_amount(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{rounded:.2}")
}

pub fn subtotal<'a, 'p: 'a, I>(lines: I) -> Decimal
where
    I: IntoIterator<Item = &'a CartLine<'p>>,
{
    lines.into_iter().map(CartLine::line_total).sum()
}
