//! Price formatting for cart cells and summary totals

use contracts::domain::common::Money;

/// Format an amount the way the storefront renders prices: two decimals
/// followed by the currency symbol.
///
/// ```
/// use cart_frontend::shared::number_format::format_price;
/// use contracts::domain::common::Money;
/// assert_eq!(format_price(Money::from_minor(2997), "₺"), "29.97 ₺");
/// ```
pub fn format_price(value: Money, currency_symbol: &str) -> String {
    if currency_symbol.is_empty() {
        value.to_string()
    } else {
        format!("{} {}", value, currency_symbol)
    }
}
