//! Price formatting.
//!
//! Prices are `rust_decimal::Decimal` values in euros. Arithmetic is exact;
//! formatting to the storefront's it-IT convention (`1.234,50 €`) only
//! happens at the display edge.

use rust_decimal::{Decimal, RoundingStrategy};

/// Format an amount the way the storefront shows prices (`12,00 €`).
///
/// ```
/// use bottega_commerce::money::format_eur;
/// use rust_decimal::Decimal;
/// assert_eq!(format_eur(Decimal::new(123450, 2)), "1.234,50 €");
/// ```
pub fn format_eur(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let abs = rounded.abs();

    let units = abs.trunc();
    let cents = ((abs - units) * Decimal::ONE_HUNDRED).trunc();

    let digits = units.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    format!(
        "{}{},{:0>2} €",
        if negative { "-" } else { "" },
        grouped,
        cents
    )
}

/// Format a price that may be missing.
pub fn format_optional(amount: Option<Decimal>) -> String {
    amount.map(format_eur).unwrap_or_else(|| "—".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_whole_amount() {
        assert_eq!(format_eur(Decimal::from(12)), "12,00 €");
    }

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_eur(Decimal::new(1_234_567_89, 2)), "1.234.567,89 €");
    }

    #[test]
    fn test_format_rounds_half_away_from_zero() {
        assert_eq!(format_eur(Decimal::new(10_005, 3)), "10,01 €");
    }

    #[test]
    fn test_format_negative() {
        assert_eq!(format_eur(Decimal::new(-250, 2)), "-2,50 €");
    }

    #[test]
    fn test_format_optional_missing() {
        assert_eq!(format_optional(None), "—");
    }
}
