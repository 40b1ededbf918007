//! Presentation helpers for the product page.

use crate::catalog::ProductDetail;
use crate::money::format_eur;
use crate::variant::notifier::SelectionSnapshot;
use rust_decimal::Decimal;

/// Text of the price heading.
///
/// With a base price, the full price; without one, the surcharge alone
/// (`+ 2,00 €`) or `Custom` when there is nothing to show.
pub fn price_text(base_price: Option<Decimal>, variant_delta: Decimal) -> String {
    match base_price {
        Some(base) => format_eur(base + variant_delta),
        None if !variant_delta.is_zero() => format!("+ {}", format_eur(variant_delta)),
        None => "Custom".to_string(),
    }
}

/// Image to preview the chosen variant with.
///
/// The first selected value that has its own picture wins; otherwise the
/// product's first image.
pub fn preview_image<'a>(detail: &'a ProductDetail, snapshot: &SelectionSnapshot) -> Option<&'a str> {
    snapshot
        .selected_values
        .string_pairs()
        .find_map(|(name, selected)| {
            detail
                .options
                .get(name)?
                .find_value(selected)?
                .image_url
                .as_deref()
        })
        .or_else(|| detail.primary_image())
}
