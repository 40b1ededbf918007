//! Variant pricing.

use crate::catalog::OptionCatalog;
use crate::variant::state::SelectionState;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Price of the current selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantPrice {
    /// Sum of the price deltas of the selected values.
    pub variant_delta: Decimal,
    /// `base_price + variant_delta`, or `None` when the product has no base
    /// price.
    pub final_price: Option<Decimal>,
}

/// Price a selection.
///
/// Only single-choice and image-choice selections contribute. Multi-choice
/// values carry a `price_delta` too, but it is not summed; that is the
/// storefront's current behavior and is pinned by tests.
pub fn price_selection(
    state: &SelectionState,
    catalog: &OptionCatalog,
    base_price: Option<Decimal>,
) -> VariantPrice {
    let variant_delta = state
        .string_pairs()
        .filter_map(|(name, selected)| {
            let option = catalog.get(name)?;
            if !option.option_type.is_priced() {
                return None;
            }
            option.find_value(selected).map(|v| v.delta())
        })
        .sum::<Decimal>();

    VariantPrice {
        variant_delta,
        final_price: base_price.map(|base| base + variant_delta),
    }
}
