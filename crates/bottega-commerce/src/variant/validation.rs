//! Mandatory-option validation.

use crate::catalog::{OptionCatalog, OptionType, ProductOption};
use crate::variant::state::SelectionState;
use crate::variant::value::{SelectionValue, LETTER_NONE};
use rust_decimal::Decimal;

/// Whether an option's current value satisfies its mandatory constraint.
///
/// Optional options are always satisfied. A value whose shape does not match
/// the option's declared type never satisfies it.
pub fn is_option_satisfied(option: &ProductOption, state: &SelectionState) -> bool {
    if !option.is_mandatory {
        return true;
    }

    match (option.option_type, state.get(&option.name)) {
        (OptionType::SingleChoice, Some(SelectionValue::SingleChoice(v)))
        | (OptionType::ImageChoice, Some(SelectionValue::ImageChoice(v))) => {
            v.as_deref().is_some_and(|s| !s.is_empty())
        }
        (OptionType::MultiChoice, Some(SelectionValue::MultiChoice(values))) => !values.is_empty(),
        (OptionType::LetterChoice, Some(SelectionValue::LetterChoice(letter))) => {
            !letter.is_empty() && letter != LETTER_NONE
        }
        (OptionType::FreeText, Some(SelectionValue::FreeText(text))) => !text.trim().is_empty(),
        (OptionType::ImageUpload, Some(SelectionValue::ImageUpload(file))) => file.is_some(),
        (OptionType::BooleanFlag, Some(SelectionValue::BooleanFlag(_))) => true,
        _ => false,
    }
}

/// Names of mandatory options that are not yet satisfied, in catalog order.
pub fn unsatisfied_options<'a>(catalog: &'a OptionCatalog, state: &SelectionState) -> Vec<&'a str> {
    catalog
        .iter()
        .filter(|o| !is_option_satisfied(o, state))
        .map(|o| o.name.as_str())
        .collect()
}

/// Whether every mandatory option is satisfied.
pub fn all_mandatory_satisfied(catalog: &OptionCatalog, state: &SelectionState) -> bool {
    catalog.iter().all(|o| is_option_satisfied(o, state))
}

/// Whether the add-to-cart action is available.
pub fn can_add_to_cart(
    catalog: &OptionCatalog,
    state: &SelectionState,
    final_price: Option<Decimal>,
) -> bool {
    final_price.is_some() && all_mandatory_satisfied(catalog, state)
}
