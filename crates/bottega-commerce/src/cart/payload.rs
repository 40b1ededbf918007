//! Add-to-cart payload for the embedded cart widget.
//!
//! The widget reads a product from `data-item-*` attributes on the
//! add-to-cart button. Options become numbered custom fields of type
//! `textbox`, so the order summary shows exactly what the customer chose.

use crate::catalog::ProductDetail;
use crate::config::StorefrontConfig;
use crate::variant::{encode_variant, SelectionSnapshot, SelectionState, SelectionValue};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Field type used for every custom field.
pub const CUSTOM_FIELD_TYPE: &str = "textbox";

/// One option as shown in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomField {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
}

impl CustomField {
    pub fn textbox(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: CUSTOM_FIELD_TYPE.to_string(),
            value: value.into(),
        }
    }
}

/// Everything the cart widget needs to add one configured product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    /// Distinguishes configurations of the same product as separate lines.
    pub id: String,
    pub name: String,
    pub price: Option<Decimal>,
    pub url: String,
    pub image: String,
    pub currency: String,
    pub taxable: bool,
    pub weight: u32,
    pub custom_fields: Vec<CustomField>,
    /// Whether the add-to-cart button is enabled.
    pub enabled: bool,
}

impl CartItem {
    /// Build the cart item for the current selection.
    pub fn build(
        detail: &ProductDetail,
        snapshot: &SelectionSnapshot,
        config: &StorefrontConfig,
    ) -> Self {
        let product = &detail.product;
        Self {
            id: line_item_id(product.id.as_str(), &snapshot.selected_values),
            name: product.title.clone(),
            price: snapshot.final_price.or(product.base_price),
            url: product.path(),
            image: detail
                .primary_image()
                .unwrap_or(&config.placeholder_image)
                .to_string(),
            currency: config.currency.clone(),
            taxable: false,
            weight: 0,
            custom_fields: custom_fields(&snapshot.selected_values, config),
            enabled: snapshot.can_add_to_cart(),
        }
    }

    /// The button's `data-item-*` attributes, in a stable order.
    pub fn data_attributes(&self) -> Vec<(String, String)> {
        let mut attrs = vec![
            ("data-item-id".to_string(), self.id.clone()),
            ("data-item-name".to_string(), self.name.clone()),
            (
                "data-item-price".to_string(),
                self.price.map(|p| p.normalize().to_string()).unwrap_or_default(),
            ),
            ("data-item-url".to_string(), self.url.clone()),
            ("data-item-image".to_string(), self.image.clone()),
            ("data-item-currency".to_string(), self.currency.clone()),
            ("data-item-taxable".to_string(), self.taxable.to_string()),
            ("data-item-weight".to_string(), self.weight.to_string()),
        ];
        for (i, field) in self.custom_fields.iter().enumerate() {
            let n = i + 1;
            attrs.push((format!("data-item-custom{}-name", n), field.name.clone()));
            attrs.push((format!("data-item-custom{}-type", n), field.kind.clone()));
            attrs.push((format!("data-item-custom{}-value", n), field.value.clone()));
        }
        attrs
    }
}

/// `{product_id}-{variant}`: the product id followed by the string-typed
/// selections.
pub fn line_item_id(product_id: &str, state: &SelectionState) -> String {
    format!("{}-{}", product_id, encode_variant(state))
}

/// One custom field per populated option, in selection order.
///
/// Lists are joined with `", "`, uploads are named by filename, and a ticked
/// checkbox shows the configured yes label. Empty text, empty lists, missing
/// uploads and unticked checkboxes are left out.
pub fn custom_fields(state: &SelectionState, config: &StorefrontConfig) -> Vec<CustomField> {
    state
        .iter()
        .filter_map(|(name, value)| {
            let shown = match value {
                SelectionValue::SingleChoice(Some(s))
                | SelectionValue::ImageChoice(Some(s))
                | SelectionValue::LetterChoice(s)
                | SelectionValue::FreeText(s)
                    if !s.is_empty() =>
                {
                    s.clone()
                }
                SelectionValue::MultiChoice(values) if !values.is_empty() => values.join(", "),
                SelectionValue::ImageUpload(Some(file)) => file.filename.clone(),
                SelectionValue::BooleanFlag(true) => config.bool_label(true).to_string(),
                _ => return None,
            };
            Some(CustomField::textbox(name, shown))
        })
        .collect()
}
