//! Configurable product options.

use crate::error::CommerceError;
use crate::ids::{OptionId, OptionValueId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The kind of input an option asks the customer for.
///
/// The backend stores the storefront's historical names (`option_list`,
/// `character`, ...); both those and the snake_case names below deserialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionType {
    /// Pick exactly one value from a list.
    #[serde(alias = "option_list")]
    SingleChoice,
    /// Pick any number of values from a list.
    #[serde(alias = "option_list_multi")]
    MultiChoice,
    /// Pick a letter A-Z (e.g. an engraved initial).
    #[serde(alias = "character")]
    LetterChoice,
    /// Type free text.
    #[serde(alias = "input_text")]
    FreeText,
    /// Upload an image file.
    #[serde(alias = "image_input")]
    ImageUpload,
    /// Pick one value from a list of pictures.
    #[serde(alias = "image_option_list")]
    ImageChoice,
    /// Tick a checkbox.
    #[serde(alias = "checkbox")]
    BooleanFlag,
}

impl OptionType {
    pub const ALL: [OptionType; 7] = [
        OptionType::SingleChoice,
        OptionType::MultiChoice,
        OptionType::LetterChoice,
        OptionType::FreeText,
        OptionType::ImageUpload,
        OptionType::ImageChoice,
        OptionType::BooleanFlag,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OptionType::SingleChoice => "single_choice",
            OptionType::MultiChoice => "multi_choice",
            OptionType::LetterChoice => "letter_choice",
            OptionType::FreeText => "free_text",
            OptionType::ImageUpload => "image_upload",
            OptionType::ImageChoice => "image_choice",
            OptionType::BooleanFlag => "boolean_flag",
        }
    }

    /// Whether options of this type carry a list of discrete values.
    pub fn uses_values(&self) -> bool {
        matches!(
            self,
            OptionType::SingleChoice | OptionType::MultiChoice | OptionType::ImageChoice
        )
    }

    /// Whether a selected value of this type contributes to the price.
    ///
    /// Multi-choice values carry a `price_delta` but are not summed.
    pub fn is_priced(&self) -> bool {
        matches!(self, OptionType::SingleChoice | OptionType::ImageChoice)
    }

    /// Whether the selection for this type is a plain string (and so
    /// survives the `variant` URL parameter).
    pub fn is_string_typed(&self) -> bool {
        matches!(
            self,
            OptionType::SingleChoice
                | OptionType::LetterChoice
                | OptionType::FreeText
                | OptionType::ImageChoice
        )
    }
}

impl FromStr for OptionType {
    type Err = CommerceError;

    /// Parse either naming scheme, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "single_choice" | "option_list" => Ok(OptionType::SingleChoice),
            "multi_choice" | "option_list_multi" => Ok(OptionType::MultiChoice),
            "letter_choice" | "character" => Ok(OptionType::LetterChoice),
            "free_text" | "input_text" => Ok(OptionType::FreeText),
            "image_upload" | "image_input" => Ok(OptionType::ImageUpload),
            "image_choice" | "image_option_list" => Ok(OptionType::ImageChoice),
            "boolean_flag" | "checkbox" => Ok(OptionType::BooleanFlag),
            _ => Err(CommerceError::Serialization(format!(
                "unknown option type {:?}",
                s
            ))),
        }
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Length hints for free-text options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationRules {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,
}

impl ValidationRules {
    /// Human-readable hint shown under a free-text input, if any rule is set.
    pub fn hint(&self) -> Option<String> {
        let min = self.min_length.filter(|n| *n > 0);
        let max = self.max_length.filter(|n| *n > 0);
        match (min, max) {
            (Some(min), Some(max)) => {
                Some(format!("Minimo {} caratteri • Massimo {} caratteri", min, max))
            }
            (Some(min), None) => Some(format!("Minimo {} caratteri", min)),
            (None, Some(max)) => Some(format!("Massimo {} caratteri", max)),
            (None, None) => None,
        }
    }
}

/// One selectable choice of a list-style option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionValue {
    pub id: OptionValueId,
    /// Display label; also the key stored in the selection.
    pub value: String,
    #[serde(default)]
    pub image_url: Option<String>,
    /// Signed adjustment to the base price when selected.
    #[serde(default)]
    pub price_delta: Option<Decimal>,
}

impl OptionValue {
    pub fn new(id: impl Into<OptionValueId>, value: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            value: value.into(),
            image_url: None,
            price_delta: None,
        }
    }

    pub fn with_price_delta(mut self, delta: Decimal) -> Self {
        self.price_delta = Some(delta);
        self
    }

    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    /// The price delta, treating a missing value as zero.
    pub fn delta(&self) -> Decimal {
        self.price_delta.unwrap_or(Decimal::ZERO)
    }
}

/// A named, typed configurable attribute of a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductOption {
    pub id: OptionId,
    /// Unique within a product.
    pub name: String,
    #[serde(rename = "option_type", alias = "type")]
    pub option_type: OptionType,
    #[serde(default)]
    pub is_mandatory: bool,
    #[serde(default)]
    pub placeholder: Option<String>,
    /// Only meaningful for free-text options.
    #[serde(default)]
    pub validation_rules: Option<ValidationRules>,
    /// Only present for choice options.
    #[serde(default, alias = "product_option_values", deserialize_with = "null_as_empty")]
    pub values: Vec<OptionValue>,
}

impl ProductOption {
    pub fn new(id: impl Into<OptionId>, name: impl Into<String>, option_type: OptionType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            option_type,
            is_mandatory: false,
            placeholder: None,
            validation_rules: None,
            values: Vec::new(),
        }
    }

    pub fn mandatory(mut self) -> Self {
        self.is_mandatory = true;
        self
    }

    pub fn with_value(mut self, value: OptionValue) -> Self {
        self.values.push(value);
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn with_rules(mut self, rules: ValidationRules) -> Self {
        self.validation_rules = Some(rules);
        self
    }

    /// Look up a listed value by its label.
    pub fn find_value(&self, label: &str) -> Option<&OptionValue> {
        self.values.iter().find(|v| v.value == label)
    }

    /// Validation rules, honored only for free-text options.
    pub fn effective_rules(&self) -> Option<&ValidationRules> {
        match self.option_type {
            OptionType::FreeText => self.validation_rules.as_ref(),
            _ => None,
        }
    }

    /// Label shown for inputs without a configured placeholder.
    pub fn placeholder_or_default(&self) -> String {
        match (&self.placeholder, self.option_type) {
            (Some(p), _) if !p.is_empty() => p.clone(),
            (_, OptionType::BooleanFlag) => format!("Seleziona {}", self.name),
            _ => format!("Inserisci {}", self.name),
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<OptionValue>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<OptionValue>>::deserialize(deserializer)?.unwrap_or_default())
}

/// The ordered set of options attached to one product.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionCatalog {
    options: Vec<ProductOption>,
}

impl OptionCatalog {
    pub fn new(options: Vec<ProductOption>) -> Self {
        Self { options }
    }

    /// A catalog with no options; what a failed catalog load degrades to.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn options(&self) -> &[ProductOption] {
        &self.options
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ProductOption> {
        self.options.iter()
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&ProductOption> {
        self.options.iter().find(|o| o.name == name)
    }

    /// Identity of the option set: each option's `name:type:id`, joined by `|`.
    ///
    /// Two catalogs with the same signature produce the same initial
    /// selection.
    pub fn signature(&self) -> String {
        self.options
            .iter()
            .map(|o| format!("{}:{}:{}", o.name, o.option_type, o.id))
            .collect::<Vec<_>>()
            .join("|")
    }
}

impl From<Vec<ProductOption>> for OptionCatalog {
    fn from(options: Vec<ProductOption>) -> Self {
        Self::new(options)
    }
}

impl<'a> IntoIterator for &'a OptionCatalog {
    type Item = &'a ProductOption;
    type IntoIter = std::slice::Iter<'a, ProductOption>;

    fn into_iter(self) -> Self::IntoIter {
        self.options.iter()
    }
}
