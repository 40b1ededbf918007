//! Product editing for the shop's back office.
//!
//! Drafts hold what the admin form submits. Normalizing strips what the
//! option type does not use; validation lists every problem at once so the
//! form can mark them all.

use crate::catalog::{OptionType, ProductDetail, ValidationRules};
use crate::ids::CategoryId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// A list value as entered in the admin form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValueDraft {
    pub value: String,
    #[serde(default)]
    pub price_delta: Option<Decimal>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl ValueDraft {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            ..Self::default()
        }
    }
}

/// An option as entered in the admin form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionDraft {
    pub name: String,
    pub option_type: OptionType,
    #[serde(default)]
    pub is_mandatory: bool,
    #[serde(default)]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub validation_rules: Option<ValidationRules>,
    #[serde(default)]
    pub values: Vec<ValueDraft>,
}

impl OptionDraft {
    pub fn new(name: impl Into<String>, option_type: OptionType) -> Self {
        Self {
            name: name.into(),
            option_type,
            is_mandatory: false,
            placeholder: None,
            validation_rules: None,
            values: Vec::new(),
        }
    }

    pub fn with_value(mut self, value: ValueDraft) -> Self {
        self.values.push(value);
        self
    }

    /// Drop fields the option type does not use.
    ///
    /// Values survive only on list types and lose blank labels; length rules
    /// survive only on free text.
    pub fn normalize(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.placeholder = self
            .placeholder
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty());

        if self.option_type.uses_values() {
            self.values.retain(|v| !v.value.trim().is_empty());
            for v in &mut self.values {
                v.value = v.value.trim().to_string();
            }
        } else {
            self.values.clear();
        }

        if self.option_type != OptionType::FreeText {
            self.validation_rules = None;
        }
        self
    }
}

/// A product as entered in the admin form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductDraft {
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub base_price: Option<Decimal>,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    #[serde(default)]
    pub options: Vec<OptionDraft>,
}

impl ProductDraft {
    pub fn new(title: impl Into<String>) -> Self {
        let title = title.into();
        Self {
            slug: slugify(&title),
            title,
            ..Self::default()
        }
    }

    pub fn with_option(mut self, option: OptionDraft) -> Self {
        self.options.push(option);
        self
    }

    /// Draft for editing an existing product.
    pub fn from_detail(detail: &ProductDetail) -> Self {
        let product = &detail.product;
        Self {
            title: product.title.clone(),
            slug: product.slug.clone(),
            description: product.description.clone(),
            base_price: product.base_price,
            category_id: product.category_id.clone(),
            options: detail
                .options
                .iter()
                .map(|o| OptionDraft {
                    name: o.name.clone(),
                    option_type: o.option_type,
                    is_mandatory: o.is_mandatory,
                    placeholder: o.placeholder.clone(),
                    validation_rules: o.validation_rules,
                    values: o
                        .values
                        .iter()
                        .map(|v| ValueDraft {
                            value: v.value.clone(),
                            price_delta: v.price_delta,
                            image_url: v.image_url.clone(),
                        })
                        .collect(),
                })
                .collect(),
        }
    }

    /// Trim text fields, derive a missing slug and normalize every option.
    pub fn normalize(mut self) -> Self {
        self.title = self.title.trim().to_string();
        self.slug = if self.slug.trim().is_empty() {
            slugify(&self.title)
        } else {
            slugify(&self.slug)
        };
        self.options = self.options.into_iter().map(OptionDraft::normalize).collect();
        self
    }

    /// Everything wrong with the draft, in form order. Empty when valid.
    pub fn validate(&self) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        if self.title.trim().is_empty() {
            issues.push(ValidationIssue::MissingTitle);
        }
        if self.slug.trim().is_empty() {
            issues.push(ValidationIssue::MissingSlug);
        }

        let mut names = HashSet::new();
        for option in &self.options {
            let name = option.name.trim();
            if name.is_empty() {
                issues.push(ValidationIssue::UnnamedOption);
            } else if !names.insert(name) {
                issues.push(ValidationIssue::DuplicateOption(name.to_string()));
            }

            if option.option_type.uses_values() {
                let labels: Vec<&str> = option
                    .values
                    .iter()
                    .map(|v| v.value.trim())
                    .filter(|v| !v.is_empty())
                    .collect();
                if labels.is_empty() {
                    issues.push(ValidationIssue::NoValues(name.to_string()));
                }
                let mut seen = HashSet::new();
                for label in labels {
                    if !seen.insert(label) {
                        issues.push(ValidationIssue::DuplicateValue {
                            option: name.to_string(),
                            value: label.to_string(),
                        });
                    }
                }
            }

            if let Some(rules) = &option.validation_rules {
                if let (Some(min), Some(max)) = (rules.min_length, rules.max_length) {
                    if min > max {
                        issues.push(ValidationIssue::InvertedLength {
                            option: name.to_string(),
                            min,
                            max,
                        });
                    }
                }
            }
        }
        issues
    }
}

/// A problem found in a product draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "issue", content = "detail", rename_all = "snake_case")]
pub enum ValidationIssue {
    MissingTitle,
    MissingSlug,
    UnnamedOption,
    DuplicateOption(String),
    NoValues(String),
    DuplicateValue { option: String, value: String },
    InvertedLength { option: String, min: u32, max: u32 },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::MissingTitle => write!(f, "product title is empty"),
            ValidationIssue::MissingSlug => write!(f, "product slug is empty"),
            ValidationIssue::UnnamedOption => write!(f, "an option has no name"),
            ValidationIssue::DuplicateOption(name) => {
                write!(f, "option {:?} is defined more than once", name)
            }
            ValidationIssue::NoValues(name) => write!(f, "option {:?} has no values", name),
            ValidationIssue::DuplicateValue { option, value } => {
                write!(f, "option {:?} lists {:?} more than once", option, value)
            }
            ValidationIssue::InvertedLength { option, min, max } => write!(
                f,
                "option {:?} has minimum length {} above maximum {}",
                option, min, max
            ),
        }
    }
}

/// URL slug: lowercase ASCII alphanumerics separated by single dashes.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;
    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{OptionValue, Product, ProductOption};

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Tazza Dipinta a Mano"), "tazza-dipinta-a-mano");
        assert_eq!(slugify("  --Vaso   grande!! "), "vaso-grande");
        assert_eq!(slugify("Caffè"), "caff");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_normalize_strips_unused_fields() {
        let mut text = OptionDraft::new(" nota ", OptionType::FreeText)
            .with_value(ValueDraft::new("stray"));
        text.validation_rules = Some(ValidationRules {
            min_length: Some(2),
            max_length: Some(40),
        });
        let text = text.normalize();
        assert_eq!(text.name, "nota");
        assert!(text.values.is_empty());
        assert!(text.validation_rules.is_some());

        let mut list = OptionDraft::new("colore", OptionType::SingleChoice)
            .with_value(ValueDraft::new(" rosso "))
            .with_value(ValueDraft::new("  "));
        list.validation_rules = Some(ValidationRules::default());
        let list = list.normalize();
        assert_eq!(list.values, vec![ValueDraft::new("rosso")]);
        assert!(list.validation_rules.is_none());
    }

    #[test]
    fn test_product_normalize_derives_slug() {
        let draft = ProductDraft {
            title: " Vaso Blu ".into(),
            ..ProductDraft::default()
        }
        .normalize();
        assert_eq!(draft.title, "Vaso Blu");
        assert_eq!(draft.slug, "vaso-blu");
    }

    #[test]
    fn test_validate_reports_every_issue() {
        let mut rules = OptionDraft::new("nota", OptionType::FreeText);
        rules.validation_rules = Some(ValidationRules {
            min_length: Some(10),
            max_length: Some(5),
        });
        let draft = ProductDraft::default()
            .with_option(OptionDraft::new("colore", OptionType::SingleChoice))
            .with_option(
                OptionDraft::new("colore", OptionType::MultiChoice)
                    .with_value(ValueDraft::new("rosso"))
                    .with_value(ValueDraft::new("rosso")),
            )
            .with_option(OptionDraft::new("", OptionType::BooleanFlag))
            .with_option(rules);

        assert_eq!(
            draft.validate(),
            vec![
                ValidationIssue::MissingTitle,
                ValidationIssue::MissingSlug,
                ValidationIssue::NoValues("colore".into()),
                ValidationIssue::DuplicateOption("colore".into()),
                ValidationIssue::DuplicateValue {
                    option: "colore".into(),
                    value: "rosso".into()
                },
                ValidationIssue::UnnamedOption,
                ValidationIssue::InvertedLength {
                    option: "nota".into(),
                    min: 10,
                    max: 5
                },
            ]
        );
    }

    #[test]
    fn test_valid_draft_from_detail() {
        let detail = ProductDetail::new(Product::new("p1", "Tazza", "tazza")).with_options(vec![
            ProductOption::new("o1", "colore", OptionType::ImageChoice)
                .with_value(OptionValue::new("v1", "fiori").with_image("/fiori.png")),
            ProductOption::new("o2", "regalo", OptionType::BooleanFlag),
        ]);
        let draft = ProductDraft::from_detail(&detail);
        assert_eq!(draft.options.len(), 2);
        assert_eq!(draft.options[0].values[0].image_url.as_deref(), Some("/fiori.png"));
        assert!(draft.validate().is_empty());
    }

    #[test]
    fn test_issue_messages() {
        assert_eq!(
            ValidationIssue::NoValues("colore".into()).to_string(),
            "option \"colore\" has no values"
        );
    }
}
