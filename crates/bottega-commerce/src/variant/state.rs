//! Selection state and its initializer.

use crate::catalog::{OptionCatalog, OptionType, ProductOption};
use crate::error::CommerceError;
use crate::variant::value::{FileRef, SelectionValue, LETTER_NONE};
use serde::{Deserialize, Serialize};

/// One option's current value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionEntry {
    pub name: String,
    pub value: SelectionValue,
}

/// The customer's current choice for every option of the product on view.
///
/// Entries keep catalog order; that order is the order of the `variant` URL
/// parameter, the line-item id and the cart custom fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectionState {
    entries: Vec<SelectionEntry>,
}

impl SelectionState {
    /// An empty state, before any catalog has loaded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Initial selection for a catalog: one entry per option, in order.
    ///
    /// Pure; calling it again with the same catalog yields the same state.
    pub fn initial(catalog: &OptionCatalog) -> Self {
        Self {
            entries: catalog
                .iter()
                .map(|option| SelectionEntry {
                    name: option.name.clone(),
                    value: default_value(option),
                })
                .collect(),
        }
    }

    /// Initial selection, with string-typed entries overridden by decoded
    /// `variant` pairs.
    ///
    /// Pairs naming unknown options, or options whose value is not a string,
    /// are ignored.
    pub fn seeded<'a, I>(catalog: &OptionCatalog, pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut state = Self::initial(catalog);
        for (name, raw) in pairs {
            let Some(option) = catalog.get(name) else {
                continue;
            };
            if let Some(value) = SelectionValue::from_string(option.option_type, raw) {
                state.put(name, value);
            }
        }
        state
    }

    pub fn get(&self, name: &str) -> Option<&SelectionValue> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| &e.value)
    }

    pub fn entries(&self) -> &[SelectionEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SelectionValue)> {
        self.entries.iter().map(|e| (e.name.as_str(), &e.value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Non-empty string values in state order, as `(name, value)`.
    pub fn string_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .filter_map(|e| e.value.as_nonempty_str().map(|v| (e.name.as_str(), v)))
    }

    /// Replace an entry's value, appending it if the name is new.
    fn put(&mut self, name: &str, value: SelectionValue) {
        match self.entries.iter_mut().find(|e| e.name == name) {
            Some(entry) => entry.value = value,
            None => self.entries.push(SelectionEntry {
                name: name.to_string(),
                value,
            }),
        }
    }

    /// Apply one customer action.
    ///
    /// The change is checked against the option's declared type before the
    /// state is touched; a rejected change leaves the state as it was.
    /// Returns the name of the changed option.
    pub fn apply(
        &mut self,
        catalog: &OptionCatalog,
        change: SelectionChange,
    ) -> Result<String, CommerceError> {
        let option = catalog
            .get(change.option_name())
            .ok_or_else(|| CommerceError::UnknownOption(change.option_name().to_string()))?;

        let value = match change {
            SelectionChange::Select { value, .. } => {
                if !matches!(
                    option.option_type,
                    OptionType::SingleChoice | OptionType::ImageChoice
                ) {
                    return Err(mismatch(option, option.option_type, "choice"));
                }
                let value = match value {
                    Some(label) if !label.is_empty() => {
                        if option.find_value(&label).is_none() {
                            return Err(CommerceError::ValueNotInOption {
                                option: option.name.clone(),
                                value: label,
                            });
                        }
                        Some(label)
                    }
                    _ => None,
                };
                match option.option_type {
                    OptionType::ImageChoice => SelectionValue::ImageChoice(value),
                    _ => SelectionValue::SingleChoice(value),
                }
            }
            SelectionChange::Toggle { value, .. } => {
                if option.option_type != OptionType::MultiChoice {
                    return Err(mismatch(option, option.option_type, "list"));
                }
                if option.find_value(&value).is_none() {
                    return Err(CommerceError::ValueNotInOption {
                        option: option.name.clone(),
                        value,
                    });
                }
                let mut current = match self.get(&option.name) {
                    Some(SelectionValue::MultiChoice(values)) => values.clone(),
                    _ => Vec::new(),
                };
                match current.iter().position(|v| *v == value) {
                    Some(index) => {
                        current.remove(index);
                    }
                    None => current.push(value),
                }
                SelectionValue::MultiChoice(current)
            }
            SelectionChange::Letter { letter, .. } => {
                if option.option_type != OptionType::LetterChoice {
                    return Err(mismatch(option, option.option_type, "letter"));
                }
                let letter = match letter {
                    // Clearing an optional letter stores the empty string,
                    // which drops it from the URL.
                    None => String::new(),
                    Some(c) if c.is_ascii_alphabetic() => c.to_ascii_uppercase().to_string(),
                    Some(c) => {
                        return Err(CommerceError::ValueNotInOption {
                            option: option.name.clone(),
                            value: c.to_string(),
                        })
                    }
                };
                SelectionValue::LetterChoice(letter)
            }
            SelectionChange::Text { text, .. } => {
                if option.option_type != OptionType::FreeText {
                    return Err(mismatch(option, option.option_type, "string"));
                }
                SelectionValue::FreeText(text)
            }
            SelectionChange::Upload { file, .. } => {
                if option.option_type != OptionType::ImageUpload {
                    return Err(mismatch(option, option.option_type, "file"));
                }
                SelectionValue::ImageUpload(file)
            }
            SelectionChange::Flag { checked, .. } => {
                if option.option_type != OptionType::BooleanFlag {
                    return Err(mismatch(option, option.option_type, "boolean"));
                }
                SelectionValue::BooleanFlag(checked)
            }
        };

        let name = option.name.clone();
        self.put(&name, value);
        Ok(name)
    }
}

fn mismatch(option: &ProductOption, declared: OptionType, got: &'static str) -> CommerceError {
    let expected = match declared {
        OptionType::SingleChoice | OptionType::ImageChoice => "choice",
        OptionType::MultiChoice => "list",
        OptionType::LetterChoice => "letter",
        OptionType::FreeText => "string",
        OptionType::ImageUpload => "file",
        OptionType::BooleanFlag => "boolean",
    };
    CommerceError::SelectionMismatch {
        option: option.name.clone(),
        expected,
        got,
    }
}

/// Default value for an option before the customer touches it.
fn default_value(option: &ProductOption) -> SelectionValue {
    match option.option_type {
        OptionType::LetterChoice => SelectionValue::LetterChoice(if option.is_mandatory {
            "A".to_string()
        } else {
            LETTER_NONE.to_string()
        }),
        OptionType::SingleChoice => {
            SelectionValue::SingleChoice(option.values.first().map(|v| v.value.clone()))
        }
        OptionType::MultiChoice => SelectionValue::MultiChoice(Vec::new()),
        OptionType::FreeText => SelectionValue::FreeText(String::new()),
        OptionType::ImageUpload => SelectionValue::ImageUpload(None),
        OptionType::ImageChoice => SelectionValue::ImageChoice(None),
        OptionType::BooleanFlag => SelectionValue::BooleanFlag(false),
    }
}

/// A single customer action on one option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionChange {
    /// Pick (or clear, with `None`) a value of a single- or image-choice option.
    Select {
        option: String,
        value: Option<String>,
    },
    /// Add or remove a value of a multi-choice option.
    Toggle { option: String, value: String },
    /// Pick a letter, or clear it with `None`.
    Letter { option: String, letter: Option<char> },
    /// Replace the text of a free-text option.
    Text { option: String, text: String },
    /// Attach or remove an upload.
    Upload {
        option: String,
        file: Option<FileRef>,
    },
    /// Tick or untick a checkbox.
    Flag { option: String, checked: bool },
}

impl SelectionChange {
    pub fn select(option: impl Into<String>, value: impl Into<String>) -> Self {
        SelectionChange::Select {
            option: option.into(),
            value: Some(value.into()),
        }
    }

    pub fn toggle(option: impl Into<String>, value: impl Into<String>) -> Self {
        SelectionChange::Toggle {
            option: option.into(),
            value: value.into(),
        }
    }

    pub fn letter(option: impl Into<String>, letter: char) -> Self {
        SelectionChange::Letter {
            option: option.into(),
            letter: Some(letter),
        }
    }

    pub fn text(option: impl Into<String>, text: impl Into<String>) -> Self {
        SelectionChange::Text {
            option: option.into(),
            text: text.into(),
        }
    }

    pub fn upload(option: impl Into<String>, file: FileRef) -> Self {
        SelectionChange::Upload {
            option: option.into(),
            file: Some(file),
        }
    }

    pub fn flag(option: impl Into<String>, checked: bool) -> Self {
        SelectionChange::Flag {
            option: option.into(),
            checked,
        }
    }

    pub fn option_name(&self) -> &str {
        match self {
            SelectionChange::Select { option, .. }
            | SelectionChange::Toggle { option, .. }
            | SelectionChange::Letter { option, .. }
            | SelectionChange::Text { option, .. }
            | SelectionChange::Upload { option, .. }
            | SelectionChange::Flag { option, .. } => option,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{OptionValue, ProductOption};

    fn catalog() -> OptionCatalog {
        OptionCatalog::new(vec![
            ProductOption::new("o1", "colore", OptionType::SingleChoice)
                .mandatory()
                .with_value(OptionValue::new("v1", "rosso"))
                .with_value(OptionValue::new("v2", "blu")),
            ProductOption::new("o2", "extra", OptionType::MultiChoice)
                .with_value(OptionValue::new("v3", "nastro"))
                .with_value(OptionValue::new("v4", "biglietto")),
            ProductOption::new("o3", "iniziale", OptionType::LetterChoice).mandatory(),
            ProductOption::new("o4", "seconda", OptionType::LetterChoice),
            ProductOption::new("o5", "nota", OptionType::FreeText),
            ProductOption::new("o6", "foto", OptionType::ImageUpload),
            ProductOption::new("o7", "motivo", OptionType::ImageChoice)
                .with_value(OptionValue::new("v5", "fiori")),
            ProductOption::new("o8", "regalo", OptionType::BooleanFlag),
            ProductOption::new("o9", "taglia", OptionType::SingleChoice),
        ])
    }

    #[test]
    fn test_initial_defaults_per_type() {
        let state = SelectionState::initial(&catalog());
        assert_eq!(state.len(), 9);
        assert_eq!(
            state.get("colore"),
            Some(&SelectionValue::SingleChoice(Some("rosso".into())))
        );
        assert_eq!(state.get("extra"), Some(&SelectionValue::MultiChoice(vec![])));
        assert_eq!(state.get("iniziale"), Some(&SelectionValue::LetterChoice("A".into())));
        assert_eq!(state.get("seconda"), Some(&SelectionValue::LetterChoice("none".into())));
        assert_eq!(state.get("nota"), Some(&SelectionValue::FreeText(String::new())));
        assert_eq!(state.get("foto"), Some(&SelectionValue::ImageUpload(None)));
        assert_eq!(state.get("motivo"), Some(&SelectionValue::ImageChoice(None)));
        assert_eq!(state.get("regalo"), Some(&SelectionValue::BooleanFlag(false)));
        assert_eq!(state.get("taglia"), Some(&SelectionValue::SingleChoice(None)));
    }

    #[test]
    fn test_initial_is_idempotent() {
        let c = catalog();
        assert_eq!(SelectionState::initial(&c), SelectionState::initial(&c));
    }

    #[test]
    fn test_initial_keeps_catalog_order() {
        let state = SelectionState::initial(&catalog());
        let names: Vec<_> = state.iter().map(|(n, _)| n).collect();
        assert_eq!(names[0], "colore");
        assert_eq!(names[8], "taglia");
    }

    #[test]
    fn test_seeded_only_overrides_string_types() {
        let c = catalog();
        let state = SelectionState::seeded(
            &c,
            vec![
                ("colore", "blu"),
                ("regalo", "true"),
                ("extra", "nastro"),
                ("ignota", "x"),
                ("nota", "ciao"),
            ],
        );
        assert_eq!(
            state.get("colore"),
            Some(&SelectionValue::SingleChoice(Some("blu".into())))
        );
        assert_eq!(state.get("regalo"), Some(&SelectionValue::BooleanFlag(false)));
        assert_eq!(state.get("extra"), Some(&SelectionValue::MultiChoice(vec![])));
        assert_eq!(state.get("nota"), Some(&SelectionValue::FreeText("ciao".into())));
        assert!(state.get("ignota").is_none());
        assert_eq!(state.len(), 9);
    }

    #[test]
    fn test_apply_select() {
        let c = catalog();
        let mut state = SelectionState::initial(&c);
        let name = state.apply(&c, SelectionChange::select("colore", "blu")).unwrap();
        assert_eq!(name, "colore");
        assert_eq!(
            state.get("colore"),
            Some(&SelectionValue::SingleChoice(Some("blu".into())))
        );
    }

    #[test]
    fn test_apply_select_unknown_value_is_rejected() {
        let c = catalog();
        let mut state = SelectionState::initial(&c);
        let before = state.clone();
        let err = state.apply(&c, SelectionChange::select("colore", "verde"));
        assert!(matches!(err, Err(CommerceError::ValueNotInOption { .. })));
        assert_eq!(state, before);
    }

    #[test]
    fn test_apply_toggle_adds_then_removes() {
        let c = catalog();
        let mut state = SelectionState::initial(&c);
        state.apply(&c, SelectionChange::toggle("extra", "nastro")).unwrap();
        state.apply(&c, SelectionChange::toggle("extra", "biglietto")).unwrap();
        assert_eq!(
            state.get("extra"),
            Some(&SelectionValue::MultiChoice(vec!["nastro".into(), "biglietto".into()]))
        );
        state.apply(&c, SelectionChange::toggle("extra", "nastro")).unwrap();
        assert_eq!(
            state.get("extra"),
            Some(&SelectionValue::MultiChoice(vec!["biglietto".into()]))
        );
    }

    #[test]
    fn test_apply_letter_uppercases_and_clears() {
        let c = catalog();
        let mut state = SelectionState::initial(&c);
        state.apply(&c, SelectionChange::letter("seconda", 'q')).unwrap();
        assert_eq!(state.get("seconda"), Some(&SelectionValue::LetterChoice("Q".into())));
        state
            .apply(
                &c,
                SelectionChange::Letter {
                    option: "seconda".into(),
                    letter: None,
                },
            )
            .unwrap();
        assert_eq!(state.get("seconda"), Some(&SelectionValue::LetterChoice(String::new())));
    }

    #[test]
    fn test_apply_non_letter_is_rejected() {
        let c = catalog();
        let mut state = SelectionState::initial(&c);
        let before = state.clone();
        for bad in ['7', ' ', 'è'] {
            let err = state
                .apply(&c, SelectionChange::letter("iniziale", bad))
                .unwrap_err();
            match err {
                CommerceError::ValueNotInOption { option, value } => {
                    assert_eq!(option, "iniziale");
                    assert_eq!(value, bad.to_string());
                }
                other => panic!("unexpected error: {other}"),
            }
        }
        assert_eq!(state, before);
        assert_eq!(state.get("iniziale"), Some(&SelectionValue::LetterChoice("A".into())));
    }

    #[test]
    fn test_apply_wrong_shape_is_rejected() {
        let c = catalog();
        let mut state = SelectionState::initial(&c);
        let err = state.apply(&c, SelectionChange::flag("nota", true)).unwrap_err();
        match err {
            CommerceError::SelectionMismatch {
                option,
                expected,
                got,
            } => {
                assert_eq!(option, "nota");
                assert_eq!(expected, "string");
                assert_eq!(got, "boolean");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_apply_unknown_option() {
        let c = catalog();
        let mut state = SelectionState::initial(&c);
        assert!(matches!(
            state.apply(&c, SelectionChange::text("missing", "x")),
            Err(CommerceError::UnknownOption(_))
        ));
    }

    #[test]
    fn test_apply_upload_and_flag() {
        let c = catalog();
        let mut state = SelectionState::initial(&c);
        state
            .apply(&c, SelectionChange::upload("foto", FileRef::new("blob-1", "cane.jpg")))
            .unwrap();
        state.apply(&c, SelectionChange::flag("regalo", true)).unwrap();
        assert_eq!(
            state.get("foto"),
            Some(&SelectionValue::ImageUpload(Some(FileRef::new("blob-1", "cane.jpg"))))
        );
        assert_eq!(state.get("regalo"), Some(&SelectionValue::BooleanFlag(true)));
    }

    #[test]
    fn test_string_pairs_skip_empty_and_non_strings() {
        let c = catalog();
        let state = SelectionState::initial(&c);
        let pairs: Vec<_> = state.string_pairs().collect();
        assert_eq!(
            pairs,
            vec![("colore", "rosso"), ("iniziale", "A"), ("seconda", "none")]
        );
    }
}
