//! Typed selection values.

use crate::catalog::OptionType;
use serde::{Deserialize, Serialize};

/// Letter stored for optional letter-choice options that have no letter.
///
/// A letter option whose value list literally contained `"none"` would be
/// indistinguishable from "unset"; letter options only offer A-Z.
pub const LETTER_NONE: &str = "none";

/// The letters offered by letter-choice options.
pub fn alphabet() -> impl Iterator<Item = char> {
    'A'..='Z'
}

/// Opaque handle to an image the customer picked for upload.
///
/// The engine never reads the file; the upload collaborator resolves the
/// handle once the order is placed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileRef {
    pub handle: String,
    pub filename: String,
}

impl FileRef {
    pub fn new(handle: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            handle: handle.into(),
            filename: filename.into(),
        }
    }
}

/// The current value of one option, shaped by the option's type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum SelectionValue {
    SingleChoice(Option<String>),
    MultiChoice(Vec<String>),
    /// `"A"`..`"Z"`, or [`LETTER_NONE`].
    LetterChoice(String),
    FreeText(String),
    ImageUpload(Option<FileRef>),
    ImageChoice(Option<String>),
    BooleanFlag(bool),
}

impl SelectionValue {
    /// The option type this value belongs to.
    pub fn option_type(&self) -> OptionType {
        match self {
            SelectionValue::SingleChoice(_) => OptionType::SingleChoice,
            SelectionValue::MultiChoice(_) => OptionType::MultiChoice,
            SelectionValue::LetterChoice(_) => OptionType::LetterChoice,
            SelectionValue::FreeText(_) => OptionType::FreeText,
            SelectionValue::ImageUpload(_) => OptionType::ImageUpload,
            SelectionValue::ImageChoice(_) => OptionType::ImageChoice,
            SelectionValue::BooleanFlag(_) => OptionType::BooleanFlag,
        }
    }

    /// Name of the payload shape, for error messages.
    pub fn shape(&self) -> &'static str {
        match self {
            SelectionValue::SingleChoice(_)
            | SelectionValue::LetterChoice(_)
            | SelectionValue::FreeText(_)
            | SelectionValue::ImageChoice(_) => "string",
            SelectionValue::MultiChoice(_) => "list",
            SelectionValue::ImageUpload(_) => "file",
            SelectionValue::BooleanFlag(_) => "boolean",
        }
    }

    /// The value as a string, for string-typed options with a value present.
    ///
    /// Empty strings are returned as-is; callers filter them.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            SelectionValue::SingleChoice(v) | SelectionValue::ImageChoice(v) => v.as_deref(),
            SelectionValue::LetterChoice(s) | SelectionValue::FreeText(s) => Some(s.as_str()),
            SelectionValue::MultiChoice(_)
            | SelectionValue::ImageUpload(_)
            | SelectionValue::BooleanFlag(_) => None,
        }
    }

    /// The value as a non-empty string; what the URL and line-item id carry.
    pub fn as_nonempty_str(&self) -> Option<&str> {
        self.as_str().filter(|s| !s.is_empty())
    }

    /// Build a string-typed value for the given option type.
    ///
    /// Returns `None` for types whose value is not a string.
    pub fn from_string(option_type: OptionType, value: impl Into<String>) -> Option<Self> {
        if !option_type.is_string_typed() {
            return None;
        }
        let value = value.into();
        Some(match option_type {
            OptionType::SingleChoice => SelectionValue::SingleChoice(Some(value)),
            OptionType::ImageChoice => SelectionValue::ImageChoice(Some(value)),
            OptionType::LetterChoice => SelectionValue::LetterChoice(value),
            _ => SelectionValue::FreeText(value),
        })
    }
}
