//! Commerce error types.

use thiserror::Error;

/// Result type for storefront operations.
pub type CommerceResult<T> = Result<T, CommerceError>;

/// Errors that can occur in storefront operations.
///
/// The variant engine's pure functions (initialize, price, validate,
/// encode/decode) never produce these; only typed selection changes and
/// collaborator calls do.
#[derive(Error, Debug)]
pub enum CommerceError {
    /// Product not found.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// A selection change named an option the product does not have.
    #[error("Unknown option: {0}")]
    UnknownOption(String),

    /// A selection change carried the wrong shape for the option's type.
    #[error("Option {option} expects a {expected} value, got {got}")]
    SelectionMismatch {
        option: String,
        expected: &'static str,
        got: &'static str,
    },

    /// A choice was made that the option does not list.
    #[error("Value {value:?} is not a choice of option {option}")]
    ValueNotInOption { option: String, value: String },

    /// A customization request failed validation.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Catalog store error.
    #[error("Store error: {0}")]
    Store(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for CommerceError {
    fn from(e: serde_json::Error) -> Self {
        CommerceError::Serialization(e.to_string())
    }
}

impl From<toml::de::Error> for CommerceError {
    fn from(e: toml::de::Error) -> Self {
        CommerceError::Config(e.to_string())
    }
}
