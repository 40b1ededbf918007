//! Cart integration.
//!
//! The cart itself lives in a hosted widget; this module produces what the
//! widget needs to add a configured product.

mod payload;

pub use payload::{custom_fields, line_item_id, CartItem, CustomField, CUSTOM_FIELD_TYPE};
