//! Product variant engine.
//!
//! Maps a product's option set and the customer's choices to a validated
//! selection, a price, and the `variant` URL parameter.

mod codec;
mod display;
mod notifier;
mod pricing;
mod state;
mod validation;
mod value;

pub use codec::{
    decode_variant, encode_pairs, encode_variant, form_decode, form_encode, variant_from_query,
    variant_query, VARIANT_PARAM,
};
pub use display::{preview_image, price_text};
pub use notifier::{
    CatalogChanged, Navigator, NoopNavigator, ProductLoader, SelectionObserver, SelectionSnapshot,
    VariantSelector,
};
pub use pricing::{price_selection, VariantPrice};
pub use state::{SelectionChange, SelectionEntry, SelectionState};
pub use validation::{
    all_mandatory_satisfied, can_add_to_cart, is_option_satisfied, unsatisfied_options,
};
pub use value::{alphabet, FileRef, SelectionValue, LETTER_NONE};
