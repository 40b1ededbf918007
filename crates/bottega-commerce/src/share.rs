//! Shareable product links and customization requests.

use crate::error::CommerceError;
use crate::ids::ProductId;
use crate::variant::{decode_variant, form_encode, VARIANT_PARAM};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Absolute link to a product page, carrying the variant when there is one.
pub fn build_product_share_url(site_url: &str, slug: &str, variant: Option<&str>) -> String {
    let base = format!("{}/product/{}", site_url.trim_end_matches('/'), slug);
    match variant.filter(|v| !v.is_empty()) {
        Some(v) => format!("{}?{}={}", base, VARIANT_PARAM, form_encode(v)),
        None => base,
    }
}

/// A customer's request for a bespoke version of a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomizationRequest {
    pub product_id: ProductId,
    /// Kept for the backend's record shape; the storefront never sets it.
    pub selected_material: Option<String>,
    pub selected_variants: BTreeMap<String, String>,
    pub user_name: String,
    pub user_email: String,
    #[serde(default)]
    pub notes: Option<String>,
}

impl CustomizationRequest {
    /// Build and validate a request from the page's `variant` parameter.
    ///
    /// Name and email are trimmed; blank notes are dropped.
    pub fn new(
        product_id: impl Into<ProductId>,
        variant: Option<&str>,
        user_name: &str,
        user_email: &str,
        notes: Option<&str>,
    ) -> Result<Self, CommerceError> {
        let user_name = user_name.trim();
        let user_email = user_email.trim();

        if user_name.is_empty() {
            return Err(CommerceError::InvalidRequest("name is required".into()));
        }
        if user_email.is_empty() {
            return Err(CommerceError::InvalidRequest("email is required".into()));
        }
        if !user_email.contains('@') {
            return Err(CommerceError::InvalidRequest(format!(
                "invalid email address: {}",
                user_email
            )));
        }

        Ok(Self {
            product_id: product_id.into(),
            selected_material: None,
            selected_variants: selected_variants(variant.unwrap_or_default()),
            user_name: user_name.to_string(),
            user_email: user_email.to_string(),
            notes: notes
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(str::to_string),
        })
    }
}

/// Expand a variant string into a name to value map. Later duplicates win.
pub fn selected_variants(variant: &str) -> BTreeMap<String, String> {
    decode_variant(variant)
        .into_iter()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect()
}
