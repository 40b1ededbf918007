//! Storefront domain types and logic for Bottega, a shop of handmade goods.
//!
//! Each product carries an ordered set of configurable options (colour
//! lists, engraved initials, free text, photo uploads, checkboxes). This
//! crate turns those options and the customer's choices into a validated
//! selection with a price:
//!
//! - **Variant**: selection state, pricing, validation, the `variant` URL
//!   parameter and change notification
//! - **Catalog**: products, options, categories, the catalog store, back-office
//!   drafts
//! - **Cart**: the payload handed to the hosted cart widget
//! - **Search**: catalog listing and text search
//! - **Favorites**: the per-session favorites list
//! - **Sitemap**: the public page list for search engines
//!
//! # Example
//!
//! ```rust
//! use bottega_commerce::prelude::*;
//! use rust_decimal::Decimal;
//!
//! let detail = ProductDetail::new(
//!     Product::new("p1", "Tazza dipinta", "tazza-dipinta").with_price(Decimal::from(10)),
//! )
//! .with_options(vec![ProductOption::new("o1", "colore", OptionType::SingleChoice)
//!     .mandatory()
//!     .with_value(OptionValue::new("v1", "rosso").with_price_delta(Decimal::from(2)))
//!     .with_value(OptionValue::new("v2", "blu"))]);
//!
//! let mut selector = VariantSelector::new(detail.product.path(), NoopNavigator);
//! let snapshot = selector.on_catalog_changed(CatalogChanged::from_detail(&detail, None));
//! assert_eq!(snapshot.final_price, Some(Decimal::from(12)));
//!
//! let snapshot = selector.apply(SelectionChange::select("colore", "blu")).unwrap();
//! assert_eq!(snapshot.final_price, Some(Decimal::from(10)));
//! assert_eq!(snapshot.variant, "colore:blu");
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod cart;
pub mod catalog;
pub mod config;
pub mod favorites;
pub mod search;
pub mod share;
pub mod sitemap;
pub mod variant;

pub use config::{SiteConfig, StorefrontConfig};
pub use error::{CommerceError, CommerceResult};
pub use ids::*;
pub use money::{format_eur, format_optional};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::config::{SiteConfig, StorefrontConfig};
    pub use crate::error::{CommerceError, CommerceResult};
    pub use crate::ids::*;
    pub use crate::money::{format_eur, format_optional};

    // Catalog
    pub use crate::catalog::{
        CatalogBackup, CatalogStore, Category, CategoryTree, InMemoryCatalog, OptionCatalog,
        OptionType, OptionValue, Product, ProductDetail, ProductOption, ValidationRules,
    };

    // Variant engine
    pub use crate::variant::{
        can_add_to_cart, decode_variant, encode_variant, is_option_satisfied, price_selection,
        CatalogChanged, FileRef, Navigator, NoopNavigator, ProductLoader, SelectionChange,
        SelectionSnapshot, SelectionState, SelectionValue, VariantPrice, VariantSelector,
    };

    // Cart
    pub use crate::cart::{CartItem, CustomField};

    // Search
    pub use crate::search::{search_catalog, CatalogQuery, SortField, SortOrder};

    // Sharing and favorites
    pub use crate::favorites::{FavoriteChange, Favorites, MemoryStorage, SessionStorage};
    pub use crate::share::{build_product_share_url, CustomizationRequest};
    pub use crate::sitemap::{build_sitemap, render_sitemap_xml, SitemapEntry};
}
