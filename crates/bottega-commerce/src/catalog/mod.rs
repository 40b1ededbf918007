//! Product catalog module.
//!
//! Products, their configurable options, the category hierarchy, the store
//! the storefront reads them from, back-office editing and backups.

mod authoring;
mod backup;
mod category;
mod option;
mod product;
mod store;

pub use authoring::{slugify, OptionDraft, ProductDraft, ValidationIssue, ValueDraft};
pub use backup::{CatalogBackup, ImportSummary, OptionRow, OptionValueRow, Upserted};
pub use category::{Category, CategoryGroup, CategoryTree, SlugRole};
pub use option::{OptionCatalog, OptionType, OptionValue, ProductOption, ValidationRules};
pub use product::{Product, ProductDetail, ProductImage};
pub use store::{
    favorite_products, parse_ids_param, CatalogDocument, CatalogStore, InMemoryCatalog,
};
