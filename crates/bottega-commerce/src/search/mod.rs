//! Catalog search.
//!
//! Parses the catalog page's query parameters and runs them over the
//! product list.

mod catalog;
mod query;

pub use catalog::{search_catalog, sort_products};
pub use query::{CatalogQuery, SortField, SortOrder};
