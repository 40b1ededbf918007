//! Catalog storage.
//!
//! The storefront reads categories, products and site settings through
//! [`CatalogStore`]. [`InMemoryCatalog`] serves them from a JSON document.

use crate::catalog::{Category, Product, ProductDetail};
use crate::config::SiteConfig;
use crate::error::{CommerceError, CommerceResult};
use crate::ids::ProductId;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

/// Read access to the catalog backend.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// All categories, roots and subcategories.
    async fn categories(&self) -> CommerceResult<Vec<Category>>;

    /// All products, without images or options.
    async fn products(&self) -> CommerceResult<Vec<Product>>;

    /// One product with its images and options.
    async fn product_detail(&self, slug: &str) -> CommerceResult<ProductDetail>;

    /// Products with the given ids, in catalog order. Unknown ids are skipped.
    async fn products_by_ids(&self, ids: &[ProductId]) -> CommerceResult<Vec<Product>>;

    /// Contact details of the shop.
    async fn site_config(&self) -> CommerceResult<SiteConfig>;
}

/// On-disk shape of a catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogDocument {
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub products: Vec<ProductDetail>,
    #[serde(default)]
    pub site: SiteConfig,
}

/// A catalog held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    document: CatalogDocument,
}

impl InMemoryCatalog {
    pub fn new(document: CatalogDocument) -> Self {
        Self { document }
    }

    pub fn from_json(json: &str) -> CommerceResult<Self> {
        let document: CatalogDocument = serde_json::from_str(json)?;
        debug!(
            categories = document.categories.len(),
            products = document.products.len(),
            "catalog loaded"
        );
        Ok(Self::new(document))
    }

    pub fn load(path: impl AsRef<Path>) -> CommerceResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            CommerceError::Store(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json(&json)
    }

    pub fn document(&self) -> &CatalogDocument {
        &self.document
    }
}

#[async_trait]
impl CatalogStore for InMemoryCatalog {
    async fn categories(&self) -> CommerceResult<Vec<Category>> {
        Ok(self.document.categories.clone())
    }

    async fn products(&self) -> CommerceResult<Vec<Product>> {
        Ok(self
            .document
            .products
            .iter()
            .map(|d| d.product.clone())
            .collect())
    }

    async fn product_detail(&self, slug: &str) -> CommerceResult<ProductDetail> {
        let mut detail = self
            .document
            .products
            .iter()
            .find(|d| d.product.slug == slug)
            .cloned()
            .ok_or_else(|| CommerceError::ProductNotFound(slug.to_string()))?;

        if detail.category_name.is_none() {
            detail.category_name = detail.product.category_id.as_ref().and_then(|id| {
                self.document
                    .categories
                    .iter()
                    .find(|c| &c.id == id)
                    .map(|c| c.name.clone())
            });
        }
        Ok(detail)
    }

    async fn products_by_ids(&self, ids: &[ProductId]) -> CommerceResult<Vec<Product>> {
        Ok(self
            .document
            .products
            .iter()
            .filter(|d| ids.contains(&d.product.id))
            .map(|d| d.product.clone())
            .collect())
    }

    async fn site_config(&self) -> CommerceResult<SiteConfig> {
        Ok(self.document.site.clone())
    }
}

/// Split the favorites `ids` parameter on commas, dropping empty entries.
pub fn parse_ids_param(raw: &str) -> Vec<ProductId> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(ProductId::from)
        .collect()
}

/// Resolve the favorites `ids` parameter to products.
///
/// Store failures are logged and yield an empty list.
pub async fn favorite_products(store: &dyn CatalogStore, raw_ids: &str) -> Vec<Product> {
    let ids = parse_ids_param(raw_ids);
    if ids.is_empty() {
        return Vec::new();
    }
    match store.products_by_ids(&ids).await {
        Ok(products) => products,
        Err(e) => {
            warn!(error = %e, "favorites lookup failed");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::OptionType;
    use rust_decimal::Decimal;

    const CATALOG: &str = r#"{
        "categories": [
            {"id": "c1", "name": "Ceramiche", "slug": "ceramiche"},
            {"id": "c2", "name": "Tazze", "slug": "tazze", "parent_id": "c1"}
        ],
        "products": [
            {
                "id": "p1",
                "title": "Tazza dipinta",
                "slug": "tazza-dipinta",
                "base_price": "10.00",
                "category_id": "c2",
                "images": [
                    {"id": "i1", "product_id": "p1", "url": "/tazza.png"}
                ],
                "options": [
                    {
                        "id": "o1",
                        "name": "colore",
                        "type": "option_list",
                        "is_mandatory": true,
                        "product_option_values": [
                            {"id": "v1", "value": "rosso", "price_delta": 2},
                            {"id": "v2", "value": "blu", "price_delta": null}
                        ]
                    },
                    {"id": "o2", "name": "nota", "type": "input_text", "product_option_values": null}
                ]
            },
            {"id": "p2", "title": "Vaso", "slug": "vaso", "base_price": 30}
        ],
        "site": {"email": "ciao@bottega.example"}
    }"#;

    struct FailingStore;

    #[async_trait]
    impl CatalogStore for FailingStore {
        async fn categories(&self) -> CommerceResult<Vec<Category>> {
            Err(CommerceError::Store("offline".into()))
        }

        async fn products(&self) -> CommerceResult<Vec<Product>> {
            Err(CommerceError::Store("offline".into()))
        }

        async fn product_detail(&self, slug: &str) -> CommerceResult<ProductDetail> {
            Err(CommerceError::ProductNotFound(slug.to_string()))
        }

        async fn products_by_ids(&self, _ids: &[ProductId]) -> CommerceResult<Vec<Product>> {
            Err(CommerceError::Store("offline".into()))
        }

        async fn site_config(&self) -> CommerceResult<SiteConfig> {
            Err(CommerceError::Store("offline".into()))
        }
    }

    #[tokio::test]
    async fn test_product_detail_from_backend_names() {
        let store = InMemoryCatalog::from_json(CATALOG).unwrap();
        let detail = store.product_detail("tazza-dipinta").await.unwrap();

        assert_eq!(detail.product.base_price, Some(Decimal::new(1000, 2)));
        assert_eq!(detail.category_name.as_deref(), Some("Tazze"));
        assert_eq!(detail.primary_image(), Some("/tazza.png"));
        assert_eq!(detail.options.len(), 2);

        let colore = detail.options.get("colore").unwrap();
        assert_eq!(colore.option_type, OptionType::SingleChoice);
        assert!(colore.is_mandatory);
        assert_eq!(colore.values[0].delta(), Decimal::from(2));
        assert_eq!(colore.values[1].delta(), Decimal::ZERO);

        let nota = detail.options.get("nota").unwrap();
        assert_eq!(nota.option_type, OptionType::FreeText);
        assert!(nota.values.is_empty());
    }

    #[tokio::test]
    async fn test_missing_product() {
        let store = InMemoryCatalog::from_json(CATALOG).unwrap();
        let err = store.product_detail("nope").await.unwrap_err();
        assert!(matches!(err, CommerceError::ProductNotFound(_)));
    }

    #[tokio::test]
    async fn test_products_and_site() {
        let store = InMemoryCatalog::from_json(CATALOG).unwrap();
        assert_eq!(store.products().await.unwrap().len(), 2);
        assert_eq!(store.categories().await.unwrap().len(), 2);
        assert_eq!(
            store.site_config().await.unwrap().email.as_deref(),
            Some("ciao@bottega.example")
        );
    }

    #[test]
    fn test_parse_ids_param() {
        let ids = parse_ids_param("p1,,p2, ");
        assert_eq!(ids, vec![ProductId::new("p1"), ProductId::new("p2")]);
        assert!(parse_ids_param("").is_empty());
    }

    #[tokio::test]
    async fn test_favorite_products() {
        let store = InMemoryCatalog::from_json(CATALOG).unwrap();
        let products = favorite_products(&store, "p2,missing").await;
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].title, "Vaso");

        assert!(favorite_products(&store, "").await.is_empty());
    }

    #[tokio::test]
    async fn test_favorite_products_swallows_store_errors() {
        assert!(favorite_products(&FailingStore, "p1").await.is_empty());
    }

    #[test]
    fn test_invalid_json_is_serialization_error() {
        let err = InMemoryCatalog::from_json("{").unwrap_err();
        assert!(matches!(err, CommerceError::Serialization(_)));
    }
}
