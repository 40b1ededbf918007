//! Product and image types.

use crate::catalog::OptionCatalog;
use crate::ids::{CategoryId, ImageId, ProductId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A product in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    /// Product title.
    pub title: String,
    /// URL-friendly slug (unique).
    pub slug: String,
    /// Full description.
    #[serde(default)]
    pub description: Option<String>,
    /// Price before option adjustments. `None` for made-to-order items
    /// priced on request; such products cannot be added to the cart.
    #[serde(default)]
    pub base_price: Option<Decimal>,
    /// Category this product belongs to.
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    /// Creation timestamp as stored by the backend (RFC 3339).
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Product {
    /// Create a new product.
    pub fn new(
        id: impl Into<ProductId>,
        title: impl Into<String>,
        slug: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            slug: slug.into(),
            description: None,
            base_price: None,
            category_id: None,
            created_at: None,
        }
    }

    pub fn with_price(mut self, price: Decimal) -> Self {
        self.base_price = Some(price);
        self
    }

    pub fn in_category(mut self, category_id: impl Into<CategoryId>) -> Self {
        self.category_id = Some(category_id.into());
        self
    }

    /// Relative storefront path of the product page.
    pub fn path(&self) -> String {
        format!("/product/{}", self.slug)
    }
}

/// An image attached to a product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductImage {
    pub id: ImageId,
    pub product_id: ProductId,
    pub url: String,
    #[serde(default)]
    pub alt: Option<String>,
}

/// Everything the product page needs: the product, its images, its options
/// and the name of its category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: Product,
    #[serde(default)]
    pub images: Vec<ProductImage>,
    #[serde(default, alias = "product_options")]
    pub options: OptionCatalog,
    #[serde(default)]
    pub category_name: Option<String>,
}

impl ProductDetail {
    pub fn new(product: Product) -> Self {
        Self {
            product,
            images: Vec::new(),
            options: OptionCatalog::empty(),
            category_name: None,
        }
    }

    pub fn with_options(mut self, options: impl Into<OptionCatalog>) -> Self {
        self.options = options.into();
        self
    }

    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        let position = self.images.len();
        self.images.push(ProductImage {
            id: ImageId::new(format!("{}-img-{}", self.product.id, position)),
            product_id: self.product.id.clone(),
            url: url.into(),
            alt: None,
        });
        self
    }

    /// URL of the first image, if the product has any.
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(|i| i.url.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{OptionType, ProductOption};

    #[test]
    fn test_product_creation() {
        let product = Product::new("p1", "Tazza", "tazza").with_price(Decimal::from(10));
        assert_eq!(product.slug, "tazza");
        assert_eq!(product.base_price, Some(Decimal::from(10)));
        assert_eq!(product.path(), "/product/tazza");
    }

    #[test]
    fn test_detail_deserializes_flat_record() {
        let json = r#"{
            "id": "p1",
            "title": "Tazza",
            "slug": "tazza",
            "description": null,
            "base_price": 10.5,
            "category_id": "c1",
            "images": [{"id": "i1", "product_id": "p1", "url": "/t.png", "alt": null}],
            "options": [{"id": "o1", "name": "nota", "option_type": "input_text"}]
        }"#;
        let detail: ProductDetail = serde_json::from_str(json).unwrap();
        assert_eq!(detail.product.base_price, Some(Decimal::new(105, 1)));
        assert_eq!(detail.primary_image(), Some("/t.png"));
        assert_eq!(detail.options.len(), 1);
        assert_eq!(detail.options.options()[0].option_type, OptionType::FreeText);
    }

    #[test]
    fn test_missing_price_is_none() {
        let json = r#"{"id": "p1", "title": "Su misura", "slug": "su-misura"}"#;
        let detail: ProductDetail = serde_json::from_str(json).unwrap();
        assert_eq!(detail.product.base_price, None);
        assert!(detail.options.is_empty());
    }

    #[test]
    fn test_with_options() {
        let detail = ProductDetail::new(Product::new("p1", "Tazza", "tazza"))
            .with_options(vec![ProductOption::new("o1", "colore", OptionType::SingleChoice)]);
        assert!(detail.options.get("colore").is_some());
    }
}
