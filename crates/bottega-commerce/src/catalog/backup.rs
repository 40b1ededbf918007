//! Whole-catalog backups.
//!
//! A backup is the catalog flattened into one list per backend table
//! (`categories`, `products`, `product_images`, `product_options`,
//! `product_option_values`, `config`). Importing a backup upserts every row
//! by id: rows with a known id replace the stored row, new ids are appended.

use crate::catalog::{
    CatalogDocument, Category, OptionCatalog, OptionType, OptionValue, Product, ProductDetail,
    ProductImage, ProductOption, ValidationRules,
};
use crate::config::SiteConfig;
use crate::error::CommerceResult;
use crate::ids::{OptionId, OptionValueId, ProductId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, warn};

/// A `product_options` row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionRow {
    pub id: OptionId,
    pub product_id: ProductId,
    pub name: String,
    #[serde(alias = "type")]
    pub option_type: OptionType,
    #[serde(default)]
    pub is_mandatory: bool,
    #[serde(default)]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub validation_rules: Option<ValidationRules>,
}

/// A `product_option_values` row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionValueRow {
    pub id: OptionValueId,
    pub option_id: OptionId,
    pub value: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub price_delta: Option<Decimal>,
}

/// The catalog as flat backend tables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogBackup {
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub product_images: Vec<ProductImage>,
    #[serde(default)]
    pub product_options: Vec<OptionRow>,
    #[serde(default)]
    pub product_option_values: Vec<OptionValueRow>,
    #[serde(default)]
    pub config: Vec<SiteConfig>,
}

/// Rows written to one table by an import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Upserted {
    pub inserted: usize,
    pub updated: usize,
}

impl Upserted {
    pub fn total(&self) -> usize {
        self.inserted + self.updated
    }
}

/// What an import changed, per table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub categories: Upserted,
    pub products: Upserted,
    pub product_images: Upserted,
    pub product_options: Upserted,
    pub product_option_values: Upserted,
    /// Whether the backup carried site settings.
    pub config: bool,
}

impl CatalogBackup {
    /// Flatten a catalog into tables.
    pub fn export(document: &CatalogDocument) -> Self {
        let mut backup = CatalogBackup {
            categories: document.categories.clone(),
            config: vec![document.site.clone()],
            ..CatalogBackup::default()
        };

        for detail in &document.products {
            let product_id = &detail.product.id;
            backup.products.push(detail.product.clone());
            backup.product_images.extend(detail.images.iter().cloned());
            for option in &detail.options {
                backup.product_options.push(OptionRow {
                    id: option.id.clone(),
                    product_id: product_id.clone(),
                    name: option.name.clone(),
                    option_type: option.option_type,
                    is_mandatory: option.is_mandatory,
                    placeholder: option.placeholder.clone(),
                    validation_rules: option.validation_rules,
                });
                backup
                    .product_option_values
                    .extend(option.values.iter().map(|value| OptionValueRow {
                        id: value.id.clone(),
                        option_id: option.id.clone(),
                        value: value.value.clone(),
                        image_url: value.image_url.clone(),
                        price_delta: value.price_delta,
                    }));
            }
        }

        backup
    }

    pub fn from_json(json: &str) -> CommerceResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reassemble the tables into a catalog.
    ///
    /// Images and options follow their product, values follow their option,
    /// each in table order. Rows pointing at a missing parent are dropped.
    /// The last `config` row becomes the site settings.
    pub fn restore(self) -> CatalogDocument {
        let CatalogBackup {
            categories,
            products,
            product_images,
            product_options,
            product_option_values,
            config,
        } = self;

        let product_ids: HashSet<&ProductId> = products.iter().map(|p| &p.id).collect();
        let option_ids: HashSet<&OptionId> = product_options
            .iter()
            .filter(|o| product_ids.contains(&o.product_id))
            .map(|o| &o.id)
            .collect();

        let orphans = product_images
            .iter()
            .filter(|i| !product_ids.contains(&i.product_id))
            .count()
            + product_options
                .iter()
                .filter(|o| !product_ids.contains(&o.product_id))
                .count()
            + product_option_values
                .iter()
                .filter(|v| !option_ids.contains(&v.option_id))
                .count();
        if orphans > 0 {
            warn!(rows = orphans, "dropping backup rows without a parent");
        }

        let details = products
            .iter()
            .map(|product| {
                let images = product_images
                    .iter()
                    .filter(|i| i.product_id == product.id)
                    .cloned()
                    .collect();
                let options: Vec<ProductOption> = product_options
                    .iter()
                    .filter(|o| o.product_id == product.id)
                    .map(|row| ProductOption {
                        id: row.id.clone(),
                        name: row.name.clone(),
                        option_type: row.option_type,
                        is_mandatory: row.is_mandatory,
                        placeholder: row.placeholder.clone(),
                        validation_rules: row.validation_rules,
                        values: product_option_values
                            .iter()
                            .filter(|v| v.option_id == row.id)
                            .map(|v| OptionValue {
                                id: v.id.clone(),
                                value: v.value.clone(),
                                image_url: v.image_url.clone(),
                                price_delta: v.price_delta,
                            })
                            .collect(),
                    })
                    .collect();
                ProductDetail {
                    product: product.clone(),
                    images,
                    options: OptionCatalog::new(options),
                    category_name: None,
                }
            })
            .collect();

        CatalogDocument {
            categories,
            products: details,
            site: config.into_iter().last().unwrap_or_default(),
        }
    }

    /// Upsert every row of `incoming` into these tables by id.
    pub fn merge(&mut self, incoming: CatalogBackup) -> ImportSummary {
        let summary = ImportSummary {
            categories: upsert(&mut self.categories, incoming.categories, |c| &c.id),
            products: upsert(&mut self.products, incoming.products, |p| &p.id),
            product_images: upsert(&mut self.product_images, incoming.product_images, |i| &i.id),
            product_options: upsert(&mut self.product_options, incoming.product_options, |o| {
                &o.id
            }),
            product_option_values: upsert(
                &mut self.product_option_values,
                incoming.product_option_values,
                |v| &v.id,
            ),
            config: !incoming.config.is_empty(),
        };
        if let Some(site) = incoming.config.into_iter().last() {
            self.config = vec![site];
        }
        debug!(
            products = summary.products.total(),
            options = summary.product_options.total(),
            "backup merged"
        );
        summary
    }
}

impl CatalogDocument {
    /// Import a backup into this catalog, upserting rows by id.
    pub fn import_backup(&mut self, backup: CatalogBackup) -> ImportSummary {
        let mut tables = CatalogBackup::export(self);
        let summary = tables.merge(backup);
        *self = tables.restore();
        summary
    }
}

fn upsert<T, K: PartialEq>(rows: &mut Vec<T>, incoming: Vec<T>, key: impl Fn(&T) -> &K) -> Upserted {
    let mut counts = Upserted::default();
    for row in incoming {
        match rows.iter().position(|r| key(r) == key(&row)) {
            Some(index) => {
                rows[index] = row;
                counts.updated += 1;
            }
            None => {
                rows.push(row);
                counts.inserted += 1;
            }
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::InMemoryCatalog;

    fn document() -> CatalogDocument {
        let json = r#"{
            "categories": [{"id": "c1", "name": "Ceramiche", "slug": "ceramiche"}],
            "products": [
                {
                    "id": "p1", "title": "Tazza", "slug": "tazza", "base_price": "10",
                    "images": [{"id": "i1", "product_id": "p1", "url": "/tazza.png"}],
                    "options": [
                        {"id": "o1", "name": "colore", "type": "option_list", "is_mandatory": true,
                         "product_option_values": [
                            {"id": "v1", "value": "rosso", "price_delta": "2"},
                            {"id": "v2", "value": "blu"}
                         ]},
                        {"id": "o2", "name": "nota", "type": "input_text"}
                    ]
                },
                {"id": "p2", "title": "Vaso", "slug": "vaso"}
            ],
            "site": {"email": "ciao@bottega.example"}
        }"#;
        InMemoryCatalog::from_json(json).unwrap().document().clone()
    }

    #[test]
    fn test_export_flattens_tables() {
        let backup = CatalogBackup::export(&document());
        assert_eq!(backup.categories.len(), 1);
        assert_eq!(backup.products.len(), 2);
        assert_eq!(backup.product_images.len(), 1);
        assert_eq!(backup.product_options.len(), 2);
        assert_eq!(backup.product_options[1].product_id, ProductId::from("p1"));
        assert_eq!(backup.product_option_values.len(), 2);
        assert_eq!(backup.product_option_values[0].option_id, OptionId::from("o1"));
        assert_eq!(
            backup.config[0].email.as_deref(),
            Some("ciao@bottega.example")
        );
    }

    #[test]
    fn test_restore_rebuilds_catalog() {
        let original = document();
        let restored = CatalogBackup::export(&original).restore();
        assert_eq!(restored, original);
    }

    #[test]
    fn test_import_updates_known_ids_and_appends_new() {
        let mut catalog = document();
        let backup = CatalogBackup::from_json(
            r#"{
                "products": [
                    {"id": "p1", "title": "Tazza grande", "slug": "tazza", "base_price": 12},
                    {"id": "p3", "title": "Ciotola", "slug": "ciotola"}
                ],
                "product_option_values": [
                    {"id": "v3", "option_id": "o1", "value": "verde", "price_delta": 1}
                ],
                "product_options": [
                    {"id": "o3", "product_id": "p3", "name": "decori",
                     "option_type": "option_list_multi", "is_mandatory": false}
                ],
                "config": [{"id": 1, "email": "nuova@bottega.example", "updated_at": "2024-01-01"}]
            }"#,
        )
        .unwrap();

        let summary = catalog.import_backup(backup);

        assert_eq!(summary.products, Upserted { inserted: 1, updated: 1 });
        assert_eq!(summary.product_option_values.inserted, 1);
        assert_eq!(summary.product_options.inserted, 1);
        assert_eq!(summary.categories.total(), 0);
        assert!(summary.config);

        assert_eq!(catalog.products.len(), 3);
        let tazza = &catalog.products[0];
        assert_eq!(tazza.product.title, "Tazza grande");
        assert_eq!(tazza.product.base_price, Some(Decimal::from(12)));
        // Children of an updated product are kept.
        assert_eq!(tazza.images.len(), 1);
        let colore = tazza.options.get("colore").unwrap();
        let labels: Vec<_> = colore.values.iter().map(|v| v.value.as_str()).collect();
        assert_eq!(labels, vec!["rosso", "blu", "verde"]);

        let ciotola = &catalog.products[2];
        assert_eq!(
            ciotola.options.get("decori").unwrap().option_type,
            OptionType::MultiChoice
        );
        assert_eq!(catalog.site.email.as_deref(), Some("nuova@bottega.example"));
    }

    #[test]
    fn test_import_without_config_keeps_site() {
        let mut catalog = document();
        let summary = catalog.import_backup(CatalogBackup::default());
        assert!(!summary.config);
        assert_eq!(catalog.site.email.as_deref(), Some("ciao@bottega.example"));
        assert_eq!(catalog.products.len(), 2);
    }

    #[test]
    fn test_restore_drops_orphan_rows() {
        let mut backup = CatalogBackup::export(&document());
        backup.product_images.push(ProductImage {
            id: "i9".into(),
            product_id: "gone".into(),
            url: "/x.png".to_string(),
            alt: None,
        });
        backup.product_option_values.push(OptionValueRow {
            id: "v9".into(),
            option_id: "gone".into(),
            value: "x".to_string(),
            image_url: None,
            price_delta: None,
        });
        let restored = backup.restore();
        assert_eq!(restored.products[0].images.len(), 1);
        assert_eq!(
            restored.products[0].options.get("colore").unwrap().values.len(),
            2
        );
    }

    #[test]
    fn test_bad_backup_json() {
        assert!(CatalogBackup::from_json("{\"products\": 3}").is_err());
    }
}
