//! Catalog listing and search.

use anyhow::{Context as _, Result};
use bottega_commerce::catalog::{CatalogStore, CategoryTree};
use bottega_commerce::format_optional;
use bottega_commerce::search::{search_catalog, CatalogQuery, SortField, SortOrder};

use super::SearchArgs;
use crate::context::Context;

/// Run the search command.
pub async fn run(args: SearchArgs, ctx: &Context) -> Result<()> {
    let query = query_from_args(&args);
    let store = ctx.catalog()?;
    let categories = store
        .categories()
        .await
        .context("Failed to load categories")?;
    let products = store.products().await.context("Failed to load products")?;

    let found = search_catalog(&categories, &products, &query, ctx.config.search_limit);
    ctx.output
        .debug(&format!("{} of {} products match", found.len(), products.len()));

    if ctx.output.is_json() {
        ctx.output.json(&found);
        return Ok(());
    }

    ctx.output.header("Products");
    if found.is_empty() {
        ctx.output.info("No products match.");
        return Ok(());
    }

    if let Some((field, order)) = query.sort() {
        ctx.output.info(&sort_label(field, order));
    }

    let tree = CategoryTree::new(&categories);
    let widths = [28, 12, 16];
    ctx.output.table_row(&["TITLE", "PRICE", "CATEGORY"], &widths);
    for product in &found {
        let price = format_optional(product.base_price);
        let category = product
            .category_id
            .as_ref()
            .and_then(|id| tree.by_id(id))
            .map(|c| c.slug.as_str())
            .unwrap_or("");
        ctx.output
            .table_row(&[product.title.as_str(), price.as_str(), category], &widths);
    }
    ctx.output.info(&format!("{} product(s)", found.len()));

    Ok(())
}

fn sort_label(field: SortField, order: SortOrder) -> String {
    let arrow = match order {
        SortOrder::Asc => "↑",
        SortOrder::Desc => "↓",
    };
    format!("Ordinati per {} {}", field.display_name(), arrow)
}

/// Map flags onto the catalog page's query parameters.
fn query_from_args(args: &SearchArgs) -> CatalogQuery {
    let params = [
        ("category", &args.category),
        ("subcategory", &args.subcategory),
        ("q", &args.q),
        ("minPrice", &args.min_price),
        ("maxPrice", &args.max_price),
        ("sortBy", &args.sort_by),
        ("sortOrder", &args.sort_order),
    ];
    CatalogQuery::from_params(
        params
            .iter()
            .filter_map(|(name, value)| value.as_deref().map(|v| (*name, v))),
    )
}
