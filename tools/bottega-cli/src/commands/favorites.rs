//! Favorites lookup.

use anyhow::Result;
use bottega_commerce::catalog::favorite_products;
use bottega_commerce::favorites::{Favorites, MemoryStorage};
use bottega_commerce::format_optional;

use super::FavoritesArgs;
use crate::context::Context;

/// Run the favorites command.
pub async fn run(args: FavoritesArgs, ctx: &Context) -> Result<()> {
    let mut favorites = Favorites::restore(MemoryStorage::new());
    for id in args.ids.iter().flat_map(|raw| raw.split(',')) {
        let id = id.trim();
        if !id.is_empty() {
            favorites.add(id);
        }
    }

    let store = ctx.catalog()?;
    let products = favorite_products(&store, &favorites.ids_param()).await;

    if ctx.output.is_json() {
        ctx.output.json(&products);
        return Ok(());
    }

    ctx.output.header("Favorites");
    if products.is_empty() {
        ctx.output.info("No favorite products found.");
        return Ok(());
    }
    for product in &products {
        ctx.output.list_item(&format!(
            "{} ({}) {}",
            product.title,
            product.id,
            format_optional(product.base_price)
        ));
    }
    let missing = favorites.len().saturating_sub(products.len());
    if missing > 0 {
        ctx.output
            .warn(&format!("{} id(s) not found in the catalog", missing));
    }

    Ok(())
}
