//! Customization requests.

use anyhow::{Context as _, Result};
use bottega_commerce::catalog::CatalogStore;
use bottega_commerce::share::CustomizationRequest;

use super::RequestArgs;
use crate::context::Context;

/// Run the request command. The record is always printed as JSON.
pub async fn run(args: RequestArgs, ctx: &Context) -> Result<()> {
    let store = ctx.catalog()?;
    let detail = store
        .product_detail(&args.slug)
        .await
        .with_context(|| format!("Failed to load product '{}'", args.slug))?;

    let request = CustomizationRequest::new(
        detail.product.id.clone(),
        args.variant.as_deref(),
        &args.name,
        &args.email,
        args.notes.as_deref(),
    )?;

    for name in request.selected_variants.keys() {
        if detail.options.get(name).is_none() {
            ctx.output
                .warn(&format!("'{}' is not an option of {}", name, detail.product.title));
        }
    }

    ctx.output.json(&request);
    Ok(())
}
