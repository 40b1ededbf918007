//! Catalog authoring checks.

use anyhow::{bail, Context as _, Result};
use bottega_commerce::catalog::{CatalogStore, ProductDraft, ValidationIssue};
use serde::Serialize;

use super::CheckArgs;
use crate::context::Context;

#[derive(Serialize)]
struct ProductReport {
    slug: String,
    issues: Vec<ValidationIssue>,
}

/// Run the check command.
pub async fn run(args: CheckArgs, ctx: &Context) -> Result<()> {
    let store = ctx.catalog()?;
    let slugs = match args.slug {
        Some(slug) => vec![slug],
        None => store
            .products()
            .await
            .context("Failed to load products")?
            .into_iter()
            .map(|p| p.slug)
            .collect(),
    };

    let mut reports = Vec::with_capacity(slugs.len());
    for slug in slugs {
        let detail = store
            .product_detail(&slug)
            .await
            .with_context(|| format!("Failed to load product '{}'", slug))?;
        let issues = ProductDraft::from_detail(&detail).validate();
        reports.push(ProductReport { slug, issues });
    }

    let failing = reports.iter().filter(|r| !r.issues.is_empty()).count();

    if ctx.output.is_json() {
        ctx.output.json(&reports);
    } else {
        ctx.output.header("Catalog check");
        for report in &reports {
            if report.issues.is_empty() {
                ctx.output.success(&report.slug);
                continue;
            }
            ctx.output.warn(&report.slug);
            for issue in &report.issues {
                ctx.output.list_item(&issue.to_string());
            }
        }
    }

    if failing > 0 {
        bail!("{} of {} product(s) have issues", failing, reports.len());
    }
    ctx.output
        .success(&format!("{} product(s) checked", reports.len()));
    Ok(())
}
