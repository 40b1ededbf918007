//! Storefront sitemap.

use anyhow::{Context as _, Result};
use bottega_commerce::catalog::CatalogStore;
use bottega_commerce::sitemap::{build_sitemap, render_sitemap_xml, SitemapEntry};

use super::SitemapArgs;
use crate::context::Context;

/// Run the sitemap command.
pub async fn run(args: SitemapArgs, ctx: &Context) -> Result<()> {
    let entries = entries(ctx).await?;

    if args.xml {
        println!("{}", render_sitemap_xml(&entries)?);
        return Ok(());
    }

    if ctx.output.is_json() {
        ctx.output.json(&entries);
        return Ok(());
    }

    ctx.output.header("Sitemap");
    let widths = [56, 8, 8];
    ctx.output.table_row(&["URL", "PRIORITY", "CHANGES"], &widths);
    for entry in &entries {
        let priority = format!("{:.1}", entry.priority);
        ctx.output.table_row(
            &[
                entry.url.as_str(),
                priority.as_str(),
                entry.change_frequency.as_str(),
            ],
            &widths,
        );
    }
    ctx.output.info(&format!("{} page(s)", entries.len()));

    Ok(())
}

async fn entries(ctx: &Context) -> Result<Vec<SitemapEntry>> {
    let store = ctx.catalog()?;
    let products = store.products().await.context("Failed to load products")?;
    Ok(build_sitemap(ctx.config.origin(), &products))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::Output;
    use std::fs;

    #[tokio::test]
    async fn test_entries_use_configured_site_url() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("bottega.toml"),
            "site_url = \"https://bottega.example/\"\ncatalog_path = \"catalog.json\"\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("catalog.json"),
            r#"{"products": [{"id": "p1", "title": "Tazza", "slug": "tazza"}]}"#,
        )
        .unwrap();
        let ctx = Context::load_in(dir.path().to_path_buf(), None, None, Output::new(false, false))
            .unwrap();

        let entries = entries(&ctx).await.unwrap();

        assert_eq!(entries.len(), 4);
        assert_eq!(entries[0].url, "https://bottega.example/");
        assert_eq!(entries[3].url, "https://bottega.example/product/tazza");
    }
}
