//! Catalog backup export and import.

use std::fs;

use anyhow::{Context as _, Result};
use bottega_commerce::catalog::{
    CatalogBackup, CatalogDocument, ImportSummary, InMemoryCatalog, Upserted,
};
use serde_json::json;

use super::{BackupArgs, BackupCommand};
use crate::context::Context;

/// Run the backup command.
pub async fn run(args: BackupArgs, ctx: &Context) -> Result<()> {
    match args.command {
        BackupCommand::Export { output } => export(output.as_deref(), ctx),
        BackupCommand::Import { file, dry_run } => import(&file, dry_run, ctx),
    }
}

fn export(output: Option<&str>, ctx: &Context) -> Result<()> {
    let store = ctx.catalog()?;
    let backup = CatalogBackup::export(store.document());
    let content = serde_json::to_string_pretty(&backup)?;

    match output {
        Some(path) => {
            let path = ctx.resolve_path(path);
            fs::write(&path, content)
                .with_context(|| format!("Failed to write backup: {}", path.display()))?;
            ctx.output.success(&format!(
                "Exported {} product(s) to {}",
                backup.products.len(),
                path.display()
            ));
        }
        None => println!("{}", content),
    }

    Ok(())
}

fn import(file: &str, dry_run: bool, ctx: &Context) -> Result<()> {
    let path = ctx.resolve_path(file);
    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read backup: {}", path.display()))?;
    let backup = CatalogBackup::from_json(&content)
        .with_context(|| format!("Invalid backup: {}", path.display()))?;

    let catalog_path = ctx.catalog_path()?;
    let mut document = if catalog_path.exists() {
        InMemoryCatalog::load(&catalog_path)
            .with_context(|| format!("Failed to load catalog: {}", catalog_path.display()))?
            .document()
            .clone()
    } else {
        ctx.output.debug(&format!(
            "{} does not exist; importing into an empty catalog",
            catalog_path.display()
        ));
        CatalogDocument::default()
    };

    let summary = document.import_backup(backup);

    if !dry_run {
        fs::write(&catalog_path, serde_json::to_string_pretty(&document)?)
            .with_context(|| format!("Failed to write catalog: {}", catalog_path.display()))?;
    }

    if ctx.output.is_json() {
        ctx.output.json(&json!({
            "catalog": catalog_path,
            "written": !dry_run,
            "summary": summary,
        }));
        return Ok(());
    }

    ctx.output.header("Import");
    let widths = [24, 10, 10];
    ctx.output.table_row(&["TABLE", "INSERTED", "UPDATED"], &widths);
    for (table, counts) in table_counts(&summary) {
        let inserted = counts.inserted.to_string();
        let updated = counts.updated.to_string();
        ctx.output
            .table_row(&[table, inserted.as_str(), updated.as_str()], &widths);
    }
    if summary.config {
        ctx.output.list_item("site settings replaced");
    }

    if dry_run {
        ctx.output.info("Dry run: catalog not written");
    } else {
        ctx.output
            .success(&format!("Catalog written to {}", catalog_path.display()));
    }

    Ok(())
}

fn table_counts(summary: &ImportSummary) -> [(&'static str, Upserted); 5] {
    [
        ("categories", summary.categories),
        ("products", summary.products),
        ("product_images", summary.product_images),
        ("product_options", summary.product_options),
        ("product_option_values", summary.product_option_values),
    ]
}
