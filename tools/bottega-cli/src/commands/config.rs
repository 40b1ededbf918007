//! Configuration management commands.

use std::fs;

use anyhow::{bail, Result};
use bottega_commerce::StorefrontConfig;

use super::{ConfigArgs, ConfigCommand};
use crate::context::{Context, CONFIG_NAMES};

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Path => show_path(ctx),
        ConfigCommand::Init { force } => init_config(force, ctx),
        ConfigCommand::Validate => validate_config(ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    let config = &ctx.config;
    ctx.output.header("Current Configuration");
    ctx.output.kv("site_url", &config.site_url);
    ctx.output.kv("currency", &config.currency);
    ctx.output.kv("placeholder_image", &config.placeholder_image);
    ctx.output.kv("yes_label", &config.yes_label);
    ctx.output.kv("no_label", &config.no_label);
    ctx.output.kv("search_limit", &config.search_limit.to_string());
    ctx.output.kv("log_level", &config.log_level);
    if let Some(path) = &config.catalog_path {
        ctx.output.kv("catalog_path", path);
    }

    ctx.output.info("");
    ctx.output.info("[site]");
    let site = &config.site;
    for (key, value) in [("email", &site.email), ("phone", &site.phone)] {
        if let Some(value) = value {
            ctx.output.kv(key, value);
        }
    }
    for (network, url) in site.social_links() {
        ctx.output.kv(network, url);
    }

    Ok(())
}

fn show_path(ctx: &Context) -> Result<()> {
    match &ctx.config_path {
        Some(path) => println!("{}", path.display()),
        None => ctx.output.info(&format!(
            "No config file found (looked for {}); using defaults.",
            CONFIG_NAMES.join(", ")
        )),
    }
    Ok(())
}

fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join(CONFIG_NAMES[0]);

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    let content = toml::to_string_pretty(&StorefrontConfig::default())?;
    fs::write(&config_path, content)?;

    ctx.output
        .success(&format!("Created: {}", config_path.display()));

    Ok(())
}

fn validate_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Validating configuration");

    let (errors, warnings) = check_config(&ctx.config);

    if errors.is_empty() && warnings.is_empty() {
        ctx.output.success("Configuration is valid");
        return Ok(());
    }

    for error in &errors {
        ctx.output.error(&format!("Error: {}", error));
    }

    for warning in &warnings {
        ctx.output.warn(&format!("Warning: {}", warning));
    }

    if !errors.is_empty() {
        bail!("Configuration has {} error(s)", errors.len());
    }

    ctx.output.success("Configuration is valid (with warnings)");

    Ok(())
}

/// Errors and warnings for a configuration.
fn check_config(config: &StorefrontConfig) -> (Vec<String>, Vec<String>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if !config.site_url.starts_with("http://") && !config.site_url.starts_with("https://") {
        errors.push(format!("site_url '{}' must be an http(s) URL", config.site_url));
    }
    if config.currency.trim().is_empty() {
        errors.push("currency is required".to_string());
    }
    if config.search_limit == 0 {
        errors.push("search_limit must be at least 1".to_string());
    }
    if config.catalog_path.is_none() {
        warnings.push("catalog_path is not set; commands need --catalog".to_string());
    }
    if config
        .site
        .email
        .as_deref()
        .is_some_and(|email| !email.contains('@'))
    {
        warnings.push("site.email does not look like an email address".to_string());
    }

    (errors, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_only_warns_about_catalog() {
        let (errors, warnings) = check_config(&StorefrontConfig::default());
        assert!(errors.is_empty());
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_bad_config_errors() {
        let config = StorefrontConfig {
            site_url: "bottega.example".to_string(),
            search_limit: 0,
            catalog_path: Some("catalog.json".to_string()),
            ..StorefrontConfig::default()
        };
        let (errors, warnings) = check_config(&config);
        assert_eq!(errors.len(), 2);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_default_config_round_trips_through_toml() {
        let content = toml::to_string_pretty(&StorefrontConfig::default()).unwrap();
        let parsed = StorefrontConfig::from_toml(&content).unwrap();
        assert_eq!(parsed, StorefrontConfig::default());
    }
}
