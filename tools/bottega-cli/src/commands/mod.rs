//! CLI command implementations.

pub mod backup;
pub mod check;
pub mod config;
pub mod favorites;
pub mod product;
pub mod request;
pub mod search;
pub mod sitemap;

use clap::{Args, Subcommand};

/// Parse a `name=value` argument.
pub fn parse_key_value(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got {:?}", s))?;
    if key.is_empty() {
        return Err(format!("missing option name in {:?}", s));
    }
    Ok((key.to_string(), value.to_string()))
}

/// Parse a `name=true|false` argument.
pub fn parse_flag(s: &str) -> Result<(String, bool), String> {
    let (key, value) = parse_key_value(s)?;
    let checked = match value.as_str() {
        "true" | "yes" | "1" => true,
        "false" | "no" | "0" => false,
        other => return Err(format!("expected true or false, got {:?}", other)),
    };
    Ok((key, checked))
}

/// Arguments for the product command.
#[derive(Args, Debug)]
pub struct ProductArgs {
    /// Product slug.
    pub slug: String,

    /// Variant string to start from, as in `?variant=colore:rosso`.
    #[arg(long)]
    pub variant: Option<String>,

    /// Select a value, type text or pick a letter (`name=value`). Applied first.
    #[arg(long = "set", value_parser = parse_key_value)]
    pub set: Vec<(String, String)>,

    /// Toggle a multi-choice value (`name=value`). Applied after --set.
    #[arg(long = "toggle", value_parser = parse_key_value)]
    pub toggle: Vec<(String, String)>,

    /// Attach an uploaded file (`name=filename`). Applied after --toggle.
    #[arg(long = "upload", value_parser = parse_key_value)]
    pub upload: Vec<(String, String)>,

    /// Tick or untick a checkbox (`name=true|false`). Applied last.
    #[arg(long = "flag", value_parser = parse_flag)]
    pub flag: Vec<(String, bool)>,
}

/// Arguments for the search command.
#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Root or subcategory slug.
    #[arg(long)]
    pub category: Option<String>,

    /// Subcategory slug.
    #[arg(long)]
    pub subcategory: Option<String>,

    /// Search text.
    #[arg(short, long)]
    pub q: Option<String>,

    /// Minimum base price.
    #[arg(long)]
    pub min_price: Option<String>,

    /// Maximum base price.
    #[arg(long)]
    pub max_price: Option<String>,

    /// Sort field: title, base_price or created_at.
    #[arg(long)]
    pub sort_by: Option<String>,

    /// Sort direction: asc or desc.
    #[arg(long)]
    pub sort_order: Option<String>,
}

/// Arguments for the favorites command.
#[derive(Args, Debug)]
pub struct FavoritesArgs {
    /// Product ids, separately or comma-separated.
    #[arg(required = true)]
    pub ids: Vec<String>,
}

/// Arguments for the request command.
#[derive(Args, Debug)]
pub struct RequestArgs {
    /// Product slug.
    pub slug: String,

    /// Variant string of the customization.
    #[arg(long)]
    pub variant: Option<String>,

    /// Customer name.
    #[arg(long)]
    pub name: String,

    /// Customer email.
    #[arg(long)]
    pub email: String,

    /// Free-form notes.
    #[arg(long)]
    pub notes: Option<String>,
}

/// Arguments for the check command.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Product slug; all products when omitted.
    pub slug: Option<String>,
}

/// Arguments for the backup command.
#[derive(Args, Debug)]
pub struct BackupArgs {
    #[command(subcommand)]
    pub command: BackupCommand,
}

#[derive(Subcommand, Debug)]
pub enum BackupCommand {
    /// Write every catalog table as one JSON document.
    Export {
        /// Output file; stdout when omitted.
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Upsert a backup into the catalog file, matching rows by id.
    Import {
        /// Backup JSON file.
        file: String,
        /// Report what would change without writing the catalog.
        #[arg(long)]
        dry_run: bool,
    },
}

/// Arguments for the sitemap command.
#[derive(Args, Debug)]
pub struct SitemapArgs {
    /// Print the sitemaps.org XML document.
    #[arg(long)]
    pub xml: bool,
}

/// Arguments for the config command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Print the path of the configuration file in use.
    Path,
    /// Write a default bottega.toml in the working directory.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
    /// Validate the configuration in use.
    Validate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_value() {
        assert_eq!(
            parse_key_value("nota=tanti auguri=!"),
            Ok(("nota".to_string(), "tanti auguri=!".to_string()))
        );
        assert_eq!(parse_key_value("nota="), Ok(("nota".to_string(), String::new())));
        assert!(parse_key_value("nota").is_err());
        assert!(parse_key_value("=x").is_err());
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("regalo=true"), Ok(("regalo".to_string(), true)));
        assert_eq!(parse_flag("regalo=no"), Ok(("regalo".to_string(), false)));
        assert!(parse_flag("regalo=forse").is_err());
    }
}
