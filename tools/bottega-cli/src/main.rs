//! Bottega CLI - Command line tool for the Bottega storefront catalog.
//!
//! Commands:
//! - `bottega product` - Configure a product and show price, cart payload and links
//! - `bottega search` - List or search the catalog
//! - `bottega favorites` - Resolve favorite product ids
//! - `bottega request` - Build a customization request
//! - `bottega check` - Check products for authoring problems
//! - `bottega backup` - Export or import the whole catalog
//! - `bottega sitemap` - List the public pages of the storefront
//! - `bottega config` - Manage configuration

mod commands;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{
    BackupArgs, CheckArgs, ConfigArgs, FavoritesArgs, ProductArgs, RequestArgs, SearchArgs,
    SitemapArgs,
};

/// Bottega CLI - Inspect the catalog and try out product configurations
#[derive(Parser, Debug)]
#[command(name = "bottega")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Catalog JSON file (overrides catalog_path from the config)
    #[arg(long, global = true)]
    catalog: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Configure a product as on its product page
    #[command(
        after_help = "Changes are applied grouped by kind: every --set, then --toggle, --upload and --flag, each kind in the order given."
    )]
    Product(ProductArgs),

    /// List or search products
    Search(SearchArgs),

    /// Resolve favorite product ids to products
    Favorites(FavoritesArgs),

    /// Build a customization request for a product
    Request(RequestArgs),

    /// Check products for authoring problems
    Check(CheckArgs),

    /// Export or import the whole catalog as JSON
    Backup(BackupArgs),

    /// List the public pages of the storefront
    Sitemap(SitemapArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

/// Install the log subscriber. `RUST_LOG` wins over the configured level;
/// `--verbose` forces debug.
fn init_tracing(verbose: bool, default_level: &str) {
    let env_filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(default_level))
            .unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup output formatting
    let output = output::Output::new(cli.verbose, cli.json);

    // Load config
    let loaded = context::Context::load(
        cli.config.as_deref(),
        cli.catalog.as_deref(),
        output.clone(),
    );
    let ctx = match loaded {
        Ok(ctx) => ctx,
        Err(e) => {
            output.error(&format!("{:#}", e));
            std::process::exit(1);
        }
    };
    init_tracing(cli.verbose, &ctx.config.log_level);

    // Execute command
    let result = match cli.command {
        Commands::Product(args) => commands::product::run(args, &ctx).await,
        Commands::Search(args) => commands::search::run(args, &ctx).await,
        Commands::Favorites(args) => commands::favorites::run(args, &ctx).await,
        Commands::Request(args) => commands::request::run(args, &ctx).await,
        Commands::Check(args) => commands::check::run(args, &ctx).await,
        Commands::Backup(args) => commands::backup::run(args, &ctx).await,
        Commands::Sitemap(args) => commands::sitemap::run(args, &ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
