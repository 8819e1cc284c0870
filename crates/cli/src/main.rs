//! Bound CLI - catalog and order tools.
//!
//! # Usage
//!
//! ```bash
//! # List the catalog, filtered and sorted
//! bound catalog --category Tops --sort price-low-high
//!
//! # Price a cart file
//! bound quote cart.yaml
//!
//! # Dry-run a checkout file through the checkout wizard
//! bound checkout checkout.yaml
//! ```
//!
//! # Commands
//!
//! - `catalog` - List products
//! - `quote` - Price a cart
//! - `checkout` - Walk a cart through checkout
//!
//! Pricing rules and the default catalog come from the same environment
//! variables as the storefront server (`STOREFRONT_CATALOG_PATH`,
//! `STOREFRONT_PROMO_PERCENT`, ...).

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "bound")]
#[command(author, version, about = "Bound storefront CLI tools")]
struct Cli {
    /// JSON catalog file (defaults to `STOREFRONT_CATALOG_PATH`, then the
    /// built-in collection)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List products
    Catalog(CatalogArgs),
    /// Price a cart file
    Quote {
        /// YAML cart file
        file: PathBuf,
    },
    /// Walk a checkout file through the checkout wizard
    Checkout {
        /// YAML checkout file
        file: PathBuf,
    },
}

#[derive(Args)]
struct CatalogArgs {
    /// Category (case-insensitive)
    #[arg(long)]
    category: Option<String>,

    /// Brand (exact)
    #[arg(long)]
    brand: Option<String>,

    /// Color (case-insensitive)
    #[arg(long)]
    color: Option<String>,

    /// Price range (`all`, `under-50`, `50-100`, `100-150`, `over-150`)
    #[arg(long, default_value = "all")]
    price: String,

    /// Sort order (`featured`, `price-low-high`, `price-high-low`, `name-a-z`, `name-z-a`)
    #[arg(long, default_value = "featured")]
    sort: String,

    /// Print JSON instead of a table
    #[arg(long)]
    json: bool,
}

fn main() {
    // Logs go to stderr so command output can be piped
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "bound_cli=info,bound_storefront=warn".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli);

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let context = commands::Context::load(cli.catalog.as_deref())?;

    match cli.command {
        Commands::Catalog(args) => commands::catalog::run(
            &context,
            &commands::catalog::Listing {
                category: args.category,
                brand: args.brand,
                color: args.color,
                price: args.price,
                sort: args.sort,
            },
            args.json,
        )?,
        Commands::Quote { file } => commands::quote::run(&context, &file)?,
        Commands::Checkout { file } => commands::checkout::run(&context, &file)?,
    }
    Ok(())
}
