//! Command implementations.

pub mod catalog;
pub mod checkout;
pub mod quote;

use std::path::Path;

use bound_core::CheckoutStep;
use bound_storefront::cart::{CartError, PricingRules};
use bound_storefront::catalog::{CatalogError, StaticCatalog};
use bound_storefront::config::{ConfigError, StorefrontConfig};
use bound_storefront::checkout::CheckoutError;
use thiserror::Error;

/// Errors reported by commands.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("failed to write JSON: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("{0}")]
    InvalidOption(String),
    #[error("unknown product '{0}'")]
    UnknownProduct(String),
    #[error("line {line}: {source}")]
    Cart { line: usize, source: CartError },
    #[error("cart is empty")]
    EmptyCart,
    #[error("checkout stopped at the {step} step: {source}")]
    Checkout {
        step: CheckoutStep,
        source: CheckoutError,
    },
}

/// Catalog and pricing shared by every command.
pub struct Context {
    pub catalog: StaticCatalog,
    pub pricing: PricingRules,
}

impl Context {
    /// Load configuration from the environment and the catalog from
    /// `catalog_path`, the configured path, or the built-in collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration or catalog is invalid.
    pub fn load(catalog_path: Option<&Path>) -> Result<Self, CommandError> {
        let config = StorefrontConfig::from_env()?;
        let catalog = match catalog_path.or(config.catalog_path.as_deref()) {
            Some(path) => StaticCatalog::from_json_file(path)?,
            None => StaticCatalog::bound_collection(),
        };
        Ok(Self {
            catalog,
            pricing: config.pricing,
        })
    }
}

/// Read a YAML file into `T`.
fn read_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, CommandError> {
    let content = std::fs::read_to_string(path).map_err(|source| CommandError::Read {
        path: path.display().to_string(),
        source,
    })?;
    Ok(serde_yaml::from_str(&content)?)
}

/// Write command output to stdout.
#[allow(clippy::print_stdout)]
fn emit(output: &str) {
    println!("{output}");
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::Context;
    use bound_storefront::cart::PricingRules;
    use bound_storefront::catalog::StaticCatalog;

    pub fn context() -> Context {
        Context {
            catalog: StaticCatalog::bound_collection(),
            pricing: PricingRules::default(),
        }
    }
}
