//! Application state shared across handlers.

use std::sync::Arc;

use crate::cart::{Cart, PricingRules};
use crate::catalog::{CatalogError, ProductCatalog, StaticCatalog};
use crate::config::StorefrontConfig;
use crate::middleware::{MemorySessionStore, SessionLocks};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the configuration, the read-only product catalog and the session store.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Arc<dyn ProductCatalog>,
    sessions: MemorySessionStore,
    session_locks: SessionLocks,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: StorefrontConfig, catalog: Arc<dyn ProductCatalog>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                sessions: MemorySessionStore::default(),
                session_locks: SessionLocks::default(),
            }),
        }
    }

    /// Create application state, loading the catalog named in `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog file cannot be read or is invalid.
    pub fn from_config(config: StorefrontConfig) -> Result<Self, CatalogError> {
        let catalog = match &config.catalog_path {
            Some(path) => StaticCatalog::from_json_file(path)?,
            None => StaticCatalog::bound_collection(),
        };
        Ok(Self::new(config, Arc::new(catalog)))
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &dyn ProductCatalog {
        self.inner.catalog.as_ref()
    }

    /// Store holding every visitor's session.
    #[must_use]
    pub fn sessions(&self) -> &MemorySessionStore {
        &self.inner.sessions
    }

    /// Locks serializing requests within one session.
    #[must_use]
    pub fn session_locks(&self) -> &SessionLocks {
        &self.inner.session_locks
    }

    /// Pricing rules for new carts.
    #[must_use]
    pub fn pricing(&self) -> PricingRules {
        self.inner.config.pricing
    }

    /// An empty cart priced with the configured rules.
    #[must_use]
    pub fn new_cart(&self) -> Cart {
        Cart::new(self.pricing())
    }
}
