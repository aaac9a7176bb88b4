//! Application state shared across handlers.

use std::sync::Arc;

use parisa_core::Catalog;
use parisa_core::search::QueryValidator;

use crate::config::StorefrontConfig;
use crate::middleware::{FixedWindowLimiter, RateLimitStore};
use crate::services::CartValidator;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. The catalog is loaded once at start-up and
/// never mutated; the rate limit store is the only shared mutable state.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Arc<Catalog>,
    query_validator: QueryValidator,
    cart_validator: CartValidator,
}

impl AppState {
    /// Create state with the default fixed-window limiter from `config`.
    #[must_use]
    pub fn new(config: StorefrontConfig, catalog: Catalog) -> Self {
        let limiter = Arc::new(FixedWindowLimiter::new(config.rate_limit));
        Self::with_limiter(config, catalog, limiter)
    }

    /// Create state with an explicit rate limit store.
    #[must_use]
    pub fn with_limiter(
        config: StorefrontConfig,
        catalog: Catalog,
        limiter: Arc<dyn RateLimitStore>,
    ) -> Self {
        let catalog = Arc::new(catalog);
        let cart_validator = CartValidator::new(Arc::clone(&catalog), limiter);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                query_validator: QueryValidator::default(),
                cart_validator,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the canonical catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    #[must_use]
    pub fn query_validator(&self) -> &QueryValidator {
        &self.inner.query_validator
    }

    #[must_use]
    pub fn cart_validator(&self) -> &CartValidator {
        &self.inner.cart_validator
    }
}
