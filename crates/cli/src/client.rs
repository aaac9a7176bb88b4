//! HTTP client for the storefront API.

use std::time::Duration;

use parisa_core::cart::{CheckoutError, CheckoutGateway};
use parisa_core::{CartValidationRequest, CartValidationResponse, Catalog};
use thiserror::Error;
use tracing::instrument;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors talking to the storefront.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status {0}")]
    Status(u16),

    #[error("invalid catalog payload: {0}")]
    Catalog(#[from] serde_json::Error),
}

/// Storefront API client.
#[derive(Debug, Clone)]
pub struct StorefrontClient {
    http: reqwest::Client,
    base_url: String,
}

impl StorefrontClient {
    /// Create a client for the storefront at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Fetch the flattened catalog snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error on network failure, a non-success status or an
    /// unparsable body.
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    pub async fn fetch_catalog(&self) -> Result<Catalog, ClientError> {
        let response = self.http.get(self.url("/api/products")).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        Ok(Catalog::from_flat_json(&body)?)
    }

    /// Fetch the catalog, falling back to the built-in sample when the
    /// storefront cannot provide one.
    pub async fn catalog_or_fallback(&self) -> Catalog {
        match self.fetch_catalog().await {
            Ok(catalog) => catalog,
            Err(e) => {
                tracing::warn!(error = %e, "Using fallback product data");
                Catalog::fallback()
            }
        }
    }
}

impl CheckoutGateway for StorefrontClient {
    async fn validate_cart(
        &self,
        request: &CartValidationRequest,
    ) -> Result<CartValidationResponse, CheckoutError> {
        let response = self
            .http
            .post(self.url("/api/validate-cart"))
            .json(request)
            .send()
            .await
            .map_err(|e| CheckoutError::Transport(e.to_string()))?;

        let status = response.status();
        let body: Option<CartValidationResponse> = response.json().await.ok();

        match body {
            Some(body) if status.is_success() || status.is_client_error() => Ok(body),
            _ => Err(CheckoutError::Transport(format!(
                "validation failed with status {}",
                status.as_u16()
            ))),
        }
    }
}
