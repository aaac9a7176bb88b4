//! Integration tests for the Parisa London storefront.
//!
//! The storefront router is driven in-process with `tower::ServiceExt::oneshot`;
//! no server or network is needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p parisa-integration-tests
//! ```

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::extract::ConnectInfo;
use axum::http::{Method, Request, StatusCode, header};
use parisa_core::cart::{CheckoutError, CheckoutGateway};
use parisa_core::{CartValidationRequest, CartValidationResponse, Catalog};
use parisa_storefront::config::{RateLimitConfig, StorefrontConfig};
use parisa_storefront::middleware::{FixedWindowLimiter, RateDecision, RateLimitStore};
use parisa_storefront::{AppState, routes};
use serde_json::Value;
use tower::ServiceExt;

/// Small grouped catalog with known prices and stock.
pub const FIXTURE_CATALOG: &str = r#"{
  "kaleidoscope": [
    {
      "id": "kal-ring-001",
      "name": "Persian Turquoise Ring",
      "slug": "persian-turquoise-ring",
      "price": 285000,
      "images": ["/images/kal-ring-001.jpg"],
      "description": "Persian turquoise in an 18k gold setting",
      "tags": ["ring", "turquoise", "gold"],
      "specifications": {"material": "18k Yellow Gold", "stone": "Turquoise"},
      "in_stock": true,
      "stock_quantity": 2
    },
    {
      "id": "kal-earring-002",
      "name": "Kaleidoscope Drop Earrings",
      "slug": "kaleidoscope-drop-earrings",
      "price": 198000,
      "images": [],
      "description": "Turquoise drops beneath diamond studs",
      "tags": ["earrings", "turquoise"],
      "in_stock": true,
      "stock_quantity": 10
    }
  ],
  "heritage": [
    {
      "id": "her-ring-002",
      "name": "Heritage Signet Ring",
      "slug": "heritage-signet-ring",
      "price": 98000,
      "images": ["/images/her-ring-002.jpg"],
      "description": "Classic oval signet",
      "tags": ["ring", "signet"],
      "in_stock": false,
      "stock_quantity": 0
    }
  ]
}"#;

/// Parse [`FIXTURE_CATALOG`].
///
/// # Panics
///
/// Panics if the fixture is not a valid grouped catalog.
#[must_use]
pub fn fixture_catalog() -> Catalog {
    Catalog::from_grouped_json(FIXTURE_CATALOG).expect("fixture catalog parses")
}

/// Default configuration, independent of the process environment.
///
/// # Panics
///
/// Panics if the defaults fail to load.
#[must_use]
pub fn test_config() -> StorefrontConfig {
    StorefrontConfig::from_lookup(|_| None).expect("default config loads")
}

/// Router over the fixture catalog with the default 20-per-minute limiter.
#[must_use]
pub fn test_app() -> Router {
    routes(AppState::new(test_config(), fixture_catalog()))
}

/// Router over the fixture catalog with an explicit rate limit store.
#[must_use]
pub fn test_app_with_limiter(limiter: Arc<dyn RateLimitStore>) -> Router {
    routes(AppState::with_limiter(test_config(), fixture_catalog(), limiter))
}

/// Fixed-window limiter whose clock can be moved forward by tests.
pub struct ManualClockLimiter {
    inner: FixedWindowLimiter,
    offset: Mutex<Duration>,
}

impl ManualClockLimiter {
    #[must_use]
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            inner: FixedWindowLimiter::new(config),
            offset: Mutex::new(Duration::ZERO),
        }
    }

    /// Move this limiter's clock forward.
    ///
    /// # Panics
    ///
    /// Panics if the clock lock is poisoned.
    pub fn advance(&self, by: Duration) {
        *self.offset.lock().expect("clock lock") += by;
    }
}

impl RateLimitStore for ManualClockLimiter {
    fn check(&self, key: &str, now: Instant) -> RateDecision {
        let offset = *self.offset.lock().expect("clock lock");
        self.inner.check(key, now + offset)
    }
}

/// A response with its body decoded as JSON.
#[derive(Debug)]
pub struct JsonResponse {
    pub status: StatusCode,
    pub cache_control: Option<String>,
    pub body: Value,
}

/// Send one request through `app` from `peer` and decode the JSON body.
///
/// # Panics
///
/// Panics if the request cannot be built or the body is not JSON.
pub async fn send(app: Router, method: Method, uri: &str, body: Option<&str>, peer: &str) -> JsonResponse {
    let peer: SocketAddr = peer.parse().expect("peer address");
    let mut request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.map_or_else(Body::empty, |b| Body::from(b.to_string())))
        .expect("request builds");
    request.extensions_mut().insert(ConnectInfo(peer));

    let response = app.oneshot(request).await.expect("router is infallible");
    let status = response.status();
    let cache_control = response
        .headers()
        .get(header::CACHE_CONTROL)
        .and_then(|v| v.to_str().ok())
        .map(String::from);

    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body reads");
    let body = serde_json::from_slice(&bytes).expect("body is JSON");

    JsonResponse {
        status,
        cache_control,
        body,
    }
}

/// POST `body` to `uri` with extra headers from a fixed peer; returns the status.
///
/// # Panics
///
/// Panics if the request cannot be built.
pub async fn send_with_headers(
    app: Router,
    uri: &str,
    body: &str,
    headers: &[(&str, &str)],
) -> StatusCode {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    let mut request = builder
        .body(Body::from(body.to_string()))
        .expect("request builds");
    request
        .extensions_mut()
        .insert(ConnectInfo(SocketAddr::from(([10, 0, 0, 1], 443))));

    app.oneshot(request)
        .await
        .expect("router is infallible")
        .status()
}

/// POST a cart validation body.
pub async fn validate_cart(app: Router, body: &str, peer: &str) -> JsonResponse {
    send(app, Method::POST, "/api/validate-cart", Some(body), peer).await
}

/// Checkout gateway that talks to an in-process router.
pub struct RouterGateway {
    app: Router,
    peer: String,
}

impl RouterGateway {
    #[must_use]
    pub fn new(app: Router, peer: &str) -> Self {
        Self {
            app,
            peer: peer.to_string(),
        }
    }
}

impl CheckoutGateway for RouterGateway {
    async fn validate_cart(
        &self,
        request: &CartValidationRequest,
    ) -> Result<CartValidationResponse, CheckoutError> {
        let body =
            serde_json::to_string(request).map_err(|e| CheckoutError::Transport(e.to_string()))?;
        let response = validate_cart(self.app.clone(), &body, &self.peer).await;

        if response.status.is_server_error() {
            return Err(CheckoutError::Transport(format!(
                "validation failed with status {}",
                response.status
            )));
        }
        serde_json::from_value(response.body).map_err(|e| CheckoutError::Transport(e.to_string()))
    }
}
