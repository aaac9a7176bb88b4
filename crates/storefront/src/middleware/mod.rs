//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//!
//! Rate limiting is not a layer: the cart validator consults the injected
//! [`RateLimitStore`] before doing any work, keyed by [`ClientIdentity`].

pub mod rate_limit;
pub mod request_id;

pub use rate_limit::{ClientIdentity, FixedWindowLimiter, RateDecision, RateLimitStore};
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
