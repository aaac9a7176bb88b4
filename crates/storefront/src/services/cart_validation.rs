//! Server-side cart validation.
//!
//! Reprices a client-asserted cart from the canonical catalog. The client's
//! prices and names are never trusted. The batch is all-or-nothing: one line
//! that cannot be fulfilled rejects the whole cart.

use std::sync::Arc;
use std::time::Instant;

use parisa_core::sanitize::sanitize_id;
use parisa_core::{Catalog, ValidatedCartLine};
use serde_json::Value;
use thiserror::Error;
use tracing::instrument;

use crate::middleware::{ClientIdentity, RateDecision, RateLimitStore};

/// Largest quantity accepted for one line.
pub const MAX_VALIDATED_QUANTITY: i64 = 10;

/// Reasons a cart validation is refused.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartValidationError {
    #[error("Rate limit exceeded. Please try again later.")]
    RateLimited,
    #[error("Invalid cart items format")]
    InvalidFormat,
    #[error("Product \"{name}\" is not available in requested quantity")]
    Unavailable { name: String },
}

/// A successfully validated cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedCart {
    pub items: Vec<ValidatedCartLine>,
    pub total: i64,
}

/// Validates carts against the catalog, throttled per client.
#[derive(Clone)]
pub struct CartValidator {
    catalog: Arc<Catalog>,
    limiter: Arc<dyn RateLimitStore>,
}

impl CartValidator {
    #[must_use]
    pub fn new(catalog: Arc<Catalog>, limiter: Arc<dyn RateLimitStore>) -> Self {
        Self { catalog, limiter }
    }

    /// Validate a request body of the shape `{"items": [{"id", "quantity"}, ...]}`.
    ///
    /// # Errors
    ///
    /// - `RateLimited` when the client has used up its window. Checked first.
    /// - `InvalidFormat` when `items` is missing or not an array.
    /// - `Unavailable` for the first line the catalog cannot fulfil.
    #[instrument(skip(self, body), fields(client = %identity.as_str()))]
    pub fn validate(
        &self,
        identity: &ClientIdentity,
        body: &Value,
    ) -> Result<ValidatedCart, CartValidationError> {
        if let RateDecision::Limited { retry_after } =
            self.limiter.check(identity.as_str(), Instant::now())
        {
            tracing::warn!(retry_after_secs = retry_after.as_secs(), "Cart validation throttled");
            return Err(CartValidationError::RateLimited);
        }

        let lines = body
            .get("items")
            .and_then(Value::as_array)
            .ok_or(CartValidationError::InvalidFormat)?;

        let mut items = Vec::with_capacity(lines.len());
        let mut total = 0_i64;

        for line in lines {
            let id = sanitize_id(&line_id(line.get("id")));
            if id.is_empty() {
                continue;
            }
            let Some(product) = self.catalog.find(&id) else {
                tracing::debug!(product_id = %id, "Dropping unknown product from cart");
                continue;
            };

            let quantity = line_quantity(line.get("quantity"));
            if !product.can_fulfil(quantity) {
                tracing::info!(
                    product_id = %product.id,
                    requested = quantity,
                    in_stock = product.in_stock,
                    stock_quantity = product.stock_quantity,
                    "Cart rejected for insufficient stock"
                );
                return Err(CartValidationError::Unavailable {
                    name: product.name.clone(),
                });
            }

            let validated = ValidatedCartLine {
                id: product.id.clone(),
                name: product.name.clone(),
                price: product.price,
                quantity,
                image: product.primary_image().to_string(),
                collection: product.collection.clone(),
            };
            total = total.saturating_add(validated.line_total());
            items.push(validated);
        }

        tracing::info!(lines = items.len(), total, "Cart validated");
        Ok(ValidatedCart { items, total })
    }
}

impl std::fmt::Debug for CartValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartValidator")
            .field("products", &self.catalog.len())
            .finish_non_exhaustive()
    }
}

/// Stringify a line's id. Strings and numbers are accepted; anything else is empty.
fn line_id(raw: Option<&Value>) -> String {
    match raw {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

/// Requested quantity clamped to `1..=10`; zero or unparsable means 1.
#[allow(clippy::cast_possible_truncation)]
fn line_quantity(raw: Option<&Value>) -> u32 {
    let parsed = match raw {
        Some(Value::Number(n)) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite())
                .map(|f| f.trunc().clamp(-1.0, 11.0) as i64)
        }),
        Some(Value::String(s)) => parse_leading_int(s),
        _ => None,
    };

    let quantity = match parsed {
        None | Some(0) => 1,
        Some(q) => q.clamp(1, MAX_VALIDATED_QUANTITY),
    };
    u32::try_from(quantity).unwrap_or(1)
}

/// Parse the integer prefix of a string: `" 3 rings"` is 3, `"x3"` is nothing.
fn parse_leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, s.get(1..)?),
        Some(b'+') => (false, s.get(1..)?),
        _ => (false, s),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let prefix = digits.get(..end).filter(|p| !p.is_empty())?;

    // Anything too long to fit is far past the cap either way
    let magnitude = prefix.parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}
