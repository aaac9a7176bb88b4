//! Cart validation endpoint.
//!
//! Checkout hands the client cart here; the response carries server prices
//! that replace the client's copy.

use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use parisa_core::CartValidationResponse;
use serde_json::Value;
use tracing::instrument;

use crate::middleware::ClientIdentity;
use crate::services::{CartValidationError, ValidatedCart};
use crate::state::AppState;

/// Validated prices must never be cached.
pub const VALIDATION_CACHE_CONTROL: &str = "no-store, max-age=0";

impl IntoResponse for CartValidationError {
    fn into_response(self) -> Response {
        let status = match self {
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            Self::InvalidFormat | Self::Unavailable { .. } => StatusCode::BAD_REQUEST,
        };
        (status, Json(CartValidationResponse::rejected(self.to_string()))).into_response()
    }
}

impl IntoResponse for ValidatedCart {
    fn into_response(self) -> Response {
        (
            [(header::CACHE_CONTROL, VALIDATION_CACHE_CONTROL)],
            Json(CartValidationResponse::accepted(self.items, self.total)),
        )
            .into_response()
    }
}

/// `POST /api/validate-cart`
///
/// The body is parsed leniently so that throttling is decided before the
/// body is judged; an unparsable body is reported as an invalid format.
#[instrument(skip(state, body), fields(client = %identity.as_str()))]
pub async fn validate(
    State(state): State<AppState>,
    identity: ClientIdentity,
    body: Bytes,
) -> Result<ValidatedCart, CartValidationError> {
    let body = serde_json::from_slice::<Value>(&body).unwrap_or_else(|e| {
        tracing::debug!(error = %e, "Unparsable cart validation body");
        Value::Null
    });

    state.cart_validator().validate(&identity, &body)
}
