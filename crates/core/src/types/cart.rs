//! Cart line items and the cart validation wire format.

use serde::{Deserialize, Serialize};

/// A line in the client-held cart.
///
/// `price` is a snapshot taken when the item was added and is never trusted
/// for checkout; the server reprices every line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineItem {
    pub id: String,
    pub name: String,
    pub price: i64,
    pub quantity: u32,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub collection: String,
    /// Creation time in milliseconds since the Unix epoch.
    #[serde(rename = "addedAt", default)]
    pub added_at: i64,
}

impl CartLineItem {
    /// Price multiplied by quantity, saturating at `i64::MAX`.
    #[must_use]
    pub fn line_total(&self) -> i64 {
        self.price.saturating_mul(i64::from(self.quantity))
    }
}

/// A cart line recomputed by the server from canonical catalog data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatedCartLine {
    pub id: String,
    pub name: String,
    pub price: i64,
    pub quantity: u32,
    pub image: String,
    pub collection: String,
}

impl ValidatedCartLine {
    /// Price multiplied by quantity, saturating at `i64::MAX`.
    #[must_use]
    pub fn line_total(&self) -> i64 {
        self.price.saturating_mul(i64::from(self.quantity))
    }
}

/// Request body for `POST /api/validate-cart`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartValidationRequest {
    pub items: Vec<CartLineItem>,
}

/// Response body for `POST /api/validate-cart`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartValidationResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<ValidatedCartLine>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CartValidationResponse {
    /// A successful validation carrying server-priced lines.
    #[must_use]
    pub fn accepted(items: Vec<ValidatedCartLine>, total: i64) -> Self {
        Self {
            success: true,
            items: Some(items),
            total: Some(total),
            error: None,
        }
    }

    /// A rejected validation with a short, client-safe reason.
    #[must_use]
    pub fn rejected(error: impl Into<String>) -> Self {
        Self {
            success: false,
            items: None,
            total: None,
            error: Some(error.into()),
        }
    }
}
