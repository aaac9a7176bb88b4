//! Change notifications emitted by the cart.

use serde::Serialize;

use crate::types::CartLineItem;

/// Cart state broadcast after every mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSnapshot {
    pub items: Vec<CartLineItem>,
    /// Sum of price × quantity in minor units.
    pub total: i64,
    /// Sum of quantities.
    pub count: u64,
    pub formatted_total: String,
}

/// Something subscribers should know about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartEvent {
    /// The cart changed; carries the full new state.
    Updated(CartSnapshot),
    /// A message meant for the shopper ("Ring added to cart").
    Notice(String),
}

/// Handle returned by [`CartStore::subscribe`](super::CartStore::subscribe).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub(crate) u64);
