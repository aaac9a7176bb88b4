//! Parisa Core - Catalog, search and cart domain library.
//!
//! This crate provides the domain logic shared by all Parisa components:
//! - `storefront` - HTTP API serving the catalog and validating carts
//! - `cli` - Client-side tool for searching the catalog and managing a cart
//!
//! # Architecture
//!
//! The core crate contains only types, pure functions and traits - no network
//! access and no filesystem access. Cart persistence goes through the
//! [`cart::CartStorage`] trait so callers decide where the cart lives.
//!
//! # Modules
//!
//! - [`types`] - Products, cart lines, validation wire types and prices
//! - [`catalog`] - Flattened product catalog with derived search text
//! - [`search`] - Query admissibility checks and relevance ranking
//! - [`cart`] - Client cart store with change notifications
//! - [`sanitize`] - Input cleaning for untrusted product and cart data

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod sanitize;
pub mod search;
pub mod types;

pub use catalog::{Catalog, SearchableProduct};
pub use types::*;
