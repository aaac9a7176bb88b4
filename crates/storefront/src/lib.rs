//! Parisa London storefront API.
//!
//! Serves the canonical catalog, server-side search and checkout cart
//! validation. Built as a library so the router can be driven in-process
//! by the integration tests.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;

pub use routes::routes;
pub use state::AppState;
