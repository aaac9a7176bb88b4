//! Business logic services for storefront.
//!
//! # Services
//!
//! - `cart_validation` - Reprice and stock-check client carts against the catalog

pub mod cart_validation;

pub use cart_validation::{CartValidationError, CartValidator, ValidatedCart};
