//! Core types for Parisa.
//!
//! This module provides the data contracts exchanged between the catalog,
//! the cart and the validation endpoint.

pub mod cart;
pub mod price;
pub mod product;

pub use cart::{CartLineItem, CartValidationRequest, CartValidationResponse, ValidatedCartLine};
pub use price::{CurrencyCode, Price, format_minor_units};
pub use product::{Product, Seo};
