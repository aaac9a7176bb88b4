//! Input cleaning for untrusted product and cart data.
//!
//! Anything that reaches the cart from a page (data attributes, query
//! strings, persisted JSON) passes through here first.

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use thiserror::Error;

use crate::types::Product;

/// Maximum length of a product name stored in the cart.
pub const MAX_NAME_LENGTH: usize = 100;

static HTML_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("HTML tag pattern is valid"));

/// Reasons a product is refused by the cart.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SanitizeError {
    #[error("product id is empty after sanitization")]
    MissingId,
    #[error("product name is empty after sanitization")]
    MissingName,
    #[error("product price must be positive, got {0}")]
    NonPositivePrice(i64),
}

/// Keep only ASCII letters, digits and hyphens.
#[must_use]
pub fn sanitize_id(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
        .collect()
}

/// Strip HTML tags and cap the length at [`MAX_NAME_LENGTH`] characters.
#[must_use]
pub fn sanitize_name(raw: &str) -> String {
    HTML_TAG
        .replace_all(raw, "")
        .chars()
        .take(MAX_NAME_LENGTH)
        .collect()
}

/// Drop characters that could break out of an attribute.
#[must_use]
pub fn sanitize_image(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(c, '<' | '>' | '"' | '\''))
        .collect()
}

/// Product data as handed to the cart by a page or command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CartProductInput {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub price: i64,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub collection: String,
}

/// Product data that passed [`CartProductInput::sanitize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizedProduct {
    pub id: String,
    pub name: String,
    pub price: i64,
    pub image: String,
    pub collection: String,
}

impl CartProductInput {
    /// Clean every field and check the required ones.
    ///
    /// # Errors
    ///
    /// Returns an error if the id or name is empty once cleaned, or if the
    /// price is not positive.
    pub fn sanitize(&self) -> Result<SanitizedProduct, SanitizeError> {
        let id = sanitize_id(&self.id);
        if id.is_empty() {
            return Err(SanitizeError::MissingId);
        }

        let name = sanitize_name(&self.name);
        if name.is_empty() {
            return Err(SanitizeError::MissingName);
        }

        if self.price <= 0 {
            return Err(SanitizeError::NonPositivePrice(self.price));
        }

        Ok(SanitizedProduct {
            id,
            name,
            price: self.price,
            image: sanitize_image(&self.image),
            collection: sanitize_id(&self.collection),
        })
    }
}

impl From<&Product> for CartProductInput {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            price: product.price,
            image: product.primary_image().to_string(),
            collection: product.collection.clone(),
        }
    }
}
