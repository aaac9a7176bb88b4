//! Canonical product record.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Image shown when a product has no images of its own.
pub const PLACEHOLDER_IMAGE: &str = "/images/product.jpg";

/// A catalog product.
///
/// Owned by the catalog and immutable once loaded. Prices are in minor
/// currency units. `stock_quantity` is only meaningful on the server; the
/// public catalog endpoint leaves it out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub slug: String,
    pub price: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sale_price: Option<i64>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub detailed_description: String,
    /// Collection key; assigned from the grouping key when the catalog is flattened.
    #[serde(default)]
    pub collection: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub specifications: BTreeMap<String, String>,
    #[serde(default)]
    pub in_stock: bool,
    #[serde(default)]
    pub stock_quantity: u32,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub new_arrival: bool,
    #[serde(default)]
    pub seo: Seo,
}

/// SEO metadata attached to a product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seo {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl Product {
    /// The `material` specification, if present.
    #[must_use]
    pub fn material(&self) -> Option<&str> {
        self.specifications.get("material").map(String::as_str)
    }

    /// The `stone` specification, if present.
    #[must_use]
    pub fn stone(&self) -> Option<&str> {
        self.specifications.get("stone").map(String::as_str)
    }

    /// First image, falling back to the shared placeholder.
    #[must_use]
    pub fn primary_image(&self) -> &str {
        self.images.first().map_or(PLACEHOLDER_IMAGE, String::as_str)
    }

    /// Storefront path of the product detail page.
    #[must_use]
    pub fn detail_path(&self) -> String {
        format!("/collections/{}/{}", self.collection, self.slug)
    }

    /// Whether `quantity` units can be sold right now.
    #[must_use]
    pub const fn can_fulfil(&self, quantity: u32) -> bool {
        self.in_stock && self.stock_quantity >= quantity
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_minimal_product() {
        let product: Product =
            serde_json::from_str(r#"{"id": "p-1", "name": "Band", "price": 1000}"#).unwrap();
        assert_eq!(product.id, "p-1");
        assert!(product.images.is_empty());
        assert!(!product.in_stock);
        assert_eq!(product.stock_quantity, 0);
        assert_eq!(product.primary_image(), PLACEHOLDER_IMAGE);
    }

    #[test]
    fn test_specification_accessors() {
        let product: Product = serde_json::from_str(
            r#"{"id": "p-1", "name": "Band", "price": 1000,
                "specifications": {"material": "18k Gold", "stone": "Turquoise"}}"#,
        )
        .unwrap();
        assert_eq!(product.material(), Some("18k Gold"));
        assert_eq!(product.stone(), Some("Turquoise"));
    }

    #[test]
    fn test_can_fulfil() {
        let mut product: Product =
            serde_json::from_str(r#"{"id": "p-1", "name": "Band", "price": 1000}"#).unwrap();
        product.in_stock = true;
        product.stock_quantity = 2;
        assert!(product.can_fulfil(2));
        assert!(!product.can_fulfil(3));

        product.in_stock = false;
        assert!(!product.can_fulfil(1));
    }
}
