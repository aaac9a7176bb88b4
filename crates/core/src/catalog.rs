//! Flattened product catalog.
//!
//! The canonical catalog file groups products by collection key:
//!
//! ```json
//! { "kaleidoscope": [ { "id": "kal-001", ... } ], "heritage": [ ... ] }
//! ```
//!
//! Flattening assigns each product its collection key and keeps file order.
//! That order is the tie-break order of the search ranker, so grouped input is
//! read through [`GroupedProducts`] rather than a hash map.

use std::fmt;

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;

use crate::types::Product;

/// A product together with its derived, lowercase search text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchableProduct {
    product: Product,
    search_text: String,
}

impl SearchableProduct {
    /// Wrap a product and compute its search text.
    #[must_use]
    pub fn new(product: Product) -> Self {
        let search_text = build_search_text(&product);
        Self {
            product,
            search_text,
        }
    }

    #[must_use]
    pub const fn product(&self) -> &Product {
        &self.product
    }

    /// Lowercase concatenation of every searchable field.
    #[must_use]
    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    /// Whitespace-separated words of the search text.
    pub fn search_words(&self) -> impl Iterator<Item = &str> {
        self.search_text.split_whitespace()
    }
}

/// Join name, descriptions, collection, tags, material, stone and SEO text.
fn build_search_text(product: &Product) -> String {
    let fields = [
        Some(product.name.as_str()),
        Some(product.description.as_str()),
        Some(product.detailed_description.as_str()),
        Some(product.collection.as_str()),
    ]
    .into_iter()
    .chain(product.tags.iter().map(|tag| Some(tag.as_str())))
    .chain([
        product.material(),
        product.stone(),
        Some(product.seo.title.as_str()),
        Some(product.seo.description.as_str()),
    ]);

    fields
        .flatten()
        .filter(|field| !field.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Products grouped by collection key, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupedProducts(pub Vec<(String, Vec<Product>)>);

impl<'de> Deserialize<'de> for GroupedProducts {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct GroupsVisitor;

        impl<'de> Visitor<'de> for GroupsVisitor {
            type Value = GroupedProducts;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of collection key to product list")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut groups = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((collection, products)) =
                    map.next_entry::<String, Vec<Product>>()?
                {
                    groups.push((collection, products));
                }
                Ok(GroupedProducts(groups))
            }
        }

        deserializer.deserialize_map(GroupsVisitor)
    }
}

/// The in-memory product catalog.
///
/// Built once per load and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    products: Vec<SearchableProduct>,
}

impl Catalog {
    /// Build a catalog from an already flattened product list.
    #[must_use]
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            products: products.into_iter().map(SearchableProduct::new).collect(),
        }
    }

    /// Flatten grouped products, stamping each with its collection key.
    #[must_use]
    pub fn from_grouped(groups: GroupedProducts) -> Self {
        let products = groups
            .0
            .into_iter()
            .flat_map(|(collection, products)| {
                products.into_iter().map(move |mut product| {
                    product.collection.clone_from(&collection);
                    product
                })
            })
            .collect();
        Self::new(products)
    }

    /// Parse the grouped catalog file format.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or is not a map of product lists.
    pub fn from_grouped_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<GroupedProducts>(json).map(Self::from_grouped)
    }

    /// Parse a flattened snapshot as served by the catalog endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is not an array of products.
    pub fn from_flat_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Vec<Product>>(json).map(Self::new)
    }

    /// Single-product catalog used when no snapshot can be obtained.
    #[must_use]
    pub fn fallback() -> Self {
        let product = Product {
            id: "sample-1".to_string(),
            name: "Persian Turquoise Ring".to_string(),
            slug: "persian-turquoise-ring".to_string(),
            price: 285_000,
            sale_price: None,
            images: vec!["/images/product.jpg".to_string()],
            description: "Beautiful Persian turquoise ring with gold setting".to_string(),
            detailed_description: String::new(),
            collection: "kaleidoscope".to_string(),
            tags: vec![
                "ring".to_string(),
                "turquoise".to_string(),
                "gold".to_string(),
            ],
            specifications: std::collections::BTreeMap::new(),
            in_stock: true,
            stock_quantity: 0,
            featured: false,
            new_arrival: false,
            seo: crate::types::Seo::default(),
        };
        Self::new(vec![product])
    }

    /// Look a product up by id across all collections.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&Product> {
        self.products
            .iter()
            .map(SearchableProduct::product)
            .find(|product| product.id == id)
    }

    /// Searchable entries in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &SearchableProduct> {
        self.products.iter()
    }

    /// Products in catalog order.
    pub fn products(&self) -> impl Iterator<Item = &Product> {
        self.products.iter().map(SearchableProduct::product)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const GROUPED: &str = r#"{
        "talisman": [
            {"id": "tal-001", "name": "Talisman Pendant", "price": 120000,
             "description": "Hand engraved pendant", "tags": ["Pendant"],
             "specifications": {"material": "18K Yellow Gold", "stone": "Lapis", "weight": "4g"},
             "seo": {"title": "Talisman Pendant | Parisa", "description": "Engraved gold"}}
        ],
        "kaleidoscope": [
            {"id": "kal-001", "name": "Persian Turquoise Ring", "price": 285000},
            {"id": "kal-002", "name": "Kaleidoscope Earrings", "price": 195000}
        ]
    }"#;

    #[test]
    fn test_grouped_catalog_keeps_file_order() {
        let catalog = Catalog::from_grouped_json(GROUPED).unwrap();
        let ids: Vec<&str> = catalog.products().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["tal-001", "kal-001", "kal-002"]);
    }

    #[test]
    fn test_grouped_catalog_assigns_collection() {
        let catalog = Catalog::from_grouped_json(GROUPED).unwrap();
        assert_eq!(catalog.find("kal-002").unwrap().collection, "kaleidoscope");
        assert_eq!(catalog.find("tal-001").unwrap().collection, "talisman");
        assert!(catalog.find("missing").is_none());
    }

    #[test]
    fn test_search_text_is_lowercase_and_skips_other_specs() {
        let catalog = Catalog::from_grouped_json(GROUPED).unwrap();
        let entry = catalog.iter().next().unwrap();
        assert_eq!(
            entry.search_text(),
            "talisman pendant hand engraved pendant talisman pendant 18k yellow gold lapis \
             talisman pendant | parisa engraved gold"
        );
        assert!(!entry.search_text().contains("4g"));
    }

    #[test]
    fn test_search_text_skips_empty_fields() {
        let catalog = Catalog::from_grouped_json(GROUPED).unwrap();
        let entry = catalog.iter().nth(1).unwrap();
        assert_eq!(entry.search_text(), "persian turquoise ring kaleidoscope");
    }

    #[test]
    fn test_flat_snapshot() {
        let catalog = Catalog::from_flat_json(
            r#"[{"id": "a", "name": "A", "price": 1, "collection": "heritage"}]"#,
        )
        .unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.find("a").unwrap().collection, "heritage");
    }

    #[test]
    fn test_grouped_rejects_array() {
        assert!(Catalog::from_grouped_json("[]").is_err());
    }

    #[test]
    fn test_fallback_catalog() {
        let catalog = Catalog::fallback();
        assert_eq!(catalog.len(), 1);
        assert!(catalog.iter().next().unwrap().search_text().contains("turquoise"));
    }
}
