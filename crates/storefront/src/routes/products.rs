//! Public catalog endpoint.

use std::collections::BTreeMap;

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use parisa_core::{Product, Seo};
use serde::Serialize;
use tracing::instrument;

use crate::catalog::CatalogError;
use crate::error::Result;
use crate::state::AppState;

/// Clients may cache the catalog for an hour.
pub const CATALOG_CACHE_CONTROL: &str = "max-age=3600";

/// Product as exposed to clients: everything except the stock count.
#[derive(Debug, Serialize)]
pub struct PublicProduct<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub slug: &'a str,
    pub price: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sale_price: Option<i64>,
    pub images: &'a [String],
    pub description: &'a str,
    pub detailed_description: &'a str,
    pub collection: &'a str,
    pub tags: &'a [String],
    pub specifications: &'a BTreeMap<String, String>,
    pub in_stock: bool,
    pub featured: bool,
    pub new_arrival: bool,
    pub seo: &'a Seo,
}

impl<'a> From<&'a Product> for PublicProduct<'a> {
    fn from(product: &'a Product) -> Self {
        Self {
            id: &product.id,
            name: &product.name,
            slug: &product.slug,
            price: product.price,
            sale_price: product.sale_price,
            images: &product.images,
            description: &product.description,
            detailed_description: &product.detailed_description,
            collection: &product.collection,
            tags: &product.tags,
            specifications: &product.specifications,
            in_stock: product.in_stock,
            featured: product.featured,
            new_arrival: product.new_arrival,
            seo: &product.seo,
        }
    }
}

/// `GET /api/products` - flattened catalog in file order.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Response> {
    let products: Vec<PublicProduct<'_>> =
        state.catalog().products().map(PublicProduct::from).collect();
    let body = serde_json::to_vec(&products).map_err(CatalogError::Encode)?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/json"),
            (header::CACHE_CONTROL, CATALOG_CACHE_CONTROL),
        ],
        body,
    )
        .into_response())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use parisa_core::Catalog;

    use super::*;

    #[test]
    fn test_public_product_hides_stock_quantity() {
        let catalog = Catalog::fallback();
        let product = catalog.find("sample-1").unwrap();

        let json = serde_json::to_value(PublicProduct::from(product)).unwrap();
        assert!(json.get("stock_quantity").is_none());
        assert_eq!(json["collection"], "kaleidoscope");
        assert_eq!(json["in_stock"], true);
        assert!(json.get("sale_price").is_none());
    }
}
