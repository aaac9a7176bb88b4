//! Catalog search.
//!
//! # Usage
//!
//! ```bash
//! parisa search turquoise ring
//! ```

use std::io::{self, Write};

use parisa_core::search::present::{capitalize_words, result_count_label};
use parisa_core::search::{QueryValidator, normalize_query, rank};
use parisa_core::{Catalog, format_minor_units};

use crate::client::StorefrontClient;

/// Search the storefront catalog and print the ranked results.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub async fn run(client: &StorefrontClient, query: &str, out: &mut impl Write) -> io::Result<()> {
    let catalog = client.catalog_or_fallback().await;
    render(&catalog, query, out)
}

/// Rank `query` against `catalog` and write the results.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn render(catalog: &Catalog, query: &str, out: &mut impl Write) -> io::Result<()> {
    let query = normalize_query(query);
    if query.is_empty() {
        return writeln!(out, "Enter a search term");
    }

    if !QueryValidator::default().is_admissible(&query, catalog) {
        return writeln!(out, "No products found for \"{query}\"");
    }

    let results = rank(&query, catalog);
    if results.is_empty() {
        return writeln!(out, "No products found for \"{query}\"");
    }

    writeln!(out, "{} for \"{query}\"", result_count_label(results.len()))?;
    for ranked in results {
        let product = ranked.product;
        writeln!(
            out,
            "  {:<40} {:>12}  {:<14} {}",
            product.name,
            format_minor_units(product.price),
            capitalize_words(&product.collection),
            product.detail_path(),
        )?;
    }
    Ok(())
}
