//! Relevance ranking.
//!
//! Scores are additive. Whole-query hits on name, description, collection,
//! tags and material/stone specifications dominate; per-word hits against the
//! search text refine the order. Only when nothing at all matched does a
//! single-typo pass award a few points.

use tracing::instrument;

use super::distance::levenshtein;
use super::{char_len, query_words};
use crate::catalog::{Catalog, SearchableProduct};
use crate::types::Product;

/// Whole query found in the product name.
pub const NAME_SCORE: u32 = 100;
/// Whole query found in the short description.
pub const DESCRIPTION_SCORE: u32 = 80;
/// Whole query found in the collection key.
pub const COLLECTION_SCORE: u32 = 70;
/// Whole query found in a tag (per tag).
pub const TAG_SCORE: u32 = 60;
/// Whole query found in the material or stone specification (each).
pub const SPECIFICATION_SCORE: u32 = 50;
/// Query word equals a search-text word.
pub const EXACT_WORD_SCORE: u32 = 30;
/// Search-text word contains a query word.
pub const PARTIAL_WORD_SCORE: u32 = 15;
/// Query word contains a search-text word.
pub const CONTAINED_WORD_SCORE: u32 = 10;
/// Query word is one edit away from a search-text word.
pub const TYPO_SCORE: u32 = 5;

/// Products scoring below this are dropped.
pub const MIN_SCORE: u32 = 10;
/// Maximum number of results returned.
pub const MAX_RESULTS: usize = 15;

/// Shortest query word considered for word matching.
const MIN_WORD_LEN: usize = 3;
/// Shortest query word considered for typo matching.
const MIN_TYPO_WORD_LEN: usize = 4;

/// A product with its relevance score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankedProduct<'a> {
    pub product: &'a Product,
    pub score: u32,
}

/// Score every product and return the best matches, highest score first.
///
/// `query` must already be normalized (lowercase, trimmed). Products with
/// equal scores keep their catalog order.
#[must_use]
#[instrument(skip(catalog), fields(catalog_size = catalog.len()))]
pub fn rank<'a>(query: &str, catalog: &'a Catalog) -> Vec<RankedProduct<'a>> {
    let words: Vec<&str> = query_words(query).collect();

    let mut ranked: Vec<RankedProduct<'a>> = catalog
        .iter()
        .map(|entry| RankedProduct {
            product: entry.product(),
            score: score(query, &words, entry),
        })
        .filter(|ranked| ranked.score >= MIN_SCORE)
        .collect();

    // sort_by is stable, so ties stay in catalog order
    ranked.sort_by(|a, b| b.score.cmp(&a.score));
    ranked.truncate(MAX_RESULTS);
    ranked
}

/// Like [`rank`] but returns only the products.
#[must_use]
pub fn search<'a>(query: &str, catalog: &'a Catalog) -> Vec<&'a Product> {
    rank(query, catalog)
        .into_iter()
        .map(|ranked| ranked.product)
        .collect()
}

/// Score one product against a normalized query.
#[must_use]
pub fn score(query: &str, words: &[&str], entry: &SearchableProduct) -> u32 {
    let product = entry.product();
    let mut total = 0;

    if product.name.to_lowercase().contains(query) {
        total += NAME_SCORE;
    }
    if product.description.to_lowercase().contains(query) {
        total += DESCRIPTION_SCORE;
    }
    if product.collection.to_lowercase().contains(query) {
        total += COLLECTION_SCORE;
    }

    for tag in &product.tags {
        if tag.to_lowercase().contains(query) {
            total += TAG_SCORE;
        }
    }

    for specification in [product.material(), product.stone()].into_iter().flatten() {
        if specification.to_lowercase().contains(query) {
            total += SPECIFICATION_SCORE;
        }
    }

    for word in words.iter().filter(|word| char_len(word) >= MIN_WORD_LEN) {
        for search_word in entry.search_words() {
            if search_word == *word {
                total += EXACT_WORD_SCORE;
            } else if search_word.contains(word) {
                total += PARTIAL_WORD_SCORE;
            } else if word.contains(search_word) && char_len(search_word) >= MIN_WORD_LEN {
                total += CONTAINED_WORD_SCORE;
            }
        }
    }

    if total == 0 {
        total = typo_score(words, entry);
    }

    total
}

/// Points for query words exactly one edit away from a search-text word.
fn typo_score(words: &[&str], entry: &SearchableProduct) -> u32 {
    let mut total = 0;
    for word in words {
        let word_len = char_len(word);
        if word_len < MIN_TYPO_WORD_LEN {
            continue;
        }
        for search_word in entry.search_words() {
            if word_len.abs_diff(char_len(search_word)) <= 1 && levenshtein(word, search_word) == 1
            {
                total += TYPO_SCORE;
            }
        }
    }
    total
}
