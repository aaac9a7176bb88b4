//! Catalog search.
//!
//! Search runs in two stages:
//!
//! 1. [`validator`] decides whether a query is worth ranking at all. Gibberish,
//!    abusive terms and queries with no connection to jewelry are rejected so
//!    the ranker never produces junk results for them.
//! 2. [`ranker`] scores every catalog product with an additive heuristic and
//!    returns at most [`ranker::MAX_RESULTS`] products, best first.
//!
//! Both stages are pure functions over a [`Catalog`](crate::Catalog) and the
//! data in [`vocabulary`].

pub mod distance;
pub mod present;
pub mod ranker;
pub mod validator;
pub mod vocabulary;

pub use distance::levenshtein;
pub use ranker::{RankedProduct, rank, search};
pub use validator::{QueryValidator, is_admissible};
pub use vocabulary::{Denylist, GibberishRules, Vocabulary};

/// Lowercase and trim a raw query the way both stages expect it.
#[must_use]
pub fn normalize_query(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Split a normalized query into words.
pub(crate) fn query_words(query: &str) -> impl Iterator<Item = &str> {
    query.split_whitespace()
}

/// Character count, which is what every length rule in this module measures.
pub(crate) fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// The first `n` characters of `s` (all of it when shorter).
pub(crate) fn char_prefix(s: &str, n: usize) -> &str {
    s.char_indices().nth(n).map_or(s, |(idx, _)| &s[..idx])
}
