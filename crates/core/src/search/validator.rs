//! Query admissibility.
//!
//! A query is admissible when it is too short to judge, or when it is free
//! of gibberish and denied terms and at least one word relates to jewelry
//! (through the vocabulary) or to the catalog (through product names).

use std::sync::LazyLock;

use tracing::debug;

use super::vocabulary::{Denylist, GibberishRules, Vocabulary};
use super::{char_len, normalize_query, query_words};
use crate::catalog::Catalog;

/// Queries shorter than this are always admissible.
pub const MIN_JUDGED_QUERY_LEN: usize = 3;

static DEFAULT_VALIDATOR: LazyLock<QueryValidator> = LazyLock::new(QueryValidator::default);

/// Decide admissibility with the default vocabulary, denylist and rules.
#[must_use]
pub fn is_admissible(query: &str, catalog: &Catalog) -> bool {
    DEFAULT_VALIDATOR.is_admissible(query, catalog)
}

/// Query admissibility checks over explicit data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryValidator {
    vocabulary: Vocabulary,
    denylist: Denylist,
    gibberish: GibberishRules,
}

impl QueryValidator {
    #[must_use]
    pub const fn new(vocabulary: Vocabulary, denylist: Denylist, gibberish: GibberishRules) -> Self {
        Self {
            vocabulary,
            denylist,
            gibberish,
        }
    }

    /// Whether `query` may be passed on to the ranker.
    #[must_use]
    pub fn is_admissible(&self, query: &str, catalog: &Catalog) -> bool {
        let query = normalize_query(query);
        if char_len(&query) < MIN_JUDGED_QUERY_LEN {
            return true;
        }

        let words: Vec<&str> = query_words(&query).collect();

        if words.iter().any(|word| is_gibberish(word, &self.gibberish)) {
            debug!(query = %query, "Rejected query with random character pattern");
            return false;
        }

        if self.denylist.matches(&query) {
            debug!(query = %query, "Rejected query with denied term");
            return false;
        }

        words.iter().any(|word| self.vocabulary.matches(word))
            || words.iter().any(|word| product_name_hit(word, catalog))
    }
}

/// Whether a word looks like keyboard mashing.
///
/// Only words longer than `rules.min_word_len` are inspected.
#[must_use]
pub fn is_gibberish(word: &str, rules: &GibberishRules) -> bool {
    if char_len(word) <= rules.min_word_len {
        return false;
    }

    let word = word.to_lowercase();

    has_run(&word, rules.consonant_run, |c| rules.consonants.contains(c))
        || has_repeat(&word, rules.repeat_run)
        || rules
            .key_clusters
            .iter()
            .any(|cluster| has_run(&word, rules.cluster_run, |c| cluster.contains(c)))
}

/// Whether `word` relates to some product name in the catalog.
///
/// Words of 3+ characters match a name word exactly; words of 4+ characters
/// also match as a prefix of a name word of 4+ characters.
#[must_use]
pub fn product_name_hit(word: &str, catalog: &Catalog) -> bool {
    let word_len = char_len(word);
    if word_len < 3 {
        return false;
    }

    catalog.products().any(|product| {
        product
            .name
            .to_lowercase()
            .split_whitespace()
            .any(|name_word| {
                name_word == word
                    || (word_len >= 4 && char_len(name_word) >= 4 && name_word.starts_with(word))
            })
    })
}

/// At least `min` consecutive characters satisfying `pred`.
fn has_run(word: &str, min: usize, pred: impl Fn(char) -> bool) -> bool {
    let mut run = 0;
    for c in word.chars() {
        if pred(c) {
            run += 1;
            if run >= min {
                return true;
            }
        } else {
            run = 0;
        }
    }
    false
}

/// One character repeated at least `min` times in a row.
fn has_repeat(word: &str, min: usize) -> bool {
    let mut previous = None;
    let mut run = 0;
    for c in word.chars() {
        if previous == Some(c) {
            run += 1;
        } else {
            previous = Some(c);
            run = 1;
        }
        if run >= min {
            return true;
        }
    }
    false
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::Product;

    fn catalog() -> Catalog {
        let product: Product = serde_json::from_str(
            r#"{"id": "her-004", "name": "Nightingale Locket", "price": 99000}"#,
        )
        .unwrap();
        Catalog::new(vec![product])
    }

    #[test]
    fn test_short_queries_are_admissible() {
        let catalog = Catalog::default();
        for query in ["", "a", "zz", "  q  ", "xx"] {
            assert!(is_admissible(query, &catalog), "{query:?} should pass");
        }
    }

    #[test]
    fn test_vocabulary_queries_are_admissible() {
        let catalog = Catalog::default();
        assert!(is_admissible("gold ring", &catalog));
        assert!(is_admissible("Persian Turquoise", &catalog));
        assert!(is_admissible("wedding band", &catalog));
        assert!(is_admissible("neckl", &catalog));
    }

    #[test]
    fn test_unrelated_queries_are_rejected() {
        let catalog = Catalog::default();
        assert!(!is_admissible("laptop computer", &catalog));
        assert!(!is_admissible("xyz", &catalog));
    }

    #[test]
    fn test_denied_terms_reject_regardless_of_content() {
        let catalog = catalog();
        assert!(!is_admissible("gold ring xxx", &catalog));
        assert!(!is_admissible("diamond drugstore", &catalog));
        assert!(!is_admissible("nightingale hell", &catalog));
    }

    #[test]
    fn test_gibberish_words_are_rejected() {
        let catalog = Catalog::default();
        assert!(!is_admissible("resoasdasdads", &catalog));
        assert!(!is_admissible("gold ringgggggg", &catalog));
        assert!(!is_admissible("bcdfghjklm ring", &catalog));
        assert!(!is_admissible("qweqweqwering", &catalog));
    }

    #[test]
    fn test_long_real_words_are_not_gibberish() {
        let rules = GibberishRules::default();
        assert!(!is_gibberish("kaleidoscope", &rules));
        assert!(!is_gibberish("anniversary", &rules));
        assert!(!is_gibberish("calligraphy", &rules));
        // short words are never inspected
        assert!(!is_gibberish("asdasd", &rules));
    }

    #[test]
    fn test_product_name_matches() {
        let catalog = catalog();
        assert!(is_admissible("nightingale", &catalog));
        assert!(is_admissible("night", &catalog));
        assert!(!is_admissible("nig", &catalog));
        assert!(product_name_hit("locket", &catalog));
        assert!(!product_name_hit("lock", &Catalog::default()));
    }

    #[test]
    fn test_custom_vocabulary() {
        let validator = QueryValidator::new(
            Vocabulary::from_terms(["watch"]),
            Denylist::from_terms(Vec::<String>::new()),
            GibberishRules::default(),
        );
        assert!(validator.is_admissible("watches", &Catalog::default()));
        assert!(!validator.is_admissible("gold ring", &Catalog::default()));
    }
}
