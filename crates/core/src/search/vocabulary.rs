//! Data behind the query validator.
//!
//! Everything tunable about admissibility lives here as plain data: the
//! jewelry vocabulary, the denylist and the gibberish thresholds. The
//! predicates that read it are in [`super::validator`].

/// Product types.
pub const CATEGORIES: &[&str] = &[
    "ring", "rings", "necklace", "necklaces", "earring", "earrings", "bracelet", "bracelets",
    "pendant", "pendants", "brooch", "brooches", "cuff", "cuffs",
];

/// Materials and stones.
pub const MATERIALS: &[&str] = &[
    "gold", "18k", "yellow", "white", "rose", "silver", "platinum", "turquoise", "persian",
    "diamond", "diamonds", "stone", "stones",
];

/// Collection names.
pub const COLLECTIONS: &[&str] = &[
    "kaleidoscope",
    "heritage",
    "talisman",
    "forever",
    "bespoke",
    "calligraphy",
];

/// Styles and descriptions.
pub const STYLES: &[&str] = &[
    "statement",
    "minimalist",
    "classic",
    "modern",
    "traditional",
    "luxury",
    "elegant",
    "bold",
    "delicate",
    "vintage",
    "contemporary",
];

/// Occasions.
pub const OCCASIONS: &[&str] = &[
    "wedding",
    "bridal",
    "engagement",
    "anniversary",
    "gift",
    "birthday",
    "special",
];

/// Common jewelry terms.
pub const TERMS: &[&str] = &[
    "chain", "setting", "prong", "bezel", "clasp", "band", "charm", "stud", "drop", "hoop",
    "tennis", "eternity", "solitaire", "cluster",
];

/// Terms that reject a query wherever they appear, even inside another word.
pub const DENIED_TERMS: &[&str] = &[
    "sex", "sexual", "porn", "xxx", "adult", "nude", "naked", "fuck", "shit", "damn", "hell",
    "bitch", "ass", "dick", "cock", "pussy", "tits", "boobs", "gay", "lesbian", "drug", "drugs",
];

/// Minimum term length for prefix matching against the vocabulary.
const MIN_PREFIX_TERM_LEN: usize = 4;

/// Domain vocabulary a query must touch to be admissible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    terms: Vec<String>,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::jewelry()
    }
}

impl Vocabulary {
    /// The storefront's jewelry vocabulary.
    #[must_use]
    pub fn jewelry() -> Self {
        Self::from_terms(
            [CATEGORIES, MATERIALS, COLLECTIONS, STYLES, OCCASIONS, TERMS]
                .into_iter()
                .flatten()
                .copied(),
        )
    }

    /// Build a vocabulary from arbitrary terms (lowercased).
    pub fn from_terms<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            terms: terms
                .into_iter()
                .map(|term| term.as_ref().to_lowercase())
                .collect(),
        }
    }

    /// Whether `word` is a vocabulary hit.
    ///
    /// A hit is an exact term; or, for words of 3+ characters, a prefix of a
    /// term of 4+ characters; or, for words of 4+ characters, a word sharing
    /// its first three characters with a term of 4+ characters.
    #[must_use]
    pub fn matches(&self, word: &str) -> bool {
        if self.terms.iter().any(|term| term == word) {
            return true;
        }

        let word_len = super::char_len(word);
        if word_len < 3 {
            return false;
        }
        let stem = super::char_prefix(word, 3);

        self.terms
            .iter()
            .filter(|term| super::char_len(term) >= MIN_PREFIX_TERM_LEN)
            .any(|term| term.starts_with(word) || (word_len >= 4 && term.starts_with(stem)))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// Substring denylist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Denylist {
    terms: Vec<String>,
}

impl Default for Denylist {
    fn default() -> Self {
        Self::from_terms(DENIED_TERMS.iter().copied())
    }
}

impl Denylist {
    pub fn from_terms<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            terms: terms
                .into_iter()
                .map(|term| term.as_ref().to_lowercase())
                .collect(),
        }
    }

    /// Whether any denied term occurs anywhere in `query`.
    #[must_use]
    pub fn matches(&self, query: &str) -> bool {
        self.terms.iter().any(|term| query.contains(term.as_str()))
    }
}

/// Thresholds for the keyboard-mash heuristic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GibberishRules {
    /// Only words strictly longer than this are inspected.
    pub min_word_len: usize,
    /// Letters counted as consonants.
    pub consonants: String,
    /// Consecutive consonants that mark a word as gibberish.
    pub consonant_run: usize,
    /// Repetitions of one character that mark a word as gibberish.
    pub repeat_run: usize,
    /// Keyboard-adjacent key groups.
    pub key_clusters: Vec<String>,
    /// Consecutive characters from one cluster that mark a word as gibberish.
    pub cluster_run: usize,
}

impl Default for GibberishRules {
    fn default() -> Self {
        Self {
            min_word_len: 8,
            consonants: "bcdfghjklmnpqrstvwxyz".to_string(),
            consonant_run: 5,
            repeat_run: 4,
            key_clusters: vec!["asd".to_string(), "qwe".to_string(), "zxc".to_string()],
            cluster_run: 3,
        }
    }
}
