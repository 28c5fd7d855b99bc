//! Deterministic lemmatization.
//!
//! A small exception table for irregular and archaic forms sits in front of
//! the Snowball English stemmer. The output is not always a dictionary
//! headword — it only has to be stable, and identical on the query side and
//! the chunk side, which is what phrase comparison needs. Unknown tokens
//! pass through unchanged; this never fails.

use std::collections::HashMap;
use std::sync::OnceLock;

use rust_stemmers::{Algorithm, Stemmer};

/// Irregular forms the suffix stemmer cannot reach, weighted toward the
/// KJV's verb inventory.
const EXCEPTIONS: &[(&str, &str)] = &[
    ("said", "say"), ("saith", "say"), ("says", "say"),
    ("spake", "speak"), ("spoke", "speak"), ("spoken", "speak"),
    ("did", "do"), ("does", "do"), ("done", "do"), ("doth", "do"), ("dost", "do"),
    ("went", "go"), ("gone", "go"),
    ("came", "come"),
    ("gave", "give"), ("given", "give"),
    ("made", "make"),
    ("wrote", "write"), ("written", "write"),
    ("taught", "teach"),
    ("brought", "bring"),
    ("kept", "keep"),
    ("begat", "beget"), ("begotten", "beget"),
    ("smote", "smite"), ("smitten", "smite"),
    ("slew", "slay"), ("slain", "slay"),
    ("sware", "swear"), ("sworn", "swear"),
    ("men", "man"),
    ("women", "woman"),
    ("children", "child"),
    ("feet", "foot"),
    ("mice", "mouse"),
    ("oxen", "ox"),
];

pub struct Lemmatizer {
    stemmer: Stemmer,
    exceptions: HashMap<&'static str, &'static str>,
}

impl Lemmatizer {
    fn new() -> Self {
        Self {
            stemmer: Stemmer::create(Algorithm::English),
            exceptions: EXCEPTIONS.iter().copied().collect(),
        }
    }

    /// Lemma for a lowercased token. Non-ASCII-alphabetic tokens pass
    /// through untouched.
    pub fn lemma(&self, token: &str) -> String {
        if let Some(base) = self.exceptions.get(token) {
            return (*base).to_string();
        }
        if token.chars().all(|c| c.is_ascii_alphabetic()) {
            self.stemmer.stem(token).to_string()
        } else {
            token.to_string()
        }
    }
}

/// Process-wide lemmatizer: built on first use, immutable afterwards,
/// shared by concurrent queries.
pub fn lemmatizer() -> &'static Lemmatizer {
    static LEMMATIZER: OnceLock<Lemmatizer> = OnceLock::new();
    LEMMATIZER.get_or_init(Lemmatizer::new)
}
