//! Fixed stopword set.
//!
//! Deliberately narrower than a general-purpose English list: negations
//! ("not", "no", "nor"), interrogatives ("what", "why", "how", ...) and
//! archaic KJV forms ("thou", "shalt", "hath", ...) are kept as content —
//! in this corpus they carry the distinction between a command, a question
//! and a narration.

use std::collections::HashSet;
use std::sync::OnceLock;

const STOPWORDS: &[&str] = &[
    "a", "an", "the", "and", "or", "but", "if", "then", "than", "so",
    "as", "of", "in", "on", "at", "to", "from", "by", "with", "about",
    "into", "unto", "upon", "over", "under", "again", "also", "very",
    "is", "am", "are", "was", "were", "be", "been", "being",
    "have", "has", "had", "having", "do", "does", "did", "doing",
    "will", "would", "shall", "should", "can", "could", "may", "might",
    "i", "me", "my", "mine", "we", "us", "our", "ours",
    "you", "your", "yours", "he", "him", "his", "she", "her", "hers",
    "it", "its", "they", "them", "their", "theirs",
    "this", "that", "these", "those", "there", "here",
    "for", "because", "while", "during", "before", "after",
    "all", "any", "both", "each", "few", "more", "most", "other",
    "some", "such", "only", "own", "same", "too", "just",
];

/// Whether `token` (already lowercased) is a stopword.
pub fn is_stopword(token: &str) -> bool {
    static SET: OnceLock<HashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| STOPWORDS.iter().copied().collect()).contains(token)
}
