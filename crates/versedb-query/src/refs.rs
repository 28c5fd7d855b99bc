//! Scripture reference extraction from free-form queries.
//!
//! Finds the first canonical book name mentioned in the query (longest
//! match first, so "1 John" wins over "John") and an optional
//! `chapter[:verse[-verse]]` trailer. Downstream consumers use this to
//! check citations or narrow display; retrieval itself never requires a
//! reference to be present.

use std::sync::OnceLock;

use versedb_core::books::{canonical_name, KJV_BOOKS};

/// A book mention with optional chapter and verse range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptureRef {
    pub book: &'static str,
    pub chapter: Option<u32>,
    pub verse_start: Option<u32>,
    pub verse_end: Option<u32>,
}

/// Book-name spellings to search for, longest first. Includes the
/// canonical names plus tolerated variants.
fn search_names() -> &'static Vec<String> {
    static NAMES: OnceLock<Vec<String>> = OnceLock::new();
    NAMES.get_or_init(|| {
        let mut names: Vec<String> = KJV_BOOKS.iter().map(|b| b.to_lowercase()).collect();
        for variant in ["Psalm", "Proverb", "Lamentation", "Revelations"] {
            names.push(variant.to_lowercase());
        }
        names.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        names
    })
}

/// Extract the first Scripture reference from `raw`, if any.
pub fn extract_reference(raw: &str) -> Option<ScriptureRef> {
    let lowered = raw.to_lowercase();

    let (name, end) = search_names()
        .iter()
        .filter_map(|name| find_word(&lowered, name).map(|pos| (name, pos + name.len())))
        .min_by_key(|(name, end)| (end - name.len(), usize::MAX - name.len()))?;

    let book = canonical_name(name)?;
    let (chapter, verse_start, verse_end) = parse_trailer(&lowered[end..]);
    Some(ScriptureRef { book, chapter, verse_start, verse_end })
}

/// First occurrence of `needle` in `haystack` bounded by non-alphanumeric
/// characters on both sides.
fn find_word(haystack: &str, needle: &str) -> Option<usize> {
    let mut from = 0;
    while let Some(rel) = haystack[from..].find(needle) {
        let pos = from + rel;
        let end = pos + needle.len();
        let left_ok = pos == 0
            || !haystack[..pos].chars().next_back().is_some_and(char::is_alphanumeric);
        let right_ok = end == haystack.len()
            || !haystack[end..].chars().next().is_some_and(char::is_alphanumeric);
        if left_ok && right_ok {
            return Some(pos);
        }
        from = pos + 1;
    }
    None
}

/// Parse an optional ` chapter[:verse[-verse]]` trailer.
fn parse_trailer(rest: &str) -> (Option<u32>, Option<u32>, Option<u32>) {
    let rest = rest.trim_start();
    let (chapter, rest) = match take_number(rest) {
        Some(pair) => pair,
        None => return (None, None, None),
    };
    let Some(rest) = rest.strip_prefix(':') else {
        return (Some(chapter), None, None);
    };
    let Some((verse_start, rest)) = take_number(rest) else {
        return (Some(chapter), None, None);
    };
    let verse_end = rest.strip_prefix('-').and_then(take_number).map(|(v, _)| v);
    (Some(chapter), Some(verse_start), verse_end)
}

fn take_number(s: &str) -> Option<(u32, &str)> {
    let digits: usize = s.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits == 0 || digits > 3 {
        return None;
    }
    s[..digits].parse().ok().map(|n| (n, &s[digits..]))
}
