//! Query normalization: lowercase, tokenize, drop stopwords, lemmatize,
//! extract candidate phrases.

use std::collections::{BTreeSet, HashSet};

use crate::lemma::lemmatizer;
use crate::stopwords::is_stopword;

/// The derived artifacts of one raw query.
///
/// - `text`: space-joined non-stopword lemmas, the embedding-friendly form
/// - `tokens`: every lemma in order, stopwords included — the mode
///   classifier reads this, since function words distinguish a question
///   from a command
/// - `lemmas`: the non-stopword lemma set
/// - `phrases`: contiguous n-grams over stopword-free token runs,
///   deduplicated, insertion order preserved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedQuery {
    pub text: String,
    pub tokens: Vec<String>,
    pub lemmas: BTreeSet<String>,
    pub phrases: Vec<String>,
}

/// Pure normalizer; the n-gram range comes from configuration.
#[derive(Debug, Clone, Copy)]
pub struct Normalizer {
    ngram_min: usize,
    ngram_max: usize,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self { ngram_min: 2, ngram_max: 4 }
    }
}

impl Normalizer {
    pub fn new(ngram_min: usize, ngram_max: usize) -> Self {
        Self { ngram_min, ngram_max }
    }

    pub fn normalize(&self, raw: &str) -> NormalizedQuery {
        let lemmas_with_flags = lemmatize_tokens(raw);

        let tokens: Vec<String> = lemmas_with_flags.iter().map(|(l, _)| l.clone()).collect();
        let content: Vec<&str> = lemmas_with_flags
            .iter()
            .filter(|(_, stop)| !stop)
            .map(|(l, _)| l.as_str())
            .collect();
        let text = content.join(" ");
        let lemmas: BTreeSet<String> = content.iter().map(|l| (*l).to_string()).collect();
        let phrases = self.ngrams_over_runs(&lemmas_with_flags);

        NormalizedQuery { text, tokens, lemmas, phrases }
    }

    /// Phrase set of an arbitrary text under the same pipeline; the
    /// reranker uses this on chunk text so both sides compare in the same
    /// lemma space.
    pub fn phrase_set(&self, text: &str) -> HashSet<String> {
        self.ngrams_over_runs(&lemmatize_tokens(text)).into_iter().collect()
    }

    /// n-grams over consecutive non-stopword lemmas; a stopword ends the
    /// current run. Deduplicated, first occurrence kept.
    fn ngrams_over_runs(&self, lemmas: &[(String, bool)]) -> Vec<String> {
        let mut phrases = Vec::new();
        let mut seen = HashSet::new();
        let mut run: Vec<&str> = Vec::new();

        let flush = |run: &mut Vec<&str>, phrases: &mut Vec<String>, seen: &mut HashSet<String>| {
            for n in self.ngram_min..=self.ngram_max {
                if run.len() < n {
                    break;
                }
                for window in run.windows(n) {
                    let phrase = window.join(" ");
                    if seen.insert(phrase.clone()) {
                        phrases.push(phrase);
                    }
                }
            }
            run.clear();
        };

        for (lemma, stop) in lemmas {
            if *stop {
                flush(&mut run, &mut phrases, &mut seen);
            } else {
                run.push(lemma.as_str());
            }
        }
        flush(&mut run, &mut phrases, &mut seen);
        phrases
    }
}

/// Lowercase, split on non-alphanumeric boundaries, lemmatize; each lemma
/// is flagged with whether its surface form was a stopword.
fn lemmatize_tokens(raw: &str) -> Vec<(String, bool)> {
    let lemmer = lemmatizer();
    let lowered = raw.to_lowercase();
    lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| (lemmer.lemma(t), is_stopword(t)))
        .collect()
}
