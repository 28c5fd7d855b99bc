//! Rhetorical mode detection.
//!
//! A data-driven trigger table maps each mode to a set of trigger phrases;
//! every mode is evaluated the same way, so adding a mode is a table edit,
//! not a new branch. Triggers are written in surface form and pushed
//! through the normalizer at table construction, which keeps them in the
//! same lemma space as the query they are matched against.

use std::sync::OnceLock;

use versedb_core::types::QueryMode;

use crate::normalize::{NormalizedQuery, Normalizer};

/// Surface-form trigger phrases per mode, distilled from the rhetoric the
/// corpus itself uses for each genre.
const DEFAULT_TRIGGERS: &[(QueryMode, &[&str])] = &[
    (
        QueryMode::Law,
        &[
            "thou shalt",
            "thou shalt not",
            "shalt not",
            "ye shall",
            "shall not",
            "must not",
            "do not",
            "command",
            "commandment",
            "forbid",
            "forbidden",
            "prohibited",
            "unlawful",
            "obey",
            "keep the law",
            "keep my commandments",
        ],
    ),
    (
        QueryMode::Discourse,
        &[
            "what does",
            "what did",
            "what do",
            "why did",
            "why does",
            "why do",
            "how does",
            "how did",
            "explain",
            "teaches",
            "taught",
            "jesus said",
            "jesus taught",
            "he said",
            "blessed are",
            "verily",
            "sermon",
            "parable",
        ],
    ),
    (
        QueryMode::Prophecy,
        &[
            "thus saith the lord",
            "saith the lord",
            "the days are coming",
            "days will come",
            "shall come to pass",
            "i will bring",
            "i will send",
            "woe unto",
            "repent",
            "turn ye",
            "vision",
            "prophecy",
            "prophet",
        ],
    ),
    (
        QueryMode::Lookup,
        &[
            "where does",
            "where did",
            "where is",
            "where are",
            "where in the bible",
            "which book",
            "which chapter",
            "which verse",
            "what book",
            "what chapter",
            "what verse",
            "appear in",
            "appears in",
            "located",
            "chapter",
            "verse",
        ],
    ),
    (
        QueryMode::Wisdom,
        &[
            "what does the bible say about",
            "what is wisdom",
            "how should",
            "meaning of life",
            "how to live",
            "blessed is",
            "happy is",
            "fear of the lord",
            "wisdom",
            "proverb",
        ],
    ),
    (
        QueryMode::Narrative,
        &["what happened", "story of", "tell me about", "history of", "who was"],
    ),
];

/// Mode → trigger table, pre-lemmatized.
pub struct TriggerTable {
    entries: Vec<(QueryMode, Vec<Trigger>)>,
}

enum Trigger {
    Word(String),
    Phrase(String),
}

impl TriggerTable {
    /// Build a table from surface-form trigger phrases.
    pub fn from_triggers<'a>(
        triggers: impl IntoIterator<Item = (QueryMode, &'a [&'a str])>,
    ) -> Self {
        let normalizer = Normalizer::default();
        let entries = triggers
            .into_iter()
            .map(|(mode, phrases)| {
                let compiled = phrases.iter().map(|p| compile_trigger(&normalizer, p)).collect();
                (mode, compiled)
            })
            .collect();
        Self { entries }
    }

    /// The built-in table; constructed once per process.
    pub fn default_table() -> &'static TriggerTable {
        static TABLE: OnceLock<TriggerTable> = OnceLock::new();
        TABLE.get_or_init(|| TriggerTable::from_triggers(DEFAULT_TRIGGERS.iter().copied()))
    }

    /// Trigger match count per mode, in table order.
    pub fn scores(&self, query: &NormalizedQuery) -> Vec<(QueryMode, usize)> {
        let padded = format!(" {} ", query.tokens.join(" "));
        self.entries
            .iter()
            .map(|(mode, triggers)| {
                let count = triggers.iter().filter(|t| t.matches(query, &padded)).count();
                (*mode, count)
            })
            .collect()
    }

    /// Detect the query mode. Highest trigger count wins; ties fall back to
    /// `priority` order (modes missing from `priority` lose to listed ones);
    /// no match at all is `Generic`. Total — never fails.
    pub fn classify(&self, query: &NormalizedQuery, priority: &[QueryMode]) -> QueryMode {
        let scores = self.scores(query);
        let best = scores.iter().map(|(_, c)| *c).max().unwrap_or(0);
        if best == 0 {
            return QueryMode::Generic;
        }
        let rank = |mode: QueryMode| {
            priority.iter().position(|m| *m == mode).unwrap_or(priority.len())
        };
        scores
            .iter()
            .filter(|(_, count)| *count == best)
            .map(|(mode, _)| *mode)
            .min_by_key(|mode| (rank(*mode), mode.as_str()))
            .unwrap_or(QueryMode::Generic)
    }
}

impl Trigger {
    fn matches(&self, query: &NormalizedQuery, padded_tokens: &str) -> bool {
        match self {
            Trigger::Word(w) => query.tokens.iter().any(|t| t == w),
            Trigger::Phrase(p) => padded_tokens.contains(p.as_str()),
        }
    }
}

fn compile_trigger(normalizer: &Normalizer, surface: &str) -> Trigger {
    let lemmas = normalizer.normalize(surface).tokens;
    if lemmas.len() == 1 {
        Trigger::Word(lemmas.into_iter().next().unwrap_or_default())
    } else {
        Trigger::Phrase(format!(" {} ", lemmas.join(" ")))
    }
}

/// Classify with the built-in trigger table.
pub fn classify(query: &NormalizedQuery, priority: &[QueryMode]) -> QueryMode {
    TriggerTable::default_table().classify(query, priority)
}
