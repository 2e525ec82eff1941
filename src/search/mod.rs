//! Tool search: staged resolution of a free-text query.
//!
//! Stages, first hit wins:
//!   1. exact number  : query parses as an integer equal to a tool number
//!   2. partial name  : case-folded substring of the tool name
//!   3. fuzzy name    : similarity ratio above the configured threshold
//!
//! Stages 1 and 2 combine (exact hit first). A single exact/partial hit is
//! selected directly; anything else, including a lone fuzzy hit, goes to the
//! user for disambiguation. Resolution never touches the inventory.

pub mod similarity;

use serde::Serialize;

use crate::inventory::ToolRecord;
use crate::types::{SearchConfig, ToolNumber};

pub use similarity::ratio;

/// How a candidate matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    Exact,
    Partial,
    Fuzzy,
}

/// One tool offered as a search result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candidate {
    pub number: ToolNumber,
    pub name: String,
    pub kind: MatchKind,
    /// 1.0 for exact and partial hits; the similarity ratio for fuzzy ones.
    pub score: f64,
}

impl Candidate {
    fn new(record: &ToolRecord, kind: MatchKind, score: f64) -> Self {
        Self {
            number: record.number,
            name: record.name.to_string(),
            kind,
            score,
        }
    }
}

/// Outcome of resolving one query.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SearchOutcome {
    /// Blank query; nothing was searched.
    Skipped,
    /// Exactly one exact/partial hit. Select it.
    Unique { candidate: Candidate },
    /// Several hits, or fuzzy-only hits. The user must pick one.
    Ambiguous { candidates: Vec<Candidate> },
    /// No stage matched.
    NotFound,
}

impl SearchOutcome {
    pub fn candidates(&self) -> &[Candidate] {
        match self {
            SearchOutcome::Unique { candidate } => std::slice::from_ref(candidate),
            SearchOutcome::Ambiguous { candidates } => candidates,
            SearchOutcome::Skipped | SearchOutcome::NotFound => &[],
        }
    }
}

/// Stateless query resolver.
#[derive(Debug, Clone, Default)]
pub struct SearchEngine {
    config: SearchConfig,
}

impl SearchEngine {
    pub fn new(config: SearchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Resolve `query` against `records` (store order).
    pub fn resolve(&self, query: &str, records: &[ToolRecord]) -> SearchOutcome {
        let query = query.trim();
        if query.is_empty() {
            return SearchOutcome::Skipped;
        }
        let folded = query.to_lowercase();

        let mut hits = Vec::new();
        let exact = query
            .parse::<u32>()
            .ok()
            .and_then(|n| records.iter().find(|r| r.number.get() == n));
        if let Some(record) = exact {
            hits.push(Candidate::new(record, MatchKind::Exact, 1.0));
        }
        hits.extend(
            records
                .iter()
                .filter(|r| Some(r.number) != exact.map(|e| e.number))
                .filter(|r| r.name.as_str().to_lowercase().contains(&folded))
                .map(|r| Candidate::new(r, MatchKind::Partial, 1.0)),
        );

        if !hits.is_empty() {
            tracing::debug!("search_direct_hits: query={:?}, hits={}", query, hits.len());
            return if hits.len() == 1 {
                SearchOutcome::Unique {
                    candidate: hits.remove(0),
                }
            } else {
                SearchOutcome::Ambiguous { candidates: hits }
            };
        }

        let mut fuzzy: Vec<Candidate> = records
            .iter()
            .filter_map(|r| {
                let score = ratio(&folded, &r.name.as_str().to_lowercase());
                (score > self.config.fuzzy_threshold)
                    .then(|| Candidate::new(r, MatchKind::Fuzzy, score))
            })
            .collect();
        // stable: equal scores keep store order
        fuzzy.sort_by(|a, b| b.score.total_cmp(&a.score));
        if let Some(cap) = self.config.max_fuzzy_candidates {
            fuzzy.truncate(cap.max(1));
        }

        tracing::debug!("search_fuzzy_hits: query={:?}, hits={}", query, fuzzy.len());
        if fuzzy.is_empty() {
            SearchOutcome::NotFound
        } else {
            SearchOutcome::Ambiguous { candidates: fuzzy }
        }
    }
}
