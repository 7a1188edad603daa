//! Case Retrieval: pluggable, trait-based lookup of precedent cases for a diagnosis.
//!
//! Default: `KeywordRetriever` (substring token overlap, deterministic, fully testable).
//!
//! `AppState` holds an `Arc<dyn CaseRetriever>`, chosen at startup.

use serde::Serialize;

use crate::catalog::CaseRecord;

/// Number of precedent cases injected into the prompt.
pub const DEFAULT_TOP_K: usize = 3;

/// A case paired with its relevance score for one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoredCase {
    pub case: CaseRecord,
    pub score: u32,
}

/// The retriever trait. Implement this to swap ranking strategies without
/// touching the pipeline or handlers.
pub trait CaseRetriever: Send + Sync {
    fn retrieve(&self, query: &str, cases: &[CaseRecord]) -> Vec<ScoredCase>;
}

// ────────────────────────────────────────────────────────────────────────────
// KeywordRetriever
// ────────────────────────────────────────────────────────────────────────────

/// Keyword overlap retriever.
///
/// Algorithm:
/// 1. Split the query on whitespace, drop tokens of one character or less
/// 2. score = number of tokens found as substrings of `pain + issue`
///    (a token repeated in the query counts every time)
/// 3. Drop zero scores, sort descending (stable on ties), keep `top_k`
pub struct KeywordRetriever {
    pub top_k: usize,
}

impl Default for KeywordRetriever {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
        }
    }
}

impl CaseRetriever for KeywordRetriever {
    fn retrieve(&self, query: &str, cases: &[CaseRecord]) -> Vec<ScoredCase> {
        let tokens = tokenize(query);
        if tokens.is_empty() {
            return Vec::new();
        }

        let mut scored: Vec<ScoredCase> = cases
            .iter()
            .filter_map(|case| {
                let score = score_case(&tokens, case);
                (score > 0).then(|| ScoredCase {
                    case: case.clone(),
                    score,
                })
            })
            .collect();

        // sort_by is stable: equal scores keep knowledge-base order
        scored.sort_by(|a, b| b.score.cmp(&a.score));
        scored.truncate(self.top_k);
        scored
    }
}

/// Builds the retrieval query from the two diagnosis text fields.
pub fn build_query(pain_point: &str, issue: &str) -> String {
    format!("{pain_point} {issue}")
}

/// Whitespace tokens longer than one character.
pub fn tokenize(query: &str) -> Vec<&str> {
    query
        .split_whitespace()
        .filter(|t| t.chars().count() > 1)
        .collect()
}

/// Count of tokens occurring in the concatenation of the case's pain and issue text.
pub fn score_case(tokens: &[&str], case: &CaseRecord) -> u32 {
    let haystack = format!("{}{}", case.pain, case.issue);
    tokens.iter().filter(|t| haystack.contains(**t)).count() as u32
}
