use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::selection::DateError;

/// Resource key -> state, in file order.
pub type StateMap = Map<String, Value>;

/// Resource key -> whether both sides hold the same state.
pub type MatchMap = IndexMap<String, bool>;

/// State file contents at one commit. `commit` is empty when no commit
/// exists at or before the requested date.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub commit: String,
    pub state: StateMap,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub lhs_state: StateMap,
    pub rhs_state: StateMap,
    pub match_tuples: MatchMap,
    pub lhs_commit: String,
    pub rhs_commit: String,
}

impl ComparisonResult {
    /// Whether a resource matched. Unknown keys count as a mismatch.
    pub fn matches(&self, key: &str) -> bool {
        self.match_tuples.get(key).copied().unwrap_or(false)
    }

    /// True when every match tuple is true (vacuously true when empty).
    pub fn full_match(&self) -> bool {
        self.match_tuples.values().all(|&m| m)
    }
}

#[derive(Debug, Error)]
pub enum CompareError {
    #[error(transparent)]
    InvalidDate(#[from] DateError),

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("git: {0}")]
    Git(#[from] git2::Error),

    #[error("state file at {commit} is not a JSON object: {reason}")]
    InvalidSnapshot { commit: String, reason: String },

    #[error("comparison task failed: {0}")]
    Join(String),
}
