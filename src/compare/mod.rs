//! Snapshot comparison: resolves the state file at two dates and reports,
//! per resource, whether the two states match.

pub mod git;
pub mod github;
pub mod types;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde_json::Value;
use tracing::{debug, info};

use crate::selection::parse_timestamp;

pub use git::GitSource;
pub use github::GithubSource;
pub use types::{CompareError, ComparisonResult, MatchMap, Snapshot, StateMap};

/// Produces a `ComparisonResult` for two raw date-field values.
#[async_trait]
pub trait ComparisonService: Send + Sync {
    async fn compare(&self, from: &str, to: &str) -> Result<ComparisonResult, CompareError>;
}

/// Resolves the snapshot in effect at a UTC timestamp.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    async fn snapshot_at(&self, until: NaiveDateTime) -> Result<Snapshot, CompareError>;
}

/// Compares two snapshots from a single source. `expected_keys` are always
/// present in the result even if neither snapshot has them.
pub struct SnapshotComparison<S> {
    source: S,
    expected_keys: Vec<String>,
}

impl<S: SnapshotSource> SnapshotComparison<S> {
    pub fn new(source: S, expected_keys: Vec<String>) -> Self {
        Self {
            source,
            expected_keys,
        }
    }
}

#[async_trait]
impl<S: SnapshotSource> ComparisonService for SnapshotComparison<S> {
    async fn compare(&self, from: &str, to: &str) -> Result<ComparisonResult, CompareError> {
        let lhs_date = parse_timestamp(from)?;
        let rhs_date = parse_timestamp(to)?;
        debug!(%lhs_date, %rhs_date, "resolving snapshots");

        let (lhs, rhs) = futures::try_join!(
            self.source.snapshot_at(lhs_date),
            self.source.snapshot_at(rhs_date)
        )?;

        let result = diff_snapshots(lhs, rhs, &self.expected_keys);
        info!(
            lhs_commit = %result.lhs_commit,
            rhs_commit = %result.rhs_commit,
            resources = result.match_tuples.len(),
            full_match = result.full_match(),
            "comparison finished"
        );
        Ok(result)
    }
}

/// Align both snapshots on one key set and compare each resource. Keys come
/// from the left snapshot first, then right-only keys, then expected keys
/// missing from both. Absent states are filled with `null`.
pub fn diff_snapshots(lhs: Snapshot, rhs: Snapshot, expected_keys: &[String]) -> ComparisonResult {
    let mut keys: Vec<String> = lhs.state.keys().cloned().collect();
    for key in rhs.state.keys().chain(expected_keys.iter()) {
        if !keys.contains(key) {
            keys.push(key.clone());
        }
    }

    let mut result = ComparisonResult {
        lhs_commit: lhs.commit,
        rhs_commit: rhs.commit,
        ..ComparisonResult::default()
    };
    let (mut lhs_state, mut rhs_state) = (lhs.state, rhs.state);
    for key in keys {
        let l = lhs_state.remove(&key).unwrap_or(Value::Null);
        let r = rhs_state.remove(&key).unwrap_or(Value::Null);
        result.match_tuples.insert(key.clone(), l == r);
        result.lhs_state.insert(key.clone(), l);
        result.rhs_state.insert(key, r);
    }
    result
}

/// Parse state file text into a map. An empty body is an empty snapshot.
pub(crate) fn parse_state(commit: &str, text: &str) -> Result<StateMap, CompareError> {
    if text.trim().is_empty() {
        return Ok(StateMap::new());
    }
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(CompareError::InvalidSnapshot {
            commit: commit.to_string(),
            reason: format!("found {}", json_kind(&other)),
        }),
        Err(e) => Err(CompareError::InvalidSnapshot {
            commit: commit.to_string(),
            reason: e.to_string(),
        }),
    }
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
