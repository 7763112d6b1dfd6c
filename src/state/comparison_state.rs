use serde_json::Value;

use crate::compare::ComparisonResult;

pub const STATUS_MATCHES: &str = "Matches";
pub const STATUS_MISMATCH: &str = "Does not match";
pub const OVERALL_FULL_MATCH: &str = "Full Match";
pub const OVERALL_SOME_MISMATCH: &str = "Some does not match";

/// One rendered table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRow {
    pub key: String,
    pub matches: bool,
    /// Pretty-printed previous state.
    pub lhs: String,
    /// Pretty-printed current state.
    pub rhs: String,
}

impl ResourceRow {
    pub fn status_label(&self) -> &'static str {
        if self.matches {
            STATUS_MATCHES
        } else {
            STATUS_MISMATCH
        }
    }

    /// Number of terminal lines the row needs.
    pub fn height(&self) -> usize {
        self.lhs.lines().count().max(self.rhs.lines().count()).max(1)
    }
}

/// A commit shown next to a date field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitLink {
    pub label: String,
    pub href: String,
}

impl CommitLink {
    pub fn new(base: &str, hash: &str) -> Self {
        Self {
            label: hash.to_string(),
            href: format!("{base}{hash}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverallStatus {
    /// Nothing has been rendered yet.
    Pending,
    FullMatch,
    SomeMismatch,
    Failed(String),
}

impl OverallStatus {
    pub fn text(&self) -> String {
        match self {
            OverallStatus::Pending => String::new(),
            OverallStatus::FullMatch => OVERALL_FULL_MATCH.to_string(),
            OverallStatus::SomeMismatch => OVERALL_SOME_MISMATCH.to_string(),
            OverallStatus::Failed(reason) => format!("Comparison failed: {reason}"),
        }
    }
}

/// Everything the result table and status line display.
#[derive(Debug, Clone)]
pub struct ComparisonState {
    pub rows: Vec<ResourceRow>,
    pub status: OverallStatus,
    pub from_commit: CommitLink,
    pub to_commit: CommitLink,
    pub loading: bool,
    /// Index of the first visible row.
    pub scroll: usize,
}

impl Default for ComparisonState {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            status: OverallStatus::Pending,
            from_commit: CommitLink::default(),
            to_commit: CommitLink::default(),
            loading: false,
            scroll: 0,
        }
    }
}

impl ComparisonState {
    /// Replace the table, commits and status with a fresh result.
    pub fn apply(&mut self, result: &ComparisonResult, commit_url_base: &str) {
        self.rows = build_rows(result);
        self.status = if result.full_match() {
            OverallStatus::FullMatch
        } else {
            OverallStatus::SomeMismatch
        };
        self.from_commit = CommitLink::new(commit_url_base, &result.lhs_commit);
        self.to_commit = CommitLink::new(commit_url_base, &result.rhs_commit);
        self.scroll = self.scroll.min(self.rows.len().saturating_sub(1));
    }

    /// Record a failure; the previous table stays.
    pub fn fail(&mut self, reason: &str) {
        self.status = OverallStatus::Failed(reason.to_string());
    }

    pub fn scroll_by(&mut self, delta: isize) {
        let max = self.rows.len().saturating_sub(1);
        self.scroll = self.scroll.saturating_add_signed(delta).min(max);
    }

    pub fn scroll_to_top(&mut self) {
        self.scroll = 0;
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll = self.rows.len().saturating_sub(1);
    }
}

/// One row per key of the left state, in its order.
pub fn build_rows(result: &ComparisonResult) -> Vec<ResourceRow> {
    result
        .lhs_state
        .iter()
        .map(|(key, lhs)| ResourceRow {
            key: key.clone(),
            matches: result.matches(key),
            lhs: pretty(lhs),
            rhs: pretty(result.rhs_state.get(key).unwrap_or(&Value::Null)),
        })
        .collect()
}

pub fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn result(lhs: Value, rhs: Value, matches: Value) -> ComparisonResult {
        ComparisonResult {
            lhs_state: lhs.as_object().cloned().unwrap(),
            rhs_state: rhs.as_object().cloned().unwrap(),
            match_tuples: matches
                .as_object()
                .unwrap()
                .iter()
                .map(|(k, v)| (k.clone(), v.as_bool().unwrap()))
                .collect(),
            lhs_commit: "111".to_string(),
            rhs_commit: "222".to_string(),
        }
    }

    #[test]
    fn test_rows_and_status_for_partial_match() {
        let r = result(
            json!({"a": 1, "b": 2}),
            json!({"a": 1, "b": 3}),
            json!({"a": true, "b": false}),
        );
        let mut state = ComparisonState::default();
        state.apply(&r, "https://example.org/commit/");

        assert_eq!(
            state.rows,
            vec![
                ResourceRow {
                    key: "a".to_string(),
                    matches: true,
                    lhs: "1".to_string(),
                    rhs: "1".to_string(),
                },
                ResourceRow {
                    key: "b".to_string(),
                    matches: false,
                    lhs: "2".to_string(),
                    rhs: "3".to_string(),
                },
            ]
        );
        assert_eq!(state.rows[0].status_label(), "Matches");
        assert_eq!(state.rows[1].status_label(), "Does not match");
        assert_eq!(state.status.text(), "Some does not match");
        assert_eq!(
            state.from_commit,
            CommitLink {
                label: "111".to_string(),
                href: "https://example.org/commit/111".to_string(),
            }
        );
        assert_eq!(state.to_commit.href, "https://example.org/commit/222");
    }

    #[test]
    fn test_full_match_iff_all_true() {
        let mut state = ComparisonState::default();
        state.apply(
            &result(json!({"a": 1}), json!({"a": 1}), json!({"a": true})),
            "",
        );
        assert_eq!(state.status, OverallStatus::FullMatch);
        assert_eq!(state.status.text(), "Full Match");

        state.apply(
            &result(
                json!({"a": 1, "b": null}),
                json!({"a": 1, "b": 2}),
                json!({"a": true, "b": false}),
            ),
            "",
        );
        assert_eq!(state.status, OverallStatus::SomeMismatch);
    }

    #[test]
    fn test_pretty_prints_nested_state() {
        let row = &build_rows(&result(
            json!({"v": {"title": "x"}}),
            json!({"v": null}),
            json!({"v": false}),
        ))[0];
        assert_eq!(row.lhs, "{\n  \"title\": \"x\"\n}");
        assert_eq!(row.rhs, "null");
        assert_eq!(row.height(), 3);
    }

    #[test]
    fn test_apply_replaces_previous_rows() {
        let mut state = ComparisonState::default();
        state.apply(
            &result(
                json!({"a": 1, "b": 1, "c": 1}),
                json!({"a": 1, "b": 1, "c": 1}),
                json!({"a": true, "b": true, "c": true}),
            ),
            "",
        );
        state.scroll_to_bottom();
        assert_eq!(state.scroll, 2);
        state.apply(&result(json!({"z": 1}), json!({"z": 2}), json!({"z": false})), "");
        assert_eq!(state.rows.len(), 1);
        assert_eq!(state.rows[0].key, "z");
        assert_eq!(state.scroll, 0);
    }

    #[test]
    fn test_fail_keeps_rows() {
        let mut state = ComparisonState::default();
        state.apply(&result(json!({"a": 1}), json!({"a": 1}), json!({"a": true})), "");
        state.fail("offline");
        assert_eq!(state.rows.len(), 1);
        assert_eq!(state.status.text(), "Comparison failed: offline");
    }

    #[test]
    fn test_scroll_is_clamped() {
        let mut state = ComparisonState::default();
        state.scroll_by(5);
        assert_eq!(state.scroll, 0);
        state.apply(
            &result(json!({"a": 1, "b": 2}), json!({"a": 1, "b": 2}), json!({"a": true, "b": true})),
            "",
        );
        state.scroll_by(10);
        assert_eq!(state.scroll, 1);
        state.scroll_by(-10);
        assert_eq!(state.scroll, 0);
    }
}
