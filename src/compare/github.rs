use async_trait::async_trait;
use chrono::NaiveDateTime;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, warn};

use super::types::{CompareError, Snapshot, StateMap};
use super::{parse_state, SnapshotSource};

const USER_AGENT: &str = concat!("snapdiff/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
struct CommitEntry {
    sha: String,
}

/// Reads snapshots from a GitHub repository: the newest commit on `branch`
/// not after the date, then the state file at that commit.
pub struct GithubSource {
    client: Client,
    api_base: String,
    raw_base: String,
    owner: String,
    repo: String,
    branch: String,
    file: String,
}

impl GithubSource {
    pub fn new(
        api_base: &str,
        raw_base: &str,
        owner: &str,
        repo: &str,
        branch: &str,
        file: &str,
    ) -> Self {
        Self {
            client: Client::new(),
            api_base: api_base.trim_end_matches('/').to_string(),
            raw_base: raw_base.trim_end_matches('/').to_string(),
            owner: owner.to_string(),
            repo: repo.to_string(),
            branch: branch.to_string(),
            file: file.trim_start_matches('/').to_string(),
        }
    }

    pub fn commits_url(&self, until: NaiveDateTime) -> String {
        format!(
            "{}/repos/{}/{}/commits?sha={}&until={}&per_page=1",
            self.api_base,
            self.owner,
            self.repo,
            self.branch,
            until.format("%Y-%m-%dT%H:%M:%SZ")
        )
    }

    pub fn file_url(&self, commit: &str) -> String {
        format!(
            "{}/{}/{}/{}/{}",
            self.raw_base, self.owner, self.repo, commit, self.file
        )
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response, CompareError> {
        let transport = |source| CompareError::Transport {
            url: url.to_string(),
            source,
        };
        self.client
            .get(url)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(transport)
    }

    async fn closest_commit(&self, until: NaiveDateTime) -> Result<Option<String>, CompareError> {
        let url = self.commits_url(until);
        debug!(url = %url, "looking up closest commit");
        let transport = |source| CompareError::Transport {
            url: url.clone(),
            source,
        };
        let commits: Vec<CommitEntry> = self
            .get(&url)
            .await?
            .error_for_status()
            .map_err(transport)?
            .json()
            .await
            .map_err(transport)?;
        Ok(commits.into_iter().next().map(|c| c.sha))
    }

    async fn state_at(&self, commit: &str) -> Result<StateMap, CompareError> {
        let url = self.file_url(commit);
        debug!(url = %url, "fetching state file");
        let response = self.get(&url).await?;
        if response.status() == StatusCode::NOT_FOUND {
            warn!(commit, file = %self.file, "state file missing at commit, using empty state");
            return Ok(StateMap::new());
        }
        let transport = |source| CompareError::Transport {
            url: url.clone(),
            source,
        };
        let text = response
            .error_for_status()
            .map_err(transport)?
            .text()
            .await
            .map_err(transport)?;
        parse_state(commit, &text)
    }
}

#[async_trait]
impl SnapshotSource for GithubSource {
    async fn snapshot_at(&self, until: NaiveDateTime) -> Result<Snapshot, CompareError> {
        let Some(commit) = self.closest_commit(until).await? else {
            warn!(%until, branch = %self.branch, "no commit at or before date, using empty state");
            return Ok(Snapshot::default());
        };
        let state = self.state_at(&commit).await?;
        Ok(Snapshot { commit, state })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::parse_timestamp;

    fn source() -> GithubSource {
        GithubSource::new(
            "https://api.github.com/",
            "https://raw.githubusercontent.com",
            "neuro-arg",
            "arg-monitoring",
            "publish",
            "/cache.json",
        )
    }

    #[test]
    fn test_commits_url() {
        let until = parse_timestamp("2024-01-01T12:00:00").unwrap();
        assert_eq!(
            source().commits_url(until),
            "https://api.github.com/repos/neuro-arg/arg-monitoring/commits?sha=publish&until=2024-01-01T12:00:00Z&per_page=1"
        );
    }

    #[test]
    fn test_file_url() {
        assert_eq!(
            source().file_url("abc123"),
            "https://raw.githubusercontent.com/neuro-arg/arg-monitoring/abc123/cache.json"
        );
    }

    #[test]
    fn test_commit_entry_ignores_extra_fields() {
        let body = r#"[{"sha": "deadbeef", "commit": {"message": "update"}}]"#;
        let entries: Vec<CommitEntry> = serde_json::from_str(body).unwrap();
        assert_eq!(entries[0].sha, "deadbeef");
    }
}
