use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::NaiveDateTime;
use git2::{Oid, Repository, Sort};
use tracing::{debug, warn};

use super::types::{CompareError, Snapshot, StateMap};
use super::{parse_state, SnapshotSource};

/// Reads snapshots from a local clone of the monitoring repository.
#[derive(Debug, Clone)]
pub struct GitSource {
    repo_path: PathBuf,
    branch: String,
    file: PathBuf,
}

impl GitSource {
    pub fn new(repo_path: &Path, branch: &str, file: &str) -> Self {
        Self {
            repo_path: repo_path.to_path_buf(),
            branch: branch.to_string(),
            file: PathBuf::from(file.trim_start_matches('/')),
        }
    }

    /// Blocking lookup; run on the blocking pool.
    pub fn snapshot_blocking(&self, until: NaiveDateTime) -> Result<Snapshot, CompareError> {
        let repo = Repository::discover(&self.repo_path)?;
        let Some(oid) = closest_commit(&repo, &self.branch, until)? else {
            warn!(%until, branch = %self.branch, "no commit at or before date, using empty state");
            return Ok(Snapshot::default());
        };
        let commit = oid.to_string();
        let state = read_state(&repo, oid, &self.file, &commit)?;
        Ok(Snapshot { commit, state })
    }
}

/// Newest commit reachable from `branch` whose commit time is not after
/// `until` (UTC).
fn closest_commit(
    repo: &Repository,
    branch: &str,
    until: NaiveDateTime,
) -> Result<Option<Oid>, git2::Error> {
    let tip = repo.revparse_single(branch)?.peel_to_commit()?;
    let limit = until.and_utc().timestamp();

    let mut walk = repo.revwalk()?;
    walk.set_sorting(Sort::TIME)?;
    walk.push(tip.id())?;
    for oid in walk {
        let oid = oid?;
        let commit = repo.find_commit(oid)?;
        if commit.time().seconds() <= limit {
            debug!(%oid, "closest commit");
            return Ok(Some(oid));
        }
    }
    Ok(None)
}

fn read_state(
    repo: &Repository,
    oid: Oid,
    file: &Path,
    commit: &str,
) -> Result<StateMap, CompareError> {
    let tree = repo.find_commit(oid)?.tree()?;
    let entry = match tree.get_path(file) {
        Ok(entry) => entry,
        Err(e) if e.code() == git2::ErrorCode::NotFound => {
            warn!(commit, file = %file.display(), "state file missing at commit, using empty state");
            return Ok(StateMap::new());
        }
        Err(e) => return Err(e.into()),
    };
    let blob = entry.to_object(repo)?.peel_to_blob()?;
    let text = std::str::from_utf8(blob.content()).map_err(|e| CompareError::InvalidSnapshot {
        commit: commit.to_string(),
        reason: e.to_string(),
    })?;
    parse_state(commit, text)
}

#[async_trait]
impl SnapshotSource for GitSource {
    async fn snapshot_at(&self, until: NaiveDateTime) -> Result<Snapshot, CompareError> {
        let source = self.clone();
        tokio::task::spawn_blocking(move || source.snapshot_blocking(until))
            .await
            .map_err(|e| CompareError::Join(e.to_string()))?
    }
}
