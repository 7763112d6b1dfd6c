use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::link::{LinkState, Location};

const SESSION_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct SessionFile {
    version: u32,
    link: String,
}

/// Persists the current link so the next launch reopens the same view.
/// Every write overwrites the previous one.
pub struct SessionLocation {
    path: PathBuf,
}

impl SessionLocation {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Location for SessionLocation {
    fn replace(&mut self, link: &LinkState) {
        save_session(&self.path, &link.as_string());
    }
}

/// Last saved link, if the session file exists and is readable.
pub fn load_session(path: &Path) -> Option<String> {
    let contents = fs::read_to_string(path).ok()?;
    let Ok(session) = serde_json::from_str::<SessionFile>(&contents) else {
        warn!(path = %path.display(), "ignoring unreadable session file");
        return None;
    };
    if session.version != SESSION_VERSION {
        return None;
    }
    Some(session.link)
}

pub fn save_session(path: &Path, link: &str) {
    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!(path = %parent.display(), error = %e, "failed to create session directory");
            return;
        }
    }
    let session = SessionFile {
        version: SESSION_VERSION,
        link: link.to_string(),
    };
    match serde_json::to_string_pretty(&session) {
        Ok(json) => {
            if let Err(e) = fs::write(path, json) {
                warn!(path = %path.display(), error = %e, "failed to save session");
            } else {
                debug!(path = %path.display(), "session saved");
            }
        }
        Err(e) => warn!(error = %e, "failed to encode session"),
    }
}
