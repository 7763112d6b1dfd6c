use serde::Deserialize;
use std::path::PathBuf;

pub const DEFAULT_OWNER: &str = "neuro-arg";
pub const DEFAULT_REPO: &str = "arg-monitoring";
pub const DEFAULT_BRANCH: &str = "publish";
pub const DEFAULT_FILE: &str = "cache.json";
pub const DEFAULT_API_BASE: &str = "https://api.github.com";
pub const DEFAULT_RAW_BASE: &str = "https://raw.githubusercontent.com";
pub const DEFAULT_COMMIT_URL_BASE: &str = "https://github.com/neuro-arg/arg-monitoring/commit/";
pub const DEFAULT_SHARE_BASE_URL: &str = "https://neuro-arg.github.io/arg-monitoring/";

/// Resources the monitoring state file tracks. Listed even for dates
/// before the first snapshot.
pub const DEFAULT_EXPECTED_KEYS: [&str; 17] = [
    "numbers_1_video_info",
    "numbers_1_video_hash",
    "study_video_info",
    "study_video_hash",
    "numbers_2_video_info",
    "numbers_2_video_hash",
    "psv_video_info",
    "psv_video_hash",
    "filtered_video_info",
    "filtered_video_hash",
    "hello_world_video_info",
    "hello_world_video_hash",
    "meaning_of_life_video_info",
    "meaning_of_life_video_hash",
    "soundcloud_user_info",
    "youtube_feed_hash",
    "soundcloud_feed_hash",
];

/// Where snapshots are read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Github,
    Git,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SnapdiffConfig {
    pub source: SourceKind,
    pub owner: String,
    pub repo: String,
    pub branch: String,
    pub file: String,
    pub api_base: String,
    pub raw_base: String,
    /// Local clone used by the `git` source.
    pub repo_path: Option<PathBuf>,
    pub commit_url_base: String,
    pub share_base_url: String,
    /// Resources always listed, even when neither snapshot has them.
    pub expected_keys: Vec<String>,
    pub log_level: String,
    pub log_format: String,
    pub restore_session: bool,
}

impl Default for SnapdiffConfig {
    fn default() -> Self {
        Self {
            source: SourceKind::Github,
            owner: DEFAULT_OWNER.to_string(),
            repo: DEFAULT_REPO.to_string(),
            branch: DEFAULT_BRANCH.to_string(),
            file: DEFAULT_FILE.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            raw_base: DEFAULT_RAW_BASE.to_string(),
            repo_path: None,
            commit_url_base: DEFAULT_COMMIT_URL_BASE.to_string(),
            share_base_url: DEFAULT_SHARE_BASE_URL.to_string(),
            expected_keys: DEFAULT_EXPECTED_KEYS.map(String::from).to_vec(),
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            restore_session: true,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    source: Option<SourceKind>,
    #[serde(default)]
    owner: Option<String>,
    #[serde(default)]
    repo: Option<String>,
    #[serde(default)]
    branch: Option<String>,
    #[serde(default)]
    file: Option<String>,
    #[serde(default)]
    api_base: Option<String>,
    #[serde(default)]
    raw_base: Option<String>,
    #[serde(default)]
    repo_path: Option<PathBuf>,
    #[serde(default)]
    commit_url_base: Option<String>,
    #[serde(default)]
    share_base_url: Option<String>,
    #[serde(default)]
    expected_keys: Option<Vec<String>>,
    #[serde(default)]
    log_level: Option<String>,
    #[serde(default)]
    log_format: Option<String>,
    #[serde(default)]
    restore_session: Option<bool>,
}

pub fn config_dir() -> PathBuf {
    let mut path = dirs_home().unwrap_or_else(|| PathBuf::from("."));
    path.push(".config");
    path.push("snapdiff");
    path
}

fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

pub fn session_path() -> PathBuf {
    config_dir().join("session.json")
}

pub fn log_path() -> PathBuf {
    config_dir().join("snapdiff.log")
}

fn dirs_home() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

/// Load config from `~/.config/snapdiff/config.toml`, falling back to
/// defaults when the file is missing or malformed.
pub fn load_config() -> SnapdiffConfig {
    match std::fs::read_to_string(config_path()) {
        Ok(contents) => parse_config(&contents),
        Err(_) => SnapdiffConfig::default(),
    }
}

pub fn parse_config(contents: &str) -> SnapdiffConfig {
    let file: ConfigFile = match toml::from_str(contents) {
        Ok(f) => f,
        Err(_) => return SnapdiffConfig::default(),
    };

    let defaults = SnapdiffConfig::default();
    SnapdiffConfig {
        source: file.source.unwrap_or(defaults.source),
        owner: file.owner.unwrap_or(defaults.owner),
        repo: file.repo.unwrap_or(defaults.repo),
        branch: file.branch.unwrap_or(defaults.branch),
        file: file.file.unwrap_or(defaults.file),
        api_base: file.api_base.unwrap_or(defaults.api_base),
        raw_base: file.raw_base.unwrap_or(defaults.raw_base),
        repo_path: file.repo_path,
        commit_url_base: file.commit_url_base.unwrap_or(defaults.commit_url_base),
        share_base_url: file.share_base_url.unwrap_or(defaults.share_base_url),
        expected_keys: file.expected_keys.unwrap_or(defaults.expected_keys),
        log_level: file.log_level.unwrap_or(defaults.log_level),
        log_format: file.log_format.unwrap_or(defaults.log_format),
        restore_session: file.restore_session.unwrap_or(defaults.restore_session),
    }
}
