use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const DEFAULT_BASE_ADDRESS: &str = "http://eng-assets.s3-website-us-west-2.amazonaws.com/";
pub const DEFAULT_RELATIVE_PATH: &str = "fixture/movies.json";

const ENV_BASE_ADDRESS: &str = "CONTENT_RETRIEVER_BASE_ADDRESS";
const ENV_RELATIVE_PATH: &str = "CONTENT_RETRIEVER_RELATIVE_PATH";
const ENV_USER_AGENT: &str = "CONTENT_RETRIEVER_USER_AGENT";

/// Where and how to fetch the content list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub base_address: String,
    pub relative_path: String,
    pub user_agent: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_address: DEFAULT_BASE_ADDRESS.to_string(),
            relative_path: DEFAULT_RELATIVE_PATH.to_string(),
            user_agent: concat!("content-retriever/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl Settings {
    /// Defaults, then the TOML file, then `CONTENT_RETRIEVER_*` variables.
    ///
    /// Without an explicit path the platform config directory is used. A
    /// missing file is fine; an unreadable or malformed one is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => Some(p.to_path_buf()),
            None => default_config_path(),
        };
        let mut settings = match &path {
            Some(p) if p.exists() => Self::from_file(p)?,
            _ => Self::default(),
        };
        settings.apply_env(|key| std::env::var(key).ok());
        debug!(?path, ?settings, "settings resolved");
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading settings file: {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("parsing settings file: {}", path.display()))
    }

    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        if let Some(v) = get(ENV_BASE_ADDRESS) { self.base_address = v; }
        if let Some(v) = get(ENV_RELATIVE_PATH) { self.relative_path = v; }
        if let Some(v) = get(ENV_USER_AGENT) { self.user_agent = v; }
    }
}

/// `config.toml` in the platform config directory, if one can be determined.
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("dev", "content-retriever", "content-retriever")
        .map(|proj| proj.config_dir().join("config.toml"))
}
