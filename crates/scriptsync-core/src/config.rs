//! Startup configuration.
//!
//! Every field has a default, so an empty `{}` file (or no file at all) is a
//! valid configuration. The CLI layers its flags on top before validating.

use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Where `scriptsync init` writes the config and where it is looked up by default.
pub const DEFAULT_CONFIG_PATH: &str = ".scriptsync/config.json";

/// Top-level configuration as stored on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Root directory to scan for scripts.
    pub watch_dir: PathBuf,
    /// Interface the HTTP server binds to.
    pub host: String,
    /// HTTP listen port.
    pub port: u16,
    /// Seconds between directory scans.
    pub file_poll_interval: u64,
    /// Seconds between git fetch attempts.
    pub git_poll_interval: u64,
    /// Script file extensions, without the leading dot.
    pub extensions: Vec<String>,
    /// Git working copy; defaults to the parent of `watch_dir`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repo_dir: Option<PathBuf>,
    /// Remote to fetch and pull from; git's tracking default when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote: Option<String>,
    /// Branch to pull; git's tracking default when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            watch_dir: PathBuf::from("src"),
            host: "127.0.0.1".to_string(),
            port: 8080,
            file_poll_interval: 2,
            git_poll_interval: 10,
            extensions: vec!["lua".into(), "luau".into()],
            repo_dir: None,
            remote: None,
            branch: None,
        }
    }
}

/// What the file watcher needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchConfig {
    pub root: PathBuf,
    pub interval: Duration,
    pub extensions: Vec<String>,
}

/// What the repository sync loop needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    pub repo_dir: PathBuf,
    pub remote: Option<String>,
    pub branch: Option<String>,
    pub interval: Duration,
}

impl Config {
    /// Loads a config file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        let config: Config =
            serde_json::from_str(&text).map_err(|e| ConfigError::parse(path, e))?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Loads `path` if given, else [`DEFAULT_CONFIG_PATH`] if it exists, else defaults.
    pub fn discover(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_PATH);
                if default_path.is_file() {
                    Self::load(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Normalizes extensions and checks the values the loops depend on.
    ///
    /// The port is not checked here; only serving needs it, see
    /// [`Config::validate_for_serve`].
    pub fn validate(mut self) -> Result<Self> {
        if self.file_poll_interval == 0 {
            return Err(ConfigError::InvalidInterval {
                name: "file_poll_interval",
            });
        }
        if self.git_poll_interval == 0 {
            return Err(ConfigError::InvalidInterval {
                name: "git_poll_interval",
            });
        }
        let mut seen = HashSet::new();
        self.extensions = self
            .extensions
            .iter()
            .map(|ext| ext.trim().trim_start_matches('.').to_string())
            .filter(|ext| !ext.is_empty() && seen.insert(ext.clone()))
            .collect();
        if self.extensions.is_empty() {
            return Err(ConfigError::NoExtensions);
        }

        Ok(self)
    }

    /// [`Config::validate`] plus the checks that only matter when binding.
    pub fn validate_for_serve(self) -> Result<Self> {
        let config = self.validate()?;
        if config.port == 0 {
            return Err(ConfigError::InvalidPort);
        }
        Ok(config)
    }

    /// The git working copy, falling back to the parent of the watch directory.
    pub fn repo_dir(&self) -> PathBuf {
        if let Some(dir) = &self.repo_dir {
            return dir.clone();
        }
        match self.watch_dir.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    pub fn watch_config(&self) -> WatchConfig {
        WatchConfig {
            root: self.watch_dir.clone(),
            interval: Duration::from_secs(self.file_poll_interval),
            extensions: self.extensions.clone(),
        }
    }

    pub fn sync_config(&self) -> SyncConfig {
        SyncConfig {
            repo_dir: self.repo_dir(),
            remote: self.remote.clone(),
            branch: self.branch.clone(),
            interval: Duration::from_secs(self.git_poll_interval),
        }
    }

    /// Pretty JSON, as written by `scriptsync init`.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
