// Local configuration files.
//
// Global config: `~/.reposync/config.toml`
// Repository config: `<repo>/.reposync/config.toml`

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

/// Root directory for global state: `~/.reposync/`.
pub fn global_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".reposync"))
}

/// Path to the global config file: `~/.reposync/config.toml`.
pub fn global_config_path() -> Option<PathBuf> {
    global_dir().map(|d| d.join("config.toml"))
}

/// Path to the repository config file: `<root>/.reposync/config.toml`.
pub fn repo_config_path(repo_root: &Path) -> PathBuf {
    repo_root.join(".reposync").join("config.toml")
}

// ── Global config ──────────────────────────────────────────────────

/// Per-user presentation settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    pub color: ColorMode,
}

impl GlobalConfig {
    /// Load from `~/.reposync/config.toml`, falling back to defaults.
    pub fn load() -> Self {
        match global_config_path() {
            Some(path) => load_or_default(&path),
            None => Self::default(),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        read_toml(path)
    }
}

/// When to colour terminal output.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ColorMode {
    /// Colour on a terminal unless `NO_COLOR` is set.
    #[default]
    Auto,
    Always,
    Never,
}

// ── Repository config ──────────────────────────────────────────────

/// Per-repository workflow settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct RepoConfig {
    /// Remote holding the upstream branches (defaults to `"origin"`).
    pub remote: String,
    /// Branches that do not trigger the "not a primary branch" note on push.
    pub primary_branches: Vec<String>,
    /// Commits listed by `status`.
    pub history_limit: usize,
}

impl Default for RepoConfig {
    fn default() -> Self {
        Self {
            remote: "origin".into(),
            primary_branches: vec!["main".into(), "master".into()],
            history_limit: 10,
        }
    }
}

impl RepoConfig {
    /// Load from `<root>/.reposync/config.toml`, falling back to defaults.
    pub fn load(repo_root: &Path) -> Self {
        load_or_default(&repo_config_path(repo_root))
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        read_toml(path)
    }

    pub fn is_primary(&self, branch: &str) -> bool {
        self.primary_branches.iter().any(|primary| primary == branch)
    }
}

fn read_toml<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, ConfigError> {
    let contents = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&contents)?)
}

fn load_or_default<T: for<'de> Deserialize<'de> + Default>(path: &Path) -> T {
    match read_toml(path) {
        Ok(config) => config,
        Err(ConfigError::Io(error)) if error.kind() == std::io::ErrorKind::NotFound => {
            T::default()
        }
        Err(error) => {
            warn!(path = %path.display(), %error, "ignoring unusable config file");
            T::default()
        }
    }
}

// ── Errors ─────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),
}
