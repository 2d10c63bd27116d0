//! Configuration management for Graft.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Default number of seconds to wait for a conflict to be resolved.
pub const DEFAULT_CONFLICT_TIMEOUT_SECS: u64 = 24 * 60 * 60;

/// Graft configuration loaded from .git/graft/config.toml.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,
}

impl Config {
    /// Load config from a TOML file.
    ///
    /// # Errors
    /// Returns error if file can't be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load config from its conventional location under the .git directory.
    ///
    /// # Errors
    /// Returns error if the file exists but can't be read or parsed.
    pub fn load_from_git_dir(git_dir: impl AsRef<Path>) -> Result<Self> {
        Self::load(git_dir.as_ref().join("graft").join("config.toml"))
    }

    /// Save config to a TOML file.
    ///
    /// # Errors
    /// Returns error if serialization or write fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| std::io::Error::other(e.to_string()))?;
        fs::write(path, content)?;
        Ok(())
    }
}

/// General Graft settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Branch used as the default base for `rebase --onto`.
    #[serde(default = "default_base")]
    pub default_base: String,

    /// Seconds to wait for conflict resolution when no flag is given.
    #[serde(default = "default_conflict_timeout")]
    pub conflict_timeout_secs: u64,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_base: default_base(),
            conflict_timeout_secs: default_conflict_timeout(),
        }
    }
}

fn default_base() -> String {
    "master".into()
}

const fn default_conflict_timeout() -> u64 {
    DEFAULT_CONFLICT_TIMEOUT_SECS
}
