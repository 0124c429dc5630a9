//! Configuration for gitsync
//!
//! Settings live in `/.gitsync.yaml` at the root of the working copy.
//! Every field is optional; a missing file means all defaults.
//!
//! ```yaml
//! git_path: /usr/local/bin/git
//! confirm_sync: false
//! log_level: debug
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};

/// File name of the per-repository config
pub const CONFIG_FILE_NAME: &str = ".gitsync.yaml";

/// Per-repository settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Git binary used to run commands
    pub git_path: String,
    /// Ask for confirmation before running a sync
    pub confirm_sync: bool,
    /// Default tracing filter for the CLI (overridden by `RUST_LOG`)
    pub log_level: Option<String>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            git_path: "git".to_string(),
            confirm_sync: true,
            log_level: None,
        }
    }
}

impl SyncConfig {
    /// Load the config from a working copy root
    pub fn load(repo_root: &Path) -> Result<Self> {
        let path = repo_root.join(CONFIG_FILE_NAME);

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path).map_err(|source| Error::ConfigRead {
            path: path.clone(),
            source,
        })?;

        Self::parse(&content)
    }

    /// Parse config from YAML text
    pub fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = SyncConfig::load(tmp.path()).unwrap();
        assert_eq!(config, SyncConfig::default());
        assert!(config.confirm_sync);
        assert_eq!(config.git_path, "git");
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join(CONFIG_FILE_NAME), "confirm_sync: false\n").unwrap();

        let config = SyncConfig::load(tmp.path()).unwrap();
        assert!(!config.confirm_sync);
        assert_eq!(config.git_path, "git");
        assert!(config.log_level.is_none());
    }

    #[test]
    fn test_empty_file_gives_defaults() {
        assert_eq!(SyncConfig::parse("\n").unwrap(), SyncConfig::default());
    }

    #[test]
    fn test_malformed_yaml_is_a_parse_error() {
        let err = SyncConfig::parse("confirm_sync: [not, a, bool").unwrap_err();
        assert!(matches!(err, Error::ConfigParse { .. }));
    }
}
