//! Configuration loading and management
//!
//! Handles parsing of `config.toml` and locating the data directory.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::lock::DEFAULT_LOCK_TIMEOUT_MS;
use crate::task::Priority;

/// Config file name inside the platform config directory
pub const CONFIG_FILE: &str = "config.toml";

/// Data directory used when no platform directory can be determined
pub const FALLBACK_DATA_DIR: &str = ".taskpad";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Storage configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// Tasks configuration
    #[serde(default)]
    pub tasks: TasksConfig,
}

/// Where and how state is persisted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Data directory; the platform data dir when unset
    #[serde(default)]
    pub dir: Option<PathBuf>,

    /// How long to wait for another process holding a store lock
    #[serde(default = "default_lock_timeout_ms")]
    pub lock_timeout_ms: u64,
}

fn default_lock_timeout_ms() -> u64 {
    DEFAULT_LOCK_TIMEOUT_MS
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: None,
            lock_timeout_ms: default_lock_timeout_ms(),
        }
    }
}

/// Defaults applied to new tasks
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TasksConfig {
    /// Priority used by `taskpad add` without `--priority`
    #[serde(default)]
    pub default_priority: Priority,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from `path`, or return defaults
    ///
    /// A missing file is silently replaced by defaults; an unreadable or
    /// invalid one is logged first.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "ignoring invalid config");
                Self::default()
            }
        }
    }

    /// Data directory: explicit override, then `storage.dir`, then the
    /// platform data directory, then `./.taskpad`
    pub fn data_dir(&self, override_dir: Option<&Path>) -> PathBuf {
        if let Some(dir) = override_dir {
            return dir.to_path_buf();
        }
        if let Some(dir) = self.storage.dir.as_ref() {
            return dir.clone();
        }
        project_dirs()
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from(FALLBACK_DATA_DIR))
    }

    fn validate(&self) -> crate::error::Result<()> {
        self.storage.validate()
    }
}

impl StorageConfig {
    fn validate(&self) -> crate::error::Result<()> {
        if self.lock_timeout_ms == 0 {
            return Err(crate::error::Error::InvalidConfig(
                "storage.lock_timeout_ms must be > 0".to_string(),
            ));
        }
        if let Some(dir) = self.dir.as_ref() {
            if dir.as_os_str().is_empty() {
                return Err(crate::error::Error::InvalidConfig(
                    "storage.dir cannot be empty".to_string(),
                ));
            }
        }
        Ok(())
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "taskpad")
}

/// Platform location of `config.toml`, if the platform has one
pub fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn defaults_are_expected() {
        let cfg = Config::default();
        assert!(cfg.storage.dir.is_none());
        assert_eq!(cfg.storage.lock_timeout_ms, 5000);
        assert_eq!(cfg.tasks.default_priority, Priority::Medium);
    }

    #[test]
    fn load_parses_overrides() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE);
        let content = r#"
[storage]
dir = "/var/lib/taskpad"
lock_timeout_ms = 250

[tasks]
default_priority = "high"
"#;
        fs::write(&path, content.trim()).expect("write config");

        let cfg = Config::load(&path).expect("load config");
        assert_eq!(cfg.storage.dir, Some(PathBuf::from("/var/lib/taskpad")));
        assert_eq!(cfg.storage.lock_timeout_ms, 250);
        assert_eq!(cfg.tasks.default_priority, Priority::High);
    }

    #[test]
    fn zero_lock_timeout_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[storage]\nlock_timeout_ms = 0").expect("write config");

        let err = Config::load(&path).expect_err("invalid config");
        match err {
            crate::error::Error::InvalidConfig(_) => {}
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn unknown_priority_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[tasks]\ndefault_priority = \"urgent\"").expect("write config");

        assert!(matches!(
            Config::load(&path),
            Err(crate::error::Error::TomlParse(_))
        ));
        assert_eq!(
            Config::load_or_default(Some(&path)).tasks.default_priority,
            Priority::Medium
        );
    }

    #[test]
    fn load_or_default_when_missing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg = Config::load_or_default(Some(&dir.path().join("nope.toml")));
        assert_eq!(cfg.storage.lock_timeout_ms, 5000);
        assert!(Config::load_or_default(None).storage.dir.is_none());
    }

    #[test]
    fn data_dir_precedence() {
        let mut cfg = Config::default();
        cfg.storage.dir = Some(PathBuf::from("/from/config"));

        assert_eq!(
            cfg.data_dir(Some(Path::new("/from/flag"))),
            PathBuf::from("/from/flag")
        );
        assert_eq!(cfg.data_dir(None), PathBuf::from("/from/config"));
    }
}
