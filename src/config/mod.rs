//! Configuration module for compass
//!
//! Manages which providers are mounted, where they start, and the engine's
//! limits. Configuration is stored as TOML in the user's config directory;
//! provider-private state lives in JSON files next to it.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, File, FileFormat};
use serde::{Deserialize, Serialize};

use crate::engine::Flavor;
use crate::history::DEFAULT_CAPACITY;

/// Default cap on deep-search results
pub const DEFAULT_DEEP_SEARCH_LIMIT: usize = 10_000;

/// Mode the engine starts in
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StartMode {
    /// Free editing of the document
    Editor,
    /// Provider-backed navigation and commands
    #[default]
    Operator,
}

impl From<StartMode> for Flavor {
    fn from(mode: StartMode) -> Self {
        match mode {
            StartMode::Editor => Self::Editor,
            StartMode::Operator => Self::Operator,
        }
    }
}

/// Application configuration structure
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct CompassConfig {
    /// Provider names to mount at the root, in order
    pub programs: Vec<String>,

    /// Directory the file browser starts in (home directory when unset)
    pub file_browser_root: Option<PathBuf>,

    /// Program and leading arguments used to run scripts
    pub script_runner: Vec<String>,

    /// Maximum number of undo entries
    pub undo_capacity: usize,

    /// Maximum number of deep-search results
    pub deep_search_limit: usize,

    pub start_mode: StartMode,

    /// Override for the provider config directory
    pub providers_dir: Option<PathBuf>,

    /// Script-backed providers: name to script path
    pub scripts: BTreeMap<String, PathBuf>,
}

impl Default for CompassConfig {
    fn default() -> Self {
        Self {
            programs: vec!["file browser".to_string(), "settings".to_string()],
            file_browser_root: None,
            script_runner: vec!["bun".to_string(), "run".to_string()],
            undo_capacity: DEFAULT_CAPACITY,
            deep_search_limit: DEFAULT_DEEP_SEARCH_LIMIT,
            start_mode: StartMode::default(),
            providers_dir: None,
            scripts: BTreeMap::new(),
        }
    }
}

impl CompassConfig {
    /// Get the compass directory inside the system config directory
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the system config directory cannot be determined.
    pub fn config_dir() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ConfigError::Message("Could not determine config directory".to_string()))?;
        Ok(config_dir.join("compass"))
    }

    /// Get the path to the config file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the system config directory cannot be determined.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from the default location, creating it if missing
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the config file cannot be read, parsed, or created.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from `path`, writing defaults there if it doesn't exist
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read, parsed, or created.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            let default_config = Self::default();
            default_config.save_to(path)?;
            return Ok(default_config);
        }

        let settings = Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml))
            .build()?;

        settings.try_deserialize()
    }

    /// Save configuration to the default location
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the configuration cannot be written.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to `path`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the directory cannot be created, the configuration
    /// cannot be serialized to TOML, or the file cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ConfigError::Message(format!("Failed to create config directory: {e}")))?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Message(format!("Failed to serialize config: {e}")))?;

        fs::write(path, toml_string)
            .map_err(|e| ConfigError::Message(format!("Failed to write config file: {e}")))?;

        Ok(())
    }

    /// Directory holding provider-private config files
    #[must_use]
    pub fn providers_dir(&self) -> Option<PathBuf> {
        self.providers_dir
            .clone()
            .or_else(|| Self::config_dir().ok().map(|dir| dir.join("providers")))
    }

    /// Config file of the provider called `name`
    #[must_use]
    pub fn provider_config_path(&self, name: &str) -> Option<PathBuf> {
        self.providers_dir().map(|dir| dir.join(format!("{name}.json")))
    }

    /// Directory the file browser is mounted at
    #[must_use]
    pub fn file_browser_root(&self) -> PathBuf {
        self.file_browser_root
            .clone()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CompassConfig::default();
        assert_eq!(config.programs, vec!["file browser", "settings"]);
        assert_eq!(config.undo_capacity, 500);
        assert_eq!(config.deep_search_limit, 10_000);
        assert_eq!(config.start_mode, StartMode::Operator);
        assert!(config.scripts.is_empty());
    }

    #[test]
    fn test_load_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/config.toml");

        let config = CompassConfig::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config, CompassConfig::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = CompassConfig::default();
        config.programs = vec!["settings".to_string()];
        config.undo_capacity = 42;
        config.start_mode = StartMode::Editor;
        config.file_browser_root = Some(PathBuf::from("/srv"));
        config.save_to(&path).unwrap();

        let loaded = CompassConfig::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "deep_search_limit = 25\n").unwrap();

        let loaded = CompassConfig::load_from(&path).unwrap();
        assert_eq!(loaded.deep_search_limit, 25);
        assert_eq!(loaded.undo_capacity, 500);
        assert_eq!(loaded.script_runner, vec!["bun", "run"]);
    }

    #[test]
    fn test_provider_paths() {
        let config = CompassConfig {
            providers_dir: Some(PathBuf::from("/cfg/providers")),
            ..CompassConfig::default()
        };
        assert_eq!(
            config.provider_config_path("settings"),
            Some(PathBuf::from("/cfg/providers/settings.json"))
        );
    }

    #[test]
    fn test_start_mode_flavor() {
        assert_eq!(Flavor::from(StartMode::Editor), Flavor::Editor);
        assert_eq!(Flavor::from(StartMode::Operator), Flavor::Operator);
    }
}
