//! Provider registry
//!
//! An ordered, append-only set of provider sessions. Session `i` backs the
//! root-level node at index `i`, so the active session for any path is found
//! through the path's first index.

use std::path::{Path as FsPath, PathBuf};

use tracing::{debug, info, warn};

use crate::config::CompassConfig;
use crate::provider::{FilesystemProvider, Location, Provider, ScriptProvider, SettingsProvider};
use crate::tree::{Node, Path};

/// A mounted provider together with its navigation state
pub struct Session {
    provider: Box<dyn Provider>,
    location: Location,
    /// Location the mount node's children were fetched from
    base: Location,
    config_path: Option<PathBuf>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("name", &self.provider.name())
            .field("location", &self.location)
            .field("base", &self.base)
            .field("config_path", &self.config_path)
            .finish()
    }
}

impl Session {
    fn new(provider: Box<dyn Provider>) -> Self {
        let location = Location::new(provider.root_location());
        Self {
            provider,
            base: location.clone(),
            location,
            config_path: None,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.provider.name()
    }

    #[must_use]
    pub fn display_name(&self) -> &str {
        self.provider.display_name()
    }

    #[must_use]
    pub const fn location(&self) -> &Location {
        &self.location
    }

    pub const fn location_mut(&mut self) -> &mut Location {
        &mut self.location
    }

    /// Location backing the mount node's children
    #[must_use]
    pub const fn base(&self) -> &Location {
        &self.base
    }

    /// Return to the base location
    pub fn reset_location(&mut self) {
        self.location = self.base.clone();
    }

    /// Re-anchor the mount node at `base` and move there; returns the
    /// previous base
    pub fn rebase(&mut self, base: impl Into<String>) -> Location {
        let previous = std::mem::replace(&mut self.base, Location::new(base));
        self.reset_location();
        previous
    }

    #[must_use]
    pub fn provider(&self) -> &dyn Provider {
        self.provider.as_ref()
    }

    pub fn provider_mut(&mut self) -> &mut dyn Provider {
        self.provider.as_mut()
    }

    /// Provider and location borrowed together, for calls that take both
    pub fn parts_mut(&mut self) -> (&mut dyn Provider, &Location) {
        (self.provider.as_mut(), &self.location)
    }

    #[must_use]
    pub fn config_path(&self) -> Option<&FsPath> {
        self.config_path.as_deref()
    }

    /// Root-level node this session is mounted under, still unexpanded
    #[must_use]
    pub fn mount_node(&self) -> Node {
        Node::group(self.display_name(), Vec::new())
    }
}

/// Ordered collection of provider sessions
#[derive(Debug, Default)]
pub struct ProviderRegistry {
    sessions: Vec<Session>,
    config_dir: Option<PathBuf>,
}

impl ProviderRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store provider-private config files under `dir`
    #[must_use]
    pub fn with_config_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config_dir = Some(dir.into());
        self
    }

    /// Append a provider; returns the root index it is mounted at
    pub fn register(&mut self, provider: Box<dyn Provider>) -> usize {
        let mut session = Session::new(provider);
        session.config_path = self
            .config_dir
            .as_ref()
            .map(|dir| dir.join(format!("{}.json", session.name())));
        debug!("Registered provider '{}' at root {}", session.name(), self.sessions.len());
        self.sessions.push(session);
        self.sessions.len() - 1
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Session> {
        self.sessions.iter()
    }

    /// Session registered under `name`
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Session> {
        self.sessions.iter().find(|s| s.name() == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Session> {
        self.sessions.iter_mut().find(|s| s.name() == name)
    }

    /// Session mounted at the path's first index
    #[must_use]
    pub fn active(&self, path: &Path) -> Option<&Session> {
        self.sessions.get(path.first()?)
    }

    pub fn active_mut(&mut self, path: &Path) -> Option<&mut Session> {
        self.sessions.get_mut(path.first()?)
    }

    /// Whether `index` at the root is a provider mount
    #[must_use]
    pub fn is_mount(&self, index: usize) -> bool {
        index < self.sessions.len()
    }

    /// Root-level nodes for every session, in registration order
    #[must_use]
    pub fn mount_nodes(&self) -> Vec<Node> {
        self.sessions.iter().map(Session::mount_node).collect()
    }

    /// Run every session's init hook and load its config, in order
    pub fn init_all(&mut self) {
        for session in &mut self.sessions {
            session.provider.init();
            if let Some(path) = session.config_path.clone() {
                match session.provider.load_config(&path) {
                    Ok(()) => debug!("Loaded config for '{}'", session.name()),
                    Err(e) if e.is_unsupported() => {}
                    Err(e) => warn!("Failed to load config for '{}': {e}", session.name()),
                }
            }
        }
        info!("Initialized {} provider(s)", self.sessions.len());
    }

    /// Run every session's cleanup hook, in order
    pub fn cleanup_all(&mut self) {
        for session in &mut self.sessions {
            session.provider.cleanup();
        }
    }

    /// Build the registry described by `config`
    ///
    /// Unknown program names are skipped with a warning.
    #[must_use]
    pub fn from_config(config: &CompassConfig) -> Self {
        let mut registry = Self::new();
        if let Some(dir) = config.providers_dir() {
            registry = registry.with_config_dir(dir);
        }
        for program in &config.programs {
            let provider: Box<dyn Provider> = match program.as_str() {
                FilesystemProvider::NAME => Box::new(FilesystemProvider::new(config.file_browser_root())),
                SettingsProvider::NAME => Box::new(SettingsProvider::new()),
                name => match config.scripts.get(name) {
                    Some(script) => Box::new(ScriptProvider::new(name, script, config.script_runner.clone())),
                    None => {
                        warn!("No provider named '{name}', skipping");
                        continue;
                    }
                },
            };
            registry.register(provider);
        }
        registry
    }
}
