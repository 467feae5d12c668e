//! Testing utilities for compass
//!
//! This module provides a scripted [`MockProvider`], a [`TempTree`] fixture
//! for filesystem tests, and small node builders.
//!
//! Only available when compiled with `cfg(test)`.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::rc::Rc;

use tempfile::TempDir;

use crate::provider::{CommandItem, CommandOutcome, DeepSearchItem, ItemKind, Provider, ProviderError};
use crate::tree::Node;

/// Leaves with the given texts
#[must_use]
pub fn leaves(texts: &[&str]) -> Vec<Node> {
    texts.iter().map(|text| Node::leaf(*text)).collect()
}

/// Every provider call a [`MockProvider`] received, in order per kind
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MockCalls {
    pub fetches: Vec<String>,
    /// `(location, old, new)`
    pub commits: Vec<(String, String, String)>,
    /// `(location, name)`
    pub created_files: Vec<(String, String)>,
    pub created_directories: Vec<(String, String)>,
    pub deletes: Vec<(String, String)>,
    /// `(group, value)`
    pub radio_changes: Vec<(String, String)>,
    /// `(location, command, data)`
    pub executed: Vec<(String, String, String)>,
}

/// Provider with scripted children per location that records every call
///
/// # Examples
/// ```ignore
/// let mock = MockProvider::new("files").with_children("/", leaves(&["a", "b"]));
/// let calls = mock.calls();
/// ```
pub struct MockProvider {
    name: String,
    children: HashMap<String, Vec<Node>>,
    commands: Vec<(String, CommandOutcome)>,
    list_items: Vec<CommandItem>,
    deep_items: Option<Vec<DeepSearchItem>>,
    reject_writes: bool,
    calls: Rc<RefCell<MockCalls>>,
    lifecycle: Rc<RefCell<Vec<String>>>,
}

impl MockProvider {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            children: HashMap::new(),
            commands: Vec::new(),
            list_items: Vec::new(),
            deep_items: None,
            reject_writes: false,
            calls: Rc::default(),
            lifecycle: Rc::default(),
        }
    }

    /// Children returned when `location` is fetched
    #[must_use]
    pub fn with_children(mut self, location: &str, children: Vec<Node>) -> Self {
        self.children.insert(location.to_string(), children);
        self
    }

    /// Offer `command`, answering it with `outcome`
    #[must_use]
    pub fn with_command(mut self, command: &str, outcome: CommandOutcome) -> Self {
        self.commands.push((command.to_string(), outcome));
        self
    }

    /// Items of every command's secondary picker
    #[must_use]
    pub fn with_list_items(mut self, items: Vec<CommandItem>) -> Self {
        self.list_items = items;
        self
    }

    /// Enable deep search, answering with `items`
    #[must_use]
    pub fn with_deep_search(mut self, items: Vec<DeepSearchItem>) -> Self {
        self.deep_items = Some(items);
        self
    }

    /// Fail every commit, create, delete and radio change
    #[must_use]
    pub const fn rejecting_writes(mut self) -> Self {
        self.reject_writes = true;
        self
    }

    /// Shared handle on the recorded calls
    #[must_use]
    pub fn calls(&self) -> Rc<RefCell<MockCalls>> {
        Rc::clone(&self.calls)
    }

    /// Shared log of lifecycle hook calls, as `"init <name>"` and `"cleanup <name>"`
    #[must_use]
    pub fn lifecycle_log(&self) -> Rc<RefCell<Vec<String>>> {
        Rc::clone(&self.lifecycle)
    }

    /// Write lifecycle entries into another mock's log
    #[must_use]
    pub fn sharing_lifecycle_log(mut self, log: &Rc<RefCell<Vec<String>>>) -> Self {
        self.lifecycle = Rc::clone(log);
        self
    }

    fn check_write(&self) -> Result<(), ProviderError> {
        if self.reject_writes {
            return Err(ProviderError::Invalid("writes rejected".to_string()));
        }
        Ok(())
    }
}

impl Provider for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn init(&mut self) {
        self.lifecycle.borrow_mut().push(format!("init {}", self.name));
    }

    fn cleanup(&mut self) {
        self.lifecycle.borrow_mut().push(format!("cleanup {}", self.name));
    }

    fn fetch(&mut self, location: &str) -> Result<Vec<Node>, ProviderError> {
        self.calls.borrow_mut().fetches.push(location.to_string());
        self.children
            .get(location)
            .cloned()
            .ok_or_else(|| ProviderError::NotFound(location.to_string()))
    }

    fn commit(&mut self, location: &str, old: &str, new: &str) -> Result<(), ProviderError> {
        self.check_write()?;
        self.calls
            .borrow_mut()
            .commits
            .push((location.to_string(), old.to_string(), new.to_string()));
        Ok(())
    }

    fn create_directory(&mut self, location: &str, name: &str) -> Result<(), ProviderError> {
        self.check_write()?;
        self.calls
            .borrow_mut()
            .created_directories
            .push((location.to_string(), name.to_string()));
        Ok(())
    }

    fn create_file(&mut self, location: &str, name: &str) -> Result<(), ProviderError> {
        self.check_write()?;
        self.calls
            .borrow_mut()
            .created_files
            .push((location.to_string(), name.to_string()));
        Ok(())
    }

    fn delete(&mut self, location: &str, name: &str) -> Result<(), ProviderError> {
        self.check_write()?;
        self.calls
            .borrow_mut()
            .deletes
            .push((location.to_string(), name.to_string()));
        Ok(())
    }

    fn get_commands(&self) -> Vec<String> {
        self.commands.iter().map(|(command, _)| command.clone()).collect()
    }

    fn handle_command(
        &mut self,
        _location: &str,
        command: &str,
        _label: &str,
        _kind: ItemKind,
    ) -> Result<CommandOutcome, ProviderError> {
        self.commands
            .iter()
            .find(|(name, _)| name == command)
            .map(|(_, outcome)| outcome.clone())
            .ok_or(ProviderError::Unsupported("command"))
    }

    fn get_command_list_items(&mut self, _location: &str, _command: &str) -> Vec<CommandItem> {
        self.list_items.clone()
    }

    fn execute_command(&mut self, location: &str, command: &str, data: &str) -> Result<(), ProviderError> {
        self.calls
            .borrow_mut()
            .executed
            .push((location.to_string(), command.to_string(), data.to_string()));
        Ok(())
    }

    fn collect_deep_search_items(&mut self, _root: &str, limit: usize) -> Result<Vec<DeepSearchItem>, ProviderError> {
        let items = self
            .deep_items
            .clone()
            .ok_or(ProviderError::Unsupported("deep search"))?;
        Ok(items.into_iter().take(limit).collect())
    }

    fn on_radio_change(&mut self, group: &str, value: &str) -> Result<(), ProviderError> {
        self.check_write()?;
        self.calls
            .borrow_mut()
            .radio_changes
            .push((group.to_string(), value.to_string()));
        Ok(())
    }
}

/// Temporary directory populated with files, removed on drop
pub struct TempTree {
    dir: TempDir,
}

impl TempTree {
    /// Create the directory with `files` (relative paths, parents created as
    /// needed; a trailing `/` creates an empty directory)
    ///
    /// # Panics
    /// Panics if the directory or any file cannot be created.
    #[must_use]
    pub fn new(files: &[&str]) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        for file in files {
            let path = dir.path().join(file);
            if file.ends_with('/') {
                fs::create_dir_all(&path).expect("Failed to create test directory");
                continue;
            }
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).expect("Failed to create test directory");
            }
            fs::write(&path, b"test content").expect("Failed to write test file");
        }
        Self { dir }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// The directory as a provider location
    #[must_use]
    pub fn location(&self) -> String {
        self.path().to_string_lossy().into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temp_tree_creates_nested_files() {
        let tree = TempTree::new(&["a/b/c.txt", "empty/"]);
        assert!(tree.path().join("a/b/c.txt").is_file());
        assert!(tree.path().join("empty").is_dir());
    }

    #[test]
    fn test_mock_records_fetches() {
        let mut mock = MockProvider::new("m").with_children("/", leaves(&["x"]));
        let calls = mock.calls();
        assert_eq!(mock.fetch("/").unwrap(), leaves(&["x"]));
        assert!(mock.fetch("/missing").is_err());
        assert_eq!(calls.borrow().fetches, vec!["/", "/missing"]);
    }
}
