//! Filesystem provider
//!
//! Lists directories as unexpanded groups and files as leaves, each name
//! wrapped in an editable field so it can be renamed in place. Optional
//! properties (permissions, size, modification time) prefix the field.

use std::collections::{HashSet, VecDeque};
use std::fs::{self, Metadata, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use byte_unit::{Byte, UnitType};
use chrono::{DateTime, Local};
use tracing::{debug, warn};

use super::{CommandItem, CommandOutcome, DeepSearchItem, ItemKind, Provider, ProviderError};
use crate::tags::{self, Marker};
use crate::tree::Node;

pub const CMD_CREATE_FILE: &str = "create file";
pub const CMD_CREATE_DIRECTORY: &str = "create directory";
pub const CMD_SHOW_PROPERTIES: &str = "show properties";
pub const CMD_HIDE_PROPERTIES: &str = "hide properties";
pub const CMD_SORT_ALPHANUMERIC: &str = "sort alphanumerically";
pub const CMD_SORT_CHRONOLOGICAL: &str = "sort chronologically";
pub const CMD_OPEN_WITH: &str = "open with";
pub const CMD_OPEN: &str = "open";

/// Listing order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Case-insensitive by name
    #[default]
    Alphanumeric,
    /// Most recently modified first
    Chronological,
}

/// Provider backed by a directory tree
#[derive(Debug)]
pub struct FilesystemProvider {
    root: PathBuf,
    sort: SortOrder,
    show_properties: bool,
    open_with_target: Option<PathBuf>,
}

struct Entry {
    name: String,
    is_dir: bool,
    metadata: Option<Metadata>,
}

impl Entry {
    fn modified(&self) -> Option<SystemTime> {
        self.metadata.as_ref().and_then(|m| m.modified().ok())
    }
}

impl FilesystemProvider {
    pub const NAME: &'static str = "file browser";

    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            sort: SortOrder::default(),
            show_properties: false,
            open_with_target: None,
        }
    }

    #[must_use]
    pub const fn sort_order(&self) -> SortOrder {
        self.sort
    }

    pub fn set_sort_order(&mut self, sort: SortOrder) {
        self.sort = sort;
    }

    #[must_use]
    pub const fn shows_properties(&self) -> bool {
        self.show_properties
    }

    pub fn set_show_properties(&mut self, show: bool) {
        self.show_properties = show;
    }

    fn read_entries(&self, dir: &Path) -> Result<Vec<Entry>, ProviderError> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry in {}: {e}", dir.display());
                    continue;
                }
            };
            let path = entry.path();
            // follow links for the kind so linked directories stay navigable
            let metadata = fs::metadata(&path).or_else(|_| entry.metadata()).ok();
            entries.push(Entry {
                name: entry.file_name().to_string_lossy().into_owned(),
                is_dir: metadata.as_ref().is_some_and(Metadata::is_dir),
                metadata,
            });
        }

        match self.sort {
            SortOrder::Alphanumeric => {
                entries.sort_by_cached_key(|entry| entry.name.to_lowercase());
            }
            SortOrder::Chronological => {
                entries.sort_by(|a, b| b.modified().cmp(&a.modified()));
            }
        }
        Ok(entries)
    }

    fn label(&self, entry: &Entry) -> String {
        let field = Marker::Input.format(&entry.name);
        if !self.show_properties {
            return field;
        }
        match &entry.metadata {
            Some(metadata) => format!("{} {field}", format_properties(metadata)),
            None => field,
        }
    }

    fn child_path(location: &str, name: &str) -> Result<PathBuf, ProviderError> {
        validate_name(name)?;
        Ok(Path::new(location).join(name))
    }
}

/// Reject names that would escape the current directory
fn validate_name(name: &str) -> Result<(), ProviderError> {
    if name.is_empty() || name == "." || name == ".." || name.contains('/') {
        return Err(ProviderError::Invalid(format!("Invalid name: '{name}'")));
    }
    Ok(())
}

fn format_properties(metadata: &Metadata) -> String {
    let size = Byte::from_u64(metadata.len())
        .get_appropriate_unit(UnitType::Binary)
        .to_string();
    let modified = metadata.modified().map_or_else(
        |_| "-".to_string(),
        |time| DateTime::<Local>::from(time).format("%Y-%m-%d %H:%M").to_string(),
    );
    format!("{} {size:>10} {modified}", permissions(metadata))
}

#[cfg(unix)]
fn permissions(metadata: &Metadata) -> String {
    use std::os::unix::fs::PermissionsExt;

    let mode = metadata.permissions().mode();
    let kind = if metadata.is_dir() { 'd' } else { '-' };
    let bits = ['r', 'w', 'x'];
    let mut out = String::from(kind);
    for shift in (0..9).rev() {
        let bit = bits[(8 - shift) % 3];
        out.push(if mode & (1 << shift) != 0 { bit } else { '-' });
    }
    out
}

#[cfg(not(unix))]
fn permissions(metadata: &Metadata) -> String {
    let kind = if metadata.is_dir() { "d" } else { "-" };
    let write = if metadata.permissions().readonly() { "r-" } else { "rw" };
    format!("{kind}{write}")
}

impl Provider for FilesystemProvider {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn root_location(&self) -> String {
        self.root.to_string_lossy().into_owned()
    }

    fn fetch(&mut self, location: &str) -> Result<Vec<Node>, ProviderError> {
        let entries = self.read_entries(Path::new(location))?;
        debug!("Listed {} entries in {location}", entries.len());
        Ok(entries
            .iter()
            .map(|entry| {
                let label = self.label(entry);
                if entry.is_dir {
                    Node::group(label, Vec::new())
                } else {
                    Node::leaf(label)
                }
            })
            .collect())
    }

    fn commit(&mut self, location: &str, old: &str, new: &str) -> Result<(), ProviderError> {
        let from = Self::child_path(location, old)?;
        let to = Self::child_path(location, new)?;
        if to.exists() {
            return Err(ProviderError::Invalid(format!("'{new}' already exists")));
        }
        fs::rename(&from, &to)?;
        debug!("Renamed {} to {}", from.display(), to.display());
        Ok(())
    }

    fn create_directory(&mut self, location: &str, name: &str) -> Result<(), ProviderError> {
        fs::create_dir(Self::child_path(location, name)?)?;
        Ok(())
    }

    fn create_file(&mut self, location: &str, name: &str) -> Result<(), ProviderError> {
        OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(Self::child_path(location, name)?)?;
        Ok(())
    }

    fn delete(&mut self, location: &str, name: &str) -> Result<(), ProviderError> {
        let path = Self::child_path(location, name)?;
        let metadata = fs::symlink_metadata(&path)?;
        if metadata.is_dir() {
            fs::remove_dir_all(&path)?;
        } else {
            fs::remove_file(&path)?;
        }
        debug!("Deleted {}", path.display());
        Ok(())
    }

    fn get_commands(&self) -> Vec<String> {
        let properties = if self.show_properties {
            CMD_HIDE_PROPERTIES
        } else {
            CMD_SHOW_PROPERTIES
        };
        let sort = match self.sort {
            SortOrder::Alphanumeric => CMD_SORT_CHRONOLOGICAL,
            SortOrder::Chronological => CMD_SORT_ALPHANUMERIC,
        };
        [CMD_CREATE_FILE, CMD_CREATE_DIRECTORY, properties, sort, CMD_OPEN_WITH]
            .into_iter()
            .map(String::from)
            .collect()
    }

    fn handle_command(
        &mut self,
        location: &str,
        command: &str,
        label: &str,
        _kind: ItemKind,
    ) -> Result<CommandOutcome, ProviderError> {
        let placeholder = Marker::Input.format("");
        let outcome = match command {
            CMD_CREATE_FILE => CommandOutcome::Created(Node::leaf(placeholder)),
            CMD_CREATE_DIRECTORY => CommandOutcome::Created(Node::group(placeholder, Vec::new())),
            CMD_SHOW_PROPERTIES | CMD_HIDE_PROPERTIES => {
                self.show_properties = command == CMD_SHOW_PROPERTIES;
                CommandOutcome::Completed
            }
            CMD_SORT_ALPHANUMERIC => {
                self.sort = SortOrder::Alphanumeric;
                CommandOutcome::Completed
            }
            CMD_SORT_CHRONOLOGICAL => {
                self.sort = SortOrder::Chronological;
                CommandOutcome::Completed
            }
            CMD_OPEN_WITH => {
                let name = tags::segment(label);
                if name.is_empty() {
                    return Ok(CommandOutcome::Failed("Nothing selected to open".to_string()));
                }
                self.open_with_target = Some(Path::new(location).join(name));
                CommandOutcome::NeedsSelection
            }
            other => CommandOutcome::Failed(format!("Unknown command: {other}")),
        };
        Ok(outcome)
    }

    fn get_command_list_items(&mut self, _location: &str, command: &str) -> Vec<CommandItem> {
        if command == CMD_OPEN_WITH {
            applications::installed()
        } else {
            Vec::new()
        }
    }

    fn execute_command(&mut self, location: &str, command: &str, data: &str) -> Result<(), ProviderError> {
        match command {
            CMD_OPEN_WITH => {
                let target = self
                    .open_with_target
                    .take()
                    .ok_or_else(|| ProviderError::Invalid("No item chosen for 'open with'".to_string()))?;
                open::with(&target, data)?;
                Ok(())
            }
            CMD_OPEN => {
                let target = if data.contains("://") || Path::new(data).is_absolute() {
                    PathBuf::from(data)
                } else {
                    Self::child_path(location, data)?
                };
                open::that(&target)?;
                Ok(())
            }
            _ => Err(ProviderError::Unsupported("execute command")),
        }
    }

    fn collect_deep_search_items(&mut self, root: &str, limit: usize) -> Result<Vec<DeepSearchItem>, ProviderError> {
        let mut items = Vec::new();
        let mut visited = HashSet::new();
        let mut queue = VecDeque::from([(PathBuf::from(root), 0_usize, String::new())]);
        if let Ok(canonical) = fs::canonicalize(root) {
            visited.insert(canonical);
        }

        while let Some((dir, depth, breadcrumb)) = queue.pop_front() {
            let Ok(entries) = self.read_entries(&dir) else {
                continue;
            };
            for entry in entries {
                if items.len() >= limit {
                    debug!("Deep search stopped at {limit} items");
                    return Ok(items);
                }
                let path = dir.join(&entry.name);
                items.push(DeepSearchItem {
                    label: format!("{} {}", "-".repeat(depth + 1), entry.name),
                    breadcrumb: breadcrumb.clone(),
                    location: path.to_string_lossy().into_owned(),
                });

                let is_real_dir = fs::symlink_metadata(&path).is_ok_and(|m| m.is_dir());
                if !is_real_dir {
                    continue;
                }
                let Ok(canonical) = fs::canonicalize(&path) else {
                    continue;
                };
                if visited.insert(canonical) {
                    let crumb = if breadcrumb.is_empty() {
                        entry.name.clone()
                    } else {
                        format!("{breadcrumb} > {}", entry.name)
                    };
                    queue.push_back((path, depth + 1, crumb));
                }
            }
        }
        Ok(items)
    }
}

/// Installed desktop applications, used by "open with"
mod applications {
    use std::fs;
    use std::path::PathBuf;

    use super::CommandItem;

    fn search_dirs() -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = dirs::data_dir()
            .map(|dir| dir.join("applications"))
            .into_iter()
            .collect();
        paths.push(PathBuf::from("/usr/local/share/applications"));
        paths.push(PathBuf::from("/usr/share/applications"));
        paths
    }

    /// Parse the name and program of a `.desktop` entry
    pub(super) fn parse_desktop_entry(content: &str) -> Option<CommandItem> {
        let mut in_entry = false;
        let mut name = None;
        let mut exec = None;
        for line in content.lines().map(str::trim) {
            if line.starts_with('[') {
                in_entry = line == "[Desktop Entry]";
                continue;
            }
            if !in_entry {
                continue;
            }
            if let Some(value) = line.strip_prefix("Name=") {
                name.get_or_insert_with(|| value.to_string());
            } else if let Some(value) = line.strip_prefix("Exec=") {
                exec = value.split_whitespace().next().map(str::to_string);
            } else if line == "NoDisplay=true" || line == "Hidden=true" {
                return None;
            }
        }
        Some(CommandItem {
            label: name?,
            data: exec?,
        })
    }

    pub(super) fn installed() -> Vec<CommandItem> {
        let mut items: Vec<CommandItem> = search_dirs()
            .into_iter()
            .filter_map(|dir| fs::read_dir(dir).ok())
            .flatten()
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "desktop"))
            .filter_map(|path| fs::read_to_string(path).ok())
            .filter_map(|content| parse_desktop_entry(&content))
            .collect();
        items.sort_by_cached_key(|item| item.label.to_lowercase());
        items.dedup_by(|a, b| a.label == b.label);
        items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TempTree;

    fn names(nodes: &[Node]) -> Vec<String> {
        nodes.iter().map(|node| tags::segment(node.text())).collect()
    }

    #[test]
    fn test_fetch_lists_dirs_as_groups() {
        let tree = TempTree::new(&["b.txt", "A.txt", "docs/readme.md"]);
        let mut provider = FilesystemProvider::new(tree.path());

        let nodes = provider.fetch(&provider.root_location()).unwrap();
        assert_eq!(names(&nodes), vec!["A.txt", "b.txt", "docs"]);
        assert_eq!(nodes[2], Node::group("<input>docs</input>", vec![]));
        assert_eq!(nodes[0], Node::leaf("<input>A.txt</input>"));
    }

    #[test]
    fn test_fetch_missing_directory_fails() {
        let tree = TempTree::new(&[]);
        let mut provider = FilesystemProvider::new(tree.path());
        let missing = tree.path().join("nope");
        assert!(provider.fetch(&missing.to_string_lossy()).is_err());
    }

    #[test]
    fn test_properties_prefix_field() {
        let tree = TempTree::new(&["a.txt"]);
        let mut provider = FilesystemProvider::new(tree.path());
        provider.set_show_properties(true);

        let nodes = provider.fetch(&provider.root_location()).unwrap();
        let label = nodes[0].text();
        assert!(label.ends_with("<input>a.txt</input>"));
        assert!(label.len() > "<input>a.txt</input>".len());
    }

    #[test]
    fn test_rename_create_delete() {
        let tree = TempTree::new(&["old.txt"]);
        let location = tree.location();
        let mut provider = FilesystemProvider::new(tree.path());

        provider.commit(&location, "old.txt", "new.txt").unwrap();
        assert!(tree.path().join("new.txt").exists());
        assert!(!tree.path().join("old.txt").exists());

        provider.create_directory(&location, "sub").unwrap();
        provider.create_file(&location, "made.txt").unwrap();
        assert!(tree.path().join("sub").is_dir());
        assert!(tree.path().join("made.txt").is_file());
        assert!(provider.create_file(&location, "made.txt").is_err());

        provider.delete(&location, "sub").unwrap();
        assert!(!tree.path().join("sub").exists());
    }

    #[test]
    fn test_rename_rejects_existing_and_bad_names() {
        let tree = TempTree::new(&["a.txt", "b.txt"]);
        let location = tree.location();
        let mut provider = FilesystemProvider::new(tree.path());

        assert!(provider.commit(&location, "a.txt", "b.txt").is_err());
        assert!(provider.commit(&location, "a.txt", "../x").is_err());
        assert!(provider.create_file(&location, "").is_err());
    }

    #[test]
    fn test_commands_toggle() {
        let tree = TempTree::new(&[]);
        let location = tree.location();
        let mut provider = FilesystemProvider::new(tree.path());
        assert!(provider.get_commands().contains(&CMD_SHOW_PROPERTIES.to_string()));

        let outcome = provider
            .handle_command(&location, CMD_SHOW_PROPERTIES, "", ItemKind::Leaf)
            .unwrap();
        assert_eq!(outcome, CommandOutcome::Completed);
        assert!(provider.shows_properties());
        assert!(provider.get_commands().contains(&CMD_HIDE_PROPERTIES.to_string()));

        provider
            .handle_command(&location, CMD_SORT_CHRONOLOGICAL, "", ItemKind::Leaf)
            .unwrap();
        assert_eq!(provider.sort_order(), SortOrder::Chronological);
    }

    #[test]
    fn test_create_commands_return_placeholders() {
        let mut provider = FilesystemProvider::new("/");
        let file = provider
            .handle_command("/", CMD_CREATE_FILE, "", ItemKind::Leaf)
            .unwrap();
        assert_eq!(file, CommandOutcome::Created(Node::leaf("<input></input>")));
        let dir = provider
            .handle_command("/", CMD_CREATE_DIRECTORY, "", ItemKind::Leaf)
            .unwrap();
        assert_eq!(dir, CommandOutcome::Created(Node::group("<input></input>", vec![])));
    }

    #[test]
    fn test_open_with_needs_selection() {
        let mut provider = FilesystemProvider::new("/");
        let outcome = provider
            .handle_command("/tmp", CMD_OPEN_WITH, "<input>a.txt</input>", ItemKind::Leaf)
            .unwrap();
        assert_eq!(outcome, CommandOutcome::NeedsSelection);
    }

    #[test]
    fn test_deep_search_is_breadth_first_and_capped() {
        let tree = TempTree::new(&["a/deep/x.txt", "b.txt", "a/y.txt"]);
        let mut provider = FilesystemProvider::new(tree.path());
        let root = tree.location();

        let items = provider.collect_deep_search_items(&root, 100).unwrap();
        let labels: Vec<&str> = items.iter().map(|item| item.label.as_str()).collect();
        assert_eq!(labels, vec!["- a", "- b.txt", "-- deep", "-- y.txt", "--- x.txt"]);
        assert_eq!(items[4].breadcrumb, "a > deep");

        let capped = provider.collect_deep_search_items(&root, 2).unwrap();
        assert_eq!(capped.len(), 2);
    }

    #[cfg(unix)]
    #[test]
    fn test_deep_search_does_not_follow_symlinks() {
        let tree = TempTree::new(&["a/file.txt"]);
        std::os::unix::fs::symlink(tree.path(), tree.path().join("a/loop")).unwrap();
        let mut provider = FilesystemProvider::new(tree.path());

        let items = provider
            .collect_deep_search_items(&tree.location(), 1000)
            .unwrap();
        assert_eq!(items.len(), 3);
    }

    #[test]
    fn test_parse_desktop_entry() {
        let entry = "[Desktop Entry]\nName=Editor\nExec=gedit %U\n[Desktop Action new]\nName=Other\n";
        let item = applications::parse_desktop_entry(entry).unwrap();
        assert_eq!(item.label, "Editor");
        assert_eq!(item.data, "gedit");
        assert!(applications::parse_desktop_entry("[Desktop Entry]\nName=X\nExec=x\nNoDisplay=true").is_none());
    }
}
