//! Provider protocol
//!
//! A provider surfaces a lazily fetched subtree and the edit, create, delete
//! and command verbs that act on its backing content. Only [`Provider::fetch`]
//! is mandatory; every optional operation defaults to
//! [`ProviderError::Unsupported`], which callers treat as "capability absent".
//!
//! Operations receive the session's current [`Location`] explicitly, so an
//! adapter holds no navigation state of its own.

pub mod error;
pub mod filesystem;
mod location;
pub mod script;
pub mod settings;

pub use error::ProviderError;
pub use filesystem::FilesystemProvider;
pub use location::Location;
pub use script::ScriptProvider;
pub use settings::SettingsProvider;

use std::path::Path;

use crate::tree::Node;

/// Default location handed to providers at mount time
pub const ROOT_LOCATION: &str = "/";

/// Kind of the item a command was invoked on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Leaf,
    Group,
}

impl From<&Node> for ItemKind {
    fn from(node: &Node) -> Self {
        if node.is_group() { Self::Group } else { Self::Leaf }
    }
}

/// Result of [`Provider::handle_command`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// A new node to insert after the cursor and open for editing
    Created(Node),
    /// The command needs an item from [`Provider::get_command_list_items`]
    NeedsSelection,
    /// The command ran in place; the current layer should be re-fetched
    Completed,
    /// The command could not run; the text is shown to the user
    Failed(String),
}

/// Entry of a command's secondary picker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandItem {
    pub label: String,
    /// Opaque value handed back to [`Provider::execute_command`]
    pub data: String,
}

/// One result of a deep search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeepSearchItem {
    /// Display label prefixed by its depth below the search root
    pub label: String,
    /// Ancestor names from the search root, for context
    pub breadcrumb: String,
    /// Absolute location the engine can navigate to
    pub location: String,
}

/// Content source mounted under one root-level node
pub trait Provider {
    /// Stable identifier, also used for the config file name
    fn name(&self) -> &str;

    /// Label of the root-level node
    fn display_name(&self) -> &str {
        self.name()
    }

    /// Location the session starts at
    fn root_location(&self) -> String {
        ROOT_LOCATION.to_string()
    }

    /// Lifecycle hook run once after registration
    fn init(&mut self) {}

    /// Lifecycle hook run once at shutdown
    fn cleanup(&mut self) {}

    /// Children of the group at `location`, in display order
    ///
    /// # Errors
    ///
    /// Returns `ProviderError` when the backing content cannot be read.
    fn fetch(&mut self, location: &str) -> Result<Vec<Node>, ProviderError>;

    /// Apply an edit made through an editable field
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Unsupported` unless implemented.
    fn commit(&mut self, _location: &str, _old: &str, _new: &str) -> Result<(), ProviderError> {
        Err(ProviderError::Unsupported("commit"))
    }

    /// Create a container named `name` at `location`
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Unsupported` unless implemented.
    fn create_directory(&mut self, _location: &str, _name: &str) -> Result<(), ProviderError> {
        Err(ProviderError::Unsupported("create directory"))
    }

    /// Create an item named `name` at `location`
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Unsupported` unless implemented.
    fn create_file(&mut self, _location: &str, _name: &str) -> Result<(), ProviderError> {
        Err(ProviderError::Unsupported("create file"))
    }

    /// Remove the item named `name` at `location`
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Unsupported` unless implemented.
    fn delete(&mut self, _location: &str, _name: &str) -> Result<(), ProviderError> {
        Err(ProviderError::Unsupported("delete"))
    }

    /// Labels of the provider-specific commands
    fn get_commands(&self) -> Vec<String> {
        Vec::new()
    }

    /// Run `command` against the selected item
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Unsupported` unless implemented.
    fn handle_command(
        &mut self,
        _location: &str,
        _command: &str,
        _label: &str,
        _kind: ItemKind,
    ) -> Result<CommandOutcome, ProviderError> {
        Err(ProviderError::Unsupported("commands"))
    }

    /// Items for the secondary picker of `command`
    fn get_command_list_items(&mut self, _location: &str, _command: &str) -> Vec<CommandItem> {
        Vec::new()
    }

    /// Finish `command` with the picked item's data
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Unsupported` unless implemented.
    fn execute_command(&mut self, _location: &str, _command: &str, _data: &str) -> Result<(), ProviderError> {
        Err(ProviderError::Unsupported("execute command"))
    }

    /// Breadth-first enumeration of everything below `root`, at most `limit` items
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Unsupported` unless implemented.
    fn collect_deep_search_items(&mut self, _root: &str, _limit: usize) -> Result<Vec<DeepSearchItem>, ProviderError> {
        Err(ProviderError::Unsupported("deep search"))
    }

    /// A radio selection was committed; persist first, then notify
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Unsupported` unless implemented.
    fn on_radio_change(&mut self, _group: &str, _value: &str) -> Result<(), ProviderError> {
        Err(ProviderError::Unsupported("radio change"))
    }

    /// Load provider-private state from `path`
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Unsupported` unless implemented.
    fn load_config(&mut self, _path: &Path) -> Result<(), ProviderError> {
        Err(ProviderError::Unsupported("load config"))
    }

    /// Persist provider-private state to `path`
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Unsupported` unless implemented.
    fn save_config(&mut self, _path: &Path) -> Result<(), ProviderError> {
        Err(ProviderError::Unsupported("save config"))
    }
}
