//! Navigation and edit engine
//!
//! The engine owns the cached tree, the cursor, the undo history, the overlay
//! and the provider registry. A front end feeds it one discrete [`Task`] (or
//! one key-like event such as [`Engine::enter`]) at a time; each call runs to
//! completion before the next is accepted.
//!
//! Every structural task keeps two paths apart for its whole run: the
//! *previous* path, captured before any arithmetic and used to read what is
//! removed or replaced, and the *current* path the cursor moves to, where any
//! newly created sibling is spliced in.

mod command;
mod edit;
pub mod error;
mod mode;
mod navigate;
pub mod transition;

pub use error::EngineError;
pub use command::{EDITOR_MODE, OPERATOR_MODE};
pub use mode::{Flavor, Mode, Task};

use tracing::{debug, warn};

use crate::config::{CompassConfig, DEFAULT_DEEP_SEARCH_LIMIT};
use crate::history::{DEFAULT_CAPACITY, UndoEntry, UndoHistory};
use crate::overlay::{ListItem, ListKey, Overlay};
use crate::registry::ProviderRegistry;
use crate::tags::{self, Marker};
use crate::tree::{self, Node, Path};

use transition::Addressed;

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// What a dispatched task did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The task ran and its effects are visible
    Applied,
    /// The task did not apply here and nothing changed
    Skipped,
}

/// Builder for [`Engine`]
#[derive(Debug, Default)]
pub struct EngineBuilder {
    registry: ProviderRegistry,
    document: Vec<Node>,
    flavor: Flavor,
    undo_capacity: Option<usize>,
    deep_search_limit: Option<usize>,
}

impl EngineBuilder {
    /// Providers to mount at the root, in registry order
    #[must_use]
    pub fn registry(mut self, registry: ProviderRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Plain nodes placed after the provider mounts
    #[must_use]
    pub fn document(mut self, nodes: Vec<Node>) -> Self {
        self.document = nodes;
        self
    }

    #[must_use]
    pub const fn flavor(mut self, flavor: Flavor) -> Self {
        self.flavor = flavor;
        self
    }

    #[must_use]
    pub const fn undo_capacity(mut self, capacity: usize) -> Self {
        self.undo_capacity = Some(capacity);
        self
    }

    #[must_use]
    pub const fn deep_search_limit(mut self, limit: usize) -> Self {
        self.deep_search_limit = Some(limit);
        self
    }

    /// Apply the engine-related settings of `config`
    #[must_use]
    pub fn config(self, config: &CompassConfig) -> Self {
        self.flavor(config.start_mode.into())
            .undo_capacity(config.undo_capacity)
            .deep_search_limit(config.deep_search_limit)
    }

    #[must_use]
    pub fn build(self) -> Engine {
        let mut tree = self.registry.mount_nodes();
        tree.extend(self.document);
        let mode = Mode::General(self.flavor);
        let mut engine = Engine {
            tree,
            cursor: Path::from([0]),
            previous: Path::from([0]),
            mode,
            return_mode: mode,
            input: String::new(),
            clipboard: None,
            history: UndoHistory::with_capacity(self.undo_capacity.unwrap_or(DEFAULT_CAPACITY)),
            overlay: Overlay::new(),
            registry: self.registry,
            message: None,
            pending_command: None,
            deep_search_limit: self.deep_search_limit.unwrap_or(DEFAULT_DEEP_SEARCH_LIMIT),
        };
        engine.rebuild_layer_listing();
        engine
    }
}

/// The modal navigation and edit state machine
#[derive(Debug)]
pub struct Engine {
    tree: Vec<Node>,
    cursor: Path,
    previous: Path,
    mode: Mode,
    /// Mode restored when an overlay closes
    return_mode: Mode,
    input: String,
    clipboard: Option<Node>,
    history: UndoHistory,
    overlay: Overlay,
    registry: ProviderRegistry,
    message: Option<String>,
    /// Provider command waiting for a picker selection
    pending_command: Option<String>,
    deep_search_limit: usize,
}

impl Engine {
    #[must_use]
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Engine over a plain tree with no providers
    #[must_use]
    pub fn new(tree: Vec<Node>) -> Self {
        Self::builder().document(tree).build()
    }

    #[must_use]
    pub fn tree(&self) -> &[Node] {
        &self.tree
    }

    /// Root nodes after the provider mounts
    #[must_use]
    pub fn document(&self) -> &[Node] {
        self.tree.get(self.registry.len()..).unwrap_or_default()
    }

    #[must_use]
    pub const fn cursor(&self) -> &Path {
        &self.cursor
    }

    /// Cursor captured at the start of the last task
    #[must_use]
    pub const fn previous(&self) -> &Path {
        &self.previous
    }

    /// Move the cursor; rejected if the path addresses nothing
    ///
    /// # Errors
    ///
    /// Returns `EngineError::OutOfRange` if `path` does not resolve.
    pub fn set_cursor(&mut self, path: Path) -> Result<()> {
        if tree::node_at(&self.tree, &path).is_none() {
            return Err(EngineError::OutOfRange(tree::TreeError::OutOfRange {
                depth: path.depth().saturating_sub(1),
                index: path.last().unwrap_or_default(),
            }));
        }
        self.cursor = path;
        self.rebuild_layer_listing();
        Ok(())
    }

    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    /// Contents of the edit or search buffer
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    #[must_use]
    pub const fn clipboard(&self) -> Option<&Node> {
        self.clipboard.as_ref()
    }

    #[must_use]
    pub const fn history(&self) -> &UndoHistory {
        &self.history
    }

    #[must_use]
    pub const fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    #[must_use]
    pub const fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    pub const fn registry_mut(&mut self) -> &mut ProviderRegistry {
        &mut self.registry
    }

    /// Message left by the last failed task
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Node under the cursor
    #[must_use]
    pub fn current_node(&self) -> Option<&Node> {
        tree::node_at(&self.tree, &self.cursor)
    }

    /// Sibling sequence the cursor is in
    #[must_use]
    pub fn current_layer(&self) -> &[Node] {
        tree::at(&self.tree, &self.cursor).unwrap_or_default()
    }

    /// Run one task
    ///
    /// Silent failures (out-of-range indices, missing provider capabilities,
    /// tasks that do not apply in the current mode) yield `Ok(Outcome::Skipped)`.
    ///
    /// # Errors
    ///
    /// Returns the `EngineError` of a user-visible failure; its text is also
    /// available through [`Engine::message`].
    pub fn dispatch(&mut self, task: Task) -> Result<Outcome> {
        debug!("Dispatching {task:?} in {} at [{}]", self.mode, self.cursor);
        let result = self.run(task);
        self.finish(result)
    }

    fn run(&mut self, task: Task) -> Result<()> {
        match self.mode {
            Mode::Insert(_) => match task {
                Task::Input => self.commit_input(),
                Task::Append | Task::AppendAppend => {
                    self.commit_input()?;
                    self.run(task)
                }
                Task::Undo | Task::Redo => {
                    self.discard_input();
                    self.run(task)
                }
                _ => Err(EngineError::NotApplicable("task unavailable while editing")),
            },
            Mode::SimpleSearch | Mode::ExtendedSearch | Mode::RunCommand => match task {
                Task::Up => {
                    self.overlay.select_previous();
                    Ok(())
                }
                Task::Down => {
                    self.overlay.select_next();
                    Ok(())
                }
                _ => Err(EngineError::NotApplicable("task unavailable in overlay")),
            },
            Mode::General(flavor) => match task {
                Task::Up | Task::Down => self.move_vertical(task),
                Task::Left => self.move_left(),
                Task::Right => self.move_right(),
                Task::Append | Task::AppendAppend => self.append(task),
                Task::Insert | Task::InsertInsert => self.begin_insert(task, flavor),
                Task::Delete | Task::Cut => self.delete(task, flavor),
                Task::Copy => self.copy(),
                Task::Paste => self.paste(),
                Task::Undo => self.undo(),
                Task::Redo => self.redo(),
                Task::Input => Err(EngineError::NotApplicable("no edit buffer open")),
            },
        }
    }

    fn finish(&mut self, result: Result<()>) -> Result<Outcome> {
        match result {
            Ok(()) => {
                self.message = None;
                if !self.mode.is_overlay() {
                    self.rebuild_layer_listing();
                }
                Ok(Outcome::Applied)
            }
            Err(error) if error.is_silent() => {
                debug!("Skipped: {error}");
                Ok(Outcome::Skipped)
            }
            Err(error) => {
                warn!("{error}");
                self.message = Some(error.to_string());
                Err(error)
            }
        }
    }

    /// Capture the cursor as the previous path for the task starting now
    fn begin(&mut self) -> Path {
        self.previous = self.cursor.clone();
        self.previous.clone()
    }

    /// Facts about the node at `path` used by the cursor arithmetic
    fn addressed(&self, path: &Path) -> Addressed {
        let node = tree::node_at(&self.tree, path);
        Addressed {
            is_key: node.is_some_and(Node::is_key),
            has_child_layer: node.is_some_and(Node::is_group),
            max_index: tree::max_sibling_index(&self.tree, path),
        }
    }

    /// Whether `path` lies below a provider's mount node
    fn in_provider_subtree(&self, path: &Path) -> bool {
        path.depth() >= 2 && self.registry.active(path).is_some()
    }

    /// Reject changes that would remove, replace, or shift a mount node
    fn guard_mounts(&self, path: &Path) -> Result<()> {
        if path.depth() == 1 && path.last().is_some_and(|index| self.registry.is_mount(index)) {
            return Err(EngineError::NotApplicable("provider mounts are fixed"));
        }
        Ok(())
    }

    fn record(&mut self, task: Task, path: Path, before: Option<Node>, after: Option<Node>, cursor_before: Path) {
        self.history.record(UndoEntry {
            path,
            task,
            before,
            after,
            cursor_before,
            cursor_after: self.cursor.clone(),
        });
    }

    fn open_buffer(&mut self, text: String, flavor: Flavor) {
        self.input = text;
        self.mode = Mode::Insert(flavor);
    }

    fn discard_input(&mut self) {
        if let Mode::Insert(flavor) = self.mode {
            self.input.clear();
            self.mode = Mode::General(flavor);
        }
    }

    /// Confirm the current mode's action
    ///
    /// # Errors
    ///
    /// Returns `EngineError` for user-visible failures of the confirmed action.
    pub fn enter(&mut self) -> Result<Outcome> {
        debug!("Enter in {} at [{}]", self.mode, self.cursor);
        let result = match self.mode {
            Mode::Insert(_) => self.commit_input(),
            Mode::General(flavor) => self.activate(flavor),
            Mode::SimpleSearch | Mode::ExtendedSearch => self.confirm_search(),
            Mode::RunCommand => self.confirm_command(),
        };
        self.finish(result)
    }

    /// Leave the current mode
    ///
    /// In editor insert mode the buffer is committed; in operator insert mode it
    /// is discarded. Overlays return to the mode they were opened from.
    ///
    /// # Errors
    ///
    /// Returns `EngineError` if committing the buffer fails visibly.
    pub fn escape(&mut self) -> Result<Outcome> {
        let result = match self.mode {
            Mode::Insert(Flavor::Editor) => self.commit_input(),
            Mode::Insert(Flavor::Operator) => {
                self.discard_input();
                Ok(())
            }
            Mode::SimpleSearch | Mode::ExtendedSearch | Mode::RunCommand => {
                self.close_overlay();
                Ok(())
            }
            Mode::General(_) => Err(EngineError::NotApplicable("nothing to leave")),
        };
        self.finish(result)
    }

    /// Append text to the edit or search buffer
    pub fn type_text(&mut self, text: &str) -> Outcome {
        if self.mode.is_general() {
            return Outcome::Skipped;
        }
        self.input.push_str(text);
        self.sync_query();
        Outcome::Applied
    }

    /// Remove the last character of the buffer
    pub fn backspace(&mut self) -> Outcome {
        if self.mode.is_general() || self.input.pop().is_none() {
            return Outcome::Skipped;
        }
        self.sync_query();
        Outcome::Applied
    }

    /// Replace the whole buffer
    pub fn set_input(&mut self, text: &str) -> Outcome {
        if self.mode.is_general() {
            return Outcome::Skipped;
        }
        text.clone_into(&mut self.input);
        self.sync_query();
        Outcome::Applied
    }

    fn sync_query(&mut self) {
        if self.mode.is_overlay() {
            self.overlay.set_query(&self.input);
        }
    }

    /// Enter on a node in a general mode
    fn activate(&mut self, flavor: Flavor) -> Result<()> {
        if self.in_radio_group() {
            return self.select_radio();
        }
        let node = self
            .current_node()
            .ok_or(EngineError::NotApplicable("nothing selected"))?;
        match (flavor, node.is_group()) {
            (Flavor::Operator, true) => self.move_right(),
            (Flavor::Operator, false) => self.open_current(),
            (Flavor::Editor, _) => self.begin_insert(Task::Insert, flavor),
        }
    }

    fn in_radio_group(&self) -> bool {
        self.cursor.depth() >= 2
            && tree::node_at(&self.tree, &self.cursor.parent())
                .is_some_and(|parent| Marker::Radio.has(parent.text()))
    }

    /// Listing of the cursor's layer for general and insert modes
    fn rebuild_layer_listing(&mut self) {
        let items = self
            .current_layer()
            .iter()
            .enumerate()
            .map(|(i, node)| {
                ListItem::new(ListKey::Path(self.cursor.with_last(i)), tags::strip_for_display(node.text()))
                    .group(node.is_group())
            })
            .collect();
        self.overlay.rebuild(items);
        self.overlay.select(self.cursor.last().unwrap_or_default());
    }
}
