//! Structural tasks: append, insert, commit, delete, cut, copy, paste, undo, redo

use tracing::debug;

use super::transition::advance;
use super::{Engine, EngineError, Flavor, Mode, Result, Task};
use crate::history::{Change, UndoEntry};
use crate::provider::ItemKind;
use crate::tags::Marker;
use crate::tree::{self, Node, Path};

impl Engine {
    /// Append or append-append: create an empty sibling
    pub(super) fn append(&mut self, task: Task) -> Result<()> {
        let previous = self.begin();

        if tree::at(&self.tree, &previous)?.is_empty() {
            let slot = self.slot_for(&previous);
            return self.create_first(task, &previous, slot);
        }

        let addressed = self.addressed(&previous);
        let current = advance(task, addressed, &previous)?;

        if task == Task::Append && addressed.is_key && !addressed.has_child_layer {
            // a leaf written as a group label turns into a group with one empty child
            self.guard_mounts(&previous)?;
            let node = tree::node_at(&self.tree, &previous).ok_or(EngineError::NotApplicable("nothing selected"))?;
            let converted = node.committed(node.text());
            let before = tree::replace(&mut self.tree, &previous, converted.clone())?;
            self.cursor = current;
            self.record(task, previous.clone(), Some(before), Some(converted), previous);
            return Ok(());
        }

        self.guard_mounts(&current)?;
        let slot = self.slot_for(&current);
        tree::insert(&mut self.tree, &current, slot.clone())?;
        self.cursor = current.clone();
        self.record(task, current, None, Some(slot), previous);
        Ok(())
    }

    /// Empty node created by append: an empty editable field inside a
    /// provider subtree, an empty leaf elsewhere
    fn slot_for(&self, path: &Path) -> Node {
        if self.in_provider_subtree(path) {
            Node::leaf(Marker::Input.format(""))
        } else {
            Node::empty_leaf()
        }
    }

    /// Create the first node of an empty layer at index zero
    fn create_first(&mut self, task: Task, previous: &Path, node: Node) -> Result<()> {
        let current = previous.with_last(0);
        self.guard_mounts(&current)?;
        tree::insert(&mut self.tree, &current, node.clone())?;
        self.cursor = current.clone();
        self.record(task, current, None, Some(node), previous.clone());
        Ok(())
    }

    /// Insert or insert-insert: open the edit buffer on the addressed node
    pub(super) fn begin_insert(&mut self, task: Task, flavor: Flavor) -> Result<()> {
        let previous = self.begin();

        if tree::at(&self.tree, &previous)?.is_empty() {
            if flavor == Flavor::Operator {
                return Err(EngineError::NotApplicable("nothing to edit"));
            }
            self.open_buffer(String::new(), flavor);
            return Ok(());
        }

        let current = advance(task, self.addressed(&previous), &previous)?;
        self.guard_mounts(&current)?;
        let node = tree::node_at(&self.tree, &current).ok_or(EngineError::NotApplicable("nothing selected"))?;

        let text = match Marker::Input.extract(node.text()) {
            Some(field) if self.in_provider_subtree(&current) => field.to_string(),
            _ if flavor == Flavor::Operator => {
                return Err(EngineError::NotApplicable("only editable fields can be edited here"));
            }
            _ => node.edit_text(),
        };
        self.cursor = current;
        self.open_buffer(text, flavor);
        Ok(())
    }

    /// Raw input: commit the edit buffer to the addressed node
    pub(super) fn commit_input(&mut self) -> Result<()> {
        let Mode::Insert(flavor) = self.mode else {
            return Err(EngineError::NotApplicable("no edit buffer open"));
        };
        let previous = self.begin();
        let line = std::mem::take(&mut self.input);
        self.mode = Mode::General(flavor);

        let Some(node) = tree::node_at(&self.tree, &previous) else {
            if tree::at(&self.tree, &previous)?.is_empty() {
                let created = Node::empty_leaf().committed(&line);
                return self.create_first(Task::Input, &previous, created);
            }
            return Err(EngineError::NotApplicable("nothing selected"));
        };

        if Marker::Input.has(node.text()) && self.in_provider_subtree(&previous) {
            let node = node.clone();
            return self.commit_to_provider(&previous, &node, &line);
        }

        self.guard_mounts(&previous)?;
        let updated = node.committed(&line);
        let before = tree::replace(&mut self.tree, &previous, updated.clone())?;
        self.record(Task::Input, previous.clone(), Some(before), Some(updated), previous);
        Ok(())
    }

    /// Route an edited field through the provider; the cached label changes
    /// only after the provider accepted the edit
    fn commit_to_provider(&mut self, path: &Path, node: &Node, line: &str) -> Result<()> {
        let old = Marker::Input.extract(node.text()).unwrap_or_default();
        if old == line {
            return Ok(());
        }
        let session = self
            .registry
            .active_mut(path)
            .ok_or_else(|| EngineError::ProviderUnavailable("no provider mounted".to_string()))?;
        let (provider, location) = session.parts_mut();
        match (old.is_empty(), ItemKind::from(node)) {
            (true, ItemKind::Group) => provider.create_directory(location.as_str(), line)?,
            (true, ItemKind::Leaf) => provider.create_file(location.as_str(), line)?,
            (false, _) => provider.commit(location.as_str(), old, line)?,
        }
        debug!("Provider accepted '{old}' -> '{line}' at {location}");

        if let Some(target) = tree::node_at_mut(&mut self.tree, path) {
            target.set_text(Marker::Input.replace_content(node.text(), line));
        }
        Ok(())
    }

    /// Delete or cut the addressed node
    ///
    /// In operator flavor an editable field inside a provider subtree is
    /// deleted through the provider first.
    pub(super) fn delete(&mut self, task: Task, flavor: Flavor) -> Result<()> {
        let previous = self.begin();
        self.guard_mounts(&previous)?;
        let node = tree::node_at(&self.tree, &previous).ok_or(EngineError::NotApplicable("nothing selected"))?;

        let provider_backed = task == Task::Delete
            && flavor == Flavor::Operator
            && Marker::Input.has(node.text())
            && self.in_provider_subtree(&previous);
        if provider_backed {
            let name = Marker::Input.extract(node.text()).unwrap_or_default().to_string();
            let session = self
                .registry
                .active_mut(&previous)
                .ok_or_else(|| EngineError::ProviderUnavailable("no provider mounted".to_string()))?;
            let (provider, location) = session.parts_mut();
            provider.delete(location.as_str(), &name)?;
            debug!("Provider deleted '{name}' at {location}");
        }

        let current = advance(task, self.addressed(&previous), &previous)?;
        let removed = tree::remove(&mut self.tree, &previous)?;

        // a non-root group never stays empty
        let placeholder = if previous.depth() > 1 && tree::at(&self.tree, &previous)?.is_empty() {
            if let Err(error) = tree::insert(&mut self.tree, &previous, Node::empty_leaf()) {
                tree::insert(&mut self.tree, &previous, removed)?;
                return Err(error.into());
            }
            Some(Node::empty_leaf())
        } else {
            None
        };

        self.cursor = current;
        if task == Task::Cut {
            self.clipboard = Some(removed.clone());
        }
        if !provider_backed {
            self.record(task, previous.clone(), Some(removed), placeholder, previous);
        }
        Ok(())
    }

    pub(super) fn copy(&mut self) -> Result<()> {
        let node = self.current_node().ok_or(EngineError::NotApplicable("nothing selected"))?;
        self.clipboard = Some(node.clone());
        Ok(())
    }

    /// Paste a copy of the clipboard at the cursor
    ///
    /// An empty-leaf placeholder is filled in place; otherwise the copy is
    /// inserted before the addressed node.
    pub(super) fn paste(&mut self) -> Result<()> {
        let previous = self.begin();
        let pasted = self
            .clipboard
            .clone()
            .ok_or(EngineError::NotApplicable("clipboard is empty"))?;
        let layer_len = tree::at(&self.tree, &previous)?.len();

        match tree::node_at(&self.tree, &previous) {
            Some(node) if node.is_placeholder() => {
                self.guard_mounts(&previous)?;
                let before = tree::replace(&mut self.tree, &previous, pasted.clone())?;
                self.record(Task::Paste, previous.clone(), Some(before), Some(pasted), previous);
            }
            _ => {
                let index = previous.last().unwrap_or_default().min(layer_len);
                let target = previous.with_last(index);
                self.guard_mounts(&target)?;
                tree::insert(&mut self.tree, &target, pasted.clone())?;
                self.cursor = target.clone();
                self.record(Task::Paste, target, None, Some(pasted), previous);
            }
        }
        Ok(())
    }

    /// Invert the newest active entry
    ///
    /// The entry is consumed only once it was applied; the session location
    /// follows the restored cursor.
    pub(super) fn undo(&mut self) -> Result<()> {
        let entry = self.history.peek_undo()?.clone();
        debug!("Undoing {:?} at {}", entry.task, entry.path);
        self.check_replay(&entry, false)?;
        self.replay(&entry, false)?;
        self.history.undo()?;
        self.cursor = entry.cursor_before;
        self.sync_location();
        Ok(())
    }

    pub(super) fn redo(&mut self) -> Result<()> {
        let entry = self.history.peek_redo()?.clone();
        debug!("Redoing {:?} at {}", entry.task, entry.path);
        self.check_replay(&entry, true)?;
        self.replay(&entry, true)?;
        self.history.redo()?;
        self.cursor = entry.cursor_after;
        self.sync_location();
        Ok(())
    }

    /// Make sure the tree still holds what `entry` expects at its path
    ///
    /// Layers re-fetched from a provider since the entry was recorded make it
    /// stale.
    fn check_replay(&self, entry: &UndoEntry, forward: bool) -> Result<()> {
        let Some(change) = entry.change() else {
            return Ok(());
        };
        let path = &entry.path;
        let stale = || EngineError::StaleHistory(path.clone());
        let expected = match (change, forward) {
            (Change::Insertion, false) | (Change::Replacement, false) => entry.after.as_ref(),
            (Change::Removal, true) | (Change::Replacement, true) => entry.before.as_ref(),
            (Change::Insertion, true) | (Change::Removal, false) => {
                let len = tree::at(&self.tree, path).map_err(|_| stale())?.len();
                return if path.last().is_some_and(|index| index <= len) {
                    Ok(())
                } else {
                    Err(stale())
                };
            }
        };
        if tree::node_at(&self.tree, path) == expected {
            Ok(())
        } else {
            Err(stale())
        }
    }

    /// Apply an entry forwards (redo) or backwards (undo)
    fn replay(&mut self, entry: &UndoEntry, forward: bool) -> Result<()> {
        let Some(change) = entry.change() else {
            return Ok(());
        };
        let path = &entry.path;
        match (change, forward) {
            (Change::Insertion, false) | (Change::Removal, true) => {
                tree::remove(&mut self.tree, path)?;
            }
            (Change::Insertion, true) => {
                if let Some(node) = &entry.after {
                    tree::insert(&mut self.tree, path, node.clone())?;
                }
            }
            (Change::Removal, false) => {
                if let Some(node) = &entry.before {
                    tree::insert(&mut self.tree, path, node.clone())?;
                }
            }
            (Change::Replacement, _) => {
                let snapshot = if forward { &entry.after } else { &entry.before };
                if let Some(node) = snapshot {
                    tree::replace(&mut self.tree, path, node.clone())?;
                }
            }
        }
        Ok(())
    }
}
