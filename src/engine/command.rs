//! Search and command overlays

use std::collections::VecDeque;

use tracing::{debug, info};

use super::{Engine, EngineError, Flavor, Mode, Outcome, Result};
use crate::overlay::{ListItem, ListKey};
use crate::provider::{CommandOutcome, DeepSearchItem};
use crate::tags::{self, Marker};
use crate::tree::{self, Node, Path};

/// Command switching to the editor flavor
pub const EDITOR_MODE: &str = "editor mode";
/// Command switching to the operator flavor
pub const OPERATOR_MODE: &str = "operator mode";

impl Engine {
    /// Filter the current layer by name
    ///
    /// # Errors
    ///
    /// Returns `EngineError` only for user-visible failures; opening from a
    /// mode other than a general one is skipped.
    pub fn open_search(&mut self) -> Result<Outcome> {
        let result = self.open_overlay(Mode::SimpleSearch).map(|()| self.rebuild_layer_listing());
        self.finish(result)
    }

    /// Filter everything below the cursor's provider, or below the cursor's
    /// layer when no provider can search deeply
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Provider` when the provider's deep search fails.
    pub fn open_extended_search(&mut self) -> Result<Outcome> {
        let result = self.open_overlay(Mode::ExtendedSearch).and_then(|()| {
            let listed = self.list_extended();
            if listed.is_err() {
                self.close_overlay();
            }
            listed
        });
        self.finish(result)
    }

    fn list_extended(&mut self) -> Result<()> {
        let items = match self.deep_search_items() {
            Err(EngineError::ProviderUnavailable(_)) => self.scan_items(),
            other => other?,
        };
        debug!("Extended search over {} item(s)", items.len());
        self.overlay.rebuild(items);
        Ok(())
    }

    /// List the flavor switches and the active provider's commands
    ///
    /// # Errors
    ///
    /// Returns `EngineError` only for user-visible failures; opening from a
    /// mode other than a general one is skipped.
    pub fn open_command_palette(&mut self) -> Result<Outcome> {
        let result = self.open_overlay(Mode::RunCommand).map(|()| {
            let mut commands = vec![EDITOR_MODE.to_string(), OPERATOR_MODE.to_string()];
            if self.in_provider_subtree(&self.cursor) {
                if let Some(session) = self.registry.active(&self.cursor) {
                    commands.extend(session.provider().get_commands());
                }
            }
            let items = commands
                .into_iter()
                .map(|command| ListItem::new(ListKey::Command(command.clone()), command))
                .collect();
            self.overlay.rebuild(items);
        });
        self.finish(result)
    }

    fn open_overlay(&mut self, mode: Mode) -> Result<()> {
        if !self.mode.is_general() {
            return Err(EngineError::NotApplicable("overlays open from a general mode"));
        }
        self.return_mode = self.mode;
        self.mode = mode;
        self.input.clear();
        self.pending_command = None;
        self.overlay.set_query("");
        Ok(())
    }

    /// Return to the mode the overlay was opened from
    pub(super) fn close_overlay(&mut self) {
        if self.mode.is_overlay() {
            self.mode = self.return_mode;
        }
        self.input.clear();
        self.pending_command = None;
        self.overlay.set_query("");
    }

    fn deep_search_items(&mut self) -> Result<Vec<ListItem>> {
        let limit = self.deep_search_limit;
        let session = self
            .registry
            .active_mut(&self.cursor)
            .ok_or_else(|| EngineError::ProviderUnavailable("no provider mounted".to_string()))?;
        let root = session.provider().root_location();
        let found = session.provider_mut().collect_deep_search_items(&root, limit)?;
        Ok(found
            .into_iter()
            .map(|DeepSearchItem { label, breadcrumb, location }| {
                ListItem::new(ListKey::Location(location), label).with_detail(breadcrumb)
            })
            .collect())
    }

    /// Breadth-first listing of the cached subtree from the cursor's layer
    fn scan_items(&self) -> Vec<ListItem> {
        let mut queue: VecDeque<(Path, &Node, usize)> = self
            .current_layer()
            .iter()
            .enumerate()
            .map(|(i, node)| (self.cursor.with_last(i), node, 0))
            .collect();

        let mut items = Vec::new();
        while let Some((path, node, depth)) = queue.pop_front() {
            if items.len() >= self.deep_search_limit {
                debug!("Tree scan stopped at {} items", self.deep_search_limit);
                break;
            }
            let label = format!("{} {}", "-".repeat(depth + 1), tags::strip_for_display(node.text()));
            items.push(ListItem::new(ListKey::Path(path.clone()), label).group(node.is_group()));
            for (i, child) in node.children().unwrap_or_default().iter().enumerate() {
                if let Ok(child_path) = path.child(i) {
                    queue.push_back((child_path, child, depth + 1));
                }
            }
        }
        items
    }

    /// Enter in a search overlay: jump to the selected hit
    pub(super) fn confirm_search(&mut self) -> Result<()> {
        let key = self
            .overlay
            .selected()
            .map(|item| item.key.clone())
            .ok_or(EngineError::NotApplicable("no match selected"))?;
        self.close_overlay();
        self.begin();
        match key {
            ListKey::Path(path) => {
                if tree::node_at(&self.tree, &path).is_none() {
                    return Err(EngineError::NotApplicable("match no longer exists"));
                }
                self.cursor = path;
                self.sync_location();
                Ok(())
            }
            ListKey::Location(location) => self.teleport(&location),
            ListKey::Command(_) | ListKey::Data(_) => Err(EngineError::NotApplicable("not a search hit")),
        }
    }

    /// Enter in the command overlay
    pub(super) fn confirm_command(&mut self) -> Result<()> {
        let key = self
            .overlay
            .selected()
            .map(|item| item.key.clone())
            .ok_or(EngineError::NotApplicable("no command selected"))?;
        let pending = self.pending_command.take();
        self.close_overlay();

        match key {
            ListKey::Command(command) if command == EDITOR_MODE => {
                self.mode = Mode::General(Flavor::Editor);
                Ok(())
            }
            ListKey::Command(command) if command == OPERATOR_MODE => {
                self.mode = Mode::General(Flavor::Operator);
                Ok(())
            }
            ListKey::Command(command) => self.run_provider_command(&command),
            ListKey::Data(data) => {
                let command = pending.ok_or(EngineError::NotApplicable("no command waiting for a choice"))?;
                let session = self
                    .registry
                    .active_mut(&self.cursor)
                    .ok_or_else(|| EngineError::ProviderUnavailable("no provider mounted".to_string()))?;
                let (provider, location) = session.parts_mut();
                provider.execute_command(location.as_str(), &command, &data)?;
                info!("Executed '{command}' at {location}");
                Ok(())
            }
            ListKey::Path(_) | ListKey::Location(_) => Err(EngineError::NotApplicable("not a command")),
        }
    }

    fn run_provider_command(&mut self, command: &str) -> Result<()> {
        if !self.in_provider_subtree(&self.cursor) {
            return Err(EngineError::ProviderUnavailable("commands run inside a provider".to_string()));
        }
        let label = self.current_node().map(|node| node.text().to_string()).unwrap_or_default();
        let kind = self.current_kind();
        let session = self
            .registry
            .active_mut(&self.cursor)
            .ok_or_else(|| EngineError::ProviderUnavailable("no provider mounted".to_string()))?;
        let (provider, location) = session.parts_mut();
        let outcome = provider.handle_command(location.as_str(), command, &label, kind)?;
        debug!("Command '{command}' at {location} gave {outcome:?}");

        match outcome {
            CommandOutcome::Created(node) => self.insert_created(node),
            CommandOutcome::NeedsSelection => {
                let items: Vec<ListItem> = provider
                    .get_command_list_items(location.as_str(), command)
                    .into_iter()
                    .map(|item| ListItem::new(ListKey::Data(item.data), item.label))
                    .collect();
                if items.is_empty() {
                    return Err(EngineError::Provider(format!("Nothing to choose for '{command}'")));
                }
                self.open_overlay(Mode::RunCommand)?;
                self.pending_command = Some(command.to_string());
                self.overlay.rebuild(items);
                Ok(())
            }
            CommandOutcome::Completed => self.refresh_layer(),
            CommandOutcome::Failed(text) => Err(EngineError::Provider(text)),
        }
    }

    /// Splice a provider-created node in after the cursor and open its
    /// editable field; the provider sees the name when the buffer is committed
    fn insert_created(&mut self, node: Node) -> Result<()> {
        let previous = self.begin();
        let target = match tree::node_at(&self.tree, &previous) {
            Some(_) => previous.with_last(previous.last().unwrap_or_default() + 1),
            None => previous.with_last(0),
        };
        self.guard_mounts(&target)?;
        let text = Marker::Input.extract(node.text()).unwrap_or_default().to_string();
        tree::insert(&mut self.tree, &target, node)?;
        self.cursor = target;
        let flavor = self.mode.flavor().unwrap_or_default();
        self.open_buffer(text, flavor);
        Ok(())
    }
}
