//! Cursor movement, lazy expansion of provider groups, and radio selection

use tracing::{debug, info};

use super::transition::advance;
use super::{Engine, EngineError, Result, Task};
use crate::provider::filesystem::CMD_OPEN;
use crate::provider::{ItemKind, Location};
use crate::tags::{self, Marker};
use crate::tree::{self, Node, Path};

impl Engine {
    pub(super) fn move_vertical(&mut self, task: Task) -> Result<()> {
        let previous = self.begin();
        self.cursor = advance(task, self.addressed(&previous), &previous)?;
        Ok(())
    }

    /// Leave the current layer for its parent group
    ///
    /// Landing on a group below a mount root pops the session location pushed
    /// when that group was entered.
    pub(super) fn move_left(&mut self) -> Result<()> {
        let previous = self.begin();
        if previous.depth() <= 1 {
            return Err(EngineError::NotApplicable("already at the top layer"));
        }
        let current = advance(Task::Left, self.addressed(&previous), &previous)?;
        if current.depth() >= 2 {
            if let Some(session) = self.registry.active_mut(&current) {
                session.location_mut().pop();
                debug!("Location of '{}' is now {}", session.name(), session.location());
            }
        }
        self.cursor = current;
        Ok(())
    }

    /// Enter the group under the cursor
    ///
    /// A provider group with no children is fetched first; a radio group is
    /// validated before the cursor moves. On failure the location and the
    /// tree are left as they were.
    pub(super) fn move_right(&mut self) -> Result<()> {
        let previous = self.begin();
        let node = tree::node_at(&self.tree, &previous).ok_or(EngineError::NotApplicable("nothing selected"))?;
        let Some(children) = node.children() else {
            return Err(EngineError::NotApplicable("not a group"));
        };
        let unexpanded = children.is_empty();
        let is_radio = Marker::Radio.has(node.text());
        let segment = tags::segment(node.text());

        let mounted = self.registry.active(&previous).is_some();
        let descends = mounted && previous.depth() >= 2;
        let current = advance(Task::Right, self.addressed(&previous), &previous)?;

        if descends {
            self.shift_location(&previous, |location| location.push(&segment));
        }
        if let Err(error) = self.populate(&previous, mounted && unexpanded, is_radio) {
            if descends {
                self.shift_location(&previous, Location::pop);
            }
            return Err(error);
        }
        self.cursor = current;
        Ok(())
    }

    fn shift_location(&mut self, path: &Path, shift: impl FnOnce(&mut Location)) {
        if let Some(session) = self.registry.active_mut(path) {
            shift(session.location_mut());
        }
    }

    /// Fetch (when asked) and validate the children of the group at `group`,
    /// storing them only once every check passed
    fn populate(&mut self, group: &Path, fetch: bool, is_radio: bool) -> Result<()> {
        let fetched = if fetch { Some(self.fetch_children(group)?) } else { None };
        if is_radio {
            let children = match &fetched {
                Some(children) => children.as_slice(),
                None => tree::node_at(&self.tree, group)
                    .and_then(Node::children)
                    .unwrap_or_default(),
            };
            tags::validate_radio(children)?;
        }
        if let Some(children) = fetched {
            self.store_children(group, children)?;
        }
        Ok(())
    }

    /// Ask the session mounted over `path` for the children at its location
    fn fetch_children(&mut self, path: &Path) -> Result<Vec<Node>> {
        let session = self
            .registry
            .active_mut(path)
            .ok_or_else(|| EngineError::ProviderUnavailable("no provider mounted".to_string()))?;
        let (provider, location) = session.parts_mut();
        let mut children = provider.fetch(location.as_str())?;
        debug!("Fetched {} node(s) from '{}' at {location}", children.len(), provider.name());
        if children.is_empty() {
            children.push(Node::leaf(Marker::Input.format("")));
        }
        Ok(children)
    }

    fn store_children(&mut self, group: &Path, children: Vec<Node>) -> Result<()> {
        let slot = tree::node_at_mut(&mut self.tree, group)
            .and_then(Node::children_mut)
            .ok_or(EngineError::NotApplicable("not a group"))?;
        *slot = children;
        Ok(())
    }

    /// Re-fetch the layer the cursor is in, keeping the cursor in range
    pub(super) fn refresh_layer(&mut self) -> Result<()> {
        if !self.in_provider_subtree(&self.cursor) {
            return Err(EngineError::NotApplicable("layer has no provider"));
        }
        let group = self.cursor.parent();
        let is_radio = tree::node_at(&self.tree, &group).is_some_and(|node| Marker::Radio.has(node.text()));
        self.populate(&group, true, is_radio)?;

        let max = tree::max_sibling_index(&self.tree, &self.cursor).unwrap_or_default();
        let last = self.cursor.last().unwrap_or_default();
        self.cursor.set_last(last.min(max));
        Ok(())
    }

    /// Operator enter on a leaf: open the item through its provider
    pub(super) fn open_current(&mut self) -> Result<()> {
        let path = self.begin();
        if !self.in_provider_subtree(&path) {
            return Err(EngineError::NotApplicable("nothing to open"));
        }
        let node = tree::node_at(&self.tree, &path).ok_or(EngineError::NotApplicable("nothing selected"))?;
        let target = Marker::Link
            .extract(node.text())
            .map_or_else(|| tags::segment(node.text()), str::to_string);

        let session = self
            .registry
            .active_mut(&path)
            .ok_or_else(|| EngineError::ProviderUnavailable("no provider mounted".to_string()))?;
        let (provider, location) = session.parts_mut();
        provider.execute_command(location.as_str(), CMD_OPEN, &target)?;
        info!("Opened '{target}' from {location}");
        Ok(())
    }

    /// Check the option under the cursor and uncheck its siblings, then tell
    /// the provider; the tree is restored if the provider rejects the change
    pub(super) fn select_radio(&mut self) -> Result<()> {
        let previous = self.begin();
        let group = previous.parent();
        let index = previous.last().unwrap_or_default();
        let group_node = tree::node_at(&self.tree, &group).ok_or(EngineError::NotApplicable("not in a radio group"))?;
        let label = tags::strip_for_display(group_node.text());
        let original = group_node.children().unwrap_or_default().to_vec();

        let mut children = original.clone();
        let value = tags::select_radio(&mut children, index).ok_or(EngineError::NotApplicable("not an option"))?;
        self.store_children(&group, children)?;

        if !self.in_provider_subtree(&previous) {
            return Ok(());
        }
        let Some(session) = self.registry.active_mut(&previous) else {
            return Ok(());
        };
        match session.provider_mut().on_radio_change(&label, &value) {
            Ok(()) => {
                debug!("Radio '{label}' set to '{value}'");
                Ok(())
            }
            Err(error) if error.is_unsupported() => Ok(()),
            Err(error) => {
                self.store_children(&group, original)?;
                Err(error.into())
            }
        }
    }

    /// Jump to a deep-search hit at `location` inside the cursor's provider
    ///
    /// The session is re-anchored at the hit's parent, the mount root is
    /// re-fetched from there, and the cursor lands on the hit.
    /// Later location syncs start from that anchor.
    pub(super) fn teleport(&mut self, location: &str) -> Result<()> {
        let mount = Path::from([self.cursor.first().unwrap_or_default()]);
        let (parent, name) = match location.rsplit_once('/') {
            Some(("", name)) => ("/", name),
            Some((parent, name)) => (parent, name),
            None => return Err(EngineError::NotApplicable("not a provider location")),
        };
        let session = self
            .registry
            .active_mut(&mount)
            .ok_or_else(|| EngineError::ProviderUnavailable("no provider mounted".to_string()))?;
        let saved = session.location().clone();
        let previous_base = session.rebase(parent);

        let children = match self.fetch_children(&mount) {
            Ok(children) => children,
            Err(error) => {
                if let Some(session) = self.registry.active_mut(&mount) {
                    session.rebase(previous_base.as_str());
                    *session.location_mut() = saved;
                }
                return Err(error);
            }
        };
        let index = children
            .iter()
            .position(|node| tags::segment(node.text()) == name)
            .unwrap_or_default();
        self.store_children(&mount, children)?;
        let mut cursor = mount;
        cursor.push(index)?;
        self.cursor = cursor;
        info!("Teleported to {location}");
        Ok(())
    }

    /// Recompute the session location from the cursor path after a jump that
    /// bypassed left/right navigation, starting from the session's base
    pub(super) fn sync_location(&mut self) {
        let segments: Vec<String> = (2..self.cursor.depth())
            .filter_map(|depth| {
                let prefix = Path::from_slice(&self.cursor.as_slice()[..depth]).ok()?;
                tree::node_at(&self.tree, &prefix).map(|node| tags::segment(node.text()))
            })
            .collect();
        if let Some(session) = self.registry.active_mut(&self.cursor) {
            session.reset_location();
            for segment in &segments {
                session.location_mut().push(segment);
            }
            debug!("Location of '{}' synced to {}", session.name(), session.location());
        }
    }

    /// Kind of the node under the cursor, for provider commands
    pub(super) fn current_kind(&self) -> ItemKind {
        self.current_node().map_or(ItemKind::Leaf, ItemKind::from)
    }
}
