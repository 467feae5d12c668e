//! Search and command overlay
//!
//! Keeps a full listing of keyed display entries and a filtered view over it.
//! The filter is a case-sensitive substring match on display text.

use crate::tree::Path;

/// What selecting a listing entry refers to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListKey {
    /// A node in the cached tree
    Path(Path),
    /// A provider location reached through deep search
    Location(String),
    /// An engine or provider command
    Command(String),
    /// Opaque data of a command picker item
    Data(String),
}

/// One row of the overlay
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    pub key: ListKey,
    /// Text the filter matches against
    pub label: String,
    /// Secondary text such as a breadcrumb
    pub detail: Option<String>,
    pub is_group: bool,
}

impl ListItem {
    #[must_use]
    pub fn new(key: ListKey, label: impl Into<String>) -> Self {
        Self {
            key,
            label: label.into(),
            detail: None,
            is_group: false,
        }
    }

    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    #[must_use]
    pub const fn group(mut self, is_group: bool) -> Self {
        self.is_group = is_group;
        self
    }
}

/// Full and filtered listings with a clamped selection
#[derive(Debug, Clone, Default)]
pub struct Overlay {
    items: Vec<ListItem>,
    filtered: Vec<usize>,
    query: String,
    selected: usize,
}

impl Overlay {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the full listing; the current query is re-applied and the
    /// selection returns to the first entry
    pub fn rebuild(&mut self, items: Vec<ListItem>) {
        self.items = items;
        self.refilter();
        self.selected = 0;
    }

    /// Change the search text and recompute the filtered listing
    pub fn set_query(&mut self, query: &str) {
        query.clone_into(&mut self.query);
        self.refilter();
        self.clamp();
    }

    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    fn refilter(&mut self) {
        self.filtered = if self.query.is_empty() {
            Vec::new()
        } else {
            self.items
                .iter()
                .enumerate()
                .filter(|(_, item)| item.label.contains(self.query.as_str()))
                .map(|(i, _)| i)
                .collect()
        };
    }

    fn clamp(&mut self) {
        let len = self.visible_len();
        self.selected = self.selected.min(len.saturating_sub(1));
    }

    #[must_use]
    pub fn items(&self) -> &[ListItem] {
        &self.items
    }

    /// Entries matching the query, empty when no query is set or nothing matches
    pub fn filtered(&self) -> impl Iterator<Item = &ListItem> {
        self.filtered.iter().filter_map(|&i| self.items.get(i))
    }

    /// The listing the selection applies to: filtered when non-empty, else full
    #[must_use]
    pub fn visible(&self) -> Vec<&ListItem> {
        if self.filtered.is_empty() {
            self.items.iter().collect()
        } else {
            self.filtered().collect()
        }
    }

    fn visible_len(&self) -> usize {
        if self.filtered.is_empty() {
            self.items.len()
        } else {
            self.filtered.len()
        }
    }

    #[must_use]
    pub const fn selected_index(&self) -> usize {
        self.selected
    }

    /// Currently selected entry
    #[must_use]
    pub fn selected(&self) -> Option<&ListItem> {
        if self.filtered.is_empty() {
            self.items.get(self.selected)
        } else {
            self.items.get(*self.filtered.get(self.selected)?)
        }
    }

    /// Select `index`, clamped to the visible listing
    pub fn select(&mut self, index: usize) {
        self.selected = index;
        self.clamp();
    }

    pub fn select_next(&mut self) {
        self.select(self.selected + 1);
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Drop every entry and the query
    pub fn clear(&mut self) {
        self.items.clear();
        self.filtered.clear();
        self.query.clear();
        self.selected = 0;
    }
}
