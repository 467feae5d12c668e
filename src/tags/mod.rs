//! Inline marker conventions embedded in labels
//!
//! Providers annotate labels with literal markers that change how the engine
//! treats a node:
//!
//! - **Input** (`<input>name</input>`): the wrapped text is an editable field
//!   backed by the provider.
//! - **Radio** (`<radio>label`): the group is a single-choice selection.
//! - **Checked** (`<checked>value`): the option selected in a radio group.
//! - **Link** (`<link>target</link>`): the leaf refers to another location.
//!
//! Radio and checked are prefix markers: their closing literal is optional.

pub mod error;

pub use error::TagError;

use crate::tree::Node;

/// The four marker kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Marker {
    Input,
    Radio,
    Checked,
    Link,
}

impl Marker {
    /// Markers tried by [`strip_for_display`], in priority order
    pub const DISPLAY_PRIORITY: [Self; 3] = [Self::Input, Self::Radio, Self::Checked];

    #[must_use]
    pub const fn open(self) -> &'static str {
        match self {
            Self::Input => "<input>",
            Self::Radio => "<radio>",
            Self::Checked => "<checked>",
            Self::Link => "<link>",
        }
    }

    #[must_use]
    pub const fn close(self) -> &'static str {
        match self {
            Self::Input => "</input>",
            Self::Radio => "</radio>",
            Self::Checked => "</checked>",
            Self::Link => "</link>",
        }
    }

    /// Whether presence requires the closing literal as well
    #[must_use]
    pub const fn requires_close(self) -> bool {
        matches!(self, Self::Input | Self::Link)
    }

    /// Whether `text` carries this marker
    ///
    /// # Examples
    /// ```
    /// use compass::tags::Marker;
    ///
    /// assert!(Marker::Input.has("<input>notes.txt</input>"));
    /// assert!(!Marker::Input.has("<input>unterminated"));
    /// assert!(Marker::Checked.has("<checked>dark"));
    /// ```
    #[must_use]
    pub fn has(self, text: &str) -> bool {
        text.contains(self.open()) && (!self.requires_close() || text.contains(self.close()))
    }

    /// Text strictly between the first open literal and the following close
    /// literal, or to the end of `text` for prefix markers without a close
    #[must_use]
    pub fn extract(self, text: &str) -> Option<&str> {
        let start = text.find(self.open())? + self.open().len();
        let rest = &text[start..];
        match rest.find(self.close()) {
            Some(end) => Some(&rest[..end]),
            None if self.requires_close() => None,
            None => Some(rest),
        }
    }

    /// Wrap `content` in this marker
    ///
    /// # Examples
    /// ```
    /// use compass::tags::Marker;
    ///
    /// assert_eq!(Marker::Input.format("a.txt"), "<input>a.txt</input>");
    /// assert_eq!(Marker::Checked.format("dark"), "<checked>dark");
    /// ```
    #[must_use]
    pub fn format(self, content: &str) -> String {
        if self.requires_close() {
            format!("{}{content}{}", self.open(), self.close())
        } else {
            format!("{}{content}", self.open())
        }
    }

    /// Replace the marker's content inside `text`, keeping everything outside it
    #[must_use]
    pub fn replace_content(self, text: &str, content: &str) -> String {
        let Some(open_at) = text.find(self.open()) else {
            return self.format(content);
        };
        let start = open_at + self.open().len();
        let end = text[start..]
            .find(self.close())
            .map_or(text.len(), |offset| start + offset);
        format!("{}{content}{}", &text[..start], &text[end..])
    }

    /// Remove one occurrence of this marker, keeping the text around and inside it
    fn strip_once(self, text: &str) -> Option<String> {
        let open_at = text.find(self.open())?;
        let before = &text[..open_at];
        let rest = &text[open_at + self.open().len()..];
        match rest.find(self.close()) {
            Some(end) => Some(format!(
                "{before}{}{}",
                &rest[..end],
                &rest[end + self.close().len()..]
            )),
            None => Some(format!("{before}{rest}")),
        }
    }
}

/// Label text with display markers removed
///
/// Input, radio and checked markers are removed in that priority, repeatedly,
/// until none remains. Text without markers is returned unchanged.
///
/// # Examples
/// ```
/// use compass::tags::strip_for_display;
///
/// assert_eq!(strip_for_display("rw- <input>a.txt</input>"), "rw- a.txt");
/// assert_eq!(strip_for_display("<checked>dark"), "dark");
/// assert_eq!(strip_for_display("plain"), "plain");
/// ```
#[must_use]
pub fn strip_for_display(text: &str) -> String {
    let mut current = text.to_string();
    while let Some(stripped) = Marker::DISPLAY_PRIORITY
        .iter()
        .find_map(|marker| marker.strip_once(&current))
    {
        current = stripped;
    }
    current
}

/// Editable-field content of a label, falling back to its display text
#[must_use]
pub fn segment(text: &str) -> String {
    Marker::Input
        .extract(text)
        .map_or_else(|| strip_for_display(text), str::to_string)
}

/// Check the radio-group rules against freshly populated children
///
/// # Errors
///
/// Returns `TagError::NonLeafChild` if any child is a group, or
/// `TagError::MultipleChecked` if more than one child is checked.
pub fn validate_radio(children: &[Node]) -> Result<(), TagError> {
    let mut checked = 0;
    for child in children {
        match child {
            Node::Group { .. } => return Err(TagError::NonLeafChild),
            Node::Leaf(text) if Marker::Checked.has(text) => checked += 1,
            Node::Leaf(_) => {}
        }
    }
    if checked > 1 {
        return Err(TagError::MultipleChecked);
    }
    Ok(())
}

/// Move the checked marker onto `selected`, clearing it from every sibling
///
/// Returns the display value of the newly selected option, or `None` if
/// `selected` is out of range or not a leaf.
pub fn select_radio(children: &mut [Node], selected: usize) -> Option<String> {
    if !matches!(children.get(selected), Some(Node::Leaf(_))) {
        return None;
    }
    let mut value = None;
    for (i, child) in children.iter_mut().enumerate() {
        let Node::Leaf(text) = child else { continue };
        let bare = Marker::Checked
            .strip_once(text)
            .unwrap_or_else(|| text.clone());
        if i == selected {
            value = Some(strip_for_display(&bare));
            *text = Marker::Checked.format(&bare);
        } else {
            *text = bare;
        }
    }
    value
}
