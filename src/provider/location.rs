//! Current-location bookkeeping for a provider session

use std::fmt;

const SEPARATOR: char = '/';

/// A slash-separated location string
///
/// Every push made while descending must be matched by a pop when ascending.
///
/// # Examples
/// ```
/// use compass::provider::Location;
///
/// let mut location = Location::new("/");
/// location.push("home/");
/// location.push("user");
/// assert_eq!(location.as_str(), "/home/user");
/// location.pop();
/// location.pop();
/// assert_eq!(location.as_str(), "/");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    value: String,
}

impl Location {
    #[must_use]
    pub fn new(root: impl Into<String>) -> Self {
        Self { value: root.into() }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Descend into `segment`
    pub fn push(&mut self, segment: &str) {
        if !self.value.ends_with(SEPARATOR) {
            self.value.push(SEPARATOR);
        }
        self.value
            .push_str(segment.strip_suffix(SEPARATOR).unwrap_or(segment));
    }

    /// Ascend one level, never above the root separator
    pub fn pop(&mut self) {
        match self.value.rfind(SEPARATOR) {
            Some(0) | None => self.value = SEPARATOR.to_string(),
            Some(at) => self.value.truncate(at),
        }
    }

    /// Replace the location outright
    pub fn set(&mut self, location: impl Into<String>) {
        self.value = location.into();
    }

    /// Location of `name` inside this one
    #[must_use]
    pub fn join(&self, name: &str) -> String {
        let mut child = self.clone();
        child.push(name);
        child.value
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_adds_separator_once() {
        let mut location = Location::new("/tmp/");
        location.push("a");
        assert_eq!(location.as_str(), "/tmp/a");
    }

    #[test]
    fn test_pop_keeps_root() {
        let mut location = Location::new("/a");
        location.pop();
        assert_eq!(location.as_str(), "/");
        location.pop();
        assert_eq!(location.as_str(), "/");
    }

    #[test]
    fn test_push_pop_balance() {
        let mut location = Location::new("/srv");
        let start = location.clone();
        for segment in ["x", "y/", "z"] {
            location.push(segment);
        }
        assert_eq!(location.as_str(), "/srv/x/y/z");
        for _ in 0..3 {
            location.pop();
        }
        assert_eq!(location, start);
    }

    #[test]
    fn test_join_does_not_mutate() {
        let location = Location::new("/srv");
        assert_eq!(location.join("data"), "/srv/data");
        assert_eq!(location.as_str(), "/srv");
    }
}
