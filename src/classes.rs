//! CSS class-list handling
//!
//! Pages are rendered from scratch on every request, so class lists are
//! plain values rather than live DOM state. `ClassSet` keeps the two
//! invariants that matter: names are unique, and order carries no meaning.

use std::collections::BTreeSet;

/// A set of CSS class names.
///
/// Rendering is deterministic (names come out sorted), which keeps
/// generated markup stable across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassSet {
    names: BTreeSet<String>,
}

impl ClassSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a `class` attribute value. Empty and repeated names collapse.
    pub fn parse(attribute: &str) -> Self {
        let mut set = Self::new();
        for name in attribute.split_whitespace() {
            set.add(name);
        }
        set
    }

    pub fn add(&mut self, name: &str) {
        if !name.is_empty() {
            self.names.insert(name.to_string());
        }
    }

    pub fn remove(&mut self, name: &str) {
        self.names.remove(name);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn toggle(&mut self, name: &str) {
        if self.contains(name) {
            self.remove(name);
        } else {
            self.add(name);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(|s| s.as_str())
    }

    /// Render as a `class` attribute value.
    pub fn render(&self) -> String {
        let names: Vec<&str> = self.names.iter().map(|s| s.as_str()).collect();
        names.join(" ")
    }
}
