//! Per-capability compatibility flags.

use std::collections::BTreeMap;

use serde::Serialize;

/// Capability name -> whether its probe passed.
///
/// Declaring a name twice is harmless; it stays a single entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CompatibilityFlags {
    flags: BTreeMap<String, bool>,
}

impl CompatibilityFlags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a name with an initial `false`, keeping any existing value.
    pub fn declare(&mut self, name: &str) {
        self.flags.entry(name.to_string()).or_insert(false);
    }

    /// Mark a capability as compatible.
    pub fn set(&mut self, name: &str) {
        self.flags.insert(name.to_string(), true);
    }

    /// Flag value; undeclared names read as `false`.
    pub fn get(&self, name: &str) -> bool {
        self.flags.get(name).copied().unwrap_or(false)
    }

    pub fn is_declared(&self, name: &str) -> bool {
        self.flags.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.flags.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}
