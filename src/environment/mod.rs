//! The environment under test.
//!
//! An [`Environment`] is a read-only, possibly nested mapping from names to
//! [`Value`]s. It is supplied by the caller (or loaded from a manifest) and
//! shared with every probe.
//!
//! # Example
//!
//! ```
//! use capcheck::environment::{Environment, Value};
//!
//! let env = Environment::new(Value::map([
//!     ("fs", Value::map([("read", Value::callable("read"))])),
//! ]));
//! assert!(env.contains("fs.read"));
//! assert!(env.resolve("fs.write").is_none());
//! ```

pub mod resolver;
pub mod value;

pub use resolver::{resolve, split_path};
pub use value::{Opaque, Value, ValueCategory};

use std::path::Path;

use crate::error::{CapcheckError, Result};

/// A nested name -> value mapping probed by the harness.
#[derive(Debug, Clone, PartialEq)]
pub struct Environment {
    root: Option<Value>,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new(Value::Map(Default::default()))
    }
}

impl Environment {
    /// Wrap a root value.
    pub fn new(root: Value) -> Self {
        Self { root: Some(root) }
    }

    /// An environment with no root at all. Every lookup misses.
    pub fn unavailable() -> Self {
        Self { root: None }
    }

    /// The root value, if any.
    pub fn root(&self) -> Option<&Value> {
        self.root.as_ref()
    }

    /// Resolve a dotted path.
    pub fn resolve(&self, path: &str) -> Option<&Value> {
        resolve(self.root.as_ref(), path)
    }

    /// Whether a dotted path resolves.
    pub fn contains(&self, path: &str) -> bool {
        self.resolve(path).is_some()
    }

    /// Parse an environment from YAML (or JSON) text.
    pub fn from_yaml_str(content: &str) -> std::result::Result<Self, String> {
        let yaml: serde_yaml::Value = serde_yaml::from_str(content).map_err(|e| e.to_string())?;
        Value::from_yaml(yaml).map(Self::new)
    }

    /// Load an environment file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CapcheckError::ManifestNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content).map_err(|message| CapcheckError::ManifestParseError {
            path: path.to_path_buf(),
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn default_environment_is_an_empty_map() {
        let env = Environment::default();
        assert!(env.contains(""));
        assert!(!env.contains("anything"));
    }

    #[test]
    fn unavailable_environment_resolves_nothing() {
        let env = Environment::unavailable();
        assert!(env.root().is_none());
        assert!(!env.contains(""));
    }

    #[test]
    fn parses_json_text() {
        let env = Environment::from_yaml_str(r#"{"net": {"fetch": 1}}"#).unwrap();
        assert_eq!(env.resolve("net.fetch"), Some(&Value::Number(1.0)));
    }

    #[test]
    fn load_reads_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("env.yml");
        fs::write(&path, "crypto:\n  subtle: !handle\n").unwrap();
        let env = Environment::load(&path).unwrap();
        assert!(env.contains("crypto.subtle"));
    }

    #[test]
    fn load_missing_file_is_not_found() {
        let temp = TempDir::new().unwrap();
        let err = Environment::load(&temp.path().join("nope.yml")).unwrap_err();
        assert!(matches!(err, CapcheckError::ManifestNotFound { .. }));
    }

    #[test]
    fn load_invalid_yaml_is_parse_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("env.yml");
        fs::write(&path, "a: [unterminated").unwrap();
        let err = Environment::load(&path).unwrap_err();
        assert!(matches!(err, CapcheckError::ManifestParseError { .. }));
    }
}
