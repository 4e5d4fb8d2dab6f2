//! Values held by an environment under test.
//!
//! Plain values (`null`, booleans, numbers, text) carry data that can be
//! compared exactly. Opaque values (callables, handles, tasks) stand in for
//! host objects whose identity is meaningful only to the host; each one gets
//! a process-unique id when it is created.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

static NEXT_OPAQUE_ID: AtomicU64 = AtomicU64::new(1);

/// A reference-typed value whose internals are not inspected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opaque {
    id: u64,
    label: String,
}

impl Opaque {
    /// Create a fresh opaque value. No two calls return the same id.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            id: NEXT_OPAQUE_ID.fetch_add(1, Ordering::Relaxed),
            label: label.into(),
        }
    }

    /// Process-unique identity of this value.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Human-readable label (may be empty).
    pub fn label(&self) -> &str {
        &self.label
    }
}

/// A value reachable in an [`Environment`](super::Environment).
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
    Callable(Opaque),
    Handle(Opaque),
    Task(Opaque),
}

/// The kind of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueCategory {
    Null,
    Bool,
    Number,
    Text,
    List,
    Map,
    Callable,
    Handle,
    Task,
}

impl ValueCategory {
    /// Whether values of this category are compared by kind only.
    ///
    /// Composite values (lists, maps) count as opaque alongside callables,
    /// handles and tasks.
    pub fn is_opaque(self) -> bool {
        !self.is_plain()
    }

    /// Whether values of this category are compared by exact value.
    pub fn is_plain(self) -> bool {
        matches!(self, Self::Null | Self::Bool | Self::Number | Self::Text)
    }

    /// Lowercase name as used in manifests.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool => "bool",
            Self::Number => "number",
            Self::Text => "text",
            Self::List => "list",
            Self::Map => "map",
            Self::Callable => "callable",
            Self::Handle => "handle",
            Self::Task => "task",
        }
    }
}

impl fmt::Display for ValueCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValueCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "null" => Ok(Self::Null),
            "bool" | "boolean" => Ok(Self::Bool),
            "number" => Ok(Self::Number),
            "text" | "string" => Ok(Self::Text),
            "list" => Ok(Self::List),
            "map" => Ok(Self::Map),
            "callable" | "function" => Ok(Self::Callable),
            "handle" => Ok(Self::Handle),
            "task" => Ok(Self::Task),
            _ => Err(format!("unknown value category: {}", s)),
        }
    }
}

impl Value {
    /// The category this value belongs to.
    pub fn category(&self) -> ValueCategory {
        match self {
            Self::Null => ValueCategory::Null,
            Self::Bool(_) => ValueCategory::Bool,
            Self::Number(_) => ValueCategory::Number,
            Self::Text(_) => ValueCategory::Text,
            Self::List(_) => ValueCategory::List,
            Self::Map(_) => ValueCategory::Map,
            Self::Callable(_) => ValueCategory::Callable,
            Self::Handle(_) => ValueCategory::Handle,
            Self::Task(_) => ValueCategory::Task,
        }
    }

    /// Borrow the fields of a map value.
    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Self::Map(fields) => Some(fields),
            _ => None,
        }
    }

    /// Shorthand for a fresh callable.
    pub fn callable(label: impl Into<String>) -> Self {
        Self::Callable(Opaque::new(label))
    }

    /// Shorthand for a fresh external handle.
    pub fn handle(label: impl Into<String>) -> Self {
        Self::Handle(Opaque::new(label))
    }

    /// Shorthand for a fresh unit of concurrent work.
    pub fn task(label: impl Into<String>) -> Self {
        Self::Task(Opaque::new(label))
    }

    /// Build a map value from `(name, value)` pairs.
    pub fn map<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Self::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Convert a parsed YAML document.
    ///
    /// The tags `!callable`, `!handle` and `!task` produce fresh opaque
    /// values; their payload, if it is a string, becomes the label.
    pub fn from_yaml(yaml: serde_yaml::Value) -> Result<Self, String> {
        use serde_yaml::Value as Yaml;

        Ok(match yaml {
            Yaml::Null => Self::Null,
            Yaml::Bool(b) => Self::Bool(b),
            Yaml::Number(n) => Self::Number(
                n.as_f64()
                    .ok_or_else(|| format!("number out of range: {}", n))?,
            ),
            Yaml::String(s) => Self::Text(s),
            Yaml::Sequence(items) => Self::List(
                items
                    .into_iter()
                    .map(Self::from_yaml)
                    .collect::<Result<_, _>>()?,
            ),
            Yaml::Mapping(mapping) => {
                let mut fields = BTreeMap::new();
                for (key, value) in mapping {
                    let key = match key {
                        Yaml::String(s) => s,
                        Yaml::Number(n) => n.to_string(),
                        Yaml::Bool(b) => b.to_string(),
                        other => return Err(format!("unsupported mapping key: {:?}", other)),
                    };
                    fields.insert(key, Self::from_yaml(value)?);
                }
                Self::Map(fields)
            }
            Yaml::Tagged(tagged) => {
                let tag = tagged.tag.to_string();
                let label = match tagged.value {
                    Yaml::String(s) => s,
                    _ => String::new(),
                };
                match tag.trim_start_matches('!') {
                    "callable" => Self::callable(label),
                    "handle" => Self::handle(label),
                    "task" => Self::task(label),
                    other => return Err(format!("unsupported tag: !{}", other)),
                }
            }
        })
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{}", b),
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => write!(f, "{:?}", s),
            Self::List(items) => write!(f, "[{} items]", items.len()),
            Self::Map(fields) => {
                let keys: Vec<_> = fields.keys().map(String::as_str).collect();
                write!(f, "{{{}}}", keys.join(", "))
            }
            Self::Callable(o) | Self::Handle(o) | Self::Task(o) => {
                if o.label.is_empty() {
                    write!(f, "<{}>", self.category())
                } else {
                    write!(f, "<{} {}>", self.category(), o.label)
                }
            }
        }
    }
}
