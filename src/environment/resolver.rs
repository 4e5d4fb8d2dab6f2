//! Dotted-path name resolution.
//!
//! A path such as `fs.promises.read` is resolved one segment at a time:
//! the first segment selects a field of the current map and the remainder
//! is resolved against that field. An empty remainder returns the current
//! node. Absence is a normal result, never an error.

use super::value::Value;

/// Split a path into its first segment and the remainder.
///
/// ```
/// use capcheck::environment::split_path;
///
/// assert_eq!(split_path("a.b.c"), ("a", "b.c"));
/// assert_eq!(split_path("a"), ("a", ""));
/// ```
pub fn split_path(path: &str) -> (&str, &str) {
    path.split_once('.').unwrap_or((path, ""))
}

/// Resolve `path` starting at `node`.
///
/// Returns `None` when the root is absent, a segment is missing, or an
/// intermediate value is not a map.
pub fn resolve<'a>(node: Option<&'a Value>, path: &str) -> Option<&'a Value> {
    let node = node?;
    if path.is_empty() {
        return Some(node);
    }

    let (head, rest) = split_path(path);
    match node {
        Value::Map(fields) => resolve(fields.get(head), rest),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Value {
        Value::map([
            (
                "fs",
                Value::map([
                    ("read", Value::callable("read")),
                    ("promises", Value::map([("open", Value::callable("open"))])),
                ]),
            ),
            ("version", Value::Text("1.2".into())),
        ])
    }

    #[test]
    fn empty_path_returns_current_node() {
        let root = sample();
        assert_eq!(resolve(Some(&root), ""), Some(&root));
    }

    #[test]
    fn absent_root_is_not_found() {
        assert_eq!(resolve(None, ""), None);
        assert_eq!(resolve(None, "fs"), None);
    }

    #[test]
    fn resolves_nested_paths() {
        let root = sample();
        let open = resolve(Some(&root), "fs.promises.open").unwrap();
        assert_eq!(open.category(), crate::environment::ValueCategory::Callable);
    }

    #[test]
    fn missing_segment_is_not_found() {
        let root = sample();
        assert!(resolve(Some(&root), "fs.write").is_none());
        assert!(resolve(Some(&root), "net").is_none());
    }

    #[test]
    fn non_map_intermediate_is_not_found() {
        let root = sample();
        assert!(resolve(Some(&root), "version.major").is_none());
        assert!(resolve(Some(&root), "fs.read.call").is_none());
    }

    #[test]
    fn prefix_then_suffix_matches_direct_resolution() {
        let root = sample();
        for path in ["fs.promises.open", "fs.read", "fs.nope.x", "version.major"] {
            let direct = resolve(Some(&root), path);
            for (i, _) in path.match_indices('.') {
                let (prefix, suffix) = (&path[..i], &path[i + 1..]);
                let stepped = resolve(resolve(Some(&root), prefix), suffix);
                assert_eq!(stepped, direct, "decomposing {} at {}", path, i);
            }
        }
    }

    #[test]
    fn trailing_dot_resolves_to_the_prefix() {
        let root = sample();
        assert_eq!(resolve(Some(&root), "fs."), resolve(Some(&root), "fs"));
    }
}
