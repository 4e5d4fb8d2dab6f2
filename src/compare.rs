//! Shallow structural equality with opaque-type leniency.
//!
//! Probes often rebuild a structure (serialize and reparse it, clone it
//! through a host API) and need to check that the copy is equivalent to the
//! original. Plain fields must match exactly; opaque fields (callables,
//! handles, tasks, nested composites) only need to match in kind, since a
//! regenerated structure carries fresh instances of them.
//!
//! # Example
//!
//! ```
//! use capcheck::compare::shallow_equal;
//! use capcheck::environment::Value;
//!
//! let a = Value::map([("n", Value::Number(1.0)), ("f", Value::callable("f"))]);
//! let b = Value::map([("n", Value::Number(1.0)), ("f", Value::callable("f"))]);
//! assert!(shallow_equal(&a, &b));
//! ```

use std::collections::BTreeMap;

use crate::environment::Value;

/// Compare two values shallowly.
///
/// Maps are compared field by field in both directions, lists element by
/// element. Any other pair is
/// compared as a single field would be: exact equality for plain values,
/// category equality for opaque ones.
pub fn shallow_equal(a: &Value, b: &Value) -> bool {
    if std::ptr::eq(a, b) {
        return true;
    }

    match (a, b) {
        (Value::Map(left), Value::Map(right)) => {
            fields_covered(left, right) && fields_covered(right, left)
        }
        (Value::List(left), Value::List(right)) => {
            left.len() == right.len()
                && left
                    .iter()
                    .zip(right)
                    .all(|(l, r)| field_equal(l, r) && field_equal(r, l))
        }
        _ => field_equal(a, b),
    }
}

/// Every field of `from` has a matching field in `to`.
fn fields_covered(from: &BTreeMap<String, Value>, to: &BTreeMap<String, Value>) -> bool {
    from.iter().all(|(name, value)| match to.get(name) {
        Some(other) => field_equal(value, other),
        None => false,
    })
}

fn field_equal(a: &Value, b: &Value) -> bool {
    let category = a.category();
    if category.is_opaque() {
        category == b.category()
    } else {
        a == b
    }
}
