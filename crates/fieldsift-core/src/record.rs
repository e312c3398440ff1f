//! Field access on records.
//!
//! Conditions name their field with a dotted path (`"address.city"`). The
//! [`Record`] trait resolves such a path one segment at a time. Below the
//! top level, numeric segments index into arrays (`"skills.0"`). A missing
//! segment or a `null` anywhere along the way resolves to `None`, which each
//! field type then treats as "undefined".

use serde_json::{Map, Value};

/// A structured entity the matching engine can read fields from.
///
/// Implementors only provide top-level lookup; nested segments are walked by
/// [`resolve`](Record::resolve) through the returned JSON value.
///
/// # Manual Implementation
///
/// ```
/// use fieldsift_core::Record;
/// use serde_json::{json, Value};
///
/// struct Employee {
///     name: Value,
///     address: Value,
/// }
///
/// impl Record for Employee {
///     fn top_level(&self, key: &str) -> Option<&Value> {
///         match key {
///             "name" => Some(&self.name),
///             "address" => Some(&self.address),
///             _ => None,
///         }
///     }
/// }
///
/// let ann = Employee {
///     name: json!("Ann"),
///     address: json!({"city": "Lisbon"}),
/// };
/// assert_eq!(ann.resolve("address.city"), Some(&json!("Lisbon")));
/// assert_eq!(ann.resolve("address.zip"), None);
/// ```
pub trait Record {
    /// Returns the value stored under a top-level key.
    fn top_level(&self, key: &str) -> Option<&Value>;

    /// Resolves a dotted path. Returns `None` if any segment is absent or
    /// `null`.
    fn resolve(&self, path: &str) -> Option<&Value> {
        let (head, rest) = split_path(path);
        let root = non_null(self.top_level(head)?)?;
        match rest {
            Some(rest) => descend(root, rest),
            None => Some(root),
        }
    }
}

fn split_path(path: &str) -> (&str, Option<&str>) {
    match path.split_once('.') {
        Some((head, rest)) => (head, Some(rest)),
        None => (path, None),
    }
}

fn non_null(value: &Value) -> Option<&Value> {
    if value.is_null() {
        None
    } else {
        Some(value)
    }
}

fn step<'a>(current: &'a Value, segment: &str) -> Option<&'a Value> {
    match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => items.get(segment.parse::<usize>().ok()?),
        _ => None,
    }
}

fn descend<'a>(current: &'a Value, path: &str) -> Option<&'a Value> {
    let (head, rest) = split_path(path);
    let next = non_null(step(current, head)?)?;
    match rest {
        Some(rest) => descend(next, rest),
        None => Some(next),
    }
}

impl Record for Value {
    fn top_level(&self, key: &str) -> Option<&Value> {
        self.as_object()?.get(key)
    }
}

impl Record for Map<String, Value> {
    fn top_level(&self, key: &str) -> Option<&Value> {
        self.get(key)
    }
}

impl<R: Record + ?Sized> Record for &R {
    fn top_level(&self, key: &str) -> Option<&Value> {
        (**self).top_level(key)
    }
}
