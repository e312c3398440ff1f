//! Sorting projected records for display.
//!
//! Provides [`Dir`] for sort direction and [`SortKey`] for field-based
//! ordering. Sorting never takes part in matching.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::record::Record;
use crate::value::compare_values;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dir {
    #[default]
    Asc,
    Desc,
}

impl Dir {
    /// Applies this direction to an ordering.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Dir::Asc => ordering,
            Dir::Desc => ordering.reverse(),
        }
    }

    /// Flips the direction, as a second click on a column header does.
    pub fn toggled(self) -> Dir {
        match self {
            Dir::Asc => Dir::Desc,
            Dir::Desc => Dir::Asc,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Dir::Asc => "asc",
            Dir::Desc => "desc",
        }
    }
}

impl fmt::Display for Dir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dir {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Dir::Asc),
            "desc" => Ok(Dir::Desc),
            other => Err(format!("unknown sort direction '{other}'")),
        }
    }
}

/// A field path and a direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortKey {
    pub field: String,
    pub dir: Dir,
}

impl SortKey {
    pub fn asc(field: impl Into<String>) -> Self {
        SortKey {
            field: field.into(),
            dir: Dir::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        SortKey {
            field: field.into(),
            dir: Dir::Desc,
        }
    }

    /// Compares two records on this key. Missing values sort last in both
    /// directions.
    pub fn compare<R: Record + ?Sized>(&self, a: &R, b: &R) -> Option<Ordering> {
        let (a, b) = (a.resolve(&self.field), b.resolve(&self.field));
        match (a.is_some(), b.is_some()) {
            (true, true) => compare_values(a, b).map(|o| self.dir.apply(o)),
            _ => compare_values(a, b),
        }
    }
}

/// Compares two records using a list of keys; later keys break ties.
/// Incomparable values (type mismatch) count as equal for that key.
pub fn compare_by_keys<R: Record + ?Sized>(a: &R, b: &R, keys: &[SortKey]) -> Ordering {
    for key in keys {
        if let Some(ordering) = key.compare(a, b) {
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
    }
    Ordering::Equal
}

/// Stable in-place sort of record references.
pub fn sort_records<R: Record>(records: &mut [&R], keys: &[SortKey]) {
    if keys.is_empty() {
        return;
    }
    records.sort_by(|a, b| compare_by_keys(*a, *b, keys));
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn names(records: &[&Value]) -> Vec<String> {
        records
            .iter()
            .map(|r| r["name"].as_str().unwrap_or("-").to_string())
            .collect()
    }

    #[test]
    fn dir_apply_and_toggle() {
        assert_eq!(Dir::Asc.apply(Ordering::Less), Ordering::Less);
        assert_eq!(Dir::Desc.apply(Ordering::Less), Ordering::Greater);
        assert_eq!(Dir::Asc.toggled(), Dir::Desc);
        assert_eq!("desc".parse::<Dir>().unwrap(), Dir::Desc);
        assert!("up".parse::<Dir>().is_err());
    }

    #[test]
    fn sorts_numbers_numerically() {
        let data = [
            json!({"name": "a", "projects": 10}),
            json!({"name": "b", "projects": 2}),
            json!({"name": "c", "projects": 7}),
        ];
        let mut refs: Vec<&Value> = data.iter().collect();
        sort_records(&mut refs, &[SortKey::asc("projects")]);
        assert_eq!(names(&refs), ["b", "c", "a"]);

        sort_records(&mut refs, &[SortKey::desc("projects")]);
        assert_eq!(names(&refs), ["a", "c", "b"]);
    }

    #[test]
    fn missing_values_sort_last_both_ways() {
        let data = [
            json!({"name": "x"}),
            json!({"name": "y", "rating": 3}),
            json!({"name": "z", "rating": 5}),
        ];
        let mut refs: Vec<&Value> = data.iter().collect();
        sort_records(&mut refs, &[SortKey::desc("rating")]);
        assert_eq!(names(&refs), ["z", "y", "x"]);
        sort_records(&mut refs, &[SortKey::asc("rating")]);
        assert_eq!(names(&refs), ["y", "z", "x"]);
    }

    #[test]
    fn ties_fall_through_to_next_key() {
        let data = [
            json!({"name": "b", "dept": "HR"}),
            json!({"name": "a", "dept": "HR"}),
            json!({"name": "c", "dept": "Eng"}),
        ];
        let mut refs: Vec<&Value> = data.iter().collect();
        sort_records(&mut refs, &[SortKey::asc("dept"), SortKey::asc("name")]);
        assert_eq!(names(&refs), ["c", "a", "b"]);
    }

    #[test]
    fn no_keys_keeps_order() {
        let data = [json!({"name": "b"}), json!({"name": "a"})];
        let mut refs: Vec<&Value> = data.iter().collect();
        sort_records(&mut refs, &[]);
        assert_eq!(names(&refs), ["b", "a"]);
    }
}
