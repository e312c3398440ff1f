//! Fieldsift core - typed field conditions over structured records.
//!
//! A caller describes filterable fields in a [`Schema`], builds a
//! [`ConditionSet`] of [`FilterCondition`]s against it, and projects a record
//! collection through the set. Records are anything implementing [`Record`];
//! `serde_json::Value` works out of the box.
//!
//! # Quick Start
//!
//! ```rust
//! use fieldsift_core::{project, FieldType, FilterCondition, FilterValue, Operator};
//! use serde_json::json;
//!
//! let records = vec![
//!     json!({"name": "Ann", "salary": 40000, "skills": ["Python"]}),
//!     json!({"name": "Bob", "salary": 60000, "skills": ["Go", "Rust"]}),
//!     json!({"name": "Cid", "salary": 80000, "skills": ["Java"]}),
//! ];
//!
//! let conditions = vec![
//!     FilterCondition::new(
//!         "filter-1",
//!         "salary",
//!         FieldType::Amount,
//!         Operator::Between,
//!         FilterValue::amount(Some(50000.0), None),
//!     ),
//!     FilterCondition::new(
//!         "filter-2",
//!         "skills",
//!         FieldType::Multiselect,
//!         Operator::In,
//!         FilterValue::multi(["Go", "Rust"]),
//!     ),
//! ];
//!
//! let results = project(&records, &conditions);
//! assert_eq!(results.len(), 1);
//! assert_eq!(results[0]["name"], "Bob");
//! ```
//!
//! # Semantics
//!
//! ```text
//! match = every condition matches   (empty set = everything matches)
//! ```
//!
//! Each condition is evaluated by its declared field type:
//!
//! | Type | Operators | Compared as |
//! |------|-----------|-------------|
//! | `text` | `equals`, `contains`, `startsWith`, `endsWith`, `doesNotContain` | lower-cased text |
//! | `number` | `equals`, `greaterThan`, `lessThan`, `greaterThanOrEqual`, `lessThanOrEqual` | number, NaN never matches |
//! | `date` | `between` | inclusive range; an open range matches everything |
//! | `amount` | `between` | inclusive range, min defaults to 0, max to infinity |
//! | `select` | `is`, `isNot` | text equality |
//! | `multiselect` | `in`, `notIn` | array intersection |
//! | `boolean` | `is` | truthiness |
//!
//! Matching does not consult [`validate`]; pass
//! [`MatchOptions::skip_invalid`] to [`project_with`] to drop conditions
//! that are not ready.

mod condition;
mod error;
mod matching;
mod op;
mod ordering;
mod project;
mod record;
mod schema;
mod validate;
mod value;

pub use condition::{ConditionSet, FilterCondition};
pub use error::{Result, SchemaError};
pub use matching::{matches, matches_all};
pub use op::{FieldType, Operator};
pub use ordering::{compare_by_keys, sort_records, Dir, SortKey};
pub use project::{count, project, project_cloned, project_with, MatchOptions};
pub use record::Record;
pub use schema::{FieldDefinition, FieldOption, Schema};
pub use validate::{check, is_valid, validate, Invalid, Validation};
pub use value::{as_number, as_text, as_timestamp, compare_values, is_truthy, FilterValue, Timestamp};
