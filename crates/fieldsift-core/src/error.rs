//! Error types for schema construction.
//!
//! The matching and validation engines never fail; only assembling a
//! [`Schema`](crate::Schema) from external definitions can.

use thiserror::Error;

use crate::op::{FieldType, Operator};

/// Errors raised when a set of field definitions breaks the schema rules.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    /// Two definitions share a name.
    #[error("duplicate field name '{0}'")]
    DuplicateField(String),

    /// A definition lists no operators.
    #[error("field '{0}' declares no operators")]
    NoOperators(String),

    /// A definition lists an operator its type does not support.
    #[error("operator '{op}' is not valid for {field_type} field '{field}'")]
    InvalidOperatorForType {
        field: String,
        op: Operator,
        field_type: FieldType,
    },

    /// A select or multiselect definition lacks options.
    #[error("{field_type} field '{field}' must declare options")]
    MissingOptions { field: String, field_type: FieldType },

    /// A definition that cannot use options declares some.
    #[error("{field_type} field '{field}' cannot declare options")]
    UnexpectedOptions { field: String, field_type: FieldType },
}

/// Result type for schema operations.
pub type Result<T> = std::result::Result<T, SchemaError>;
