//! Field types and the operators legal for each of them.
//!
//! [`FieldType`] is the closed set of declared field types. [`Operator`] is
//! the closed set of comparison operators, partitioned by field type through
//! [`FieldType::operators`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// Declared type of a filterable field.
///
/// The type decides which operators apply, which payload slot of a
/// [`FilterValue`](crate::FilterValue) is read, and how the field's record
/// value is coerced before comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Free text, compared case-insensitively.
    Text,
    /// Single number with relational operators.
    Number,
    /// Inclusive date range.
    Date,
    /// Inclusive numeric range with optional bounds.
    Amount,
    /// One value out of an enumerated set.
    Select,
    /// Array-valued field tested against an enumerated set.
    Multiselect,
    /// True/false flag.
    Boolean,
}

impl FieldType {
    /// Every field type, in declaration order.
    pub const ALL: [FieldType; 7] = [
        FieldType::Text,
        FieldType::Number,
        FieldType::Date,
        FieldType::Amount,
        FieldType::Select,
        FieldType::Multiselect,
        FieldType::Boolean,
    ];

    /// Returns the operators legal for this type. The first entry is the
    /// conventional default.
    pub fn operators(self) -> &'static [Operator] {
        match self {
            FieldType::Text => &[
                Operator::Equals,
                Operator::Contains,
                Operator::StartsWith,
                Operator::EndsWith,
                Operator::DoesNotContain,
            ],
            FieldType::Number => &[
                Operator::Equals,
                Operator::GreaterThan,
                Operator::LessThan,
                Operator::GreaterThanOrEqual,
                Operator::LessThanOrEqual,
            ],
            FieldType::Date | FieldType::Amount => &[Operator::Between],
            FieldType::Select => &[Operator::Is, Operator::IsNot],
            FieldType::Multiselect => &[Operator::In, Operator::NotIn],
            FieldType::Boolean => &[Operator::Is],
        }
    }

    /// Returns `true` if `op` is legal for this type.
    pub fn allows(self, op: Operator) -> bool {
        self.operators().contains(&op)
    }

    /// Returns `true` if fields of this type must enumerate their choices.
    pub fn requires_options(self) -> bool {
        matches!(self, FieldType::Select | FieldType::Multiselect)
    }

    /// Returns the wire name of this type.
    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Number => "number",
            FieldType::Date => "date",
            FieldType::Amount => "amount",
            FieldType::Select => "select",
            FieldType::Multiselect => "multiselect",
            FieldType::Boolean => "boolean",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Comparison operator of a filter condition.
///
/// Operators are grouped by the field types they support:
/// - **Text**: `Equals`, `Contains`, `StartsWith`, `EndsWith`, `DoesNotContain`
/// - **Number**: `Equals`, `GreaterThan`, `LessThan`, `GreaterThanOrEqual`, `LessThanOrEqual`
/// - **Date / Amount**: `Between`
/// - **Select**: `Is`, `IsNot`
/// - **Multiselect**: `In`, `NotIn`
/// - **Boolean**: `Is`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operator {
    Equals,
    Contains,
    StartsWith,
    EndsWith,
    DoesNotContain,
    GreaterThan,
    LessThan,
    GreaterThanOrEqual,
    LessThanOrEqual,
    Between,
    Is,
    IsNot,
    In,
    NotIn,
}

impl Operator {
    /// Returns the wire name of this operator.
    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Equals => "equals",
            Operator::Contains => "contains",
            Operator::StartsWith => "startsWith",
            Operator::EndsWith => "endsWith",
            Operator::DoesNotContain => "doesNotContain",
            Operator::GreaterThan => "greaterThan",
            Operator::LessThan => "lessThan",
            Operator::GreaterThanOrEqual => "greaterThanOrEqual",
            Operator::LessThanOrEqual => "lessThanOrEqual",
            Operator::Between => "between",
            Operator::Is => "is",
            Operator::IsNot => "isNot",
            Operator::In => "in",
            Operator::NotIn => "notIn",
        }
    }

    /// Human-readable label for display.
    pub fn label(self) -> &'static str {
        match self {
            Operator::Equals => "equals",
            Operator::Contains => "contains",
            Operator::StartsWith => "starts with",
            Operator::EndsWith => "ends with",
            Operator::DoesNotContain => "does not contain",
            Operator::GreaterThan => ">",
            Operator::LessThan => "<",
            Operator::GreaterThanOrEqual => ">=",
            Operator::LessThanOrEqual => "<=",
            Operator::Between => "between",
            Operator::Is => "is",
            Operator::IsNot => "is not",
            Operator::In => "in",
            Operator::NotIn => "not in",
        }
    }

    /// Parses a wire name (`"startsWith"`, `"notIn"`, ...).
    pub fn parse(name: &str) -> Option<Operator> {
        ALL_OPERATORS.iter().copied().find(|op| op.as_str() == name)
    }
}

const ALL_OPERATORS: [Operator; 14] = [
    Operator::Equals,
    Operator::Contains,
    Operator::StartsWith,
    Operator::EndsWith,
    Operator::DoesNotContain,
    Operator::GreaterThan,
    Operator::LessThan,
    Operator::GreaterThanOrEqual,
    Operator::LessThanOrEqual,
    Operator::Between,
    Operator::Is,
    Operator::IsNot,
    Operator::In,
    Operator::NotIn,
];

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
