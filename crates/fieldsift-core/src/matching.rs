//! Per-condition predicates and their conjunction.
//!
//! [`matches`] evaluates one condition against one record, dispatching on
//! the condition's declared [`FieldType`]. [`matches_all`] folds a whole set
//! with short-circuiting AND.
//!
//! The engine is permissive: it does not consult validation, and it does
//! not reject operators that are foreign to the declared type (those match
//! everything). Conversion failures on numbers and dates fail closed; a date
//! range missing either end matches everything.

use serde_json::Value;

use crate::condition::FilterCondition;
use crate::op::{FieldType, Operator};
use crate::record::Record;
use crate::value::{as_number, as_text, as_timestamp, is_truthy, FilterValue, Timestamp};

/// Returns `true` if the record satisfies every condition. An empty set
/// matches every record.
pub fn matches_all<'c, R, I>(record: &R, conditions: I) -> bool
where
    R: Record + ?Sized,
    I: IntoIterator<Item = &'c FilterCondition>,
{
    conditions
        .into_iter()
        .all(|condition| matches(record, condition))
}

/// Evaluates a single condition against a record.
pub fn matches<R: Record + ?Sized>(record: &R, condition: &FilterCondition) -> bool {
    let field = record.resolve(&condition.field);
    let op = condition.operator;
    let value = &condition.value;
    match condition.field_type {
        FieldType::Text => match_text(field, op, value),
        FieldType::Number => match_number(field, op, value),
        FieldType::Date => match_date(field, value),
        FieldType::Amount => match_amount(field, value),
        FieldType::Select => match_select(field, op, value),
        FieldType::Multiselect => match_multiselect(field, op, value),
        FieldType::Boolean => match_boolean(field, value),
    }
}

fn match_text(field: Option<&Value>, op: Operator, value: &FilterValue) -> bool {
    // A `false` leaf reads as blank text, the same as a missing one.
    let field = field.filter(|v| v.as_bool() != Some(false));
    let haystack = as_text(field).to_lowercase();
    let needle = value.text.as_deref().unwrap_or_default().to_lowercase();
    match op {
        Operator::Equals => haystack == needle,
        Operator::Contains => haystack.contains(&needle),
        Operator::StartsWith => haystack.starts_with(&needle),
        Operator::EndsWith => haystack.ends_with(&needle),
        Operator::DoesNotContain => !haystack.contains(&needle),
        _ => true,
    }
}

fn match_number(field: Option<&Value>, op: Operator, value: &FilterValue) -> bool {
    let actual = as_number(field);
    if actual.is_nan() {
        return false;
    }
    let target = value.number.unwrap_or(0.0);
    match op {
        Operator::Equals => actual == target,
        Operator::GreaterThan => actual > target,
        Operator::LessThan => actual < target,
        Operator::GreaterThanOrEqual => actual >= target,
        Operator::LessThanOrEqual => actual <= target,
        _ => true,
    }
}

fn match_date(field: Option<&Value>, value: &FilterValue) -> bool {
    let (start, end) = match (
        value.date_start.as_deref().filter(|s| !s.is_empty()),
        value.date_end.as_deref().filter(|s| !s.is_empty()),
    ) {
        (Some(start), Some(end)) => (start, end),
        // An open range does not filter.
        _ => return true,
    };
    match (
        as_timestamp(field),
        Timestamp::parse(start),
        Timestamp::parse(end),
    ) {
        (Some(actual), Some(start), Some(end)) => start <= actual && actual <= end,
        _ => false,
    }
}

fn match_amount(field: Option<&Value>, value: &FilterValue) -> bool {
    let actual = as_number(field);
    if actual.is_nan() {
        return false;
    }
    let min = value.amount_min.unwrap_or(0.0);
    let max = value.amount_max.unwrap_or(f64::INFINITY);
    min <= actual && actual <= max
}

fn match_select(field: Option<&Value>, op: Operator, value: &FilterValue) -> bool {
    let wanted = value.select_value.as_deref().unwrap_or_default();
    // An unresolved field equals no choice, not even the empty one.
    let equal = field.is_some() && as_text(field) == wanted;
    match op {
        Operator::Is => equal,
        Operator::IsNot => !equal,
        _ => true,
    }
}

fn match_multiselect(field: Option<&Value>, op: Operator, value: &FilterValue) -> bool {
    let wanted = value.multi_select_value.as_deref().unwrap_or_default();
    let any_wanted = field
        .and_then(Value::as_array)
        .is_some_and(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .any(|item| wanted.iter().any(|w| w == item))
        });
    match op {
        Operator::In => any_wanted,
        Operator::NotIn => !any_wanted,
        _ => true,
    }
}

fn match_boolean(field: Option<&Value>, value: &FilterValue) -> bool {
    value.boolean_value == Some(is_truthy(field))
}
