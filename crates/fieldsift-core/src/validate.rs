//! Readiness checks for conditions.
//!
//! Validation answers one question: is this condition complete enough to
//! filter with? It looks only at the condition's declared type and payload,
//! never at the schema. Every outcome is a value; nothing here fails.

use serde::Serialize;
use thiserror::Error;

use crate::condition::FilterCondition;
use crate::op::FieldType;
use crate::value::{FilterValue, Timestamp};

/// Why a condition is not ready to filter.
///
/// The `Display` text is meant to be shown next to the condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Invalid {
    #[error("Enter text value")]
    MissingText,
    #[error("Enter a valid number")]
    InvalidNumber,
    #[error("Select start and end dates")]
    MissingDateRange,
    #[error("Invalid date")]
    InvalidDate,
    #[error("Start date must be before end date")]
    DateRangeReversed,
    #[error("Enter min and/or max amount")]
    MissingAmount,
    #[error("Min must be <= Max")]
    AmountRangeReversed,
    #[error("Choose a value")]
    MissingSelection,
    #[error("Choose one or more options")]
    EmptyMultiSelection,
    #[error("Choose true or false")]
    MissingBoolean,
}

/// Outcome of [`validate`], shaped for display and serialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Validation {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Validation {
    pub fn ok() -> Self {
        Validation {
            valid: true,
            message: None,
        }
    }
}

impl From<Result<(), Invalid>> for Validation {
    fn from(result: Result<(), Invalid>) -> Self {
        match result {
            Ok(()) => Validation::ok(),
            Err(reason) => Validation {
                valid: false,
                message: Some(reason.to_string()),
            },
        }
    }
}

/// Checks whether a condition is ready to filter.
pub fn validate(condition: &FilterCondition) -> Validation {
    check(condition).into()
}

/// Returns `true` if [`check`] passes.
pub fn is_valid(condition: &FilterCondition) -> bool {
    check(condition).is_ok()
}

/// Checks a condition, reporting the first problem found.
///
/// Rules by declared type:
/// - text: trimmed text must be non-empty
/// - number: a finite number must be set
/// - date: both ends parse and start <= end
/// - amount: at least one finite bound; min <= max when both are set
/// - select: a non-empty choice
/// - multiselect: at least one choice
/// - boolean: true or false must be set
pub fn check(condition: &FilterCondition) -> Result<(), Invalid> {
    let value = &condition.value;
    match condition.field_type {
        FieldType::Text => check_text(value),
        FieldType::Number => check_number(value),
        FieldType::Date => check_dates(value),
        FieldType::Amount => check_amount(value),
        FieldType::Select => check_select(value),
        FieldType::Multiselect => check_multiselect(value),
        FieldType::Boolean => check_boolean(value),
    }
}

fn check_text(value: &FilterValue) -> Result<(), Invalid> {
    match value.text.as_deref() {
        Some(text) if !text.trim().is_empty() => Ok(()),
        _ => Err(Invalid::MissingText),
    }
}

fn check_number(value: &FilterValue) -> Result<(), Invalid> {
    match value.number {
        Some(n) if n.is_finite() => Ok(()),
        _ => Err(Invalid::InvalidNumber),
    }
}

fn check_dates(value: &FilterValue) -> Result<(), Invalid> {
    let (start, end) = match (non_blank(&value.date_start), non_blank(&value.date_end)) {
        (Some(start), Some(end)) => (start, end),
        _ => return Err(Invalid::MissingDateRange),
    };
    let (start, end) = match (Timestamp::parse(start), Timestamp::parse(end)) {
        (Some(start), Some(end)) => (start, end),
        _ => return Err(Invalid::InvalidDate),
    };
    if start > end {
        return Err(Invalid::DateRangeReversed);
    }
    Ok(())
}

fn check_amount(value: &FilterValue) -> Result<(), Invalid> {
    let min = value.amount_min.filter(|n| n.is_finite());
    let max = value.amount_max.filter(|n| n.is_finite());
    match (min, max) {
        (None, None) => Err(Invalid::MissingAmount),
        (Some(min), Some(max)) if min > max => Err(Invalid::AmountRangeReversed),
        _ => Ok(()),
    }
}

fn check_select(value: &FilterValue) -> Result<(), Invalid> {
    match value.select_value.as_deref() {
        Some(choice) if !choice.is_empty() => Ok(()),
        _ => Err(Invalid::MissingSelection),
    }
}

fn check_multiselect(value: &FilterValue) -> Result<(), Invalid> {
    match value.multi_select_value.as_deref() {
        Some(choices) if !choices.is_empty() => Ok(()),
        _ => Err(Invalid::EmptyMultiSelection),
    }
}

fn check_boolean(value: &FilterValue) -> Result<(), Invalid> {
    value.boolean_value.map(|_| ()).ok_or(Invalid::MissingBoolean)
}

fn non_blank(slot: &Option<String>) -> Option<&str> {
    slot.as_deref().filter(|s| !s.is_empty())
}
