//! Condition payloads and the coercions applied to record values.
//!
//! [`FilterValue`] is the sparse payload of a condition: only the slots that
//! belong to the condition's field type are read. The free functions in this
//! module turn a resolved record value (a `serde_json::Value`, or `None` when
//! the path did not resolve) into the shape a given field type compares.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Typed payload of a condition.
///
/// Each slot belongs to one field type:
///
/// | type | slots |
/// |------|-------|
/// | text | `text` |
/// | number | `number` |
/// | date | `date_start`, `date_end` |
/// | amount | `amount_min`, `amount_max` |
/// | select | `select_value` |
/// | multiselect | `multi_select_value` |
/// | boolean | `boolean_value` |
///
/// Slots that do not belong to the active type are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterValue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_end: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount_min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount_max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub select_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multi_select_value: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boolean_value: Option<bool>,
}

impl FilterValue {
    pub fn text(text: impl Into<String>) -> Self {
        FilterValue {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn number(number: f64) -> Self {
        FilterValue {
            number: Some(number),
            ..Default::default()
        }
    }

    /// Date range. Either end may be left open, which makes the condition a
    /// no-op for matching.
    pub fn dates(start: Option<&str>, end: Option<&str>) -> Self {
        FilterValue {
            date_start: start.map(str::to_string),
            date_end: end.map(str::to_string),
            ..Default::default()
        }
    }

    pub fn amount(min: Option<f64>, max: Option<f64>) -> Self {
        FilterValue {
            amount_min: min,
            amount_max: max,
            ..Default::default()
        }
    }

    pub fn select(value: impl Into<String>) -> Self {
        FilterValue {
            select_value: Some(value.into()),
            ..Default::default()
        }
    }

    pub fn multi<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FilterValue {
            multi_select_value: Some(values.into_iter().map(Into::into).collect()),
            ..Default::default()
        }
    }

    pub fn boolean(value: bool) -> Self {
        FilterValue {
            boolean_value: Some(value),
            ..Default::default()
        }
    }

    /// Returns `true` if no slot is set.
    pub fn is_empty(&self) -> bool {
        *self == FilterValue::default()
    }
}

/// Timestamp value represented as milliseconds since Unix epoch (UTC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(pub i64);

impl Timestamp {
    pub fn as_millis(self) -> i64 {
        self.0
    }

    /// Parses a date string.
    ///
    /// Accepted forms:
    /// - RFC 3339 (`2024-03-01T09:30:00Z`, `2024-03-01T09:30:00+02:00`)
    /// - calendar date (`2024-03-01`), read as UTC midnight
    /// - date and time without offset (`2024-03-01T09:30`,
    ///   `2024-03-01T09:30:00.250`, `2024-03-01 09:30:00`), read as UTC
    pub fn parse(input: &str) -> Option<Timestamp> {
        let input = input.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
            return Some(Timestamp(dt.timestamp_millis()));
        }
        if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
            let midnight = date.and_hms_opt(0, 0, 0)?;
            return Some(Timestamp(midnight.and_utc().timestamp_millis()));
        }
        const NAIVE_FORMATS: [&str; 3] = [
            "%Y-%m-%dT%H:%M:%S%.f",
            "%Y-%m-%d %H:%M:%S%.f",
            "%Y-%m-%dT%H:%M",
        ];
        NAIVE_FORMATS.iter().find_map(|fmt| {
            NaiveDateTime::parse_from_str(input, fmt)
                .ok()
                .map(|dt| Timestamp(dt.and_utc().timestamp_millis()))
        })
    }
}

impl From<i64> for Timestamp {
    fn from(millis: i64) -> Self {
        Timestamp(millis)
    }
}

/// Renders a record value as text.
///
/// Strings pass through, numbers use their shortest decimal form, booleans
/// become `true`/`false`, arrays are joined with `,`, objects are rendered
/// as JSON. An unresolved value is the empty string.
pub fn as_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => number_text(n),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| as_text(Some(item)))
            .collect::<Vec<_>>()
            .join(","),
        Some(other @ Value::Object(_)) => other.to_string(),
    }
}

fn number_text(n: &serde_json::Number) -> String {
    if let Some(i) = n.as_i64() {
        i.to_string()
    } else if let Some(u) = n.as_u64() {
        u.to_string()
    } else {
        // Display for f64 already drops a zero fraction: 60000.0 -> "60000".
        n.as_f64().map(|f| f.to_string()).unwrap_or_default()
    }
}

/// Casts a record value to a number. Returns NaN when there is no sensible
/// numeric reading.
///
/// - numbers as is
/// - strings trimmed then parsed; blank strings are 0
/// - booleans are 1 or 0
/// - an empty array is 0, a one-element array casts its element
/// - objects, longer arrays and unresolved values are NaN
pub fn as_number(value: Option<&Value>) -> f64 {
    match value {
        None | Some(Value::Null) | Some(Value::Object(_)) => f64::NAN,
        Some(Value::Number(n)) => n.as_f64().unwrap_or(f64::NAN),
        Some(Value::String(s)) => parse_number(s),
        Some(Value::Bool(b)) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Some(Value::Array(items)) => match items.as_slice() {
            [] => 0.0,
            [single] => as_number(Some(single)),
            _ => f64::NAN,
        },
    }
}

fn parse_number(s: &str) -> f64 {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    match trimmed.trim_start_matches(|c: char| c == '+' || c == '-') {
        "Infinity" => {
            if trimmed.starts_with('-') {
                f64::NEG_INFINITY
            } else {
                f64::INFINITY
            }
        }
        // Rust also accepts "inf" and "nan" spellings; treat those as text.
        rest if rest.chars().any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E') => f64::NAN,
        _ => trimmed.parse().unwrap_or(f64::NAN),
    }
}

/// Truthiness of a record value: unresolved, `false`, `0`, NaN and `""` are
/// false, everything else is true.
pub fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

/// Reads a record value as a date. Only strings can parse.
pub fn as_timestamp(value: Option<&Value>) -> Option<Timestamp> {
    match value {
        Some(Value::String(s)) => Timestamp::parse(s),
        _ => None,
    }
}

/// Compares two record values for sorting.
///
/// Numbers compare numerically, strings lexically, booleans `false < true`.
/// Unresolved values sort after resolved ones. Returns `None` for type
/// mismatches and NaN.
pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Option<Ordering> {
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());
    match (a, b) {
        (None, None) => Some(Ordering::Equal),
        (None, Some(_)) => Some(Ordering::Greater),
        (Some(_), None) => Some(Ordering::Less),
        (Some(Value::Number(x)), Some(Value::Number(y))) => compare_numbers(x, y),
        (Some(Value::String(x)), Some(Value::String(y))) => Some(x.cmp(y)),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => Some(x.cmp(y)),
        _ => None,
    }
}

fn compare_numbers(a: &serde_json::Number, b: &serde_json::Number) -> Option<Ordering> {
    match (a.as_i64(), b.as_i64()) {
        (Some(x), Some(y)) => Some(x.cmp(&y)),
        _ => a.as_f64()?.partial_cmp(&b.as_f64()?),
    }
}
