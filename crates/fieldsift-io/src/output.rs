//! Output mode control.
//!
//! [`OutputMode`] decides whether results go through the text renderer or
//! are serialized directly. Structured modes bypass templates entirely.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::export::{default_columns, to_csv, ExportError};

/// Errors that can occur during serialization.
#[derive(Debug, Error)]
pub enum SerializeError {
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML serialization failed: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("CSV serialization failed: {0}")]
    Csv(String),

    #[error("Not a structured output mode")]
    NotStructured,

    #[error("unknown output mode '{0}' (expected text, json, yaml or csv)")]
    UnknownMode(String),
}

/// Controls how output is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Styled text through templates.
    #[default]
    Text,
    Json,
    Yaml,
    /// Flattened rows, one column per dotted path.
    Csv,
}

impl OutputMode {
    /// Returns true if this is a structured output mode (JSON, YAML, CSV).
    pub fn is_structured(&self) -> bool {
        matches!(self, OutputMode::Json | OutputMode::Yaml | OutputMode::Csv)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputMode::Text => "text",
            OutputMode::Json => "json",
            OutputMode::Yaml => "yaml",
            OutputMode::Csv => "csv",
        }
    }
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputMode {
    type Err = SerializeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "term" => Ok(OutputMode::Text),
            "json" => Ok(OutputMode::Json),
            "yaml" | "yml" => Ok(OutputMode::Yaml),
            "csv" => Ok(OutputMode::Csv),
            _ => Err(SerializeError::UnknownMode(s.to_string())),
        }
    }
}

/// Serializes data to the specified structured format.
///
/// Returns an error if the output mode is not a structured mode.
pub fn serialize_structured<T: Serialize>(
    data: &T,
    mode: OutputMode,
) -> Result<String, SerializeError> {
    match mode {
        OutputMode::Json => Ok(serde_json::to_string_pretty(data)?),
        OutputMode::Yaml => Ok(serde_yaml::to_string(data)?),
        OutputMode::Csv => serialize_csv(data),
        OutputMode::Text => Err(SerializeError::NotStructured),
    }
}

/// Serializes data to CSV. Arrays of objects become one row per object;
/// anything else is treated as a single row. Data with no columns, such as
/// an empty array, serializes to an empty string.
pub fn serialize_csv<T: Serialize>(data: &T) -> Result<String, SerializeError> {
    let rows = match serde_json::to_value(data)? {
        Value::Array(items) => items,
        other => vec![other],
    };
    let columns = default_columns(&rows);
    if columns.is_empty() {
        return Ok(String::new());
    }
    let bytes = to_csv(&rows, &columns).map_err(csv_error)?;
    String::from_utf8(bytes).map_err(|e| SerializeError::Csv(e.to_string()))
}

fn csv_error(err: ExportError) -> SerializeError {
    SerializeError::Csv(err.to_string())
}
