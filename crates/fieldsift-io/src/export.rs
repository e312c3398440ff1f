//! Export of projected records as JSON or CSV.
//!
//! CSV columns are dotted paths, so nested objects flatten into one column
//! per leaf (`address.city`). Cells are resolved through [`Record::resolve`],
//! which means a missing or `null` value exports as an empty cell.

use std::fmt;
use std::str::FromStr;

use fieldsift_core::Record;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// Base name used for exported files.
pub const DEFAULT_BASE_NAME: &str = "filtered-records";

/// Separator placed between array elements in a CSV cell.
pub const ARRAY_SEPARATOR: &str = "; ";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("JSON export failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV export failed: {0}")]
    Flush(#[from] std::io::Error),

    #[error("unknown export format '{0}' (expected csv or json)")]
    UnknownFormat(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            _ => Err(ExportError::UnknownFormat(s.to_string())),
        }
    }
}

/// The result of an export: the format actually written, a suggested file
/// name and the encoded bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Export {
    pub format: ExportFormat,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl Export {
    fn new(format: ExportFormat, base_name: &str, bytes: Vec<u8>) -> Self {
        Export {
            format,
            file_name: format!("{base_name}.{}", format.extension()),
            bytes,
        }
    }
}

/// Exports records in the requested format.
///
/// An empty collection requested as CSV is written as JSON instead, since a
/// header-only file carries no columns worth keeping.
pub fn export<T: Serialize>(
    records: &[T],
    format: ExportFormat,
    base_name: &str,
) -> Result<Export, ExportError> {
    match format {
        ExportFormat::Csv if records.is_empty() => {
            log::debug!("nothing to export as CSV, writing JSON instead");
            Ok(Export::new(ExportFormat::Json, base_name, to_json(records)?))
        }
        ExportFormat::Csv => {
            let values = records
                .iter()
                .map(serde_json::to_value)
                .collect::<Result<Vec<_>, _>>()?;
            let columns = default_columns(&values);
            let bytes = to_csv(&values, &columns)?;
            Ok(Export::new(ExportFormat::Csv, base_name, bytes))
        }
        ExportFormat::Json => Ok(Export::new(
            ExportFormat::Json,
            base_name,
            to_json(records)?,
        )),
    }
}

/// Pretty-printed JSON array.
pub fn to_json<T: Serialize>(records: &[T]) -> Result<Vec<u8>, ExportError> {
    Ok(serde_json::to_vec_pretty(records)?)
}

/// Writes a header row of `columns` then one row per record.
pub fn to_csv<R: Record>(records: &[R], columns: &[String]) -> Result<Vec<u8>, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(columns)?;
    for record in records {
        let row = columns
            .iter()
            .map(|column| record.resolve(column).map(cell).unwrap_or_default());
        writer.write_record(row)?;
    }
    writer.flush()?;
    writer.into_inner().map_err(|err| {
        ExportError::Flush(std::io::Error::new(err.error().kind(), err.to_string()))
    })
}

/// Columns of the first record, with nested objects flattened into dotted
/// paths in key order.
pub fn default_columns(records: &[Value]) -> Vec<String> {
    let mut columns = Vec::new();
    if let Some(Value::Object(first)) = records.first() {
        flatten_keys(first, "", &mut columns);
    }
    columns
}

fn flatten_keys(object: &Map<String, Value>, prefix: &str, out: &mut Vec<String>) {
    for (key, value) in object {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            Value::Object(inner) if !inner.is_empty() => flatten_keys(inner, &path, out),
            _ => out.push(path),
        }
    }
}

fn cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(cell)
            .collect::<Vec<_>>()
            .join(ARRAY_SEPARATOR),
        other => other.to_string(),
    }
}
