//! Record and schema acquisition with fallback.
//!
//! A [`DataSource`] may provide records, field definitions, both or
//! neither. [`SourceChain`] tries sources in order and resolves records and
//! fields independently: the first source with a non-empty payload for a
//! part wins that part. A source that fails is logged and skipped, so a
//! chain ending in [`EmbeddedSource`] always resolves.
//!
//! ```text
//! SourceChain
//! ├── FileSource      → error (logged, skipped)
//! ├── TextSource      → records only       ← records from here
//! └── EmbeddedSource  → records and fields ← fields from here
//! ```

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use fieldsift_core::{FieldDefinition, Schema, SchemaError};
use serde_json::Value;
use thiserror::Error;

use crate::embedded;

/// Errors raised while reading a source.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read input: {0}")]
    Input(#[source] io::Error),

    #[error("malformed {part} payload: {source}")]
    Json {
        part: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("no source provided {0}")]
    Exhausted(&'static str),
}

/// Whatever a single source could provide. `None` means "nothing here",
/// which lets the chain fall through to the next source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Partial {
    pub records: Option<Vec<Value>>,
    pub fields: Option<Vec<FieldDefinition>>,
}

/// Provides records and/or field definitions.
pub trait DataSource {
    /// Short name used in logs and in [`Resolved`].
    fn name(&self) -> &'static str;

    fn load(&self) -> Result<Partial, SourceError>;
}

/// Fully resolved input for a session.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub records: Vec<Value>,
    pub fields: Vec<FieldDefinition>,
}

impl Dataset {
    /// Validates the field definitions into a [`Schema`].
    pub fn schema(&self) -> Result<Schema, SchemaError> {
        Schema::new(self.fields.iter().cloned())
    }
}

/// A [`Dataset`] with the names of the sources each part came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    pub dataset: Dataset,
    pub records_from: &'static str,
    pub fields_from: &'static str,
}

/// Parses a records payload. Anything but a non-empty array counts as
/// "no records".
pub fn parse_records(text: &str) -> Result<Option<Vec<Value>>, SourceError> {
    let value: Value = serde_json::from_str(text).map_err(|source| SourceError::Json {
        part: "records",
        source,
    })?;
    Ok(match value {
        Value::Array(items) if !items.is_empty() => Some(items),
        _ => None,
    })
}

/// Parses a field definition payload. Anything but a non-empty array counts
/// as "no fields"; a non-empty array must hold well-formed definitions.
pub fn parse_fields(text: &str) -> Result<Option<Vec<FieldDefinition>>, SourceError> {
    let json_err = |source| SourceError::Json {
        part: "fields",
        source,
    };
    let value: Value = serde_json::from_str(text).map_err(json_err)?;
    if !matches!(&value, Value::Array(items) if !items.is_empty()) {
        return Ok(None);
    }
    serde_json::from_value(value).map(Some).map_err(json_err)
}

/// Reads records and fields from JSON files. Either path may be omitted.
#[derive(Debug, Clone, Default)]
pub struct FileSource {
    records: Option<PathBuf>,
    fields: Option<PathBuf>,
}

impl FileSource {
    pub fn new(records: Option<PathBuf>, fields: Option<PathBuf>) -> Self {
        FileSource { records, fields }
    }

    fn read(path: &Path) -> Result<String, SourceError> {
        fs::read_to_string(path).map_err(|source| SourceError::Read {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl DataSource for FileSource {
    fn name(&self) -> &'static str {
        "file"
    }

    fn load(&self) -> Result<Partial, SourceError> {
        let records = match &self.records {
            Some(path) => parse_records(&Self::read(path)?)?,
            None => None,
        };
        let fields = match &self.fields {
            Some(path) => parse_fields(&Self::read(path)?)?,
            None => None,
        };
        Ok(Partial { records, fields })
    }
}

/// Holds already-read JSON text, e.g. piped stdin.
#[derive(Debug, Clone, Default)]
pub struct TextSource {
    records: Option<String>,
    fields: Option<String>,
}

impl TextSource {
    pub fn new(records: Option<String>, fields: Option<String>) -> Self {
        TextSource { records, fields }
    }

    /// Reads the records payload from a reader.
    pub fn records_from_reader<R: Read>(mut reader: R) -> Result<Self, SourceError> {
        let mut text = String::new();
        reader
            .read_to_string(&mut text)
            .map_err(SourceError::Input)?;
        Ok(TextSource::new(Some(text), None))
    }
}

impl DataSource for TextSource {
    fn name(&self) -> &'static str {
        "text"
    }

    fn load(&self) -> Result<Partial, SourceError> {
        let records = match &self.records {
            Some(text) if !text.trim().is_empty() => parse_records(text)?,
            _ => None,
        };
        let fields = match &self.fields {
            Some(text) if !text.trim().is_empty() => parse_fields(text)?,
            _ => None,
        };
        Ok(Partial { records, fields })
    }
}

/// The sample employee dataset compiled into the crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedSource;

impl DataSource for EmbeddedSource {
    fn name(&self) -> &'static str {
        "embedded"
    }

    fn load(&self) -> Result<Partial, SourceError> {
        Ok(Partial {
            records: parse_records(embedded::EMPLOYEES)?,
            fields: parse_fields(embedded::FIELDS)?,
        })
    }
}

/// Ordered list of sources with per-part fallback.
#[derive(Default)]
pub struct SourceChain {
    sources: Vec<Box<dyn DataSource>>,
}

impl SourceChain {
    pub fn new() -> Self {
        SourceChain::default()
    }

    /// Adds a source. Sources are tried in the order they are added.
    pub fn try_source<S: DataSource + 'static>(mut self, source: S) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    /// Appends [`EmbeddedSource`] as the last resort.
    pub fn with_embedded_fallback(self) -> Self {
        self.try_source(EmbeddedSource)
    }

    pub fn resolve(&self) -> Result<Resolved, SourceError> {
        let mut records: Option<(Vec<Value>, &'static str)> = None;
        let mut fields: Option<(Vec<FieldDefinition>, &'static str)> = None;

        for source in &self.sources {
            if records.is_some() && fields.is_some() {
                break;
            }
            let partial = match source.load() {
                Ok(partial) => partial,
                Err(err) => {
                    log::warn!("source '{}' failed, falling back: {err}", source.name());
                    continue;
                }
            };
            if records.is_none() {
                records = partial.records.map(|r| (r, source.name()));
            }
            if fields.is_none() {
                fields = partial.fields.map(|f| (f, source.name()));
            }
        }

        let (records, records_from) = records.ok_or(SourceError::Exhausted("records"))?;
        let (fields, fields_from) = fields.ok_or(SourceError::Exhausted("fields"))?;
        log::debug!(
            "loaded {} records from {records_from}, {} fields from {fields_from}",
            records.len(),
            fields.len()
        );
        Ok(Resolved {
            dataset: Dataset { records, fields },
            records_from,
            fields_from,
        })
    }
}
