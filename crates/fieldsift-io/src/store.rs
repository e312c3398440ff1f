//! Persistence of the condition set.
//!
//! The store is a small JSON document mapping keys to values, standing in
//! for a browser-style key-value store. The condition set lives under
//! [`CONDITIONS_KEY`] as a plain array and its id watermark under
//! [`ISSUED_KEY`]; other keys are preserved on save.
//!
//! Loading is best effort: anything that cannot be read back as a condition
//! set yields an empty set.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use fieldsift_core::ConditionSet;
use serde_json::{Map, Value};
use thiserror::Error;

/// Key under which the condition set is stored.
pub const CONDITIONS_KEY: &str = "filters_v1";

/// Key holding the highest condition id number ever issued, so ids of
/// removed conditions are not handed out again.
pub const ISSUED_KEY: &str = "filters_v1_issued";

/// Errors raised while saving.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to encode condition set: {0}")]
    Encode(#[from] serde_json::Error),
}

/// File-backed key-value store holding the condition set.
#[derive(Debug, Clone)]
pub struct ConditionStore {
    path: PathBuf,
}

impl ConditionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        ConditionStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Restores the saved condition set. Never fails: a missing file,
    /// malformed JSON or an undecodable set all give an empty set.
    pub fn load(&self) -> ConditionSet {
        let Some(mut entries) = self.read_entries() else {
            return ConditionSet::new();
        };
        let issued = entries
            .get(ISSUED_KEY)
            .and_then(Value::as_u64)
            .unwrap_or(0);
        let Some(raw) = entries.remove(CONDITIONS_KEY) else {
            return ConditionSet::new().with_issued(issued);
        };
        match serde_json::from_value::<ConditionSet>(raw) {
            Ok(set) => set.with_issued(issued),
            Err(err) => {
                log::warn!(
                    "discarding saved conditions in {}: {err}",
                    self.path.display()
                );
                ConditionSet::new()
            }
        }
    }

    /// Saves the condition set, keeping any other keys in the file.
    ///
    /// The file is replaced atomically.
    pub fn save(&self, set: &ConditionSet) -> Result<(), StoreError> {
        let mut entries = self.read_entries().unwrap_or_default();
        entries.insert(CONDITIONS_KEY.to_string(), serde_json::to_value(set)?);
        entries.insert(ISSUED_KEY.to_string(), Value::from(set.issued()));
        let body = serde_json::to_vec_pretty(&Value::Object(entries))?;
        self.write_atomic(&body).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })?;
        log::debug!("saved {} condition(s) to {}", set.len(), self.path.display());
        Ok(())
    }

    fn read_entries(&self) -> Option<Map<String, Value>> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return None,
            Err(err) => {
                log::warn!("cannot read {}: {err}", self.path.display());
                return None;
            }
        };
        match serde_json::from_str::<Value>(&text) {
            Ok(Value::Object(entries)) => Some(entries),
            Ok(_) => {
                log::warn!("ignoring {}: not a JSON object", self.path.display());
                None
            }
            Err(err) => {
                log::warn!("ignoring {}: {err}", self.path.display());
                None
            }
        }
    }

    fn write_atomic(&self, body: &[u8]) -> io::Result<()> {
        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(body)?;
        tmp.flush()?;
        tmp.persist(&self.path).map_err(|err| err.error)?;
        Ok(())
    }
}
