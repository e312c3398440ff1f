//! Resolved runtime configuration.

use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fieldsift_core::Schema;
use fieldsift_io::{ConditionStore, Dataset, FileSource, SourceChain, TextSource};

use crate::cli::Cli;

/// Everything a command needs to know about where data lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub records: Option<PathBuf>,
    pub fields: Option<PathBuf>,
    pub store: PathBuf,
    /// Apply terminal styles to text output.
    pub styled: bool,
}

impl Config {
    pub fn from_cli(cli: &Cli) -> Self {
        Config {
            records: cli.records.clone(),
            fields: cli.fields.clone(),
            store: cli.store.clone(),
            styled: console::colors_enabled(),
        }
    }

    pub fn store(&self) -> ConditionStore {
        ConditionStore::new(&self.store)
    }

    /// Loads records and fields, falling back to the embedded sample data
    /// for whatever the configured sources do not provide.
    pub fn load(&self) -> Result<Session> {
        let mut chain = SourceChain::new();
        let records = match self.records.as_deref() {
            Some(path) if path == Path::new("-") => {
                chain = chain.try_source(
                    TextSource::records_from_reader(io::stdin().lock())
                        .context("failed to read records from stdin")?,
                );
                None
            }
            other => other.map(Path::to_path_buf),
        };
        let resolved = chain
            .try_source(FileSource::new(records, self.fields.clone()))
            .with_embedded_fallback()
            .resolve()
            .context("failed to load records and fields")?;
        let schema = resolved
            .dataset
            .schema()
            .with_context(|| format!("invalid field definitions from {}", resolved.fields_from))?;
        Ok(Session {
            dataset: resolved.dataset,
            schema,
        })
    }
}

/// Loaded data for one invocation.
#[derive(Debug)]
pub struct Session {
    pub dataset: Dataset,
    pub schema: Schema,
}
