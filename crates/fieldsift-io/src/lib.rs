//! Collaborators around the fieldsift core: where records and field
//! definitions come from, where the condition set is kept, and how results
//! leave the process.
//!
//! # Quick Start
//!
//! ```
//! use fieldsift_io::{ConditionStore, SourceChain, TextSource};
//!
//! let resolved = SourceChain::new()
//!     .try_source(TextSource::new(Some(r#"[{"name": "Ann"}]"#.into()), None))
//!     .with_embedded_fallback()
//!     .resolve()
//!     .unwrap();
//!
//! assert_eq!(resolved.records_from, "text");
//! assert_eq!(resolved.fields_from, "embedded");
//! assert_eq!(resolved.dataset.records.len(), 1);
//!
//! let dir = tempfile::tempdir().unwrap();
//! let store = ConditionStore::new(dir.path().join("state.json"));
//! assert!(store.load().is_empty());
//! ```
//!
//! # Modules
//!
//! - [`source`]: [`DataSource`] implementations and the [`SourceChain`]
//!   that falls back per part (records, fields) to embedded sample data.
//! - [`store`]: [`ConditionStore`], best-effort load and atomic save.
//! - [`export`]: JSON and CSV export with dotted-path columns.
//! - [`output`]: [`OutputMode`] and structured serialization.

pub mod embedded;
pub mod export;
pub mod output;
pub mod source;
pub mod store;

pub use export::{export, Export, ExportError, ExportFormat, DEFAULT_BASE_NAME};
pub use output::{serialize_structured, OutputMode, SerializeError};
pub use source::{
    DataSource, Dataset, EmbeddedSource, FileSource, Partial, Resolved, SourceChain, SourceError,
    TextSource,
};
pub use store::{ConditionStore, StoreError, CONDITIONS_KEY, ISSUED_KEY};
