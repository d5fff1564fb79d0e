//! Document ingestion for batch CSV imports.
//!
//! Turns raw CSV text (or a CSV file) into a [`Document`]: a compacted
//! header list plus one header-keyed [`rowbatch_model::Row`] per data
//! record, in document order. The importer crate drives everything else.

pub mod document;
pub mod error;

pub use document::{Document, MAX_CSV_FILE_SIZE, parse_document, parse_document_from_path};
pub use error::{IngestError, Result};
