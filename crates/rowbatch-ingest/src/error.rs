//! Error types for document ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while parsing a source document.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The document contained a header row but no data rows.
    #[error("there is no data to import")]
    EmptyDocument,

    /// The CSV content itself was malformed.
    #[error("failed to parse csv: {message}")]
    Csv { message: String },

    /// Source file not found.
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read the source file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Source file exceeds the ingestion size cap.
    #[error("file too large: {path} is {size} bytes (max {max_size})")]
    FileTooLarge {
        path: PathBuf,
        size: u64,
        max_size: u64,
    },

    /// Source file uses an encoding we do not accept (UTF-8 only).
    #[error("unsupported encoding {encoding} in {path}")]
    UnsupportedEncoding {
        path: PathBuf,
        encoding: &'static str,
    },
}

impl From<csv::Error> for IngestError {
    fn from(err: csv::Error) -> Self {
        Self::Csv {
            message: err.to_string(),
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
