//! The per-row transformation hook.

use thiserror::Error;

use rowbatch_model::Row;

use crate::coerce::CoerceError;

/// Failure raised by a [`RowImporter`] for one row.
///
/// Every variant is recovered into that row's outcome by the orchestrator;
/// none of them aborts the batch scan.
#[derive(Debug, Error)]
pub enum RowError {
    #[error(transparent)]
    Coerce(#[from] CoerceError),

    /// Domain-specific validation failure.
    #[error("{0}")]
    Validation(String),

    /// Anything else the row importer failed with.
    #[error(transparent)]
    Unhandled(#[from] anyhow::Error),
}

/// Transforms one decoded row (plus the document's header list) into an
/// application-defined value.
///
/// Implementations typically coerce the cells they care about through
/// [`crate::coerce::Fields`] and persist or collect the typed record. The
/// orchestrator invokes [`import_row`](RowImporter::import_row) once per
/// data row, synchronously, in document order; a returned error becomes
/// that row's outcome and the scan moves on to the next row.
pub trait RowImporter {
    type Value;

    fn import_row(&mut self, row: &Row, headers: &[String]) -> Result<Self::Value, RowError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coerce_errors_convert_without_losing_the_message() {
        let err: RowError = CoerceError::RequiredField { key: "age".into() }.into();
        assert_eq!(err.to_string(), "age is blank");
    }

    #[test]
    fn unhandled_errors_carry_the_source_message() {
        let err: RowError = anyhow::anyhow!("connection reset").into();
        assert_eq!(err.to_string(), "connection reset");
    }
}
