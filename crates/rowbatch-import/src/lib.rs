//! Batch CSV import core.
//!
//! Streams parsed rows through per-column type coercion, collects per-row
//! outcomes independently, and commits or rolls back the whole batch as a
//! unit. Persistence, raw file storage, and job queueing stay behind the
//! collaborator traits in [`collab`].
//!
//! # Example
//!
//! ```ignore
//! use rowbatch_import::coerce::Fields;
//! use rowbatch_import::importer::Importer;
//! use rowbatch_import::row_importer::{RowError, RowImporter};
//!
//! struct PersonImporter;
//!
//! impl RowImporter for PersonImporter {
//!     type Value = (String, i64);
//!
//!     fn import_row(&mut self, row: &Row, _headers: &[String]) -> Result<Self::Value, RowError> {
//!         let fields = Fields::new(row);
//!         let name = fields.text("name", true)?.unwrap_or_default();
//!         let age = fields.integer("age", true)?.unwrap_or_default();
//!         Ok((name, age))
//!     }
//! }
//!
//! let mut importer = Importer::new("name,age\nalice,30\n", PersonImporter);
//! let result = importer.import();
//! assert!(result.succeeded());
//! ```

pub mod coerce;
pub mod collab;
pub mod importer;
pub mod row_importer;

pub use coerce::{CoerceError, ColumnKind, Fields, Value, parse_cell};
pub use collab::{
    ImportTask, NoopTransaction, RecordPurger, Scheduler, Transaction, TransactionError,
};
pub use importer::{
    DEFAULT_LARGE_DOCUMENT_THRESHOLD, ExecutionMode, Hooks, ImportError, ImportOptions, Importer,
};
pub use row_importer::{RowError, RowImporter};
