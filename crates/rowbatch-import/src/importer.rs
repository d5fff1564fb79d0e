//! The batch import orchestrator.
//!
//! Parses the whole document, drives the row importer over every data row
//! inside one transaction boundary, and enforces the all-or-nothing commit
//! policy: a single failed row rolls the entire batch back. Per-row
//! failures are captured in that row's outcome and never stop the scan;
//! only failures outside the per-row path (empty document, record purging,
//! the transaction boundary itself) abort the batch with a top-level
//! error.

use thiserror::Error;
use tracing::{info, warn};

use rowbatch_ingest::{Document, IngestError, parse_document};
use rowbatch_model::{ImportResult, RowOutcome};

use crate::collab::{NoopTransaction, RecordPurger, Transaction, TransactionError};
use crate::row_importer::RowImporter;

/// First user-facing data row number; the header is row 1.
const FIRST_DATA_ROW: usize = 2;

/// Default data-row count above which a document is considered large.
pub const DEFAULT_LARGE_DOCUMENT_THRESHOLD: usize = 10;

#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// Destroy previously imported records before parsing begins.
    pub replace: bool,
    /// Data-row count above which [`Importer::execution_mode`] reports
    /// [`ExecutionMode::Deferred`]. The boundary is exclusive: a document
    /// with exactly this many rows still runs immediately.
    pub large_document_threshold: usize,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            replace: false,
            large_document_threshold: DEFAULT_LARGE_DOCUMENT_THRESHOLD,
        }
    }
}

/// Optional orchestration callbacks, all defaulting to no-ops.
pub struct Hooks<V> {
    /// Runs inside the transaction, before the first row.
    pub before_rows: Option<Box<dyn FnMut() + Send>>,
    /// Runs inside the transaction, after the last row, with every
    /// recorded outcome.
    pub after_rows: Option<Box<dyn FnMut(&[RowOutcome<V>]) + Send>>,
}

impl<V> Default for Hooks<V> {
    fn default() -> Self {
        Self {
            before_rows: None,
            after_rows: None,
        }
    }
}

/// How a batch should be executed, decided from the document size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    Immediate,
    Deferred,
}

/// Batch-aborting failures. Per-row failures never appear here; they are
/// recorded in the row outcomes instead.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error(transparent)]
    Transaction(#[from] TransactionError),

    #[error("failed to destroy existing records: {0}")]
    Replace(#[source] anyhow::Error),
}

/// Runs a whole batch and produces an [`ImportResult`] with all-or-nothing
/// commit semantics.
///
/// Collaborators default to inert implementations: a [`NoopTransaction`]
/// boundary and no record purger. Wire real ones in with the `with_*`
/// builders.
pub struct Importer<R: RowImporter> {
    source: String,
    row_importer: R,
    transaction: Box<dyn Transaction>,
    purger: Option<Box<dyn RecordPurger>>,
    options: ImportOptions,
    hooks: Hooks<R::Value>,
}

impl<R: RowImporter> Importer<R> {
    pub fn new(source: impl Into<String>, row_importer: R) -> Self {
        Self {
            source: source.into(),
            row_importer,
            transaction: Box::new(NoopTransaction),
            purger: None,
            options: ImportOptions::default(),
            hooks: Hooks::default(),
        }
    }

    pub fn with_transaction(mut self, transaction: Box<dyn Transaction>) -> Self {
        self.transaction = transaction;
        self
    }

    pub fn with_purger(mut self, purger: Box<dyn RecordPurger>) -> Self {
        self.purger = Some(purger);
        self
    }

    pub fn with_options(mut self, options: ImportOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_hooks(mut self, hooks: Hooks<R::Value>) -> Self {
        self.hooks = hooks;
        self
    }

    /// Runs the batch.
    ///
    /// Every data row is attempted exactly once, in document order,
    /// numbered from 2 (the header is row 1). Row failures are recorded
    /// in that row's outcome and the scan continues; any failure among
    /// them rolls the whole batch back. Failures outside the per-row path
    /// surface as a top-level error with no row outcomes.
    pub fn import(&mut self) -> ImportResult<R::Value> {
        info!(replace = self.options.replace, "starting import");
        match self.run() {
            Ok(outcomes) => {
                let result = ImportResult::from_outcomes(outcomes);
                if result.succeeded() {
                    info!(rows = result.row_outcomes.len(), "import committed");
                } else {
                    warn!(
                        failed = result.row_outcomes.len() - result.number_imported(),
                        "import failed, all changes have been rolled back"
                    );
                }
                result
            }
            Err(err) => {
                warn!(error = %err, "import aborted");
                ImportResult::failed(err.to_string())
            }
        }
    }

    fn run(&mut self) -> Result<Vec<RowOutcome<R::Value>>, ImportError> {
        if self.options.replace
            && let Some(purger) = self.purger.as_mut()
        {
            purger.destroy_existing().map_err(ImportError::Replace)?;
        }

        let document = parse_document(&self.source)?;

        self.transaction.begin()?;
        let outcomes = self.run_rows(&document);

        if outcomes.iter().any(RowOutcome::is_error) {
            self.transaction.rollback()?;
        } else if let Err(err) = self.transaction.commit() {
            let _ = self.transaction.rollback();
            return Err(err.into());
        }

        Ok(outcomes)
    }

    fn run_rows(&mut self, document: &Document) -> Vec<RowOutcome<R::Value>> {
        if let Some(before_rows) = self.hooks.before_rows.as_mut() {
            before_rows();
        }

        let mut outcomes = Vec::with_capacity(document.row_count());
        for (idx, row) in document.rows.iter().enumerate() {
            let row_number = FIRST_DATA_ROW + idx;
            let outcome = match self.row_importer.import_row(row, &document.headers) {
                Ok(value) => RowOutcome::success(row_number, value),
                Err(err) => RowOutcome::failure(row_number, vec![err.to_string()]),
            };
            outcomes.push(outcome);
        }

        if let Some(after_rows) = self.hooks.after_rows.as_mut() {
            after_rows(&outcomes);
        }

        outcomes
    }

    /// Whether the parsed document's data-row count exceeds the
    /// configured threshold.
    pub fn is_large_document(&self) -> Result<bool, ImportError> {
        let document = parse_document(&self.source)?;
        Ok(document.row_count() > self.options.large_document_threshold)
    }

    /// Sync-vs-deferred policy for callers: large documents should go to
    /// an external [`crate::collab::Scheduler`], everything else can run
    /// inline. The importer performs no scheduling of its own.
    pub fn execution_mode(&self) -> Result<ExecutionMode, ImportError> {
        Ok(if self.is_large_document()? {
            ExecutionMode::Deferred
        } else {
            ExecutionMode::Immediate
        })
    }
}
