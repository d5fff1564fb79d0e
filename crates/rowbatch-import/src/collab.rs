//! Collaborator seams: the persistence transaction boundary, record
//! purging for replacing imports, and deferred execution.
//!
//! The import core owns none of these concerns. It drives them through
//! the traits here and leaves the implementations to the host
//! application.

use thiserror::Error;

use rowbatch_model::ImportReport;

/// Failure of the transactional infrastructure itself.
#[derive(Debug, Error)]
#[error("transaction failed: {message}")]
pub struct TransactionError {
    pub message: String,
}

impl TransactionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// All-or-nothing commit/rollback scope wrapping one batch.
///
/// The orchestrator opens the boundary once per `import()` call and
/// releases it exactly once — committed when every row succeeded, rolled
/// back otherwise. `rollback` must fully undo any writes performed by row
/// importer calls made since `begin`. `Send` so a whole importer can move
/// into an [`ImportTask`].
pub trait Transaction: Send {
    fn begin(&mut self) -> Result<(), TransactionError>;
    fn commit(&mut self) -> Result<(), TransactionError>;
    fn rollback(&mut self) -> Result<(), TransactionError>;
}

/// Transaction boundary for consumers without a persistence layer.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTransaction;

impl Transaction for NoopTransaction {
    fn begin(&mut self) -> Result<(), TransactionError> {
        Ok(())
    }

    fn commit(&mut self) -> Result<(), TransactionError> {
        Ok(())
    }

    fn rollback(&mut self) -> Result<(), TransactionError> {
        Ok(())
    }
}

/// Destroys previously imported records before a replacing import runs.
pub trait RecordPurger: Send {
    fn destroy_existing(&mut self) -> anyhow::Result<()>;
}

/// A deferred import: run it, get the serialized batch report.
pub type ImportTask = Box<dyn FnOnce() -> ImportReport + Send>;

/// External scheduler for large documents.
///
/// Expected to run the task later, exactly once, and route the resulting
/// report to its completion hook. The orchestrator never schedules
/// anything itself; callers decide based on
/// [`crate::importer::ExecutionMode`]. Cancellation and retry policy
/// belong to the scheduler, not to this crate.
pub trait Scheduler {
    fn schedule(&mut self, task: ImportTask);
}
