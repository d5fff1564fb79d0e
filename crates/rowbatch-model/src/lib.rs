pub mod outcome;
pub mod report;
pub mod row;

pub use outcome::{ImportResult, ImportStatus, RowOutcome};
pub use report::{ImportReport, JobStatus, RowReport};
pub use row::Row;
