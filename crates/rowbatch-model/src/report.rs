use serde::{Deserialize, Serialize};

use crate::outcome::ImportStatus;

/// Serialized per-row entry in an [`ImportReport`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowReport {
    pub row: usize,
    pub status: ImportStatus,
    pub errors: Vec<String>,
    pub value: serde_json::Value,
}

impl RowReport {
    pub fn is_error(&self) -> bool {
        self.status == ImportStatus::Error
    }
}

/// The externally visible batch result, with row values erased to JSON.
///
/// This is the shape handed to presentation and storage layers, and the
/// form a deferred execution task reports back with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportReport {
    pub status: ImportStatus,
    pub results: Vec<RowReport>,
    pub error: Option<String>,
}

impl ImportReport {
    pub fn succeeded(&self) -> bool {
        self.status == ImportStatus::Success
    }

    /// Number of rows that imported cleanly.
    pub fn number_imported(&self) -> usize {
        self.results.iter().filter(|row| !row.is_error()).count()
    }

    /// One display line per failure: the top-level error first if present,
    /// then `Line {row}: {messages}` for every failed row.
    pub fn formatted_errors(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if let Some(error) = &self.error {
            lines.push(error.clone());
        }
        lines.extend(
            self.results
                .iter()
                .filter(|row| row.is_error())
                .map(|row| format!("Line {}: {}", row.row, row.errors.join(", "))),
        );
        lines
    }
}

/// Lifecycle state of an import job as seen by a consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobStatus {
    Processing,
    Succeeded,
    Failed,
}

impl JobStatus {
    pub fn from_report(report: &ImportReport) -> Self {
        if report.succeeded() {
            Self::Succeeded
        } else {
            Self::Failed
        }
    }

    pub fn display_status(&self) -> &'static str {
        match self {
            Self::Succeeded => "Import Succeeded",
            Self::Failed => "Import Failed with Errors",
            Self::Processing => "Processing",
        }
    }
}
