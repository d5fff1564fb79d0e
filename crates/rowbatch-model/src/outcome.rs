use serde::{Deserialize, Serialize};

use crate::report::{ImportReport, RowReport};

/// Status of a single row or of the whole batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportStatus {
    Success,
    Error,
}

/// Per-row processing result.
///
/// `row` is the user-facing row number: the header is row 1, so the first
/// data row is 2. Constructed only through [`RowOutcome::success`] and
/// [`RowOutcome::failure`], which keep the invariant that `status` is
/// `Error` exactly when `errors` is non-empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowOutcome<V> {
    pub row: usize,
    pub status: ImportStatus,
    pub errors: Vec<String>,
    /// Result produced by the row importer; opaque to the orchestrator.
    pub value: Option<V>,
}

impl<V> RowOutcome<V> {
    pub fn success(row: usize, value: V) -> Self {
        Self {
            row,
            status: ImportStatus::Success,
            errors: Vec::new(),
            value: Some(value),
        }
    }

    pub fn failure(row: usize, errors: Vec<String>) -> Self {
        debug_assert!(!errors.is_empty());
        Self {
            row,
            status: ImportStatus::Error,
            errors,
            value: None,
        }
    }

    pub fn is_error(&self) -> bool {
        self.status == ImportStatus::Error
    }
}

/// The aggregated batch outcome: overall status, one outcome per data row
/// in document order, and an optional top-level error for failures that
/// happened before or independent of row processing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportResult<V> {
    pub status: ImportStatus,
    #[serde(rename = "results")]
    pub row_outcomes: Vec<RowOutcome<V>>,
    #[serde(rename = "error")]
    pub top_level_error: Option<String>,
}

impl<V> ImportResult<V> {
    /// Derives the batch status from the row outcomes: any failed row
    /// marks the whole batch as failed.
    pub fn from_outcomes(row_outcomes: Vec<RowOutcome<V>>) -> Self {
        let status = if row_outcomes.iter().any(RowOutcome::is_error) {
            ImportStatus::Error
        } else {
            ImportStatus::Success
        };
        Self {
            status,
            row_outcomes,
            top_level_error: None,
        }
    }

    /// A batch that failed before any row outcome could be recorded, e.g.
    /// on an empty document or a transaction failure.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            status: ImportStatus::Error,
            row_outcomes: Vec::new(),
            top_level_error: Some(message.into()),
        }
    }

    pub fn succeeded(&self) -> bool {
        self.status == ImportStatus::Success
    }

    /// Number of rows that imported cleanly.
    pub fn number_imported(&self) -> usize {
        self.row_outcomes
            .iter()
            .filter(|outcome| !outcome.is_error())
            .count()
    }

    pub fn failed_outcomes(&self) -> impl Iterator<Item = &RowOutcome<V>> {
        self.row_outcomes
            .iter()
            .filter(|outcome| outcome.is_error())
    }
}

impl<V: Serialize> ImportResult<V> {
    /// Flattens to the serializable consumer shape, erasing the row value
    /// type to JSON.
    pub fn to_report(&self) -> ImportReport {
        ImportReport {
            status: self.status,
            results: self
                .row_outcomes
                .iter()
                .map(|outcome| RowReport {
                    row: outcome.row,
                    status: outcome.status,
                    errors: outcome.errors.clone(),
                    value: outcome
                        .value
                        .as_ref()
                        .and_then(|value| serde_json::to_value(value).ok())
                        .unwrap_or(serde_json::Value::Null),
                })
                .collect(),
            error: self.top_level_error.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_derives_from_outcomes() {
        let all_good: ImportResult<u32> = ImportResult::from_outcomes(vec![
            RowOutcome::success(2, 10),
            RowOutcome::success(3, 20),
        ]);
        assert!(all_good.succeeded());
        assert_eq!(all_good.number_imported(), 2);

        let mixed: ImportResult<u32> = ImportResult::from_outcomes(vec![
            RowOutcome::success(2, 10),
            RowOutcome::failure(3, vec!["age is blank".into()]),
        ]);
        assert!(!mixed.succeeded());
        assert_eq!(mixed.number_imported(), 1);
        assert_eq!(mixed.failed_outcomes().count(), 1);
    }

    #[test]
    fn failure_outcome_carries_errors_and_no_value() {
        let outcome: RowOutcome<u32> = RowOutcome::failure(4, vec!["bad".into()]);
        assert!(outcome.is_error());
        assert!(outcome.value.is_none());
        assert_eq!(outcome.errors, vec!["bad".to_string()]);
    }

    #[test]
    fn top_level_failure_has_no_outcomes() {
        let result: ImportResult<u32> = ImportResult::failed("there is no data to import");
        assert!(!result.succeeded());
        assert!(result.row_outcomes.is_empty());
        assert_eq!(
            result.top_level_error.as_deref(),
            Some("there is no data to import")
        );
    }

    #[test]
    fn serializes_to_consumer_field_names() {
        let result: ImportResult<u32> =
            ImportResult::from_outcomes(vec![RowOutcome::success(2, 7)]);
        let json = serde_json::to_value(&result).expect("serialize result");

        assert_eq!(json["status"], "success");
        assert_eq!(json["results"][0]["row"], 2);
        assert_eq!(json["results"][0]["value"], 7);
        assert_eq!(json["error"], serde_json::Value::Null);
    }
}
