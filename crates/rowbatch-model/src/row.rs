use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One data record from a parsed document, keyed by header name.
///
/// Rows are immutable once produced by the document parser: the importer
/// borrows them for the duration of one row's processing and never mutates
/// them. Lookup is tolerant of header case — exact match first, then the
/// uppercased key, then the lowercased key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    cells: BTreeMap<String, String>,
}

impl Row {
    /// Builds a row from `(header, value)` pairs. Later pairs with a
    /// duplicate header overwrite earlier ones.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            cells: pairs
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }

    /// Looks up a cell by header name.
    ///
    /// `None` means the column is absent from this row, which is distinct
    /// from a present-but-empty cell (`Some("")`).
    pub fn field(&self, key: &str) -> Option<&str> {
        self.cells
            .get(key)
            .or_else(|| self.cells.get(&key.to_uppercase()))
            .or_else(|| self.cells.get(&key.to_lowercase()))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
