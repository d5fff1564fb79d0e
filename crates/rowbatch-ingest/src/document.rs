//! CSV document parsing into header-keyed rows.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use rowbatch_model::Row;

use crate::error::{IngestError, Result};

/// Maximum file size accepted by the file entry point (500 MB).
pub const MAX_CSV_FILE_SIZE: u64 = 500 * 1024 * 1024;

/// A parsed source document: the compacted header list plus one [`Row`]
/// per data record, in document order.
#[derive(Debug, Clone)]
pub struct Document {
    pub headers: Vec<String>,
    pub rows: Vec<Row>,
}

impl Document {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Parses CSV text into a [`Document`].
///
/// The header row is compacted before rows are built: a UTF-8 BOM and
/// surrounding whitespace are stripped from header names, blank names are
/// dropped, and duplicate names keep their first occurrence. Cells under a
/// dropped header are not carried into the rows.
///
/// Fails with [`IngestError::EmptyDocument`] when no data rows remain.
pub fn parse_document(input: &str) -> Result<Document> {
    let input = input.strip_prefix('\u{feff}').unwrap_or(input);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(input.as_bytes());

    let raw_headers = reader.headers()?.clone();

    let mut headers: Vec<String> = Vec::new();
    let mut kept: Vec<(usize, String)> = Vec::new();
    for (idx, name) in raw_headers.iter().enumerate() {
        let name = name.trim_matches('\u{feff}').trim();
        if name.is_empty() || headers.iter().any(|h| h == name) {
            continue;
        }
        headers.push(name.to_string());
        kept.push((idx, name.to_string()));
    }

    if headers.len() > 500 {
        tracing::warn!(columns = headers.len(), "wide document, import may be slow");
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(Row::from_pairs(kept.iter().filter_map(|(idx, name)| {
            record
                .get(*idx)
                .map(|value| (name.clone(), value.trim().to_string()))
        })));
    }

    if rows.is_empty() {
        return Err(IngestError::EmptyDocument);
    }

    Ok(Document { headers, rows })
}

/// Reads and parses a CSV file.
///
/// Applies the same sanity checks as the rest of the ingestion surface
/// before parsing: a size cap and UTF-16 BOM rejection (only UTF-8 input
/// is accepted).
pub fn parse_document_from_path(path: &Path) -> Result<Document> {
    check_file_size(path)?;
    validate_encoding(path)?;
    let input = std::fs::read_to_string(path).map_err(|e| IngestError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse_document(&input)
}

fn check_file_size(path: &Path) -> Result<()> {
    let metadata = std::fs::metadata(path).map_err(|e| read_error(path, e))?;
    if metadata.len() > MAX_CSV_FILE_SIZE {
        return Err(IngestError::FileTooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            max_size: MAX_CSV_FILE_SIZE,
        });
    }
    Ok(())
}

fn validate_encoding(path: &Path) -> Result<()> {
    let mut file = File::open(path).map_err(|e| read_error(path, e))?;
    let mut buffer = [0u8; 2];
    let bytes_read = file.read(&mut buffer).map_err(|e| read_error(path, e))?;

    if bytes_read >= 2 {
        if buffer == [0xFF, 0xFE] {
            return Err(IngestError::UnsupportedEncoding {
                path: path.to_path_buf(),
                encoding: "UTF-16 LE",
            });
        }
        if buffer == [0xFE, 0xFF] {
            return Err(IngestError::UnsupportedEncoding {
                path: path.to_path_buf(),
                encoding: "UTF-16 BE",
            });
        }
    }
    Ok(())
}

fn read_error(path: &Path, err: std::io::Error) -> IngestError {
    if err.kind() == std::io::ErrorKind::NotFound {
        IngestError::FileNotFound {
            path: path.to_path_buf(),
        }
    } else {
        IngestError::FileRead {
            path: path.to_path_buf(),
            source: err,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn parses_headers_and_rows_in_order() {
        let doc = parse_document("name,age\nalice,30\nbob,41\n").unwrap();

        assert_eq!(doc.headers, vec!["name", "age"]);
        assert_eq!(doc.row_count(), 2);
        assert_eq!(doc.rows[0].field("name"), Some("alice"));
        assert_eq!(doc.rows[1].field("age"), Some("41"));
    }

    #[test]
    fn header_only_document_is_empty() {
        let result = parse_document("name,age\n");
        assert!(matches!(result, Err(IngestError::EmptyDocument)));
    }

    #[test]
    fn blank_input_is_empty() {
        let result = parse_document("");
        assert!(matches!(result, Err(IngestError::EmptyDocument)));
    }

    #[test]
    fn compacts_blank_and_duplicate_headers() {
        let doc = parse_document("name,,name,age\nalice,x,shadow,30\n").unwrap();

        assert_eq!(doc.headers, vec!["name", "age"]);
        assert_eq!(doc.rows[0].field("name"), Some("alice"));
        assert_eq!(doc.rows[0].field("age"), Some("30"));
    }

    #[test]
    fn strips_utf8_bom_from_first_header() {
        let doc = parse_document("\u{feff}name,age\nalice,30\n").unwrap();
        assert_eq!(doc.headers[0], "name");
    }

    #[test]
    fn short_records_leave_trailing_columns_absent() {
        let doc = parse_document("name,age\nalice\n").unwrap();

        assert_eq!(doc.rows[0].field("name"), Some("alice"));
        assert_eq!(doc.rows[0].field("age"), None);
    }

    #[test]
    fn trims_cell_whitespace() {
        let doc = parse_document("name,age\n alice , 30 \n").unwrap();
        assert_eq!(doc.rows[0].field("name"), Some("alice"));
        assert_eq!(doc.rows[0].field("age"), Some("30"));
    }

    #[test]
    fn reads_document_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "name,age\nalice,30\n").unwrap();

        let doc = parse_document_from_path(file.path()).unwrap();
        assert_eq!(doc.row_count(), 1);
    }

    #[test]
    fn missing_file_is_reported_as_not_found() {
        let result = parse_document_from_path(Path::new("/no/such/import.csv"));
        assert!(matches!(result, Err(IngestError::FileNotFound { .. })));
    }

    #[test]
    fn utf16_input_is_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&[0xFF, 0xFE, 0x41, 0x00]).unwrap();

        let result = parse_document_from_path(file.path());
        assert!(matches!(
            result,
            Err(IngestError::UnsupportedEncoding { .. })
        ));
    }
}
