//! Workbook reading via `calamine`.

use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};
use mvh_common::{format_numeric, string_column};
use polars::prelude::{Column, DataFrame};
use tracing::debug;

use crate::delimited::check_file_size;
use crate::error::{IngestError, Result};

/// Reads the first sheet of a workbook into a DataFrame of string columns.
///
/// The first non-empty row is the header. Header cells that are numbers
/// (year columns are often stored that way) are rendered without a decimal
/// part. Columns with an empty header are skipped.
pub fn read_spreadsheet(path: &Path) -> Result<DataFrame> {
    check_file_size(path)?;

    let spreadsheet_error = |message: String| IngestError::Spreadsheet {
        path: path.to_path_buf(),
        message,
    };

    let mut workbook = open_workbook_auto(path).map_err(|e| spreadsheet_error(e.to_string()))?;
    let sheet_names = workbook.sheet_names().to_vec();
    let Some(sheet_name) = sheet_names.first() else {
        return Err(spreadsheet_error("workbook has no sheets".to_string()));
    };
    let range = workbook
        .worksheet_range(sheet_name)
        .map_err(|e| spreadsheet_error(e.to_string()))?;

    let mut rows = range
        .rows()
        .filter(|row| row.iter().any(|cell| !matches!(cell, Data::Empty)));
    let Some(header_row) = rows.next() else {
        return Err(IngestError::EmptyTable {
            path: path.to_path_buf(),
        });
    };

    let headers: Vec<Option<String>> = header_row
        .iter()
        .map(|cell| cell_text(cell).map(|text| text.trim().to_string()))
        .collect();

    let mut values: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];
    for row in rows {
        for (idx, column) in values.iter_mut().enumerate() {
            column.push(row.get(idx).and_then(cell_text));
        }
    }

    let mut columns: Vec<Column> = Vec::with_capacity(headers.len());
    for (header, cells) in headers.into_iter().zip(values) {
        match header {
            Some(name) if !name.is_empty() => columns.push(string_column(&name, cells)),
            _ => debug!(path = %path.display(), "skipping spreadsheet column with empty header"),
        }
    }

    debug!(
        path = %path.display(),
        sheet = %sheet_name,
        sheet_count = sheet_names.len(),
        columns = columns.len(),
        "read spreadsheet"
    );

    DataFrame::new(columns).map_err(|e| spreadsheet_error(e.to_string()))
}

/// Text content of a cell; `None` for empty and error cells.
fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) => {
            if s.trim().is_empty() {
                None
            } else {
                Some(s.clone())
            }
        }
        Data::Float(v) => Some(format_numeric(*v)),
        Data::Int(v) => Some(v.to_string()),
        Data::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_text() {
        assert_eq!(cell_text(&Data::Empty), None);
        assert_eq!(cell_text(&Data::String("  ".into())), None);
        assert_eq!(cell_text(&Data::Float(2008.0)), Some("2008".to_string()));
        assert_eq!(cell_text(&Data::Float(7.25)), Some("7.25".to_string()));
        assert_eq!(cell_text(&Data::Int(2010)), Some("2010".to_string()));
        assert_eq!(
            cell_text(&Data::String("Norway".into())),
            Some("Norway".to_string())
        );
    }

    #[test]
    fn test_not_a_workbook() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.xlsx");
        std::fs::write(&path, b"this is not a zip archive").unwrap();
        let result = read_spreadsheet(&path);
        assert!(matches!(result, Err(IngestError::Spreadsheet { .. })));
    }
}
