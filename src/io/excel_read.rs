use std::io::{Cursor, Read, Seek};
use std::path::Path;

use calamine::{DataType, Range, Reader, Xlsx, open_workbook};
use tracing::debug;

use crate::enrich::RawRow;
use crate::error::{HackathonError, Result};

/// Header row and data rows of the first worksheet of an upload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetRows {
    /// Trimmed header labels in sheet order.
    pub headers: Vec<String>,
    /// Data rows keyed by header label.
    pub rows: Vec<RawRow>,
}

/// Reads the first worksheet of the workbook stored at `path`.
pub fn read_rows(path: &Path) -> Result<SheetRows> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;
    read_first_sheet(&mut workbook)
}

/// Reads the first worksheet of an in-memory workbook, as received from an
/// upload form.
pub fn read_rows_from_bytes(bytes: &[u8]) -> Result<SheetRows> {
    let mut workbook = Xlsx::new(Cursor::new(bytes))?;
    read_first_sheet(&mut workbook)
}

fn read_first_sheet<R: Read + Seek>(workbook: &mut Xlsx<R>) -> Result<SheetRows> {
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| HackathonError::InvalidWorkbook("workbook has no worksheet".into()))?
        .map_err(HackathonError::from)?;
    let sheet = rows_from_range(&range);
    debug!(
        columns = sheet.headers.len(),
        rows = sheet.rows.len(),
        "read upload worksheet"
    );
    Ok(sheet)
}

fn rows_from_range(range: &Range<DataType>) -> SheetRows {
    let mut rows_iter = range.rows();
    let headers: Vec<String> = match rows_iter.next() {
        Some(first_row) => first_row
            .iter()
            .map(|cell| cell_to_string(Some(cell)))
            .collect(),
        None => return SheetRows::default(),
    };

    let mut rows = Vec::new();
    for row in rows_iter {
        let mut record = RawRow::new();
        let mut blank = true;
        for (col_idx, header) in headers.iter().enumerate() {
            if header.is_empty() {
                continue;
            }
            let value = cell_to_string(row.get(col_idx));
            if !value.is_empty() {
                blank = false;
            }
            record.entry(header.clone()).or_insert(value);
        }
        if !blank {
            rows.push(record);
        }
    }

    SheetRows { headers, rows }
}

fn cell_to_string(cell: Option<&DataType>) -> String {
    let text = match cell {
        Some(DataType::String(value)) => value.clone(),
        Some(DataType::Float(value)) => value.to_string(),
        Some(DataType::Int(value)) => value.to_string(),
        Some(DataType::Bool(value)) => value.to_string(),
        Some(DataType::Empty) | Some(DataType::Error(_)) | None => String::new(),
        Some(other) => other.to_string(),
    };
    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_are_trimmed_and_empty_cells_become_empty_strings() {
        assert_eq!(
            cell_to_string(Some(&DataType::String("  Alice ".into()))),
            "Alice"
        );
        assert_eq!(cell_to_string(Some(&DataType::Empty)), "");
        assert_eq!(cell_to_string(None), "");
        assert_eq!(cell_to_string(Some(&DataType::Float(3.0))), "3");
    }

    #[test]
    fn garbage_bytes_are_reported_as_read_errors() {
        let result = read_rows_from_bytes(b"not a workbook");
        assert!(matches!(result, Err(HackathonError::ExcelRead(_))));
    }
}
