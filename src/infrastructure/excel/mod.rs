// ============================================================
// EXCEL PARSER
// ============================================================
// Decode an uploaded .xlsx into a DataTable. Legacy binary
// workbooks are rejected up front; any other decode failure is
// surfaced with its underlying cause.

use std::io::Cursor;

use calamine::{Data, DataType, Range, Reader, Xlsx};
use tracing::debug;

use crate::domain::error::{AppError, Result};
use crate::domain::table::{Cell, DataTable};

// OLE2 compound file signature, the container of legacy .xls workbooks.
const OLE2_MAGIC: [u8; 8] = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

/// Decoder for uploaded workbooks. Reads one worksheet; the first row
/// is the header, the rest are data.
#[derive(Debug, Clone, Default)]
pub struct ExcelParser {
    sheet_index: usize,
}

impl ExcelParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sheet_index(mut self, sheet_index: usize) -> Self {
        self.sheet_index = sheet_index;
        self
    }

    /// Parse uploaded bytes into a table.
    pub fn parse(&self, filename: &str, bytes: &[u8]) -> Result<DataTable> {
        if is_legacy_workbook(filename, bytes) {
            return Err(AppError::UnsupportedFormat);
        }

        let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))
            .map_err(|err| AppError::ParseError(err.to_string()))?;

        let range = workbook
            .worksheet_range_at(self.sheet_index)
            .ok_or_else(|| AppError::ParseError("工作簿中没有工作表".to_string()))?
            .map_err(|err| AppError::ParseError(err.to_string()))?;

        let table = build_table(&range)?;
        debug!(
            filename = %filename,
            rows = table.row_count(),
            columns = table.column_count(),
            "Workbook parsed"
        );
        Ok(table)
    }
}

fn is_legacy_workbook(filename: &str, bytes: &[u8]) -> bool {
    filename.to_ascii_lowercase().ends_with(".xls") || bytes.starts_with(&OLE2_MAGIC)
}

fn build_table(range: &Range<Data>) -> Result<DataTable> {
    let mut rows_iter = range.rows();
    let header = rows_iter.next().ok_or(AppError::EmptyTable)?;
    let columns = header_names(header);

    let rows: Vec<Vec<Cell>> = rows_iter
        .map(|row| {
            (0..columns.len())
                .map(|index| row.get(index).map(cell_from).unwrap_or(Cell::Empty))
                .collect()
        })
        .collect();

    if rows.is_empty() {
        return Err(AppError::EmptyTable);
    }

    Ok(DataTable::new(columns, rows))
}

/// Header names from the first sheet row. Blank cells become
/// `Unnamed: {index}`; duplicates get a `.{n}` suffix so column names
/// stay unique.
fn header_names(header: &[Data]) -> Vec<String> {
    let mut names: Vec<String> = Vec::with_capacity(header.len());
    for (index, cell) in header.iter().enumerate() {
        let mut name = cell
            .as_string()
            .map(|value| value.trim().to_string())
            .unwrap_or_else(|| format!("{}", cell));
        if name.is_empty() {
            name = format!("Unnamed: {}", index);
        }
        if names.contains(&name) {
            let mut suffix = 1;
            while names.contains(&format!("{}.{}", name, suffix)) {
                suffix += 1;
            }
            name = format!("{}.{}", name, suffix);
        }
        names.push(name);
    }
    names
}

fn cell_from(data: &Data) -> Cell {
    if data.is_empty() {
        Cell::Empty
    } else if data.is_int() {
        Cell::Int(data.get_int().unwrap_or_default())
    } else if data.is_float() {
        Cell::Float(data.get_float().unwrap_or_default())
    } else if data.is_bool() {
        Cell::Bool(data.get_bool().unwrap_or_default())
    } else {
        // Strings, datetimes and error cells all travel as display text.
        Cell::Text(
            data.as_string()
                .unwrap_or_else(|| format!("{}", data)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIMPLE_XLSX: &[u8] =
        include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/simple.xlsx"));
    const HEADER_ONLY_XLSX: &[u8] = include_bytes!(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/tests/fixtures/header_only.xlsx"
    ));

    #[test]
    fn test_parse_simple_workbook() {
        let table = ExcelParser::new().parse("simple.xlsx", SIMPLE_XLSX).unwrap();

        assert_eq!(table.columns(), &["name", "score"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.rows()[0][0], Cell::Text("a".to_string()));
        assert!(table.rows()[0][1].is_numeric());
        assert_eq!(table.rows()[1][1], Cell::Empty);
    }

    #[test]
    fn test_legacy_extension_rejected() {
        let err = ExcelParser::new().parse("old.xls", SIMPLE_XLSX).unwrap_err();
        assert_eq!(err, AppError::UnsupportedFormat);
    }

    #[test]
    fn test_ole2_magic_rejected_regardless_of_name() {
        let mut bytes = OLE2_MAGIC.to_vec();
        bytes.extend_from_slice(&[0u8; 64]);
        let err = ExcelParser::new().parse("renamed.xlsx", &bytes).unwrap_err();
        assert_eq!(err, AppError::UnsupportedFormat);
    }

    #[test]
    fn test_garbage_bytes_report_cause() {
        let err = ExcelParser::new()
            .parse("data.xlsx", b"this is not a workbook")
            .unwrap_err();
        assert!(matches!(err, AppError::ParseError(_)));
    }

    #[test]
    fn test_header_only_workbook_is_empty() {
        let err = ExcelParser::new()
            .parse("empty.xlsx", HEADER_ONLY_XLSX)
            .unwrap_err();
        assert_eq!(err, AppError::EmptyTable);
    }

    #[test]
    fn test_header_naming() {
        let header = vec![
            Data::String("name".to_string()),
            Data::Empty,
            Data::String("name".to_string()),
        ];
        assert_eq!(header_names(&header), vec!["name", "Unnamed: 1", "name.1"]);
    }
}
