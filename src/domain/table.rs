// ============================================================
// TABLE MODEL
// ============================================================
// In-memory spreadsheet: ordered named columns x aligned rows.
// Cells keep the type assigned during parsing so column
// classification never has to re-derive type from strings.

use serde_json::Value;

/// A single spreadsheet cell, typed as the parser produced it.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
}

impl Cell {
    /// True for integer and floating-point cells only. Booleans and
    /// numeric-looking text are display values, not numbers.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Cell::Int(_) | Cell::Float(_))
    }

    /// Display form for the `rows` payload. Missing cells become an
    /// empty string, never null. Integral floats are emitted as JSON
    /// integers so `10.0` renders as `10` in the data grid.
    pub fn to_json(&self) -> Value {
        match self {
            Cell::Empty => Value::String(String::new()),
            Cell::Int(value) => Value::from(*value),
            Cell::Float(value) => match integral(*value) {
                Some(int) => Value::from(int),
                None => Value::from(*value),
            },
            Cell::Bool(value) => Value::from(*value),
            Cell::Text(value) => Value::from(value.clone()),
        }
    }

    /// Stringified form used for chart labels.
    pub fn display_string(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Int(value) => value.to_string(),
            Cell::Float(value) => match integral(*value) {
                Some(int) => int.to_string(),
                None => value.to_string(),
            },
            Cell::Bool(value) => value.to_string(),
            Cell::Text(value) => value.clone(),
        }
    }

    /// Lossy numeric coercion for series extraction. Anything that does
    /// not read as a number becomes 0.0 rather than failing the column.
    pub fn to_f64(&self) -> f64 {
        match self {
            Cell::Empty => 0.0,
            Cell::Int(value) => *value as f64,
            Cell::Float(value) => *value,
            Cell::Bool(value) => {
                if *value {
                    1.0
                } else {
                    0.0
                }
            }
            Cell::Text(value) => value.trim().parse::<f64>().unwrap_or(0.0),
        }
    }
}

fn integral(value: f64) -> Option<i64> {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        Some(value as i64)
    } else {
        None
    }
}

/// Parsed workbook sheet. Invariant: every row has exactly
/// `columns.len()` cells (the parser pads short rows with `Cell::Empty`).
#[derive(Debug, Clone)]
pub struct DataTable {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl DataTable {
    pub fn new(columns: Vec<String>, mut rows: Vec<Vec<Cell>>) -> Self {
        let width = columns.len();
        for row in rows.iter_mut() {
            row.resize(width, Cell::Empty);
        }
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Cells of one column in row order.
    pub fn column_cells(&self, index: usize) -> impl Iterator<Item = &Cell> {
        self.rows.iter().map(move |row| &row[index])
    }
}
