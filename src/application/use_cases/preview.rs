// ============================================================
// UPLOAD PREVIEW
// ============================================================
// Shape a parsed workbook into the response payload: column type
// partition, sanitized rows, per-column numeric series, and a
// default chart axis pair.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::domain::table::{Cell, DataTable};

/// Axis label used when the chart falls back to 1-based row numbers.
pub const ROW_INDEX_LABEL: &str = "行号";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadPreview {
    pub columns: Vec<String>,
    pub rows: Vec<Map<String, Value>>,
    pub numeric_columns: Vec<String>,
    pub non_numeric_columns: Vec<String>,
    pub numeric_data: Map<String, Value>,
    pub chart: Option<ChartPreview>,
}

/// Default (x, y) pairing for the initial chart render.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPreview {
    pub x: String,
    pub y: String,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

#[derive(Debug, Default)]
pub struct UploadPreviewUseCase;

impl UploadPreviewUseCase {
    pub fn new() -> Self {
        Self
    }

    /// Shape a non-empty table into the upload response. Total: the only
    /// degradation is `chart: None` when the table has no numeric columns.
    pub fn execute(&self, table: &DataTable) -> UploadPreview {
        let (numeric_indices, non_numeric_indices) = classify_columns(table);

        let series: Vec<Vec<f64>> = numeric_indices
            .iter()
            .map(|&index| numeric_series(table, index))
            .collect();

        let mut numeric_data = Map::new();
        for (&index, values) in numeric_indices.iter().zip(series.iter()) {
            numeric_data.insert(table.columns()[index].clone(), Value::from(values.clone()));
        }

        let chart = select_chart(table, &numeric_indices, &non_numeric_indices, &series);

        UploadPreview {
            columns: table.columns().to_vec(),
            rows: sanitize_rows(table),
            numeric_columns: column_names(table, &numeric_indices),
            non_numeric_columns: column_names(table, &non_numeric_indices),
            numeric_data,
            chart,
        }
    }
}

/// Partition column indices into (numeric, non-numeric), original order
/// preserved. A column is numeric iff every cell carries a numeric type
/// (empties tolerated); numeric-looking text does not count.
fn classify_columns(table: &DataTable) -> (Vec<usize>, Vec<usize>) {
    (0..table.column_count()).partition(|&index| {
        table
            .column_cells(index)
            .all(|cell| cell.is_numeric() || *cell == Cell::Empty)
    })
}

fn column_names(table: &DataTable, indices: &[usize]) -> Vec<String> {
    indices
        .iter()
        .map(|&index| table.columns()[index].clone())
        .collect()
}

/// One JSON object per row, column name -> display value. Missing cells
/// become empty strings, never null.
fn sanitize_rows(table: &DataTable) -> Vec<Map<String, Value>> {
    table
        .rows()
        .iter()
        .map(|row| {
            table
                .columns()
                .iter()
                .zip(row.iter())
                .map(|(name, cell)| (name.clone(), cell.to_json()))
                .collect()
        })
        .collect()
}

/// Floats for one column in row order, from the original cells rather
/// than the sanitized strings; non-coercible entries become 0.0.
fn numeric_series(table: &DataTable, index: usize) -> Vec<f64> {
    table.column_cells(index).map(Cell::to_f64).collect()
}

/// Pick the default chart axes: y is the first numeric column, x is the
/// first non-numeric column or synthesized row numbers. `None` only when
/// there is no numeric column at all.
fn select_chart(
    table: &DataTable,
    numeric_indices: &[usize],
    non_numeric_indices: &[usize],
    series: &[Vec<f64>],
) -> Option<ChartPreview> {
    let &y_index = numeric_indices.first()?;
    let values = series[0].clone();

    let (x, labels) = match non_numeric_indices.first() {
        Some(&label_index) => (
            table.columns()[label_index].clone(),
            table
                .column_cells(label_index)
                .map(Cell::display_string)
                .collect(),
        ),
        None => (
            ROW_INDEX_LABEL.to_string(),
            (1..=table.row_count()).map(|row| row.to_string()).collect(),
        ),
    };

    Some(ChartPreview {
        x,
        y: table.columns()[y_index].clone(),
        labels,
        values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn table(columns: &[&str], rows: Vec<Vec<Cell>>) -> DataTable {
        DataTable::new(columns.iter().map(|name| name.to_string()).collect(), rows)
    }

    fn text(value: &str) -> Cell {
        Cell::Text(value.to_string())
    }

    #[test]
    fn test_partition_preserves_order_and_covers_all_columns() {
        let table = table(
            &["name", "score", "city", "age"],
            vec![
                vec![text("a"), Cell::Float(1.0), text("x"), Cell::Int(30)],
                vec![text("b"), Cell::Float(2.0), text("y"), Cell::Int(40)],
            ],
        );
        let preview = UploadPreviewUseCase::new().execute(&table);

        assert_eq!(preview.numeric_columns, vec!["score", "age"]);
        assert_eq!(preview.non_numeric_columns, vec!["name", "city"]);
        assert_eq!(
            preview.numeric_columns.len() + preview.non_numeric_columns.len(),
            preview.columns.len()
        );
    }

    #[test]
    fn test_numeric_looking_text_stays_non_numeric() {
        let table = table(
            &["code"],
            vec![vec![text("10")], vec![text("20")]],
        );
        let preview = UploadPreviewUseCase::new().execute(&table);

        assert!(preview.numeric_columns.is_empty());
        assert_eq!(preview.non_numeric_columns, vec!["code"]);
        assert!(preview.chart.is_none());
    }

    #[test]
    fn test_spec_scenario_name_score() {
        let table = table(
            &["name", "score"],
            vec![
                vec![text("a"), Cell::Float(10.0)],
                vec![text("b"), Cell::Empty],
            ],
        );
        let preview = UploadPreviewUseCase::new().execute(&table);

        assert_eq!(preview.numeric_columns, vec!["score"]);
        assert_eq!(preview.numeric_data["score"], json!([10.0, 0.0]));
        assert_eq!(preview.rows[0]["score"], json!(10));
        assert_eq!(preview.rows[1]["score"], json!(""));

        let chart = preview.chart.expect("chart should be present");
        assert_eq!(chart.x, "name");
        assert_eq!(chart.y, "score");
        assert_eq!(chart.labels, vec!["a", "b"]);
        assert_eq!(chart.values, vec![10.0, 0.0]);
    }

    #[test]
    fn test_no_numeric_columns_means_no_chart() {
        let table = table(
            &["name"],
            vec![vec![text("a")], vec![text("b")]],
        );
        let preview = UploadPreviewUseCase::new().execute(&table);

        assert!(preview.chart.is_none());
        assert!(preview.numeric_data.is_empty());
    }

    #[test]
    fn test_numeric_only_table_synthesizes_row_labels() {
        let table = table(
            &["q1", "q2"],
            vec![
                vec![Cell::Int(1), Cell::Int(4)],
                vec![Cell::Int(2), Cell::Int(5)],
                vec![Cell::Int(3), Cell::Int(6)],
            ],
        );
        let preview = UploadPreviewUseCase::new().execute(&table);

        let chart = preview.chart.expect("chart should be present");
        assert_eq!(chart.x, ROW_INDEX_LABEL);
        assert_eq!(chart.y, "q1");
        assert_eq!(chart.labels, vec!["1", "2", "3"]);
        assert_eq!(chart.values, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_series_length_matches_row_count() {
        let table = table(
            &["v"],
            vec![vec![Cell::Float(1.5)], vec![Cell::Empty], vec![Cell::Float(3.0)]],
        );
        let preview = UploadPreviewUseCase::new().execute(&table);

        assert_eq!(preview.numeric_data["v"], json!([1.5, 0.0, 3.0]));
    }

    #[test]
    fn test_all_empty_column_classifies_numeric() {
        let table = table(
            &["name", "blank"],
            vec![vec![text("a"), Cell::Empty], vec![text("b"), Cell::Empty]],
        );
        let preview = UploadPreviewUseCase::new().execute(&table);

        assert_eq!(preview.numeric_columns, vec!["blank"]);
        assert_eq!(preview.numeric_data["blank"], json!([0.0, 0.0]));
    }

    #[test]
    fn test_bool_column_is_non_numeric() {
        let table = table(
            &["flag", "v"],
            vec![
                vec![Cell::Bool(true), Cell::Int(1)],
                vec![Cell::Bool(false), Cell::Int(2)],
            ],
        );
        let preview = UploadPreviewUseCase::new().execute(&table);

        assert_eq!(preview.non_numeric_columns, vec!["flag"]);
        let chart = preview.chart.expect("chart should be present");
        assert_eq!(chart.x, "flag");
        assert_eq!(chart.labels, vec!["true", "false"]);
    }

    #[test]
    fn test_sanitized_rows_have_no_nulls() {
        let table = table(
            &["name", "score"],
            vec![vec![Cell::Empty, Cell::Empty]],
        );
        let preview = UploadPreviewUseCase::new().execute(&table);

        for row in &preview.rows {
            for value in row.values() {
                assert!(!value.is_null());
            }
        }
    }
}
