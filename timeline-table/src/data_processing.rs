//! Derivations producing new tables from normalized ones.
//!
//! All functions here treat the first column as the row key and leave
//! it untouched. Inputs are never mutated.

use crate::{
    error::TableError,
    table::Table,
    types::{ColumnType, Value},
};
use rust_decimal::Decimal;

pub const TOTAL_COLUMN_LABEL: &str = "Total";

/// Running sum down every value column.
///
/// Requires no absent cells (checked) and rows sorted by the key
/// column (not checked).
///
/// Semantically inverse to [`deltas`].
pub fn cumsum(table: &Table) -> Result<Table, TableError> {
    let columns = numeric_value_columns(table)?;
    let mut result = table.clone();
    let mut sums = vec![Decimal::ZERO; columns.len()];
    for (i, row) in result.rows_mut().iter_mut().enumerate() {
        for (sum, &col) in sums.iter_mut().zip(&columns) {
            let value = number_at(table, row[col].as_ref(), i, col)?;
            *sum = sum
                .checked_add(value)
                .ok_or_else(|| overflow(table, i, col))?;
            row[col] = Some(Value::Number(*sum));
        }
    }
    Ok(result)
}

/// Difference between every value cell and the one above it;
/// the first row is kept as is.
///
/// Same preconditions as [`cumsum`], to which it is semantically inverse.
pub fn deltas(table: &Table) -> Result<Table, TableError> {
    let columns = numeric_value_columns(table)?;
    let mut result = table.clone();
    let mut previous = vec![Decimal::ZERO; columns.len()];
    for (i, row) in result.rows_mut().iter_mut().enumerate() {
        for (prev, &col) in previous.iter_mut().zip(&columns) {
            let value = number_at(table, row[col].as_ref(), i, col)?;
            let delta = value
                .checked_sub(*prev)
                .ok_or_else(|| overflow(table, i, col))?;
            row[col] = Some(Value::Number(delta));
            *prev = value;
        }
    }
    Ok(result)
}

/// Appends a [`TOTAL_COLUMN_LABEL`] column holding the per-row sum of all
/// value columns.
///
/// With fewer than two value columns the table is returned unchanged.
pub fn with_total_column(table: &Table) -> Result<Table, TableError> {
    if table.num_columns() <= 2 {
        return Ok(table.clone());
    }
    let columns = numeric_value_columns(table)?;
    let mut totals = Vec::with_capacity(table.num_rows());
    for (i, row) in table.rows().iter().enumerate() {
        let mut total = Decimal::ZERO;
        for &col in &columns {
            let value = number_at(table, row[col].as_ref(), i, col)?;
            total = total
                .checked_add(value)
                .ok_or_else(|| TableError::overflow(i, TOTAL_COLUMN_LABEL))?;
        }
        totals.push(total);
    }

    let mut result = table.clone();
    let total_col = result.add_column(TOTAL_COLUMN_LABEL, ColumnType::Number);
    for (row, total) in result.rows_mut().iter_mut().zip(totals) {
        row[total_col] = Some(Value::Number(total));
    }
    Ok(result)
}

fn numeric_value_columns(table: &Table) -> Result<Vec<usize>, TableError> {
    table
        .columns()
        .iter()
        .enumerate()
        .skip(1)
        .map(|(i, column)| match column.kind {
            ColumnType::Number => Ok(i),
            kind => Err(TableError::not_numeric(&column.label, kind)),
        })
        .collect()
}

fn overflow(table: &Table, row: usize, col: usize) -> TableError {
    TableError::overflow(row, &table.columns()[col].label)
}

fn number_at(
    table: &Table,
    value: Option<&Value>,
    row: usize,
    col: usize,
) -> Result<Decimal, TableError> {
    let label = &table.columns()[col].label;
    match value {
        Some(Value::Number(n)) => Ok(*n),
        Some(other) => Err(TableError::not_numeric(label, other.kind())),
        None => Err(TableError::absent_cell(row, label)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::point_construction::{table_with_series, table_with_series_decimal};
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn test_cumsum_works_int() {
        let test_cases = [
            // Empty table
            (vec![], vec![]),
            // Normal case: 3 sequential dates with increments
            (
                vec![
                    ("2100-01-01", vec![Some(10), Some(1)]),
                    ("2100-01-02", vec![Some(20), Some(0)]),
                    ("2100-01-03", vec![Some(30), Some(2)]),
                ],
                vec![
                    ("2100-01-01", vec![Some(10), Some(1)]),
                    ("2100-01-02", vec![Some(30), Some(1)]),
                    ("2100-01-03", vec![Some(60), Some(3)]),
                ],
            ),
            // Increments and decrements
            (
                vec![
                    ("2100-01-01", vec![Some(0), Some(5)]),
                    ("2100-01-02", vec![Some(-10), Some(-5)]),
                    ("2100-01-03", vec![Some(20), Some(0)]),
                ],
                vec![
                    ("2100-01-01", vec![Some(0), Some(5)]),
                    ("2100-01-02", vec![Some(-10), Some(0)]),
                    ("2100-01-03", vec![Some(10), Some(0)]),
                ],
            ),
            // Missing dates are not synthesized
            (
                vec![
                    ("2100-01-01", vec![Some(10), Some(0)]),
                    ("2100-01-05", vec![Some(20), Some(0)]),
                    ("2100-01-10", vec![Some(30), Some(1)]),
                ],
                vec![
                    ("2100-01-01", vec![Some(10), Some(0)]),
                    ("2100-01-05", vec![Some(30), Some(0)]),
                    ("2100-01-10", vec![Some(60), Some(1)]),
                ],
            ),
        ];

        for (data, expected) in test_cases {
            let input = table_with_series(&["A", "B"], data);
            let actual = cumsum(input.table()).unwrap();
            assert_eq!(table_with_series(&["A", "B"], expected).table(), &actual);
        }
    }

    #[test]
    fn test_cumsum_works_decimal() {
        let input = table_with_series_decimal(
            &["A"],
            vec![
                ("2100-01-01", vec![Some(dec!(100.5))]),
                ("2100-01-02", vec![Some(dec!(110.75))]),
                ("2100-01-03", vec![Some(dec!(120.25))]),
            ],
        );
        let expected = table_with_series_decimal(
            &["A"],
            vec![
                ("2100-01-01", vec![Some(dec!(100.5))]),
                ("2100-01-02", vec![Some(dec!(211.25))]),
                ("2100-01-03", vec![Some(dec!(331.5))]),
            ],
        );
        assert_eq!(expected.table(), &cumsum(input.table()).unwrap());
    }

    #[test]
    fn test_cumsum_does_not_mutate_input() {
        let input = table_with_series(
            &["A"],
            vec![("2100-01-01", vec![Some(1)]), ("2100-01-02", vec![Some(2)])],
        );
        let before = input.clone();
        let _ = cumsum(input.table()).unwrap();
        assert_eq!(before, input);
    }

    #[test]
    fn test_cumsum_rejects_absent_cells() {
        let input = table_with_series(
            &["A", "B"],
            vec![
                ("2100-01-01", vec![Some(1), Some(1)]),
                ("2100-01-02", vec![Some(2), None]),
            ],
        );
        let err = cumsum(input.table()).unwrap_err();
        assert_eq!(err, TableError::absent_cell(1, "B"));
    }

    #[test]
    fn test_deltas_works_int() {
        let test_cases = [
            (vec![], vec![]),
            (
                vec![
                    ("2100-01-01", vec![Some(100)]),
                    ("2100-01-02", vec![Some(110)]),
                    ("2100-01-03", vec![Some(90)]),
                ],
                vec![
                    ("2100-01-01", vec![Some(100)]),
                    ("2100-01-02", vec![Some(10)]),
                    ("2100-01-03", vec![Some(-20)]),
                ],
            ),
        ];

        for (data, expected) in test_cases {
            let input = table_with_series(&["A"], data);
            let actual = deltas(input.table()).unwrap();
            assert_eq!(table_with_series(&["A"], expected).table(), &actual);
        }
    }

    #[test]
    fn test_deltas_inverts_cumsum() {
        let input = table_with_series(
            &["A", "B"],
            vec![
                ("2100-01-01", vec![Some(3), Some(0)]),
                ("2100-01-04", vec![Some(0), Some(7)]),
                ("2100-01-05", vec![Some(12), Some(1)]),
            ],
        );
        let roundtrip = deltas(&cumsum(input.table()).unwrap()).unwrap();
        assert_eq!(input.table(), &roundtrip);
    }

    #[test]
    fn test_total_column_sums_value_columns() {
        let input = table_with_series(
            &["A", "B"],
            vec![
                ("2100-01-01", vec![Some(2), Some(3)]),
                ("2100-01-02", vec![Some(0), Some(4)]),
            ],
        );
        let actual = with_total_column(input.table()).unwrap();
        let expected = table_with_series(
            &["A", "B", "Total"],
            vec![
                ("2100-01-01", vec![Some(2), Some(3), Some(5)]),
                ("2100-01-02", vec![Some(0), Some(4), Some(4)]),
            ],
        );
        assert_eq!(expected.table(), &actual);
    }

    #[test]
    fn test_total_column_is_noop_for_single_series() {
        for labels in [vec![], vec!["A"]] {
            let data = if labels.is_empty() {
                vec![("2100-01-01", vec![])]
            } else {
                vec![("2100-01-01", vec![Some(2)])]
            };
            let input = table_with_series(&labels, data);
            let actual = with_total_column(input.table()).unwrap();
            assert_eq!(input.table(), &actual);
        }
    }

    #[test]
    fn test_total_column_rejects_absent_cells() {
        let input = table_with_series(&["A", "B"], vec![("2100-01-01", vec![Some(2), None])]);
        let err = with_total_column(input.table()).unwrap_err();
        assert_eq!(err, TableError::absent_cell(0, "B"));
    }

    #[test]
    fn test_sums_report_overflow() {
        let huge = Some(Decimal::MAX);
        let column = table_with_series_decimal(
            &["A"],
            vec![("2100-01-01", vec![huge]), ("2100-01-02", vec![huge])],
        );
        assert_eq!(
            cumsum(column.table()).unwrap_err(),
            TableError::overflow(1, "A")
        );

        let row = table_with_series_decimal(&["A", "B"], vec![("2100-01-01", vec![huge, huge])]);
        assert_eq!(
            with_total_column(row.table()).unwrap_err(),
            TableError::overflow(0, TOTAL_COLUMN_LABEL)
        );

        let swing = table_with_series_decimal(
            &["A"],
            vec![
                ("2100-01-01", vec![Some(Decimal::MIN)]),
                ("2100-01-02", vec![huge]),
            ],
        );
        assert_eq!(
            deltas(swing.table()).unwrap_err(),
            TableError::overflow(1, "A")
        );
    }

    #[test]
    fn test_sums_reject_string_columns() {
        let mut table = Table::new();
        table.add_column("Country", ColumnType::String);
        table.add_column("A", ColumnType::Number);
        table.add_column("Name", ColumnType::String);

        let expected = TableError::not_numeric("Name", ColumnType::String);
        assert_eq!(with_total_column(&table).unwrap_err(), expected);
        assert_eq!(cumsum(&table).unwrap_err(), expected);
    }
}
