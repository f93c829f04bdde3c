use crate::{
    error::TableError,
    types::{Cell, Column, ColumnType, SortOrder, Value},
};
use std::cmp::Ordering;

/// Columnar table with typed columns and positionally aligned rows.
///
/// Every row always holds exactly one cell per column. Columns are only
/// ever appended; adding one extends all existing rows with absent cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    columns: Vec<Column>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn column(&self, index: usize) -> Result<&Column, TableError> {
        self.columns.get(index).ok_or(TableError::ColumnOutOfBounds {
            index,
            len: self.columns.len(),
        })
    }

    pub fn column_index(&self, label: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.label == label)
    }

    pub fn row(&self, index: usize) -> Result<&[Cell], TableError> {
        self.rows
            .get(index)
            .map(Vec::as_slice)
            .ok_or(TableError::RowOutOfBounds {
                index,
                len: self.rows.len(),
            })
    }

    /// Returns index of the new column.
    pub fn add_column(&mut self, label: impl Into<String>, kind: ColumnType) -> usize {
        self.columns.push(Column::new(label, kind));
        for row in self.rows.iter_mut() {
            row.push(None);
        }
        self.columns.len() - 1
    }

    /// Appends a row of absent cells and returns its index.
    pub fn add_row(&mut self) -> usize {
        self.rows.push(vec![None; self.columns.len()]);
        self.rows.len() - 1
    }

    pub fn cell(&self, row: usize, column: usize) -> Result<&Cell, TableError> {
        self.column(column)?;
        let row = self.row(row)?;
        Ok(&row[column])
    }

    pub fn value(&self, row: usize, column: usize) -> Result<Option<&Value>, TableError> {
        self.cell(row, column).map(Option::as_ref)
    }

    pub fn set_cell(&mut self, row: usize, column: usize, cell: Cell) -> Result<(), TableError> {
        let expected = self.column(column)?;
        if let Some(value) = &cell {
            if value.kind() != expected.kind {
                return Err(TableError::TypeMismatch {
                    column: expected.label.clone(),
                    expected: expected.kind,
                    found: value.kind(),
                });
            }
        }
        let len = self.rows.len();
        let row = self
            .rows
            .get_mut(row)
            .ok_or(TableError::RowOutOfBounds { index: row, len })?;
        row[column] = cell;
        Ok(())
    }

    pub fn set_value(
        &mut self,
        row: usize,
        column: usize,
        value: impl Into<Value>,
    ) -> Result<(), TableError> {
        self.set_cell(row, column, Some(value.into()))
    }

    /// Stable sort of whole rows by one column.
    ///
    /// Absent cells go first in ascending order and last in descending.
    pub fn sort_by_column(&mut self, column: usize, order: SortOrder) -> Result<(), TableError> {
        self.column(column)?;
        self.rows.sort_by(|a, b| {
            let ord: Ordering = a[column].cmp(&b[column]);
            match order {
                SortOrder::Ascending => ord,
                SortOrder::Descending => ord.reverse(),
            }
        });
        Ok(())
    }

    pub(crate) fn rows_mut(&mut self) -> &mut [Vec<Cell>] {
        &mut self.rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn two_column_table() -> Table {
        let mut table = Table::new();
        table.add_column("Country", ColumnType::String);
        table.add_column("Downloads", ColumnType::Number);
        table
    }

    #[test]
    fn new_column_extends_existing_rows() {
        let mut table = two_column_table();
        let row = table.add_row();
        table.set_value(row, 0, "US").unwrap();

        let col = table.add_column("Users", ColumnType::Number);

        assert_eq!(col, 2);
        assert_eq!(table.num_columns(), 3);
        assert_eq!(table.row(row).unwrap().len(), 3);
        assert_eq!(table.cell(row, col).unwrap(), &None);
    }

    #[test]
    fn set_value_checks_column_type() {
        let mut table = two_column_table();
        let row = table.add_row();

        let err = table.set_value(row, 1, "oops").unwrap_err();

        assert_eq!(
            err,
            TableError::TypeMismatch {
                column: "Downloads".to_string(),
                expected: ColumnType::Number,
                found: ColumnType::String,
            }
        );
        assert_eq!(table.cell(row, 1).unwrap(), &None);
    }

    #[test]
    fn out_of_bounds_access_is_reported() {
        let mut table = two_column_table();
        table.add_row();

        assert_eq!(
            table.cell(0, 5).unwrap_err(),
            TableError::ColumnOutOfBounds { index: 5, len: 2 }
        );
        assert_eq!(
            table.set_value(3, 1, 1).unwrap_err(),
            TableError::RowOutOfBounds { index: 3, len: 1 }
        );
    }

    #[test]
    fn sort_by_column_keeps_rows_together() {
        let mut table = two_column_table();
        for (country, downloads) in [("CA", Some(5)), ("US", Some(20)), ("DE", None)] {
            let row = table.add_row();
            table.set_value(row, 0, country).unwrap();
            if let Some(d) = downloads {
                table.set_value(row, 1, d).unwrap();
            }
        }

        table.sort_by_column(1, SortOrder::Descending).unwrap();
        let countries: Vec<_> = table
            .rows()
            .iter()
            .map(|r| r[0].as_ref().and_then(Value::as_str).unwrap().to_string())
            .collect();
        assert_eq!(countries, vec!["US", "CA", "DE"]);
        assert_eq!(table.value(0, 1).unwrap(), Some(&Value::Number(dec!(20))));

        table.sort_by_column(1, SortOrder::Ascending).unwrap();
        assert_eq!(table.value(0, 1).unwrap(), None);
    }
}
