use crate::{
    csv,
    data_processing,
    error::TableError,
    missing_value::{fill_missing_values, MissingValuePolicy},
    table::Table,
    types::{Cell, ColumnType, Value},
};
use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use std::collections::HashMap;

pub const DATE_COLUMN_LABEL: &str = "Date";
pub const DATE_COLUMN: usize = 0;

/// Table keyed by date: the first column is always the `Date` column
/// and every other column is one numeric series.
///
/// Holds at most one row per date. Rows are kept in insertion order
/// until [`TimeSeriesTable::sort_by_date`] is called.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeSeriesTable {
    table: Table,
    date_index: HashMap<NaiveDate, usize>,
}

impl Default for TimeSeriesTable {
    fn default() -> Self {
        Self::new()
    }
}

impl AsRef<Table> for TimeSeriesTable {
    fn as_ref(&self) -> &Table {
        &self.table
    }
}

impl TimeSeriesTable {
    pub fn new() -> Self {
        let mut table = Table::new();
        table.add_column(DATE_COLUMN_LABEL, ColumnType::Date);
        Self {
            table,
            date_index: HashMap::new(),
        }
    }

    /// Wraps a table whose first column is a date column with unique,
    /// present dates.
    pub fn from_table(table: Table) -> Result<Self, TableError> {
        let key = table.column(DATE_COLUMN)?;
        if key.kind != ColumnType::Date {
            return Err(TableError::MalformedInput(format!(
                "first column '{}' must hold dates, found {}",
                key.label, key.kind
            )));
        }
        let mut date_index = HashMap::with_capacity(table.num_rows());
        for (i, row) in table.rows().iter().enumerate() {
            let date = row[DATE_COLUMN]
                .as_ref()
                .and_then(Value::as_date)
                .ok_or_else(|| TableError::MalformedInput(format!("row {i} has no date")))?;
            if date_index.insert(date, i).is_some() {
                return Err(TableError::MalformedInput(format!(
                    "date {date} appears more than once"
                )));
            }
        }
        Ok(Self { table, date_index })
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn num_rows(&self) -> usize {
        self.table.num_rows()
    }

    pub fn series_labels(&self) -> impl Iterator<Item = &str> {
        self.table
            .columns()
            .iter()
            .skip(1)
            .map(|c| c.label.as_str())
    }

    pub fn series_index(&self, label: &str) -> Option<usize> {
        self.table
            .columns()
            .iter()
            .skip(1)
            .position(|c| c.label == label)
            .map(|i| i + 1)
    }

    /// Adds a numeric series column, or returns the existing one with
    /// the same label.
    pub fn add_series(&mut self, label: impl Into<String>) -> usize {
        let label = label.into();
        match self.series_index(&label) {
            Some(index) => index,
            None => self.table.add_column(label, ColumnType::Number),
        }
    }

    pub fn row_of(&self, date: &NaiveDate) -> Option<usize> {
        self.date_index.get(date).copied()
    }

    /// Row holding `date`, appended with absent values if there is none yet.
    pub fn row_for_date(&mut self, date: NaiveDate) -> usize {
        if let Some(row) = self.date_index.get(&date) {
            return *row;
        }
        let row = self.table.add_row();
        self.table.rows_mut()[row][DATE_COLUMN] = Some(Value::Date(date));
        self.date_index.insert(date, row);
        row
    }

    /// Sets the value of `series` on `date`, creating the row if needed.
    /// A later point for the same date and series replaces the earlier one.
    pub fn set_point(
        &mut self,
        date: NaiveDate,
        series: usize,
        value: Decimal,
    ) -> Result<(), TableError> {
        self.check_series_column(series)?;
        let row = self.row_for_date(date);
        self.table.set_value(row, series, value)
    }

    pub fn set_cell(&mut self, row: usize, series: usize, cell: Cell) -> Result<(), TableError> {
        self.check_series_column(series)?;
        self.table.set_cell(row, series, cell)
    }

    pub fn value_at(&self, date: &NaiveDate, series: usize) -> Result<Option<&Value>, TableError> {
        match self.row_of(date) {
            Some(row) => self.table.value(row, series),
            None => Ok(None),
        }
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.table
            .rows()
            .iter()
            .filter_map(|row| row[DATE_COLUMN].as_ref().and_then(Value::as_date))
    }

    pub fn is_sorted(&self) -> bool {
        let dates: Vec<_> = self.dates().collect();
        dates.windows(2).all(|w| w[0] <= w[1])
    }

    pub fn sort_by_date(&mut self) {
        self.table
            .rows_mut()
            .sort_by_key(|row| row[DATE_COLUMN].as_ref().and_then(Value::as_date));
        self.rebuild_index();
    }

    /// Ensures a row exists for every day in `from..=to`, then sorts by date.
    ///
    /// Rows are never synthesized for gaps otherwise; this is the opt-in
    /// for a dense calendar.
    pub fn seed_dates(&mut self, from: NaiveDate, to: NaiveDate) {
        let mut current = Some(from);
        while let Some(date) = current.filter(|date| *date <= to) {
            self.row_for_date(date);
            current = date.checked_add_days(Days::new(1));
        }
        self.sort_by_date();
    }

    pub fn fill_missing(&mut self, policy: MissingValuePolicy) {
        fill_missing_values(&mut self.table, policy);
    }

    /// Cumulative view of a normalized, date-sorted by-day table.
    pub fn cumulative(&self) -> Result<Self, TableError> {
        let table = data_processing::cumsum(&self.table)?;
        Ok(self.with_table(table))
    }

    /// By-day view of a normalized, date-sorted cumulative table.
    pub fn deltas(&self) -> Result<Self, TableError> {
        let table = data_processing::deltas(&self.table)?;
        Ok(self.with_table(table))
    }

    /// Copy with a trailing [`data_processing::TOTAL_COLUMN_LABEL`] series, see
    /// [`data_processing::with_total_column`].
    pub fn with_total_column(&self) -> Result<Self, TableError> {
        let table = data_processing::with_total_column(&self.table)?;
        Ok(self.with_table(table))
    }

    pub fn to_csv(&self) -> String {
        csv::to_csv(&self.table)
    }

    fn check_series_column(&self, series: usize) -> Result<(), TableError> {
        let column = self.table.column(series)?;
        if series == DATE_COLUMN {
            return Err(TableError::KeyColumnImmutable(column.label.clone()));
        }
        Ok(())
    }

    // derived tables keep rows in place, so the index stays valid
    fn with_table(&self, table: Table) -> Self {
        Self {
            table,
            date_index: self.date_index.clone(),
        }
    }

    fn rebuild_index(&mut self) {
        self.date_index = self
            .table
            .rows()
            .iter()
            .enumerate()
            .filter_map(|(i, row)| {
                row[DATE_COLUMN]
                    .as_ref()
                    .and_then(Value::as_date)
                    .map(|d| (d, i))
            })
            .collect();
    }
}
