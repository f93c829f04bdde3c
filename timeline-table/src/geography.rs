//! Per-country metric tables.
//!
//! Same table model as the timeline, keyed by a country code string
//! instead of a date, and without any ordering requirement.

use crate::{
    builder::json_to_decimal,
    csv, data_processing,
    error::TableError,
    missing_value::{fill_missing_values, MissingValuePolicy},
    table::Table,
    types::{Cell, ColumnType, SortOrder, Value},
};
use serde_json::Value as JsonValue;
use std::collections::HashMap;

pub const COUNTRY_COLUMN: usize = 0;

/// Country code to display name lookup, supplied by the caller.
pub type CountryNames = HashMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeographyTable {
    table: Table,
}

impl AsRef<Table> for GeographyTable {
    fn as_ref(&self) -> &Table {
        &self.table
    }
}

impl GeographyTable {
    pub fn new<L, M>(key_label: L, metric_labels: M) -> Self
    where
        L: Into<String>,
        M: IntoIterator,
        M::Item: Into<String>,
    {
        let mut table = Table::new();
        table.add_column(key_label, ColumnType::String);
        for label in metric_labels {
            table.add_column(label, ColumnType::Number);
        }
        Self { table }
    }

    /// Builds the table from a backend payload: an array of arrays whose
    /// first row holds the column labels.
    ///
    /// Nulls and cells of the wrong kind become absent; short rows are
    /// padded with absent cells and over-long rows are truncated.
    pub fn from_json_rows(rows: &[Vec<JsonValue>]) -> Result<Self, TableError> {
        let (header, data) = rows
            .split_first()
            .ok_or_else(|| TableError::MalformedInput("missing header row".to_string()))?;
        let (key_label, metric_labels) = header
            .split_first()
            .ok_or_else(|| TableError::MalformedInput("empty header row".to_string()))?;

        let mut result = Self::new(json_label(key_label), metric_labels.iter().map(json_label));
        let width = result.table.num_columns();
        for (i, raw) in data.iter().enumerate() {
            if raw.len() > width {
                tracing::warn!(
                    row = i,
                    cells = raw.len(),
                    columns = width,
                    "truncating geography row"
                );
            }
            let row = result.table.add_row();
            for (col, value) in raw.iter().take(width).enumerate() {
                let cell = if col == COUNTRY_COLUMN {
                    json_key(value)
                } else {
                    json_metric(value)
                };
                if cell.is_none() && !value.is_null() {
                    tracing::warn!(row = i, column = col, value = %value, "unexpected cell value");
                }
                result.table.set_cell(row, col, cell)?;
            }
        }
        tracing::debug!(rows = result.table.num_rows(), "built geography table");
        Ok(result)
    }

    pub fn from_json_str(s: &str) -> Result<Self, TableError> {
        let rows: Vec<Vec<JsonValue>> =
            serde_json::from_str(s).map_err(|e| TableError::MalformedInput(e.to_string()))?;
        Self::from_json_rows(&rows)
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    /// Appends a row and returns its index. The table is left unchanged
    /// if the cells do not fit its columns.
    pub fn add_row<K, M>(&mut self, key: K, metrics: M) -> Result<usize, TableError>
    where
        K: Into<String>,
        M: IntoIterator<Item = Cell>,
    {
        let mut cells = vec![Some(Value::String(key.into()))];
        cells.extend(metrics);
        let columns = self.table.columns();
        if cells.len() > columns.len() {
            return Err(TableError::ColumnOutOfBounds {
                index: cells.len() - 1,
                len: columns.len(),
            });
        }
        for (column, value) in columns.iter().zip(&cells) {
            if let Some(value) = value {
                if value.kind() != column.kind {
                    return Err(TableError::TypeMismatch {
                        column: column.label.clone(),
                        expected: column.kind,
                        found: value.kind(),
                    });
                }
            }
        }
        let row = self.table.add_row();
        for (col, cell) in cells.into_iter().enumerate() {
            self.table.set_cell(row, col, cell)?;
        }
        Ok(row)
    }

    /// Copy whose key column carries country names instead of codes.
    /// Codes missing from `names` are kept as is.
    pub fn with_country_names(&self, names: &CountryNames) -> Self {
        let mut table = self.table.clone();
        for row in table.rows_mut() {
            if let Some(Value::String(code)) = &row[COUNTRY_COLUMN] {
                if let Some(name) = names.get(code) {
                    row[COUNTRY_COLUMN] = Some(Value::String(name.clone()));
                }
            }
        }
        Self { table }
    }

    pub fn sort_by_column(&mut self, column: usize, order: SortOrder) -> Result<(), TableError> {
        self.table.sort_by_column(column, order)
    }

    pub fn fill_missing(&mut self, policy: MissingValuePolicy) {
        fill_missing_values(&mut self.table, policy);
    }

    pub fn with_total_column(&self) -> Result<Self, TableError> {
        data_processing::with_total_column(&self.table).map(|table| Self { table })
    }

    pub fn to_csv(&self) -> String {
        csv::to_csv(&self.table)
    }
}

fn json_label(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}

fn json_key(value: &JsonValue) -> Cell {
    match value {
        JsonValue::String(s) => Some(Value::String(s.clone())),
        JsonValue::Number(n) => Some(Value::String(n.to_string())),
        _ => None,
    }
}

fn json_metric(value: &JsonValue) -> Cell {
    json_to_decimal(value).map(Value::Number)
}
