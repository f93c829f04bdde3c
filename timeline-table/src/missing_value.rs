use crate::{
    table::Table,
    types::{ColumnType, Value},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How absent cells of value columns are normalized.
///
/// Daily counts usually want [`MissingValuePolicy::FillZero`], while
/// inherently cumulative series with gaps want
/// [`MissingValuePolicy::FillPrevious`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingValuePolicy {
    #[default]
    FillZero,
    FillPrevious,
}

/// Normalizes absent cells of every number column except the key (first) one.
///
/// `FillPrevious` assumes rows are already sorted by the key column.
/// Both policies are idempotent.
pub fn fill_missing_values(table: &mut Table, policy: MissingValuePolicy) {
    let value_columns: Vec<usize> = table
        .columns()
        .iter()
        .enumerate()
        .skip(1)
        .filter(|(_, c)| c.kind == ColumnType::Number)
        .map(|(i, _)| i)
        .collect();
    let filled = match policy {
        MissingValuePolicy::FillZero => fill_zeros(table, &value_columns),
        MissingValuePolicy::FillPrevious => fill_previous(table, &value_columns),
    };
    tracing::debug!(policy =? policy, filled, "filled missing values");
}

fn fill_zeros(table: &mut Table, columns: &[usize]) -> usize {
    let mut filled = 0;
    for row in table.rows_mut() {
        for &col in columns {
            if row[col].is_none() {
                row[col] = Some(Value::zero());
                filled += 1;
            }
        }
    }
    filled
}

fn fill_previous(table: &mut Table, columns: &[usize]) -> usize {
    let mut filled = 0;
    let mut previous: Vec<Value> = vec![Value::Number(Decimal::ZERO); columns.len()];
    for row in table.rows_mut() {
        for (prev, &col) in previous.iter_mut().zip(columns) {
            match &row[col] {
                Some(value) => *prev = value.clone(),
                None => {
                    row[col] = Some(prev.clone());
                    filled += 1;
                }
            }
        }
    }
    filled
}
