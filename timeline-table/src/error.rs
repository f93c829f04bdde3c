use crate::types::ColumnType;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    #[error("column {index} is out of bounds; table has {len} columns")]
    ColumnOutOfBounds { index: usize, len: usize },
    #[error("row {index} is out of bounds; table has {len} rows")]
    RowOutOfBounds { index: usize, len: usize },
    #[error("column '{column}' holds {expected} values, got {found}")]
    TypeMismatch {
        column: String,
        expected: ColumnType,
        found: ColumnType,
    },
    #[error("key column '{0}' cannot be modified through this table")]
    KeyColumnImmutable(String),
    #[error("precondition violated: {0}")]
    PreconditionViolated(String),
    #[error("malformed input: {0}")]
    MalformedInput(String),
    #[error("arithmetic overflow in column '{column}' at row {row}")]
    Overflow { column: String, row: usize },
}

impl TableError {
    pub(crate) fn absent_cell(row: usize, column: &str) -> Self {
        Self::PreconditionViolated(format!(
            "absent cell at row {row} in column '{column}'; normalize missing values first"
        ))
    }

    pub(crate) fn overflow(row: usize, column: &str) -> Self {
        Self::Overflow {
            column: column.to_string(),
            row,
        }
    }

    pub(crate) fn not_numeric(column: &str, kind: ColumnType) -> Self {
        Self::PreconditionViolated(format!(
            "column '{column}' has type {kind}, only number columns can be summed"
        ))
    }
}
