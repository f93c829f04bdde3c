use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Date,
    Number,
    String,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnType::Date => "date",
            ColumnType::Number => "number",
            ColumnType::String => "string",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Column {
    pub label: String,
    pub kind: ColumnType,
}

impl Column {
    pub fn new(label: impl Into<String>, kind: ColumnType) -> Self {
        Self {
            label: label.into(),
            kind,
        }
    }
}

/// Present value of a table cell.
///
/// Ordering is only meaningful between values of the same kind,
/// which is always the case inside one column.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Value {
    Date(NaiveDate),
    Number(Decimal),
    String(String),
}

impl Value {
    pub fn kind(&self) -> ColumnType {
        match self {
            Value::Date(_) => ColumnType::Date,
            Value::Number(_) => ColumnType::Number,
            Value::String(_) => ColumnType::String,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<Decimal> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn zero() -> Self {
        Value::Number(Decimal::ZERO)
    }
}

impl From<NaiveDate> for Value {
    fn from(date: NaiveDate) -> Self {
        Value::Date(date)
    }
}

impl From<Decimal> for Value {
    fn from(number: Decimal) -> Self {
        Value::Number(number)
    }
}

macro_rules! impl_from_integer {
    ($($int:ty),+) => {
        $(
            impl From<$int> for Value {
                fn from(number: $int) -> Self {
                    Value::Number(Decimal::from(number))
                }
            }
        )+
    };
}

impl_from_integer!(i32, i64, u32, u64, usize);

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_owned())
    }
}

/// `None` marks an absent cell, which is distinct from zero
/// and from an empty string.
pub type Cell = Option<Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}
