//! CSV rendering of tables for download.
//!
//! Header labels and string cells are double-quoted with inner quotes
//! escaped as `\"`; dates render as `yyyy-mm-dd`, numbers as plain
//! decimal tokens and absent cells as empty fields. Every row, the last
//! one included, ends with a newline.

use crate::{date::format_iso_date, table::Table, types::Value};
use std::fmt::Write;

pub fn escape_quotes(s: &str) -> String {
    s.replace('"', "\\\"")
}

pub fn to_csv(table: &Table) -> String {
    let mut out = String::new();

    let header: Vec<String> = table
        .columns()
        .iter()
        .map(|c| quoted(&c.label))
        .collect();
    out.push_str(&header.join(","));
    out.push('\n');

    for row in table.rows() {
        for (i, cell) in row.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            if let Some(value) = cell {
                write_value(&mut out, value);
            }
        }
        out.push('\n');
    }
    out
}

fn quoted(s: &str) -> String {
    format!("\"{}\"", escape_quotes(s))
}

fn write_value(out: &mut String, value: &Value) {
    match value {
        Value::Date(date) => out.push_str(&format_iso_date(date)),
        // writing into a String cannot fail
        Value::Number(n) => {
            let _ = write!(out, "{n}");
        }
        Value::String(s) => out.push_str(&quoted(s)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        tests::point_construction::{d, table_with_series},
        types::ColumnType,
    };
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn renders_header_and_typed_cells() {
        let mut table = Table::new();
        table.add_column("Date", ColumnType::Date);
        table.add_column("Say \"hi\"", ColumnType::String);
        table.add_column("Count", ColumnType::Number);
        let row = table.add_row();
        table.set_value(row, 0, d("2024-06-01")).unwrap();
        table.set_value(row, 1, "a \"quoted\" word").unwrap();
        table.set_value(row, 2, dec!(2.5)).unwrap();
        table.add_row();

        let expected = concat!(
            "\"Date\",\"Say \\\"hi\\\"\",\"Count\"\n",
            "2024-06-01,\"a \\\"quoted\\\" word\",2.5\n",
            ",,\n",
        );
        assert_eq!(to_csv(&table), expected);
    }

    #[test]
    fn absent_cells_render_empty() {
        let table = table_with_series(
            &["1.0", "2.0"],
            vec![
                ("2024-06-01", vec![Some(5), None]),
                ("2024-06-02", vec![None, Some(7)]),
            ],
        );
        let expected = "\"Date\",\"1.0\",\"2.0\"\n2024-06-01,5,\n2024-06-02,,7\n";
        assert_eq!(table.to_csv(), expected);
    }

    #[test]
    fn empty_table_has_only_header() {
        let table = table_with_series(&[], vec![]);
        assert_eq!(to_csv(table.table()), "\"Date\"\n");
        assert_eq!(to_csv(&Table::new()), "\n");
    }
}
