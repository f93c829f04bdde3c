//! Building by-day tables out of per-series `(date, count)` points.

use crate::{date::parse_iso_date, error::TableError, time_series::TimeSeriesTable};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use std::str::FromStr;

/// Builds a date-sorted table with one numeric column per series
/// (in iteration order) and one row per distinct parsable date.
///
/// Points with an unparsable date are skipped. Cells of dates that a
/// series has no point for stay absent; gap dates missing from every
/// series get no row at all.
pub fn build_timeline<I, L, P, D>(series: I) -> TimeSeriesTable
where
    I: IntoIterator<Item = (L, P)>,
    L: Into<String>,
    P: IntoIterator<Item = (D, Decimal)>,
    D: AsRef<str>,
{
    let mut table = TimeSeriesTable::new();
    let mut skipped = 0usize;
    for (label, points) in series {
        let label = label.into();
        let col = table.add_series(label.as_str());
        for (date, count) in points {
            let Some(date) = parse_iso_date(date.as_ref()) else {
                tracing::warn!(
                    series = %label,
                    date = date.as_ref(),
                    "skipping point with unparsable date"
                );
                skipped += 1;
                continue;
            };
            // `col` is a series column of this very table
            if let Err(err) = table.set_point(date, col, count) {
                tracing::warn!(series = %label, err = %err, "skipping point");
                skipped += 1;
            }
        }
    }
    table.sort_by_date();
    tracing::debug!(
        series = table.series_labels().count(),
        rows = table.num_rows(),
        skipped,
        "built timeline table"
    );
    table
}

/// Timeline payload as served by the backend:
/// `{ "series": [["yyyy-mm-dd", count], ...], ... }`.
///
/// Series order is preserved.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimelineData(Map<String, JsonValue>);

impl TimelineData {
    pub fn from_json_str(s: &str) -> Result<Self, TableError> {
        serde_json::from_str(s).map_err(|e| TableError::MalformedInput(e.to_string()))
    }

    pub fn num_series(&self) -> usize {
        self.0.len()
    }

    /// Series with their well-formed points; malformed points are
    /// dropped with a warning. Dates are not validated here.
    pub fn series(&self) -> impl Iterator<Item = (&str, Vec<(&str, Decimal)>)> {
        self.0.iter().map(|(label, points)| {
            let points = match points.as_array() {
                Some(points) => points
                    .iter()
                    .filter_map(|point| {
                        let parsed = parse_point(point);
                        if parsed.is_none() {
                            tracing::warn!(
                                series = %label,
                                point = %point,
                                "dropping malformed timeline point"
                            );
                        }
                        parsed
                    })
                    .collect(),
                None => {
                    tracing::warn!(series = %label, "series points are not an array");
                    Vec::new()
                }
            };
            (label.as_str(), points)
        })
    }

    pub fn build(&self) -> TimeSeriesTable {
        build_timeline(self.series())
    }
}

fn parse_point(point: &JsonValue) -> Option<(&str, Decimal)> {
    match point.as_array()?.as_slice() {
        [date, count, ..] => Some((date.as_str()?, json_to_decimal(count)?)),
        _ => None,
    }
}

pub(crate) fn json_to_decimal(value: &JsonValue) -> Option<Decimal> {
    match value {
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(Decimal::from(i))
            } else if let Some(u) = n.as_u64() {
                Some(Decimal::from(u))
            } else {
                n.as_f64().and_then(|f| Decimal::try_from(f).ok())
            }
        }
        JsonValue::String(s) => Decimal::from_str(s.trim()).ok(),
        _ => None,
    }
}
