use crate::{error::TableError, time_series::TimeSeriesTable};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimelineView {
    #[default]
    ByDay,
    Cumulative,
}

/// By-day table together with its cumulative counterpart.
///
/// The cumulative view may be missing when its data could not be
/// obtained; the by-day view is always there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timeline {
    by_day: TimeSeriesTable,
    cumulative: Option<TimeSeriesTable>,
}

impl Timeline {
    /// Derives the cumulative view from a normalized, date-sorted
    /// by-day table.
    pub fn derive(by_day: TimeSeriesTable) -> Result<Self, TableError> {
        let cumulative = by_day.cumulative()?;
        Ok(Self {
            by_day,
            cumulative: Some(cumulative),
        })
    }

    /// Pairs tables built from separate payloads.
    pub fn from_parts(by_day: TimeSeriesTable, cumulative: Option<TimeSeriesTable>) -> Self {
        if cumulative.is_none() {
            tracing::warn!("cumulative timeline is unavailable, only by-day view is kept");
        }
        Self { by_day, cumulative }
    }

    pub fn by_day(&self) -> &TimeSeriesTable {
        &self.by_day
    }

    pub fn cumulative(&self) -> Option<&TimeSeriesTable> {
        self.cumulative.as_ref()
    }

    pub fn table(&self, view: TimelineView) -> Option<&TimeSeriesTable> {
        match view {
            TimelineView::ByDay => Some(&self.by_day),
            TimelineView::Cumulative => self.cumulative.as_ref(),
        }
    }

    pub fn to_csv(&self, view: TimelineView) -> Option<String> {
        self.table(view).map(TimeSeriesTable::to_csv)
    }

    /// Adds a total column to both views, see
    /// [`TimeSeriesTable::with_total_column`].
    pub fn with_total_column(&self) -> Result<Self, TableError> {
        Ok(Self {
            by_day: self.by_day.with_total_column()?,
            cumulative: self
                .cumulative
                .as_ref()
                .map(TimeSeriesTable::with_total_column)
                .transpose()?,
        })
    }
}
