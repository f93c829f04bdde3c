mod builder;
pub mod csv;
pub mod data_processing;
pub mod date;
mod error;
mod geography;
mod missing_value;
mod table;
mod time_series;
mod timeline;
mod types;


pub use builder::{build_timeline, TimelineData};
pub use error::TableError;
pub use geography::{CountryNames, GeographyTable, COUNTRY_COLUMN};
pub use missing_value::{fill_missing_values, MissingValuePolicy};
pub use table::Table;
pub use time_series::{TimeSeriesTable, DATE_COLUMN, DATE_COLUMN_LABEL};
pub use timeline::{Timeline, TimelineView};
pub use types::{Cell, Column, ColumnType, SortOrder, Value};
