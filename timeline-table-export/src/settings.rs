use chrono::NaiveDate;
use config::{Config, File};
use serde::{de, Deserialize, Serialize};
use std::path::{Path, PathBuf};
use timeline_table::{MissingValuePolicy, TimelineView};

pub const ENV_PREFIX: &str = "TIMELINE_EXPORT";

/// Wrapper under [`serde::de::IgnoredAny`] which implements
/// [`PartialEq`] and [`Eq`] for fields to be ignored.
#[derive(Copy, Clone, Debug, Default, Deserialize)]
struct IgnoredAny(de::IgnoredAny);

impl PartialEq for IgnoredAny {
    fn eq(&self, _other: &Self) -> bool {
        // We ignore that values, so they should not impact the equality
        true
    }
}

impl Eq for IgnoredAny {}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub export: ExportSettings,
    pub tracing: TracingSettings,

    // Is required as we deny unknown fields, but allow users provide
    // path to config through PREFIX__CONFIG env variable. If removed,
    // the setup would fail with `unknown field `config`, expected one of...`
    #[serde(skip_serializing, rename = "config")]
    config_path: IgnoredAny,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    #[default]
    Timeline,
    Geography,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ExportSettings {
    pub input_kind: InputKind,
    pub view: TimelineView,
    pub missing_value_policy: MissingValuePolicy,
    /// Applied to a separately supplied cumulative payload.
    pub cumulative_missing_value_policy: MissingValuePolicy,
    pub total_column: bool,
    /// Pre-seeds a row for every day of the range.
    pub seed_range: Option<DateRange>,
    /// JSON object mapping country codes to names.
    pub country_names: Option<PathBuf>,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            input_kind: InputKind::Timeline,
            view: TimelineView::ByDay,
            missing_value_policy: MissingValuePolicy::FillZero,
            cumulative_missing_value_policy: MissingValuePolicy::FillPrevious,
            total_column: false,
            seed_range: None,
            country_names: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TracingFormat {
    #[default]
    Default,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct TracingSettings {
    pub enabled: bool,
    pub format: TracingFormat,
}

impl Default for TracingSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            format: TracingFormat::Default,
        }
    }
}

impl Settings {
    /// Reads the config file at `config_path` (or the one named by
    /// `TIMELINE_EXPORT__CONFIG`), overlaid by `TIMELINE_EXPORT__*`
    /// environment variables.
    pub fn build(config_path: Option<&Path>) -> anyhow::Result<Self> {
        let config_path = config_path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var(format!("{ENV_PREFIX}__CONFIG")).ok().map(PathBuf::from));

        let mut builder = Config::builder();
        if let Some(config_path) = config_path {
            builder = builder.add_source(File::from(config_path));
        };
        // Use `__` so that it would be possible to address keys with underscores in names (e.g. `total_column`)
        builder = builder.add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"));

        let settings: Settings = builder.build()?.try_deserialize()?;

        Ok(settings)
    }
}
