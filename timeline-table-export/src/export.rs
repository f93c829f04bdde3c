use crate::{
    cli::Args,
    settings::{ExportSettings, InputKind, Settings},
};
use anyhow::Context;
use std::{fs, io::Write, path::Path};
use timeline_table::{
    CountryNames, GeographyTable, MissingValuePolicy, TimeSeriesTable, Timeline, TimelineData,
};

fn build_series(
    json: &str,
    settings: &ExportSettings,
    policy: MissingValuePolicy,
) -> anyhow::Result<TimeSeriesTable> {
    let data = TimelineData::from_json_str(json)?;
    tracing::debug!(series = data.num_series(), "parsed timeline payload");
    let mut table = data.build();
    if let Some(range) = settings.seed_range {
        table.seed_dates(range.from, range.to);
    }
    table.fill_missing(policy);
    Ok(table)
}

/// Builds the by-day table from `by_day_json` and renders the configured view.
/// Without `cumulative_json` the cumulative view is derived by running sums.
pub fn export_timeline(
    by_day_json: &str,
    cumulative_json: Option<&str>,
    settings: &ExportSettings,
) -> anyhow::Result<String> {
    let by_day = build_series(by_day_json, settings, settings.missing_value_policy)
        .context("invalid by-day timeline")?;
    let timeline = match cumulative_json {
        Some(json) => {
            let cumulative =
                build_series(json, settings, settings.cumulative_missing_value_policy)
                    .context("invalid cumulative timeline")?;
            Timeline::from_parts(by_day, Some(cumulative))
        }
        None => Timeline::derive(by_day)?,
    };
    let timeline = if settings.total_column {
        timeline.with_total_column()?
    } else {
        timeline
    };
    tracing::debug!(
        series = timeline.by_day().series_labels().count(),
        rows = timeline.by_day().num_rows(),
        view = ?settings.view,
        "built timeline"
    );
    timeline
        .to_csv(settings.view)
        .with_context(|| format!("{:?} view is not available", settings.view))
}

pub fn export_geography(
    json: &str,
    names: Option<&CountryNames>,
    settings: &ExportSettings,
) -> anyhow::Result<String> {
    let mut table = GeographyTable::from_json_str(json).context("invalid geography table")?;
    table.fill_missing(settings.missing_value_policy);
    if let Some(names) = names {
        table = table.with_country_names(names);
    }
    if settings.total_column {
        table = table.with_total_column()?;
    }
    tracing::debug!(rows = table.table().num_rows(), "built geography table");
    Ok(table.to_csv())
}

fn read_input(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn read_country_names(path: &Path) -> anyhow::Result<CountryNames> {
    let content = read_input(path)?;
    serde_json::from_str(&content)
        .with_context(|| format!("invalid country names in {}", path.display()))
}

pub fn run(args: &Args, settings: &Settings) -> anyhow::Result<()> {
    let export = &settings.export;
    tracing::info!(
        input = %args.input.display(),
        kind = ?export.input_kind,
        "starting export"
    );
    let input = read_input(&args.input)?;
    let csv = match export.input_kind {
        InputKind::Timeline => {
            let cumulative = args
                .cumulative_input
                .as_deref()
                .map(read_input)
                .transpose()?;
            export_timeline(&input, cumulative.as_deref(), export)?
        }
        InputKind::Geography => {
            if args.cumulative_input.is_some() {
                tracing::warn!("cumulative input is ignored for geography tables");
            }
            let names = export
                .country_names
                .as_deref()
                .map(read_country_names)
                .transpose()?;
            export_geography(&input, names.as_ref(), export)?
        }
    };

    match &args.output {
        Some(path) => fs::write(path, &csv)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => std::io::stdout()
            .lock()
            .write_all(csv.as_bytes())
            .context("failed to write to stdout")?,
    }
    tracing::info!(bytes = csv.len(), "export finished");
    Ok(())
}
