mod cli;
mod export;
mod settings;
mod tracer;

pub use cli::Args;
pub use export::{export_geography, export_timeline, run};
pub use settings::{
    DateRange, ExportSettings, InputKind, Settings, TracingFormat, TracingSettings, ENV_PREFIX,
};
pub use tracer::init_logs;
