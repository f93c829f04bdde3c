use clap::Parser;
use timeline_table_export::{init_logs, run, Args, Settings};

fn log_error(err: anyhow::Error) -> anyhow::Error {
    tracing::error!("export failed with error: {:#}", err);
    err
}

fn main() -> Result<(), anyhow::Error> {
    let args = Args::parse();
    let settings = Settings::build(args.config_path.as_deref())?;
    init_logs(&settings.tracing)?;
    run(&args, &settings).map_err(log_error)
}
