use crate::settings::{TracingFormat, TracingSettings};
use tracing_subscriber::{filter::LevelFilter, layer::SubscriberExt, prelude::*, EnvFilter, Layer};

fn env_filter() -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy()
}

/// Logs go to stderr so that the exported csv may be piped from stdout.
pub fn init_logs(settings: &TracingSettings) -> anyhow::Result<()> {
    if !settings.enabled {
        return Ok(());
    }
    let stderr: Box<dyn Layer<_> + Sync + Send + 'static> = match settings.format {
        TracingFormat::Default => tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_filter(env_filter())
            .boxed(),
        TracingFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_filter(env_filter())
            .boxed(),
    };
    tracing_subscriber::registry().with(stderr).try_init()?;
    Ok(())
}
