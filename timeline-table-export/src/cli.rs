use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    #[clap(short, long)]
    pub config_path: Option<PathBuf>,
    /// By-day timeline or geography payload.
    #[clap(short, long)]
    pub input: PathBuf,
    /// Cumulative timeline payload; derived from `input` when omitted.
    #[clap(long)]
    pub cumulative_input: Option<PathBuf>,
    /// Defaults to stdout.
    #[clap(short, long)]
    pub output: Option<PathBuf>,
}
