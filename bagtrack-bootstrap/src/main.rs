use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use bagtrack_bootstrap::logging::{init_logging, LogFormat};
use bagtrack_infrastructure::AppConfig;

#[derive(Parser, Debug)]
#[command(name = "bagtrack")]
#[command(about = "Baggage scan tracking service", long_about = None)]
struct Args {
    /// Path to config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log output format
    #[arg(long, value_enum, default_value = "text")]
    log_format: LogFormat,

    /// Directory for daily rolling log files
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let _log_guard = init_logging(args.log_format, args.log_dir.as_deref())?;

    let config = match args.config {
        Some(path) => AppConfig::load_from(path).await?,
        None => AppConfig::load().await?,
    };

    bagtrack_bootstrap::run_standalone(config).await
}
