use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use clap::ValueEnum;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const LOG_FILE_PREFIX: &str = "bagtrack.log";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

/// Installs the global subscriber. Console output always; with `log_dir`
/// set, a daily rolling file as well. The returned guard flushes the file
/// writer on drop and must live as long as the process logs.
pub fn init_logging(format: LogFormat, log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let (file_writer, guard) = match log_dir {
        Some(dir) => {
            fs::create_dir_all(dir)
                .with_context(|| format!("failed to create log dir {}", dir.display()))?;
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(writer), Some(guard))
        }
        None => (None, None),
    };

    let registry = tracing_subscriber::registry().with(env_filter);
    let installed = match format {
        LogFormat::Text => registry
            .with(fmt::layer())
            .with(file_writer.map(|writer| fmt::layer().with_writer(writer).with_ansi(false)))
            .try_init(),
        LogFormat::Json => registry
            .with(fmt::layer().json())
            .with(file_writer.map(|writer| fmt::layer().json().with_writer(writer)))
            .try_init(),
    };
    installed.map_err(|err| anyhow!("failed to install log subscriber: {}", err))?;

    Ok(guard)
}
