use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::Level;
use tracing_appender::non_blocking::{self, WorkerGuard};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::{LogFormat, LoggingConfig, ResolvedOutputs};

/// Keeps the non-blocking writer flushing until `main` returns.
pub struct LoggingGuard {
    _guard: WorkerGuard,
    pub log_path: Option<PathBuf>,
}

pub fn init_logging(
    logging: &LoggingConfig,
    outputs: &ResolvedOutputs,
) -> Result<Option<LoggingGuard>> {
    if !logging.is_active() {
        return Ok(None);
    }

    let (writer, guard) = match outputs.log_file.as_deref() {
        Some(path) => {
            let file = create_log_file(path)?;
            non_blocking::NonBlockingBuilder::default()
                .lossy(false)
                .finish(file)
        }
        None => non_blocking::NonBlockingBuilder::default()
            .lossy(false)
            .finish(io::stderr()),
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(effective_level(logging).as_str()));

    let builder = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::NONE)
        .with_ansi(false)
        .with_writer(writer);

    // Ignore error if a global subscriber is already set (e.g., when running in tests)
    let _ = match logging.format {
        LogFormat::Json => tracing::subscriber::set_global_default(
            builder.json().with_current_span(false).finish(),
        ),
        LogFormat::Pretty => tracing::subscriber::set_global_default(builder.finish()),
    };

    Ok(Some(LoggingGuard {
        _guard: guard,
        log_path: outputs.log_file.clone(),
    }))
}

/// Turn tracing is emitted at DEBUG, so it lowers a coarser configured level.
pub fn effective_level(logging: &LoggingConfig) -> Level {
    let level = logging.level().unwrap_or(Level::INFO);
    if logging.trace_turns && level < Level::DEBUG {
        Level::DEBUG
    } else {
        level
    }
}

fn create_log_file(path: &Path) -> Result<File> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .with_context(|| format!("creating log directory at {}", dir.display()))?;
    }
    File::create(path).with_context(|| format!("creating log file at {}", path.display()))
}
