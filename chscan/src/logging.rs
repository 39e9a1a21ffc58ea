//! Logging system with console output and optional rotated log files.
//!
//! Console output goes to stderr; stdout carries the channel list. When a
//! log directory is configured, a daily rotated file is written as well and
//! files older than the retention period are removed at startup.

use std::fs;
use std::io;
use std::path::Path;

use chrono::Local;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::error::ConfigError;

const LOG_FILE_NAME: &str = "chscan.log";

/// Logging settings resolved from the command line and config file.
#[derive(Debug, Clone, Default)]
pub struct LogOptions<'a> {
    /// Enable debug-level logging.
    pub verbose: bool,
    /// Level filter used when neither `RUST_LOG` nor `verbose` is set.
    pub level: Option<&'a str>,
    /// Directory for rotated log files.
    pub log_dir: Option<&'a Path>,
    /// Number of days to keep log files.
    pub retention_days: u64,
}

/// Initialize the logging system.
///
/// The returned guard flushes the file writer on drop; keep it alive for
/// the whole run.
pub fn init_logging(options: &LogOptions<'_>) -> Result<Option<WorkerGuard>, ConfigError> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if options.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new(options.level.unwrap_or("info"))
        }
    });

    let (file_layer, guard) = match options.log_dir {
        Some(log_dir) => {
            fs::create_dir_all(log_dir)
                .map_err(|e| ConfigError::Logging(format!("{}: {}", log_dir.display(), e)))?;
            clean_old_logs(log_dir, options.retention_days)
                .map_err(|e| ConfigError::Logging(format!("{}: {}", log_dir.display(), e)))?;

            let file_appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_NAME);
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let layer = fmt::layer()
                .with_writer(non_blocking)
                .with_target(true)
                .with_level(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .with_ansi(false)
                .with_timer(LocalTimeTimer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(io::stderr)
                .with_target(false)
                .with_level(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .with_timer(LocalTimeTimer),
        )
        .with(file_layer);

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| ConfigError::Logging(format!("Failed to set default subscriber: {}", e)))?;

    // Bridge log:: macros to tracing
    tracing_log::LogTracer::init()
        .map_err(|e| ConfigError::Logging(format!("Failed to initialize LogTracer: {}", e)))?;

    Ok(guard)
}

/// Remove log files older than the specified number of days.
fn clean_old_logs(log_dir: &Path, retention_days: u64) -> io::Result<()> {
    if !log_dir.exists() {
        return Ok(());
    }

    let cutoff = Local::now() - chrono::Duration::days(retention_days as i64);

    for entry in fs::read_dir(log_dir)? {
        let entry = entry?;
        let path = entry.path();

        let is_log = path.is_file()
            && path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.starts_with(LOG_FILE_NAME));
        if !is_log {
            continue;
        }

        let modified = match entry.metadata().and_then(|m| m.modified()) {
            Ok(modified) => chrono::DateTime::<Local>::from(modified),
            Err(_) => continue,
        };
        if modified < cutoff {
            if let Err(e) = fs::remove_file(&path) {
                eprintln!("Failed to remove old log file {:?}: {}", path, e);
            }
        }
    }

    Ok(())
}

/// Custom timer for local time formatting in logs
#[derive(Debug, Clone, Copy)]
struct LocalTimeTimer;

impl fmt::time::FormatTime for LocalTimeTimer {
    fn format_time(&self, w: &mut fmt::format::Writer) -> std::fmt::Result {
        write!(w, "{}", Local::now().format("%Y-%m-%dT%H:%M:%S%.6f"))
    }
}
