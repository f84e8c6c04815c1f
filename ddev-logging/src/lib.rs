//! Tracing initialization for ddev-rs.
//!
//! Uses the standard `RUST_LOG` variable for filtering:
//! - `RUST_LOG=debug` - Set global level
//! - `RUST_LOG=ddev_apptypes=debug,ddev_xhprof=info` - Set per-crate levels
//!
//! `DDEV_LOG_FORMAT` selects the console format (`pretty`, `compact`, `json`;
//! default `compact`). When `DDEV_LOG_FILE` is set, events are also written to
//! that file through a non-blocking appender; keep the returned guard alive
//! until the process exits or buffered lines are lost.

use std::env;
use std::path::Path;

use ddev_core::error::{DdevError, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Console output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Compact,
    Json,
}

impl LogFormat {
    pub fn from_env_value(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("json") => LogFormat::Json,
            Some("pretty") => LogFormat::Pretty,
            _ => LogFormat::Compact,
        }
    }
}

/// Logging settings resolved from the environment.
#[derive(Debug, Clone)]
pub struct LogSettings {
    pub default_filter: String,
    pub format: LogFormat,
    pub file: Option<String>,
}

impl LogSettings {
    pub fn from_env(default_filter: &str) -> Self {
        Self {
            default_filter: default_filter.to_string(),
            format: LogFormat::from_env_value(env::var("DDEV_LOG_FORMAT").ok().as_deref()),
            file: env::var("DDEV_LOG_FILE").ok().filter(|f| !f.trim().is_empty()),
        }
    }
}

/// Initialize with `warn` as the default filter.
pub fn init() -> Result<Option<WorkerGuard>> {
    init_with_defaults("warn")
}

/// Initialize with a default filter used when `RUST_LOG` is not set.
pub fn init_with_defaults(default_filter: &str) -> Result<Option<WorkerGuard>> {
    init_with_settings(LogSettings::from_env(default_filter))
}

pub fn init_with_settings(settings: LogSettings) -> Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.default_filter));

    let console = match settings.format {
        LogFormat::Json => fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(false)
            .json()
            .boxed(),
        LogFormat::Pretty => fmt::layer().with_writer(std::io::stderr).pretty().boxed(),
        LogFormat::Compact => fmt::layer()
            .with_writer(std::io::stderr)
            .compact()
            .boxed(),
    };

    let mut guard = None;
    let file_layer = match settings.file.as_deref() {
        Some(file) => {
            let path = Path::new(file);
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let name = path
                .file_name()
                .ok_or_else(|| DdevError::Config(format!("DDEV_LOG_FILE is not a file: {file}")))?;
            let appender = tracing_appender::rolling::never(dir, name);
            let (writer, file_guard) = tracing_appender::non_blocking(appender);
            guard = Some(file_guard);
            Some(fmt::layer().with_writer(writer).with_ansi(false).json().boxed())
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console)
        .with(file_layer)
        .try_init()
        .map_err(|e| DdevError::Internal(format!("Failed to initialize tracing: {}", e)))?;

    Ok(guard)
}

/// Initialize for tests; repeated calls are ignored.
pub fn init_for_testing() {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::new("debug"))
        .with(fmt::layer().with_test_writer())
        .try_init();
}
