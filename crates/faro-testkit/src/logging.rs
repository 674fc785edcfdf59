//! Structured logging for test runs.

use std::env;
use std::fs::{File, OpenOptions};
use std::io;

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Fault raised while configuring logging.
#[derive(Debug, Clone, PartialEq)]
pub enum LoggingError {
    BadFilter { value: String, message: String },
    BadFormat { value: String },
    File { path: String, message: String },
}

impl LoggingError {
    pub fn code(&self) -> &'static str {
        match self {
            LoggingError::BadFilter { .. } => "LOG_BAD_FILTER",
            LoggingError::BadFormat { .. } => "LOG_BAD_FORMAT",
            LoggingError::File { .. } => "LOG_FILE",
        }
    }
}

impl std::fmt::Display for LoggingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoggingError::BadFilter { value, message } => {
                write!(f, "[{}] Invalid log filter '{}': {}", self.code(), value, message)
            }
            LoggingError::BadFormat { value } => {
                write!(
                    f,
                    "[{}] Invalid log format '{}' (expected 'json' or 'pretty')",
                    self.code(),
                    value
                )
            }
            LoggingError::File { path, message } => {
                write!(f, "[{}] Cannot open log file '{}': {}", self.code(), path, message)
            }
        }
    }
}

impl std::error::Error for LoggingError {}

fn open_log_file(path: &str) -> Result<File, LoggingError> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|err| LoggingError::File {
            path: path.to_string(),
            message: err.to_string(),
        })
}

/// Enable structured logging for the process.
///
/// When `level` is None, this reads `FARO_TRACE` if set. If `FARO_TRACE` is
/// unset, the default level is `off`. `FARO_LOG_FORMAT` selects `pretty` or
/// `json` output on stderr, and `FARO_LOG_FILE` appends a plain copy to a
/// file. Returns true when logging was initialized here, false when a
/// subscriber is already installed.
pub fn enable_logging(level: Option<&str>) -> Result<bool, LoggingError> {
    if tracing::dispatcher::has_been_set() {
        return Ok(false);
    }

    let level_value = level
        .map(str::to_string)
        .or_else(|| env::var("FARO_TRACE").ok())
        .unwrap_or_else(|| "off".to_string());

    let filter = if level_value.eq_ignore_ascii_case("off") {
        EnvFilter::default().add_directive(LevelFilter::OFF.into())
    } else {
        EnvFilter::try_new(&level_value).map_err(|err| LoggingError::BadFilter {
            value: level_value.clone(),
            message: err.to_string(),
        })?
    };

    let format = env::var("FARO_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());
    let log_file = env::var("FARO_LOG_FILE").ok();
    let use_json = format.eq_ignore_ascii_case("json");

    if !use_json && !format.eq_ignore_ascii_case("pretty") {
        return Err(LoggingError::BadFormat { value: format });
    }

    let installed = if use_json {
        let stderr_layer = tracing_subscriber::fmt::layer().with_writer(io::stderr).json();
        let base = tracing_subscriber::registry().with(filter).with(stderr_layer);
        if let Some(path) = log_file {
            let file_layer = tracing_subscriber::fmt::layer()
                .with_writer(open_log_file(&path)?)
                .with_ansi(false)
                .json();
            base.with(file_layer).try_init().is_ok()
        } else {
            base.try_init().is_ok()
        }
    } else {
        let stderr_layer = tracing_subscriber::fmt::layer().with_writer(io::stderr).pretty();
        let base = tracing_subscriber::registry().with(filter).with(stderr_layer);
        if let Some(path) = log_file {
            let file_layer = tracing_subscriber::fmt::layer()
                .with_writer(open_log_file(&path)?)
                .with_ansi(false)
                .pretty();
            base.with(file_layer).try_init().is_ok()
        } else {
            base.try_init().is_ok()
        }
    };
    Ok(installed)
}
