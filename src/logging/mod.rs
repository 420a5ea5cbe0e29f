//! ## Sets up logging by reading configuration from environment variables.
//!
//! Environment variables used:
//! - LOG_MODE: "stdout" (default) or "file"
//! - LOG_LEVEL: log level ("trace", "debug", "info", "warn", "error"); default is "info"
//! - LOG_FILE_PATH: when using file mode, the path of the log file (default "logs/kms-signer.log")

use chrono::Utc;
use log::info;
use simplelog::{Config, LevelFilter, SimpleLogger, WriteLogger};
use std::{
    env,
    fs::{create_dir_all, OpenOptions},
    path::Path,
};
use thiserror::Error;

use crate::constants::{DEFAULT_LOG_FILE_PATH, DEFAULT_LOG_LEVEL, DEFAULT_LOG_MODE};

#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("Unable to prepare log file {path}: {source}")]
    LogFile {
        path: String,
        source: std::io::Error,
    },
    #[error("Failed to initialize logger: {0}")]
    Init(#[from] log::SetLoggerError),
}

/// Parses a level name, falling back to `info` for anything unknown.
pub fn parse_level(log_level: &str) -> LevelFilter {
    match log_level.to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        _ => LevelFilter::Info,
    }
}

/// Appends the UTC date to the log file name, before a trailing `.log`.
pub fn compute_rolled_file_path(base_file_path: &str, date_str: &str) -> String {
    match base_file_path.strip_suffix(".log") {
        Some(trimmed) => format!("{}-{}.log", trimmed, date_str),
        None => format!("{}-{}.log", base_file_path, date_str),
    }
}

/// Installs the global logger. Fails if a logger is already installed.
pub fn setup_logging() -> Result<(), LoggingError> {
    let log_mode = env::var("LOG_MODE").unwrap_or_else(|_| DEFAULT_LOG_MODE.to_string());
    let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string());
    let level_filter = parse_level(&log_level);

    if log_mode.to_lowercase() == "file" {
        let base_file_path =
            env::var("LOG_FILE_PATH").unwrap_or_else(|_| DEFAULT_LOG_FILE_PATH.to_string());

        let date_str = Utc::now().format("%Y-%m-%d").to_string();
        let rolled_file_path = compute_rolled_file_path(&base_file_path, &date_str);

        let log_file_error = |source| LoggingError::LogFile {
            path: rolled_file_path.clone(),
            source,
        };

        if let Some(parent) = Path::new(&rolled_file_path).parent() {
            create_dir_all(parent).map_err(log_file_error)?;
        }

        let log_file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&rolled_file_path)
            .map_err(log_file_error)?;

        WriteLogger::init(level_filter, Config::default(), log_file)?;
    } else {
        SimpleLogger::init(level_filter, Config::default())?;
    }

    info!("Logging is successfully configured (mode: {})", log_mode);
    Ok(())
}
