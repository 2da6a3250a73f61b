//! Error types for logger configuration and sink writes.
//!
//! Configuration-time failures are returned to the caller as
//! [`LoggingError`].  Failures while writing a record are never returned to
//! the logging call site; they are described by [`WriteFailure`] and reported
//! on standard error by the sink that hit them.
//!
//! # Error hierarchy
//!
//! ```text
//! LoggingError
//! ├── InvalidLevel               unknown severity name or value
//! ├── PathPreparation            log directory could not be created
//! ├── SinkOpen                   log file could not be opened
//! └── Config(ConfigError)        settings file unreadable or malformed
//!
//! WriteFailure                   reported, never propagated
//! ```

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced synchronously by the configuration entry points.
#[derive(Error, Debug)]
pub enum LoggingError {
    /// The requested level is neither a known severity name nor one of the
    /// canonical severity values.
    #[error("Invalid log level '{0}': expected one of DEBUG, INFO, WARNING, ERROR, CRITICAL or 10, 20, 30, 40, 50")]
    InvalidLevel(String),

    /// The directory that should contain a log file could not be created.
    #[error("Cannot prepare log directory for {}: {source}", .path.display())]
    PathPreparation {
        /// Log file whose parent directory could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The log file itself could not be opened in the requested mode.
    #[error("Cannot open log file {}: {source}", .path.display())]
    SinkOpen {
        /// Path of the log file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Loading settings from a file failed.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors that arise while loading logging settings from disk.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The settings file exists but could not be read.
    #[error("IO error reading config file {path}: {source}")]
    Io {
        /// Path to the file that could not be read.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The settings file is not valid TOML for [`RootConfig`](crate::config::RootConfig).
    #[error("Invalid TOML in {path}: {message}")]
    Parse {
        /// Path to the malformed file.
        path: String,
        /// Parser diagnostic.
        message: String,
    },
}

/// An I/O failure while writing a formatted record to a sink.
#[derive(Error, Debug)]
#[error("Failed to write log record to {sink}: {source}")]
pub struct WriteFailure {
    /// Human-readable sink description (file path or stream name).
    pub sink: String,
    /// Underlying I/O error.
    pub source: std::io::Error,
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn invalid_level_display() {
        let e = LoggingError::InvalidLevel("LOUD".to_string());
        assert!(e.to_string().starts_with("Invalid log level 'LOUD'"));
    }

    #[test]
    fn path_preparation_display_and_source() {
        use std::error::Error as StdError;
        let e = LoggingError::PathPreparation {
            path: PathBuf::from("/root/logs/app.log"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"),
        };
        assert!(e.to_string().contains("/root/logs/app.log"));
        assert!(e.source().is_some());
    }

    #[test]
    fn sink_open_display() {
        let e = LoggingError::SinkOpen {
            path: PathBuf::from("logs/app.log"),
            source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
        };
        assert!(e.to_string().starts_with("Cannot open log file logs/app.log"));
    }

    #[test]
    fn config_error_parse_display() {
        let e = ConfigError::Parse {
            path: "logging.toml".to_string(),
            message: "expected `=`".to_string(),
        };
        assert_eq!(e.to_string(), "Invalid TOML in logging.toml: expected `=`");
    }

    #[test]
    fn logging_error_from_config_error() {
        let e: LoggingError = ConfigError::Io {
            path: "logging.toml".to_string(),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        }
        .into();
        assert!(e.to_string().contains("Configuration error"));
        assert!(e.to_string().contains("logging.toml"));
    }

    #[test]
    fn write_failure_display() {
        let e = WriteFailure {
            sink: "stderr".to_string(),
            source: io::Error::new(io::ErrorKind::BrokenPipe, "broken pipe"),
        };
        assert_eq!(
            e.to_string(),
            "Failed to write log record to stderr: broken pipe"
        );
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn all_error_types_are_send_sync() {
        assert_send_sync::<LoggingError>();
        assert_send_sync::<ConfigError>();
        assert_send_sync::<WriteFailure>();
    }

    #[test]
    fn logging_error_converts_to_anyhow() {
        let e = LoggingError::InvalidLevel("x".to_string());
        let _anyhow_err: anyhow::Error = e.into();
    }
}
