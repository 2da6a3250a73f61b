//! Color-styled, line-wrapped diagnostic logging.
//!
//! A [`LoggerRegistry`] holds named loggers and the sinks bound to them.
//! The root logger is configured once with [`LoggerRegistry::configure_root`];
//! repeating the call is detected and leaves the existing sinks alone.
//! Module loggers get their own file with [`LoggerRegistry::configure_named`].
//!
//! The public API is organised into four layers:
//!
//! - **[`logging`]**: records, styles, formatters, sinks and the registry
//! - **[`config`]**: root and module logger settings, loadable from TOML
//! - **[`paths`]**: log directory preparation and log path resolution
//! - **[`error`]**: error types shared by the layers above
//!
//! ```no_run
//! use pretty_logger::{LoggerRegistry, RootConfig};
//!
//! # fn main() -> Result<(), pretty_logger::LoggingError> {
//! let registry = LoggerRegistry::new();
//! registry.configure_root(&RootConfig::new("logs/app.log"))?;
//! let log = registry.logger("app.storage");
//! pretty_logger::info!(log, "opened {} tables", 3);
//! # Ok(())
//! # }
//! ```
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod config;
pub mod error;
pub mod exec;
pub mod logging;
pub mod paths;

pub use config::{NamedConfig, RootConfig};
pub use error::{ConfigError, LoggingError, WriteFailure};
pub use logging::{
    CallSite, ConfigureOutcome, ContextTag, Emit, LogRecord, Logger, LoggerRegistry, ScopedLogger,
    Severity,
};
