//! Color-styled, line-wrapped diagnostic logging.
//!
//! Records flow from a [`Logger`] handle (or a `tracing` event via
//! [`RegistryLayer`]) into the [`LoggerRegistry`], which checks thresholds
//! and hands them to every [`Sink`] bound to the logger and its ancestors.
//! Each sink runs its filters (at least [`ContextTagFilter`]), renders the
//! record with a [`StyledFormatter`] wrapped in a [`LineWrappingFormatter`],
//! and writes the result.

mod filter;
mod format;
mod level;
mod logger;
mod record;
mod registry;
mod sink;
mod style;
mod subscriber;
mod utils;
mod wrap;

pub use filter::{ContextTagFilter, RecordFilter};
pub use format::{Formatter, StyledFormatter};
pub use level::{LevelSpec, Severity, Threshold};
pub use logger::{Emit, Logger, ScopedLogger};
pub use record::{CallSite, ContextTag, LogRecord, NO_CONTEXT};
pub use registry::{
    ConfigureOutcome, LoggerRegistry, ROOT_ALREADY_CONFIGURED, ROOT_LOGGER, console_sink,
};
pub use sink::{ConsoleStream, Destination, FileMode, SharedBuffer, Sink};
pub use style::{Color, Field, Style, StyleKind, StyleTable};
pub use subscriber::{FILTER_ENV, RegistryLayer, init_subscriber};
pub use utils::{strip_ansi, terminal_columns, visible_width};
pub use wrap::{DEFAULT_WIDTH, LineWrappingFormatter, wrap_text};

/// Create a registry whose root logger writes uncoloured output to a
/// temporary file and to an in-memory console.
///
/// The [`tempfile::TempDir`] must be kept alive for the duration of the test.
#[cfg(test)]
#[allow(clippy::expect_used)]
pub(crate) fn captured_root() -> (LoggerRegistry, SharedBuffer, tempfile::TempDir) {
    let tmp = tempfile::tempdir().expect("failed to create temp dir");
    let buf = SharedBuffer::new();
    let config = crate::config::RootConfig {
        file: tmp.path().join("test.log"),
        console_stream: ConsoleStream::Capture(buf.clone()),
        ansi: false,
        width: 1000,
        ..crate::config::RootConfig::default()
    };
    let registry = LoggerRegistry::new();
    registry
        .configure_root(&config)
        .expect("failed to configure root logger");
    (registry, buf, tmp)
}
