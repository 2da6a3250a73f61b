// Shared helpers for integration tests.
//
// Provides a temporary log directory and a registry whose console output is
// captured in memory, so each test can inspect exactly what a sink wrote
// without touching the real terminal.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};

use pretty_logger::logging::{ConsoleStream, SharedBuffer, strip_ansi};
use pretty_logger::{LoggerRegistry, RootConfig};

/// An isolated logging environment backed by a [`tempfile::TempDir`].
///
/// The directory is automatically deleted when dropped.
pub struct LoggingTestContext {
    /// Temporary directory holding the log files.
    pub dir: tempfile::TempDir,
    /// Captured console output of the root logger.
    pub console: SharedBuffer,
    /// Registry under test.
    pub registry: LoggerRegistry,
}

impl LoggingTestContext {
    /// Create a context with a fresh, unconfigured registry.
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp dir"),
            console: SharedBuffer::new(),
            registry: LoggerRegistry::new(),
        }
    }

    /// Path to the log directory.
    pub fn log_dir(&self) -> &Path {
        self.dir.path()
    }

    /// Path of the root log file.
    pub fn root_file(&self) -> PathBuf {
        self.dir.path().join("logs").join("root.log")
    }

    /// Root settings writing to [`Self::root_file`] and the captured console.
    pub fn root_config(&self) -> RootConfig {
        RootConfig {
            console_stream: ConsoleStream::Capture(self.console.clone()),
            silenced: vec!["noisy_dep".to_string()],
            ..RootConfig::new(self.root_file())
        }
    }

    /// Configure the root logger with [`Self::root_config`].
    pub fn configure_root(&self) {
        self.registry
            .configure_root(&self.root_config())
            .expect("configure root logger");
    }

    /// Captured console output with escape sequences removed.
    pub fn console_text(&self) -> String {
        strip_ansi(&self.console.contents())
    }

    /// Root log file content with escape sequences removed.
    pub fn file_text(&self) -> String {
        read_plain(&self.root_file())
    }
}

/// Read `path` and remove escape sequences.
pub fn read_plain(path: &Path) -> String {
    strip_ansi(&std::fs::read_to_string(path).expect("read log file"))
}

/// Message part of every rendered record in `text`, in order.
pub fn messages(text: &str) -> Vec<String> {
    text.lines()
        .filter_map(|l| l.split_once("]: ").map(|(_, m)| m.to_string()))
        .collect()
}
