//! Output destinations for formatted records.
use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use serde::Deserialize;

use super::filter::RecordFilter;
use super::format::Formatter;
use super::level::Threshold;
use super::record::LogRecord;
use crate::error::{LoggingError, WriteFailure};

/// How an existing log file is treated when a file sink opens it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileMode {
    /// Discard previous content.
    #[default]
    Truncate,
    /// Keep previous content and write after it.
    Append,
}

/// In-memory byte stream that can be shared between a sink and a reader.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    /// Create an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, decoded lossily as UTF-8.
    #[must_use]
    pub fn contents(&self) -> String {
        let guard = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&guard).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Console stream a console sink writes to.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsoleStream {
    /// Standard error.
    #[default]
    Stderr,
    /// Standard output.
    Stdout,
    /// An in-memory buffer standing in for a terminal.
    #[serde(skip)]
    Capture(SharedBuffer),
}

impl ConsoleStream {
    fn writer(&self) -> Box<dyn Write + Send> {
        match self {
            Self::Stderr => Box::new(io::stderr()),
            Self::Stdout => Box::new(io::stdout()),
            Self::Capture(buf) => Box::new(buf.clone()),
        }
    }

    const fn label(&self) -> &'static str {
        match self {
            Self::Stderr => "stderr",
            Self::Stdout => "stdout",
            Self::Capture(_) => "capture",
        }
    }
}

/// Where a sink writes.
#[derive(Debug, Clone)]
pub enum Destination {
    /// A log file.
    File {
        /// Path of the file.
        path: PathBuf,
        /// Mode the file was opened in.
        mode: FileMode,
    },
    /// A console stream.
    Console(ConsoleStream),
}

impl Destination {
    /// Whether this is a file destination.
    #[must_use]
    pub const fn is_file(&self) -> bool {
        matches!(self, Self::File { .. })
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File { path, .. } => write!(f, "{}", path.display()),
            Self::Console(stream) => f.write_str(stream.label()),
        }
    }
}

/// A destination together with its filter chain, formatter and threshold.
///
/// Writes are serialised by a per-sink lock; distinct sinks never wait on
/// each other.
pub struct Sink {
    destination: Destination,
    writer: Mutex<Box<dyn Write + Send>>,
    formatter: Arc<dyn Formatter>,
    filters: Vec<Arc<dyn RecordFilter>>,
    threshold: Threshold,
    failures: AtomicUsize,
}

impl fmt::Debug for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sink")
            .field("destination", &self.destination)
            .field("formatter", &self.formatter)
            .field("filters", &self.filters)
            .field("threshold", &self.threshold)
            .field("failures", &self.failures)
            .finish_non_exhaustive()
    }
}

impl Sink {
    fn with_writer(
        destination: Destination,
        writer: Box<dyn Write + Send>,
        formatter: Arc<dyn Formatter>,
    ) -> Self {
        Self {
            destination,
            writer: Mutex::new(writer),
            formatter,
            filters: Vec::new(),
            threshold: Threshold::ALL,
            failures: AtomicUsize::new(0),
        }
    }

    /// Open `path` in `mode` and create a sink writing to it.
    ///
    /// The parent directory must already exist.
    ///
    /// # Errors
    ///
    /// Returns [`LoggingError::SinkOpen`] if the file cannot be opened.
    pub fn file(
        path: &Path,
        mode: FileMode,
        formatter: Arc<dyn Formatter>,
    ) -> Result<Self, LoggingError> {
        let mut options = fs::OpenOptions::new();
        match mode {
            FileMode::Truncate => options.write(true).create(true).truncate(true),
            FileMode::Append => options.append(true).create(true),
        };
        let file = options.open(path).map_err(|source| LoggingError::SinkOpen {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::with_writer(
            Destination::File {
                path: path.to_path_buf(),
                mode,
            },
            Box::new(file),
            formatter,
        ))
    }

    /// Create a sink writing to a console stream.
    #[must_use]
    pub fn console(stream: ConsoleStream, formatter: Arc<dyn Formatter>) -> Self {
        let writer = stream.writer();
        Self::with_writer(Destination::Console(stream), writer, formatter)
    }

    /// Append a filter to the chain.
    #[must_use]
    pub fn with_filter(mut self, filter: Arc<dyn RecordFilter>) -> Self {
        self.filters.push(filter);
        self
    }

    /// Set the minimum severity this sink writes.
    #[must_use]
    pub fn with_threshold(mut self, threshold: Threshold) -> Self {
        self.threshold = threshold;
        self
    }

    /// Where this sink writes.
    #[must_use]
    pub const fn destination(&self) -> &Destination {
        &self.destination
    }

    /// Minimum severity this sink writes.
    #[must_use]
    pub const fn threshold(&self) -> Threshold {
        self.threshold
    }

    /// Number of writes that have failed on this sink.
    #[must_use]
    pub fn write_failures(&self) -> usize {
        self.failures.load(Ordering::Relaxed)
    }

    /// Filter, format and write `record`.
    ///
    /// Returns `true` if the record was written.  Write errors are reported
    /// on standard error and counted; they never reach the caller.
    pub fn handle(&self, record: &mut LogRecord) -> bool {
        if !self.threshold.admits(record.level) {
            return false;
        }
        for filter in &self.filters {
            if !filter.filter(record) {
                return false;
            }
        }
        let text = self.formatter.format(record);
        match self.write_line(&text) {
            Ok(()) => true,
            Err(failure) => {
                self.failures.fetch_add(1, Ordering::Relaxed);
                report(&failure);
                false
            }
        }
    }

    /// Write one already formatted line followed by a newline, then flush.
    ///
    /// # Errors
    ///
    /// Returns a [`WriteFailure`] describing the sink and the I/O error.
    pub fn write_line(&self, text: &str) -> Result<(), WriteFailure> {
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        writeln!(writer, "{text}")
            .and_then(|()| writer.flush())
            .map_err(|source| WriteFailure {
                sink: self.destination.to_string(),
                source,
            })
    }
}

/// Report a failed write on the process's own error stream.
fn report(failure: &WriteFailure) {
    let _ = writeln!(io::stderr(), "pretty-logger: {failure}");
}
