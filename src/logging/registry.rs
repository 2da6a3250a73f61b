//! Process-wide table of named loggers and the sinks bound to them.
//!
//! A [`LoggerRegistry`] is created explicitly and passed to whoever needs to
//! configure or obtain loggers; clones share the same state.  It is never
//! reset.  Configuration takes the write lock for the whole
//! check-then-attach step, so concurrent attempts to configure the same
//! logger attach sinks exactly once.  Emission only takes the read lock;
//! each sink serialises its own writes.
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::filter::ContextTagFilter;
use super::format::{Formatter, StyledFormatter};
use super::level::{LevelSpec, Severity, Threshold};
use super::logger::Logger;
use super::record::{CallSite, LogRecord};
use super::sink::{ConsoleStream, Sink};
use super::style::StyleTable;
use super::wrap::LineWrappingFormatter;
use crate::config::{NamedConfig, RootConfig};
use crate::error::LoggingError;
use crate::paths::prepare_log_path;

/// Name under which root records are reported.
pub const ROOT_LOGGER: &str = "root";

/// Warning written through the existing root sinks when the root logger is
/// configured a second time.
pub const ROOT_ALREADY_CONFIGURED: &str =
    "Root logger already has sinks attached; ignoring repeated configuration.";

/// Result of a configuration call that succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigureOutcome {
    /// Sinks were created and attached.
    Attached,
    /// The logger already had sinks; nothing was attached.
    AlreadyConfigured,
}

/// Per-logger state.
#[derive(Debug)]
struct LoggerNode {
    level: Option<Threshold>,
    sinks: Vec<Arc<Sink>>,
    propagate: bool,
}

impl Default for LoggerNode {
    fn default() -> Self {
        Self {
            level: None,
            sinks: Vec::new(),
            propagate: true,
        }
    }
}

#[derive(Debug)]
struct RegistryState {
    root: LoggerNode,
    loggers: HashMap<String, LoggerNode>,
}

impl Default for RegistryState {
    fn default() -> Self {
        Self {
            root: LoggerNode {
                level: Some(Threshold::from(Severity::Warning)),
                ..LoggerNode::default()
            },
            loggers: HashMap::new(),
        }
    }
}

/// Whether `name` refers to the root logger.
fn is_root(name: &str) -> bool {
    name.is_empty() || name == ROOT_LOGGER
}

/// `name` followed by each of its dot-separated ancestors, nearest first.
fn lineage(name: &str) -> impl Iterator<Item = &str> {
    std::iter::successors(Some(name), |&n| n.rfind('.').and_then(|i| n.get(..i)))
}

impl RegistryState {
    fn node(&self, name: &str) -> Option<&LoggerNode> {
        if is_root(name) {
            Some(&self.root)
        } else {
            self.loggers.get(name)
        }
    }

    fn node_mut(&mut self, name: &str) -> &mut LoggerNode {
        if is_root(name) {
            &mut self.root
        } else {
            self.loggers.entry(name.to_string()).or_default()
        }
    }

    /// Explicit level of the nearest configured logger in `name`'s lineage.
    fn effective_threshold(&self, name: &str) -> Threshold {
        if !is_root(name) {
            for ancestor in lineage(name) {
                if let Some(level) = self.loggers.get(ancestor).and_then(|n| n.level) {
                    return level;
                }
            }
        }
        self.root.level.unwrap_or(Threshold::ALL)
    }

    /// Nodes whose sinks receive a record from `name`, honouring `propagate`.
    fn handlers(&self, name: &str) -> Vec<&LoggerNode> {
        let mut out = Vec::new();
        if !is_root(name) {
            for ancestor in lineage(name) {
                if let Some(node) = self.loggers.get(ancestor) {
                    out.push(node);
                    if !node.propagate {
                        return out;
                    }
                }
            }
        }
        out.push(&self.root);
        out
    }
}

/// Shared registry of named loggers.
#[derive(Debug, Clone, Default)]
pub struct LoggerRegistry {
    state: Arc<RwLock<RegistryState>>,
    styles: Arc<StyleTable>,
}

impl LoggerRegistry {
    /// Create an empty registry using the default style table.
    ///
    /// The root logger starts with a `WARNING` threshold and no sinks.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty registry whose formatters use `styles`.
    #[must_use]
    pub fn with_styles(styles: StyleTable) -> Self {
        Self {
            state: Arc::default(),
            styles: Arc::new(styles),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, RegistryState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, RegistryState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// The formatter chain shared by the sinks of one configuration call.
    fn formatter(&self, width: usize, ansi: bool) -> Arc<dyn Formatter> {
        let styled = StyledFormatter::new(Arc::clone(&self.styles)).with_ansi(ansi);
        Arc::new(LineWrappingFormatter::new(styled, width))
    }

    /// Attach file and optional console sinks to the root logger.
    ///
    /// If the root logger already has sinks, nothing is changed: a single
    /// warning is written through the existing sinks and
    /// [`ConfigureOutcome::AlreadyConfigured`] is returned.  Otherwise the
    /// root threshold is set and every name in `silenced` is raised above
    /// `CRITICAL`.
    ///
    /// # Errors
    ///
    /// Returns [`LoggingError::InvalidLevel`] for an unknown level, and
    /// [`LoggingError::PathPreparation`] or [`LoggingError::SinkOpen`] if
    /// the log file cannot be created.
    #[track_caller]
    pub fn configure_root(&self, config: &RootConfig) -> Result<ConfigureOutcome, LoggingError> {
        let site = CallSite::from_location(std::panic::Location::caller());
        let level = config.level.resolve()?;
        let file = config.resolved_file();

        let mut state = self.write();
        if !state.root.sinks.is_empty() {
            // The notice bypasses the root level so it is seen even when the
            // root was configured above WARNING.
            let sinks = state.root.sinks.clone();
            drop(state);
            let mut record =
                LogRecord::new(ROOT_LOGGER, Severity::Warning, ROOT_ALREADY_CONFIGURED, site);
            for sink in &sinks {
                sink.handle(&mut record);
            }
            return Ok(ConfigureOutcome::AlreadyConfigured);
        }

        prepare_log_path(&file)?;
        let filter = Arc::new(ContextTagFilter);
        let mut sinks = vec![Arc::new(
            Sink::file(&file, config.file_mode, self.formatter(config.width, config.ansi))?
                .with_filter(filter.clone()),
        )];
        if config.console {
            sinks.push(Arc::new(
                Sink::console(
                    config.console_stream.clone(),
                    self.formatter(config.console_width(), config.ansi),
                )
                .with_filter(filter),
            ));
        }

        state.root.sinks = sinks;
        state.root.level = Some(Threshold::from(level));
        for name in &config.silenced {
            state.node_mut(name).level = Some(Threshold::SILENCED);
        }
        drop(state);

        tracing::debug!(
            file = %file.display(),
            level = %level,
            width = config.width,
            console = config.console,
            "configured root logger"
        );
        Ok(ConfigureOutcome::Attached)
    }

    /// Load root settings from a TOML file and apply them with
    /// [`configure_root`](Self::configure_root).  A missing file yields the
    /// default settings.
    ///
    /// # Errors
    ///
    /// Returns [`LoggingError::Config`] if the file cannot be read or parsed,
    /// and otherwise the errors of [`configure_root`](Self::configure_root).
    #[track_caller]
    pub fn configure_root_from_file(&self, path: &Path) -> Result<ConfigureOutcome, LoggingError> {
        let config = RootConfig::from_toml_file(path)?;
        self.configure_root(&config)
    }

    /// Configure the logger called `config.name` and return a handle to it.
    ///
    /// The logger's level and propagation flag are updated on every call,
    /// but its file sink (`<log_dir>/<short name>.log`) and optional console
    /// sink are attached only the first time.
    ///
    /// # Errors
    ///
    /// Returns [`LoggingError::InvalidLevel`] for an unknown level, and
    /// [`LoggingError::PathPreparation`] or [`LoggingError::SinkOpen`] if
    /// the log file cannot be created.
    pub fn configure_named(&self, config: &NamedConfig) -> Result<Logger, LoggingError> {
        let level = Threshold::from(config.level.resolve()?);

        let mut state = self.write();
        let attach = state
            .node(&config.name)
            .is_none_or(|node| node.sinks.is_empty());
        let sinks = if attach {
            let file = config.file();
            prepare_log_path(&file)?;
            let formatter = self.formatter(config.width, config.ansi);
            let filter = Arc::new(ContextTagFilter);
            let mut sinks = vec![Arc::new(
                Sink::file(&file, config.file_mode, Arc::clone(&formatter))?
                    .with_filter(filter.clone())
                    .with_threshold(level),
            )];
            if config.console {
                sinks.push(Arc::new(
                    Sink::console(config.console_stream.clone(), formatter)
                        .with_filter(filter)
                        .with_threshold(level),
                ));
            }
            sinks
        } else {
            Vec::new()
        };

        let node = state.node_mut(&config.name);
        node.level = Some(level);
        node.propagate = config.propagate;
        node.sinks.extend(sinks);
        drop(state);

        if attach {
            tracing::debug!(
                logger = %config.name,
                file = %config.file().display(),
                level = %level,
                "configured module logger"
            );
        }
        Ok(self.logger(&config.name))
    }

    /// Handle for the logger called `name`, without configuring it.
    ///
    /// An empty name or `"root"` refers to the root logger.
    #[must_use]
    pub fn logger(&self, name: &str) -> Logger {
        let name = if is_root(name) { ROOT_LOGGER } else { name };
        Logger::new(name, self.clone())
    }

    /// Handle for the root logger.
    #[must_use]
    pub fn root(&self) -> Logger {
        self.logger(ROOT_LOGGER)
    }

    /// Set the explicit level of the logger called `name`.
    ///
    /// # Errors
    ///
    /// Returns [`LoggingError::InvalidLevel`] for an unknown level.
    pub fn set_level(&self, name: &str, level: impl Into<LevelSpec>) -> Result<(), LoggingError> {
        let level = level.into().resolve()?;
        self.write().node_mut(name).level = Some(Threshold::from(level));
        Ok(())
    }

    /// Discard every record from `name` and its descendants that do not set
    /// their own level.
    pub fn silence(&self, name: &str) {
        self.write().node_mut(name).level = Some(Threshold::SILENCED);
    }

    /// Threshold that applies to records logged under `name`.
    #[must_use]
    pub fn effective_threshold(&self, name: &str) -> Threshold {
        self.read().effective_threshold(name)
    }

    /// Whether a record at `level` under `name` would be processed.
    #[must_use]
    pub fn is_enabled(&self, name: &str, level: Severity) -> bool {
        self.effective_threshold(name).admits(level)
    }

    /// Number of sinks attached directly to `name`.
    #[must_use]
    pub fn sink_count(&self, name: &str) -> usize {
        self.read().node(name).map_or(0, |n| n.sinks.len())
    }

    /// Total number of failed writes across all sinks.
    #[must_use]
    pub fn write_failures(&self) -> usize {
        let state = self.read();
        state
            .loggers
            .values()
            .chain(std::iter::once(&state.root))
            .flat_map(|n| n.sinks.iter())
            .map(|s| s.write_failures())
            .sum()
    }

    /// Deliver `record` to every sink it reaches.
    ///
    /// The record is dropped if it is below the effective threshold of its
    /// logger.  Otherwise it is handed to the sinks of its logger and, while
    /// `propagate` is set, of each ancestor up to the root.  Returns the
    /// number of sinks that wrote it.
    pub fn dispatch(&self, mut record: LogRecord) -> usize {
        let state = self.read();
        if !state.effective_threshold(&record.name).admits(record.level) {
            return 0;
        }
        let mut written = 0;
        for node in state.handlers(&record.name) {
            for sink in &node.sinks {
                if sink.handle(&mut record) {
                    written += 1;
                }
            }
        }
        written
    }
}

/// A console sink writing to `stream`, for callers assembling sinks by hand.
#[must_use]
pub fn console_sink(stream: ConsoleStream, width: usize) -> Sink {
    let formatter = LineWrappingFormatter::new(StyledFormatter::default(), width);
    Sink::console(stream, Arc::new(formatter)).with_filter(Arc::new(ContextTagFilter))
}
