//! Logger configuration: root and per-module settings, optionally loaded
//! from a TOML file.
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;
use crate::logging::{ConsoleStream, FileMode, LevelSpec};

/// Default width of root sinks, in columns.
pub const DEFAULT_ROOT_WIDTH: usize = 150;

/// Default directory for log files.
pub const DEFAULT_LOG_DIR: &str = "logs";

/// Settings for the process-wide root logger.
///
/// Every field has a default, so a TOML file only needs the keys it changes:
///
/// ```toml
/// level = "info"
/// file = "logs/service.log"
/// file_mode = "append"
/// width = 120
/// silenced = ["hyper", "h2"]
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RootConfig {
    /// Root threshold, as a severity name or value.
    pub level: LevelSpec,
    /// Log file path.  Relative paths are resolved against `root_dir` when set.
    pub file: PathBuf,
    /// Whether an existing file is truncated or appended to.
    pub file_mode: FileMode,
    /// Also attach a console sink.
    pub console: bool,
    /// Stream used by the console sink.
    pub console_stream: ConsoleStream,
    /// Wrap width of the file sink (and of the console sink unless
    /// `console_width` is set).
    pub width: usize,
    /// Wrap width of the console sink.
    pub console_width: Option<usize>,
    /// Logger names whose records are discarded.
    pub silenced: Vec<String>,
    /// Emit colour escape sequences.
    pub ansi: bool,
    /// Base directory for a relative `file`.
    pub root_dir: Option<PathBuf>,
}

impl Default for RootConfig {
    fn default() -> Self {
        Self {
            level: LevelSpec::default(),
            file: Path::new(DEFAULT_LOG_DIR).join("pretty_logger.log"),
            file_mode: FileMode::Truncate,
            console: true,
            console_stream: ConsoleStream::Stderr,
            width: DEFAULT_ROOT_WIDTH,
            console_width: None,
            silenced: ["hyper", "h2", "rustls", "mio"]
                .into_iter()
                .map(String::from)
                .collect(),
            ansi: true,
            root_dir: None,
        }
    }
}

impl RootConfig {
    /// Default settings writing to `file`.
    #[must_use]
    pub fn new(file: impl Into<PathBuf>) -> Self {
        Self {
            file: file.into(),
            ..Self::default()
        }
    }

    /// Parse settings from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the text is not valid TOML or
    /// contains unknown keys.
    pub fn from_toml_str(content: &str, origin: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: origin.to_string(),
            message: e.message().to_string(),
        })
    }

    /// Load settings from a TOML file.  A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content, &path.display().to_string())
    }

    /// The log file path with `root_dir` applied.
    #[must_use]
    pub fn resolved_file(&self) -> PathBuf {
        match &self.root_dir {
            Some(root) if self.file.is_relative() => root.join(&self.file),
            _ => self.file.clone(),
        }
    }

    /// Effective wrap width of the console sink.
    #[must_use]
    pub fn console_width(&self) -> usize {
        self.console_width.unwrap_or(self.width)
    }
}

/// Settings for a named module logger.
#[derive(Debug, Clone)]
pub struct NamedConfig {
    /// Dot-separated logger name, e.g. `"app.storage"`.
    pub name: String,
    /// Threshold of the logger and of its file sink.
    pub level: LevelSpec,
    /// Wrap width of the logger's sinks.
    pub width: usize,
    /// Whether an existing file is truncated or appended to.
    pub file_mode: FileMode,
    /// Also attach a console sink.
    pub console: bool,
    /// Stream used by the console sink.
    pub console_stream: ConsoleStream,
    /// Forward records to the ancestors' sinks as well.
    pub propagate: bool,
    /// Directory holding `<short name>.log`.
    pub log_dir: PathBuf,
    /// Emit colour escape sequences.
    pub ansi: bool,
}

impl NamedConfig {
    /// Default settings for the logger called `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            level: LevelSpec::default(),
            width: crate::logging::DEFAULT_WIDTH,
            file_mode: FileMode::Truncate,
            console: false,
            console_stream: ConsoleStream::Stderr,
            propagate: true,
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
            ansi: true,
        }
    }

    /// Last dot-separated segment of the name.
    #[must_use]
    pub fn short_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }

    /// The file this logger writes to: `<log_dir>/<short name>.log`.
    #[must_use]
    pub fn file(&self) -> PathBuf {
        self.log_dir.join(format!("{}.log", self.short_name()))
    }
}
