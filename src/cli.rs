//! Command-line interface of the demo binary.
use std::path::PathBuf;

use clap::Parser;

use crate::config::RootConfig;
use crate::logging::{FileMode, LevelSpec};

/// Version string: the release version when set at build time, otherwise
/// the crate version with a `dev-` prefix.
pub const VERSION: &str = match option_env!("PRETTY_LOGGER_VERSION") {
    Some(v) => v,
    None => concat!("dev-", env!("CARGO_PKG_VERSION")),
};

/// Demo front end: configure the root logger and emit a sample of records.
#[derive(Parser, Debug)]
#[command(
    name = "pretty-logger",
    about = "Color-styled, line-wrapped diagnostic logging demo",
    version = VERSION
)]
pub struct Cli {
    /// TOML file with root logger settings (missing file means defaults)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log file path, relative to the repository root unless absolute
    #[arg(short = 'f', long)]
    pub log_file: Option<PathBuf>,

    /// Root threshold, as a name (debug, info, warning, ...) or value (10..50)
    #[arg(short, long)]
    pub level: Option<String>,

    /// Wrap width of the file sink
    #[arg(short, long)]
    pub width: Option<usize>,

    /// Append to an existing log file instead of truncating it
    #[arg(long)]
    pub append: bool,

    /// Do not attach a console sink
    #[arg(long)]
    pub no_console: bool,

    /// Logger names whose records are discarded (repeatable)
    #[arg(short, long, value_delimiter = ',')]
    pub silence: Vec<String>,

    /// Override the directory relative log paths are resolved against
    #[arg(long)]
    pub root: Option<PathBuf>,
}

impl Cli {
    /// Apply the command-line overrides on top of `config`.
    #[must_use]
    pub fn apply(&self, mut config: RootConfig) -> RootConfig {
        if let Some(file) = &self.log_file {
            config.file.clone_from(file);
        }
        if let Some(level) = &self.level {
            config.level = level.parse::<i64>().map_or_else(
                |_| LevelSpec::Name(level.clone()),
                LevelSpec::Value,
            );
        }
        if let Some(width) = self.width {
            config.width = width;
        }
        if self.append {
            config.file_mode = FileMode::Append;
        }
        if self.no_console {
            config.console = false;
        }
        config.silenced.extend(self.silence.iter().cloned());
        if let Some(root) = &self.root {
            config.root_dir = Some(root.clone());
        }
        config
    }
}
