//! Demo binary: configure the root logger from a TOML file and command-line
//! flags, then emit a short sample of records.
use std::path::Path;

use anyhow::{Context as _, Result};
use clap::Parser;
use pretty_logger::cli::Cli;
use pretty_logger::logging::{init_subscriber, terminal_columns};
use pretty_logger::paths::resolve_log_path;
use pretty_logger::{LoggerRegistry, NamedConfig, RootConfig, Severity};

/// Stand-in for an application object that records are about.
struct Widget {
    id: u32,
}

fn load_config(args: &Cli) -> Result<RootConfig> {
    let base = match &args.config {
        Some(path) => RootConfig::from_toml_file(path)?,
        None => RootConfig::default(),
    };
    let mut config = args.apply(base);
    config.file = resolve_log_path(&config.file, config.root_dir.as_deref());
    if config.console_width.is_none() {
        config.console_width = terminal_columns().map(|cols| cols.min(config.width));
    }
    Ok(config)
}

fn emit_sample(registry: &LoggerRegistry, log_dir: &Path) -> Result<()> {
    let log = registry.logger("demo");
    pretty_logger::debug!(log, "debug detail: {} pending items", 3);
    pretty_logger::info!(log, "service started");
    pretty_logger::warning!(log, "cache is {}% full", 91);
    pretty_logger::error!(log, "request failed: {}", "connection reset");
    pretty_logger::critical!(log, "giving up after {} retries", 5);

    pretty_logger::info!(
        log,
        "multi-line report:\n{}\n\nsummary follows the blank line",
        "lorem ipsum dolor sit amet ".repeat(12).trim_end()
    );
    pretty_logger::info!(log, "long token: {}", "x".repeat(200));

    let widget = Widget { id: 7 };
    pretty_logger::info!(log.with_subject(&widget), "widget {} rendered", widget.id);

    let worker = registry.configure_named(&NamedConfig {
        log_dir: log_dir.to_path_buf(),
        ..NamedConfig::new("demo.worker")
    })?;
    worker.log(Severity::Info, "worker started; also written to worker.log");

    tracing::info!(target: "demo::tracing", context = "Bridge", "event routed through tracing");
    tracing::warn!(target: "hyper::proto", "silenced by default");
    Ok(())
}

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = Cli::parse();
    let config = load_config(&args)?;

    let registry = LoggerRegistry::new();
    registry
        .configure_root(&config)
        .with_context(|| format!("failed to configure logging to {}", config.file.display()))?;
    init_subscriber(&registry).context("failed to install tracing subscriber")?;

    let log_dir = config
        .file
        .parent()
        .map_or_else(|| Path::new(".").to_path_buf(), Path::to_path_buf);
    emit_sample(&registry, &log_dir)?;

    // A second configuration only produces a warning.
    registry.configure_root(&config)?;

    let failures = registry.write_failures();
    if failures > 0 {
        anyhow::bail!("{failures} log writes failed");
    }
    Ok(())
}
