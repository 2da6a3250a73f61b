//! Rendering of records into styled text.
use std::sync::Arc;

use super::record::LogRecord;
use super::style::{Field, StyleTable};
use super::utils::{format_asctime, format_msecs};

/// Turns a record into the text written to a sink (without trailing newline).
pub trait Formatter: Send + Sync + std::fmt::Debug {
    /// Render `record`.
    fn format(&self, record: &LogRecord) -> String;
}

/// Renders the standard record layout with per-field and per-level styles:
///
/// ```text
/// [2024-03-09 07:05:01.042] - app.ui - INFO Widget - widgets.rs:42 [render]: message
/// ```
///
/// Field styles come from the [`StyleTable`].  The message body uses the
/// style of the record's severity, or the `message` field style when the
/// severity has none.
#[derive(Debug, Clone)]
pub struct StyledFormatter {
    styles: Arc<StyleTable>,
    ansi: bool,
}

impl StyledFormatter {
    /// Create a formatter that emits escape sequences from `styles`.
    #[must_use]
    pub const fn new(styles: Arc<StyleTable>) -> Self {
        Self { styles, ansi: true }
    }

    /// Enable or disable escape sequences entirely.
    #[must_use]
    pub fn with_ansi(mut self, ansi: bool) -> Self {
        self.ansi = ansi;
        self
    }

    fn paint(&self, field: Field, text: &str) -> String {
        if self.ansi {
            self.styles.field(field).paint(text)
        } else {
            text.to_string()
        }
    }

    fn paint_message(&self, record: &LogRecord) -> String {
        if !self.ansi {
            return record.message.clone();
        }
        let level_style = self.styles.level(record.level);
        let style = if level_style.is_plain() {
            self.styles.field(Field::Message)
        } else {
            level_style
        };
        // Style each line separately so a multi-line message never leaves an
        // open escape sequence across a line boundary.
        record
            .message
            .lines()
            .map(|line| {
                if line.trim().is_empty() {
                    line.to_string()
                } else {
                    style.paint(line)
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for StyledFormatter {
    fn default() -> Self {
        Self::new(Arc::new(StyleTable::default()))
    }
}

impl Formatter for StyledFormatter {
    fn format(&self, record: &LogRecord) -> String {
        format!(
            "[{}.{}] - {} - {} {} - {}:{} [{}]: {}",
            self.paint(Field::AscTime, &format_asctime(&record.timestamp)),
            self.paint(Field::Msecs, &format_msecs(&record.timestamp)),
            self.paint(Field::Name, &record.name),
            self.paint(Field::LevelName, record.level.name()),
            self.paint(Field::ContextTag, record.context_tag()),
            self.paint(Field::FileName, &record.file),
            self.paint(Field::LineNo, &record.line.to_string()),
            self.paint(Field::FuncName, &record.function),
            self.paint_message(record),
        )
    }
}
