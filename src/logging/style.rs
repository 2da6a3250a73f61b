//! Display styles keyed by severity level and record field.
//!
//! The table is immutable once built and is shared between every formatter
//! through an `Arc`.
use std::fmt::Write as _;

use super::level::Severity;

/// A terminal colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    /// Black (SGR 30 / 40).
    Black,
    /// Red (SGR 31 / 41).
    Red,
    /// Green (SGR 32 / 42).
    Green,
    /// Yellow (SGR 33 / 43).
    Yellow,
    /// Blue (SGR 34 / 44).
    Blue,
    /// Magenta (SGR 35 / 45).
    Magenta,
    /// Cyan (SGR 36 / 46).
    Cyan,
    /// White (SGR 37 / 47).
    White,
    /// An entry of the 256-colour palette.
    Ansi256(u8),
}

impl Color {
    /// Offset of the colour within the eight basic SGR colours.
    const fn basic_index(self) -> Option<u8> {
        match self {
            Self::Black => Some(0),
            Self::Red => Some(1),
            Self::Green => Some(2),
            Self::Yellow => Some(3),
            Self::Blue => Some(4),
            Self::Magenta => Some(5),
            Self::Cyan => Some(6),
            Self::White => Some(7),
            Self::Ansi256(_) => None,
        }
    }
}

/// How a piece of text is displayed.
///
/// The default value carries no attributes and renders as plain text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Style {
    /// Foreground colour.
    pub color: Option<Color>,
    /// Background colour.
    pub background: Option<Color>,
    /// Bold weight.
    pub bold: bool,
    /// Faint (dim) weight.
    pub faint: bool,
    /// Use the bright variant of a basic foreground colour.
    pub bright: bool,
}

impl Style {
    /// A style with only a foreground colour.
    #[must_use]
    pub const fn fg(color: Color) -> Self {
        Self {
            color: Some(color),
            background: None,
            bold: false,
            faint: false,
            bright: false,
        }
    }

    /// Set bold weight.
    #[must_use]
    pub const fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Set faint weight.
    #[must_use]
    pub const fn faint(mut self) -> Self {
        self.faint = true;
        self
    }

    /// Use the bright foreground variant.
    #[must_use]
    pub const fn bright(mut self) -> Self {
        self.bright = true;
        self
    }

    /// Set a background colour.
    #[must_use]
    pub const fn on(mut self, background: Color) -> Self {
        self.background = Some(background);
        self
    }

    /// Whether the style has no attributes at all.
    #[must_use]
    pub fn is_plain(&self) -> bool {
        *self == Self::default()
    }

    /// The SGR parameter list for this style, e.g. `"1;31"`.
    fn sgr_params(&self) -> String {
        let mut params: Vec<String> = Vec::new();
        if self.bold {
            params.push("1".to_string());
        }
        if self.faint {
            params.push("2".to_string());
        }
        match self.color {
            Some(Color::Ansi256(n)) => params.push(format!("38;5;{n}")),
            Some(c) => {
                let base = if self.bright { 90 } else { 30 };
                params.push((base + c.basic_index().unwrap_or(9)).to_string());
            }
            None => {}
        }
        match self.background {
            Some(Color::Ansi256(n)) => params.push(format!("48;5;{n}")),
            Some(c) => params.push((40 + c.basic_index().unwrap_or(9)).to_string()),
            None => {}
        }
        params.join(";")
    }

    /// Wrap `text` in this style's escape sequences.
    ///
    /// Plain styles return the text unchanged.
    #[must_use]
    pub fn paint(&self, text: &str) -> String {
        if self.is_plain() {
            return text.to_string();
        }
        let mut out = String::with_capacity(text.len() + 16);
        let _ = write!(out, "\x1b[{}m{text}\x1b[0m", self.sgr_params());
        out
    }
}

/// A named part of the rendered record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// Logical source name.
    Name,
    /// Severity name.
    LevelName,
    /// Source line number.
    LineNo,
    /// Date and time up to the second.
    AscTime,
    /// Millisecond part of the timestamp.
    Msecs,
    /// Message body.
    Message,
    /// Calling function.
    FuncName,
    /// Source file name.
    FileName,
    /// Context tag.
    ContextTag,
}

impl Field {
    /// Look up a field by key.
    ///
    /// Accepts both the snake-case names and the classic logging attribute
    /// names (`asctime`, `levelname`, `funcName`, `className`, ...).
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "name" => Some(Self::Name),
            "levelname" | "level_name" => Some(Self::LevelName),
            "lineno" | "line" => Some(Self::LineNo),
            "asctime" | "timestamp" => Some(Self::AscTime),
            "msecs" => Some(Self::Msecs),
            "message" => Some(Self::Message),
            "funcName" | "function" => Some(Self::FuncName),
            "filename" | "file" => Some(Self::FileName),
            "className" | "context" | "context_tag" => Some(Self::ContextTag),
            _ => None,
        }
    }
}

/// What a style lookup is keyed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleKind {
    /// Keyed by severity name.
    Level,
    /// Keyed by field name.
    Field,
}

/// Immutable mapping from severity and field to [`Style`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleTable {
    levels: [Style; 5],
    fields: Vec<(Field, Style)>,
}

impl StyleTable {
    /// A table with no styles; every lookup returns [`Style::default`].
    #[must_use]
    pub fn plain() -> Self {
        Self {
            levels: [Style::default(); 5],
            fields: Vec::new(),
        }
    }

    /// Replace the style used for `severity`.
    #[must_use]
    pub fn with_level(mut self, severity: Severity, style: Style) -> Self {
        let slot = match severity {
            Severity::Debug => &mut self.levels[0],
            Severity::Info => &mut self.levels[1],
            Severity::Warning => &mut self.levels[2],
            Severity::Error => &mut self.levels[3],
            Severity::Critical => &mut self.levels[4],
        };
        *slot = style;
        self
    }

    /// Replace the style used for `field`.
    #[must_use]
    pub fn with_field(mut self, field: Field, style: Style) -> Self {
        self.fields.retain(|(f, _)| *f != field);
        self.fields.push((field, style));
        self
    }

    /// Style for a severity.
    #[must_use]
    pub const fn level(&self, severity: Severity) -> Style {
        match severity {
            Severity::Debug => self.levels[0],
            Severity::Info => self.levels[1],
            Severity::Warning => self.levels[2],
            Severity::Error => self.levels[3],
            Severity::Critical => self.levels[4],
        }
    }

    /// Style for a field.
    #[must_use]
    pub fn field(&self, field: Field) -> Style {
        self.fields
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, s)| *s)
            .unwrap_or_default()
    }

    /// Look up a style by kind and string key.
    ///
    /// Unknown keys yield [`Style::default`].
    #[must_use]
    pub fn style_for(&self, kind: StyleKind, key: &str) -> Style {
        match kind {
            StyleKind::Level => {
                Severity::from_name(key).map_or_else(Style::default, |s| self.level(s))
            }
            StyleKind::Field => Field::from_key(key).map_or_else(Style::default, |f| self.field(f)),
        }
    }
}

impl Default for StyleTable {
    fn default() -> Self {
        Self {
            levels: [
                Style::fg(Color::White).faint(),
                Style::fg(Color::Ansi256(222)),
                Style::fg(Color::Magenta).bright(),
                Style::fg(Color::Red).bold(),
                Style::fg(Color::Black).bold().on(Color::Red),
            ],
            fields: vec![
                (Field::Name, Style::fg(Color::Green)),
                (Field::LevelName, Style::fg(Color::Green)),
                (Field::LineNo, Style::fg(Color::Magenta)),
                (Field::AscTime, Style::fg(Color::Ansi256(192))),
                (Field::Msecs, Style::fg(Color::Yellow)),
                (Field::Message, Style::fg(Color::Green)),
                (Field::FuncName, Style::fg(Color::White)),
                (Field::FileName, Style::fg(Color::Blue)),
                (Field::ContextTag, Style::fg(Color::Magenta)),
            ],
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn error_level_is_bold_red() {
        let table = StyleTable::default();
        assert_eq!(table.level(Severity::Error).paint("x"), "\x1b[1;31mx\x1b[0m");
    }

    #[test]
    fn critical_level_has_red_background() {
        let table = StyleTable::default();
        assert_eq!(
            table.level(Severity::Critical).paint("boom"),
            "\x1b[1;30;41mboom\x1b[0m"
        );
    }

    #[test]
    fn palette_and_bright_colours() {
        let table = StyleTable::default();
        assert_eq!(table.level(Severity::Info).paint("i"), "\x1b[38;5;222mi\x1b[0m");
        assert_eq!(table.level(Severity::Warning).paint("w"), "\x1b[95mw\x1b[0m");
        assert_eq!(table.level(Severity::Debug).paint("d"), "\x1b[2;37md\x1b[0m");
    }

    #[test]
    fn field_lookup_accepts_classic_names() {
        let table = StyleTable::default();
        assert_eq!(
            table.style_for(StyleKind::Field, "asctime"),
            Style::fg(Color::Ansi256(192))
        );
        assert_eq!(
            table.style_for(StyleKind::Field, "className"),
            Style::fg(Color::Magenta)
        );
        assert_eq!(
            table.style_for(StyleKind::Level, "error"),
            Style::fg(Color::Red).bold()
        );
    }

    #[test]
    fn unknown_keys_are_unstyled() {
        let table = StyleTable::default();
        assert!(table.style_for(StyleKind::Field, "threadName").is_plain());
        assert!(table.style_for(StyleKind::Level, "notice").is_plain());
        assert_eq!(Style::default().paint("plain"), "plain");
    }

    #[test]
    fn overrides_replace_single_entries() {
        let table = StyleTable::default()
            .with_level(Severity::Debug, Style::fg(Color::Cyan))
            .with_field(Field::Name, Style::fg(Color::Yellow).bold());
        assert_eq!(table.level(Severity::Debug), Style::fg(Color::Cyan));
        assert_eq!(table.field(Field::Name), Style::fg(Color::Yellow).bold());
        assert_eq!(table.field(Field::LineNo), Style::fg(Color::Magenta));
    }

    #[test]
    fn plain_table_has_no_styles() {
        let table = StyleTable::plain();
        for severity in Severity::ALL {
            assert!(table.level(severity).is_plain());
        }
        assert!(table.field(Field::Name).is_plain());
    }
}
