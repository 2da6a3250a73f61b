//! Severity levels, numeric thresholds, and level resolution.
use std::fmt;

use serde::Deserialize;

use crate::error::LoggingError;

/// Severity of a log record, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Detailed diagnostic output.
    Debug,
    /// Routine operational messages.
    Info,
    /// Something unexpected that does not stop the process.
    Warning,
    /// An operation failed.
    Error,
    /// The process cannot continue normally.
    Critical,
}

impl Severity {
    /// All severities in ascending order.
    pub const ALL: [Self; 5] = [
        Self::Debug,
        Self::Info,
        Self::Warning,
        Self::Error,
        Self::Critical,
    ];

    /// Canonical numeric value (`10` for `DEBUG` up to `50` for `CRITICAL`).
    #[must_use]
    pub const fn value(self) -> u8 {
        match self {
            Self::Debug => 10,
            Self::Info => 20,
            Self::Warning => 30,
            Self::Error => 40,
            Self::Critical => 50,
        }
    }

    /// Upper-case display name used in rendered records.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
            Self::Critical => "CRITICAL",
        }
    }

    /// Look up a severity by name, ignoring case.
    ///
    /// `WARN` and `FATAL` are accepted as aliases.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_uppercase().as_str() {
            "DEBUG" => Some(Self::Debug),
            "INFO" => Some(Self::Info),
            "WARNING" | "WARN" => Some(Self::Warning),
            "ERROR" => Some(Self::Error),
            "CRITICAL" | "FATAL" => Some(Self::Critical),
            _ => None,
        }
    }

    /// Look up a severity by its canonical numeric value.
    #[must_use]
    pub fn from_value(value: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|s| i64::from(s.value()) == value)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<tracing::Level> for Severity {
    fn from(level: tracing::Level) -> Self {
        match level {
            tracing::Level::ERROR => Self::Error,
            tracing::Level::WARN => Self::Warning,
            tracing::Level::INFO => Self::Info,
            _ => Self::Debug,
        }
    }
}

/// Minimum severity value a logger or sink lets through.
///
/// Wraps the numeric scale of [`Severity::value`] so that it can express
/// "everything" ([`Threshold::ALL`]) and "nothing" ([`Threshold::SILENCED`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Threshold(u8);

impl Threshold {
    /// Passes every record.
    pub const ALL: Self = Self(0);
    /// One above `CRITICAL`; passes no record.
    pub const SILENCED: Self = Self(Severity::Critical.value() + 1);

    /// Whether a record at `severity` passes this threshold.
    #[must_use]
    pub const fn admits(self, severity: Severity) -> bool {
        severity.value() >= self.0
    }

    /// Raw numeric value.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }
}

impl From<Severity> for Threshold {
    fn from(severity: Severity) -> Self {
        Self(severity.value())
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match Severity::from_value(i64::from(self.0)) {
            Some(s) => write!(f, "{s}"),
            None if *self == Self::ALL => f.write_str("ALL"),
            None if *self >= Self::SILENCED => f.write_str("SILENCED"),
            None => write!(f, "{}", self.0),
        }
    }
}

/// A level as supplied by a caller: either a severity name or a number.
///
/// Deserializes from a TOML string (`"info"`) or integer (`20`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum LevelSpec {
    /// A severity name such as `"INFO"` or `"warn"`.
    Name(String),
    /// A canonical severity value such as `20`.
    Value(i64),
}

impl LevelSpec {
    /// Resolve to a known [`Severity`].
    ///
    /// # Errors
    ///
    /// Returns [`LoggingError::InvalidLevel`] if the name is unknown or the
    /// value is not one of `10`, `20`, `30`, `40`, `50`.
    pub fn resolve(&self) -> Result<Severity, LoggingError> {
        match self {
            Self::Name(name) => Severity::from_name(name),
            Self::Value(value) => Severity::from_value(*value),
        }
        .ok_or_else(|| LoggingError::InvalidLevel(self.to_string()))
    }
}

impl Default for LevelSpec {
    fn default() -> Self {
        Self::from(Severity::Debug)
    }
}

impl fmt::Display for LevelSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => f.write_str(name),
            Self::Value(value) => write!(f, "{value}"),
        }
    }
}

impl From<Severity> for LevelSpec {
    fn from(severity: Severity) -> Self {
        Self::Name(severity.name().to_string())
    }
}

impl From<&str> for LevelSpec {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for LevelSpec {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<i64> for LevelSpec {
    fn from(value: i64) -> Self {
        Self::Value(value)
    }
}

impl From<i32> for LevelSpec {
    fn from(value: i32) -> Self {
        Self::Value(i64::from(value))
    }
}
