//! Log records and the context tag that classifies their origin.
use std::fmt;

use chrono::{DateTime, Utc};

use super::level::Severity;

/// Tag assigned to records that carry no associated object.
pub const NO_CONTEXT: &str = "N/A";

/// Short name classifying which kind of object emitted a record.
///
/// Built from a Rust type with [`ContextTag::of`] / [`ContextTag::of_val`],
/// or from an arbitrary string with [`ContextTag::new`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContextTag(String);

impl ContextTag {
    /// Use `tag` verbatim.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    /// Derive the tag from the name of `T`, e.g. `Widget` for `app::ui::Widget<u8>`.
    #[must_use]
    pub fn of<T: ?Sized>() -> Self {
        Self(short_type_name(std::any::type_name::<T>()).to_string())
    }

    /// Derive the tag from the type of `value`.
    #[must_use]
    pub fn of_val<T: ?Sized>(_value: &T) -> Self {
        Self::of::<T>()
    }

    /// The tag text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContextTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reduce a full type path to its last segment without generic arguments.
///
/// References and pointers are stripped first, so `&mut app::Widget` also
/// yields `Widget`.
fn short_type_name(full: &str) -> &str {
    let base = full.split('<').next().unwrap_or(full);
    let base = base.trim_start_matches(['&', '*']);
    let base = base
        .strip_prefix("mut ")
        .or_else(|| base.strip_prefix("const "))
        .unwrap_or(base);
    base.rsplit("::").next().unwrap_or(base)
}

/// Source location of a log call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallSite {
    /// Source file path as reported by the compiler.
    pub file: &'static str,
    /// Line number within `file`.
    pub line: u32,
    /// Name of the enclosing function, or `"-"` when unknown.
    pub function: &'static str,
}

impl CallSite {
    /// Build a call site from a caller location captured with `#[track_caller]`.
    #[must_use]
    pub fn from_location(location: &'static std::panic::Location<'static>) -> Self {
        Self {
            file: location.file(),
            line: location.line(),
            function: "-",
        }
    }
}

/// One emitted log event.
///
/// Everything except `context` is fixed when the record is created.
/// `context` is filled in by [`ContextTagFilter`](super::filter::ContextTagFilter)
/// before the record reaches any formatter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    /// Creation time.
    pub timestamp: DateTime<Utc>,
    /// Severity.
    pub level: Severity,
    /// Logical source name (dot-separated logger name).
    pub name: String,
    /// Source file name (final path component).
    pub file: String,
    /// Source line number.
    pub line: u32,
    /// Calling function.
    pub function: String,
    /// Fully interpolated message.
    pub message: String,
    /// Tag of the object associated with the call, if one was supplied.
    pub subject: Option<ContextTag>,
    /// Context tag assigned by the filter chain.
    pub context: Option<String>,
}

impl LogRecord {
    /// Create a record stamped with the current time.
    #[must_use]
    pub fn new(name: &str, level: Severity, message: impl Into<String>, site: CallSite) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            name: name.to_string(),
            file: file_name(site.file).to_string(),
            line: site.line,
            function: site.function.to_string(),
            message: message.into(),
            subject: None,
            context: None,
        }
    }

    /// Attach the tag of the object this record is about.
    #[must_use]
    pub fn with_subject(mut self, subject: ContextTag) -> Self {
        self.subject = Some(subject);
        self
    }

    /// Override the creation time.
    #[must_use]
    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// The assigned context tag, or [`NO_CONTEXT`] if none has been set.
    #[must_use]
    pub fn context_tag(&self) -> &str {
        self.context.as_deref().unwrap_or(NO_CONTEXT)
    }
}

/// Final component of a `/`- or `\`-separated path.
fn file_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    mod widgets {
        pub struct Widget;
        pub struct Holder<T>(pub T);
    }

    const SITE: CallSite = CallSite {
        file: "src/app/widgets.rs",
        line: 42,
        function: "render",
    };

    #[test]
    fn context_tag_uses_last_path_segment() {
        assert_eq!(ContextTag::of::<widgets::Widget>().as_str(), "Widget");
        assert_eq!(ContextTag::of::<String>().as_str(), "String");
    }

    #[test]
    fn context_tag_strips_generics_and_references() {
        assert_eq!(
            ContextTag::of::<widgets::Holder<Vec<u8>>>().as_str(),
            "Holder"
        );
        let w = widgets::Widget;
        assert_eq!(ContextTag::of_val(&w).as_str(), "Widget");
        assert_eq!(ContextTag::of::<&mut widgets::Widget>().as_str(), "Widget");
    }

    #[test]
    fn record_keeps_only_file_name() {
        let r = LogRecord::new("app.ui", Severity::Info, "hello", SITE);
        assert_eq!(r.file, "widgets.rs");
        assert_eq!(r.line, 42);
        assert_eq!(r.function, "render");
        assert_eq!(file_name(r"C:\src\main.rs"), "main.rs");
    }

    #[test]
    fn context_tag_defaults_to_sentinel() {
        let r = LogRecord::new("app", Severity::Debug, "x", SITE);
        assert!(r.context.is_none());
        assert_eq!(r.context_tag(), NO_CONTEXT);
    }

    #[test]
    fn call_site_from_location() {
        let site = CallSite::from_location(std::panic::Location::caller());
        assert!(site.file.ends_with("record.rs"));
        assert_eq!(site.function, "-");
    }
}
