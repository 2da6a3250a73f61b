//! Logger handles and the logging macros.
use std::fmt;

use super::level::Severity;
use super::record::{CallSite, ContextTag, LogRecord};
use super::registry::LoggerRegistry;

/// Something a log macro can send a record to.
///
/// Implemented by [`Logger`] and [`ScopedLogger`].  The macros capture the
/// call site and pass pre-formatted arguments, so an implementation only has
/// to decide where the record goes.
pub trait Emit {
    /// Emit a record at `level` with the given message and call site.
    fn emit(&self, level: Severity, args: fmt::Arguments<'_>, site: CallSite);
}

/// Generate the per-level convenience methods of a handle.
macro_rules! level_methods {
    ($($method:ident => $level:ident),+ $(,)?) => {
        $(
            #[doc = concat!("Log `message` at `", stringify!($level), "`.")]
            #[track_caller]
            pub fn $method(&self, message: impl fmt::Display) {
                self.log(Severity::$level, message);
            }
        )+
    };
}

/// Handle to a named logger in a [`LoggerRegistry`].
///
/// Cheap to clone.  Obtaining a handle never configures anything; records
/// are routed by whatever sinks are attached when they are emitted.
#[derive(Debug, Clone)]
pub struct Logger {
    name: String,
    registry: LoggerRegistry,
}

impl Logger {
    pub(super) fn new(name: &str, registry: LoggerRegistry) -> Self {
        Self {
            name: name.to_string(),
            registry,
        }
    }

    /// Logger name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Registry this handle dispatches through.
    #[must_use]
    pub const fn registry(&self) -> &LoggerRegistry {
        &self.registry
    }

    /// Whether a record at `level` would be processed.
    #[must_use]
    pub fn is_enabled(&self, level: Severity) -> bool {
        self.registry.is_enabled(&self.name, level)
    }

    /// Log `message` at `level`, reporting the caller's file and line.
    #[track_caller]
    pub fn log(&self, level: Severity, message: impl fmt::Display) {
        let site = CallSite::from_location(std::panic::Location::caller());
        self.emit_with(level, format_args!("{message}"), site, None);
    }

    level_methods! {
        debug => Debug,
        info => Info,
        warning => Warning,
        error => Error,
        critical => Critical,
    }

    /// Handle whose records are tagged with the type of `subject`.
    #[must_use]
    pub fn with_subject<T: ?Sized>(&self, subject: &T) -> ScopedLogger<'_> {
        ScopedLogger {
            logger: self,
            subject: ContextTag::of_val(subject),
        }
    }

    /// Handle whose records are tagged with the name of `T`.
    #[must_use]
    pub fn with_context<T: ?Sized>(&self) -> ScopedLogger<'_> {
        ScopedLogger {
            logger: self,
            subject: ContextTag::of::<T>(),
        }
    }

    /// Handle whose records carry an explicit tag.
    #[must_use]
    pub fn with_tag(&self, tag: ContextTag) -> ScopedLogger<'_> {
        ScopedLogger { logger: self, subject: tag }
    }

    fn emit_with(
        &self,
        level: Severity,
        args: fmt::Arguments<'_>,
        site: CallSite,
        subject: Option<&ContextTag>,
    ) {
        if !self.is_enabled(level) {
            return;
        }
        let mut record = LogRecord::new(&self.name, level, args.to_string(), site);
        record.subject = subject.cloned();
        self.registry.dispatch(record);
    }
}

impl Emit for Logger {
    fn emit(&self, level: Severity, args: fmt::Arguments<'_>, site: CallSite) {
        self.emit_with(level, args, site, None);
    }
}

/// A [`Logger`] whose records are about a particular kind of object.
#[derive(Debug, Clone)]
pub struct ScopedLogger<'a> {
    logger: &'a Logger,
    subject: ContextTag,
}

impl ScopedLogger<'_> {
    /// Tag attached to every record.
    #[must_use]
    pub const fn subject(&self) -> &ContextTag {
        &self.subject
    }

    /// Log `message` at `level`, reporting the caller's file and line.
    #[track_caller]
    pub fn log(&self, level: Severity, message: impl fmt::Display) {
        let site = CallSite::from_location(std::panic::Location::caller());
        self.emit(level, format_args!("{message}"), site);
    }

    level_methods! {
        debug => Debug,
        info => Info,
        warning => Warning,
        error => Error,
        critical => Critical,
    }
}

impl Emit for ScopedLogger<'_> {
    fn emit(&self, level: Severity, args: fmt::Arguments<'_>, site: CallSite) {
        self.logger.emit_with(level, args, site, Some(&self.subject));
    }
}

/// Name of the function enclosing the macro invocation.
#[doc(hidden)]
#[macro_export]
macro_rules! __function_name {
    () => {{
        fn f() {}
        fn type_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        let name = type_name_of(f);
        let name = name.strip_suffix("::f").unwrap_or(name);
        let name = name.trim_end_matches("::{{closure}}");
        name.rsplit("::").next().unwrap_or(name)
    }};
}

/// [`CallSite`] of the macro invocation.
#[macro_export]
macro_rules! call_site {
    () => {
        $crate::CallSite {
            file: ::std::file!(),
            line: ::std::line!(),
            function: $crate::__function_name!(),
        }
    };
}

/// Log through any [`Emit`] target at an explicit severity.
///
/// ```
/// use pretty_logger::{LoggerRegistry, Severity};
///
/// let registry = LoggerRegistry::new();
/// let log = registry.logger("app");
/// pretty_logger::log!(log, Severity::Info, "started {} workers", 4);
/// ```
#[macro_export]
macro_rules! log {
    ($target:expr, $level:expr, $($arg:tt)+) => {{
        use $crate::Emit as _;
        ($target).emit($level, ::std::format_args!($($arg)+), $crate::call_site!())
    }};
}

/// Log at `DEBUG`.
#[macro_export]
macro_rules! debug {
    ($target:expr, $($arg:tt)+) => {
        $crate::log!($target, $crate::Severity::Debug, $($arg)+)
    };
}

/// Log at `INFO`.
#[macro_export]
macro_rules! info {
    ($target:expr, $($arg:tt)+) => {
        $crate::log!($target, $crate::Severity::Info, $($arg)+)
    };
}

/// Log at `WARNING`.
#[macro_export]
macro_rules! warning {
    ($target:expr, $($arg:tt)+) => {
        $crate::log!($target, $crate::Severity::Warning, $($arg)+)
    };
}

/// Log at `ERROR`.
#[macro_export]
macro_rules! error {
    ($target:expr, $($arg:tt)+) => {
        $crate::log!($target, $crate::Severity::Error, $($arg)+)
    };
}

/// Log at `CRITICAL`.
#[macro_export]
macro_rules! critical {
    ($target:expr, $($arg:tt)+) => {
        $crate::log!($target, $crate::Severity::Critical, $($arg)+)
    };
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::logging::captured_root as captured;

    struct Widget;

    #[test]
    fn method_reports_caller_line() {
        let (registry, buf, _dir) = captured();
        let log = registry.logger("app");
        let line = line!() + 1;
        log.info("hello");
        let out = buf.contents();
        assert!(out.contains(&format!("logger.rs:{line} [-]: hello")), "{out}");
    }

    #[test]
    fn macro_captures_function_name() {
        let (registry, buf, _dir) = captured();
        let log = registry.logger("app");
        crate::info!(log, "count={}", 3);
        let out = buf.contents();
        assert!(out.contains("[macro_captures_function_name]: count=3"), "{out}");
    }

    #[test]
    fn macro_inside_closure_reports_enclosing_function() {
        let (registry, buf, _dir) = captured();
        let log = registry.logger("app");
        let run = || crate::warning!(log, "from closure");
        run();
        assert!(
            buf.contents()
                .contains("[macro_inside_closure_reports_enclosing_function]: from closure")
        );
    }

    #[test]
    fn subject_becomes_context_tag() {
        let (registry, buf, _dir) = captured();
        let log = registry.logger("app.ui");
        let widget = Widget;
        log.with_subject(&widget).info("drawn");
        crate::error!(log.with_context::<Widget>(), "broken");
        log.info("plain");
        let out = buf.contents();
        assert!(out.contains("INFO Widget"), "{out}");
        assert!(out.contains("ERROR Widget"), "{out}");
        assert!(out.contains("INFO N/A"), "{out}");
    }

    #[test]
    fn scoped_logger_exposes_subject() {
        let (registry, _buf, _dir) = captured();
        let log = registry.logger("app.ui");
        assert_eq!(log.with_context::<Widget>().subject().as_str(), "Widget");
        assert_eq!(log.with_tag(ContextTag::new("Reactor")).subject().as_str(), "Reactor");
    }

    #[test]
    fn handle_shares_its_registry() {
        let (registry, _buf, _dir) = captured();
        let log = registry.logger("app");
        assert_eq!(log.registry().sink_count(crate::logging::ROOT_LOGGER), 2);
        log.registry().set_level("app", "error").unwrap();
        assert!(!registry.is_enabled("app", Severity::Warning));
    }

    #[test]
    fn disabled_levels_are_skipped() {
        let registry = LoggerRegistry::new();
        let log = registry.logger("app");
        assert!(!log.is_enabled(Severity::Info));
        assert!(log.is_enabled(Severity::Error));
        log.info("nobody listens");
    }

    #[test]
    fn log_macro_with_explicit_level() {
        let (registry, buf, _dir) = captured();
        let log = registry.root();
        crate::log!(&log, Severity::Critical, "{}-{}", "a", "b");
        assert!(buf.contents().contains("- root - CRITICAL N/A"));
        assert!(buf.contents().ends_with("a-b\n"));
    }

    #[test]
    fn function_name_strips_path() {
        let name = crate::__function_name!();
        assert_eq!(name, "function_name_strips_path");
    }
}
