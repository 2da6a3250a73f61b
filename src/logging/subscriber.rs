//! Bridge from [`tracing`] events into a [`LoggerRegistry`].
use std::fmt::Write as _;

use super::level::Severity;
use super::record::{CallSite, ContextTag, LogRecord};
use super::registry::LoggerRegistry;

/// Environment variable holding an [`EnvFilter`](tracing_subscriber::EnvFilter)
/// directive for [`init_subscriber`].
pub const FILTER_ENV: &str = "PRETTY_LOGGER_FILTER";

/// Collects the `message` and `context` fields of a [`tracing::Event`];
/// other fields are appended to the message as `key=value`.
#[derive(Default)]
struct MessageExtractor {
    message: String,
    context: Option<String>,
    extra: String,
}

impl MessageExtractor {
    fn push(&mut self, field: &tracing::field::Field, value: String) {
        match field.name() {
            "message" => self.message = value,
            "context" => self.context = Some(value),
            name => {
                let _ = write!(self.extra, " {name}={value}");
            }
        }
    }

    fn into_message(self) -> String {
        if self.extra.is_empty() {
            self.message
        } else {
            format!("{}{}", self.message, self.extra)
        }
    }
}

impl tracing::field::Visit for MessageExtractor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.push(field, format!("{value:?}"));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.push(field, value.to_string());
    }
}

/// A [`tracing_subscriber::Layer`] that turns every event into a
/// [`LogRecord`] and dispatches it through a registry.
///
/// The logger name is the event target with `::` replaced by `.`, so
/// `my_crate::storage` events are routed to the `my_crate.storage` logger
/// and can be silenced or given their own sinks like any other logger.
/// A `context` field on the event becomes the record's context tag.
#[derive(Debug, Clone)]
pub struct RegistryLayer {
    registry: LoggerRegistry,
}

impl RegistryLayer {
    /// Create a layer dispatching into `registry`.
    #[must_use]
    pub const fn new(registry: LoggerRegistry) -> Self {
        Self { registry }
    }
}

/// Last `::`-separated segment of a module path.
fn last_segment(path: &str) -> &str {
    path.rsplit("::").next().unwrap_or(path)
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for RegistryLayer {
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let metadata = event.metadata();
        let level = Severity::from(*metadata.level());
        let name = metadata.target().replace("::", ".");
        if !self.registry.is_enabled(&name, level) {
            return;
        }

        let mut extractor = MessageExtractor::default();
        event.record(&mut extractor);
        let context = extractor.context.take();

        let site = CallSite {
            file: metadata.file().unwrap_or("-"),
            line: metadata.line().unwrap_or(0),
            function: metadata.module_path().map_or("-", last_segment),
        };
        let mut record = LogRecord::new(&name, level, extractor.into_message(), site);
        record.subject = context.map(ContextTag::new);
        self.registry.dispatch(record);
    }
}

/// Install a global [`tracing`] subscriber that forwards to `registry`.
///
/// Events are pre-filtered by the directive in [`FILTER_ENV`] (everything
/// when unset); the registry's own thresholds apply afterwards.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_subscriber(
    registry: &LoggerRegistry,
) -> Result<(), tracing_subscriber::util::TryInitError> {
    use tracing_subscriber::{
        EnvFilter, Layer as _, layer::SubscriberExt as _, util::SubscriberInitExt as _,
    };

    let filter = EnvFilter::try_from_env(FILTER_ENV).unwrap_or_else(|_| EnvFilter::new("trace"));
    tracing_subscriber::registry()
        .with(RegistryLayer::new(registry.clone()).with_filter(filter))
        .try_init()
}
