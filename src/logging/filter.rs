//! Record filters applied by each sink before formatting.
use super::record::{LogRecord, NO_CONTEXT};

/// A step in a sink's filter chain.
///
/// Filters may enrich the record in place.  Returning `false` drops the
/// record for the sink that owns the filter.
pub trait RecordFilter: Send + Sync + std::fmt::Debug {
    /// Inspect or enrich `record`; return whether it should be written.
    fn filter(&self, record: &mut LogRecord) -> bool;
}

/// Guarantees that every record carries a context tag.
///
/// An existing tag is left alone, so running the filter once per sink is
/// harmless.  Otherwise the tag comes from the record's subject, falling back
/// to [`NO_CONTEXT`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ContextTagFilter;

impl ContextTagFilter {
    /// Assign the context tag if the record does not have one yet.
    pub fn enrich(record: &mut LogRecord) {
        if record.context.is_some() {
            return;
        }
        let tag = record
            .subject
            .as_ref()
            .map_or_else(|| NO_CONTEXT.to_string(), |s| s.as_str().to_string());
        record.context = Some(if tag.is_empty() {
            NO_CONTEXT.to_string()
        } else {
            tag
        });
    }
}

impl RecordFilter for ContextTagFilter {
    fn filter(&self, record: &mut LogRecord) -> bool {
        Self::enrich(record);
        true
    }
}
