#![allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
//! Snapshot tests for the rendered record layout.

use chrono::{TimeZone as _, Timelike as _, Utc};
use pretty_logger::logging::{
    ContextTagFilter, Formatter as _, LineWrappingFormatter, RecordFilter as _, StyledFormatter,
    strip_ansi,
};
use pretty_logger::{CallSite, ContextTag, LogRecord, Severity};

fn record(level: Severity, message: &str) -> LogRecord {
    let ts = Utc
        .with_ymd_and_hms(2024, 3, 9, 7, 5, 1)
        .unwrap()
        .with_nanosecond(42_000_000)
        .unwrap();
    LogRecord::new(
        "app",
        level,
        message,
        CallSite {
            file: "src/demo.rs",
            line: 1,
            function: "run",
        },
    )
    .at(ts)
}

fn render(mut record: LogRecord, width: usize) -> String {
    ContextTagFilter.filter(&mut record);
    LineWrappingFormatter::new(StyledFormatter::default().with_ansi(false), width).format(&record)
}

#[test]
fn single_line_layout() {
    let out = render(record(Severity::Info, "ready"), 240);
    insta::assert_snapshot!(out, @"[2024-03-09 07:05:01.042] - app - INFO N/A - demo.rs:1 [run]: ready");
}

#[test]
fn tagged_record_layout() {
    let r = record(Severity::Critical, "meltdown").with_subject(ContextTag::new("Reactor"));
    insta::assert_snapshot!(render(r, 240), @"[2024-03-09 07:05:01.042] - app - CRITICAL Reactor - demo.rs:1 [run]: meltdown");
}

#[test]
fn wrapped_layout_keeps_blank_line() {
    let out = render(
        record(Severity::Info, "alpha beta gamma\n\nsecond paragraph"),
        40,
    );
    insta::assert_snapshot!(out, @r"
    [2024-03-09 07:05:01.042] - app - INFO
    N/A - demo.rs:1 [run]: alpha beta gamma

    second paragraph
    ");
}

#[test]
fn colored_output_strips_to_snapshot_layout() {
    let mut r = record(Severity::Warning, "careful");
    ContextTagFilter.filter(&mut r);
    let colored = StyledFormatter::default().format(&r);
    assert!(colored.contains("\x1b["));
    insta::assert_snapshot!(strip_ansi(&colored), @"[2024-03-09 07:05:01.042] - app - WARNING N/A - demo.rs:1 [run]: careful");
}
