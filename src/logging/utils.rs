//! Utility functions for ANSI handling, time formatting, and terminal size.
use chrono::{DateTime, Timelike as _, Utc};

/// Length in bytes of the escape sequence starting at the beginning of `s`.
///
/// Recognises CSI sequences (`ESC [` ... final byte in `@`..`~`) and
/// two-byte escapes (`ESC` + one character).  Returns `None` if `s` does not
/// start with `ESC`.  An unterminated CSI sequence extends to the end of `s`.
pub(super) fn escape_len(s: &str) -> Option<usize> {
    let mut chars = s.char_indices();
    match chars.next() {
        Some((_, '\x1b')) => {}
        _ => return None,
    }
    match chars.next() {
        Some((_, '[')) => {
            for (i, c) in chars {
                if ('@'..='~').contains(&c) {
                    return Some(i + c.len_utf8());
                }
            }
            Some(s.len())
        }
        Some((i, c)) => Some(i + c.len_utf8()),
        None => Some(1),
    }
}

/// Strip ANSI escape sequences from a string.
///
/// Handles SGR sequences (ending in `m`) and other CSI sequences (ending
/// in any letter in the `@`..`~` range), so cursor movement, erase, etc.
/// are also stripped without consuming unrelated text.
#[must_use]
pub fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(c) = rest.chars().next() {
        if let Some(len) = escape_len(rest) {
            rest = rest.get(len..).unwrap_or_default();
        } else {
            out.push(c);
            rest = rest.get(c.len_utf8()..).unwrap_or_default();
        }
    }
    out
}

/// Number of visible columns in `s`, ignoring escape sequences.
///
/// Every non-escape character counts as one column.
#[must_use]
pub fn visible_width(s: &str) -> usize {
    strip_ansi(s).chars().count()
}

/// Return the terminal width in columns, if it can be determined.
///
/// Queries the controlling terminal first and falls back to the `COLUMNS`
/// environment variable.
#[must_use]
pub fn terminal_columns() -> Option<usize> {
    if let Some((terminal_size::Width(w), _)) = terminal_size::terminal_size()
        && w > 0
    {
        return Some(usize::from(w));
    }
    std::env::var("COLUMNS")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .filter(|&n| n > 0)
}

/// Format `ts` as `YYYY-MM-DD HH:MM:SS` (UTC).
pub(super) fn format_asctime(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Millisecond part of `ts`, zero-padded to three digits.
pub(super) fn format_msecs(ts: &DateTime<Utc>) -> String {
    // Leap seconds report nanoseconds >= 1e9; clamp to keep three digits.
    format!("{:03}", (ts.nanosecond() / 1_000_000).min(999))
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use chrono::TimeZone as _;

    #[test]
    fn strip_ansi_removes_colors() {
        assert_eq!(strip_ansi("\x1b[31mERROR\x1b[0m hello"), "ERROR hello");
        assert_eq!(strip_ansi("no codes here"), "no codes here");
        assert_eq!(
            strip_ansi("\x1b[1;34m==>\x1b[0m \x1b[1mstage\x1b[0m"),
            "==> stage"
        );
    }

    #[test]
    fn strip_ansi_handles_csi_sequences() {
        assert_eq!(strip_ansi("\x1b[2;5Htext"), "text");
        assert_eq!(strip_ansi("\x1b[2Jhello"), "hello");
        assert_eq!(strip_ansi("\x1b[Kworld"), "world");
        assert_eq!(strip_ansi("\x1b[31m\x1b[2JERROR\x1b[0m"), "ERROR");
        assert_eq!(strip_ansi("\x1bMtext"), "text");
        assert_eq!(strip_ansi("\x1b7text"), "text");
    }

    #[test]
    fn strip_ansi_empty_string() {
        assert_eq!(strip_ansi(""), "");
    }

    #[test]
    fn escape_len_measures_sequences() {
        assert_eq!(escape_len("\x1b[38;5;222mabc"), Some(11));
        assert_eq!(escape_len("\x1b[0m"), Some(4));
        assert_eq!(escape_len("\x1bMx"), Some(2));
        assert_eq!(escape_len("\x1b[31"), Some(4));
        assert_eq!(escape_len("plain"), None);
    }

    #[test]
    fn visible_width_ignores_escapes() {
        assert_eq!(visible_width("\x1b[1;31mhello\x1b[0m"), 5);
        assert_eq!(visible_width("héllo"), 5);
    }

    #[test]
    fn terminal_columns_is_positive_when_known() {
        if let Some(cols) = terminal_columns() {
            assert!(cols > 0);
        }
    }

    #[test]
    fn asctime_and_msecs_format() {
        let ts = Utc
            .with_ymd_and_hms(2024, 3, 9, 7, 5, 1)
            .unwrap()
            .with_nanosecond(42_000_000)
            .unwrap();
        assert_eq!(format_asctime(&ts), "2024-03-09 07:05:01");
        assert_eq!(format_msecs(&ts), "042");
    }
}
