//! Escape-aware line wrapping of rendered records.
//!
//! Wrapping operates on a list of pieces rather than on the raw string: each
//! piece is either a whitespace run or a word, and a word may contain escape
//! sequences that contribute nothing to its visible width.  Breaks only ever
//! happen between pieces, so an escape sequence is never split.
use super::format::Formatter;
use super::record::LogRecord;
use super::utils::escape_len;

/// Default width for file sinks and module loggers.
pub const DEFAULT_WIDTH: usize = 240;

/// A word or whitespace run within one physical line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Piece<'a> {
    text: &'a str,
    width: usize,
    space: bool,
}

/// Split `line` into alternating word and whitespace pieces.
fn pieces(line: &str) -> Vec<Piece<'_>> {
    let mut out: Vec<Piece<'_>> = Vec::new();
    let mut start = 0;
    let mut width = 0;
    let mut space: Option<bool> = None;
    let mut pos = 0;

    while pos < line.len() {
        let rest = line.get(pos..).unwrap_or_default();
        let (len, is_space, visible) = match escape_len(rest) {
            Some(len) => (len, false, 0),
            None => {
                let c = rest.chars().next().unwrap_or(' ');
                (c.len_utf8(), c.is_whitespace(), 1)
            }
        };
        if space.is_some_and(|s| s != is_space) {
            out.push(Piece {
                text: line.get(start..pos).unwrap_or_default(),
                width,
                space: !is_space,
            });
            start = pos;
            width = 0;
        }
        space = Some(is_space);
        width += visible;
        pos += len;
    }
    if let Some(is_space) = space {
        out.push(Piece {
            text: line.get(start..).unwrap_or_default(),
            width,
            space: is_space,
        });
    }
    out
}

/// Greedily wrap a single non-blank line to `width` visible columns.
///
/// Whitespace at a break point is dropped; whitespace between words on the
/// same output line is kept as written.  Leading indentation of the first
/// segment is kept.  A word wider than `width` is placed on its own line
/// unsplit.  A piece made only of escape sequences stays on the current line
/// and leaves any pending whitespace for the next visible word.
fn wrap_line(line: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;
    let mut started = false;
    let mut gap = String::new();
    let mut gap_width = 0;

    for piece in pieces(line) {
        if piece.space {
            if started {
                gap.push_str(piece.text);
                gap_width += piece.width;
            } else {
                current.push_str(piece.text);
                current_width += piece.width;
            }
            continue;
        }
        if piece.width == 0 {
            current.push_str(piece.text);
            continue;
        }
        if !started || current_width + gap_width + piece.width <= width {
            current.push_str(&gap);
            current.push_str(piece.text);
            current_width += gap_width + piece.width;
            started = true;
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(piece.text);
            current_width = piece.width;
        }
        gap.clear();
        gap_width = 0;
    }
    if started || !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Reflow `text` so that no line exceeds `width` visible columns.
///
/// Blank and whitespace-only lines become empty lines and are never merged
/// or dropped.  Every other line is wrapped independently.
#[must_use]
pub fn wrap_text(text: &str, width: usize) -> String {
    let mut out: Vec<String> = Vec::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            out.push(String::new());
        } else {
            out.extend(wrap_line(line, width));
        }
    }
    out.join("\n")
}

/// Wraps the output of another [`Formatter`] to a fixed display width.
#[derive(Debug, Clone)]
pub struct LineWrappingFormatter<F> {
    inner: F,
    width: usize,
}

impl<F: Formatter> LineWrappingFormatter<F> {
    /// Wrap the output of `inner` at `width` columns.
    #[must_use]
    pub const fn new(inner: F, width: usize) -> Self {
        Self { inner, width }
    }

    /// Configured width in columns.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }
}

impl<F: Formatter> Formatter for LineWrappingFormatter<F> {
    fn format(&self, record: &LogRecord) -> String {
        wrap_text(&self.inner.format(record), self.width)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::logging::utils::{strip_ansi, visible_width};

    #[test]
    fn short_line_is_unchanged() {
        assert_eq!(wrap_text("hello world", 40), "hello world");
    }

    #[test]
    fn wraps_at_whitespace() {
        assert_eq!(
            wrap_text("the quick brown fox jumps", 10),
            "the quick\nbrown fox\njumps"
        );
    }

    #[test]
    fn blank_line_is_preserved_in_place() {
        let long = "word ".repeat(30);
        let text = format!("{long}\n\nshort");
        let out = wrap_text(&text, 40);
        let lines: Vec<&str> = out.split('\n').collect();
        let blanks: Vec<usize> = lines
            .iter()
            .enumerate()
            .filter(|(_, l)| l.is_empty())
            .map(|(i, _)| i)
            .collect();
        assert_eq!(blanks.len(), 1, "{out:?}");
        assert_eq!(lines[blanks[0] + 1], "short");
        assert!(lines[..blanks[0]].iter().all(|l| l.starts_with("word")));
    }

    #[test]
    fn whitespace_only_line_becomes_empty() {
        assert_eq!(wrap_text("a\n   \t\nb", 40), "a\n\nb");
    }

    #[test]
    fn long_token_is_never_split() {
        let token = "x".repeat(300);
        assert_eq!(wrap_text(&token, 80), token);
    }

    #[test]
    fn long_token_gets_its_own_line() {
        let token = "y".repeat(100);
        let out = wrap_text(&format!("aa bb {token} cc"), 80);
        assert_eq!(out, format!("aa bb\n{token}\ncc"));
    }

    #[test]
    fn mixed_words_respect_width() {
        let text = "lorem ipsum dolor sit amet consectetur adipiscing elit ".repeat(12);
        let out = wrap_text(&text, 80);
        for line in out.lines() {
            assert!(line.chars().count() <= 80, "line too long: {line:?}");
        }
        assert!(out.lines().count() > 1);
    }

    #[test]
    fn escapes_do_not_count_towards_width() {
        let red = |w: &str| format!("\x1b[31m{w}\x1b[0m");
        let text = format!("{} {} {}", red("aaaa"), red("bbbb"), red("cccc"));
        assert_eq!(wrap_text(&text, 9), format!("{} {}\n{}", red("aaaa"), red("bbbb"), red("cccc")));
    }

    #[test]
    fn escape_sequences_are_never_split() {
        let text = format!("{} tail", "\x1b[38;5;222mcolored words here\x1b[0m");
        for width in 1..30 {
            let out = wrap_text(&text, width);
            assert_eq!(strip_ansi(&out).replace('\n', " "), "colored words here tail");
            for line in out.lines() {
                let opens = line.matches("\x1b[").count();
                let complete = line.matches("\x1b[38;5;222m").count() + line.matches("\x1b[0m").count();
                assert_eq!(opens, complete, "split escape at width {width}: {line:?}");
            }
        }
    }

    #[test]
    fn leading_indentation_is_kept_on_first_segment() {
        assert_eq!(wrap_text("    indented text", 40), "    indented text");
        assert_eq!(wrap_text("  aa bb", 5), "  aa\nbb");
    }

    #[test]
    fn trailing_whitespace_is_dropped() {
        assert_eq!(wrap_text("word   ", 40), "word");
    }

    #[test]
    fn styled_wrapped_lines_fit_visible_width() {
        let text = (0..40)
            .map(|i| format!("\x1b[32mw{i}\x1b[0m"))
            .collect::<Vec<_>>()
            .join(" ");
        for line in wrap_text(&text, 20).lines() {
            assert!(visible_width(line) <= 20, "{line:?}");
        }
    }

    #[test]
    fn bare_escape_between_words_does_not_widen_line() {
        let out = wrap_text("aaaa \x1b[0m bbbb", 4);
        for line in out.lines() {
            assert!(visible_width(line) <= 4, "{line:?}");
        }
        assert_eq!(strip_ansi(&out), "aaaa\nbbbb");
    }

    #[test]
    fn bare_escape_keeps_spacing_when_words_fit() {
        let out = wrap_text("aa \x1b[0m bb", 40);
        assert_eq!(strip_ansi(&out), "aa  bb");
    }

    #[test]
    fn formatter_reports_width() {
        let f = LineWrappingFormatter::new(crate::logging::format::StyledFormatter::default(), 72);
        assert_eq!(f.width(), 72);
    }

    #[test]
    fn pieces_alternate() {
        let p = pieces("ab  \x1b[1mcd\x1b[0m e");
        let texts: Vec<&str> = p.iter().map(|p| p.text).collect();
        assert_eq!(texts, vec!["ab", "  ", "\x1b[1mcd\x1b[0m", " ", "e"]);
        assert_eq!(p[2].width, 2);
        assert!(p[1].space);
    }
}
