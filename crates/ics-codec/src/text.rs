//! Text primitives — line folding/unfolding and TEXT value escaping.
//!
//! RFC 5545 §3.1 limits content lines to 75 octets. Longer lines are folded by
//! inserting CRLF followed by a single space; readers unfold by deleting any
//! line break immediately followed by a space or horizontal tab.
//!
//! TEXT values (§3.3.11) escape backslash, semicolon, comma, and newline.
//!
//! # Key design decisions
//!
//! - **Octet folding by default**: the 75 limit is measured in UTF-8 bytes, and
//!   a fold never lands inside a multi-byte character. [`FoldMode::Characters`]
//!   keeps the older character-count behavior for callers that need
//!   byte-identical output with tools that fold that way.
//! - **Lenient line breaks on input**: CRLF, bare LF, and bare CR all end a
//!   physical line.
//! - **Single-pass unescape**: chained `replace` calls would turn `\\n` into a
//!   newline; walking the input once keeps the escape law exact.

use std::fmt;
use std::str::FromStr;

use crate::error::IcsError;

/// Maximum physical line length, including the leading space of a
/// continuation line.
pub const MAX_LINE_LENGTH: usize = 75;

/// How [`fold_line_with`] measures the 75-unit line limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FoldMode {
    /// Count UTF-8 octets, as RFC 5545 requires.
    #[default]
    Octets,
    /// Count Unicode scalar values. Multi-byte text can exceed 75 octets.
    Characters,
}

impl FoldMode {
    fn width(self, ch: char) -> usize {
        match self {
            FoldMode::Octets => ch.len_utf8(),
            FoldMode::Characters => 1,
        }
    }
}

impl fmt::Display for FoldMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FoldMode::Octets => "octets",
            FoldMode::Characters => "characters",
        })
    }
}

impl FromStr for FoldMode {
    type Err = IcsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "octets" | "bytes" => Ok(FoldMode::Octets),
            "characters" | "chars" => Ok(FoldMode::Characters),
            other => Err(IcsError::invalid_value(
                "fold mode",
                format!("'{other}' is not one of: octets, characters"),
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Folding
// ---------------------------------------------------------------------------

/// Fold a single content line at 75 octets.
///
/// ```
/// use ics_codec::text::fold_line;
///
/// let line = format!("DESCRIPTION:{}", "x".repeat(100));
/// let folded = fold_line(&line);
/// assert!(folded.split("\r\n").all(|l| l.len() <= 75));
/// ```
pub fn fold_line(line: &str) -> String {
    fold_line_with(line, FoldMode::Octets)
}

/// Fold a single content line, measuring length according to `mode`.
///
/// Continuation lines start with one space, which counts toward their limit.
/// The input must not itself contain line breaks.
pub fn fold_line_with(line: &str, mode: FoldMode) -> String {
    let total: usize = line.chars().map(|c| mode.width(c)).sum();
    if total <= MAX_LINE_LENGTH {
        return line.to_string();
    }

    let mut out = String::with_capacity(line.len() + line.len() / MAX_LINE_LENGTH * 3);
    let mut current = 0;

    for ch in line.chars() {
        let width = mode.width(ch);
        if current + width > MAX_LINE_LENGTH {
            out.push_str("\r\n ");
            current = 1;
        }
        out.push(ch);
        current += width;
    }

    out
}

// ---------------------------------------------------------------------------
// Unfolding
// ---------------------------------------------------------------------------

/// Split text into physical lines, accepting CRLF, LF, and CR terminators.
///
/// A trailing terminator does not produce an empty final line; blank lines in
/// the middle of the text are preserved.
pub fn physical_lines(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\r' => {
                lines.push(&text[start..i]);
                if bytes.get(i + 1) == Some(&b'\n') {
                    i += 1;
                }
                start = i + 1;
            }
            b'\n' => {
                lines.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }

    if start < bytes.len() {
        lines.push(&text[start..]);
    }
    lines
}

/// Unfold text into logical lines.
///
/// Any physical line starting with a space or tab is appended (minus that one
/// whitespace character) to the preceding logical line. A continuation with
/// nothing before it is kept as its own line, untouched.
pub fn logical_lines(text: &str) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    for line in physical_lines(text) {
        let is_continuation = line.starts_with(' ') || line.starts_with('\t');
        match lines.last_mut() {
            Some(previous) if is_continuation => previous.push_str(&line[1..]),
            _ => lines.push(line.to_string()),
        }
    }
    lines
}

/// Unfold text and join the logical lines with `\n`.
///
/// ```
/// use ics_codec::text::{fold_line, unfold_lines};
///
/// let line = format!("SUMMARY:{}", "a".repeat(90));
/// assert_eq!(unfold_lines(&fold_line(&line)), line);
/// ```
pub fn unfold_lines(text: &str) -> String {
    logical_lines(text).join("\n")
}

// ---------------------------------------------------------------------------
// Escaping
// ---------------------------------------------------------------------------

/// Escape a TEXT value: `\` → `\\`, `;` → `\;`, `,` → `\,`, newline → `\n`.
///
/// Backslash is handled in the same pass as the other characters, so nothing
/// is ever escaped twice.
pub fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + s.len() / 8);
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            '\n' => out.push_str("\\n"),
            _ => out.push(ch),
        }
    }
    out
}

/// Reverse [`escape_text`]. Accepts `\N` as well as `\n` for newline.
///
/// Unknown escape sequences and a trailing lone backslash are kept verbatim.
pub fn unescape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('\\') => out.push('\\'),
            Some(';') => out.push(';'),
            Some(',') => out.push(','),
            Some('n') | Some('N') => out.push('\n'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Normalize CRLF and bare CR inside a free-text value to `\n`.
pub(crate) fn normalize_newlines(s: &str) -> String {
    if !s.contains('\r') {
        return s.to_string();
    }
    s.replace("\r\n", "\n").replace('\r', "\n")
}
