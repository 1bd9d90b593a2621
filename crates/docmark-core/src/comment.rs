//! Raw comment handling: turning declaration comments into plain text.
//!
//! A documentation comment arrives as an ordered list of raw comment
//! strings, each either a `//` line comment or a `/* ... */` block comment
//! (which may span several lines). [`normalize`] strips the delimiters,
//! re-indents block comments and joins everything into one buffer whose
//! paragraphs are separated by exactly one blank line. Relative indentation
//! survives normalization; the lexer later reads it as a preformatted block.
//!
//! [`split`] goes the other way round for tools that only have comment
//! source text: it cuts the text into the raw comment list that
//! [`normalize`] expects.

use std::borrow::Cow;

use memchr::{memchr, memmem};
use tracing::debug;

use crate::error::{ParseError, ParseErrors};
use crate::span::Span;

const LINE_MARKER: &str = "//";
const BLOCK_OPEN: &str = "/*";
const BLOCK_CLOSE: &str = "*/";

/// Join raw comment strings into normalized plain text.
///
/// Never fails. Input that is not a comment at all is passed through with
/// only its first leading space removed.
pub fn normalize<S: AsRef<str>>(comment: &[S]) -> String {
    let mut text = String::new();
    let mut blank = false;

    for raw in comment {
        let raw = raw.as_ref();
        let body: Cow<'_, str> = if let Some(rest) = raw.strip_prefix(LINE_MARKER) {
            Cow::Borrowed(strip_space(rest))
        } else if let Some(rest) = raw.strip_prefix(BLOCK_OPEN) {
            let rest = rest.strip_suffix(BLOCK_CLOSE).unwrap_or(rest);
            // The first line may keep one more space than the re-indent removed.
            match reindent(strip_space(rest)) {
                Cow::Borrowed(body) => Cow::Borrowed(strip_space(body)),
                Cow::Owned(body) => Cow::Owned(strip_space(&body).to_string()),
            }
        } else {
            Cow::Borrowed(strip_space(raw))
        };

        for line in body.split('\n') {
            let line = line.trim_end();
            if line.is_empty() {
                // Leading blank lines are dropped, runs collapse to one.
                blank = !text.is_empty();
                continue;
            }
            if !text.is_empty() {
                text.push('\n');
                if blank {
                    text.push('\n');
                }
            }
            blank = false;
            text.push_str(line);
        }
    }

    text
}

/// Remove the indentation shared by all indented, non-blank lines.
///
/// Lines without any indentation do not take part in the measurement, so
/// the first line of a block comment (which shares its line with `/*`) does
/// not pin the common indentation to zero. A line only loses its prefix when
/// it is longer than the prefix and the prefix is pure whitespace.
pub fn reindent(text: &str) -> Cow<'_, str> {
    let common = text
        .split('\n')
        .filter(|line| !is_blank(line))
        .map(indent_len)
        .filter(|&n| n > 0)
        .min();

    let Some(n) = common else {
        return Cow::Borrowed(text);
    };

    let lines: Vec<&str> = text
        .split('\n')
        .map(|line| {
            if line.len() > n && line.as_bytes()[..n].iter().all(|&b| is_whitespace(b)) {
                &line[n..]
            } else {
                line
            }
        })
        .collect();
    Cow::Owned(lines.join("\n"))
}

/// Number of leading space and tab bytes.
#[inline]
pub(crate) fn indent_len(line: &str) -> usize {
    line.bytes().take_while(|&b| b == b' ' || b == b'\t').count()
}

#[inline]
fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r' | b'\n')
}

#[inline]
fn is_blank(line: &str) -> bool {
    line.bytes().all(is_whitespace)
}

#[inline]
fn strip_space(s: &str) -> &str {
    s.strip_prefix(' ').unwrap_or(s)
}

/// Raw comments cut out of comment source, plus what went wrong on the way.
#[derive(Debug)]
pub struct SplitResult<'a> {
    /// Raw comment strings in source order, delimiters included.
    pub lines: Vec<&'a str>,
    /// Problems found while splitting.
    pub errors: ParseErrors,
}

impl<'a> SplitResult<'a> {
    /// Check if splitting completed without errors.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Cut comment source text into raw comment strings.
///
/// Every `//` line becomes one element and every `/* ... */` block becomes
/// one element, however many lines it spans. Indentation in front of a
/// comment marker and blank lines are skipped. Splitting always runs to the
/// end of the input:
///
/// - an unterminated `/*` takes the rest of the input and is reported as an
///   unclosed delimiter;
/// - a line that is not a comment is kept as-is and reported as invalid.
pub fn split(source: &str) -> SplitResult<'_> {
    let bytes = source.as_bytes();
    let mut lines = Vec::new();
    let mut errors = ParseErrors::new();
    let mut offset = 0;

    while offset < bytes.len() {
        let line_end = memchr(b'\n', &bytes[offset..]).map_or(bytes.len(), |i| offset + i);
        let start = offset + indent_len(&source[offset..line_end]);
        let body = source[start..line_end].trim_end();

        if body.is_empty() {
            offset = line_end + 1;
            continue;
        }

        if body.starts_with(LINE_MARKER) {
            lines.push(body);
        } else if body.starts_with(BLOCK_OPEN) {
            let content = start + BLOCK_OPEN.len();
            match memmem::find(&bytes[content..], BLOCK_CLOSE.as_bytes()) {
                Some(i) => {
                    let end = content + i + BLOCK_CLOSE.len();
                    lines.push(&source[start..end]);
                    // Whatever follows the block on its last line is split on its own.
                    offset = end;
                    continue;
                }
                None => {
                    errors.push(ParseError::unclosed_delimiter(
                        "block comment",
                        Some(Span::new(start as u32, bytes.len() as u32)),
                    ));
                    lines.push(&source[start..]);
                    break;
                }
            }
        } else {
            errors.push(ParseError::invalid_syntax(
                "text",
                Some(Span::at(start as u32, body)),
            ));
            lines.push(body);
        }

        offset = line_end + 1;
    }

    debug!(
        comments = lines.len(),
        errors = errors.len(),
        "split comment source"
    );
    SplitResult { lines, errors }
}

/// Like [`split`], but fails on the first problem.
pub fn try_split(source: &str) -> Result<Vec<&str>, ParseError> {
    let SplitResult { lines, errors } = split(source);
    match errors.into_iter().next() {
        Some(err) => Err(err),
        None => Ok(lines),
    }
}
