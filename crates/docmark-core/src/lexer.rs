//! Pull-based lexer for the doc comment markup.
//!
//! The lexer walks normalized comment text (see [`crate::comment`]) and
//! yields a flat stream of [`Token`]s: paragraph starts, text runs, `*` and
//! `**` markers, code spans, URLs, named links and indented runs. It is an
//! [`Iterator`], so a consumer pulls one token at a time and may stop early.
//!
//! # Scanning rules
//!
//! - Text runs end at `` ` ``, `*`, `[`, a newline, or at the scheme of a URL.
//!   A `:` only ends a run when it completes a URL.
//! - `\n`, `\r\n` and a bare `\r` each count as one line break.
//! - A blank line ends the paragraph; the next content starts a new one.
//! - A line starting with a space or tab begins an indented run that lasts
//!   until the next line that is neither indented nor empty.
//! - Lookahead never exceeds the current marker (`**` vs `*`), and nothing is
//!   taken back once emitted.
//!
//! Every stream ends with exactly one [`TokenKind::Eof`].

use std::sync::LazyLock;

use memchr::{memchr2, memchr3};
use regex::Regex;

use crate::span::Span;

/// Kinds of tokens produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Start of a paragraph (empty value).
    ParagraphStart,
    /// Literal text run.
    Text,
    /// Single `*` marker.
    Star,
    /// Double `**` marker.
    StarStar,
    /// Code span, backticks included.
    Raw,
    /// Bare URL.
    Url,
    /// `[name](url)` link.
    NamedUrl,
    /// One or more consecutive indented lines.
    Indent,
    /// End of input (empty value).
    Eof,
}

/// A token with the exact input slice that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub value: &'a str,
    pub span: Span,
}

impl<'a> Token<'a> {
    #[inline]
    pub fn new(kind: TokenKind, value: &'a str, pos: u32) -> Self {
        Self {
            kind,
            value,
            span: Span::at(pos, value),
        }
    }

    /// Byte offset where the token begins.
    #[inline]
    pub fn pos(&self) -> u32 {
        self.span.start
    }
}

/// URL schemes recognized in bare URLs and named links.
pub const SCHEMES: &[&str] = &[
    "http", "https", "ftp", "file", "gopher", "mailto", "news", "nntp", "telnet", "wais",
    "prospero",
];

const URL_PATTERN: &str = concat!(
    r"(?:https?|ftp|file|gopher|mailto|news|nntp|telnet|wais|prospero)://",
    r"[a-zA-Z0-9_@\-]+(?:[.:][a-zA-Z0-9_@\-]+)*/?",
    r"[a-zA-Z0-9_?%#~&/\-+=()]+(?:[:.,;][a-zA-Z0-9_?%#~&/\-+=()]+)*",
);

static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!("^{URL_PATTERN}")).expect("valid URL pattern"));

static NAMED_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^\[[a-zA-Z0-9_@\- ]+\]\({URL_PATTERN}\)"))
        .expect("valid named URL pattern")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Between paragraphs: at input start, after a blank line or an indented run.
    ParagraphStart,
    /// Inside paragraph content.
    Text,
    /// Input exhausted, `Eof` not yet emitted.
    Eof,
    Done,
}

/// Streaming lexer over normalized comment text.
pub struct Lexer<'a> {
    input: &'a str,
    bytes: &'a [u8],
    /// Start of the pending token.
    start: usize,
    /// Scan position.
    pos: usize,
    state: State,
    /// Second token of a step that produces two (text before a URL).
    pending: Option<Token<'a>>,
    /// Last search results for marker and line-break bytes; stale once
    /// `pos` has moved past them.
    next_marker: Option<usize>,
    next_break: Option<usize>,
}

/// Lex `input` into a token stream.
#[inline]
pub fn lex(input: &str) -> Lexer<'_> {
    Lexer::new(input)
}

impl<'a> Lexer<'a> {
    #[inline]
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            bytes: input.as_bytes(),
            start: 0,
            pos: 0,
            state: State::ParagraphStart,
            pending: None,
            next_marker: None,
            next_break: None,
        }
    }

    /// Emit the pending slice `start..end` and move past it.
    #[inline]
    fn emit(&mut self, kind: TokenKind, end: usize) -> Token<'a> {
        let token = Token::new(kind, &self.input[self.start..end], self.start as u32);
        self.start = end;
        self.pos = end;
        token
    }

    fn lex_paragraph_start(&mut self) -> Option<Token<'a>> {
        while self.pos < self.bytes.len() && is_newline(self.bytes[self.pos]) {
            self.pos += 1;
        }
        self.start = self.pos;

        match self.bytes.get(self.pos) {
            None => {
                self.state = State::Eof;
                None
            }
            Some(&b) if is_space(b) => Some(self.lex_indent()),
            Some(_) => {
                self.state = State::Text;
                Some(self.emit(TokenKind::ParagraphStart, self.pos))
            }
        }
    }

    /// Scan one step of paragraph content. Returns `None` when the step only
    /// changed state.
    fn lex_text(&mut self) -> Option<Token<'a>> {
        loop {
            let at = self.find_special();
            if at >= self.bytes.len() {
                self.pos = self.bytes.len();
                self.state = State::Eof;
                if self.start < self.pos {
                    return Some(self.emit(TokenKind::Text, self.pos));
                }
                return None;
            }

            if self.bytes[at] == b':' {
                match self.url_before(at) {
                    Some(scheme) => return Some(self.lex_url(scheme)),
                    None => {
                        self.pos = at + 1;
                        continue;
                    }
                }
            }

            // Flush text up to the marker, the marker itself is handled on the next call.
            if self.start < at {
                return Some(self.emit(TokenKind::Text, at));
            }

            match self.bytes[at] {
                b'`' => match self.code_span_end(at) {
                    Some(end) => return Some(self.emit(TokenKind::Raw, end)),
                    None => self.pos = at + 1,
                },
                b'*' => {
                    let (kind, width) = if self.bytes.get(at + 1) == Some(&b'*') {
                        (TokenKind::StarStar, 2)
                    } else {
                        (TokenKind::Star, 1)
                    };
                    return Some(self.emit(kind, at + width));
                }
                b'[' => match NAMED_URL_RE.find(&self.input[at..]) {
                    Some(m) => return Some(self.emit(TokenKind::NamedUrl, at + m.end())),
                    None => self.pos = at + 1,
                },
                _ => {
                    let next = self.line_break(at);
                    match self.bytes.get(next) {
                        Some(&b) if is_space(b) => {
                            // The newline in front of an indented run belongs to no token.
                            self.start = next;
                            self.pos = next;
                            return Some(self.lex_indent());
                        }
                        Some(&b) if is_newline(b) => {
                            self.pos = self.line_break(next);
                            self.state = State::ParagraphStart;
                            return None;
                        }
                        // A single newline stays in the text run.
                        _ => self.pos = next,
                    }
                }
            }
        }
    }

    /// Position of the next byte that may start a non-text token.
    ///
    /// Each search result is reused until the scan passes it, so every byte
    /// is searched at most once per byte class.
    fn find_special(&mut self) -> usize {
        let (pos, len) = (self.pos, self.bytes.len());
        let marker = match self.next_marker.filter(|&at| at >= pos) {
            Some(at) => at,
            None => {
                let at = memchr3(b'*', b'`', b'[', &self.bytes[pos..]).map_or(len, |i| pos + i);
                *self.next_marker.insert(at)
            }
        };
        let line = match self.next_break.filter(|&at| at >= pos) {
            Some(at) => at,
            None => {
                let at = memchr3(b'\n', b':', b'\r', &self.bytes[pos..]).map_or(len, |i| pos + i);
                *self.next_break.insert(at)
            }
        };
        marker.min(line)
    }

    /// Position just past the line break at `at`; `\r\n` counts as one.
    #[inline]
    fn line_break(&self, at: usize) -> usize {
        if self.bytes[at] == b'\r' && self.bytes.get(at + 1) == Some(&b'\n') {
            at + 2
        } else {
            at + 1
        }
    }

    /// Start of the URL whose scheme ends at the colon at `colon`, if the
    /// text around the colon forms one.
    fn url_before(&self, colon: usize) -> Option<usize> {
        let scheme_start = self.bytes[..colon]
            .iter()
            .rposition(|&b| !is_word(b))
            .map_or(0, |i| i + 1);

        if scheme_start < self.start || !SCHEMES.contains(&&self.input[scheme_start..colon]) {
            return None;
        }
        URL_RE
            .is_match(&self.input[scheme_start..])
            .then_some(scheme_start)
    }

    fn lex_url(&mut self, scheme_start: usize) -> Token<'a> {
        let len = URL_RE
            .find(&self.input[scheme_start..])
            .map_or(0, |m| m.end());
        debug_assert!(len > 0, "URL matched by url_before must match again");

        if self.start < scheme_start {
            let text = self.emit(TokenKind::Text, scheme_start);
            self.pending = Some(self.emit(TokenKind::Url, scheme_start + len));
            text
        } else {
            self.emit(TokenKind::Url, scheme_start + len)
        }
    }

    /// End of the code span opened at `open`, just past its closing backtick.
    ///
    /// A span cannot cross a blank line or run into an indented line.
    fn code_span_end(&self, open: usize) -> Option<usize> {
        let mut i = open + 1;
        while i < self.bytes.len() {
            match self.bytes[i] {
                b'`' => return Some(i + 1),
                b if is_newline(b) => {
                    i = self.line_break(i);
                    if self.bytes.get(i).is_some_and(|&n| is_blank(n)) {
                        return None;
                    }
                }
                _ => i += 1,
            }
        }
        None
    }

    /// Scan an indented run starting at `self.start`, which is known to be a
    /// space or tab at the beginning of a line.
    fn lex_indent(&mut self) -> Token<'a> {
        let mut pos = self.start;
        loop {
            let Some(i) = memchr2(b'\n', b'\r', &self.bytes[pos..]) else {
                pos = self.bytes.len();
                break;
            };
            pos = self.line_break(pos + i);
            // Indented and empty lines continue the run.
            match self.bytes.get(pos) {
                Some(&b) if is_blank(b) => {}
                _ => break,
            }
        }

        self.state = State::ParagraphStart;
        self.emit(TokenKind::Indent, pos)
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        if let Some(token) = self.pending.take() {
            return Some(token);
        }

        loop {
            let token = match self.state {
                State::ParagraphStart => self.lex_paragraph_start(),
                State::Text => self.lex_text(),
                State::Eof => {
                    self.state = State::Done;
                    self.start = self.bytes.len();
                    Some(self.emit(TokenKind::Eof, self.bytes.len()))
                }
                State::Done => return None,
            };
            if token.is_some() {
                return token;
            }
        }
    }
}

impl std::iter::FusedIterator for Lexer<'_> {}

#[inline]
fn is_newline(b: u8) -> bool {
    b == b'\n' || b == b'\r'
}

#[inline]
fn is_space(b: u8) -> bool {
    b == b' ' || b == b'\t'
}

#[inline]
fn is_blank(b: u8) -> bool {
    is_space(b) || is_newline(b)
}

#[inline]
fn is_word(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}
