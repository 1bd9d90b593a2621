//! Python bindings for the docmark comment renderer.

use docmark_core::{
    error::{ParseError as CoreParseError, ParseErrorKind as CoreParseErrorKind},
    span::Span as CoreSpan,
    SplitResult as CoreSplitResult, Token as CoreToken, TokenKind as CoreTokenKind,
};
use pyo3::prelude::*;

// ============================================================================
// Span
// ============================================================================

/// Source location in the input text (byte offsets).
#[pyclass(frozen, get_all, name = "Span")]
#[derive(Clone)]
pub struct PySpan {
    pub start: u32,
    pub end: u32,
}

#[pymethods]
impl PySpan {
    fn __repr__(&self) -> String {
        format!("Span({}, {})", self.start, self.end)
    }

    fn __len__(&self) -> usize {
        (self.end - self.start) as usize
    }
}

impl From<CoreSpan> for PySpan {
    fn from(s: CoreSpan) -> Self {
        PySpan {
            start: s.start,
            end: s.end,
        }
    }
}

// ============================================================================
// Tokens
// ============================================================================

/// Lexical token category.
#[pyclass(frozen, eq, eq_int, name = "TokenKind")]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PyTokenKind {
    ParagraphStart,
    Text,
    Star,
    StarStar,
    Raw,
    Url,
    NamedUrl,
    Indent,
    Eof,
}

impl From<CoreTokenKind> for PyTokenKind {
    fn from(k: CoreTokenKind) -> Self {
        match k {
            CoreTokenKind::ParagraphStart => PyTokenKind::ParagraphStart,
            CoreTokenKind::Text => PyTokenKind::Text,
            CoreTokenKind::Star => PyTokenKind::Star,
            CoreTokenKind::StarStar => PyTokenKind::StarStar,
            CoreTokenKind::Raw => PyTokenKind::Raw,
            CoreTokenKind::Url => PyTokenKind::Url,
            CoreTokenKind::NamedUrl => PyTokenKind::NamedUrl,
            CoreTokenKind::Indent => PyTokenKind::Indent,
            CoreTokenKind::Eof => PyTokenKind::Eof,
        }
    }
}

/// A token with the input text that produced it.
#[pyclass(frozen, get_all, name = "Token")]
#[derive(Clone)]
pub struct PyToken {
    pub kind: PyTokenKind,
    pub value: String,
    pub span: PySpan,
}

#[pymethods]
impl PyToken {
    fn __repr__(&self) -> String {
        format!(
            "Token({:?}, {:?}, {}..{})",
            self.kind, self.value, self.span.start, self.span.end
        )
    }
}

impl From<CoreToken<'_>> for PyToken {
    fn from(t: CoreToken<'_>) -> Self {
        PyToken {
            kind: t.kind.into(),
            value: t.value.to_string(),
            span: t.span.into(),
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Comment splitting error category.
#[pyclass(frozen, eq, eq_int, name = "ParseErrorKind")]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PyParseErrorKind {
    UnclosedDelimiter,
    InvalidSyntax,
}

impl From<CoreParseErrorKind> for PyParseErrorKind {
    fn from(k: CoreParseErrorKind) -> Self {
        match k {
            CoreParseErrorKind::UnclosedDelimiter => PyParseErrorKind::UnclosedDelimiter,
            CoreParseErrorKind::InvalidSyntax => PyParseErrorKind::InvalidSyntax,
        }
    }
}

/// A problem found while splitting comment source.
#[pyclass(frozen, get_all, name = "ParseError")]
#[derive(Clone)]
pub struct PyParseError {
    pub message: String,
    pub span: Option<PySpan>,
    pub kind: PyParseErrorKind,
    pub recoverable: bool,
}

#[pymethods]
impl PyParseError {
    fn __repr__(&self) -> String {
        format!("ParseError({:?}, {:?})", self.message, self.kind)
    }

    fn __str__(&self) -> String {
        match &self.span {
            Some(s) => format!("{} at bytes {}..{}", self.message, s.start, s.end),
            None => self.message.clone(),
        }
    }
}

impl From<CoreParseError> for PyParseError {
    fn from(e: CoreParseError) -> Self {
        PyParseError {
            message: e.message,
            span: e.span.map(PySpan::from),
            kind: e.kind.into(),
            recoverable: e.recoverable,
        }
    }
}

// ============================================================================
// SplitResult
// ============================================================================

/// Raw comments cut out of comment source, with any errors.
#[pyclass(frozen, name = "SplitResult")]
pub struct PySplitResult {
    #[pyo3(get)]
    pub lines: Vec<String>,
    #[pyo3(get)]
    pub errors: Vec<PyParseError>,
}

#[pymethods]
impl PySplitResult {
    #[getter]
    fn ok(&self) -> bool {
        self.errors.is_empty()
    }

    fn __repr__(&self) -> String {
        format!(
            "SplitResult(ok={}, lines={}, errors={})",
            self.errors.is_empty(),
            self.lines.len(),
            self.errors.len()
        )
    }
}

impl From<CoreSplitResult<'_>> for PySplitResult {
    fn from(r: CoreSplitResult<'_>) -> Self {
        PySplitResult {
            lines: r.lines.into_iter().map(str::to_string).collect(),
            errors: r.errors.into_iter().map(PyParseError::from).collect(),
        }
    }
}

// ============================================================================
// Module functions
// ============================================================================

/// Render raw comment strings to an HTML fragment.
///
/// Args:
///     lines: Raw comments in source order (`// ...` lines, `/* ... */` blocks)
///
/// Returns:
///     str: HTML, empty when the comment has no text
#[pyfunction]
#[pyo3(text_signature = "(lines)")]
fn render_to_html(lines: Vec<String>) -> String {
    docmark_core::render_to_html(&lines)
}

/// Render raw comment strings to plain text, markup left as written.
///
/// Args:
///     lines: Raw comments in source order
///
/// Returns:
///     str: Normalized comment text
#[pyfunction]
#[pyo3(text_signature = "(lines)")]
fn render_to_text(lines: Vec<String>) -> String {
    docmark_core::render_to_text(&lines)
}

/// Cut comment source into raw comments. Always returns a result.
///
/// Args:
///     source: Text holding `//` and `/* */` comments
///
/// Returns:
///     SplitResult: Raw comments and errors
#[pyfunction]
#[pyo3(text_signature = "(source)")]
fn split(source: &str) -> PySplitResult {
    docmark_core::split(source).into()
}

/// Cut comment source into raw comments. Raises ValueError on error.
#[pyfunction]
#[pyo3(text_signature = "(source)")]
fn try_split(source: &str) -> PyResult<Vec<String>> {
    match docmark_core::try_split(source) {
        Ok(lines) => Ok(lines.into_iter().map(str::to_string).collect()),
        Err(e) => Err(pyo3::exceptions::PyValueError::new_err(e.to_string())),
    }
}

/// Lex normalized comment text.
///
/// Args:
///     text: Comment text without delimiters (see render_to_text)
///
/// Returns:
///     list[Token]: Tokens in order, ending with TokenKind.Eof
#[pyfunction]
#[pyo3(text_signature = "(text)")]
fn tokens(text: &str) -> Vec<PyToken> {
    docmark_core::lex(text).map(PyToken::from).collect()
}

// ============================================================================
// Module
// ============================================================================

/// docmark - Documentation comment renderer.
#[pymodule]
fn pydm(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PySpan>()?;
    m.add_class::<PyTokenKind>()?;
    m.add_class::<PyToken>()?;
    m.add_class::<PyParseErrorKind>()?;
    m.add_class::<PyParseError>()?;
    m.add_class::<PySplitResult>()?;
    m.add_function(wrap_pyfunction!(render_to_html, m)?)?;
    m.add_function(wrap_pyfunction!(render_to_text, m)?)?;
    m.add_function(wrap_pyfunction!(split, m)?)?;
    m.add_function(wrap_pyfunction!(try_split, m)?)?;
    m.add_function(wrap_pyfunction!(tokens, m)?)?;
    Ok(())
}
