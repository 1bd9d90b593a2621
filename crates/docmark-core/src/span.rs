//! Byte ranges into the normalized comment text.
//!
//! Tokens record where they came from so that tree nodes can keep a stable
//! position for diagnostics and for comparing trees in tests.

/// A `[start, end)` byte range in the normalized text.
///
/// ```rust
/// use docmark_core::span::Span;
///
/// let span = Span::at(4, "**");
/// assert_eq!(span, Span::new(4, 6));
/// assert_eq!(span.slice("foo **bar**"), "**");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// First byte covered.
    pub start: u32,
    /// One past the last byte covered.
    pub end: u32,
}

impl Span {
    #[inline]
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Span of `text` when it begins at byte `start`.
    #[inline]
    pub const fn at(start: u32, text: &str) -> Self {
        Self {
            start,
            end: start + text.len() as u32,
        }
    }

    #[inline]
    pub const fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    #[inline]
    pub const fn contains(&self, offset: u32) -> bool {
        offset >= self.start && offset < self.end
    }

    /// Smallest span covering both `self` and `other`.
    #[inline]
    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// The text this span covers in `source`.
    ///
    /// Returns an empty string when the span does not fit the source or does
    /// not fall on character boundaries.
    #[inline]
    pub fn slice<'a>(&self, source: &'a str) -> &'a str {
        source
            .get(self.start as usize..self.end as usize)
            .unwrap_or("")
    }
}
