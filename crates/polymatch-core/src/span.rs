// Pattern identifiers, spans and reported matches.

use std::fmt;
use std::ops::Range;

// ---------------------------------------------------------------------------
// PatternId
// ---------------------------------------------------------------------------

/// Identifies a pattern by its insertion order, starting at 0.
///
/// Every insertion gets a fresh id, including repeated insertions of the
/// same string, so callers can tell identical patterns apart and decide how
/// to deduplicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct PatternId(u32);

impl PatternId {
    /// Largest representable pattern id.
    pub const MAX: usize = u32::MAX as usize;

    /// Create a pattern id, or `None` if `index` exceeds [`PatternId::MAX`].
    #[inline]
    pub fn new(index: usize) -> Option<Self> {
        u32::try_from(index).ok().map(Self)
    }

    #[inline]
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for PatternId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// ---------------------------------------------------------------------------
// Span
// ---------------------------------------------------------------------------

/// A half-open range `[start, end)` of symbol positions in a corpus.
///
/// Positions count symbols, not bytes: for a `char` corpus they are char
/// indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    #[inline]
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "span start {start} past end {end}");
        Self { start, end }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    #[inline]
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

impl From<Span> for Range<usize> {
    fn from(span: Span) -> Self {
        span.range()
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

// ---------------------------------------------------------------------------
// Match
// ---------------------------------------------------------------------------

/// One occurrence of a pattern in a corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Match {
    pub pattern: PatternId,
    pub span: Span,
}

impl Match {
    #[inline]
    pub fn new(pattern: PatternId, start: usize, end: usize) -> Self {
        Self {
            pattern,
            span: Span::new(start, end),
        }
    }

    #[inline]
    pub fn pattern(&self) -> PatternId {
        self.pattern
    }

    #[inline]
    pub fn start(&self) -> usize {
        self.span.start
    }

    #[inline]
    pub fn end(&self) -> usize {
        self.span.end
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.span.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.span.is_empty()
    }

    /// The matched slice of `corpus`.
    ///
    /// Panics if the span lies outside `corpus`.
    pub fn slice<'c, T>(&self, corpus: &'c [T]) -> &'c [T] {
        &corpus[self.span.range()]
    }
}
