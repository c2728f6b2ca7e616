//! Byte spans into the source text.

use std::ops::Range;

/// A half-open byte range into the source string.
///
/// Spans are attached to tokens, list nodes and errors so that diagnostics
/// can point at the exact offending text.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// A zero-length span at a single offset.
    pub fn at(offset: usize) -> Self {
        Self::new(offset, offset)
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The smallest span covering both `self` and `other`.
    pub fn union(&self, other: Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

impl From<Range<usize>> for Span {
    fn from(range: Range<usize>) -> Self {
        Self::new(range.start, range.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_union() {
        let a = Span::new(3, 7);
        let b = Span::new(5, 12);
        assert_eq!(a.union(b), Span::new(3, 12));
    }

    #[test]
    fn test_len_and_empty() {
        assert_eq!(Span::new(2, 6).len(), 4);
        assert!(Span::at(9).is_empty());
    }
}
