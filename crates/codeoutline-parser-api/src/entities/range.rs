use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

/// Location of a declaration or diagnostic in the source text
///
/// `start..end` are byte offsets; lines are 1-indexed and inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SourceRange {
    pub start: usize,
    pub end: usize,
    pub line_start: usize,
    pub line_end: usize,
}

impl SourceRange {
    pub fn new(start: usize, end: usize, line_start: usize, line_end: usize) -> Self {
        Self {
            start,
            end,
            line_start,
            line_end,
        }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// True when `other` lies entirely inside this range
    pub fn contains(&self, other: &SourceRange) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    pub fn overlaps(&self, other: &SourceRange) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn byte_range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Smallest range covering both
    pub fn cover(&self, other: &SourceRange) -> SourceRange {
        let head = if self.start <= other.start { self } else { other };
        let tail = if self.end >= other.end { self } else { other };
        SourceRange {
            start: head.start,
            end: tail.end,
            line_start: head.line_start,
            line_end: tail.line_end,
        }
    }

    /// Slice the covered text out of `source`, if the range is in bounds
    pub fn slice<'a>(&self, source: &'a str) -> Option<&'a str> {
        source.get(self.start..self.end)
    }
}

impl fmt::Display for SourceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.line_start == self.line_end {
            write!(f, "line {} ({}..{})", self.line_start, self.start, self.end)
        } else {
            write!(
                f,
                "lines {}-{} ({}..{})",
                self.line_start, self.line_end, self.start, self.end
            )
        }
    }
}
