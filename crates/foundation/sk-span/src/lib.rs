//! Source file spans and locations

use serde::{Deserialize, Serialize};
use std::ops::Range;

/// A unique identifier for a source file
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct FileId(pub u32);

impl FileId {
    /// Creates a new file id
    pub fn new(id: u32) -> Self {
        Self(id)
    }
}

/// A byte offset span in a source file
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct Span {
    /// Start byte offset (inclusive)
    pub start: u32,
    /// End byte offset (exclusive)
    pub end: u32,
}

/// Offset marking nodes that were synthesized by a lowering pass rather than
/// written in source. Synthetic spans never point at user code.
pub const SYNTHETIC_OFFSET: u32 = u32::MAX;

impl Span {
    /// Creates a new span from byte offsets
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// The span given to synthesized nodes
    pub const SYNTHETIC: Self = Self {
        start: SYNTHETIC_OFFSET,
        end: SYNTHETIC_OFFSET,
    };

    /// Whether this span marks a synthesized node
    pub fn is_synthetic(&self) -> bool {
        self.start == SYNTHETIC_OFFSET
    }

    /// The span as a byte range
    pub fn range(&self) -> Range<usize> {
        self.start as usize..self.end as usize
    }

    /// Span length in bytes
    pub fn len(&self) -> u32 {
        self.end - self.start
    }

    /// Whether the span covers no bytes
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// A span with its containing file
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct FileSpan {
    /// The file this span points into
    pub file: FileId,
    /// The byte span within the file
    pub span: Span,
}

impl FileSpan {
    /// Creates a new file span
    pub fn new(file: FileId, span: Span) -> Self {
        Self { file, span }
    }

    /// A synthetic span in the given file
    pub fn synthetic(file: FileId) -> Self {
        Self {
            file,
            span: Span::SYNTHETIC,
        }
    }

    /// Whether this span marks a synthesized node
    pub fn is_synthetic(&self) -> bool {
        self.span.is_synthetic()
    }

    /// The span as a byte range
    pub fn range(&self) -> Range<usize> {
        self.span.range()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthetic_span_is_marked() {
        let span = FileSpan::synthetic(FileId(3));
        assert!(span.is_synthetic());
        assert!(!FileSpan::new(FileId(3), Span::new(0, 4)).is_synthetic());
    }
}
