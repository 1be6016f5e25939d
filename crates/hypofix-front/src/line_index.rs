//! Line index for converting byte offsets into tree-sitter points.
//!
//! Tree-sitter positions are 0-based `(row, column)` pairs where the column is
//! a byte offset within the row. Edits are computed as byte ranges, so every
//! `InputEdit` handed to tree-sitter needs this conversion.

use tree_sitter::Point;

/// Line index for a source text.
///
/// Caches line start positions for efficient position conversion.
pub struct LineIndex {
    /// Byte offset of the start of each line (0-indexed).
    line_starts: Vec<usize>,
    len: usize,
}

impl LineIndex {
    /// Create a line index from source text.
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        for (i, b) in source.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push(i + 1);
            }
        }
        Self {
            line_starts,
            len: source.len(),
        }
    }

    /// Convert a byte offset to a tree-sitter point.
    pub fn point(&self, offset: usize) -> Point {
        let offset = offset.min(self.len);
        let row = self
            .line_starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1);
        Point {
            row,
            column: offset - self.line_starts[row],
        }
    }
}

/// Advance `start` over `text`, returning the point just past it.
pub fn advance_point(start: Point, text: &str) -> Point {
    match text.rfind('\n') {
        Some(last) => Point {
            row: start.row + text.bytes().filter(|&b| b == b'\n').count(),
            column: text.len() - last - 1,
        },
        None => Point {
            row: start.row,
            column: start.column + text.len(),
        },
    }
}
