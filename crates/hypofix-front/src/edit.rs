//! Byte-range text edits.
//!
//! Rewrites never regenerate source from the tree. They are expressed as
//! edits against the original text, so every byte outside an edit survives
//! untouched.

use std::ops::Range;

use tree_sitter::InputEdit;

use crate::line_index::{LineIndex, advance_point};

/// Replace `range` of the source with `replacement`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TextEdit {
    pub range: Range<usize>,
    pub replacement: String,
}

impl TextEdit {
    /// Insert `text` before the byte at `offset`.
    pub fn insert(offset: usize, text: impl Into<String>) -> Self {
        Self {
            range: offset..offset,
            replacement: text.into(),
        }
    }

    /// Replace the bytes in `range` with `text`.
    pub fn replace(range: Range<usize>, text: impl Into<String>) -> Self {
        Self {
            range,
            replacement: text.into(),
        }
    }

    pub fn is_insertion(&self) -> bool {
        self.range.is_empty()
    }
}

/// The result of applying a batch of edits.
pub struct AppliedEdits {
    /// The edited text.
    pub text: String,
    /// Tree edits describing the change, in the order they must be applied
    /// to the old tree.
    pub input_edits: Vec<InputEdit>,
}

impl AppliedEdits {
    pub fn is_empty(&self) -> bool {
        self.input_edits.is_empty()
    }
}

/// Apply `edits` to `source`.
///
/// Edits may arrive in any order. An edit overlapping one that starts earlier
/// is dropped; a traversal that produces such a pair has a bug, and keeping
/// the first edit keeps the output well-formed.
pub fn apply_edits(source: &str, mut edits: Vec<TextEdit>) -> AppliedEdits {
    edits.sort_by_key(|edit| (edit.range.start, edit.range.end));

    let mut accepted: Vec<TextEdit> = Vec::with_capacity(edits.len());
    for edit in edits {
        if edit.range.end > source.len() || edit.range.start > edit.range.end {
            tracing::warn!(range = ?edit.range, "Dropping edit outside of source");
            continue;
        }
        if let Some(prev) = accepted.last()
            && (edit.range.start < prev.range.end
                || (edit.range.start == prev.range.start && prev.is_insertion()))
        {
            tracing::warn!(
                range = ?edit.range,
                previous = ?prev.range,
                "Dropping overlapping edit"
            );
            continue;
        }
        accepted.push(edit);
    }

    let mut text = String::with_capacity(
        source.len() + accepted.iter().map(|e| e.replacement.len()).sum::<usize>(),
    );
    let mut cursor = 0;
    for edit in &accepted {
        text.push_str(&source[cursor..edit.range.start]);
        text.push_str(&edit.replacement);
        cursor = edit.range.end;
    }
    text.push_str(&source[cursor..]);

    // Later edits first: the coordinates of an earlier region are unaffected
    // by edits after it, so every position can be read off the old text.
    let index = LineIndex::new(source);
    let input_edits = accepted
        .iter()
        .rev()
        .map(|edit| {
            let start_position = index.point(edit.range.start);
            InputEdit {
                start_byte: edit.range.start,
                old_end_byte: edit.range.end,
                new_end_byte: edit.range.start + edit.replacement.len(),
                start_position,
                old_end_position: index.point(edit.range.end),
                new_end_position: advance_point(start_position, &edit.replacement),
            }
        })
        .collect();

    AppliedEdits { text, input_edits }
}
