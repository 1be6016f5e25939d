//! Parsed Python source units.

use std::cell::RefCell;
use std::ops::Range;

use derive_more::{Display, Error};
use tree_sitter::{Node, Tree};

use crate::edit::{TextEdit, apply_edits};

thread_local! {
    static PARSER: RefCell<tree_sitter::Parser> = {
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&tree_sitter_python::LANGUAGE.into())
            .expect("Failed to set language");
        RefCell::new(parser)
    };
}

/// Parse `text`, reusing `old_tree` for incremental parsing when given.
pub fn parse_with_thread_local(text: &str, old_tree: Option<&Tree>) -> Option<Tree> {
    PARSER.with(|parser| parser.borrow_mut().parse(text, old_tree))
}

/// Source text that could not be parsed.
#[derive(Clone, Debug, Display, Error, PartialEq, Eq)]
#[display("{message}")]
pub struct ParseError {
    pub message: String,
    /// Byte range of the offending region.
    pub span: Range<usize>,
}

impl ParseError {
    fn from_tree(tree: &Tree, text: &str) -> Self {
        let Some(node) = first_error_node(tree.root_node()) else {
            return Self {
                message: "invalid syntax".to_owned(),
                span: 0..text.len(),
            };
        };
        let position = node.start_position();
        let message = if node.is_missing() {
            format!(
                "expected `{}` at line {}, column {}",
                node.kind(),
                position.row + 1,
                position.column + 1
            )
        } else {
            format!(
                "invalid syntax at line {}, column {}",
                position.row + 1,
                position.column + 1
            )
        };
        Self {
            message,
            span: node.byte_range(),
        }
    }
}

/// Find the first `ERROR` or `MISSING` node in document order.
fn first_error_node(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    let children: Vec<_> = node.children(&mut cursor).collect();
    children.into_iter().find_map(first_error_node)
}

/// A complete source unit together with its syntax tree.
///
/// Only error-free trees are ever constructed.
pub struct ParsedSource {
    text: String,
    tree: Tree,
}

impl ParsedSource {
    pub fn parse(text: impl Into<String>) -> Result<Self, ParseError> {
        let text = text.into();
        let tree = parse_with_thread_local(&text, None).ok_or_else(|| ParseError {
            message: "parser produced no tree".to_owned(),
            span: 0..text.len(),
        })?;
        Self::checked(text, tree)
    }

    fn checked(text: String, tree: Tree) -> Result<Self, ParseError> {
        if tree.root_node().has_error() {
            return Err(ParseError::from_tree(&tree, &text));
        }
        Ok(Self { text, tree })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    /// Source text covered by `node`.
    pub fn node_text(&self, node: &Node<'_>) -> &str {
        &self.text[node.byte_range()]
    }

    /// Apply `edits` and re-parse incrementally against the current tree.
    pub fn apply(self, edits: Vec<TextEdit>) -> Result<Self, ParseError> {
        let applied = apply_edits(&self.text, edits);
        if applied.is_empty() {
            return Ok(self);
        }

        let mut tree = self.tree;
        for edit in &applied.input_edits {
            tree.edit(edit);
        }
        let tree = parse_with_thread_local(&applied.text, Some(&tree)).ok_or_else(|| ParseError {
            message: "parser produced no tree".to_owned(),
            span: 0..applied.text.len(),
        })?;
        Self::checked(applied.text, tree)
    }

    pub fn into_text(self) -> String {
        self.text
    }
}
