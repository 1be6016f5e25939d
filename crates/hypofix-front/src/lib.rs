//! Front-end utilities for hypofix.
//!
//! This crate provides Tree-sitter parsing of Python source units, byte-range
//! editing with incremental re-parsing, call-site classification, and
//! qualified-name resolution.

pub mod call_site;
pub mod edit;
pub mod line_index;
pub mod resolve;
pub mod source_file;

pub use call_site::{Argument, ArgumentKind, CallShape, CallSite, collect_calls};
pub use edit::{AppliedEdits, TextEdit, apply_edits};
pub use line_index::LineIndex;
pub use resolve::{NameResolver, Resolution};
pub use source_file::{ParseError, ParsedSource, parse_with_thread_local};
