//! hypofix: upgrade call sites of deprecated Hypothesis APIs.
//!
//! The [`refactor`] function takes Python source text and returns it with
//! deprecated calling conventions rewritten. Everything it does not change
//! is reproduced byte for byte.

pub mod codemod;
pub mod diagnostics;
pub mod files;
pub mod pipeline;

pub use pipeline::{RefactorError, Refactorer, refactor};
