//! Qualified-name resolution.
//!
//! Maps a call target to the set of fully-qualified names it could denote,
//! taking imports, aliases and Python scoping into account.

mod resolver;
mod scope;

pub use resolver::{NameResolver, Resolution};
pub use scope::{Binding, Scope, ScopeId, ScopeIndex, ScopeKind};
