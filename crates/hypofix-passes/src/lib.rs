//! Rewrite passes for hypofix.
//!
//! This crate owns the Target Registry and its bundled signature table, the
//! memoized signature lookup, and the rewrite rules that upgrade deprecated
//! Hypothesis call sites.

pub mod error;
pub mod registry;
pub mod rules;
pub mod signature;

pub use error::ConfigError;
pub use rules::{KeywordStyle, RewriteRule, RuleContext, default_rules, run_rule};
pub use signature::{ParamDescriptor, ParamKind, Signature, SignatureDatabase};
