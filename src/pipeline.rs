//! Refactor pipeline.
//!
//! ```text
//! source text
//!     │
//!     ▼
//! parse ─► ParsedSource (error-free tree)
//!     │
//!     ▼
//! positional-kwonly ─► edits ─► incremental re-parse
//!     │
//!     ▼
//! complex-min-magnitude ─► edits ─► incremental re-parse
//!     │
//!     ▼
//! rewritten text
//! ```
//!
//! Each rule is one full traversal over the tree left by the previous rule.
//! The order is fixed: the sentinel rewrite only matches keyword arguments,
//! some of which the positional rewrite creates.

use derive_more::{Display, Error, From};
use hypofix_front::{ParseError, ParsedSource};
use hypofix_passes::{
    ConfigError, KeywordStyle, RewriteRule, RuleContext, SignatureDatabase, default_rules,
    run_rule,
};

/// Why a source unit could not be refactored.
#[derive(Debug, Display, Error, From)]
pub enum RefactorError {
    /// The input is not valid Python. Nothing is emitted.
    #[display("parse error: {_0}")]
    Parse(ParseError),
    /// The bundled registry is inconsistent. Fatal for the whole run.
    #[display("configuration error: {_0}")]
    Config(ConfigError),
}

/// Update a source string from deprecated to modern Hypothesis APIs, using
/// the default options.
pub fn refactor(code: &str) -> Result<String, RefactorError> {
    Refactorer::new().refactor(code)
}

/// A configured refactor pipeline.
pub struct Refactorer {
    rules: Vec<Box<dyn RewriteRule>>,
    signatures: SignatureDatabase,
    keyword_style: KeywordStyle,
}

impl Default for Refactorer {
    fn default() -> Self {
        Self::new()
    }
}

impl Refactorer {
    pub fn new() -> Self {
        Self {
            rules: default_rules(),
            signatures: SignatureDatabase::global().clone(),
            keyword_style: KeywordStyle::default(),
        }
    }

    pub fn with_keyword_style(mut self, keyword_style: KeywordStyle) -> Self {
        self.keyword_style = keyword_style;
        self
    }

    pub fn with_signatures(mut self, signatures: SignatureDatabase) -> Self {
        self.signatures = signatures;
        self
    }

    pub fn signatures(&self) -> &SignatureDatabase {
        &self.signatures
    }

    /// Rewrite one complete source unit.
    ///
    /// The result is byte-identical to `code` wherever no rule matched.
    pub fn refactor(&self, code: &str) -> Result<String, RefactorError> {
        let mut source = ParsedSource::parse(code)?;
        for rule in &self.rules {
            let ctx = RuleContext {
                source: &source,
                signatures: &self.signatures,
                keyword_style: self.keyword_style,
            };
            tracing::trace!(rule = rule.name(), description = rule.description(), "Running rule");
            let edits = run_rule(rule.as_ref(), &ctx)?;
            tracing::trace!(rule = rule.name(), edits = edits.len(), "Rule finished");
            source = source.apply(edits)?;
        }
        Ok(source.into_text())
    }
}
