//! Rewrite rules.
//!
//! A rule is a predicate over the qualified names a call may denote plus a
//! transform producing text edits for that call. Each rule runs as its own
//! full traversal of the source unit, and a rule that abstains returns no
//! edits.

mod complex_min_magnitude;
mod positional_kwonly;

pub use complex_min_magnitude::ComplexMinMagnitude;
pub use positional_kwonly::PositionalKeywordOnly;

use hypofix_front::{CallSite, NameResolver, ParsedSource, Resolution, TextEdit, collect_calls};

use crate::error::ConfigError;
use crate::signature::SignatureDatabase;

/// Spelling of an inserted `name=` marker.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KeywordStyle {
    pub space_before_equals: bool,
    pub space_after_equals: bool,
}

impl KeywordStyle {
    /// `name=value`
    pub const COMPACT: KeywordStyle = KeywordStyle {
        space_before_equals: false,
        space_after_equals: false,
    };

    /// `name = value`
    pub const SPACED: KeywordStyle = KeywordStyle {
        space_before_equals: true,
        space_after_equals: true,
    };

    /// Text inserted in front of a value to make it a keyword argument.
    pub fn marker(self, name: &str) -> String {
        let before = if self.space_before_equals { " " } else { "" };
        let after = if self.space_after_equals { " " } else { "" };
        format!("{name}{before}={after}")
    }
}

/// Everything a rule may consult while transforming one call.
pub struct RuleContext<'a> {
    pub source: &'a ParsedSource,
    pub signatures: &'a SignatureDatabase,
    pub keyword_style: KeywordStyle,
}

pub trait RewriteRule {
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    /// The target this rule acts on, if `resolution` names exactly one
    /// candidate and that candidate is one of the rule's targets.
    fn target<'r>(&self, resolution: &'r Resolution) -> Option<&'r str>;

    /// Edits turning `call` into its modern spelling. Empty when the call
    /// should be left alone.
    fn transform(
        &self,
        ctx: &RuleContext<'_>,
        call: &CallSite<'_>,
        target: &str,
    ) -> Result<Vec<TextEdit>, ConfigError>;
}

/// The rules of a full refactor, in the order they must run.
///
/// The sentinel rewrite runs last so it also sees keywords introduced by the
/// positional rewrite.
pub fn default_rules() -> Vec<Box<dyn RewriteRule>> {
    vec![
        Box::new(PositionalKeywordOnly),
        Box::new(ComplexMinMagnitude),
    ]
}

/// Traverse every call in `ctx.source` once and collect `rule`'s edits.
pub fn run_rule(rule: &dyn RewriteRule, ctx: &RuleContext<'_>) -> Result<Vec<TextEdit>, ConfigError> {
    let resolver = NameResolver::new(ctx.source);
    let mut edits = Vec::new();
    for call in collect_calls(ctx.source) {
        let resolution = resolver.resolve_call(&call);
        let Some(target) = rule.target(&resolution) else {
            if resolution.len() > 1 {
                tracing::debug!(
                    rule = rule.name(),
                    candidates = ?resolution.iter().collect::<Vec<_>>(),
                    "Ambiguous call target, leaving unchanged"
                );
            }
            continue;
        };
        let call_edits = rule.transform(ctx, &call, target)?;
        if !call_edits.is_empty() {
            tracing::debug!(
                rule = rule.name(),
                qualname = target,
                offset = call.span().start,
                edits = call_edits.len(),
                "Rewriting call"
            );
        }
        edits.extend(call_edits);
    }
    Ok(edits)
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Run a single rule over `code` and return the rewritten text.
    pub fn apply_rule(rule: &dyn RewriteRule, code: &str) -> String {
        let source = ParsedSource::parse(code).unwrap();
        let signatures = SignatureDatabase::new();
        let ctx = RuleContext {
            source: &source,
            signatures: &signatures,
            keyword_style: KeywordStyle::default(),
        };
        let edits = run_rule(rule, &ctx).unwrap();
        source.apply(edits).unwrap().into_text()
    }
}
