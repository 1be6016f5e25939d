//! Replace the deprecated `min_magnitude=None` of `complex_numbers()`.
//!
//! `st.complex_numbers(min_magnitude=None)` becomes
//! `st.complex_numbers(min_magnitude=0)`. Must run after
//! [`PositionalKeywordOnly`](super::PositionalKeywordOnly) so that
//! `st.complex_numbers(None)` is caught too.

use hypofix_front::{CallSite, Resolution, TextEdit};

use super::{RewriteRule, RuleContext};
use crate::error::ConfigError;
use crate::registry::{DEPRECATED_SENTINEL, SentinelRewrite};

pub struct ComplexMinMagnitude;

impl ComplexMinMagnitude {
    const REWRITE: SentinelRewrite = DEPRECATED_SENTINEL;
}

impl RewriteRule for ComplexMinMagnitude {
    fn name(&self) -> &'static str {
        "complex-min-magnitude"
    }

    fn description(&self) -> &'static str {
        "Fix a deprecated min_magnitude=None argument for complex numbers."
    }

    fn target<'r>(&self, resolution: &'r Resolution) -> Option<&'r str> {
        resolution
            .unique()
            .filter(|name| *name == Self::REWRITE.target)
    }

    fn transform(
        &self,
        ctx: &RuleContext<'_>,
        call: &CallSite<'_>,
        _target: &str,
    ) -> Result<Vec<TextEdit>, ConfigError> {
        let rewrite = Self::REWRITE;
        Ok(call
            .arguments
            .iter()
            .filter(|argument| argument.keyword() == Some(rewrite.keyword))
            .filter(|argument| ctx.source.node_text(&argument.value) == rewrite.sentinel)
            .map(|argument| TextEdit::replace(argument.value.byte_range(), rewrite.replacement))
            .collect())
    }
}
