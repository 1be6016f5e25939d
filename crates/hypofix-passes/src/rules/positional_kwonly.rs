//! Re-keyword positional arguments of newly keyword-only parameters.
//!
//! `st.fractions(0, 1, 9)` becomes `st.fractions(0, 1, max_denominator=9)`.
//!
//! Much of the Hypothesis API moved to keyword-only parameters once Python 2
//! support was dropped. Calls written against the old signatures still pass
//! those arguments by position; this rule names them explicitly, reading
//! parameter names and kinds from the bundled signature table.

use hypofix_front::{CallSite, Resolution, TextEdit};

use super::{RewriteRule, RuleContext};
use crate::error::ConfigError;
use crate::registry;
use crate::signature::{ParamDescriptor, ParamKind};

pub struct PositionalKeywordOnly;

impl RewriteRule for PositionalKeywordOnly {
    fn name(&self) -> &'static str {
        "positional-kwonly"
    }

    fn description(&self) -> &'static str {
        "Fix positional arguments for newly keyword-only parameters."
    }

    fn target<'r>(&self, resolution: &'r Resolution) -> Option<&'r str> {
        resolution.unique().filter(|name| registry::is_target(name))
    }

    fn transform(
        &self,
        ctx: &RuleContext<'_>,
        call: &CallSite<'_>,
        target: &str,
    ) -> Result<Vec<TextEdit>, ConfigError> {
        // Keyword-only or splat-led calls need nothing from us.
        if !call.shape.has_leading_positional() {
            return Ok(Vec::new());
        }

        let signature = ctx.signatures.lookup(target)?;
        let excluded: Vec<_> = registry::positional_exclusions(target).collect();
        let aligned = alignment(&signature, &excluded);

        let variadic = signature.iter().any(|p| p.kind == ParamKind::VarPositional);
        if !variadic && call.positional_count() > aligned.len() {
            tracing::debug!(
                qualname = target,
                positional = call.positional_count(),
                known = aligned.len(),
                "More positional arguments than known parameters, leaving unchanged"
            );
            return Ok(Vec::new());
        }

        let edits = call
            .aligned_arguments()
            .zip(aligned)
            .filter(|(argument, param)| {
                argument.is_positional() && param.kind == ParamKind::KeywordOnly
            })
            .map(|(argument, param)| {
                TextEdit::insert(argument.span().start, ctx.keyword_style.marker(param.name))
            })
            .collect();
        Ok(edits)
    }
}

/// Parameters a positional argument can line up with, in order.
///
/// Excluded parameters are dropped. Alignment stops at `*args`, which
/// swallows every further positional argument.
fn alignment<'s>(signature: &'s [ParamDescriptor], excluded: &[&str]) -> Vec<&'s ParamDescriptor> {
    signature
        .iter()
        .filter(|p| !excluded.contains(&p.name))
        .take_while(|p| p.kind != ParamKind::VarPositional)
        .filter(|p| p.kind.is_alignable())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_support::apply_rule;

    fn fix(code: &str) -> String {
        apply_rule(&PositionalKeywordOnly, code)
    }

    const ST: &str = "from hypothesis import strategies as st\n";

    #[test]
    fn test_fractions() {
        let out = fix(&format!("{ST}st.fractions(0, 1, 9)\n"));
        assert_eq!(out, format!("{ST}st.fractions(0, 1, max_denominator=9)\n"));
    }

    #[test]
    fn test_all_keyword_only() {
        let out = fix(&format!("{ST}st.binary(1, 10)\n"));
        assert_eq!(out, format!("{ST}st.binary(min_size=1, max_size=10)\n"));
    }

    #[test]
    fn test_existing_keywords_untouched() {
        let code = format!("{ST}st.lists(st.integers(), 1, max_size=5)\n");
        assert_eq!(
            fix(&code),
            format!("{ST}st.lists(st.integers(), min_size=1, max_size=5)\n")
        );
    }

    #[test]
    fn test_keyword_only_call_unchanged() {
        let code = format!("{ST}st.fractions(min_value=0, max_denominator=9)\n");
        assert_eq!(fix(&code), code);
    }

    #[test]
    fn test_excess_arity_unchanged() {
        let code = format!("{ST}st.fractions(0, 1, 9, 10)\n");
        assert_eq!(fix(&code), code);
    }

    #[test]
    fn test_unregistered_target_unchanged() {
        let code = format!("{ST}st.integers(0, 10)\n");
        assert_eq!(fix(&code), code);
    }

    #[test]
    fn test_ambiguous_target_unchanged() {
        let code = "try:\n    from hypothesis.strategies import fractions\nexcept ImportError:\n    from fractions import fractions\nfractions(0, 1, 9)\n";
        assert_eq!(fix(code), code);
    }

    #[test]
    fn test_floats_skips_out_of_order_parameter() {
        // Old order: min_value, max_value, allow_nan, allow_infinity, width
        let out = fix(&format!("{ST}st.floats(0, 1, False, False, 32)\n"));
        assert_eq!(
            out,
            format!("{ST}st.floats(0, 1, allow_nan=False, allow_infinity=False, width=32)\n")
        );
    }

    #[test]
    fn test_nested_calls_are_both_fixed() {
        let out = fix(&format!("{ST}st.lists(st.floats(0, 1, False), 2)\n"));
        assert_eq!(
            out,
            format!("{ST}st.lists(st.floats(0, 1, allow_nan=False), min_size=2)\n")
        );
    }

    #[test]
    fn test_alignment_stops_at_splat() {
        let code = format!("{ST}st.fractions(0, *rest, 9)\n");
        assert_eq!(fix(&code), code);
    }

    #[test]
    fn test_formatting_is_preserved() {
        let code = format!("{ST}st.fractions(\n    0,\n    1,  # upper\n    (9),\n)\n");
        assert_eq!(
            fix(&code),
            format!("{ST}st.fractions(\n    0,\n    1,  # upper\n    max_denominator=(9),\n)\n")
        );
    }

    #[test]
    fn test_var_keyword_is_not_aligned() {
        let out = fix("from hypothesis.stateful import rule\nrule(bundle)\n");
        assert_eq!(out, "from hypothesis.stateful import rule\nrule(targets=bundle)\n");
        let code = "from hypothesis.stateful import rule\nrule(a, b, c)\n";
        assert_eq!(fix(code), code);
    }

    #[test]
    fn test_spaced_keyword_style() {
        use crate::rules::{KeywordStyle, run_rule};
        use crate::signature::SignatureDatabase;
        use hypofix_front::ParsedSource;

        let source = ParsedSource::parse(format!("{ST}st.shared(base, 'k')\n")).unwrap();
        let signatures = SignatureDatabase::new();
        let ctx = RuleContext {
            source: &source,
            signatures: &signatures,
            keyword_style: KeywordStyle::SPACED,
        };
        let edits = run_rule(&PositionalKeywordOnly, &ctx).unwrap();
        let out = source.apply(edits).unwrap().into_text();
        assert_eq!(out, format!("{ST}st.shared(base, key = 'k')\n"));
    }

    #[test]
    fn test_alignment_excludes_parameter() {
        let signature = [
            ParamDescriptor { name: "a", kind: ParamKind::PositionalOrKeyword, order: 0 },
            ParamDescriptor { name: "late", kind: ParamKind::KeywordOnly, order: 1 },
            ParamDescriptor { name: "b", kind: ParamKind::KeywordOnly, order: 2 },
            ParamDescriptor { name: "rest", kind: ParamKind::VarKeyword, order: 3 },
        ];
        let names: Vec<_> = alignment(&signature, &["late"]).iter().map(|p| p.name).collect();
        assert_eq!(names, ["a", "b"]);
    }
}
