//! Call sites and their argument shapes.
//!
//! Every rule works on the same view of a call: the callee expression, the
//! arguments as written, and one [`CallShape`] computed up front so rules can
//! branch on the shape instead of re-matching syntax.

use std::ops::Range;

use tree_sitter::Node;

use crate::source_file::ParsedSource;

/// How a single argument is supplied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArgumentKind<'a> {
    /// `value`
    Positional,
    /// `name=value`
    Keyword { name: &'a str },
    /// `*values`
    Star,
    /// `**values`
    DoubleStar,
}

/// One argument of a call, in source order.
#[derive(Clone, Debug)]
pub struct Argument<'a> {
    pub node: Node<'a>,
    pub kind: ArgumentKind<'a>,
    /// The value expression: the whole argument for positional ones, the
    /// right-hand side for keywords, the operand for splats.
    pub value: Node<'a>,
}

impl<'a> Argument<'a> {
    pub fn span(&self) -> Range<usize> {
        self.node.byte_range()
    }

    pub fn is_positional(&self) -> bool {
        self.kind == ArgumentKind::Positional
    }

    pub fn keyword(&self) -> Option<&'a str> {
        match self.kind {
            ArgumentKind::Keyword { name } => Some(name),
            _ => None,
        }
    }
}

/// The shape of a call's argument list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CallShape {
    /// `f()`
    NoArguments,
    /// `f(x for x in xs)`
    Generator,
    /// First argument is a keyword or `**` splat: `f(a=1, b=2)`.
    KeywordOnly,
    /// First argument is a `*` splat: `f(*args, 1)`.
    SplatLed,
    /// Only plain positional arguments: `f(1, 2, 3)`.
    PlainPositional { count: usize },
    /// Leading positional arguments followed by keywords or splats:
    /// `f(1, 2, c=3)`.
    Mixed { leading_positional: usize },
}

impl CallShape {
    /// Whether the call starts with a plain positional argument.
    pub fn has_leading_positional(self) -> bool {
        matches!(
            self,
            CallShape::PlainPositional { .. } | CallShape::Mixed { .. }
        )
    }

    fn classify(arguments: &[Argument<'_>]) -> Self {
        let Some(first) = arguments.first() else {
            return CallShape::NoArguments;
        };
        match first.kind {
            ArgumentKind::Keyword { .. } | ArgumentKind::DoubleStar => CallShape::KeywordOnly,
            ArgumentKind::Star => CallShape::SplatLed,
            ArgumentKind::Positional => {
                let leading = arguments.iter().take_while(|a| a.is_positional()).count();
                if leading == arguments.len() {
                    CallShape::PlainPositional { count: leading }
                } else {
                    CallShape::Mixed {
                        leading_positional: leading,
                    }
                }
            }
        }
    }
}

/// A function invocation.
#[derive(Clone, Debug)]
pub struct CallSite<'a> {
    pub node: Node<'a>,
    pub callee: Node<'a>,
    pub arguments: Vec<Argument<'a>>,
    pub shape: CallShape,
}

impl<'a> CallSite<'a> {
    /// View `node` as a call site. Returns `None` for anything but a `call`.
    pub fn from_node(source: &'a ParsedSource, node: Node<'a>) -> Option<Self> {
        if node.kind() != "call" {
            return None;
        }
        let callee = node.child_by_field_name("function")?;
        let argument_list = node.child_by_field_name("arguments")?;

        if argument_list.kind() == "generator_expression" {
            return Some(Self {
                node,
                callee,
                arguments: Vec::new(),
                shape: CallShape::Generator,
            });
        }

        let mut cursor = argument_list.walk();
        let arguments: Vec<_> = argument_list
            .named_children(&mut cursor)
            .filter(|child| child.kind() != "comment")
            .map(|child| lower_argument(source, child))
            .collect();
        let shape = CallShape::classify(&arguments);

        Some(Self {
            node,
            callee,
            arguments,
            shape,
        })
    }

    pub fn span(&self) -> Range<usize> {
        self.node.byte_range()
    }

    /// Number of plain positional arguments anywhere in the call.
    pub fn positional_count(&self) -> usize {
        self.arguments.iter().filter(|a| a.is_positional()).count()
    }

    /// Arguments whose position is known: everything before the first `*`
    /// splat.
    pub fn aligned_arguments(&self) -> impl Iterator<Item = &Argument<'a>> {
        self.arguments
            .iter()
            .take_while(|a| a.kind != ArgumentKind::Star)
    }
}

fn lower_argument<'a>(source: &'a ParsedSource, node: Node<'a>) -> Argument<'a> {
    match node.kind() {
        "keyword_argument" => {
            let name = node
                .child_by_field_name("name")
                .map(|n| source.node_text(&n))
                .unwrap_or_default();
            let value = node.child_by_field_name("value").unwrap_or(node);
            Argument {
                node,
                kind: ArgumentKind::Keyword { name },
                value,
            }
        }
        "list_splat" | "parenthesized_list_splat" => Argument {
            node,
            kind: ArgumentKind::Star,
            value: node.named_child(0).unwrap_or(node),
        },
        "dictionary_splat" => Argument {
            node,
            kind: ArgumentKind::DoubleStar,
            value: node.named_child(0).unwrap_or(node),
        },
        _ => Argument {
            node,
            kind: ArgumentKind::Positional,
            value: node,
        },
    }
}

/// All call sites in `source`, outermost first.
pub fn collect_calls(source: &ParsedSource) -> Vec<CallSite<'_>> {
    let mut calls = Vec::new();
    let mut cursor = source.root().walk();
    loop {
        let node = cursor.node();
        if let Some(call) = CallSite::from_node(source, node) {
            calls.push(call);
        }
        if cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return calls;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shapes(code: &str) -> Vec<CallShape> {
        let source = ParsedSource::parse(code).unwrap();
        collect_calls(&source).iter().map(|c| c.shape).collect()
    }

    #[test]
    fn test_classify_shapes() {
        assert_eq!(shapes("f()"), vec![CallShape::NoArguments]);
        assert_eq!(
            shapes("f(1, 2)"),
            vec![CallShape::PlainPositional { count: 2 }]
        );
        assert_eq!(shapes("f(a=1)"), vec![CallShape::KeywordOnly]);
        assert_eq!(shapes("f(**kw)"), vec![CallShape::KeywordOnly]);
        assert_eq!(shapes("f(*xs, 1)"), vec![CallShape::SplatLed]);
        assert_eq!(
            shapes("f(1, b=2)"),
            vec![CallShape::Mixed {
                leading_positional: 1
            }]
        );
        assert_eq!(shapes("f(x for x in y)"), vec![CallShape::Generator]);
    }

    #[test]
    fn test_nested_calls_outermost_first() {
        let source = ParsedSource::parse("f(g(1), h(x=2))\n").unwrap();
        let calls = collect_calls(&source);
        let callees: Vec<_> = calls.iter().map(|c| source.node_text(&c.callee)).collect();
        assert_eq!(callees, vec!["f", "g", "h"]);
    }

    #[test]
    fn test_argument_kinds() {
        let source = ParsedSource::parse("f(1, *a, b=2, **c)\n").unwrap();
        let calls = collect_calls(&source);
        let kinds: Vec<_> = calls[0].arguments.iter().map(|a| a.kind.clone()).collect();
        assert_eq!(
            kinds,
            vec![
                ArgumentKind::Positional,
                ArgumentKind::Star,
                ArgumentKind::Keyword { name: "b" },
                ArgumentKind::DoubleStar,
            ]
        );
        assert_eq!(calls[0].positional_count(), 1);
        assert_eq!(calls[0].aligned_arguments().count(), 1);
        assert_eq!(
            source.node_text(&calls[0].arguments[2].value),
            "2"
        );
    }

    #[test]
    fn test_comments_are_not_arguments() {
        let source = ParsedSource::parse("f(\n    1,  # one\n    2,\n)\n").unwrap();
        let calls = collect_calls(&source);
        assert_eq!(calls[0].shape, CallShape::PlainPositional { count: 2 });
    }
}
