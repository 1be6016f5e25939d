//! Qualified-name resolution for call targets.

use std::collections::BTreeSet;

use tree_sitter::Node;

use super::scope::{ScopeId, ScopeIndex};
use crate::call_site::CallSite;
use crate::source_file::ParsedSource;

/// Every fully-qualified name a call target could denote.
///
/// Empty when nothing could be determined; more than one member when the
/// target is statically ambiguous.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Resolution {
    names: BTreeSet<String>,
}

impl Resolution {
    /// The single candidate, if there is exactly one.
    pub fn unique(&self) -> Option<&str> {
        match self.names.len() {
            1 => self.names.first().map(String::as_str),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl FromIterator<String> for Resolution {
    fn from_iter<T: IntoIterator<Item = String>>(iter: T) -> Self {
        Self {
            names: iter.into_iter().collect(),
        }
    }
}

/// Resolves call targets of one parsed source unit.
pub struct NameResolver<'a> {
    source: &'a ParsedSource,
    scopes: ScopeIndex,
}

impl<'a> NameResolver<'a> {
    pub fn new(source: &'a ParsedSource) -> Self {
        Self {
            source,
            scopes: ScopeIndex::build(source),
        }
    }

    /// Resolve the target of `call`.
    pub fn resolve_call(&self, call: &CallSite<'_>) -> Resolution {
        let scope = self
            .scopes
            .scope_of_call(&call.node)
            .unwrap_or(ScopeId::MODULE);
        self.resolve_expression(call.callee, scope)
    }

    /// Resolve a name or attribute chain rooted at a name.
    pub fn resolve_expression(&self, expr: Node<'_>, scope: ScopeId) -> Resolution {
        let mut attributes = Vec::new();
        let mut current = expr;
        loop {
            match current.kind() {
                "identifier" => break,
                "attribute" => {
                    let (Some(object), Some(attribute)) = (
                        current.child_by_field_name("object"),
                        current.child_by_field_name("attribute"),
                    ) else {
                        return Resolution::default();
                    };
                    attributes.push(self.source.node_text(&attribute));
                    current = object;
                }
                _ => return Resolution::default(),
            }
        }

        let base = self.source.node_text(&current);
        let Some(bindings) = self.scopes.lookup(base, scope) else {
            tracing::trace!(name = base, "Unbound name");
            return Resolution::default();
        };
        let suffix: String = attributes.iter().rev().map(|a| format!(".{a}")).collect();
        bindings
            .iter()
            .map(|binding| format!("{}{suffix}", binding.qualname()))
            .collect()
    }
}
