//! Scope and binding index for qualified-name resolution.
//!
//! The index is flow-insensitive: every binding of a name anywhere in a scope
//! is a candidate for every use of that name in the scope. Conditional
//! imports therefore show up as several candidates instead of one guess.

use std::collections::HashMap;

use tree_sitter::Node;

use crate::source_file::ParsedSource;

/// Identifier of a scope within a [`ScopeIndex`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ScopeId(usize);

impl ScopeId {
    pub const MODULE: ScopeId = ScopeId(0);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScopeKind {
    Module,
    Function,
    Class,
    Lambda,
    Comprehension,
}

/// What a name is bound to.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Binding {
    /// `import a.b as c`, `from a import b`: the imported entity.
    Import { qualname: String },
    /// A definition, parameter, or assignment target local to the module.
    Local { qualname: String },
}

impl Binding {
    pub fn qualname(&self) -> &str {
        match self {
            Binding::Import { qualname } | Binding::Local { qualname } => qualname,
        }
    }
}

/// `global` and `nonlocal` declarations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Redirect {
    Global,
    Nonlocal,
}

#[derive(Debug)]
pub struct Scope {
    pub kind: ScopeKind,
    pub parent: Option<ScopeId>,
    /// Prefix for qualified names of locals defined here.
    prefix: String,
    bindings: HashMap<String, Vec<Binding>>,
    redirects: HashMap<String, Redirect>,
}

impl Scope {
    fn new(kind: ScopeKind, parent: Option<ScopeId>, prefix: String) -> Self {
        Self {
            kind,
            parent,
            prefix,
            bindings: HashMap::new(),
            redirects: HashMap::new(),
        }
    }

    /// All bindings of `name` made directly in this scope.
    pub fn bindings(&self, name: &str) -> Option<&[Binding]> {
        self.bindings.get(name).map(Vec::as_slice)
    }
}

/// All scopes of one source unit, plus the scope each call site lives in.
#[derive(Debug)]
pub struct ScopeIndex {
    scopes: Vec<Scope>,
    call_scopes: HashMap<usize, ScopeId>,
}

impl ScopeIndex {
    pub fn build(source: &ParsedSource) -> Self {
        let mut builder = ScopeBuilder {
            source,
            index: ScopeIndex {
                scopes: vec![Scope::new(ScopeKind::Module, None, String::new())],
                call_scopes: HashMap::new(),
            },
        };
        builder.visit_children(source.root(), ScopeId::MODULE);
        builder.index
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.0]
    }

    /// The scope a `call` node was found in.
    pub fn scope_of_call(&self, call: &Node<'_>) -> Option<ScopeId> {
        self.call_scopes.get(&call.id()).copied()
    }

    /// Bindings visible for `name` when used in `scope`.
    ///
    /// Follows Python's rules: the innermost scope that binds the name wins,
    /// class bodies are invisible to nested scopes, and `global`/`nonlocal`
    /// declarations send the lookup outward.
    pub fn lookup(&self, name: &str, scope: ScopeId) -> Option<&[Binding]> {
        let mut current = Some(scope);
        let mut innermost = true;
        while let Some(id) = current {
            let scope = self.scope(id);
            let visible = innermost || scope.kind != ScopeKind::Class;
            innermost = false;
            if !visible {
                current = scope.parent;
                continue;
            }
            match scope.redirects.get(name) {
                Some(Redirect::Global) => return self.scope(ScopeId::MODULE).bindings(name),
                Some(Redirect::Nonlocal) => {
                    current = scope.parent;
                    continue;
                }
                None => {}
            }
            if let Some(bindings) = scope.bindings(name) {
                return Some(bindings);
            }
            current = scope.parent;
        }
        None
    }
}

struct ScopeBuilder<'a> {
    source: &'a ParsedSource,
    index: ScopeIndex,
}

impl<'a> ScopeBuilder<'a> {
    fn text(&self, node: &Node<'_>) -> &'a str {
        self.source.node_text(node)
    }

    fn push_scope(&mut self, kind: ScopeKind, parent: ScopeId, name: &str) -> ScopeId {
        let parent_prefix = &self.index.scopes[parent.0].prefix;
        let prefix = match kind {
            ScopeKind::Module => String::new(),
            ScopeKind::Class => format!("{parent_prefix}{name}."),
            ScopeKind::Function | ScopeKind::Lambda => {
                format!("{parent_prefix}{name}.<locals>.")
            }
            ScopeKind::Comprehension => parent_prefix.clone(),
        };
        let id = ScopeId(self.index.scopes.len());
        self.index.scopes.push(Scope::new(kind, Some(parent), prefix));
        id
    }

    /// The scope a binding of `name` made in `scope` lands in.
    ///
    /// `global` sends it to the module; `nonlocal` to the nearest enclosing
    /// function, following further declarations there.
    fn binding_scope(&self, mut scope: ScopeId, name: &str) -> ScopeId {
        loop {
            let current = &self.index.scopes[scope.0];
            match current.redirects.get(name) {
                Some(Redirect::Global) => return ScopeId::MODULE,
                Some(Redirect::Nonlocal) => match self.enclosing_function(current.parent) {
                    Some(outer) => scope = outer,
                    None => return scope,
                },
                None => return scope,
            }
        }
    }

    fn enclosing_function(&self, mut current: Option<ScopeId>) -> Option<ScopeId> {
        while let Some(id) = current {
            let scope = &self.index.scopes[id.0];
            if matches!(scope.kind, ScopeKind::Function | ScopeKind::Lambda) {
                return Some(id);
            }
            current = scope.parent;
        }
        None
    }

    /// Walrus targets inside a comprehension bind in the enclosing scope.
    fn outside_comprehensions(&self, mut scope: ScopeId) -> ScopeId {
        loop {
            let current = &self.index.scopes[scope.0];
            match (current.kind, current.parent) {
                (ScopeKind::Comprehension, Some(parent)) => scope = parent,
                _ => return scope,
            }
        }
    }

    fn bind(&mut self, scope: ScopeId, name: &str, binding: Binding) {
        let scope = self.binding_scope(scope, name);
        tracing::trace!(name, qualname = binding.qualname(), "Binding");
        let bindings = self.index.scopes[scope.0]
            .bindings
            .entry(name.to_owned())
            .or_default();
        if !bindings.contains(&binding) {
            bindings.push(binding);
        }
    }

    fn bind_local(&mut self, scope: ScopeId, name: &str) {
        let scope = self.binding_scope(scope, name);
        let qualname = format!("{}{name}", self.index.scopes[scope.0].prefix);
        self.bind(scope, name, Binding::Local { qualname });
    }

    fn visit_children(&mut self, node: Node<'a>, scope: ScopeId) {
        let mut cursor = node.walk();
        let children: Vec<_> = node.named_children(&mut cursor).collect();
        for child in children {
            self.visit(child, scope);
        }
    }

    fn visit(&mut self, node: Node<'a>, scope: ScopeId) {
        match node.kind() {
            "call" => {
                self.index.call_scopes.insert(node.id(), scope);
                self.visit_children(node, scope);
            }
            "import_statement" => self.visit_import(node, scope),
            "import_from_statement" => self.visit_import_from(node, scope),
            "function_definition" => self.visit_function(node, scope),
            "class_definition" => self.visit_class(node, scope),
            "lambda" => self.visit_lambda(node, scope),
            "list_comprehension"
            | "set_comprehension"
            | "dictionary_comprehension"
            | "generator_expression" => {
                let inner = self.push_scope(ScopeKind::Comprehension, scope, "");
                self.visit_children(node, inner);
            }
            "assignment" | "augmented_assignment" | "for_statement" | "for_in_clause" => {
                if let Some(left) = node.child_by_field_name("left") {
                    self.bind_targets(left, scope);
                }
                self.visit_children(node, scope);
            }
            "as_pattern" | "except_clause" => {
                if let Some(alias) = node.child_by_field_name("alias") {
                    self.bind_targets(alias, scope);
                }
                self.visit_children(node, scope);
            }
            "named_expression" => {
                if let Some(name) = node.child_by_field_name("name") {
                    let target = self.outside_comprehensions(scope);
                    self.bind_targets(name, target);
                }
                self.visit_children(node, scope);
            }
            "case_clause" => {
                let mut cursor = node.walk();
                let patterns: Vec<_> = node
                    .named_children(&mut cursor)
                    .filter(|n| n.kind() == "case_pattern")
                    .collect();
                for pattern in patterns {
                    self.bind_pattern(pattern, scope);
                }
                self.visit_children(node, scope);
            }
            "global_statement" | "nonlocal_statement" => {
                let redirect = if node.kind() == "global_statement" {
                    Redirect::Global
                } else {
                    Redirect::Nonlocal
                };
                let mut cursor = node.walk();
                let names: Vec<_> = node
                    .named_children(&mut cursor)
                    .filter(|n| n.kind() == "identifier")
                    .map(|n| self.text(&n).to_owned())
                    .collect();
                for name in names {
                    self.index.scopes[scope.0].redirects.insert(name, redirect);
                }
            }
            _ => self.visit_children(node, scope),
        }
    }

    fn visit_import(&mut self, node: Node<'a>, scope: ScopeId) {
        let mut cursor = node.walk();
        let names: Vec<_> = node.children_by_field_name("name", &mut cursor).collect();
        for name in names {
            match name.kind() {
                // `import a.b.c` binds `a`.
                "dotted_name" => {
                    let dotted = self.dotted(name);
                    let head = dotted.split('.').next().unwrap_or_default().to_owned();
                    self.bind(scope, &head, Binding::Import { qualname: head.clone() });
                }
                "aliased_import" => {
                    let (Some(target), Some(alias)) = (
                        name.child_by_field_name("name"),
                        name.child_by_field_name("alias"),
                    ) else {
                        continue;
                    };
                    let qualname = self.dotted(target);
                    let alias = self.text(&alias);
                    self.bind(scope, alias, Binding::Import { qualname });
                }
                _ => {}
            }
        }
    }

    fn visit_import_from(&mut self, node: Node<'a>, scope: ScopeId) {
        let Some(module) = node.child_by_field_name("module_name") else {
            return;
        };
        let module = match module.kind() {
            "dotted_name" => self.dotted(module),
            _ => self.text(&module).split_whitespace().collect(),
        };
        let qualify = |name: &str| {
            if module.ends_with('.') {
                format!("{module}{name}")
            } else {
                format!("{module}.{name}")
            }
        };

        let mut cursor = node.walk();
        let names: Vec<_> = node.children_by_field_name("name", &mut cursor).collect();
        for name in names {
            let (target, local) = match name.kind() {
                "dotted_name" => (self.dotted(name), None),
                "aliased_import" => {
                    let (Some(target), Some(alias)) = (
                        name.child_by_field_name("name"),
                        name.child_by_field_name("alias"),
                    ) else {
                        continue;
                    };
                    (self.dotted(target), Some(self.text(&alias)))
                }
                _ => continue,
            };
            let qualname = qualify(&target);
            let local = local.unwrap_or(target.as_str()).to_owned();
            self.bind(scope, &local, Binding::Import { qualname });
        }
    }

    fn visit_function(&mut self, node: Node<'a>, scope: ScopeId) {
        let name = node
            .child_by_field_name("name")
            .map(|n| self.text(&n))
            .unwrap_or_default();
        self.bind_local(scope, name);

        let inner = self.push_scope(ScopeKind::Function, scope, name);
        if let Some(parameters) = node.child_by_field_name("parameters") {
            self.visit_parameters(parameters, scope, inner);
        }
        if let Some(return_type) = node.child_by_field_name("return_type") {
            self.visit(return_type, scope);
        }
        if let Some(body) = node.child_by_field_name("body") {
            self.visit(body, inner);
        }
    }

    fn visit_class(&mut self, node: Node<'a>, scope: ScopeId) {
        let name = node
            .child_by_field_name("name")
            .map(|n| self.text(&n))
            .unwrap_or_default();
        self.bind_local(scope, name);

        if let Some(superclasses) = node.child_by_field_name("superclasses") {
            self.visit(superclasses, scope);
        }
        let inner = self.push_scope(ScopeKind::Class, scope, name);
        if let Some(body) = node.child_by_field_name("body") {
            self.visit(body, inner);
        }
    }

    fn visit_lambda(&mut self, node: Node<'a>, scope: ScopeId) {
        let inner = self.push_scope(ScopeKind::Lambda, scope, "<lambda>");
        if let Some(parameters) = node.child_by_field_name("parameters") {
            self.visit_parameters(parameters, scope, inner);
        }
        if let Some(body) = node.child_by_field_name("body") {
            self.visit(body, inner);
        }
    }

    /// Parameter names bind in `inner`; defaults and annotations are
    /// evaluated in `outer`.
    fn visit_parameters(&mut self, parameters: Node<'a>, outer: ScopeId, inner: ScopeId) {
        let mut cursor = parameters.walk();
        let params: Vec<_> = parameters.named_children(&mut cursor).collect();
        for param in params {
            match param.kind() {
                "identifier" => self.bind_local(inner, self.text(&param)),
                "default_parameter" | "typed_default_parameter" => {
                    if let Some(name) = param.child_by_field_name("name") {
                        self.bind_targets(name, inner);
                    }
                    if let Some(ty) = param.child_by_field_name("type") {
                        self.visit(ty, outer);
                    }
                    if let Some(value) = param.child_by_field_name("value") {
                        self.visit(value, outer);
                    }
                }
                "typed_parameter" => {
                    let mut cursor = param.walk();
                    let children: Vec<_> = param.named_children(&mut cursor).collect();
                    for child in children {
                        if Some(child) == param.child_by_field_name("type") {
                            self.visit(child, outer);
                        } else {
                            self.bind_targets(child, inner);
                        }
                    }
                }
                _ => self.bind_targets(param, inner),
            }
        }
    }

    /// Bind every plain name in an assignment target.
    fn bind_targets(&mut self, target: Node<'a>, scope: ScopeId) {
        match target.kind() {
            "identifier" => self.bind_local(scope, self.text(&target)),
            "attribute" | "subscript" => {}
            _ => {
                let mut cursor = target.walk();
                let children: Vec<_> = target.named_children(&mut cursor).collect();
                for child in children {
                    self.bind_targets(child, scope);
                }
            }
        }
    }

    /// Bind the capture names of a `match` pattern.
    ///
    /// A bare name captures; a dotted name is a value pattern. Class names,
    /// keyword names and mapping keys are never captures.
    fn bind_pattern(&mut self, pattern: Node<'a>, scope: ScopeId) {
        match pattern.kind() {
            "dotted_name" => {
                let mut cursor = pattern.walk();
                let parts: Vec<_> = pattern.named_children(&mut cursor).collect();
                if let [name] = parts.as_slice() {
                    self.bind_capture(*name, scope);
                }
            }
            "splat_pattern" => {
                let mut cursor = pattern.walk();
                let names: Vec<_> = pattern
                    .named_children(&mut cursor)
                    .filter(|n| n.kind() == "identifier")
                    .collect();
                for name in names {
                    self.bind_capture(name, scope);
                }
            }
            "class_pattern" => {
                let mut cursor = pattern.walk();
                let args: Vec<_> = pattern
                    .named_children(&mut cursor)
                    .filter(|n| n.kind() == "case_pattern")
                    .collect();
                for arg in args {
                    self.bind_pattern(arg, scope);
                }
            }
            "as_pattern" => {
                if let Some(alias) = pattern.child_by_field_name("alias") {
                    self.bind_targets(alias, scope);
                }
                self.bind_pattern_children(pattern, scope);
            }
            _ => self.bind_pattern_children(pattern, scope),
        }
    }

    fn bind_pattern_children(&mut self, pattern: Node<'a>, scope: ScopeId) {
        let mut cursor = pattern.walk();
        let mut children = Vec::new();
        if cursor.goto_first_child() {
            loop {
                let child = cursor.node();
                let is_key = matches!(cursor.field_name(), Some("key" | "alias"));
                if child.is_named() && !is_key && child.kind() != "identifier" {
                    children.push(child);
                }
                if !cursor.goto_next_sibling() {
                    break;
                }
            }
        }
        for child in children {
            self.bind_pattern(child, scope);
        }
    }

    fn bind_capture(&mut self, name: Node<'a>, scope: ScopeId) {
        let name = self.text(&name);
        if name != "_" {
            self.bind_local(scope, name);
        }
    }

    /// Normalized text of a `dotted_name`, without interior whitespace.
    fn dotted(&self, node: Node<'a>) -> String {
        let mut cursor = node.walk();
        let parts: Vec<_> = node
            .named_children(&mut cursor)
            .filter(|n| n.kind() == "identifier")
            .map(|n| self.text(&n))
            .collect();
        if parts.is_empty() {
            self.text(&node).to_owned()
        } else {
            parts.join(".")
        }
    }
}
