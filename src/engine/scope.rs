use std::collections::HashMap;
use tree_sitter::Node;

/// Stable handle for one declaration site. Two bindings with the same name
/// in different scopes always get different ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BindingId(usize);

impl BindingId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    Value,
    Type,
}

#[derive(Debug, Clone)]
pub struct Binding {
    pub name: String,
    pub namespace: Namespace,
    pub decl_start: usize,
    pub decl_end: usize,
    pub line: usize,
}

impl Binding {
    pub fn from_node(name: impl Into<String>, namespace: Namespace, node: &Node) -> Self {
        Self {
            name: name.into(),
            namespace,
            decl_start: node.start_byte(),
            decl_end: node.end_byte(),
            line: node.start_position().row + 1,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Scope {
    pub values: HashMap<String, BindingId>,
    pub types: HashMap<String, BindingId>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    fn names(&mut self, namespace: Namespace) -> &mut HashMap<String, BindingId> {
        match namespace {
            Namespace::Value => &mut self.values,
            Namespace::Type => &mut self.types,
        }
    }

    fn get(&self, name: &str, namespace: Namespace) -> Option<BindingId> {
        match namespace {
            Namespace::Value => self.values.get(name).copied(),
            Namespace::Type => self.types.get(name).copied(),
        }
    }
}

/// Lexical scopes of a single traversal plus the arena of every binding
/// declared along the way.
#[derive(Debug, Default)]
pub struct ScopeStack {
    bindings: Vec<Binding>,
    scopes: Vec<Scope>,
}

impl ScopeStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self) {
        self.scopes.push(Scope::new());
    }

    pub fn pop(&mut self) {
        self.scopes.pop();
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Declares `binding` in the innermost scope, shadowing any earlier
    /// binding of the same name.
    pub fn declare(&mut self, binding: Binding) -> BindingId {
        let id = BindingId(self.bindings.len());
        let namespace = binding.namespace;
        let name = binding.name.clone();
        self.bindings.push(binding);
        if self.scopes.is_empty() {
            self.push();
        }
        if let Some(scope) = self.scopes.last_mut() {
            scope.names(namespace).insert(name, id);
        }
        id
    }

    pub fn lookup(&self, name: &str, namespace: Namespace) -> Option<BindingId> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(name, namespace))
    }

    pub fn binding(&self, id: BindingId) -> &Binding {
        &self.bindings[id.0]
    }

    pub fn into_bindings(self) -> Vec<Binding> {
        self.bindings
    }
}
