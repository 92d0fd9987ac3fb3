//! Binding index: one traversal of the tree that resolves every identifier
//! to its declaration and records what each declaration was bound to.
use std::collections::HashMap;
use tracing::{debug, trace};
use tree_sitter::Node;

use super::fields::{FieldKey, FieldPath};
use super::node_types::HOISTED_ITEMS;
use super::scope::{Binding, BindingId, Namespace, ScopeStack};
use super::Context;

/// Initializer of a variable, with its declared type when annotated.
#[derive(Debug, Clone, Copy)]
pub struct VarInit<'t> {
    pub value: Node<'t>,
    pub declared_type: Option<Node<'t>>,
}

/// The collection a loop variable ranges over, and where inside each entry
/// the variable's value comes from.
#[derive(Debug, Clone)]
pub struct RangeSource<'t> {
    pub collection: Node<'t>,
    pub path: FieldPath,
}

#[derive(Debug, Default)]
pub struct BindingIndex<'t> {
    bindings: Vec<Binding>,
    resolutions: HashMap<usize, BindingId>,
    type_decls: HashMap<BindingId, Node<'t>>,
    assoc_fns: HashMap<(BindingId, String), Node<'t>>,
    var_inits: HashMap<BindingId, VarInit<'t>>,
    range_values: HashMap<BindingId, RangeSource<'t>>,
    range_keys: HashMap<BindingId, RangeSource<'t>>,
}

impl<'t> BindingIndex<'t> {
    pub fn build(ctx: &Context<'t>) -> Self {
        let mut builder = IndexBuilder {
            ctx,
            scopes: ScopeStack::new(),
            index: BindingIndex::default(),
        };
        builder.visit(ctx.root());

        let IndexBuilder { scopes, mut index, .. } = builder;
        index.bindings = scopes.into_bindings();
        trace!(
            "indexed {}: {} bindings, {} types, {} associated fns, {} initializers, {} range values, {} range keys",
            ctx.file_path(),
            index.bindings.len(),
            index.type_decls.len(),
            index.assoc_fns.len(),
            index.var_inits.len(),
            index.range_values.len(),
            index.range_keys.len()
        );
        index
    }

    /// Binding an identifier node refers to (or declares).
    pub fn binding_of(&self, node: &Node) -> Option<BindingId> {
        self.resolutions.get(&node.id()).copied()
    }

    pub fn binding(&self, id: BindingId) -> &Binding {
        &self.bindings[id.index()]
    }

    pub fn type_decl(&self, id: BindingId) -> Option<Node<'t>> {
        self.type_decls.get(&id).copied()
    }

    /// `fn name` declared in an `impl` block of the type bound to `id`.
    pub fn assoc_fn(&self, id: BindingId, name: &str) -> Option<Node<'t>> {
        self.assoc_fns.get(&(id, name.to_string())).copied()
    }

    pub fn var_init(&self, id: BindingId) -> Option<VarInit<'t>> {
        self.var_inits.get(&id).copied()
    }

    pub fn range_value(&self, id: BindingId) -> Option<&RangeSource<'t>> {
        self.range_values.get(&id)
    }

    pub fn range_key(&self, id: BindingId) -> Option<&RangeSource<'t>> {
        self.range_keys.get(&id)
    }
}

struct IndexBuilder<'c, 't> {
    ctx: &'c Context<'t>,
    scopes: ScopeStack,
    index: BindingIndex<'t>,
}

/// A name introduced by a pattern, with its position inside the matched
/// value.
struct Bound {
    id: BindingId,
    path: FieldPath,
}

impl<'c, 't> IndexBuilder<'c, 't> {
    fn visit(&mut self, node: Node<'t>) {
        match node.kind() {
            "source_file" | "declaration_list" | "block" => {
                self.scopes.push();
                self.hoist_items(node);
                self.visit_children(node);
                self.scopes.pop();
            }
            "function_item" => {
                self.scopes.push();
                if let Some(params) = node.child_by_field_name("parameters") {
                    self.declare_parameters(params);
                }
                if let Some(body) = node.child_by_field_name("body") {
                    self.visit(body);
                }
                self.scopes.pop();
            }
            "closure_expression" => {
                self.scopes.push();
                if let Some(params) = node.child_by_field_name("parameters") {
                    self.declare_parameters(params);
                }
                if let Some(body) = node.child_by_field_name("body") {
                    self.visit(body);
                }
                self.scopes.pop();
            }
            "let_declaration" => self.visit_let(node),
            "const_item" | "static_item" => {
                self.visit_field(node, "type");
                self.visit_field(node, "value");
            }
            "impl_item" => {
                self.visit_children(node);
                self.record_impl(node);
            }
            "struct_item" | "macro_invocation" | "use_declaration" => {}
            "for_expression" => self.visit_for(node),
            "assignment_expression" => self.visit_assignment(node),
            "if_expression" | "while_expression" => {
                self.scopes.push();
                let alternative = node.child_by_field_name("alternative");
                let mut cursor = node.walk();
                let children: Vec<_> = node.children(&mut cursor).collect();
                for child in children {
                    if Some(child) != alternative {
                        self.visit(child);
                    }
                }
                self.scopes.pop();
                if let Some(alt) = alternative {
                    self.visit(alt);
                }
            }
            "let_condition" => {
                self.visit_field(node, "value");
                if let Some(pattern) = node.child_by_field_name("pattern") {
                    self.declare_pattern(pattern, Vec::new(), &mut Vec::new());
                }
            }
            "match_arm" => {
                self.scopes.push();
                if let Some(pattern) = node.child_by_field_name("pattern") {
                    if let Some(inner) = self.ctx.elements(&pattern).first() {
                        self.declare_pattern(*inner, Vec::new(), &mut Vec::new());
                    }
                    self.visit_field(pattern, "condition");
                }
                self.visit_field(node, "value");
                self.scopes.pop();
            }
            "identifier" => self.resolve_use(node, &[Namespace::Value, Namespace::Type]),
            "type_identifier" => self.resolve_use(node, &[Namespace::Type]),
            "scoped_identifier" => {
                if let Some(path) = node.child_by_field_name("path") {
                    if path.kind() == "identifier" {
                        self.resolve_use(path, &[Namespace::Type, Namespace::Value]);
                    } else {
                        self.visit(path);
                    }
                }
            }
            "field_expression" => self.visit_field(node, "value"),
            _ => self.visit_children(node),
        }
    }

    fn visit_children(&mut self, node: Node<'t>) {
        let mut cursor = node.walk();
        let children: Vec<_> = node.named_children(&mut cursor).collect();
        for child in children {
            self.visit(child);
        }
    }

    fn visit_field(&mut self, node: Node<'t>, field: &str) {
        if let Some(child) = node.child_by_field_name(field) {
            self.visit(child);
        }
    }

    fn resolve_use(&mut self, node: Node<'t>, namespaces: &[Namespace]) {
        let name = self.ctx.get_node_text(&node);
        if let Some(id) = namespaces
            .iter()
            .find_map(|ns| self.scopes.lookup(&name, *ns))
        {
            self.index.resolutions.insert(node.id(), id);
        }
    }

    fn declare(&mut self, name_node: Node<'t>, namespace: Namespace) -> BindingId {
        let name = self.ctx.get_node_text(&name_node);
        let id = self
            .scopes
            .declare(Binding::from_node(name, namespace, &name_node));
        self.index.resolutions.insert(name_node.id(), id);
        id
    }

    /// Items are visible throughout their scope, so they are declared before
    /// anything in the scope is visited.
    fn hoist_items(&mut self, scope: Node<'t>) {
        for item in self.ctx.elements(&scope) {
            if !HOISTED_ITEMS.contains(&item.kind()) {
                continue;
            }
            let Some(name) = item.child_by_field_name("name") else {
                continue;
            };
            if item.kind() == "struct_item" {
                let id = self.declare(name, Namespace::Type);
                if let Some(fields) = item.child_by_field_name("body") {
                    self.index.type_decls.entry(id).or_insert(fields);
                }
            } else {
                let id = self.declare(name, Namespace::Value);
                if let Some(value) = item.child_by_field_name("value") {
                    self.index.var_inits.entry(id).or_insert(VarInit {
                        value,
                        declared_type: item.child_by_field_name("type"),
                    });
                }
            }
        }
    }

    /// Records the functions of an `impl` block under the type it targets.
    /// Runs after the block is visited, so the type name is resolved.
    fn record_impl(&mut self, node: Node<'t>) {
        let Some(mut ty) = node.child_by_field_name("type") else {
            return;
        };
        if ty.kind() == "generic_type" {
            let Some(inner) = ty.child_by_field_name("type") else {
                return;
            };
            ty = inner;
        }
        let (Some(id), Some(body)) = (self.index.binding_of(&ty), node.child_by_field_name("body"))
        else {
            return;
        };
        for item in self.ctx.elements(&body) {
            if item.kind() != "function_item" {
                continue;
            }
            if let Some(name) = item.child_by_field_name("name") {
                self.index
                    .assoc_fns
                    .entry((id, self.ctx.get_node_text(&name)))
                    .or_insert(item);
            }
        }
    }

    fn declare_parameters(&mut self, params: Node<'t>) {
        for param in self.ctx.elements(&params) {
            let pattern = match param.kind() {
                "parameter" => param.child_by_field_name("pattern"),
                "self_parameter" => None,
                _ => Some(param),
            };
            if let Some(pattern) = pattern {
                self.declare_pattern(pattern, Vec::new(), &mut Vec::new());
            }
        }
    }

    /// Declares every name a pattern introduces, recording where in the
    /// matched value each one sits.
    fn declare_pattern(&mut self, pattern: Node<'t>, path: FieldPath, out: &mut Vec<Bound>) {
        match pattern.kind() {
            "identifier" => {
                if self.ctx.get_node_text(&pattern) != "_" {
                    let id = self.declare(pattern, Namespace::Value);
                    out.push(Bound { id, path });
                }
            }
            "tuple_pattern" | "slice_pattern" => {
                let elements = self.ctx.elements(&pattern);
                self.declare_elements(elements.into_iter(), &path, out);
            }
            "tuple_struct_pattern" => {
                let ty = pattern.child_by_field_name("type");
                let elements = self
                    .ctx
                    .elements(&pattern)
                    .into_iter()
                    .filter(|e| Some(*e) != ty);
                self.declare_elements(elements, &path, out);
            }
            "struct_pattern" => {
                for field in self.ctx.elements(&pattern) {
                    if field.kind() != "field_pattern" {
                        continue;
                    }
                    let Some(name) = field.child_by_field_name("name") else {
                        continue;
                    };
                    let mut field_path = path.clone();
                    field_path.push(FieldKey::named(self.ctx.get_node_text(&name)));
                    match field.child_by_field_name("pattern") {
                        Some(inner) => self.declare_pattern(inner, field_path, out),
                        None => {
                            let id = self.declare(name, Namespace::Value);
                            out.push(Bound {
                                id,
                                path: field_path,
                            });
                        }
                    }
                }
            }
            "captured_pattern" => {
                let elements = self.ctx.elements(&pattern);
                if let Some(name) = elements.first().filter(|n| n.kind() == "identifier") {
                    let id = self.declare(*name, Namespace::Value);
                    out.push(Bound {
                        id,
                        path: path.clone(),
                    });
                }
                if let Some(inner) = elements.get(1) {
                    self.declare_pattern(*inner, path, out);
                }
            }
            "reference_pattern" | "mut_pattern" | "ref_pattern" | "match_pattern" => {
                if let Some(inner) = self.ctx.elements(&pattern).last() {
                    self.declare_pattern(*inner, path, out);
                }
            }
            _ => {}
        }
    }

    /// Tuple-like pattern elements. Positions after `..` count from the end,
    /// so names there are declared without a path into the value.
    fn declare_elements(
        &mut self,
        elements: impl Iterator<Item = Node<'t>>,
        path: &FieldPath,
        out: &mut Vec<Bound>,
    ) {
        let mut after_rest = false;
        for (i, element) in elements.enumerate() {
            if element.kind() == "remaining_field_pattern" {
                after_rest = true;
            } else if after_rest {
                self.declare_pattern(element, Vec::new(), &mut Vec::new());
            } else {
                let mut element_path = path.clone();
                element_path.push(FieldKey::Position(i));
                self.declare_pattern(element, element_path, out);
            }
        }
    }

    fn visit_let(&mut self, node: Node<'t>) {
        self.visit_field(node, "type");
        self.visit_field(node, "value");
        self.visit_field(node, "alternative");

        let Some(pattern) = node.child_by_field_name("pattern") else {
            return;
        };
        let mut bound = Vec::new();
        self.declare_pattern(pattern, Vec::new(), &mut bound);

        let Some(value) = node.child_by_field_name("value") else {
            return;
        };
        let declared_type = node.child_by_field_name("type");

        match unwrap_mut(pattern).kind() {
            "tuple_pattern" => {
                let arity = self.ctx.elements(&unwrap_mut(pattern)).len();
                self.bind_positional(&bound, arity, value, false);
            }
            _ if bound.len() == 1 && bound[0].path.is_empty() => {
                self.index.var_inits.entry(bound[0].id).or_insert(VarInit {
                    value,
                    declared_type,
                });
            }
            _ => debug!(
                "skipping initializer of destructuring declaration at {}:{}",
                self.ctx.file_path(),
                self.ctx.line_of(&node)
            ),
        }
    }

    /// Pairs the top-level names of a tuple pattern with initializers: one
    /// per name when the counts match, or one shared initializer for all.
    fn bind_positional(&mut self, bound: &[Bound], arity: usize, value: Node<'t>, overwrite: bool) {
        let direct: Vec<(BindingId, usize)> = bound
            .iter()
            .filter_map(|b| match b.path.as_slice() {
                [FieldKey::Position(i)] => Some((b.id, *i)),
                _ => None,
            })
            .collect();

        let value = unwrap_parens(value, self.ctx);
        if value.kind() == "tuple_expression" {
            let exprs = self.ctx.elements(&value);
            if exprs.len() != arity {
                debug!(
                    "ambiguous declaration at {}:{}: {} names, {} initializers",
                    self.ctx.file_path(),
                    self.ctx.line_of(&value),
                    arity,
                    exprs.len()
                );
                return;
            }
            for (id, i) in direct {
                self.record_init(id, exprs[i], overwrite);
            }
        } else {
            for (id, _) in direct {
                self.record_init(id, value, overwrite);
            }
        }
    }

    fn record_init(&mut self, id: BindingId, value: Node<'t>, overwrite: bool) {
        if overwrite {
            let declared_type = self.index.var_inits.get(&id).and_then(|v| v.declared_type);
            self.index.var_inits.insert(
                id,
                VarInit {
                    value,
                    declared_type,
                },
            );
        } else {
            self.index.var_inits.entry(id).or_insert(VarInit {
                value,
                declared_type: None,
            });
        }
    }

    fn visit_for(&mut self, node: Node<'t>) {
        self.visit_field(node, "value");
        self.scopes.push();

        if let (Some(pattern), Some(collection)) = (
            node.child_by_field_name("pattern"),
            node.child_by_field_name("value"),
        ) {
            let mut bound = Vec::new();
            self.declare_pattern(pattern, Vec::new(), &mut bound);
            let pair = unwrap_mut(pattern).kind() == "tuple_pattern"
                && self.ctx.elements(&unwrap_mut(pattern)).len() == 2;

            for Bound { id, path } in bound {
                let is_value = path.is_empty() || (pair && path == [FieldKey::Position(1)]);
                let source = RangeSource { collection, path };
                if is_value {
                    self.index.range_values.entry(id).or_insert(source);
                } else {
                    self.index.range_keys.entry(id).or_insert(source);
                }
            }
        }

        self.visit_field(node, "body");
        self.scopes.pop();
    }

    fn visit_assignment(&mut self, node: Node<'t>) {
        self.visit_field(node, "right");
        self.visit_field(node, "left");

        let (Some(left), Some(right)) = (
            node.child_by_field_name("left"),
            node.child_by_field_name("right"),
        ) else {
            return;
        };

        match left.kind() {
            "identifier" => {
                if let Some(id) = self.index.binding_of(&left) {
                    self.record_init(id, right, true);
                }
            }
            "tuple_expression" => {
                let targets = self.ctx.elements(&left);
                let bound: Vec<Bound> = targets
                    .iter()
                    .enumerate()
                    .filter(|(_, t)| t.kind() == "identifier")
                    .filter_map(|(i, t)| {
                        self.index.binding_of(t).map(|id| Bound {
                            id,
                            path: vec![FieldKey::Position(i)],
                        })
                    })
                    .collect();
                self.bind_positional(&bound, targets.len(), right, true);
            }
            _ => {}
        }
    }
}

fn unwrap_mut(pattern: Node) -> Node {
    if pattern.kind() == "mut_pattern" {
        let mut cursor = pattern.walk();
        let inner = pattern.named_children(&mut cursor).last();
        return inner.unwrap_or(pattern);
    }
    pattern
}

fn unwrap_parens<'t>(node: Node<'t>, ctx: &Context<'t>) -> Node<'t> {
    if node.kind() == "parenthesized_expression" {
        if let Some(inner) = ctx.elements(&node).first() {
            return unwrap_parens(*inner, ctx);
        }
    }
    node
}
