//! Site matcher: from a lookup call on a given line to the test table entry
//! whose key was passed to it.
use tracing::{debug, warn};
use tree_sitter::Node;

use super::fields::{field_index, FieldKey, FieldPath};
use super::index::{BindingIndex, RangeSource};
use super::literal::{literal_matches, literal_value};
use super::node_types::{NodeCategory, PASSTHROUGH_METHODS, STRING_CONVERSIONS};
use super::sources::{Resolution, Unresolved};
use super::{CalleeFilter, Context};
use crate::utils::extract_last_segment;

const MAX_INIT_HOPS: usize = 8;

/// A literal test table.
#[derive(Debug, Clone, Copy)]
pub enum TableLiteral<'t> {
    /// `[..]` or `vec![..]` of entries.
    Sequence(Node<'t>),
    /// `HashMap::from([(key, value), ..])` and friends; holds the array.
    Mapping(Node<'t>),
}

impl<'t> TableLiteral<'t> {
    pub fn node(&self) -> Node<'t> {
        match self {
            Self::Sequence(n) | Self::Mapping(n) => *n,
        }
    }
}

/// What a lookup argument traces back to: a table, the path from each entry
/// to the key, and the table's declared type when annotated.
#[derive(Debug, Clone)]
pub struct TableTarget<'t> {
    pub table: TableLiteral<'t>,
    pub path: FieldPath,
    pub declared_type: Option<Node<'t>>,
}

/// One entry of a resolved table, for listings.
#[derive(Debug, Clone)]
pub struct TableEntry<'t> {
    pub node: Node<'t>,
    pub key: Option<String>,
}

pub struct SiteMatcher<'c, 't> {
    ctx: &'c Context<'t>,
    index: &'c BindingIndex<'t>,
    callees: &'c CalleeFilter,
}

impl<'c, 't> SiteMatcher<'c, 't> {
    pub fn new(ctx: &'c Context<'t>, index: &'c BindingIndex<'t>, callees: &'c CalleeFilter) -> Self {
        Self {
            ctx,
            index,
            callees,
        }
    }

    /// Finds the entry whose key equals `sought` for the lookup call on
    /// `line`.
    pub fn locate(&self, line: usize, sought: &str) -> Resolution<Node<'t>> {
        let calls = self.calls_at(line);
        if calls.is_empty() {
            return Err(Unresolved::CallNotFound);
        }

        let mut miss = Unresolved::CallNotFound;
        for call in calls {
            for arg in self.candidate_args(call) {
                match self.trace_argument(arg) {
                    Ok(target) => match self.find_entry(&target, sought) {
                        Some(entry) => return Ok(entry),
                        None => miss = Unresolved::EntryNotFound,
                    },
                    Err(reason) => {
                        debug!(
                            "argument `{}` at {}:{} unresolved: {}",
                            self.ctx.get_node_text(&arg),
                            self.ctx.file_path(),
                            line,
                            reason
                        );
                        miss = reason;
                    }
                }
            }
        }
        Err(miss)
    }

    /// Lookup calls starting on `line`, outermost first. Falls back to
    /// tracked calls spanning the line, innermost first, when none start
    /// there.
    pub fn calls_at(&self, line: usize) -> Vec<Node<'t>> {
        let mut starting = Vec::new();
        let mut spanning = Vec::new();
        self.collect_calls(self.ctx.root(), line, &mut starting, &mut spanning);
        if starting.is_empty() {
            spanning.reverse();
            return spanning;
        }
        starting
    }

    /// Every tracked call in the file, in source order.
    pub fn all_calls(&self) -> Vec<Node<'t>> {
        let mut calls = Vec::new();
        self.collect_all(self.ctx.root(), &mut calls);
        calls
    }

    fn collect_all(&self, node: Node<'t>, out: &mut Vec<Node<'t>>) {
        if NodeCategory::CallExpression.matches(node.kind()) && self.is_tracked(&node) {
            out.push(node);
        }
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            self.collect_all(child, out);
        }
    }

    fn collect_calls(
        &self,
        node: Node<'t>,
        line: usize,
        starting: &mut Vec<Node<'t>>,
        spanning: &mut Vec<Node<'t>>,
    ) {
        let first = node.start_position().row + 1;
        let last = node.end_position().row + 1;
        if line < first || line > last {
            return;
        }

        if NodeCategory::CallExpression.matches(node.kind()) && self.is_tracked(&node) {
            if first == line {
                starting.push(node);
            } else {
                spanning.push(node);
            }
        }

        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            self.collect_calls(child, line, starting, spanning);
        }
    }

    fn is_tracked(&self, call: &Node<'t>) -> bool {
        match self.callees {
            CalleeFilter::Any => true,
            CalleeFilter::Tracked(names) => call
                .child_by_field_name("function")
                .and_then(|f| self.callee_name(f))
                .is_some_and(|name| names.iter().any(|n| *n == name)),
        }
    }

    pub fn callee_name(&self, function: Node<'t>) -> Option<String> {
        match function.kind() {
            "identifier" => Some(self.ctx.get_node_text(&function)),
            "scoped_identifier" => function
                .child_by_field_name("name")
                .map(|n| self.ctx.get_node_text(&n)),
            "field_expression" => function
                .child_by_field_name("field")
                .map(|n| self.ctx.get_node_text(&n)),
            "generic_function" => self.callee_name(function.child_by_field_name("function")?),
            _ => Some(extract_last_segment(&self.ctx.get_node_text(&function))),
        }
    }

    /// Tracked lookups take the key as their single (first) argument.
    /// Helper layers may pass it anywhere, so every argument is a candidate.
    fn candidate_args(&self, call: Node<'t>) -> Vec<Node<'t>> {
        let Some(arguments) = call.child_by_field_name("arguments") else {
            return Vec::new();
        };
        let mut args = self.ctx.elements(&arguments);
        if matches!(self.callees, CalleeFilter::Tracked(_)) {
            args.truncate(1);
        }
        args
    }

    /// Traces a lookup argument (`tc.name` or `name`) to the table its loop
    /// ranges over.
    pub fn trace_argument(&self, arg: Node<'t>) -> Resolution<TableTarget<'t>> {
        let arg = self.unwrap_argument(arg);
        let (source, path) = match arg.kind() {
            "field_expression" => {
                let mut keys = Vec::new();
                let mut current = arg;
                while current.kind() == "field_expression" {
                    let field = current
                        .child_by_field_name("field")
                        .ok_or(Unresolved::UnsupportedArgument)?;
                    keys.push(FieldKey::from_field_node(&field, self.ctx));
                    current = self.unwrap_argument(
                        current
                            .child_by_field_name("value")
                            .ok_or(Unresolved::UnsupportedArgument)?,
                    );
                }
                keys.reverse();
                let id = self.binding(current)?;
                let source = self
                    .index
                    .range_value(id)
                    .or_else(|| self.index.range_key(id))
                    .ok_or(Unresolved::NotARangeVariable)?;
                let mut path = source.path.clone();
                path.extend(keys);
                (source, path)
            }
            "identifier" => {
                let id = self.binding(arg)?;
                let source = self
                    .index
                    .range_key(id)
                    .or_else(|| self.index.range_value(id))
                    .ok_or(Unresolved::NotARangeVariable)?;
                (source, source.path.clone())
            }
            _ => return Err(Unresolved::UnsupportedArgument),
        };
        self.resolve_collection(source, path)
    }

    fn binding(&self, ident: Node<'t>) -> Resolution<super::scope::BindingId> {
        if ident.kind() != "identifier" {
            return Err(Unresolved::UnsupportedArgument);
        }
        self.index
            .binding_of(&ident)
            .ok_or(Unresolved::BindingNotFound)
    }

    /// Looks through `&x`, `(x)` and string conversions on the argument.
    fn unwrap_argument(&self, node: Node<'t>) -> Node<'t> {
        match node.kind() {
            "reference_expression" => node
                .child_by_field_name("value")
                .map(|v| self.unwrap_argument(v))
                .unwrap_or(node),
            "parenthesized_expression" => self
                .ctx
                .elements(&node)
                .first()
                .map(|v| self.unwrap_argument(*v))
                .unwrap_or(node),
            "call_expression" => match self.method_receiver(node, STRING_CONVERSIONS) {
                Some(receiver) => self.unwrap_argument(receiver),
                None => node,
            },
            _ => node,
        }
    }

    /// Receiver of an argument-less method call named in `methods`.
    fn method_receiver(&self, call: Node<'t>, methods: &[&str]) -> Option<Node<'t>> {
        let function = call.child_by_field_name("function")?;
        let arguments = call.child_by_field_name("arguments")?;
        if function.kind() != "field_expression" || !self.ctx.elements(&arguments).is_empty() {
            return None;
        }
        let method = self.ctx.get_node_text(&function.child_by_field_name("field")?);
        if methods.contains(&method.as_str()) {
            function.child_by_field_name("value")
        } else {
            None
        }
    }

    /// From the iterated expression to the table literal, following
    /// variables through their initializers.
    fn resolve_collection(
        &self,
        source: &RangeSource<'t>,
        mut path: FieldPath,
    ) -> Resolution<TableTarget<'t>> {
        let mut expr = source.collection;
        let mut declared_type = None;

        for _ in 0..MAX_INIT_HOPS {
            expr = self.unwrap_collection(expr, &mut path)?;
            if expr.kind() != "identifier" {
                let table = self.classify_table(expr).ok_or(Unresolved::NotATableLiteral)?;
                return Ok(TableTarget {
                    table,
                    path,
                    declared_type,
                });
            }
            let id = self.binding(expr)?;
            let init = self
                .index
                .var_init(id)
                .ok_or(Unresolved::InitializerNotFound)?;
            declared_type = init.declared_type.or(declared_type);
            expr = init.value;
        }
        Err(Unresolved::InitializerNotFound)
    }

    fn unwrap_collection(&self, node: Node<'t>, path: &mut FieldPath) -> Resolution<Node<'t>> {
        match node.kind() {
            "reference_expression" => {
                let value = node
                    .child_by_field_name("value")
                    .ok_or(Unresolved::NotATableLiteral)?;
                self.unwrap_collection(value, path)
            }
            "parenthesized_expression" => {
                let inner = *self
                    .ctx
                    .elements(&node)
                    .first()
                    .ok_or(Unresolved::NotATableLiteral)?;
                self.unwrap_collection(inner, path)
            }
            "call_expression" => {
                if let Some(receiver) = self.method_receiver(node, PASSTHROUGH_METHODS) {
                    return self.unwrap_collection(receiver, path);
                }
                if let Some(receiver) = self.method_receiver(node, &["enumerate"]) {
                    // `(index, entry)`: only the entry side leads to a key.
                    if path.first() != Some(&FieldKey::Position(1)) {
                        return Err(Unresolved::UnsupportedArgument);
                    }
                    path.remove(0);
                    return self.unwrap_collection(receiver, path);
                }
                Ok(node)
            }
            _ => Ok(node),
        }
    }

    fn classify_table(&self, node: Node<'t>) -> Option<TableLiteral<'t>> {
        match node.kind() {
            "array_expression" if node.child_by_field_name("length").is_none() => {
                Some(TableLiteral::Sequence(node))
            }
            "call_expression" => {
                let function = node.child_by_field_name("function")?;
                if function.kind() != "scoped_identifier" {
                    return None;
                }
                let name = self.ctx.get_node_text(&function.child_by_field_name("name")?);
                let path = self.ctx.get_node_text(&function.child_by_field_name("path")?);
                if !matches!(name.as_str(), "from" | "from_iter")
                    || !extract_last_segment(&path).ends_with("Map")
                {
                    return None;
                }
                let args = self.ctx.elements(&node.child_by_field_name("arguments")?);
                let mut array = *args.first()?;
                while array.kind() == "reference_expression" {
                    array = array.child_by_field_name("value")?;
                }
                (array.kind() == "array_expression").then_some(TableLiteral::Mapping(array))
            }
            _ => {
                debug!(
                    "unexpected table expression `{}` at {}:{}",
                    node.kind(),
                    self.ctx.file_path(),
                    self.ctx.line_of(&node)
                );
                None
            }
        }
    }

    /// First entry of the table whose key equals `value`.
    pub fn find_entry(&self, target: &TableTarget<'t>, value: &str) -> Option<Node<'t>> {
        match target.table {
            TableLiteral::Mapping(array) => self
                .ctx
                .elements(&array)
                .into_iter()
                .find(|entry| {
                    self.mapping_key(*entry)
                        .is_some_and(|key| literal_matches(key, value, self.ctx))
                }),
            TableLiteral::Sequence(array) => {
                let fallback = self.declared_element_fields(target.declared_type);
                for entry in self.ctx.elements(&array) {
                    match self.resolve_path(entry, &target.path, fallback) {
                        Ok(Some(leaf)) if literal_matches(leaf, value, self.ctx) => {
                            return Some(entry)
                        }
                        Ok(_) => {}
                        Err(_) => return None,
                    }
                }
                None
            }
        }
    }

    /// Every entry of the table with its decoded key.
    pub fn entries(&self, target: &TableTarget<'t>) -> Vec<TableEntry<'t>> {
        match target.table {
            TableLiteral::Mapping(array) => self
                .ctx
                .elements(&array)
                .into_iter()
                .map(|node| TableEntry {
                    node,
                    key: self
                        .mapping_key(node)
                        .and_then(|k| literal_value(k, self.ctx)),
                })
                .collect(),
            TableLiteral::Sequence(array) => {
                let fallback = self.declared_element_fields(target.declared_type);
                self.ctx
                    .elements(&array)
                    .into_iter()
                    .map(|node| TableEntry {
                        node,
                        key: self
                            .resolve_path(node, &target.path, fallback)
                            .ok()
                            .flatten()
                            .and_then(|leaf| literal_value(leaf, self.ctx)),
                    })
                    .collect()
            }
        }
    }

    fn mapping_key(&self, entry: Node<'t>) -> Option<Node<'t>> {
        if entry.kind() != "tuple_expression" {
            return None;
        }
        self.ctx.elements(&entry).first().copied()
    }

    /// Follows `path` from an entry to the node holding its key. `Ok(None)`
    /// means the entry has no such field; `Err` means the entry's type could
    /// not be resolved, which rules out the whole table.
    fn resolve_path(
        &self,
        entry: Node<'t>,
        path: &[FieldKey],
        fallback: Option<Node<'t>>,
    ) -> Resolution<Option<Node<'t>>> {
        let entry = self.unwrap_entry(entry);
        let Some((key, rest)) = path.split_first() else {
            return Ok(Some(entry));
        };
        match self.component(entry, key, fallback)? {
            Some(next) => self.resolve_path(next, rest, None),
            None => Ok(None),
        }
    }

    fn unwrap_entry(&self, node: Node<'t>) -> Node<'t> {
        if NodeCategory::Wrapper.matches(node.kind()) {
            let inner = match node.kind() {
                "reference_expression" => node.child_by_field_name("value"),
                _ => self.ctx.elements(&node).first().copied(),
            };
            if let Some(inner) = inner {
                return self.unwrap_entry(inner);
            }
        }
        node
    }

    /// The part of a composite literal that `key` selects.
    fn component(
        &self,
        node: Node<'t>,
        key: &FieldKey,
        fallback: Option<Node<'t>>,
    ) -> Resolution<Option<Node<'t>>> {
        match node.kind() {
            "struct_expression" => {
                let Some(body) = node.child_by_field_name("body") else {
                    return Ok(None);
                };
                for field in self.ctx.elements(&body) {
                    match field.kind() {
                        "field_initializer" => {
                            let (Some(name), Some(value)) = (
                                field.child_by_field_name("field"),
                                field.child_by_field_name("value"),
                            ) else {
                                continue;
                            };
                            if key.matches_name(&self.ctx.get_node_text(&name)) {
                                return Ok(Some(value));
                            }
                        }
                        "shorthand_field_initializer" => {
                            if key.matches_name(&self.ctx.get_node_text(&field)) {
                                return Ok(Some(field));
                            }
                        }
                        _ => {}
                    }
                }
                Ok(None)
            }
            "tuple_expression" | "array_expression" => {
                let position = match key {
                    FieldKey::Position(i) => Some(*i),
                    FieldKey::Named(name) => {
                        let Some(fields) = fallback else {
                            warn!("could not resolve type of tuple entry field {}", name);
                            return Err(Unresolved::TypeNotFound);
                        };
                        field_index(&fields, key, self.ctx)
                    }
                };
                Ok(position.and_then(|i| self.ctx.elements(&node).get(i).copied()))
            }
            "call_expression" => {
                let (Some(function), Some(arguments)) = (
                    node.child_by_field_name("function"),
                    node.child_by_field_name("arguments"),
                ) else {
                    return Ok(None);
                };
                let position = match function.kind() {
                    "identifier" => match self.tuple_struct_fields(function) {
                        Some(fields) => field_index(&fields, key, self.ctx),
                        None => match key {
                            FieldKey::Position(i) => Some(*i),
                            FieldKey::Named(_) => {
                                warn!(
                                    "could not resolve type of {}",
                                    self.ctx.get_node_text(&function)
                                );
                                return Err(Unresolved::TypeNotFound);
                            }
                        },
                    },
                    "scoped_identifier" => self.parameter_index(function, key)?,
                    _ => None,
                };
                Ok(position.and_then(|i| self.ctx.elements(&arguments).get(i).copied()))
            }
            _ => Ok(None),
        }
    }

    /// Field list of the tuple struct a `Case(..)` call builds.
    fn tuple_struct_fields(&self, name: Node<'t>) -> Option<Node<'t>> {
        let id = self.index.binding_of(&name)?;
        self.index.type_decl(id)
    }

    /// Argument position of `Type::f(..)` that carries field `key`: the
    /// parameter of `f` named like the field. Positional keys and functions
    /// declared outside this file never match.
    fn parameter_index(&self, function: Node<'t>, key: &FieldKey) -> Resolution<Option<usize>> {
        let (Some(type_name), Some(fn_name)) = (
            function.child_by_field_name("path"),
            function.child_by_field_name("name"),
        ) else {
            return Ok(None);
        };
        let Some(id) = self.index.binding_of(&type_name) else {
            warn!(
                "could not resolve type of {}",
                self.ctx.get_node_text(&function)
            );
            return Err(Unresolved::TypeNotFound);
        };
        let FieldKey::Named(field) = key else {
            return Ok(None);
        };
        let fn_name = self.ctx.get_node_text(&fn_name);
        let Some(params) = self
            .index
            .assoc_fn(id, &fn_name)
            .and_then(|f| f.child_by_field_name("parameters"))
        else {
            debug!(
                "no declaration of {} in {}",
                self.ctx.get_node_text(&function),
                self.ctx.file_path()
            );
            return Ok(None);
        };

        Ok(self
            .ctx
            .elements(&params)
            .iter()
            .position(|param| self.parameter_name(*param).as_deref() == Some(field.as_str())))
    }

    fn parameter_name(&self, param: Node<'t>) -> Option<String> {
        if param.kind() != "parameter" {
            return None;
        }
        let mut pattern = param.child_by_field_name("pattern")?;
        if pattern.kind() == "mut_pattern" {
            pattern = *self.ctx.elements(&pattern).last()?;
        }
        (pattern.kind() == "identifier").then(|| self.ctx.get_node_text(&pattern))
    }

    /// Field list of the element type named by a table's annotation
    /// (`Vec<Case>`, `[Case; 3]`, `&[Case]`).
    fn declared_element_fields(&self, declared: Option<Node<'t>>) -> Option<Node<'t>> {
        let mut ty = declared?;
        loop {
            ty = match ty.kind() {
                "reference_type" => ty.child_by_field_name("type")?,
                "array_type" => ty.child_by_field_name("element")?,
                "generic_type" => {
                    let args = ty.child_by_field_name("type_arguments")?;
                    *self.ctx.elements(&args).first()?
                }
                "type_identifier" => {
                    let id = self.index.binding_of(&ty)?;
                    return self.index.type_decl(id);
                }
                _ => return None,
            };
        }
    }
}
