//! Field keys and the struct field indexer.
use std::fmt;
use tree_sitter::Node;

use super::Context;

/// One step from a table entry towards the value a loop variable holds:
/// a named struct field or a tuple position.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldKey {
    Named(String),
    Position(usize),
}

pub type FieldPath = Vec<FieldKey>;

impl FieldKey {
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        match name.parse::<usize>() {
            Ok(i) => Self::Position(i),
            Err(_) => Self::Named(name),
        }
    }

    /// Key for the `field` child of a `field_expression` or
    /// `field_initializer` (`name` or `0`).
    pub fn from_field_node(node: &Node, ctx: &Context) -> Self {
        Self::named(ctx.get_node_text(node))
    }

    /// True when a keyed initializer `name: value` supplies this field.
    pub fn matches_name(&self, name: &str) -> bool {
        match self {
            Self::Named(n) => n == name,
            Self::Position(i) => name.parse::<usize>().is_ok_and(|p| p == *i),
        }
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(n) => write!(f, "{n}"),
            Self::Position(i) => write!(f, "{i}"),
        }
    }
}

/// Returns the zero-based position of `key` in a struct's field list
/// (`field_declaration_list` or `ordered_field_declaration_list`), or `None`
/// when the struct has no such field.
pub fn field_index(field_list: &Node, key: &FieldKey, ctx: &Context) -> Option<usize> {
    match field_list.kind() {
        "field_declaration_list" => {
            let names: Vec<String> = ctx
                .elements(field_list)
                .iter()
                .filter(|f| f.kind() == "field_declaration")
                .filter_map(|f| f.child_by_field_name("name"))
                .map(|n| ctx.get_node_text(&n))
                .collect();
            match key {
                FieldKey::Named(name) => names.iter().position(|n| n == name),
                FieldKey::Position(i) => (*i < names.len()).then_some(*i),
            }
        }
        "ordered_field_declaration_list" => {
            let mut cursor = field_list.walk();
            let count = field_list.children_by_field_name("type", &mut cursor).count();
            match key {
                FieldKey::Position(i) => (*i < count).then_some(*i),
                FieldKey::Named(_) => None,
            }
        }
        _ => None,
    }
}
