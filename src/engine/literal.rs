//! String literal matching.
//!
//! A literal matches a sought key when its token is exactly what the key
//! looks like written as a Rust string literal. Raw strings have no escapes,
//! so their body is compared verbatim.
use tree_sitter::Node;

use super::node_types::{NodeCategory, STRING_CONVERSIONS};
use super::Context;
use crate::utils::{quote_str, raw_string_body, unquote_string};

/// Looks through `&`, parentheses, `.to_string()`-style conversions and
/// `String::from(..)` to the string literal underneath.
pub fn string_literal<'a>(node: Node<'a>, ctx: &Context<'a>) -> Option<Node<'a>> {
    match node.kind() {
        "string_literal" | "raw_string_literal" => Some(node),
        "reference_expression" => string_literal(node.child_by_field_name("value")?, ctx),
        "parenthesized_expression" => string_literal(*ctx.elements(&node).first()?, ctx),
        "call_expression" => {
            let function = node.child_by_field_name("function")?;
            let args = ctx.elements(&node.child_by_field_name("arguments")?);
            match function.kind() {
                "field_expression" if args.is_empty() => {
                    let method = function.child_by_field_name("field")?;
                    if STRING_CONVERSIONS.contains(&ctx.get_node_text(&method).as_str()) {
                        string_literal(function.child_by_field_name("value")?, ctx)
                    } else {
                        None
                    }
                }
                "scoped_identifier" if args.len() == 1 => {
                    let path = function.child_by_field_name("path")?;
                    let name = function.child_by_field_name("name")?;
                    if ctx.get_node_text(&name) == "from" && ctx.get_node_text(&path) == "String" {
                        string_literal(args[0], ctx)
                    } else {
                        None
                    }
                }
                _ => None,
            }
        }
        _ => None,
    }
}

/// True when `node` is (or converts) a string literal whose token equals
/// `value` rendered with Rust quoting.
pub fn literal_matches<'a>(node: Node<'a>, value: &str, ctx: &Context<'a>) -> bool {
    let Some(lit) = string_literal(node, ctx) else {
        return false;
    };
    let token = ctx.get_node_text(&lit);
    match lit.kind() {
        "raw_string_literal" => raw_string_body(&token) == Some(value),
        _ if NodeCategory::StringLiteral.matches(lit.kind()) => token == quote_str(value),
        _ => false,
    }
}

/// Decoded value of the string literal under `node`, if any.
pub fn literal_value<'a>(node: Node<'a>, ctx: &Context<'a>) -> Option<String> {
    let lit = string_literal(node, ctx)?;
    unquote_string(&ctx.get_node_text(&lit))
}
