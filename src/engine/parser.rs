//! Source parsing for table resolution.
//!
//! Sources are parsed with the tree-sitter Rust grammar. Expression-like
//! macros (`vec![..]`, `assert_eq!(..)`, ...) keep their arguments as raw
//! token trees, which hides test tables and lookup calls from the rest of the
//! pipeline. Those invocations are normalized by blanking the macro name and
//! `!` and re-parsing, so `vec![a, b]` becomes the array `    [a, b]` at the
//! same byte offsets.
use std::path::Path;
use tracing::{debug, trace};
use tree_sitter::{Node, Parser, Tree};

use crate::error::{IoError, ParserError, Result};
use crate::utils::extract_last_segment;

const MAX_NORMALIZE_ROUNDS: usize = 8;

/// Macros whose arguments are ordinary comma separated expressions.
const EXPRESSION_MACROS: &[&str] = &[
    "vec",
    "assert",
    "assert_eq",
    "assert_ne",
    "debug_assert",
    "debug_assert_eq",
    "debug_assert_ne",
    "format",
    "format_args",
    "print",
    "println",
    "eprint",
    "eprintln",
    "write",
    "writeln",
    "panic",
    "dbg",
    "unreachable",
];

/// A parsed source file: the (normalized) text and its tree.
pub struct ParsedSource {
    pub path: String,
    pub source: String,
    pub tree: Tree,
}

/// Parse Rust source into a tree-sitter Tree. Syntax errors are left in the
/// tree; see [`check_syntax`].
pub fn parse_rust(source: &str) -> std::result::Result<Tree, ParserError> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_rust::LANGUAGE.into())
        .map_err(|_| ParserError::language_setup_failed("rust"))?;
    parser
        .parse(source, None)
        .ok_or_else(|| ParserError::parse_failed("<memory>"))
}

/// Fails with the first `ERROR` or `MISSING` node in the tree.
pub fn check_syntax(tree: &Tree, path: &str) -> std::result::Result<(), ParserError> {
    if !tree.root_node().has_error() {
        return Ok(());
    }
    let Some(bad) = first_error(tree.root_node()) else {
        return Err(ParserError::parse_failed(path));
    };
    let pos = bad.start_position();
    let message = if bad.is_missing() {
        format!("missing {}", bad.kind())
    } else {
        "unexpected input".to_string()
    };
    Err(ParserError::syntax_error(path, pos.row + 1, pos.column + 1, message))
}

fn first_error(node: Node) -> Option<Node> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    let children: Vec<_> = node.children(&mut cursor).collect();
    children.into_iter().find_map(first_error)
}

/// Reads and parses the file at `disk_path`, reporting positions under
/// `display_path`.
pub fn parse_file(disk_path: &Path, display_path: &str) -> Result<ParsedSource> {
    let source = std::fs::read_to_string(disk_path)
        .map_err(|e| IoError::read_error(disk_path, e))?;
    parse_source(display_path, source)
}

/// Parses in-memory source, normalizing expression macros.
pub fn parse_source(display_path: &str, source: impl Into<String>) -> Result<ParsedSource> {
    let mut source = source.into();
    let mut tree = parse_rust(&source)?;
    check_syntax(&tree, display_path)?;

    for round in 0..MAX_NORMALIZE_ROUNDS {
        let Some(normalized) = normalize_macros(&source, &tree) else {
            break;
        };
        let reparsed = parse_rust(&normalized)?;
        if reparsed.root_node().has_error() {
            debug!(
                "macro normalization round {} of {} introduced syntax errors, keeping previous tree",
                round + 1,
                display_path
            );
            break;
        }
        trace!("normalized macros in {} (round {})", display_path, round + 1);
        source = normalized;
        tree = reparsed;
    }

    Ok(ParsedSource {
        path: display_path.to_string(),
        source,
        tree,
    })
}

/// Blanks the name of every expression macro invocation. Returns `None` when
/// there is nothing to rewrite.
fn normalize_macros(source: &str, tree: &Tree) -> Option<String> {
    let mut spans = Vec::new();
    collect_macro_spans(tree.root_node(), source.as_bytes(), &mut spans);
    if spans.is_empty() {
        return None;
    }

    let mut bytes = source.as_bytes().to_vec();
    for (start, end) in spans {
        for b in &mut bytes[start..end] {
            if *b != b'\n' && *b != b'\r' {
                *b = b' ';
            }
        }
    }
    // Only ASCII bytes were replaced with ASCII spaces.
    String::from_utf8(bytes).ok()
}

fn collect_macro_spans(node: Node, source: &[u8], spans: &mut Vec<(usize, usize)>) {
    if node.kind() == "macro_invocation" {
        if let Some(span) = expression_macro_span(&node, source) {
            spans.push(span);
        }
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_macro_spans(child, source, spans);
    }
}

fn expression_macro_span(node: &Node, source: &[u8]) -> Option<(usize, usize)> {
    let name = node.child_by_field_name("macro")?;
    let name_text = std::str::from_utf8(&source[name.start_byte()..name.end_byte()]).ok()?;
    if !EXPRESSION_MACROS.contains(&extract_last_segment(name_text).as_str()) {
        return None;
    }

    let mut cursor = node.walk();
    let tokens = node
        .children(&mut cursor)
        .find(|c| c.kind() == "token_tree")?;
    match source.get(tokens.start_byte()) {
        Some(b'(') | Some(b'[') => {}
        _ => return None,
    }

    let span = (node.start_byte(), tokens.start_byte());
    source[span.0..span.1].is_ascii().then_some(span)
}
