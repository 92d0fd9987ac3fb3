/// Resolution context shared by the index builder and the site matcher.
///
/// This provides access to:
/// - The parse tree and the source it was built from
/// - The display path positions are reported under
use std::fmt;
use tree_sitter::{Node, Tree};

use super::node_types::NodeCategory;

/// A 1-based line in a named file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourcePosition {
    pub file: String,
    pub line: usize,
}

impl SourcePosition {
    pub fn new(file: impl Into<String>, line: usize) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }
}

impl fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

pub struct Context<'a> {
    /// The Tree-sitter parse tree
    tree: &'a Tree,

    /// Source code bytes the tree was parsed from
    source_code: &'a [u8],

    /// Path reported in positions
    file_path: String,
}

impl<'a> Context<'a> {
    pub fn new(tree: &'a Tree, source_code: &'a [u8], file_path: impl Into<String>) -> Self {
        Self {
            tree,
            source_code,
            file_path: file_path.into(),
        }
    }

    pub fn tree(&self) -> &'a Tree {
        self.tree
    }

    pub fn root(&self) -> Node<'a> {
        self.tree.root_node()
    }

    pub fn source_code(&self) -> &'a [u8] {
        self.source_code
    }

    pub fn file_path(&self) -> &str {
        &self.file_path
    }

    /// Get the source code text for a node.
    /// Uses lossy UTF-8 conversion to handle invalid sequences gracefully
    pub fn get_node_text(&self, node: &Node) -> String {
        let start = node.start_byte();
        let end = node.end_byte();
        String::from_utf8_lossy(&self.source_code[start..end]).to_string()
    }

    pub fn line_of(&self, node: &Node) -> usize {
        node.start_position().row + 1
    }

    pub fn position(&self, node: &Node) -> SourcePosition {
        SourcePosition::new(self.file_path.clone(), self.line_of(node))
    }

    /// Named children that carry meaning: comments and attributes are skipped.
    pub fn elements(&self, node: &Node<'a>) -> Vec<Node<'a>> {
        let mut cursor = node.walk();
        node.named_children(&mut cursor)
            .filter(|c| !NodeCategory::Comment.matches(c.kind()) && c.kind() != "attribute_item")
            .collect()
    }
}
