/// Tree-sitter Rust node kinds grouped by the role they play in table
/// resolution. Only this closed set is ever inspected.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeCategory {
    CallExpression,
    Identifier,
    SelectorExpression,
    StructLiteral,
    TupleLiteral,
    ArrayLiteral,
    KeyValue,
    StringLiteral,
    VariableDeclaration,
    TypeDeclaration,
    RangeLoop,
    Assignment,
    ScopeBoundary,
    Wrapper,
    Comment,
}

impl NodeCategory {
    pub fn kinds(self) -> &'static [&'static str] {
        match self {
            Self::CallExpression => &["call_expression"],
            Self::Identifier => &["identifier", "shorthand_field_identifier"],
            Self::SelectorExpression => &["field_expression"],
            Self::StructLiteral => &["struct_expression"],
            Self::TupleLiteral => &["tuple_expression"],
            Self::ArrayLiteral => &["array_expression"],
            Self::KeyValue => &["field_initializer"],
            Self::StringLiteral => &["string_literal", "raw_string_literal"],
            Self::VariableDeclaration => &["let_declaration", "const_item", "static_item"],
            Self::TypeDeclaration => &["struct_item"],
            Self::RangeLoop => &["for_expression"],
            Self::Assignment => &["assignment_expression"],
            Self::ScopeBoundary => &[
                "source_file",
                "declaration_list",
                "block",
                "function_item",
                "closure_expression",
                "match_arm",
                "if_expression",
                "while_expression",
            ],
            Self::Wrapper => &["reference_expression", "parenthesized_expression"],
            Self::Comment => &["line_comment", "block_comment"],
        }
    }

    pub fn matches(self, kind: &str) -> bool {
        self.kinds().contains(&kind)
    }
}

/// Item kinds hoisted to the top of their enclosing scope.
pub const HOISTED_ITEMS: &[&str] = &["struct_item", "const_item", "static_item"];

/// Methods that hand back their receiver's elements unchanged.
pub const PASSTHROUGH_METHODS: &[&str] = &[
    "iter",
    "into_iter",
    "iter_mut",
    "to_vec",
    "clone",
    "as_slice",
];

/// Methods that turn a string literal into an owned or borrowed string.
pub const STRING_CONVERSIONS: &[&str] = &["to_string", "to_owned", "into", "as_str", "as_ref"];
