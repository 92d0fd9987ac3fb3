/// Why a resolution step came up empty. Every variant collapses to the same
/// `"unknown"` result at the public boundary; the reason only feeds the
/// diagnostic log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unresolved {
    CallNotFound,
    UnsupportedArgument,
    BindingNotFound,
    NotARangeVariable,
    InitializerNotFound,
    NotATableLiteral,
    TypeNotFound,
    EntryNotFound,
}

impl Unresolved {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CallNotFound => "call_not_found",
            Self::UnsupportedArgument => "unsupported_argument",
            Self::BindingNotFound => "binding_not_found",
            Self::NotARangeVariable => "not_a_range_variable",
            Self::InitializerNotFound => "initializer_not_found",
            Self::NotATableLiteral => "not_a_table_literal",
            Self::TypeNotFound => "type_not_found",
            Self::EntryNotFound => "entry_not_found",
        }
    }
}

impl std::fmt::Display for Unresolved {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

pub type Resolution<T> = std::result::Result<T, Unresolved>;
