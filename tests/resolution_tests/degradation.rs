//! Inputs that cannot be resolved must yield no position, never a panic

use super::test_utils::{line_of, locate, locate_with};
use dataloc::error::{Error, IoError, ParserError};
use dataloc::Locator;

#[test]
fn test_line_without_lookup_call() {
    let source = r#"
#[test]
fn plain() {
    let cases = ["a"];
    for name in cases {
        let _ = name;
        dataloc::l(name);
    }
}
"#;
    assert_eq!(locate(source, "let _ = name", "a"), None);
    assert_eq!(locate(source, "let cases", "a"), None);
}

#[test]
fn test_line_out_of_range() {
    let result = Locator::new()
        .locate_source("t.rs", "fn main() {}\n", 400, "a")
        .unwrap();
    assert_eq!(result, None);
}

#[test]
fn test_table_built_by_function() {
    let source = r#"
fn cases() -> Vec<&'static str> {
    vec!["a", "b"]
}

#[test]
fn generated() {
    for name in cases() {
        dataloc::l(name);
    }
}
"#;
    assert_eq!(locate(source, "dataloc::l(", "a"), None);
}

#[test]
fn test_argument_not_a_loop_variable() {
    let source = r#"
#[test]
fn direct() {
    let name = "a";
    dataloc::l(name);
    dataloc::l("a");
}
"#;
    assert_eq!(locate(source, "dataloc::l(name", "a"), None);
    assert_eq!(locate(source, "dataloc::l(\"a", "a"), None);
}

#[test]
fn test_non_literal_keys_never_match() {
    let source = r#"
const PREFIX: &str = "a";

#[test]
fn computed() {
    let cases = [format!("{PREFIX}-1"), PREFIX.to_string()];
    for name in &cases {
        dataloc::l(name);
    }
}
"#;
    assert_eq!(locate(source, "dataloc::l(", "a-1"), None);
    assert_eq!(locate(source, "dataloc::l(", "a"), None);
}

#[test]
fn test_index_variable_of_enumerate() {
    let source = r#"
#[test]
fn indexed() {
    let cases = ["a"];
    for (i, name) in cases.iter().enumerate() {
        dataloc::at(&i.to_string());
        dataloc::l(name);
    }
}
"#;
    assert_eq!(locate(source, "dataloc::at(", "0"), None);
    assert_eq!(
        locate(source, "dataloc::l(", "a"),
        Some(line_of(source, "let cases"))
    );
}

#[test]
fn test_untracked_helper_needs_registration() {
    let source = r#"
#[test]
fn helper() {
    let cases = ["h"];
    for name in cases {
        check(name);
    }
}
"#;
    assert_eq!(locate(source, "check(", "h"), None);

    let locator = Locator::builder().track("check").build();
    assert_eq!(
        locate_with(&locator, source, "check(", "h"),
        Some(line_of(source, "let cases"))
    );
}

#[test]
fn test_syntax_error_is_reported() {
    let err = Locator::new()
        .locate_source("broken.rs", "fn broken( {", 1, "a")
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Parser(ParserError::SyntaxError { .. })
    ));
}

#[test]
fn test_missing_file_is_reported() {
    let err = Locator::new()
        .locate_file("/nonexistent/dataloc/case_test.rs", 1, "a")
        .unwrap_err();
    assert!(matches!(err, Error::Io(IoError::FileNotFound { .. })));
}

#[test]
fn test_public_entry_points_collapse_to_unknown() {
    assert_eq!(dataloc::locate("a", 64), dataloc::UNKNOWN);
    assert_eq!(dataloc::l("not in any table"), dataloc::UNKNOWN);
}
