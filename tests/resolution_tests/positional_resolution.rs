//! Positional entry tests: entries whose fields are matched by declaration
//! order through the struct field indexer

use super::test_utils::{line_of, locate};
use pretty_assertions::assert_eq;

#[test]
fn test_constructor_arguments_follow_field_order() {
    let source = r#"
struct Case {
    input: u32,
    name: &'static str,
    want: u32,
}

impl Case {
    fn new(input: u32, name: &'static str, want: u32) -> Self {
        Self { input, name, want }
    }
}

#[test]
fn squares() {
    let cases = vec![
        Case::new(2, "two", 4),
        Case::new(3, "three", 9),
    ];
    for tc in &cases {
        assert_eq!(tc.input * tc.input, tc.want, "{}", dataloc::l(tc.name));
    }
}
"#;
    assert_eq!(
        locate(source, "dataloc::l(", "three"),
        Some(line_of(source, "\"three\""))
    );
}

#[test]
fn test_constructor_parameters_differ_from_field_order() {
    let source = r#"
struct Case {
    want: &'static str,
    name: &'static str,
}

impl Case {
    fn new(name: &'static str, want: &'static str) -> Self {
        Case { want, name }
    }
}

#[test]
fn swapped() {
    let cases = [
        Case::new("alpha", "beta"),
        Case::new("beta", "gamma"),
    ];
    for tc in &cases {
        dataloc::l(tc.name);
    }
}
"#;
    assert_eq!(
        locate(source, "dataloc::l(", "beta"),
        Some(line_of(source, "Case::new(\"beta\""))
    );
    assert_eq!(locate(source, "dataloc::l(", "gamma"), None);
}

#[test]
fn test_associated_fn_without_key_parameter() {
    let source = r#"
struct Case {
    name: &'static str,
    want: &'static str,
}

impl Case {
    fn expecting(want: &'static str) -> Self {
        Case { name: "", want }
    }
}

#[test]
fn expectations() {
    let cases = vec![
        Case::expecting("x"),
        Case { name: "x", want: "y" },
    ];
    for tc in cases {
        dataloc::l(tc.name);
    }
}
"#;
    assert_eq!(
        locate(source, "dataloc::l(", "x"),
        Some(line_of(source, "name: \"x\""))
    );
}

#[test]
fn test_undeclared_associated_fn_never_matches() {
    let source = r#"
#[derive(Default)]
struct Case {
    name: &'static str,
}

#[test]
fn defaults() {
    let cases = [Case::from_name("a"), Case { name: "a" }];
    for tc in cases {
        dataloc::l(tc.name);
    }
}
"#;
    assert_eq!(
        locate(source, "dataloc::l(", "a"),
        Some(line_of(source, "let cases"))
    );
}

#[test]
fn test_tuple_struct_by_index() {
    let source = r#"
struct Case(&'static str, i64, i64);

#[test]
fn negate() {
    let cases = [
        Case("pos", 1, -1),
        Case("neg", -2, 2),
    ];
    for tc in cases {
        assert_eq!(-tc.1, tc.2, "{}", dataloc::l(tc.0));
    }
}
"#;
    assert_eq!(
        locate(source, "dataloc::l(", "neg"),
        Some(line_of(source, "\"neg\""))
    );
}

#[test]
fn test_keyed_and_positional_entries_mixed() {
    let source = r#"
struct Case { name: &'static str, want: bool }

impl Case {
    const fn new(name: &'static str, want: bool) -> Self {
        Case { name, want }
    }
}

const CASES: [Case; 2] = [
    Case::new("ctor", true),
    Case { name: "literal", want: false },
];

#[test]
fn mixed() {
    for tc in CASES.iter() {
        dataloc::l(tc.name);
    }
}
"#;
    assert_eq!(
        locate(source, "dataloc::l(", "ctor"),
        Some(line_of(source, "\"ctor\""))
    );
    assert_eq!(
        locate(source, "dataloc::l(", "literal"),
        Some(line_of(source, "\"literal\""))
    );
}

#[test]
fn test_field_missing_from_element_type() {
    let source = r#"
struct Case { label: &'static str }

impl Case {
    fn new(label: &'static str) -> Self { Case { label } }
}

#[test]
fn missing() {
    let cases = [Case::new("x")];
    for tc in cases {
        dataloc::l(tc.name);
    }
}
"#;
    assert_eq!(locate(source, "dataloc::l(", "x"), None);
}

#[test]
fn test_unresolvable_element_type() {
    let source = r#"
use fixtures::Case;

#[test]
fn external() {
    let cases = [Case::new("ext", 1)];
    for tc in cases {
        dataloc::l(tc.name);
    }
}
"#;
    assert_eq!(locate(source, "dataloc::l(", "ext"), None);
}

#[test]
fn test_annotated_table_with_struct_pattern() {
    let source = r#"
struct Pair { name: &'static str, want: u8 }

#[test]
fn annotated() {
    let cases: Vec<Pair> = vec![
        Pair { name: "p1", want: 1 },
        Pair { name: "p2", want: 2 },
    ];
    for Pair { name, .. } in cases {
        dataloc::l(name);
    }
}
"#;
    assert_eq!(
        locate(source, "dataloc::l(", "p2"),
        Some(line_of(source, "\"p2\""))
    );
}
