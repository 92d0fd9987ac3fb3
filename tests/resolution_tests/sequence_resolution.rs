//! Sequence table tests: arrays, slices and `vec![]` literals

use super::test_utils::{line_of, locate};
use pretty_assertions::assert_eq;

const STRUCT_TABLE: &str = r#"
struct Case {
    name: &'static str,
    input: i32,
    want: i32,
}

#[test]
fn double() {
    let cases = vec![
        Case { name: "zero", input: 0, want: 0 },
        Case { name: "one", input: 1, want: 2 },
        Case {
            name: "negative",
            input: -3,
            want: -6,
        },
    ];
    for tc in cases {
        assert_eq!(tc.input * 2, tc.want, "{}", dataloc::l(tc.name));
    }
}
"#;

#[test]
fn test_struct_entries_by_selector() {
    assert_eq!(
        locate(STRUCT_TABLE, "dataloc::l(", "zero"),
        Some(line_of(STRUCT_TABLE, "\"zero\""))
    );
    assert_eq!(
        locate(STRUCT_TABLE, "dataloc::l(", "one"),
        Some(line_of(STRUCT_TABLE, "\"one\""))
    );
}

#[test]
fn test_multiline_entry_reports_its_first_line() {
    let entry_start = line_of(STRUCT_TABLE, "\"negative\"") - 1;
    assert_eq!(locate(STRUCT_TABLE, "dataloc::l(", "negative"), Some(entry_start));
}

#[test]
fn test_missing_key() {
    assert_eq!(locate(STRUCT_TABLE, "dataloc::l(", "two"), None);
    assert_eq!(locate(STRUCT_TABLE, "dataloc::l(", "\"zero\""), None);
}

#[test]
fn test_lookup_is_idempotent() {
    let first = locate(STRUCT_TABLE, "dataloc::l(", "one");
    let second = locate(STRUCT_TABLE, "dataloc::l(", "one");
    assert_eq!(first, second);
}

#[test]
fn test_every_entry_round_trips() {
    for key in ["zero", "one"] {
        let want = line_of(STRUCT_TABLE, &format!("{key:?}"));
        assert_eq!(locate(STRUCT_TABLE, "dataloc::l(", key), Some(want), "{key}");
    }
}

#[test]
fn test_string_conversions_in_entries() {
    let source = r#"
struct Case { name: String, want: bool }

#[test]
fn conversions() {
    let cases = [
        Case { name: "plain".to_string(), want: true },
        Case { name: String::from("from"), want: true },
        Case { name: "owned".to_owned(), want: false },
        Case { name: "into".into(), want: false },
    ];
    for tc in &cases {
        check(tc.want, dataloc::l(&tc.name));
    }
}
"#;
    for key in ["plain", "from", "owned", "into"] {
        assert_eq!(
            locate(source, "dataloc::l(", key),
            Some(line_of(source, &format!("{key:?}"))),
            "{key}"
        );
    }
}

#[test]
fn test_escaped_and_raw_keys() {
    let source = r##"
struct Case { name: &'static str }

#[test]
fn escapes() {
    let cases = [
        Case { name: "say \"hi\"" },
        Case { name: r"c:\temp" },
        Case { name: "tab\there" },
    ];
    for tc in cases.iter() {
        dataloc::l(tc.name);
    }
}
"##;
    assert_eq!(
        locate(source, "dataloc::l(", "say \"hi\""),
        Some(line_of(source, "say \\\"hi"))
    );
    assert_eq!(
        locate(source, "dataloc::l(", "c:\\temp"),
        Some(line_of(source, "c:\\temp"))
    );
    assert_eq!(
        locate(source, "dataloc::l(", "tab\there"),
        Some(line_of(source, "tab\\there"))
    );
}

#[test]
fn test_bare_value_over_string_array() {
    let source = r#"
#[test]
fn names() {
    for name in ["alpha", "beta"] {
        println!("{}", dataloc::at(name));
    }
}
"#;
    assert_eq!(
        locate(source, "dataloc::at(", "beta"),
        Some(line_of(source, "\"beta\""))
    );
}

#[test]
fn test_tuple_destructuring() {
    let source = r#"
#[test]
fn tuples() {
    let cases = [
        ("empty", "", 0),
        ("word", "abc", 3),
    ];
    for (name, input, want) in cases {
        assert_eq!(input.len(), want, "{}", dataloc::l(name));
    }
}
"#;
    assert_eq!(
        locate(source, "dataloc::l(", "word"),
        Some(line_of(source, "\"word\""))
    );
}

#[test]
fn test_struct_pattern_in_loop() {
    let source = r#"
struct Case { name: &'static str, want: u8 }

#[test]
fn destructured() {
    let cases = &[
        Case { name: "a", want: 1 },
        Case { name: "b", want: 2 },
    ];
    for Case { name, want } in cases {
        assert!(*want > 0, "{}", dataloc::l(name));
    }
}
"#;
    assert_eq!(
        locate(source, "dataloc::l(", "b"),
        Some(line_of(source, "\"b\""))
    );
}

#[test]
fn test_nested_selector_chain() {
    let source = r#"
struct Meta { name: &'static str }
struct Case { meta: Meta, want: u8 }

#[test]
fn nested() {
    let cases = [
        Case { meta: Meta { name: "inner-a" }, want: 1 },
        Case { meta: Meta { name: "inner-b" }, want: 2 },
    ];
    for tc in cases {
        dataloc::l(tc.meta.name);
    }
}
"#;
    assert_eq!(
        locate(source, "dataloc::l(", "inner-b"),
        Some(line_of(source, "\"inner-b\""))
    );
}

#[test]
fn test_enumerated_loop() {
    let source = r#"
struct Case { name: &'static str }

#[test]
fn enumerated() {
    let cases = vec![Case { name: "first" }, Case { name: "second" }];
    for (i, tc) in cases.iter().enumerate() {
        assert!(i < 2, "{}", dataloc::l(tc.name));
    }
}
"#;
    assert_eq!(
        locate(source, "dataloc::l(", "second"),
        Some(line_of(source, "\"second\""))
    );
}

#[test]
fn test_module_level_const_table() {
    let source = r#"
struct Case { name: &'static str, want: u8 }

const CASES: &[Case] = &[
    Case { name: "const-a", want: 1 },
    Case { name: "const-b", want: 2 },
];

#[test]
fn from_const() {
    for tc in CASES {
        dataloc::l(tc.name);
    }
}
"#;
    assert_eq!(
        locate(source, "dataloc::l(", "const-b"),
        Some(line_of(source, "\"const-b\""))
    );
}

#[test]
fn test_table_through_another_variable() {
    let source = r#"
#[test]
fn aliased() {
    let table = ["x", "y"];
    let cases = table.to_vec();
    for name in cases.into_iter() {
        dataloc::l(name);
    }
}
"#;
    assert_eq!(
        locate(source, "dataloc::l(", "y"),
        Some(line_of(source, "let table"))
    );
}

#[test]
fn test_shadowed_table() {
    let source = r#"
#[test]
fn shadowed() {
    let cases = ["outer"];
    {
        let cases = ["inner"];
        for name in cases {
            dataloc::l(name);
        }
    }
    for name in cases {
        dataloc::at(name);
    }
}
"#;
    assert_eq!(locate(source, "dataloc::l(", "outer"), None);
    assert_eq!(
        locate(source, "dataloc::l(", "inner"),
        Some(line_of(source, "[\"inner\"]"))
    );
    assert_eq!(
        locate(source, "dataloc::at(", "outer"),
        Some(line_of(source, "[\"outer\"]"))
    );
}

#[test]
fn test_reassigned_table() {
    let source = r#"
#[test]
fn reassigned() {
    let mut cases = vec!["old"];
    cases = vec!["new"];
    for name in &cases {
        dataloc::l(name);
    }
}
"#;
    assert_eq!(locate(source, "dataloc::l(", "old"), None);
    assert_eq!(
        locate(source, "dataloc::l(", "new"),
        Some(line_of(source, "[\"new\"]"))
    );
}

#[test]
fn test_lookup_inside_closure() {
    let source = r#"
#[test]
fn closure() {
    let cases = ["c1", "c2"];
    cases.iter().for_each(|name| {
        let _ = name;
    });
    for name in cases {
        std::thread::spawn(move || dataloc::l(name)).join().unwrap();
    }
}
"#;
    assert_eq!(
        locate(source, "dataloc::l(", "c2"),
        Some(line_of(source, "\"c2\""))
    );
}
