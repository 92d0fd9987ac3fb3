//! Mapping table tests: `HashMap::from([(key, value), ..])` and friends

use super::test_utils::{line_of, locate};

#[test]
fn test_hash_map_keys() {
    let source = r#"
use std::collections::HashMap;

#[test]
fn lengths() {
    let cases = HashMap::from([
        ("empty", 0),
        ("abc", 3),
    ]);
    for (name, want) in &cases {
        assert_eq!(name.len(), *want, "{}", dataloc::l(name));
    }
}
"#;
    assert_eq!(
        locate(source, "dataloc::l(", "abc"),
        Some(line_of(source, "(\"abc\""))
    );
    assert_eq!(
        locate(source, "dataloc::l(", "empty"),
        Some(line_of(source, "(\"empty\""))
    );
    assert_eq!(locate(source, "dataloc::l(", "3"), None);
}

#[test]
fn test_btree_map_with_struct_values() {
    let source = r#"
use std::collections::BTreeMap;

struct Want { len: usize }

#[test]
fn ordered() {
    let cases: BTreeMap<&str, Want> = BTreeMap::from([
        ("one", Want { len: 1 }),
        ("two", Want { len: 2 }),
    ]);
    for (name, want) in cases.iter() {
        assert_eq!(name.len(), want.len, "{}", dataloc::l(name));
    }
}
"#;
    assert_eq!(
        locate(source, "dataloc::l(", "two"),
        Some(line_of(source, "(\"two\""))
    );
}

#[test]
fn test_map_from_vec_literal() {
    let source = r#"
use std::collections::HashMap;

#[test]
fn from_vec() {
    let cases: HashMap<String, i32> = HashMap::from_iter(vec![
        ("neg".to_string(), -1),
        ("pos".to_string(), 1),
    ]);
    for (name, _) in &cases {
        dataloc::l(name);
    }
}
"#;
    assert_eq!(
        locate(source, "dataloc::l(", "pos"),
        Some(line_of(source, "\"pos\""))
    );
}

#[test]
fn test_non_map_constructor_is_not_a_table() {
    let source = r#"
#[test]
fn not_a_map() {
    let cases = Vec::from([("a", 1)]);
    for (name, _) in cases {
        dataloc::l(name);
    }
}
"#;
    assert_eq!(locate(source, "dataloc::l(", "a"), None);
}
