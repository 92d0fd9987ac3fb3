use std::path::PathBuf;

pub fn get_test_fixture_path(fixture_name: Option<&str>) -> PathBuf {
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures");
    match fixture_name {
        Some(name) => root.join(name),
        None => root,
    }
}

/// 1-based line of the first line of a fixture containing `marker`.
pub fn fixture_line(fixture_name: &str, marker: &str) -> usize {
    let source = std::fs::read_to_string(get_test_fixture_path(Some(fixture_name))).unwrap();
    source
        .lines()
        .position(|line| line.contains(marker))
        .map(|i| i + 1)
        .unwrap_or_else(|| panic!("marker {marker:?} not in {fixture_name}"))
}
