//! Shared test helpers for entry resolution tests

use dataloc::Locator;

/// 1-based line of the first source line containing `marker`.
pub fn line_of(source: &str, marker: &str) -> usize {
    source
        .lines()
        .position(|line| line.contains(marker))
        .map(|i| i + 1)
        .unwrap_or_else(|| panic!("marker {marker:?} not found"))
}

/// Entry line for `key`, looked up from the call on the line holding
/// `call_marker`.
pub fn locate(source: &str, call_marker: &str, key: &str) -> Option<usize> {
    locate_with(&Locator::new(), source, call_marker, key)
}

pub fn locate_with(
    locator: &Locator,
    source: &str,
    call_marker: &str,
    key: &str,
) -> Option<usize> {
    locator
        .locate_source("case_test.rs", source, line_of(source, call_marker), key)
        .unwrap()
        .map(|position| {
            assert_eq!(position.file, "case_test.rs");
            position.line
        })
}
