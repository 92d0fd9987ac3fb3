// Fixture for the CLI tests; not compiled.

struct Case {
    name: &'static str,
    input: &'static str,
    want: usize,
}

#[test]
fn lengths() {
    let cases = [
        Case { name: "empty", input: "", want: 0 },
        Case { name: "short", input: "ab", want: 2 },
        Case {
            name: "long",
            input: "abcdefgh",
            want: 8,
        },
    ];
    for tc in &cases {
        assert_eq!(tc.input.len(), tc.want, "{}", dataloc::l(tc.name));
    }
}

fn check(name: &str, got: usize, want: usize) {
    assert_eq!(got, want, "{}", dataloc::l3(name));
}

#[test]
fn through_helper() {
    for (name, input) in [("one", "1"), ("two", "22")] {
        check(name, input.len(), input.len());
    }
}
