/// Renders `s` the way a Rust string literal token for it is written.
pub fn quote_str(s: &str) -> String {
    format!("{s:?}")
}

/// Returns the body of a raw string token (`r"..."`, `r#"..."#`), which is
/// the literal's value byte for byte.
pub fn raw_string_body(token: &str) -> Option<&str> {
    let rest = token.strip_prefix('r')?;
    let hashes = rest.len() - rest.trim_start_matches('#').len();
    let rest = &rest[hashes..];
    let inner = rest.strip_prefix('"')?;
    let inner = inner.strip_suffix(&"#".repeat(hashes))?;
    inner.strip_suffix('"')
}

/// Decodes a string literal token into its value. Returns `None` for tokens
/// that are not plain or raw string literals, or carry malformed escapes.
pub fn unquote_string(token: &str) -> Option<String> {
    let token = token.trim();
    if let Some(body) = raw_string_body(token) {
        return Some(body.to_string());
    }

    let body = token.strip_prefix('"')?.strip_suffix('"')?;
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next()? {
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            '0' => out.push('\0'),
            '\\' => out.push('\\'),
            '\'' => out.push('\''),
            '"' => out.push('"'),
            'x' => {
                let hex: String = [chars.next()?, chars.next()?].iter().collect();
                let byte = u8::from_str_radix(&hex, 16).ok()?;
                if !byte.is_ascii() {
                    return None;
                }
                out.push(byte as char);
            }
            'u' => {
                if chars.next()? != '{' {
                    return None;
                }
                let mut hex = String::new();
                loop {
                    match chars.next()? {
                        '}' => break,
                        '_' => {}
                        h => hex.push(h),
                    }
                }
                out.push(char::from_u32(u32::from_str_radix(&hex, 16).ok()?)?);
            }
            '\n' => {
                while chars.peek().is_some_and(|c| c.is_whitespace()) {
                    chars.next();
                }
            }
            _ => return None,
        }
    }

    Some(out)
}

pub fn extract_last_segment(path: &str) -> String {
    path.rsplit(['/', '.', ':'])
        .next()
        .unwrap_or(path)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_plain() {
        assert_eq!(quote_str("hello"), "\"hello\"");
    }

    #[test]
    fn test_quote_escapes() {
        assert_eq!(quote_str("a \"b\"\n"), r#""a \"b\"\n""#);
        assert_eq!(quote_str("back\\slash"), r#""back\\slash""#);
    }

    #[test]
    fn test_quote_keeps_single_quote_and_unicode() {
        assert_eq!(quote_str("it's ü"), "\"it's ü\"");
    }

    #[test]
    fn test_raw_string_body() {
        assert_eq!(raw_string_body(r#"r"plain""#), Some("plain"));
        assert_eq!(raw_string_body(r##"r#"with "quotes""#"##), Some("with \"quotes\""));
        assert_eq!(raw_string_body("\"not raw\""), None);
    }

    #[test]
    fn test_unquote_escapes() {
        assert_eq!(unquote_string(r#""a\tb\n""#).as_deref(), Some("a\tb\n"));
        assert_eq!(unquote_string(r#""\x41\u{1F600}""#).as_deref(), Some("A😀"));
        assert_eq!(unquote_string(r#""say \"hi\"""#).as_deref(), Some("say \"hi\""));
    }

    #[test]
    fn test_unquote_rejects_non_ascii_byte_escapes() {
        assert_eq!(unquote_string(r#""\x7F""#).as_deref(), Some("\x7F"));
        assert_eq!(unquote_string(r#""\x80""#), None);
        assert_eq!(unquote_string(r#""\xFF""#), None);
    }

    #[test]
    fn test_unquote_line_continuation() {
        assert_eq!(unquote_string("\"one \\\n    two\"").as_deref(), Some("one two"));
    }

    #[test]
    fn test_unquote_rejects_non_strings() {
        assert_eq!(unquote_string("42"), None);
        assert_eq!(unquote_string("'c'"), None);
        assert_eq!(unquote_string(r#""bad \q""#), None);
    }

    #[test]
    fn test_extract_last_segment_double_colon() {
        assert_eq!(extract_last_segment("dataloc::l"), "l");
        assert_eq!(extract_last_segment("std::collections::HashMap"), "HashMap");
    }

    #[test]
    fn test_extract_last_segment_simple() {
        assert_eq!(extract_last_segment("at"), "at");
    }
}
