mod string;

pub use string::{extract_last_segment, quote_str, raw_string_body, unquote_string};
