use std::fmt::Write;

/// Escape text for element content and attribute values.
pub(crate) fn xml_escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            other => out.push(other),
        }
    }
    out
}

/// Shortest round-trip rendering of a number, with negative zero folded to `0`.
pub(crate) fn number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    let mut out = String::new();
    let _ = write!(out, "{value}");
    out
}

/// Number rounded to three fractional digits, as used for path coordinates.
pub(crate) fn coordinate(value: f64) -> String {
    number((value * 1000.0).round() / 1000.0)
}
