/// Format an `f64` as a TOML float literal.
/// Requirements:
/// - always contains a `.` or an exponent, so it never reads back as an integer
/// - shortest representation that parses back to the same value
/// - non-finite values use the `inf` / `nan` keywords
pub(crate) fn format_float(value: f64) -> String {
    if value.is_nan() {
        return String::from("nan");
    }
    if value.is_infinite() {
        return String::from(if value > 0.0 { "inf" } else { "-inf" });
    }
    let mut buf = ryu::Buffer::new();
    let raw = buf.format_finite(value);
    if raw.contains(['.', 'e', 'E']) {
        String::from(raw)
    } else {
        let mut out = String::with_capacity(raw.len() + 2);
        out.push_str(raw);
        out.push_str(".0");
        out
    }
}

/// True when the integer part of a numeric token starts with a zero that is
/// followed by another digit (`05`, `-012`, `00.5`).
pub(crate) fn has_forbidden_leading_zeros(token: &str) -> bool {
    let token = token.strip_prefix(['-', '+']).unwrap_or(token);
    let bytes = token.as_bytes();
    if bytes.len() <= 1 || bytes[0] != b'0' {
        return false;
    }
    // A single zero followed by '.', an exponent or the end is fine.
    bytes[1].is_ascii_digit() || bytes[1] == b'_'
}
