//! Integer literals with C/Go-style base prefixes.

/// Parse an integer literal, choosing the base from its prefix.
///
/// Accepts an optional sign, then `0x`/`0X` (hex), `0b`/`0B` (binary),
/// `0o`/`0O` or a bare leading `0` (octal), or plain decimal digits.
pub fn parse_int_literal(text: &str) -> Option<i64> {
    let (negative, body) = match text.as_bytes().first()? {
        b'-' => (true, &text[1..]),
        b'+' => (false, &text[1..]),
        _ => (false, text),
    };

    let (radix, digits) = if let Some(rest) = strip_prefix_ci(body, "0x") {
        (16, rest)
    } else if let Some(rest) = strip_prefix_ci(body, "0b") {
        (2, rest)
    } else if let Some(rest) = strip_prefix_ci(body, "0o") {
        (8, rest)
    } else if body.len() > 1 && body.starts_with('0') {
        (8, &body[1..])
    } else {
        (10, body)
    };

    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    let value = i64::from_str_radix(digits, radix).ok()?;
    Some(if negative { -value } else { value })
}

/// Parse an address literal that must fit in 16 bits.
pub fn parse_address(text: &str) -> Option<u16> {
    parse_int_literal(text).and_then(|value| u16::try_from(value).ok())
}

fn strip_prefix_ci<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let head = text.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        Some(&text[prefix.len()..])
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_int_literal_bases() {
        assert_eq!(parse_int_literal("42"), Some(42));
        assert_eq!(parse_int_literal("0x2A"), Some(42));
        assert_eq!(parse_int_literal("0X2a"), Some(42));
        assert_eq!(parse_int_literal("0b101010"), Some(42));
        assert_eq!(parse_int_literal("0o52"), Some(42));
        assert_eq!(parse_int_literal("052"), Some(42));
        assert_eq!(parse_int_literal("0"), Some(0));
    }

    #[test]
    fn test_parse_int_literal_sign() {
        assert_eq!(parse_int_literal("-0x10"), Some(-16));
        assert_eq!(parse_int_literal("+7"), Some(7));
    }

    #[test]
    fn test_parse_int_literal_rejects_garbage() {
        assert_eq!(parse_int_literal(""), None);
        assert_eq!(parse_int_literal("0x"), None);
        assert_eq!(parse_int_literal("w0"), None);
        assert_eq!(parse_int_literal("09"), None);
        assert_eq!(parse_int_literal("--1"), None);
        assert_eq!(parse_int_literal("lit(3)"), None);
    }

    #[test]
    fn test_parse_address_range() {
        assert_eq!(parse_address("0xFFFF"), Some(0xFFFF));
        assert_eq!(parse_address("0x10000"), None);
        assert_eq!(parse_address("-1"), None);
    }
}
