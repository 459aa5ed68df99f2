//! Parsing of the block offset argument.

/// Parses an unsigned 64-bit block number.
///
/// Accepts plain decimal numbers as well as `0x`, `0o` and `0b` prefixed literals, and a leading
/// `0` for octal. Digits may be separated by single `_`, and prefixed forms may also put one
/// right after the prefix.
pub fn parse_block_offset(input: &str) -> Result<u64, String> {
    parse_literal(input).map_err(|reason| format!("unable to parse block offset `{input}`: {reason}"))
}

fn parse_literal(input: &str) -> Result<u64, &'static str> {
    let lower = input.to_ascii_lowercase();
    let (radix, digits, prefixed) = if let Some(rest) = lower.strip_prefix("0x") {
        (16, rest, true)
    } else if let Some(rest) = lower.strip_prefix("0o") {
        (8, rest, true)
    } else if let Some(rest) = lower.strip_prefix("0b") {
        (2, rest, true)
    } else if lower.len() > 1 && lower.starts_with('0') {
        (8, &lower[1..], true)
    } else {
        (10, lower.as_str(), false)
    };

    if digits.contains('_')
        && ((!prefixed && digits.starts_with('_'))
            || digits.ends_with('_')
            || digits.contains("__"))
    {
        return Err("misplaced digit separator");
    }

    let digits: String = digits.chars().filter(|c| *c != '_').collect();
    if digits.is_empty() {
        return Err("missing digits");
    }
    if !digits.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err("invalid digit");
    }

    u64::from_str_radix(&digits, radix).map_err(|err| match err.kind() {
        std::num::IntErrorKind::PosOverflow => "value out of range",
        _ => "invalid digit",
    })
}
