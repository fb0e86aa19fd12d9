//! Run duration defaults and lenient parsing.

/// Duration used when `play` is given nothing usable.
pub const DEFAULT_DURATION_MS: u64 = 500;

/// Resolve a requested duration; missing or zero falls back to [`DEFAULT_DURATION_MS`].
#[inline]
pub fn normalize_duration(requested: Option<u64>) -> u64 {
    match requested {
        Some(ms) if ms > 0 => ms,
        _ => DEFAULT_DURATION_MS,
    }
}

/// Read a duration from loosely formatted text.
///
/// Leading whitespace and a `+` sign are skipped, then the leading integer is used
/// (`"750ms"` → 750, `"12.9"` → 12). Text without a positive leading integer yields
/// the default.
pub fn parse_duration(text: &str) -> u64 {
    let trimmed = text.trim_start();
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let end = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    let digits = &unsigned[..end];
    if digits.is_empty() {
        return DEFAULT_DURATION_MS;
    }
    let ms = digits.parse::<u64>().unwrap_or(u64::MAX);
    normalize_duration(Some(ms))
}

/// Convert a floating point duration, truncating toward zero.
///
/// Non-finite or non-positive values yield the default.
pub fn duration_from_f64(ms: f64) -> u64 {
    if ms.is_finite() && ms >= 1.0 {
        normalize_duration(Some(ms.trunc().min(u64::MAX as f64) as u64))
    } else {
        DEFAULT_DURATION_MS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_and_zero_use_default() {
        assert_eq!(normalize_duration(None), 500);
        assert_eq!(normalize_duration(Some(0)), 500);
        assert_eq!(normalize_duration(Some(1200)), 1200);
    }

    #[test]
    fn text_uses_leading_integer() {
        assert_eq!(parse_duration("750"), 750);
        assert_eq!(parse_duration("  750ms"), 750);
        assert_eq!(parse_duration("+40"), 40);
        assert_eq!(parse_duration("12.9"), 12);
        assert_eq!(parse_duration("fast"), 500);
        assert_eq!(parse_duration("-300"), 500);
        assert_eq!(parse_duration("0"), 500);
        assert_eq!(parse_duration(""), 500);
    }

    #[test]
    fn floats_truncate() {
        assert_eq!(duration_from_f64(999.9), 999);
        assert_eq!(duration_from_f64(0.5), 500);
        assert_eq!(duration_from_f64(f64::NAN), 500);
        assert_eq!(duration_from_f64(-10.0), 500);
    }
}
