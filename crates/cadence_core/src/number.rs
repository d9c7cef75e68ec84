//! Number parsing and formatting helpers
//!
//! Animated values arrive as CSS-like strings (`"100px"`, `"-45deg"`, `"0.5"`)
//! and leave as fixed-decimal strings.

/// Parse the leading floating-point number of a string
///
/// Leading whitespace is skipped, then an optional sign, digits, an optional
/// fraction and an optional exponent are consumed. Anything after the number
/// (a unit, for instance) is ignored. Returns `None` when no digits are found.
///
/// ```rust
/// use cadence_core::parse_leading_f64;
///
/// assert_eq!(parse_leading_f64("100px"), Some(100.0));
/// assert_eq!(parse_leading_f64("-12.5%"), Some(-12.5));
/// assert_eq!(parse_leading_f64("deg"), None);
/// ```
pub fn parse_leading_f64(input: &str) -> Option<f64> {
    let s = input.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }

    if digits == 0 {
        return None;
    }

    // Exponent only counts when followed by at least one digit
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse().ok()
}

/// Format a value with a fixed number of decimals
///
/// Ties round away from zero and negative zero prints as zero, so
/// `format_fixed(-0.001, 2)` is `"0.00"` and `format_fixed(0.125, 2)` is `"0.13"`.
pub fn format_fixed(value: f64, decimals: u32) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let scale = 10f64.powi(decimals as i32);
    // + 0.0 turns -0.0 into 0.0
    let rounded = (value * scale).round() / scale + 0.0;
    format!("{:.*}", decimals as usize, rounded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_numbers() {
        assert_eq!(parse_leading_f64("0"), Some(0.0));
        assert_eq!(parse_leading_f64("1"), Some(1.0));
        assert_eq!(parse_leading_f64("  42"), Some(42.0));
        assert_eq!(parse_leading_f64(".5"), Some(0.5));
        assert_eq!(parse_leading_f64("5."), Some(5.0));
        assert_eq!(parse_leading_f64("+3"), Some(3.0));
    }

    #[test]
    fn test_parse_with_units() {
        assert_eq!(parse_leading_f64("100px"), Some(100.0));
        assert_eq!(parse_leading_f64("-100%"), Some(-100.0));
        assert_eq!(parse_leading_f64("360deg"), Some(360.0));
        assert_eq!(parse_leading_f64("1.5em"), Some(1.5));
    }

    #[test]
    fn test_parse_exponent() {
        assert_eq!(parse_leading_f64("1e3px"), Some(1000.0));
        // A dangling exponent marker is part of the unit
        assert_eq!(parse_leading_f64("2em"), Some(2.0));
        assert_eq!(parse_leading_f64("2e-1"), Some(0.2));
    }

    #[test]
    fn test_parse_rejects_non_numbers() {
        assert_eq!(parse_leading_f64(""), None);
        assert_eq!(parse_leading_f64("px"), None);
        assert_eq!(parse_leading_f64("-"), None);
        assert_eq!(parse_leading_f64("."), None);
        assert_eq!(parse_leading_f64("current"), None);
    }

    #[test]
    fn test_format_fixed() {
        assert_eq!(format_fixed(0.0, 2), "0.00");
        assert_eq!(format_fixed(100.0, 2), "100.00");
        assert_eq!(format_fixed(0.125, 2), "0.13");
        assert_eq!(format_fixed(-12.344, 2), "-12.34");
        assert_eq!(format_fixed(127.5, 0), "128");
        assert_eq!(format_fixed(0.75, 1), "0.8");
    }

    #[test]
    fn test_format_fixed_negative_zero() {
        assert_eq!(format_fixed(-0.0, 2), "0.00");
        assert_eq!(format_fixed(-0.001, 2), "0.00");
    }
}
