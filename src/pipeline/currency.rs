use crate::core::constants::{currency, display};

/// Scale a value into K/M/B/T units.
///
/// The largest unit the magnitude reaches wins and gets one decimal place;
/// smaller values are rounded to a thousands-grouped integer. Missing and
/// non-finite values render as `N/A`.
///
/// # Examples
/// ```
/// use kpidash::pipeline::currency::format_currency;
///
/// assert_eq!(format_currency(Some(999.0)), "999");
/// assert_eq!(format_currency(Some(1_500.0)), "1.5 K");
/// assert_eq!(format_currency(Some(-4_000_000_000.0)), "-4.0 B");
/// assert_eq!(format_currency(None), "N/A");
/// ```
pub fn format_currency(value: Option<f64>) -> String {
    let Some(value) = value.filter(|v| v.is_finite()) else {
        return display::NOT_AVAILABLE.to_string();
    };

    let magnitude = value.abs();
    for (unit, suffix) in currency::UNITS {
        if magnitude >= unit {
            return format!("{:.1} {suffix}", value / unit);
        }
    }
    group_thousands(value, 0)
}

/// Format with `decimals` places and comma-separated thousands.
///
/// A value that rounds to zero never carries a minus sign.
pub fn group_thousands(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return display::NOT_AVAILABLE.to_string();
    }

    let fixed = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    if let Some(frac) = frac_part {
        grouped.push('.');
        grouped.push_str(frac);
    }

    let rounds_to_zero = fixed.chars().all(|c| c == '0' || c == '.');
    if value < 0.0 && !rounds_to_zero {
        format!("-{grouped}")
    } else {
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_currency_units() {
        assert_eq!(format_currency(Some(999.0)), "999");
        assert_eq!(format_currency(Some(1_500.0)), "1.5 K");
        assert_eq!(format_currency(Some(2_300_000.0)), "2.3 M");
        assert_eq!(format_currency(Some(-4_000_000_000.0)), "-4.0 B");
        assert_eq!(format_currency(Some(1_000_000_000_000.0)), "1.0 T");
        assert_eq!(format_currency(Some(1_000.0)), "1.0 K");
    }

    #[test]
    fn test_format_currency_small_and_zero() {
        assert_eq!(format_currency(Some(0.0)), "0");
        assert_eq!(format_currency(Some(-0.2)), "0");
        assert_eq!(format_currency(Some(-250.0)), "-250");
        assert_eq!(format_currency(Some(12.6)), "13");
    }

    #[test]
    fn test_format_currency_missing() {
        assert_eq!(format_currency(None), "N/A");
        assert_eq!(format_currency(Some(f64::NAN)), "N/A");
        assert_eq!(format_currency(Some(f64::INFINITY)), "N/A");
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(1_234_567.0, 0), "1,234,567");
        assert_eq!(group_thousands(1_234.56, 1), "1,234.6");
        assert_eq!(group_thousands(-98_765.4, 1), "-98,765.4");
        assert_eq!(group_thousands(100.0, 0), "100");
        assert_eq!(group_thousands(-0.04, 1), "0.0");
        assert_eq!(group_thousands(f64::NAN, 1), "N/A");
    }
}
