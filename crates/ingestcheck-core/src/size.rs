//! Byte size parsing and human-readable rendering
//!
//! Quotas are given as size literals such as `7TB` and parsed with binary
//! multipliers (1 KB = 1024 bytes). Reported sizes are rendered with SI
//! units (1 kB = 1000 bytes), rounded to one decimal.

use std::fmt;

const SI_UNITS: [&str; 7] = ["B", "kB", "MB", "GB", "TB", "PB", "EB"];

/// Parse a human size literal into bytes
///
/// Accepts an unsigned integer followed by an optional unit, case-insensitive,
/// with optional whitespace in between. Returns `0` for anything that does not
/// parse or does not fit in a `u64`.
///
/// # Examples
/// ```
/// use ingestcheck_core::size::parse_human_size;
///
/// assert_eq!(parse_human_size("7TB"), 7 * (1u64 << 40));
/// assert_eq!(parse_human_size("512 mb"), 512 * (1u64 << 20));
/// assert_eq!(parse_human_size("lots"), 0);
/// ```
pub fn parse_human_size(input: &str) -> u64 {
    let input = input.trim();
    let digits_end = input
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(input.len());
    if digits_end == 0 {
        return 0;
    }

    let Ok(value) = input[..digits_end].parse::<u64>() else {
        return 0;
    };
    let unit = input[digits_end..].trim_start().to_ascii_lowercase();
    let Some(shift) = unit_shift(&unit) else {
        return 0;
    };

    value.checked_mul(1u64 << shift).unwrap_or(0)
}

/// Power-of-two shift for a lowercase unit name
fn unit_shift(unit: &str) -> Option<u32> {
    let shift = match unit {
        "" | "b" | "byte" | "bytes" => 0,
        "k" | "kb" | "kilo" | "kilobyte" | "kilobytes" => 10,
        "m" | "mb" | "mega" | "megabyte" | "megabytes" => 20,
        "g" | "gb" | "giga" | "gigabyte" | "gigabytes" => 30,
        "t" | "tb" | "tera" | "terabyte" | "terabytes" => 40,
        "p" | "pb" | "peta" | "petabyte" | "petabytes" => 50,
        "e" | "eb" | "exa" | "exabyte" | "exabytes" => 60,
        _ => return None,
    };
    Some(shift)
}

/// A byte count scaled to an SI unit
///
/// Ordering by `(unit_index, value)` follows the ordering of the underlying
/// byte counts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HumanSize {
    /// Mantissa rounded to one decimal
    pub value: f64,
    /// Index into `B, kB, MB, GB, TB, PB, EB`
    pub unit_index: usize,
}

impl HumanSize {
    /// Scale a byte count
    pub fn from_bytes(bytes: u64) -> Self {
        if bytes < 10 {
            return Self {
                value: bytes as f64,
                unit_index: 0,
            };
        }

        let mut unit_index = 0;
        let mut divisor = 1u64;
        while unit_index + 1 < SI_UNITS.len() && bytes / divisor >= 1000 {
            divisor *= 1000;
            unit_index += 1;
        }

        let scaled = bytes as f64 / divisor as f64;
        Self {
            value: (scaled * 10.0 + 0.5).floor() / 10.0,
            unit_index,
        }
    }

    /// Unit suffix
    pub fn unit(&self) -> &'static str {
        SI_UNITS[self.unit_index]
    }
}

impl fmt::Display for HumanSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.unit_index > 0 && self.value < 10.0 {
            write!(f, "{:.1} {}", self.value, self.unit())
        } else {
            write!(f, "{:.0} {}", self.value, self.unit())
        }
    }
}

/// Render a byte count with SI units
///
/// # Examples
/// ```
/// use ingestcheck_core::size::humanize_bytes;
///
/// assert_eq!(humanize_bytes(9), "9 B");
/// assert_eq!(humanize_bytes(1_073_741_824), "1.1 GB");
/// ```
pub fn humanize_bytes(bytes: u64) -> String {
    HumanSize::from_bytes(bytes).to_string()
}

/// Format a number with thousands separators
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);

    for (count, ch) in s.chars().rev().enumerate() {
        if count > 0 && count % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }

    result.chars().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_units() {
        assert_eq!(parse_human_size("100"), 100);
        assert_eq!(parse_human_size("100B"), 100);
        assert_eq!(parse_human_size("1KB"), 1024);
        assert_eq!(parse_human_size("1k"), 1024);
        assert_eq!(parse_human_size("3MB"), 3 * 1024 * 1024);
        assert_eq!(parse_human_size("2GB"), 2 * 1024 * 1024 * 1024);
        assert_eq!(parse_human_size("7TB"), 7_696_581_394_432);
        assert_eq!(parse_human_size("1 petabyte"), 1 << 50);
        assert_eq!(parse_human_size("1EB"), 1 << 60);
    }

    #[test]
    fn test_parse_is_case_and_space_tolerant() {
        assert_eq!(parse_human_size("  7tb "), parse_human_size("7TB"));
        assert_eq!(parse_human_size("7 Tb"), parse_human_size("7TB"));
        assert_eq!(parse_human_size("5 Gigabytes"), 5 << 30);
    }

    #[test]
    fn test_parse_failures_yield_zero() {
        assert_eq!(parse_human_size(""), 0);
        assert_eq!(parse_human_size("TB"), 0);
        assert_eq!(parse_human_size("7XB"), 0);
        assert_eq!(parse_human_size("-7TB"), 0);
        assert_eq!(parse_human_size("7.5TB"), 0);
        assert_eq!(parse_human_size("7TB extra"), 0);
    }

    #[test]
    fn test_parse_overflow_yields_zero() {
        assert_eq!(parse_human_size("16EB"), 0);
        assert_eq!(parse_human_size("99999999999999999999"), 0);
    }

    #[test]
    fn test_humanize_small_values() {
        assert_eq!(humanize_bytes(0), "0 B");
        assert_eq!(humanize_bytes(9), "9 B");
        assert_eq!(humanize_bytes(10), "10 B");
        assert_eq!(humanize_bytes(999), "999 B");
    }

    #[test]
    fn test_humanize_scaled_values() {
        assert_eq!(humanize_bytes(1000), "1.0 kB");
        assert_eq!(humanize_bytes(1500), "1.5 kB");
        assert_eq!(humanize_bytes(82_854_982), "83 MB");
        assert_eq!(humanize_bytes(1_073_741_824), "1.1 GB");
        assert_eq!(humanize_bytes(5_000_000_000), "5.0 GB");
        assert_eq!(humanize_bytes(7_696_581_394_432), "7.7 TB");
        assert_eq!(humanize_bytes(u64::MAX), "18 EB");
    }

    #[test]
    fn test_humanize_rounding_at_unit_edge() {
        assert_eq!(humanize_bytes(999_999), "1000 kB");
        assert_eq!(humanize_bytes(1_000_000), "1.0 MB");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(1_073_741_824), "1,073,741,824");
    }

    proptest! {
        #[test]
        fn prop_humanize_is_monotonic(a in any::<u64>(), b in any::<u64>()) {
            let (small, large) = if a <= b { (a, b) } else { (b, a) };
            let s = HumanSize::from_bytes(small);
            let l = HumanSize::from_bytes(large);
            prop_assert!(
                s.unit_index < l.unit_index
                    || (s.unit_index == l.unit_index && s.value <= l.value),
                "{} bytes -> {} but {} bytes -> {}", small, s, large, l
            );
        }

        #[test]
        fn prop_parse_plain_bytes(n in any::<u64>()) {
            prop_assert_eq!(parse_human_size(&n.to_string()), n);
        }
    }
}
