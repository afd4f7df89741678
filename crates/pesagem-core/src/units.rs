//! # Units Module
//!
//! Conversion between what the operator types (kilograms, pt-BR strings)
//! and what the rules compare (grams).
//!
//! ## Where Each Unit Lives
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Operator input         Rules / backend            Display             │
//! │  ──────────────         ───────────────            ───────             │
//! │  "1.234,500" (kg) ──►   1_234_500 g   ──────────►  "1.234.500 g"       │
//! │                             │                                           │
//! │                             └──► payload: 1234.5 (kg, 3 decimals)      │
//! │                                                                         │
//! │  pt-BR: "." groups thousands, "," separates decimals                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use pesagem_core::units::{parse_decimal, kg_to_grams, format_grams};
//!
//! let kg = parse_decimal("1.234,5");
//! assert_eq!(kg, 1234.5);
//! assert_eq!(kg_to_grams(kg), 1_234_500);
//! assert_eq!(format_grams(1234.0), "1.234 g");
//! ```

use crate::error::ValidationError;
use crate::{KG_DECIMALS, KG_IN_G};

// =============================================================================
// Parsing
// =============================================================================

/// Parses a pt-BR decimal string permissively.
///
/// ## Rules
/// 1. All whitespace is removed
/// 2. Every `.` is dropped (thousands separator)
/// 3. The first `,` becomes the decimal point
/// 4. Anything that still isn't a finite number yields `0.0`
///
/// Never fails: partial input such as `"12,"` is normal while typing.
///
/// ## Example
/// ```rust
/// use pesagem_core::units::parse_decimal;
///
/// assert_eq!(parse_decimal("1.234,500"), 1234.5);
/// assert_eq!(parse_decimal("0,5"), 0.5);
/// assert_eq!(parse_decimal(""), 0.0);
/// assert_eq!(parse_decimal("abc"), 0.0);
/// ```
pub fn parse_decimal(input: &str) -> f64 {
    let compact: String = input
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '.')
        .collect();
    if compact.is_empty() {
        return 0.0;
    }

    let normalized = compact.replacen(',', ".", 1);
    normalized
        .parse::<f64>()
        .map(decimal_or_zero)
        .unwrap_or(0.0)
}

/// Passes a numeric input through, mapping NaN and infinities to zero.
#[inline]
pub fn decimal_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Parses a pt-BR decimal string, rejecting anything malformed.
///
/// Accepted shape: optional sign, digits, optionally `,` followed by at
/// least one digit. Grouped integers use `.` between groups of three
/// (`1.234.567`), the leading group holding one to three digits.
///
/// ## Example
/// ```rust
/// use pesagem_core::units::parse_decimal_strict;
///
/// assert_eq!(parse_decimal_strict("liquido", "1.234,5").unwrap(), 1234.5);
/// assert!(parse_decimal_strict("liquido", "12,").is_err());
/// assert!(parse_decimal_strict("liquido", "1.5").is_err());
/// assert!(parse_decimal_strict("liquido", "").is_err());
/// ```
pub fn parse_decimal_strict(field: &str, input: &str) -> Result<f64, ValidationError> {
    let invalid = || ValidationError::InvalidNumber {
        field: field.to_string(),
        input: input.to_string(),
    };

    let compact: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    let unsigned = compact
        .strip_prefix('-')
        .or_else(|| compact.strip_prefix('+'))
        .unwrap_or(&compact);

    let (integer, fraction) = match unsigned.split_once(',') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (unsigned, None),
    };

    let digits = |group: &str| !group.is_empty() && group.chars().all(|c| c.is_ascii_digit());
    let mut groups = integer.split('.');
    let first = groups.next().unwrap_or_default();
    let rest: Vec<&str> = groups.collect();
    let integer_ok = digits(first)
        && (rest.is_empty()
            || (first.len() <= 3 && rest.iter().all(|g| g.len() == 3 && digits(*g))));
    let fraction_ok = fraction
        .map(|f| !f.is_empty() && f.chars().all(|c| c.is_ascii_digit()))
        .unwrap_or(true);

    if !integer_ok || !fraction_ok {
        return Err(invalid());
    }

    Ok(parse_decimal(&compact))
}

/// Strategy for turning a raw form field into a number.
///
/// The live form uses [`LenientParser`] so half-typed input never flickers
/// into an error; a submission boundary that wants hard failures can pass
/// [`StrictParser`] to the validator instead.
pub trait DecimalParser {
    /// Parses `input` for the form field named `field`.
    fn parse(&self, field: &str, input: &str) -> Result<f64, ValidationError>;
}

/// Permissive parser: malformed input is zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct LenientParser;

impl DecimalParser for LenientParser {
    fn parse(&self, _field: &str, input: &str) -> Result<f64, ValidationError> {
        Ok(parse_decimal(input))
    }
}

/// Strict parser: malformed input is `ValidationError::InvalidNumber`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StrictParser;

impl DecimalParser for StrictParser {
    fn parse(&self, field: &str, input: &str) -> Result<f64, ValidationError> {
        parse_decimal_strict(field, input)
    }
}

// =============================================================================
// Conversion
// =============================================================================

/// Rounds half-up (towards +∞), the way browsers round quantities.
///
/// `f64::round` rounds half away from zero, which differs for negatives.
pub fn round_half_up(value: f64) -> f64 {
    let floor = value.floor();
    if value - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}

/// Converts kilograms to whole grams.
///
/// ## Example
/// ```rust
/// use pesagem_core::units::kg_to_grams;
///
/// assert_eq!(kg_to_grams(1.2345), 1235);
/// assert_eq!(kg_to_grams(0.2), 200);
/// ```
#[inline]
pub fn kg_to_grams(kg: f64) -> i64 {
    round_half_up(decimal_or_zero(kg) * KG_IN_G) as i64
}

/// Converts grams to kilograms.
#[inline]
pub fn grams_to_kg(grams: f64) -> f64 {
    decimal_or_zero(grams) / KG_IN_G
}

/// Rounds a kilogram value to the 3 decimals the backend accepts.
///
/// Rounds the exact binary value, so `1.2345` (stored as `1.23449999…`)
/// goes down. Exact ties, which only occur on multiples of 1/16 kg, go
/// away from zero.
///
/// ## Example
/// ```rust
/// use pesagem_core::units::round_kg;
///
/// assert_eq!(round_kg(1.23456), 1.235);
/// assert_eq!(round_kg(1.2345), 1.234);
/// assert_eq!(round_kg(0.0625), 0.063);
/// ```
pub fn round_kg(kg: f64) -> f64 {
    let kg = decimal_or_zero(kg);
    let scaled = kg * KG_IN_G;

    // kg * 16 integral: scaled is exact and may sit on a tie
    if (kg * 16.0).fract() == 0.0 && scaled.fract().abs() == 0.5 {
        return scaled.round() / KG_IN_G;
    }

    format!("{:.*}", KG_DECIMALS as usize, kg)
        .parse::<f64>()
        .map(decimal_or_zero)
        .unwrap_or(0.0)
}

// =============================================================================
// Formatting (pt-BR)
// =============================================================================

/// Groups the digits of a non-negative integer with `.` every three places.
fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }
    grouped
}

/// Formats a gram quantity for display: whole grams, pt-BR grouping.
///
/// Negative values are shown as `0 g`; a band can't go below zero.
///
/// ## Example
/// ```rust
/// use pesagem_core::units::format_grams;
///
/// assert_eq!(format_grams(1234.0), "1.234 g");
/// assert_eq!(format_grams(949.6), "950 g");
/// assert_eq!(format_grams(-10.0), "0 g");
/// ```
pub fn format_grams(grams: f64) -> String {
    let rounded = round_half_up(decimal_or_zero(grams)).max(0.0);
    format!("{} g", group_thousands(rounded as u64))
}

/// Formats a kilogram quantity with 3 decimals, pt-BR style.
///
/// ## Example
/// ```rust
/// use pesagem_core::units::format_kg;
///
/// assert_eq!(format_kg(1.5), "1,500 kg");
/// assert_eq!(format_kg(1234.5678), "1.234,568 kg");
/// ```
pub fn format_kg(kg: f64) -> String {
    let grams = kg_to_grams(kg);
    let sign = if grams < 0 { "-" } else { "" };
    let abs = grams.unsigned_abs();
    format!(
        "{}{},{:03} kg",
        sign,
        group_thousands(abs / 1000),
        abs % 1000
    )
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_decimal_pt_br_formats() {
        assert_eq!(parse_decimal("1.234,500"), 1234.5);
        assert_eq!(parse_decimal("0,5"), 0.5);
        assert_eq!(parse_decimal(" 2 , 75 "), 2.75);
        assert_eq!(parse_decimal("-1"), -1.0);
        assert_eq!(parse_decimal("12,"), 12.0);
    }

    #[test]
    fn test_parse_decimal_falls_back_to_zero() {
        assert_eq!(parse_decimal(""), 0.0);
        assert_eq!(parse_decimal("   "), 0.0);
        assert_eq!(parse_decimal(","), 0.0);
        assert_eq!(parse_decimal("abc"), 0.0);
        assert_eq!(parse_decimal("1,2,3"), 0.0);
        assert_eq!(parse_decimal("NaN"), 0.0);
        assert_eq!(parse_decimal("inf"), 0.0);
    }

    #[test]
    fn test_dot_is_always_a_thousands_separator() {
        // "1.5" typed with a dot reads as 15, same as the browser form
        assert_eq!(parse_decimal("1.5"), 15.0);
    }

    #[test]
    fn test_decimal_or_zero() {
        assert_eq!(decimal_or_zero(2.5), 2.5);
        assert_eq!(decimal_or_zero(f64::NAN), 0.0);
        assert_eq!(decimal_or_zero(f64::INFINITY), 0.0);
    }

    #[test]
    fn test_parse_decimal_strict() {
        assert_eq!(parse_decimal_strict("tara", "0,500").unwrap(), 0.5);
        assert_eq!(parse_decimal_strict("tara", "-2").unwrap(), -2.0);
        assert_eq!(parse_decimal_strict("tara", "1.000,25").unwrap(), 1000.25);

        assert_eq!(parse_decimal_strict("tara", "1.234.567").unwrap(), 1234567.0);
        assert_eq!(parse_decimal_strict("tara", "1234,5").unwrap(), 1234.5);

        for bad in [
            "", ",", "12,", ",5", "abc", "1,2,3", ".5", "1..0", "1.", "--1", "1.5", "1.234.5",
            "1234.567", "12.34,5",
        ] {
            assert!(
                parse_decimal_strict("tara", bad).is_err(),
                "expected '{}' to be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_parsers_behind_trait() {
        assert_eq!(LenientParser.parse("liquido", "12,").unwrap(), 12.0);
        assert!(matches!(
            StrictParser.parse("liquido", "12,"),
            Err(ValidationError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn test_kg_grams_conversion() {
        assert_eq!(kg_to_grams(1.0), 1000);
        assert_eq!(kg_to_grams(0.2), 200);
        assert_eq!(kg_to_grams(0.0005), 1);
        assert_eq!(kg_to_grams(-0.0005), 0);
        assert_eq!(grams_to_kg(1500.0), 1.5);
    }

    #[test]
    fn test_grams_round_trip_within_one_gram() {
        for g in [0_i64, 1, 7, 999, 1000, 1001, 123_456, 9_999_999] {
            let back = kg_to_grams(grams_to_kg(g as f64));
            assert!((back - g).abs() <= 1, "{} came back as {}", g, back);
        }
    }

    #[test]
    fn test_round_kg() {
        assert_eq!(round_kg(1.0), 1.0);
        assert_eq!(round_kg(0.1234), 0.123);
        assert_eq!(round_kg(2.0005), 2.001);
        assert_eq!(round_kg(1.2345), 1.234);
        assert_eq!(round_kg(1.2346), 1.235);
    }

    #[test]
    fn test_round_kg_exact_ties_go_away_from_zero() {
        assert_eq!(round_kg(0.0625), 0.063);
        assert_eq!(round_kg(2.0625), 2.063);
        assert_eq!(round_kg(-0.0625), -0.063);
        assert_eq!(round_kg(f64::NAN), 0.0);
    }

    #[test]
    fn test_format_grams() {
        assert_eq!(format_grams(0.0), "0 g");
        assert_eq!(format_grams(999.0), "999 g");
        assert_eq!(format_grams(1234.0), "1.234 g");
        assert_eq!(format_grams(1_234_567.4), "1.234.567 g");
        assert_eq!(format_grams(-5.0), "0 g");
        assert_eq!(format_grams(f64::NAN), "0 g");
    }

    #[test]
    fn test_format_kg() {
        assert_eq!(format_kg(0.0), "0,000 kg");
        assert_eq!(format_kg(1.5), "1,500 kg");
        assert_eq!(format_kg(1234.5678), "1.234,568 kg");
        assert_eq!(format_kg(-0.25), "-0,250 kg");
    }
}
