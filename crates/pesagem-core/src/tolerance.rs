//! # Tolerance Module
//!
//! Acceptance band around a line item's required quantity.
//!
//! ## The Band
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  required = 1000 g, tolerance = 5%                                      │
//! │                                                                         │
//! │     rejected   │      accepted (below)   │  accepted (above)  │ rejected│
//! │  ──────────────┼─────────────────────────●────────────────────┼──────── │
//! │              950 g                    1000 g                1050 g      │
//! │               min        (exact match = Accepted)            max        │
//! │                                                                         │
//! │  Bounds are INCLUSIVE: 950 g and 1050 g are accepted.                  │
//! │  required = 0 → no band at all, everything is Accepted.                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use pesagem_core::tolerance::{classify, ToleranceStatus};
//!
//! let result = classify(1000.0, 1100.0);
//! assert_eq!(result.status, ToleranceStatus::RejectedOutOfTolerance);
//! assert_eq!(result.band.min_grams(), 950.0);
//! assert_eq!(result.band.max_grams(), Some(1050.0));
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::units::format_grams;
use crate::{DEFAULT_TOLERANCE_BPS, MAX_TOLERANCE_BPS};

// =============================================================================
// Tolerance Rate
// =============================================================================

/// Tolerance represented in basis points (bps).
///
/// 1 basis point = 0.01%, so 500 bps = ±5%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ToleranceRate(u32);

impl ToleranceRate {
    /// Creates a tolerance from basis points, capped at 100%.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        if bps > MAX_TOLERANCE_BPS {
            ToleranceRate(MAX_TOLERANCE_BPS)
        } else {
            ToleranceRate(bps)
        }
    }

    /// Creates a tolerance from a percentage (for configuration input).
    ///
    /// Negative or non-finite percentages become zero tolerance; anything
    /// above 100% is capped at 100%.
    pub fn from_percentage(pct: f64) -> Self {
        if !pct.is_finite() || pct <= 0.0 {
            return ToleranceRate(0);
        }
        let bps = (pct * 100.0).round().min(MAX_TOLERANCE_BPS as f64);
        ToleranceRate(bps as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a fraction (500 bps → 0.05).
    #[inline]
    pub fn fraction(&self) -> f64 {
        self.0 as f64 / 10_000.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Percentage without trailing zeros, pt-BR decimal comma ("5", "2,5").
    pub fn percentage_label(&self) -> String {
        let whole = self.0 / 100;
        let rest = self.0 % 100;
        match rest {
            0 => whole.to_string(),
            r if r % 10 == 0 => format!("{},{}", whole, r / 10),
            r => format!("{},{:02}", whole, r),
        }
    }
}

impl Default for ToleranceRate {
    fn default() -> Self {
        ToleranceRate(DEFAULT_TOLERANCE_BPS)
    }
}

// =============================================================================
// Tolerance Band
// =============================================================================

/// The accepted range for a running total, in grams.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ToleranceBand {
    /// Nothing is required (requirement of zero): every total is accepted.
    Unrestricted,
    /// Inclusive `[min_grams, max_grams]`.
    Bounded { min_grams: f64, max_grams: f64 },
}

impl ToleranceBand {
    /// Builds the band around `required_grams`.
    pub fn around(required_grams: f64, rate: ToleranceRate) -> Self {
        if required_grams <= 0.0 {
            return ToleranceBand::Unrestricted;
        }
        let fraction = rate.fraction();
        ToleranceBand::Bounded {
            min_grams: required_grams * (1.0 - fraction),
            max_grams: required_grams * (1.0 + fraction),
        }
    }

    /// Lower bound; `0` when unrestricted.
    pub fn min_grams(&self) -> f64 {
        match self {
            ToleranceBand::Unrestricted => 0.0,
            ToleranceBand::Bounded { min_grams, .. } => *min_grams,
        }
    }

    /// Upper bound; `None` when unrestricted.
    pub fn max_grams(&self) -> Option<f64> {
        match self {
            ToleranceBand::Unrestricted => None,
            ToleranceBand::Bounded { max_grams, .. } => Some(*max_grams),
        }
    }

    /// Whether `total_grams` lies inside the band (bounds inclusive).
    pub fn contains(&self, total_grams: f64) -> bool {
        match self {
            ToleranceBand::Unrestricted => true,
            ToleranceBand::Bounded {
                min_grams,
                max_grams,
            } => total_grams >= *min_grams && total_grams <= *max_grams,
        }
    }

    /// Display text for the balance panel: "950 g a 1.050 g".
    pub fn describe(&self) -> String {
        match self {
            ToleranceBand::Unrestricted => "sem limite".to_string(),
            ToleranceBand::Bounded {
                min_grams,
                max_grams,
            } => format!("{} a {}", format_grams(*min_grams), format_grams(*max_grams)),
        }
    }
}

// =============================================================================
// Classification
// =============================================================================

/// Where a proposed running total lands relative to the requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ToleranceStatus {
    /// Exactly the requirement, or no requirement at all.
    Accepted,
    /// Over the requirement but not past the upper bound.
    AcceptedAboveRequirementWithinTolerance,
    /// Under the requirement but not below the lower bound.
    AcceptedBelowRequirementWithinTolerance,
    /// Outside the band; the weighing must not be submitted.
    RejectedOutOfTolerance,
}

impl ToleranceStatus {
    /// Whether the weighing may be submitted.
    #[inline]
    pub fn is_accepted(&self) -> bool {
        !matches!(self, ToleranceStatus::RejectedOutOfTolerance)
    }

    /// Advisory line shown under the balance panel, if any.
    ///
    /// ## Example
    /// ```rust
    /// use pesagem_core::tolerance::{ToleranceRate, ToleranceStatus};
    ///
    /// let rate = ToleranceRate::default();
    /// assert_eq!(
    ///     ToleranceStatus::RejectedOutOfTolerance.advisory(rate).unwrap(),
    ///     "Excede a faixa de tolerância de +/- 5%. Ajuste o peso."
    /// );
    /// assert!(ToleranceStatus::Accepted.advisory(rate).is_none());
    /// ```
    pub fn advisory(&self, rate: ToleranceRate) -> Option<String> {
        let pct = rate.percentage_label();
        match self {
            ToleranceStatus::Accepted => None,
            ToleranceStatus::AcceptedAboveRequirementWithinTolerance => Some(format!(
                "Atingiu ou ultrapassou a quantidade necessária, dentro da tolerância de +{}%.",
                pct
            )),
            ToleranceStatus::AcceptedBelowRequirementWithinTolerance => Some(format!(
                "Atingiu a quantidade, mas com tolerância de -{}%.",
                pct
            )),
            ToleranceStatus::RejectedOutOfTolerance => Some(format!(
                "Excede a faixa de tolerância de +/- {}%. Ajuste o peso.",
                pct
            )),
        }
    }
}

/// Result of [`classify`]: the status plus the band that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub status: ToleranceStatus,
    pub band: ToleranceBand,
}

/// Classifies a proposed running total with the default ±5% tolerance.
pub fn classify(required_grams: f64, proposed_total_grams: f64) -> Classification {
    classify_with(ToleranceRate::default(), required_grams, proposed_total_grams)
}

/// Classifies a proposed running total against `required_grams`.
///
/// ## Decision Order
/// ```text
/// required <= 0 ───────────────────────► Accepted (no band)
/// total < min  or  total > max ────────► RejectedOutOfTolerance
/// total > required ────────────────────► AcceptedAbove…WithinTolerance
/// total < required ────────────────────► AcceptedBelow…WithinTolerance
/// otherwise ───────────────────────────► Accepted
/// ```
pub fn classify_with(
    rate: ToleranceRate,
    required_grams: f64,
    proposed_total_grams: f64,
) -> Classification {
    let band = ToleranceBand::around(required_grams, rate);

    let status = match band {
        ToleranceBand::Unrestricted => ToleranceStatus::Accepted,
        _ if !band.contains(proposed_total_grams) => ToleranceStatus::RejectedOutOfTolerance,
        _ if proposed_total_grams > required_grams => {
            ToleranceStatus::AcceptedAboveRequirementWithinTolerance
        }
        _ if proposed_total_grams < required_grams => {
            ToleranceStatus::AcceptedBelowRequirementWithinTolerance
        }
        _ => ToleranceStatus::Accepted,
    };

    Classification { status, band }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const REQUIREMENTS: [f64; 6] = [1.0, 7.0, 333.3, 1000.0, 12_345.678, 999_999.0];

    #[test]
    fn test_exact_requirement_is_accepted() {
        for required in REQUIREMENTS {
            assert_eq!(classify(required, required).status, ToleranceStatus::Accepted);
        }
    }

    #[test]
    fn test_upper_bound_is_inclusive() {
        for required in REQUIREMENTS {
            let status = classify(required, required * 1.05).status;
            assert!(status.is_accepted(), "{} at +5% was {:?}", required, status);
        }
    }

    #[test]
    fn test_just_past_upper_bound_is_rejected() {
        for required in REQUIREMENTS {
            assert_eq!(
                classify(required, required * 1.05 + 0.001).status,
                ToleranceStatus::RejectedOutOfTolerance
            );
        }
    }

    #[test]
    fn test_lower_bound_is_inclusive() {
        let result = classify(1000.0, 950.0);
        assert_eq!(
            result.status,
            ToleranceStatus::AcceptedBelowRequirementWithinTolerance
        );
        assert_eq!(
            classify(1000.0, 949.999).status,
            ToleranceStatus::RejectedOutOfTolerance
        );
    }

    #[test]
    fn test_zero_requirement_accepts_anything() {
        for proposed in [0.0, 1.0, 10_000.0, -5.0] {
            let result = classify(0.0, proposed);
            assert_eq!(result.status, ToleranceStatus::Accepted);
            assert_eq!(result.band, ToleranceBand::Unrestricted);
        }
    }

    #[test]
    fn test_above_and_below_within_band() {
        assert_eq!(
            classify(1000.0, 1020.0).status,
            ToleranceStatus::AcceptedAboveRequirementWithinTolerance
        );
        assert_eq!(
            classify(1000.0, 980.0).status,
            ToleranceStatus::AcceptedBelowRequirementWithinTolerance
        );
    }

    #[test]
    fn test_band_bounds() {
        let band = ToleranceBand::around(1000.0, ToleranceRate::default());
        assert_eq!(band.min_grams(), 950.0);
        assert_eq!(band.max_grams(), Some(1050.0));
        assert_eq!(band.describe(), "950 g a 1.050 g");
        assert_eq!(ToleranceBand::Unrestricted.max_grams(), None);
    }

    #[test]
    fn test_custom_rate() {
        let rate = ToleranceRate::from_percentage(2.5);
        assert_eq!(rate.bps(), 250);
        let result = classify_with(rate, 1000.0, 1030.0);
        assert_eq!(result.status, ToleranceStatus::RejectedOutOfTolerance);
        assert_eq!(result.band.max_grams(), Some(1025.0));
    }

    #[test]
    fn test_rate_conversions() {
        let rate = ToleranceRate::default();
        assert_eq!(rate.bps(), 500);
        assert_eq!(rate.fraction(), 0.05);
        assert_eq!(rate.percentage(), 5.0);
        assert_eq!(rate.percentage_label(), "5");
        assert_eq!(ToleranceRate::from_bps(250).percentage_label(), "2,5");
        assert_eq!(ToleranceRate::from_bps(125).percentage_label(), "1,25");
        assert_eq!(ToleranceRate::from_percentage(-1.0).bps(), 0);
    }

    #[test]
    fn test_rate_is_capped_at_one_hundred_percent() {
        assert_eq!(ToleranceRate::from_percentage(150.0).bps(), 10_000);
        assert_eq!(ToleranceRate::from_percentage(1e300).bps(), 10_000);
        assert_eq!(ToleranceRate::from_bps(u32::MAX).bps(), 10_000);

        let band = ToleranceBand::around(1000.0, ToleranceRate::from_percentage(250.0));
        assert_eq!(band.min_grams(), 0.0);
        assert_eq!(band.max_grams(), Some(2000.0));
    }

    #[test]
    fn test_advisories() {
        let rate = ToleranceRate::default();
        assert_eq!(
            ToleranceStatus::AcceptedAboveRequirementWithinTolerance
                .advisory(rate)
                .unwrap(),
            "Atingiu ou ultrapassou a quantidade necessária, dentro da tolerância de +5%."
        );
        assert_eq!(
            ToleranceStatus::AcceptedBelowRequirementWithinTolerance
                .advisory(rate)
                .unwrap(),
            "Atingiu a quantidade, mas com tolerância de -5%."
        );
    }
}
