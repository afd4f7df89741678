//! # Validation Module
//!
//! The weighing entry validator: the single gate between what the operator
//! typed and a payload the backend will accept.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Live form (every keystroke)                                  │
//! │  ├── WeighingPreview::compute: derived weights, balance, band          │
//! │  └── Permissive parsing, never errors                                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Submission (THIS MODULE: validate)                           │
//! │  ├── Fail-fast checks, first failure wins                              │
//! │  └── Produces SubmittablePayload in kg (3 decimals)                    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Backend                                                      │
//! │  ├── Converts kg → g, recomputes gross                                 │
//! │  └── Re-checks tolerance against the authoritative item                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use pesagem_core::error::ValidationError;
//! use pesagem_core::types::ItemRequirement;
//! use pesagem_core::validation::{validate, WeighingDraft};
//!
//! let requirement = ItemRequirement::new(1000.0, 900.0);
//! let draft = WeighingDraft::new(1, 10, "0,200", "0,100");
//!
//! let err = validate(&draft, &requirement).unwrap_err();
//! assert!(matches!(err, ValidationError::OutOfTolerance { .. }));
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::tolerance::{classify_with, ToleranceBand, ToleranceRate, ToleranceStatus};
use crate::types::{ItemBalance, ItemRequirement};
use crate::units::{kg_to_grams, parse_decimal, round_kg, DecimalParser, LenientParser};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Draft
// =============================================================================

/// The in-progress weighing form, exactly as typed.
///
/// Weights are raw strings in kilograms (pt-BR: `"1.234,500"`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct WeighingDraft {
    /// Selected production order.
    pub op_id: Option<u64>,
    /// Selected line item of that order.
    pub item_op_id: Option<u64>,
    /// Net weight typed by the operator (kg).
    pub net_input_kg: String,
    /// Tare typed by the operator (kg).
    pub tara_input_kg: String,
    /// Scale used, if picked.
    pub scale_id: Option<u64>,
    /// Raw material internal code.
    pub internal_code: String,
    /// Raw material lot.
    pub material_lot: String,
}

impl WeighingDraft {
    /// Creates a draft with a selection and both weights.
    pub fn new(
        op_id: u64,
        item_op_id: u64,
        net_input_kg: impl Into<String>,
        tara_input_kg: impl Into<String>,
    ) -> Self {
        WeighingDraft {
            op_id: Some(op_id),
            item_op_id: Some(item_op_id),
            net_input_kg: net_input_kg.into(),
            tara_input_kg: tara_input_kg.into(),
            ..Default::default()
        }
    }

    /// Whether both an OP and an item are selected.
    #[inline]
    pub fn has_selection(&self) -> bool {
        self.op_id.is_some() && self.item_op_id.is_some()
    }

    /// Whether both weight fields have something in them.
    #[inline]
    pub fn has_weights(&self) -> bool {
        !self.net_input_kg.is_empty() && !self.tara_input_kg.is_empty()
    }
}

// =============================================================================
// Derived Weights
// =============================================================================

/// Quantities derived from a draft, recomputed on every change.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DerivedWeights {
    /// Net in whole grams.
    pub net_grams: i64,
    /// Tare in grams.
    pub tara_grams: f64,
    /// Gross = net + tare, in kg, never below zero.
    pub gross_kg: f64,
}

impl DerivedWeights {
    /// Derives weights from a draft, parsing permissively.
    pub fn from_draft(draft: &WeighingDraft) -> Self {
        let net_kg = parse_decimal(&draft.net_input_kg);
        let tara_kg = parse_decimal(&draft.tara_input_kg);
        DerivedWeights {
            net_grams: kg_to_grams(net_kg),
            tara_grams: tara_kg * crate::KG_IN_G,
            gross_kg: (net_kg + tara_kg).max(0.0),
        }
    }
}

// =============================================================================
// Payload
// =============================================================================

/// Weights ready to send to the backend, in kg rounded to 3 decimals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SubmittablePayload {
    pub tara_kg: f64,
    pub net_kg: f64,
    pub gross_kg: f64,
}

// =============================================================================
// Validator
// =============================================================================

/// Validates a draft with permissive parsing and the default ±5% band.
///
/// ## Checks (first failure wins)
/// 1. OP and item selected ............ `MissingSelection`
/// 2. Líquido and tara filled in ...... `MissingWeights`
/// 3. Líquido > 0 ..................... `NetWeightNotPositive`
/// 4. Tara >= 0 ....................... `NegativeTara`
/// 5. weighed + líquido inside band ... `OutOfTolerance`
pub fn validate(
    draft: &WeighingDraft,
    requirement: &ItemRequirement,
) -> ValidationResult<SubmittablePayload> {
    validate_with(&LenientParser, ToleranceRate::default(), draft, requirement)
}

/// Validates a draft with an explicit parser and tolerance.
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Item: nec 1.000 g · pes 900 g                                          │
/// │                                                                         │
/// │  Operator types Líquido "0,200", Tara "0,100", clicks Salvar            │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  net = 200 g, total = 900 + 200 = 1.100 g                               │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  band = 950 g a 1.050 g → 1.100 g is outside                            │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  OutOfTolerance { min: 950, max: 1050, total: 1100 }                    │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_with<P: DecimalParser + ?Sized>(
    parser: &P,
    rate: ToleranceRate,
    draft: &WeighingDraft,
    requirement: &ItemRequirement,
) -> ValidationResult<SubmittablePayload> {
    if !draft.has_selection() {
        return Err(ValidationError::MissingSelection);
    }

    if !draft.has_weights() {
        return Err(ValidationError::MissingWeights);
    }

    let net_kg = parser.parse("liquido", &draft.net_input_kg)?;
    if net_kg <= 0.0 {
        return Err(ValidationError::NetWeightNotPositive);
    }

    let tara_kg = parser.parse("tara", &draft.tara_input_kg)?;
    if tara_kg < 0.0 {
        return Err(ValidationError::NegativeTara);
    }

    let net_grams = kg_to_grams(net_kg);
    let proposed_total = requirement.already_weighed_grams + net_grams as f64;

    let classification = classify_with(rate, requirement.required_grams, proposed_total);
    if let ToleranceBand::Bounded {
        min_grams,
        max_grams,
    } = classification.band
    {
        if !classification.status.is_accepted() {
            return Err(ValidationError::OutOfTolerance {
                tolerance: rate,
                min_grams,
                max_grams,
                proposed_total,
            });
        }
    }

    let tara_kg = round_kg(tara_kg);
    let net_kg = round_kg(net_kg);
    Ok(SubmittablePayload {
        tara_kg,
        net_kg,
        gross_kg: tara_kg + net_kg,
    })
}

// =============================================================================
// Live Preview
// =============================================================================

/// Everything the weighing screen shows while the operator types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct WeighingPreview {
    pub derived: DerivedWeights,
    pub balance: ItemBalance,
    pub band: ToleranceBand,
    /// Already weighed + this net, in grams.
    pub proposed_total_grams: f64,
    pub status: ToleranceStatus,
    /// Advisory line for the balance panel.
    pub advisory: Option<String>,
    /// Whether "Salvar" should be enabled.
    pub can_save: bool,
}

impl WeighingPreview {
    /// Computes the preview for the current draft.
    pub fn compute(
        draft: &WeighingDraft,
        requirement: &ItemRequirement,
        rate: ToleranceRate,
    ) -> Self {
        let derived = DerivedWeights::from_draft(draft);
        let proposed_total_grams = requirement.already_weighed_grams + derived.net_grams as f64;
        let classification = classify_with(rate, requirement.required_grams, proposed_total_grams);
        let can_save = validate_with(&LenientParser, rate, draft, requirement).is_ok();

        WeighingPreview {
            derived,
            balance: requirement.balance(),
            band: classification.band,
            proposed_total_grams,
            status: classification.status,
            advisory: classification.status.advisory(rate),
            can_save,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
