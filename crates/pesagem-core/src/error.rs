//! # Error Types
//!
//! Domain-specific error types for pesagem-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  pesagem-core errors (this file)                                       │
//! │  ├── CoreError        - Selection lookups + wrapped validation         │
//! │  └── ValidationError  - Weighing entry rejected before submission      │
//! │                                                                         │
//! │  pesagem-app errors (separate crate)                                   │
//! │  └── ApiError         - What the frontend sees (serialized)            │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → Frontend               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Messages are the operator-facing text, in Portuguese
//! 3. Tolerance failures carry the numbers so the UI can show them
//! 4. Nothing here is fatal: every variant is a correctable form state

use thiserror::Error;

use crate::tolerance::ToleranceRate;
use crate::units::format_grams;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    /// The selected production order is not among the loaded ones.
    #[error("OP não encontrada: {0}")]
    OrderNotFound(u64),

    /// The selected order line item is not among the loaded ones.
    ///
    /// ## When This Occurs
    /// - The item list was reloaded for another OP
    /// - The backend removed the item between fetch and selection
    #[error("Item da OP não encontrado: {0}")]
    ItemNotFound(u64),

    /// Validation error (wraps ValidationError).
    #[error("{0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Weighing entry rejections.
///
/// Checked in declaration order by the validator; the first failure wins.
///
/// ## User Workflow
/// ```text
/// Operator clicks "Salvar"
///      │
///      ▼
/// validate(draft, requirement)
///      │
///      ├── no OP / item ─────────► MissingSelection
///      ├── empty líquido / tara ──► MissingWeights
///      ├── líquido <= 0 ──────────► NetWeightNotPositive
///      ├── tara < 0 ──────────────► NegativeTara
///      ├── total outside band ────► OutOfTolerance { rate, min, max, total }
///      │
///      ▼
/// SubmittablePayload (kg, 3 decimals)
/// ```
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// No production order or no line item selected yet.
    #[error("Selecione a OP e o Item da OP.")]
    MissingSelection,

    /// Net or tare field left empty.
    #[error("Preencha Líquido e Tara.")]
    MissingWeights,

    /// Net weight parsed to zero or less.
    #[error("O peso líquido deve ser maior que zero.")]
    NetWeightNotPositive,

    /// Tare parsed to a negative value.
    #[error("A tara não pode ser negativa.")]
    NegativeTara,

    /// Running total (already weighed + this net) falls outside the band.
    #[error(
        "O peso total excede a faixa de tolerância (+/- {}%). Limite: {} a {}. O peso total atual será {}.",
        .tolerance.percentage_label(),
        grams(.min_grams),
        grams(.max_grams),
        grams(.proposed_total)
    )]
    OutOfTolerance {
        tolerance: ToleranceRate,
        min_grams: f64,
        max_grams: f64,
        proposed_total: f64,
    },

    /// Input rejected by the strict parser.
    #[error("{field} não é um número válido: '{input}'")]
    InvalidNumber { field: String, input: String },
}

fn grams(value: &f64) -> String {
    format_grams(*value)
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_tolerance_message_shows_band_and_total() {
        let err = ValidationError::OutOfTolerance {
            tolerance: ToleranceRate::default(),
            min_grams: 950.0,
            max_grams: 1050.0,
            proposed_total: 1120.0,
        };
        assert_eq!(
            err.to_string(),
            "O peso total excede a faixa de tolerância (+/- 5%). Limite: 950 g a 1.050 g. O peso total atual será 1.120 g."
        );
    }

    #[test]
    fn test_validation_error_messages() {
        assert_eq!(
            ValidationError::NetWeightNotPositive.to_string(),
            "O peso líquido deve ser maior que zero."
        );
        assert_eq!(
            ValidationError::NegativeTara.to_string(),
            "A tara não pode ser negativa."
        );

        let err = ValidationError::InvalidNumber {
            field: "liquido".to_string(),
            input: "12,".to_string(),
        };
        assert_eq!(err.to_string(), "liquido não é um número válido: '12,'");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let core_err: CoreError = ValidationError::MissingWeights.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
        assert_eq!(core_err.to_string(), "Preencha Líquido e Tara.");
    }
}
