//! # pesagem-core: Pure Weighing Rules for Pesagem
//!
//! This crate is the **heart** of Pesagem. It contains every rule the
//! weighing screen enforces, as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Pesagem Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Frontend (browser)                           │   │
//! │  │    OP select ──► Item select ──► Líquido/Tara ──► Salvar        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    pesagem-app                                  │   │
//! │  │    preview_weighing, submit_weighing, load_weighing_for_edit    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ pesagem-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   units   │  │ tolerance │  │validation │  │   types   │  │   │
//! │  │   │ kg ⇄ g    │  │ ±5% band  │  │ validate  │  │ OP, Item  │  │   │
//! │  │   │ pt-BR fmt │  │ classify  │  │ preview   │  │ Related<T>│  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • PURE FUNCTIONS                          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`units`] - kg/g conversion and pt-BR parsing/formatting
//! - [`tolerance`] - Tolerance band and classification of a proposed total
//! - [`validation`] - The weighing entry validator and live preview
//! - [`types`] - Domain types and backend DTO normalization
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same draft + same requirement = same outcome
//! 2. **Grams Inside**: all comparisons happen in grams; kg only at the edges
//! 3. **Permissive Typing, Strict Submission**: live input never errors,
//!    the validator is the single gate before a payload exists
//! 4. **Explicit Errors**: every rejection is a typed variant, never a panic
//!
//! ## Example Usage
//!
//! ```rust
//! use pesagem_core::types::ItemRequirement;
//! use pesagem_core::validation::{validate, WeighingDraft};
//!
//! let draft = WeighingDraft::new(1, 10, "1,000", "0,500");
//! let requirement = ItemRequirement::new(1000.0, 0.0);
//!
//! let payload = validate(&draft, &requirement).unwrap();
//! assert_eq!(payload.net_kg, 1.0);
//! assert_eq!(payload.tara_kg, 0.5);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod tolerance;
pub mod types;
pub mod units;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use tolerance::{classify, Classification, ToleranceBand, ToleranceRate, ToleranceStatus};
pub use types::*;
pub use validation::{validate, SubmittablePayload, WeighingDraft, WeighingPreview};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Grams per kilogram.
///
/// Operators type kilograms; the backend stores and compares grams.
pub const KG_IN_G: f64 = 1000.0;

/// Default weighing tolerance in basis points (500 = 5%).
///
/// ## Business Reason
/// Scales and manual dispensing are imprecise. A weighing whose running
/// total lands within ±5% of the formulation requirement is accepted;
/// anything outside is under- or over-dispensing of regulated material.
pub const DEFAULT_TOLERANCE_BPS: u32 = 500;

/// Widest tolerance a rate can express (10_000 bps = 100%).
///
/// Beyond it the lower bound of the band would go negative.
pub const MAX_TOLERANCE_BPS: u32 = 10_000;

/// Decimal places kept when sending kilogram values to the backend.
pub const KG_DECIMALS: u32 = 3;
