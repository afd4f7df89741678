//! # API Error Type
//!
//! Unified error type for weighing commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Pesagem                                │
//! │                                                                         │
//! │  submit_weighing(form, config)                                          │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Validation Error? ── ValidationError ── CoreError ──► ApiError ──►     │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  CreateWeighingRequest ──► (external HTTP client) ──► backend           │
//! │                                              │                          │
//! │                              error body ◄────┘                          │
//! │                                  │                                      │
//! │                                  ▼                                      │
//! │                  ApiError::from_backend_body ──► form error message     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Serialization
//! Errors are serializable with a machine-readable `code` and the
//! operator-facing `message`.

use pesagem_core::{CoreError, ValidationError};
use serde::Serialize;
use serde_json::Value;

/// Message shown when a backend error body carries nothing usable.
pub const DEFAULT_SAVE_ERROR: &str = "Erro ao salvar pesagem.";

/// Fields of a backend error body that may hold the message, in priority order.
const BACKEND_MESSAGE_FIELDS: [&str; 4] = ["non_field_errors", "lote_mp", "liquido", "tara"];

/// API error returned from commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "OUT_OF_TOLERANCE",
///   "message": "O peso total excede a faixa de tolerância (+/- 5%). Limite: 950 g a 1.050 g. ..."
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Selection or lookup target missing
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Running total outside the tolerance band
    OutOfTolerance,

    /// Backend rejected the request
    BackendError,

    /// Internal error
    Internal,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::NotFound, message)
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }

    /// Reduces a backend error body to one message.
    ///
    /// ## Priority
    /// `detail`, then the first entry of `non_field_errors`, `lote_mp`,
    /// `liquido`, `tara`; otherwise a generic save error.
    ///
    /// ## Example
    /// ```rust
    /// use pesagem_app::error::ApiError;
    /// use serde_json::json;
    ///
    /// let err = ApiError::from_backend_body(&json!({"tara": ["Valor inválido."]}));
    /// assert_eq!(err.message, "Valor inválido.");
    /// ```
    pub fn from_backend_body(body: &Value) -> Self {
        let detail = body
            .get("detail")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty());

        let message = detail
            .or_else(|| {
                BACKEND_MESSAGE_FIELDS.iter().find_map(|field| {
                    body.get(*field)
                        .and_then(|v| v.get(0))
                        .and_then(Value::as_str)
                        .filter(|s| !s.is_empty())
                })
            })
            .unwrap_or(DEFAULT_SAVE_ERROR);

        ApiError::new(ErrorCode::BackendError, message)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        let code = match err {
            ValidationError::OutOfTolerance { .. } => ErrorCode::OutOfTolerance,
            _ => ErrorCode::ValidationError,
        };
        ApiError::new(code, err.to_string())
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::OrderNotFound(_) | CoreError::ItemNotFound(_) => {
                ApiError::not_found(err.to_string())
            }
            CoreError::Validation(e) => ApiError::from(e),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;
    use pesagem_core::ToleranceRate;
    use serde_json::json;

    #[test]
    fn test_backend_body_priority() {
        let body = json!({
            "detail": "Item já concluído.",
            "non_field_errors": ["ignored"]
        });
        assert_eq!(ApiError::from_backend_body(&body).message, "Item já concluído.");

        let body = json!({
            "liquido": ["Líquido excede o saldo."],
            "lote_mp": ["Lote obrigatório."]
        });
        assert_eq!(ApiError::from_backend_body(&body).message, "Lote obrigatório.");

        let body = json!({"unexpected": true});
        let err = ApiError::from_backend_body(&body);
        assert_eq!(err.message, DEFAULT_SAVE_ERROR);
        assert_eq!(err.code, ErrorCode::BackendError);
    }

    #[test]
    fn test_validation_codes() {
        let err: ApiError = ValidationError::OutOfTolerance {
            tolerance: ToleranceRate::from_bps(250),
            min_grams: 950.0,
            max_grams: 1050.0,
            proposed_total: 1100.0,
        }
        .into();
        assert_eq!(err.code, ErrorCode::OutOfTolerance);
        assert!(err.message.contains("(+/- 2,5%)"));

        let err: ApiError = CoreError::from(ValidationError::NegativeTara).into();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.message, "A tara não pode ser negativa.");

        let err: ApiError = CoreError::ItemNotFound(9).into();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[test]
    fn test_serialized_shape() {
        let err = ApiError::validation("Preencha Líquido e Tara.");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(
            json,
            json!({"code": "VALIDATION_ERROR", "message": "Preencha Líquido e Tara."})
        );
    }
}
