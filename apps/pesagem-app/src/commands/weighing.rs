//! # Weighing Commands
//!
//! Live preview of the form, submission and the follow-up steps after the
//! backend answers.
//!
//! ## Submit Workflow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Operator clicks "Salvar"                                               │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  submit_weighing(form, config)                                          │
//! │         │                                                               │
//! │         ├── Err(ApiError) ──► form.error = message (nothing is sent)    │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  CreateWeighingRequest ──► POST /registro/pesagens/                     │
//! │                                   │                                     │
//! │             ┌─────────────────────┴──────────────────┐                  │
//! │             ▼                                        ▼                  │
//! │  record_created(form, id)             record_backend_failure(form, body)│
//! │  success message, label enabled       form.error = backend message      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use pesagem_core::units::{round_kg, LenientParser};
use pesagem_core::validation::validate_with;
use pesagem_core::WeighingPreview;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::ApiError;
use crate::state::{AppConfig, FormState};

/// Message shown after the backend accepted a weighing.
pub const CREATED_MESSAGE: &str =
    "Pesagem registrada com sucesso! A OP será concluída automaticamente ao zerar todos os itens.";

/// Message shown when a label is requested before anything was saved.
pub const LABEL_BEFORE_SAVE: &str = "Salve a pesagem primeiro para gerar a etiqueta.";

/// Body of `POST /registro/pesagens/`.
///
/// Weights in kg with 3 decimals. Gross is not sent; the backend derives it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateWeighingRequest {
    pub op_id: u64,
    pub item_op_id: u64,
    pub tara: f64,
    pub liquido: f64,
    pub balanca_id: Option<u64>,
    pub codigo_interno: String,
    pub lote_mp: String,
}

/// Recomputes the preview for the current form.
pub fn preview_weighing(form: &FormState, config: &AppConfig) -> WeighingPreview {
    let rate = config.tolerance_rate();
    form.with_form(|f| WeighingPreview::compute(&f.draft, &f.requirement(), rate))
}

/// Validates the form and builds the create request.
///
/// On failure the form error is set and nothing should be sent.
pub fn submit_weighing(
    form: &FormState,
    config: &AppConfig,
) -> Result<CreateWeighingRequest, ApiError> {
    let rate = config.tolerance_rate();

    form.with_form_mut(|f| {
        f.clear_messages();
        let requirement = f.requirement();

        let payload = match validate_with(&LenientParser, rate, &f.draft, &requirement) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(
                    op_id = ?f.draft.op_id,
                    item_op_id = ?f.draft.item_op_id,
                    reason = %e,
                    "Weighing rejected"
                );
                let err = ApiError::from(e);
                f.error = Some(err.message.clone());
                return Err(err);
            }
        };

        // has_selection() passed inside validate_with
        let (Some(op_id), Some(item_op_id)) = (f.draft.op_id, f.draft.item_op_id) else {
            return Err(ApiError::internal("Seleção inconsistente."));
        };

        let request = CreateWeighingRequest {
            op_id,
            item_op_id,
            tara: round_kg(payload.tara_kg),
            liquido: round_kg(payload.net_kg),
            balanca_id: f.draft.scale_id,
            codigo_interno: f.draft.internal_code.clone(),
            lote_mp: f.draft.material_lot.trim().to_string(),
        };

        info!(
            op_id,
            item_op_id,
            liquido_kg = request.liquido,
            tara_kg = request.tara,
            operator = %f.operator,
            "Weighing accepted for submission"
        );
        Ok(request)
    })
}

/// Records the id of the weighing the backend created.
pub fn record_created(form: &FormState, weighing_id: u64) {
    debug!(weighing_id, "record_created command");
    form.with_form_mut(|f| {
        f.error = None;
        f.success = Some(CREATED_MESSAGE.to_string());
        f.created_id = Some(weighing_id);
    });
}

/// Shows the backend's rejection on the form and returns it.
pub fn record_backend_failure(form: &FormState, body: &Value) -> ApiError {
    let err = ApiError::from_backend_body(body);
    warn!(reason = %err.message, "Backend rejected weighing");
    form.with_form_mut(|f| {
        f.success = None;
        f.error = Some(err.message.clone());
    });
    err
}

/// Id of the weighing whose PDF label may be requested.
pub fn label_request(form: &FormState) -> Result<u64, ApiError> {
    form.with_form(|f| f.created_id)
        .ok_or_else(|| ApiError::validation(LABEL_BEFORE_SAVE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::state::FormField;
    use pesagem_core::ToleranceStatus;
    use serde_json::json;

    fn ready_form() -> FormState {
        let state = FormState::new("Maria");
        state.with_form_mut(|f| {
            f.load_orders(
                serde_json::from_value(json!([
                    {"id": 1, "numero": "100", "lote": "L1", "status": "aberta", "produto": 9}
                ]))
                .unwrap(),
            );
            f.select_order(1).unwrap();
            f.load_items(
                serde_json::from_value(json!([
                    {"id": 10, "materia_prima": {"nome": "Açúcar"},
                     "quantidade_necessaria": "1000.000", "quantidade_pesada": "900.000"}
                ]))
                .unwrap(),
            );
            f.select_item(10).unwrap();
        });
        state
    }

    #[test]
    fn test_preview_tracks_typing() {
        let form = ready_form();
        let config = AppConfig::default();

        form.with_form_mut(|f| f.set_field(FormField::Net, "0,100"));
        let preview = preview_weighing(&form, &config);
        assert_eq!(preview.proposed_total_grams, 1000.0);
        assert_eq!(preview.status, ToleranceStatus::Accepted);
        assert!(!preview.can_save); // tara still empty

        form.with_form_mut(|f| f.set_field(FormField::Tara, "0"));
        assert!(preview_weighing(&form, &config).can_save);
    }

    #[test]
    fn test_submit_builds_backend_request() {
        let form = ready_form();
        form.with_form_mut(|f| {
            f.set_field(FormField::Net, "0,1004");
            f.set_field(FormField::Tara, "0,25");
            f.set_field(FormField::Scale, "2");
            f.set_field(FormField::MaterialLot, "  L-77 ");
        });

        let request = submit_weighing(&form, &AppConfig::default()).unwrap();
        assert_eq!(request.op_id, 1);
        assert_eq!(request.item_op_id, 10);
        assert_eq!(request.liquido, 0.1);
        assert_eq!(request.tara, 0.25);
        assert_eq!(request.balanca_id, Some(2));
        assert_eq!(request.lote_mp, "L-77");

        let body = serde_json::to_value(&request).unwrap();
        assert!(body.get("bruto").is_none());
        assert_eq!(body["balanca_id"], json!(2));
    }

    #[test]
    fn test_submit_out_of_tolerance_sets_form_error() {
        let form = ready_form();
        form.with_form_mut(|f| {
            f.set_field(FormField::Net, "0,200");
            f.set_field(FormField::Tara, "0,100");
        });

        let err = submit_weighing(&form, &AppConfig::default()).unwrap_err();
        assert_eq!(err.code, ErrorCode::OutOfTolerance);
        assert_eq!(
            err.message,
            "O peso total excede a faixa de tolerância (+/- 5%). Limite: 950 g a 1.050 g. \
             O peso total atual será 1.100 g."
        );
        assert_eq!(form.with_form(|f| f.error.clone()), Some(err.message));
    }

    #[test]
    fn test_wider_configured_tolerance_accepts() {
        let form = ready_form();
        form.with_form_mut(|f| {
            f.set_field(FormField::Net, "0,200");
            f.set_field(FormField::Tara, "0");
        });
        let config = AppConfig {
            tolerance_bps: 1000,
            ..AppConfig::default()
        };
        assert!(submit_weighing(&form, &config).is_ok());
    }

    #[test]
    fn test_label_requires_a_saved_weighing() {
        let form = ready_form();
        let err = label_request(&form).unwrap_err();
        assert_eq!(err.message, LABEL_BEFORE_SAVE);

        record_created(&form, 321);
        assert_eq!(label_request(&form), Ok(321));
        assert_eq!(
            form.with_form(|f| f.success.clone()).as_deref(),
            Some(CREATED_MESSAGE)
        );

        // any edit invalidates the label
        form.with_form_mut(|f| f.set_field(FormField::Tara, "0,1"));
        assert!(label_request(&form).is_err());
    }

    #[test]
    fn test_backend_failure_message() {
        let form = ready_form();
        let err = record_backend_failure(
            &form,
            &json!({"non_field_errors": ["Item já concluído."]}),
        );
        assert_eq!(err.code, ErrorCode::BackendError);
        assert_eq!(
            form.with_form(|f| f.error.clone()).as_deref(),
            Some("Item já concluído.")
        );
    }
}
