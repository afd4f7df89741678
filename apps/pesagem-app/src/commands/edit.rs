//! # Edit Commands
//!
//! Loading a stored weighing into the edit screen and building the update
//! body when it is saved.
//!
//! ## Units
//! ```text
//! backend record                 edit form (pt-BR text)     update body
//! ──────────────                 ──────────────────────     ───────────
//! liquido   (g)  ── ÷ 1000 ───►  net_kg   "1,500"   ──────► liquido (kg)
//! tara      (kg) ────────────►   tara_kg  "0,250"   ──────► tara    (kg)
//! bruto     (kg)                 gross_kg() = net + tara    (not sent)
//! ```
//!
//! Older records carry the net as `liquido_g` or `peso_liquido`, or only
//! `bruto` and `tara`; all of them are read.

use chrono::{DateTime, Utc};
use pesagem_core::units::{grams_to_kg, parse_decimal, round_kg};
use pesagem_core::{NamedRef, Numeric, Related, WeighingRecordDto};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{ApiError, ErrorCode};

/// Placeholder for header labels the record does not carry.
const MISSING_LABEL: &str = "-";

/// Message shown when a rejected update carries no `detail`.
pub const UPDATE_SAVE_ERROR: &str = "Falha ao salvar. Verifique os campos e tente novamente.";

/// The edit screen's form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeighingEditForm {
    pub id: u64,
    /// Whether the weighing belongs to an OP (OP and item are read-only).
    pub op_linked: bool,
    pub op_id: Option<u64>,
    pub item_op_id: Option<u64>,
    pub product_id: Option<u64>,
    pub material_id: Option<u64>,
    pub op_number: String,
    pub lot: String,
    /// Net in kg, pt-BR text.
    pub net_kg: String,
    /// Tare in kg, pt-BR text.
    pub tara_kg: String,
    pub volume: String,
    pub scale_id: Option<u64>,
    pub internal_code: String,
    /// Header: product name.
    pub product_name: String,
    /// Header: raw material name.
    pub material_name: String,
    pub operator: String,
    pub weighed_at: Option<DateTime<Utc>>,
}

impl WeighingEditForm {
    /// Normalizes a stored weighing.
    pub fn from_record(record: WeighingRecordDto) -> Self {
        let order = record.op.as_ref().and_then(Related::object);
        let item = record.item_op.as_ref().and_then(Related::object);

        let product_name = order
            .and_then(|o| name_of(&o.produto))
            .or_else(|| name_of(&record.produto))
            .or_else(|| non_empty(&record.produto_nome))
            .unwrap_or_else(|| MISSING_LABEL.to_string());

        let material_name = item
            .and_then(|i| name_of(&i.materia_prima))
            .or_else(|| name_of(&record.materia_prima))
            .or_else(|| non_empty(&record.materia_prima_nome))
            .unwrap_or_else(|| MISSING_LABEL.to_string());

        let op_number = order
            .and_then(|o| non_empty(&o.numero))
            .or_else(|| non_empty(&record.op_numero))
            .or_else(|| record.op.as_ref().and_then(Related::id).map(|id| id.to_string()))
            .unwrap_or_default();

        let lot = non_empty(&record.lote)
            .or_else(|| order.and_then(|o| non_empty(&o.lote)))
            .unwrap_or_default();

        WeighingEditForm {
            id: record.id,
            op_linked: record.op.is_some() || record.item_op.is_some(),
            op_id: record.op.as_ref().and_then(Related::id),
            item_op_id: record.item_op.as_ref().and_then(Related::id),
            product_id: record.produto.as_ref().and_then(Related::id),
            material_id: record.materia_prima.as_ref().and_then(Related::id),
            op_number,
            lot,
            net_kg: stored_net_kg(&record).map(kg_text).unwrap_or_default(),
            tara_kg: record
                .tara
                .as_ref()
                .map(|t| kg_text(t.value()))
                .unwrap_or_default(),
            volume: record.volume.as_ref().map(volume_text).unwrap_or_default(),
            scale_id: record.balanca.as_ref().and_then(Related::id),
            internal_code: record.codigo_interno.unwrap_or_default(),
            product_name,
            material_name,
            operator: record.pesador.unwrap_or_default(),
            weighed_at: record.data_hora,
        }
    }

    /// Gross (kg) shown next to the inputs; `None` while both are empty.
    pub fn gross_kg(&self) -> Option<f64> {
        if self.net_kg.trim().is_empty() && self.tara_kg.trim().is_empty() {
            return None;
        }
        Some(round_kg(
            parse_decimal(&self.net_kg) + parse_decimal(&self.tara_kg),
        ))
    }
}

/// Links sent only for weighings recorded outside an OP.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyLinks {
    pub produto_id: Option<u64>,
    pub materia_prima_id: Option<u64>,
    pub op: String,
}

/// Body of `PATCH /registro/pesagens/<id>/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateWeighingRequest {
    pub lote: String,
    pub liquido: Option<f64>,
    pub tara: Option<f64>,
    pub volume: String,
    pub balanca_id: Option<u64>,
    pub codigo_interno: String,
    #[serde(flatten)]
    pub legacy: Option<LegacyLinks>,
}

/// Loads a stored weighing (raw backend JSON) into the edit form.
pub fn load_weighing_for_edit(body: &Value) -> Result<WeighingEditForm, ApiError> {
    let record: WeighingRecordDto = serde_json::from_value(body.clone()).map_err(|e| {
        warn!(error = %e, "Unexpected weighing shape from backend");
        ApiError::internal("Não foi possível carregar a pesagem.")
    })?;
    let form = WeighingEditForm::from_record(record);
    debug!(id = form.id, op_linked = form.op_linked, "load_weighing_for_edit command");
    Ok(form)
}

/// Builds the update body from the edit form.
pub fn build_update_request(form: &WeighingEditForm) -> UpdateWeighingRequest {
    let legacy = (!form.op_linked).then(|| LegacyLinks {
        produto_id: form.product_id,
        materia_prima_id: form.material_id,
        op: form.op_number.clone(),
    });

    UpdateWeighingRequest {
        lote: form.lot.trim().to_string(),
        liquido: optional_kg(&form.net_kg),
        tara: optional_kg(&form.tara_kg),
        volume: form.volume.clone(),
        balanca_id: form.scale_id,
        codigo_interno: form.internal_code.clone(),
        legacy,
    }
}

/// Reduces a rejected update's body to the message shown on the edit screen.
///
/// Only `detail` is read; field errors fall back to a generic hint.
pub fn update_failure(body: &Value) -> ApiError {
    let message = body
        .get("detail")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .unwrap_or(UPDATE_SAVE_ERROR);
    warn!(reason = message, "Backend rejected weighing update");
    ApiError::new(ErrorCode::BackendError, message)
}

// =============================================================================
// Helpers
// =============================================================================

fn name_of(related: &Option<Related<NamedRef>>) -> Option<String> {
    related
        .as_ref()
        .and_then(Related::object)
        .and_then(|n| non_empty(&n.nome))
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_deref().filter(|s| !s.is_empty()).map(str::to_string)
}

fn stored_net_kg(record: &WeighingRecordDto) -> Option<f64> {
    [&record.liquido, &record.liquido_g, &record.peso_liquido]
        .into_iter()
        .flatten()
        .next()
        .map(|grams| grams_to_kg(grams.value()))
        .or_else(|| match (&record.bruto, &record.tara) {
            (Some(bruto), Some(tara)) => Some(bruto.value() - tara.value()),
            _ => None,
        })
}

/// "1,500": kg with 3 decimals and a decimal comma, no grouping.
fn kg_text(kg: f64) -> String {
    format!("{:.3}", round_kg(kg)).replace('.', ",")
}

fn volume_text(volume: &Numeric) -> String {
    match volume {
        Numeric::Number(n) => n.to_string(),
        Numeric::Text(s) => s.clone(),
    }
}

fn optional_kg(input: &str) -> Option<f64> {
    if input.trim().is_empty() {
        return None;
    }
    Some(round_kg(parse_decimal(input)))
}
