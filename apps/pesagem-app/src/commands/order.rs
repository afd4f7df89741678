//! # Order Commands
//!
//! Loading the OP list and the items of an OP, selecting them, and editing
//! the free-text fields of the weighing form.
//!
//! ## Selection Lifecycle
//! ```text
//! ┌──────────┐  select_order   ┌──────────┐  select_item   ┌──────────┐
//! │ No OP    │────────────────►│ OP only  │───────────────►│ OP+Item  │
//! └──────────┘                 └──────────┘                └──────────┘
//!                                   ▲                            │
//!                                   └──────── select_order ──────┘
//!                                          (item dropped)
//! ```

use pesagem_core::{ItemOption, Listing, OrderItemDto, OrderOption, ProductionOrderDto};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::state::{FormField, FormState};

fn parse_listing<T: serde::de::DeserializeOwned>(
    body: Value,
    what: &str,
) -> Result<Listing<T>, ApiError> {
    serde_json::from_value(body).map_err(|e| {
        warn!(error = %e, what, "Unexpected listing shape from backend");
        ApiError::internal(format!("Falha ao carregar {}.", what))
    })
}

/// Loads the orders a weighing can be logged against.
///
/// Accepts the raw `/registro/ops/` body (array or paginated).
pub fn load_orders(form: &FormState, body: Value) -> Result<Vec<OrderOption>, ApiError> {
    let listing: Listing<ProductionOrderDto> = parse_listing(body, "as OPs")?;
    let orders = form.with_form_mut(|f| {
        f.load_orders(listing);
        f.orders.clone()
    });
    debug!(count = orders.len(), "load_orders command");
    Ok(orders)
}

/// Selects an OP. The caller then fetches its items and calls [`load_items`].
pub fn select_order(form: &FormState, op_id: u64) -> Result<(), ApiError> {
    debug!(op_id, "select_order command");
    form.with_form_mut(|f| f.select_order(op_id))
        .map_err(ApiError::from)
}

/// Loads the items of the selected OP.
pub fn load_items(form: &FormState, body: Value) -> Result<Vec<ItemOption>, ApiError> {
    let listing: Listing<OrderItemDto> = match parse_listing(body, "itens da OP") {
        Ok(listing) => listing,
        Err(e) => {
            form.with_form_mut(|f| f.error = Some(e.message.clone()));
            return Err(e);
        }
    };
    let items = form.with_form_mut(|f| {
        f.load_items(listing);
        f.items.clone()
    });
    debug!(count = items.len(), "load_items command");
    Ok(items)
}

/// Selects an item of the current OP.
pub fn select_item(form: &FormState, item_op_id: u64) -> Result<(), ApiError> {
    debug!(item_op_id, "select_item command");
    form.with_form_mut(|f| f.select_item(item_op_id))
        .map_err(ApiError::from)
}

/// Items whose material name or code contains `query`.
pub fn search_items(form: &FormState, query: &str) -> Vec<ItemOption> {
    form.with_form(|f| f.search_items(query).into_iter().cloned().collect())
}

/// Updates one text field of the form.
pub fn set_field(form: &FormState, field: FormField, value: String) {
    debug!(?field, "set_field command");
    form.with_form_mut(|f| f.set_field(field, value));
}

/// "Limpar": clears the draft, keeps the operator and the OP list.
pub fn reset_form(form: &FormState) {
    debug!("reset_form command");
    form.with_form_mut(|f| f.reset());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use serde_json::json;

    #[test]
    fn test_load_and_select() {
        let form = FormState::new("Ana");
        let orders = load_orders(
            &form,
            json!({"results": [
                {"id": 1, "numero": "7", "lote": "A", "status": "em_andamento", "produto": {"nome": "Creme"}}
            ]}),
        )
        .unwrap();
        assert_eq!(orders[0].label(), "OP 7 • Creme • Lote A (em_andamento)");

        select_order(&form, 1).unwrap();
        let items = load_items(
            &form,
            json!([{"id": 3, "materia_prima": 12, "quantidade_necessaria": 10, "quantidade_pesada": 0}]),
        )
        .unwrap();
        assert_eq!(items[0].material_name, "");
        select_item(&form, 3).unwrap();
        assert_eq!(form.with_form(|f| f.draft.item_op_id), Some(3));
    }

    #[test]
    fn test_unknown_order_maps_to_not_found() {
        let form = FormState::default();
        let err = select_order(&form, 5).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[test]
    fn test_malformed_items_set_form_error() {
        let form = FormState::default();
        let err = load_items(&form, json!({"unexpected": 1})).unwrap_err();
        assert_eq!(err.code, ErrorCode::Internal);
        assert_eq!(
            form.with_form(|f| f.error.clone()).as_deref(),
            Some("Falha ao carregar itens da OP.")
        );
    }
}
