//! # Weighing Form State
//!
//! The in-progress "Nova Pesagem" form: which OP and item are selected,
//! what the operator typed, and the messages shown under the form.
//!
//! ## Form Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Form State Operations                                │
//! │                                                                         │
//! │  Frontend Action          Form Operation         State Change           │
//! │  ───────────────          ──────────────         ────────────           │
//! │                                                                         │
//! │  Screen opens ───────────► load_orders() ──────► orders (open only)     │
//! │                                                                         │
//! │  Pick OP ────────────────► select_order() ─────► op_id, items cleared   │
//! │                  (then)    load_items() ───────► items                  │
//! │                                                                         │
//! │  Pick item ──────────────► select_item() ──────► item_op_id             │
//! │                                                                         │
//! │  Type líquido/tara ──────► set_field() ────────► draft, messages reset  │
//! │                                                                         │
//! │  Click Limpar ───────────► reset() ────────────► empty draft            │
//! │                                                                         │
//! │  NOTE: Every edit clears error, success and the created weighing id.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use pesagem_core::{
    open_orders, order_items, CoreError, CoreResult, ItemOption, ItemRequirement, Listing,
    OrderItemDto, OrderOption, ProductionOrderDto, WeighingDraft,
};
use serde::{Deserialize, Serialize};

/// Editable text fields of the weighing form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FormField {
    /// Líquido (kg)
    Net,
    /// Tara (kg)
    Tara,
    /// Balança
    Scale,
    /// Código Interno (MP)
    InternalCode,
    /// Lote MP
    MaterialLot,
}

/// The weighing form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeighingForm {
    /// Operator shown in the read-only "Pesador" field.
    pub operator: String,

    /// What the operator typed and selected.
    pub draft: WeighingDraft,

    /// Orders open for weighing.
    pub orders: Vec<OrderOption>,

    /// Items of the selected order.
    pub items: Vec<ItemOption>,

    /// Inline error under the form.
    pub error: Option<String>,

    /// Inline success message under the form.
    pub success: Option<String>,

    /// Id of the weighing created by the last successful submit.
    pub created_id: Option<u64>,

    /// When the form was opened or last cleared.
    pub opened_at: DateTime<Utc>,
}

impl WeighingForm {
    /// Creates an empty form for an operator.
    pub fn new(operator: impl Into<String>) -> Self {
        WeighingForm {
            operator: operator.into(),
            draft: WeighingDraft::default(),
            orders: Vec::new(),
            items: Vec::new(),
            error: None,
            success: None,
            created_id: None,
            opened_at: Utc::now(),
        }
    }

    /// Clears error, success and the created weighing id.
    pub fn clear_messages(&mut self) {
        self.error = None;
        self.success = None;
        self.created_id = None;
    }

    /// Replaces the order list with the open orders of a backend listing.
    pub fn load_orders(&mut self, listing: Listing<ProductionOrderDto>) {
        self.orders = open_orders(listing);
    }

    /// Selects an order; the item selection and item list are dropped.
    pub fn select_order(&mut self, op_id: u64) -> CoreResult<()> {
        if !self.orders.iter().any(|o| o.id == op_id) {
            return Err(CoreError::OrderNotFound(op_id));
        }
        self.draft.op_id = Some(op_id);
        self.draft.item_op_id = None;
        self.items.clear();
        self.clear_messages();
        Ok(())
    }

    /// Replaces the item list with a backend listing.
    pub fn load_items(&mut self, listing: Listing<OrderItemDto>) {
        self.items = order_items(listing);
    }

    /// Selects an item of the current order.
    pub fn select_item(&mut self, item_op_id: u64) -> CoreResult<()> {
        if !self.items.iter().any(|i| i.id == item_op_id) {
            return Err(CoreError::ItemNotFound(item_op_id));
        }
        self.draft.item_op_id = Some(item_op_id);
        self.clear_messages();
        Ok(())
    }

    /// Updates a text field.
    ///
    /// For [`FormField::Scale`] an empty or non-numeric value clears the scale.
    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) {
        let value = value.into();
        match field {
            FormField::Net => self.draft.net_input_kg = value,
            FormField::Tara => self.draft.tara_input_kg = value,
            FormField::Scale => self.draft.scale_id = value.trim().parse().ok(),
            FormField::InternalCode => self.draft.internal_code = value,
            FormField::MaterialLot => self.draft.material_lot = value,
        }
        self.clear_messages();
    }

    /// The selected order, if any.
    pub fn selected_order(&self) -> Option<&OrderOption> {
        let op_id = self.draft.op_id?;
        self.orders.iter().find(|o| o.id == op_id)
    }

    /// The selected item, if any.
    pub fn selected_item(&self) -> Option<&ItemOption> {
        let item_op_id = self.draft.item_op_id?;
        self.items.iter().find(|i| i.id == item_op_id)
    }

    /// Requirement of the selected item; unrestricted when none is selected.
    pub fn requirement(&self) -> ItemRequirement {
        self.selected_item()
            .map(ItemOption::requirement)
            .unwrap_or_default()
    }

    /// Items matching the picker's search box.
    pub fn search_items(&self, query: &str) -> Vec<&ItemOption> {
        self.items.iter().filter(|i| i.matches(query)).collect()
    }

    /// "Limpar": empties the draft and item list, keeps operator and orders.
    pub fn reset(&mut self) {
        self.draft = WeighingDraft::default();
        self.items.clear();
        self.clear_messages();
        self.opened_at = Utc::now();
    }
}

impl Default for WeighingForm {
    fn default() -> Self {
        Self::new(String::new())
    }
}

/// Shared weighing form state.
///
/// ## Thread Safety
/// Uses `Arc<Mutex<WeighingForm>>`: commands may run concurrently and only
/// one of them should modify the form at a time. Form edits are quick, so
/// a `RwLock` would add complexity with no benefit.
#[derive(Debug, Clone)]
pub struct FormState {
    form: Arc<Mutex<WeighingForm>>,
}

impl FormState {
    /// Creates state around an empty form for `operator`.
    pub fn new(operator: impl Into<String>) -> Self {
        FormState {
            form: Arc::new(Mutex::new(WeighingForm::new(operator))),
        }
    }

    /// Executes a function with read access to the form.
    pub fn with_form<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&WeighingForm) -> R,
    {
        let form = self.form.lock().unwrap_or_else(PoisonError::into_inner);
        f(&form)
    }

    /// Executes a function with write access to the form.
    pub fn with_form_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut WeighingForm) -> R,
    {
        let mut form = self.form.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut form)
    }
}

impl Default for FormState {
    fn default() -> Self {
        Self::new(String::new())
    }
}
