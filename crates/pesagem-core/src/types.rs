//! # Domain Types
//!
//! Types read from the backend and the flat views the weighing screen uses.
//!
//! ## Boundary Normalization
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Backend JSON (varies)                                │
//! │                                                                         │
//! │   "produto": {"id": 3, "nome": "Base"}     "produto": 3                 │
//! │   "quantidade_necessaria": "1000.000"      "quantidade_necessaria": 1000│
//! │   [ {...}, {...} ]                         {"count": 2, "results": [...]}│
//! │                     │                                                   │
//! │                     ▼   normalized ONCE per fetch                       │
//! │   Related<T>, Numeric, Listing<T>  ──►  OrderOption, ItemOption         │
//! │                                                                         │
//! │   Screens never look at the raw shapes again.                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Quantities on order items are **grams** (the backend stores grams).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::units::{decimal_or_zero, format_grams};

// =============================================================================
// Boundary Shapes
// =============================================================================

/// A related entity that arrives either expanded or as a bare id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Related<T> {
    Id(u64),
    Object(T),
}

impl<T> Related<T> {
    /// The expanded object, if the backend sent one.
    pub fn object(&self) -> Option<&T> {
        match self {
            Related::Object(obj) => Some(obj),
            Related::Id(_) => None,
        }
    }
}

impl<T: HasId> Related<T> {
    /// The id, whichever shape arrived.
    pub fn id(&self) -> Option<u64> {
        match self {
            Related::Id(id) => Some(*id),
            Related::Object(obj) => obj.id(),
        }
    }
}

/// Entities that may carry their own id.
pub trait HasId {
    fn id(&self) -> Option<u64>;
}

/// A list endpoint response: bare array or paginated envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Listing<T> {
    Plain(Vec<T>),
    Paginated {
        #[serde(default)]
        count: Option<u64>,
        results: Vec<T>,
    },
}

impl<T> Listing<T> {
    /// The items, regardless of envelope.
    pub fn into_items(self) -> Vec<T> {
        match self {
            Listing::Plain(items) => items,
            Listing::Paginated { results, .. } => results,
        }
    }
}

impl<T> Default for Listing<T> {
    fn default() -> Self {
        Listing::Plain(Vec::new())
    }
}

/// A decimal that arrives as a JSON number or a JSON string ("1000.000").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Numeric {
    Number(f64),
    Text(String),
}

impl Numeric {
    /// Numeric value; unparseable text is zero.
    ///
    /// Backend decimals use `.` as the decimal point, unlike operator input.
    pub fn value(&self) -> f64 {
        match self {
            Numeric::Number(n) => decimal_or_zero(*n),
            Numeric::Text(s) => {
                let s = s.trim();
                if s.is_empty() {
                    return 0.0;
                }
                s.parse::<f64>().map(decimal_or_zero).unwrap_or(0.0)
            }
        }
    }
}

/// Reads an optional backend decimal, missing or null being zero.
pub fn numeric_or_zero(value: &Option<Numeric>) -> f64 {
    value.as_ref().map(Numeric::value).unwrap_or(0.0)
}

// =============================================================================
// Backend DTOs
// =============================================================================

/// Product, raw material or scale reference: anything with a name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NamedRef {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub nome: Option<String>,
    #[serde(default)]
    pub codigo_interno: Option<String>,
}

impl HasId for NamedRef {
    fn id(&self) -> Option<u64> {
        self.id
    }
}

/// Production order status, as the backend spells it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Aberta,
    EmAndamento,
    Concluida,
    Cancelada,
}

impl OrderStatus {
    /// Weighings can only be logged against open or in-progress orders.
    #[inline]
    pub fn accepts_weighings(&self) -> bool {
        matches!(self, OrderStatus::Aberta | OrderStatus::EmAndamento)
    }

    /// Backend spelling, used in labels.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Aberta => "aberta",
            OrderStatus::EmAndamento => "em_andamento",
            OrderStatus::Concluida => "concluida",
            OrderStatus::Cancelada => "cancelada",
        }
    }
}

/// A production order (OP) as returned by `/registro/ops/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionOrderDto {
    pub id: u64,
    #[serde(default)]
    pub numero: String,
    #[serde(default)]
    pub lote: String,
    pub status: OrderStatus,
    #[serde(default)]
    pub produto: Option<Related<NamedRef>>,
}

impl HasId for ProductionOrderDto {
    fn id(&self) -> Option<u64> {
        Some(self.id)
    }
}

/// A line item of an OP. Quantities in grams.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItemDto {
    pub id: u64,
    #[serde(default)]
    pub materia_prima: Option<Related<NamedRef>>,
    #[serde(default)]
    pub quantidade_necessaria: Option<Numeric>,
    #[serde(default)]
    pub quantidade_pesada: Option<Numeric>,
    #[serde(default)]
    pub quantidade_restante: Option<Numeric>,
    #[serde(default)]
    pub unidade: Option<String>,
}

impl HasId for OrderItemDto {
    fn id(&self) -> Option<u64> {
        Some(self.id)
    }
}

/// Order reference embedded in a stored weighing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderRef {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub numero: Option<String>,
    #[serde(default)]
    pub lote: Option<String>,
    #[serde(default)]
    pub produto: Option<Related<NamedRef>>,
}

impl HasId for OrderRef {
    fn id(&self) -> Option<u64> {
        self.id
    }
}

/// Order item reference embedded in a stored weighing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemRef {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub materia_prima: Option<Related<NamedRef>>,
}

impl HasId for ItemRef {
    fn id(&self) -> Option<u64> {
        self.id
    }
}

/// A stored weighing as returned by `/registro/pesagens/<id>/`.
///
/// ## Units (current backend)
/// - `tara`, `bruto`: kilograms
/// - `liquido`: grams (older payloads used `liquido_g` / `peso_liquido`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeighingRecordDto {
    pub id: u64,
    #[serde(default)]
    pub op: Option<Related<OrderRef>>,
    #[serde(default)]
    pub item_op: Option<Related<ItemRef>>,
    #[serde(default)]
    pub op_numero: Option<String>,
    #[serde(default)]
    pub produto: Option<Related<NamedRef>>,
    #[serde(default)]
    pub produto_nome: Option<String>,
    #[serde(default)]
    pub materia_prima: Option<Related<NamedRef>>,
    #[serde(default)]
    pub materia_prima_nome: Option<String>,
    #[serde(default)]
    pub lote: Option<String>,
    #[serde(default)]
    pub tara: Option<Numeric>,
    #[serde(default)]
    pub liquido: Option<Numeric>,
    #[serde(default)]
    pub liquido_g: Option<Numeric>,
    #[serde(default)]
    pub peso_liquido: Option<Numeric>,
    #[serde(default)]
    pub bruto: Option<Numeric>,
    #[serde(default)]
    pub volume: Option<Numeric>,
    #[serde(default)]
    pub balanca: Option<Related<NamedRef>>,
    #[serde(default)]
    pub codigo_interno: Option<String>,
    #[serde(default)]
    pub pesador: Option<String>,
    #[serde(default)]
    pub data_hora: Option<DateTime<Utc>>,
}

// =============================================================================
// Normalized Views
// =============================================================================

/// A production order as the OP selector shows it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderOption {
    pub id: u64,
    pub numero: String,
    pub lote: String,
    pub status: OrderStatus,
    pub product_name: String,
}

impl OrderOption {
    /// Normalizes a backend order.
    pub fn from_dto(dto: ProductionOrderDto) -> Self {
        let product_name = dto
            .produto
            .as_ref()
            .and_then(Related::object)
            .and_then(|p| p.nome.clone())
            .unwrap_or_default();
        OrderOption {
            id: dto.id,
            numero: dto.numero,
            lote: dto.lote,
            status: dto.status,
            product_name,
        }
    }

    /// "OP 123 • Produto • Lote L1 (aberta)"
    pub fn label(&self) -> String {
        format!(
            "OP {} • {} • Lote {} ({})",
            self.numero,
            self.product_name,
            self.lote,
            self.status.as_str()
        )
    }

    /// "OP 123 • Lote L1"
    pub fn number_and_lot(&self) -> String {
        format!("OP {} • Lote {}", self.numero, self.lote)
    }
}

/// Keeps the orders a weighing can be logged against, normalized.
pub fn open_orders(listing: Listing<ProductionOrderDto>) -> Vec<OrderOption> {
    listing
        .into_items()
        .into_iter()
        .filter(|o| o.status.accepts_weighings())
        .map(OrderOption::from_dto)
        .collect()
}

/// An order line item as the item picker shows it. Grams.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ItemOption {
    pub id: u64,
    pub material_name: String,
    pub material_code: String,
    pub required_grams: f64,
    pub weighed_grams: f64,
}

impl ItemOption {
    /// Normalizes a backend order item.
    pub fn from_dto(dto: OrderItemDto) -> Self {
        let material = dto.materia_prima.as_ref().and_then(Related::object);
        ItemOption {
            id: dto.id,
            material_name: material.and_then(|m| m.nome.clone()).unwrap_or_default(),
            material_code: material
                .and_then(|m| m.codigo_interno.clone())
                .unwrap_or_default(),
            required_grams: numeric_or_zero(&dto.quantidade_necessaria),
            weighed_grams: numeric_or_zero(&dto.quantidade_pesada),
        }
    }

    /// The requirement this item imposes on a new weighing.
    pub fn requirement(&self) -> ItemRequirement {
        ItemRequirement::new(self.required_grams, self.weighed_grams)
    }

    /// "MP-01 — Açúcar · nec 1.000 g · pes 200 g · rest 800 g"
    pub fn label(&self) -> String {
        let code = if self.material_code.is_empty() {
            String::new()
        } else {
            format!("{} — ", self.material_code)
        };
        let balance = self.requirement().balance();
        format!(
            "{}{} · nec {} · pes {} · rest {}",
            code,
            self.material_name,
            format_grams(balance.required_grams),
            format_grams(balance.weighed_grams),
            format_grams(balance.remaining_grams)
        )
    }

    /// Case-insensitive match on material name or code.
    pub fn matches(&self, query: &str) -> bool {
        if query.is_empty() {
            return true;
        }
        let needle = query.to_lowercase();
        self.material_name.to_lowercase().contains(&needle)
            || self.material_code.to_lowercase().contains(&needle)
    }
}

/// Normalizes the items of an OP.
pub fn order_items(listing: Listing<OrderItemDto>) -> Vec<ItemOption> {
    listing
        .into_items()
        .into_iter()
        .map(ItemOption::from_dto)
        .collect()
}

// =============================================================================
// Requirement
// =============================================================================

/// What the selected line item still needs, in grams.
///
/// Backend-authoritative; the validator only reads it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ItemRequirement {
    /// Total quantity the item needs (g).
    pub required_grams: f64,
    /// Quantity already recorded for the item (g).
    pub already_weighed_grams: f64,
}

impl ItemRequirement {
    /// Creates a requirement; negative inputs are clamped to zero.
    pub fn new(required_grams: f64, already_weighed_grams: f64) -> Self {
        ItemRequirement {
            required_grams: decimal_or_zero(required_grams).max(0.0),
            already_weighed_grams: decimal_or_zero(already_weighed_grams).max(0.0),
        }
    }

    /// Needed / weighed / remaining summary.
    pub fn balance(&self) -> ItemBalance {
        ItemBalance {
            required_grams: self.required_grams,
            weighed_grams: self.already_weighed_grams,
            remaining_grams: (self.required_grams - self.already_weighed_grams).max(0.0),
        }
    }
}

/// The "Saldo do Item" panel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ItemBalance {
    pub required_grams: f64,
    pub weighed_grams: f64,
    /// Never negative, even when over-weighed.
    pub remaining_grams: f64,
}

// =============================================================================
// Unit Tests
// =============================================================================
