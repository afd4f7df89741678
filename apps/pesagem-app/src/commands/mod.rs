//! # Commands Module
//!
//! All commands exposed to the weighing frontend.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs       ◄─── You are here (exports)
//! ├── order.rs     ◄─── OP / item loading, selection, field edits
//! ├── weighing.rs  ◄─── Live preview, submission, label request
//! └── edit.rs      ◄─── Loading and saving an existing weighing
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Command Flow                                         │
//! │                                                                         │
//! │  Frontend                                                               │
//! │  ────────                                                               │
//! │  items = await http.get(`/registro/ops/${op}/itens/`)                   │
//! │  load_items(form, items)                                                │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  fn load_items(                                                         │
//! │      form: &FormState,        ◄── Shared form state                    │
//! │      listing: Listing<…>,     ◄── Raw backend JSON, normalized here    │
//! │  )                                                                      │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  preview_weighing(form, config) ──► WeighingScreen (JSON)               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Commands never perform HTTP themselves: the caller fetches, hands the
//! JSON in, and posts whatever request a command returns.

pub mod edit;
pub mod order;
pub mod weighing;
