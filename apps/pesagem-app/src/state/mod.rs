//! # State Module
//!
//! Application state for the weighing screen.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────────────────┐        ┌──────────────────────────┐       │
//! │  │       FormState          │        │       AppConfig          │       │
//! │  │                          │        │                          │       │
//! │  │  Arc<Mutex<              │        │  tolerance_bps           │       │
//! │  │    WeighingForm          │        │  operator                │       │
//! │  │  >>                      │        │  timezone, api_base_url  │       │
//! │  └──────────────────────────┘        └──────────────────────────┘       │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • FormState: Protected by Arc<Mutex<T>> for exclusive access          │
//! │  • AppConfig: Read-only after initialization                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod form;

pub use config::{AppConfig, DEFAULT_API_BASE_URL, DEFAULT_TIMEZONE};
pub use form::{FormField, FormState, WeighingForm};
