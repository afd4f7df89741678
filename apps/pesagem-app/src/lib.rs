//! # Pesagem App Library
//!
//! State and commands behind the "Nova Pesagem" and edit screens.
//! The browser frontend owns HTTP and rendering; this crate owns the form,
//! the rules applied to it and the request bodies it produces.
//!
//! ## Module Organization
//! ```text
//! pesagem_app/
//! ├── lib.rs          ◄─── You are here (startup, tracing)
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── form.rs     ◄─── Weighing form state
//! │   └── config.rs   ◄─── Configuration state
//! ├── commands/
//! │   ├── mod.rs      ◄─── Command exports
//! │   ├── order.rs    ◄─── OP / item selection commands
//! │   ├── weighing.rs ◄─── Preview / submit / label commands
//! │   └── edit.rs     ◄─── Edit screen commands
//! └── error.rs        ◄─── API error type for commands
//! ```

pub mod commands;
pub mod error;
pub mod state;

use tracing::info;
use tracing_subscriber::EnvFilter;

use state::{AppConfig, FormState};

/// Everything a screen needs: the shared form and the configuration.
#[derive(Debug, Clone)]
pub struct App {
    pub form: FormState,
    pub config: AppConfig,
}

impl App {
    /// Builds the app around a configuration.
    pub fn new(config: AppConfig) -> Self {
        App {
            form: FormState::new(config.operator.clone()),
            config,
        }
    }

    /// Startup: logging, configuration from the environment, empty form.
    ///
    /// ## Startup Sequence
    /// ```text
    /// ┌─────────────────────────────────────────────────────────────────────────┐
    /// │  1. Initialize Logging ───────────────────────────────────────────────► │
    /// │     • tracing-subscriber with env filter                                │
    /// │     • Default: INFO, can be overridden with RUST_LOG                    │
    /// │                                                                         │
    /// │  2. Load Configuration ───────────────────────────────────────────────► │
    /// │     • PESAGEM_* environment variables over defaults                     │
    /// │                                                                         │
    /// │  3. Initialize State ─────────────────────────────────────────────────► │
    /// │     • FormState: empty form for the configured operator                 │
    /// └─────────────────────────────────────────────────────────────────────────┘
    /// ```
    pub fn bootstrap() -> Self {
        init_tracing();

        let config = AppConfig::from_env();
        info!(
            tolerance = %config.tolerance_rate().percentage_label(),
            timezone = %config.timezone,
            api_base_url = %config.api_base_url,
            "Starting Pesagem"
        );

        App::new(config)
    }
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=pesagem_app=trace` - Show trace for this crate only
/// - Default: INFO, DEBUG for pesagem crates
///
/// Safe to call more than once; later calls keep the first subscriber.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,pesagem_app=debug,pesagem_core=debug"));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
