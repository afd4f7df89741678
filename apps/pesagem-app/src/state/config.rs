//! # Configuration State
//!
//! Application configuration loaded at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`PESAGEM_*`)
//! 2. Defaults (this file)
//!
//! ## Thread Safety
//! Configuration is read-only after initialization, so no mutex needed.

use pesagem_core::tolerance::ToleranceRate;
use pesagem_core::units::parse_decimal_strict;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Default backend root the external HTTP client talks to.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";

/// Timezone the plant displays timestamps in.
pub const DEFAULT_TIMEZONE: &str = "America/Fortaleza";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    /// Weighing tolerance in basis points (500 = ±5%).
    pub tolerance_bps: u32,

    /// Operator name pre-filled in the "Pesador" field.
    pub operator: String,

    /// Display timezone (IANA name).
    pub timezone: String,

    /// REST backend root, handed to the HTTP client.
    pub api_base_url: String,
}

impl Default for AppConfig {
    /// ## Default Values
    /// - Tolerance: ±5%
    /// - Operator: none (filled after login)
    /// - Timezone: America/Fortaleza
    /// - Backend: local development server
    fn default() -> Self {
        AppConfig {
            tolerance_bps: ToleranceRate::default().bps(),
            operator: String::new(),
            timezone: DEFAULT_TIMEZONE.to_string(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
        }
    }
}

impl AppConfig {
    /// Creates a config from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `PESAGEM_TOLERANCE_PERCENT`: tolerance from 0 to 100, e.g. "5" or "2,5"
    /// - `PESAGEM_OPERATOR`: operator display name
    /// - `PESAGEM_TIMEZONE`: display timezone
    /// - `PESAGEM_API_BASE_URL`: backend root URL
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`AppConfig::from_env`] with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = AppConfig::default();

        if let Some(raw) = lookup("PESAGEM_TOLERANCE_PERCENT") {
            match parse_decimal_strict("PESAGEM_TOLERANCE_PERCENT", &raw) {
                Ok(pct) if (0.0..=100.0).contains(&pct) => {
                    config.tolerance_bps = ToleranceRate::from_percentage(pct).bps();
                }
                _ => warn!(value = %raw, "Ignoring invalid tolerance, keeping default"),
            }
        }

        if let Some(operator) = lookup("PESAGEM_OPERATOR") {
            config.operator = operator.trim().to_string();
        }

        if let Some(timezone) = lookup("PESAGEM_TIMEZONE").filter(|s| !s.trim().is_empty()) {
            config.timezone = timezone;
        }

        if let Some(url) = lookup("PESAGEM_API_BASE_URL").filter(|s| !s.trim().is_empty()) {
            config.api_base_url = url.trim_end_matches('/').to_string();
        }

        config
    }

    /// The configured tolerance.
    #[inline]
    pub fn tolerance_rate(&self) -> ToleranceRate {
        ToleranceRate::from_bps(self.tolerance_bps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup(&[]));
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.tolerance_rate().bps(), 500);
        assert_eq!(config.timezone, "America/Fortaleza");
    }

    #[test]
    fn test_tolerance_override_accepts_decimal_comma() {
        let config = AppConfig::from_lookup(lookup(&[("PESAGEM_TOLERANCE_PERCENT", "2,5")]));
        assert_eq!(config.tolerance_bps, 250);
    }

    #[test]
    fn test_invalid_tolerance_keeps_default() {
        // "2.5" reads as grouped digits, not a decimal point
        for raw in ["abc", "-3", "", "2.5", "1.234.5", "150"] {
            let config = AppConfig::from_lookup(lookup(&[("PESAGEM_TOLERANCE_PERCENT", raw)]));
            assert_eq!(config.tolerance_bps, 500, "raw '{}'", raw);
        }
    }

    #[test]
    fn test_string_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            ("PESAGEM_OPERATOR", "  Maria Souza "),
            ("PESAGEM_API_BASE_URL", "https://pesagem.example.com/api/"),
        ]));
        assert_eq!(config.operator, "Maria Souza");
        assert_eq!(config.api_base_url, "https://pesagem.example.com/api");
    }
}
