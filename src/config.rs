use crate::access::AccessGate;
use leptos::logging::{log, warn};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Application settings that are not part of the Leptos site options.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Sqlite file backing the server's key-value store.
    pub db_path: String,
    /// Simulated latency before a scan result is shown.
    pub scan_delay_ms: u32,
    pub access_gate: AccessGate,
}

/// The part of [`AppConfig`] the browser needs. The server renders it into the
/// page, since the browser has no environment to read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    pub scan_delay_ms: u32,
    pub access_gate: AccessGate,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: "tutorhub.db".to_string(),
            scan_delay_ms: 2000,
            access_gate: AccessGate::default(),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for ClientConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            scan_delay_ms: config.scan_delay_ms,
            access_gate: config.access_gate.clone(),
        }
    }
}

impl AppConfig {
    /// Reads `TUTORHUB_*` variables, keeping the default for anything unset
    /// or unparsable.
    #[cfg(feature = "ssr")]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let db_path = lookup("TUTORHUB_DB_PATH").unwrap_or_else(|| {
            log!("[CONFIG] TUTORHUB_DB_PATH not set, using {}", defaults.db_path);
            defaults.db_path.clone()
        });
        let scan_delay_ms = parse_or(&lookup, "TUTORHUB_SCAN_DELAY_MS", defaults.scan_delay_ms);
        let access_gate = match lookup("TUTORHUB_PREMIUM_PREFIXES") {
            Some(raw) => {
                let gate = AccessGate::new(raw.split(',').map(str::trim));
                if gate.premium_prefixes().is_empty() {
                    warn!(
                        "[CONFIG] TUTORHUB_PREMIUM_PREFIXES '{}' names no prefixes, using {:?}",
                        raw,
                        defaults.access_gate.premium_prefixes()
                    );
                    defaults.access_gate
                } else {
                    gate
                }
            }
            None => defaults.access_gate,
        };

        Self {
            db_path,
            scan_delay_ms,
            access_gate,
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + std::fmt::Display,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|err| {
            warn!("[CONFIG] Invalid {} value '{}': {}, using {}", key, raw, err, default);
            default
        }),
        None => default,
    }
}
