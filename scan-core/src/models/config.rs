use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Which camera the capture surface should prefer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacingMode {
    /// Front-facing.
    User,
    /// Rear-facing.
    Environment,
}

/// Static, process-wide configuration for scanning and history.
///
/// Every field has a default, so a partial TOML/JSON document deserializes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfiguration {
    /// Largest accepted upload in bytes (default: 5 MiB).
    pub max_file_size: u64,

    /// MIME types accepted by the upload surface.
    pub allowed_file_types: Vec<String>,

    /// History ledger cap. Appends beyond it evict the oldest entries.
    pub max_history_items: usize,

    /// How long a notification stays visible (front ends only).
    pub toast_duration_ms: u64,

    /// Input debounce (front ends only).
    pub debounce_ms: u64,

    /// Delay of the stand-in analyzer.
    pub analysis_delay_ms: u64,

    /// Camera preference passed to the capture surface.
    pub facing_mode: FacingMode,

    /// Key holding the serialized history in the key-value store.
    pub history_key: String,
}

impl ScanConfiguration {
    pub fn validate(&self) -> Result<(), String> {
        if self.max_history_items == 0 {
            return Err("max_history_items must be at least 1".into());
        }
        if self.max_file_size == 0 {
            return Err("max_file_size must be positive".into());
        }
        if self.allowed_file_types.is_empty() {
            return Err("allowed_file_types must not be empty".into());
        }
        if self.history_key.trim().is_empty() {
            return Err("history_key must not be empty".into());
        }
        Ok(())
    }

    pub fn is_allowed_type(&self, mime_type: &str) -> bool {
        self.allowed_file_types
            .iter()
            .any(|t| t.eq_ignore_ascii_case(mime_type))
    }

    pub fn analysis_delay(&self) -> Duration {
        Duration::from_millis(self.analysis_delay_ms)
    }
}

impl Default for ScanConfiguration {
    fn default() -> Self {
        Self {
            max_file_size: 5 * 1024 * 1024,
            allowed_file_types: vec![
                "image/jpeg".into(),
                "image/png".into(),
                "image/webp".into(),
            ],
            max_history_items: 20,
            toast_duration_ms: 3000,
            debounce_ms: 300,
            analysis_delay_ms: 2000,
            facing_mode: FacingMode::Environment,
            history_key: "scanHistory".into(),
        }
    }
}
