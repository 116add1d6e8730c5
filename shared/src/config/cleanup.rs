//! Expired refresh token sweep configuration

use serde::{Deserialize, Serialize};

/// Schedule for the expired refresh token sweep
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CleanupConfig {
    /// Whether the periodic sweep runs at all
    pub enabled: bool,

    /// Seconds between two sweeps
    pub interval_seconds: u64,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_seconds: 3600,
        }
    }
}
