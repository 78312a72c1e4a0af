//! Settlement sweeper configuration.

use serde::Deserialize;

const fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct SettlementConfig {
    /// Settle expired markets in the background.
    #[serde(default = "default_true")]
    pub sweep_enabled: bool,
    /// Seconds between sweeps (default: 30).
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

const fn default_sweep_interval_secs() -> u64 {
    30
}

impl Default for SettlementConfig {
    fn default() -> Self {
        Self {
            sweep_enabled: default_true(),
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}
