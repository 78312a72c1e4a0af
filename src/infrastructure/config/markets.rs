//! Prediction market configuration.

use serde::Deserialize;

use crate::application::market::{MarketRules, DEFAULT_MAX_EXPIRY_MINUTES};
use crate::domain::Asset;

#[derive(Debug, Clone, Deserialize)]
pub struct MarketsConfig {
    /// Assets markets may be opened on (default: TON, GIFTS).
    #[serde(default = "default_assets")]
    pub assets: Vec<String>,
    /// Longest allowed expiry in minutes (default: 10080, one week).
    #[serde(default = "default_max_expiry_minutes")]
    pub max_expiry_minutes: i64,
}

fn default_assets() -> Vec<String> {
    vec!["TON".into(), "GIFTS".into()]
}

const fn default_max_expiry_minutes() -> i64 {
    DEFAULT_MAX_EXPIRY_MINUTES
}

impl MarketsConfig {
    #[must_use]
    pub fn rules(&self) -> MarketRules {
        MarketRules {
            allowed_assets: self.assets.iter().map(Asset::new).collect(),
            max_expiry_minutes: self.max_expiry_minutes,
        }
    }
}

impl Default for MarketsConfig {
    fn default() -> Self {
        Self {
            assets: default_assets(),
            max_expiry_minutes: default_max_expiry_minutes(),
        }
    }
}
