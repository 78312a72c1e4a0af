//! Price index source configuration.
//!
//! Lookups go to a fixed value when one is configured for the asset, then
//! to the HTTP source, then to a static default.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PriceConfig {
    /// Assets always valued at a constant, e.g. `GIFTS = 1000`.
    #[serde(default)]
    pub fixed: BTreeMap<String, Decimal>,
    /// Live lookup; omit to disable.
    #[serde(default)]
    pub http: Option<HttpPriceConfig>,
    /// Last-resort values when the live lookup fails.
    #[serde(default)]
    pub defaults: BTreeMap<String, Decimal>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpPriceConfig {
    /// Request URL with an `{id}` placeholder.
    #[serde(default = "default_url_template")]
    pub url_template: String,
    /// JSON pointer to the value, with an `{id}` placeholder.
    #[serde(default = "default_pointer_template")]
    pub pointer_template: String,
    /// Asset symbol to source identifier.
    #[serde(default = "default_ids")]
    pub ids: BTreeMap<String, String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_url_template() -> String {
    "https://api.coingecko.com/api/v3/simple/price?ids={id}&vs_currencies=usd&include_market_cap=true"
        .to_string()
}

fn default_pointer_template() -> String {
    "/{id}/usd_market_cap".to_string()
}

fn default_ids() -> BTreeMap<String, String> {
    BTreeMap::from([("TON".to_string(), "the-open-network".to_string())])
}

const fn default_timeout_secs() -> u64 {
    10
}

impl Default for HttpPriceConfig {
    fn default() -> Self {
        Self {
            url_template: default_url_template(),
            pointer_template: default_pointer_template(),
            ids: default_ids(),
            timeout_secs: default_timeout_secs(),
        }
    }
}
