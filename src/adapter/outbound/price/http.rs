//! JSON-over-HTTP index source.
//!
//! The endpoint is a URL template with an `{id}` placeholder, and the value
//! is read with a JSON pointer using the same placeholder. With the defaults
//! this reads a USD market capitalization from a CoinGecko-style
//! `simple/price` endpoint.

use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::debug;

use crate::domain::Asset;
use crate::error::{PriceError, Result};
use crate::port::outbound::price::PriceIndexProvider;

/// Settings for [`HttpIndexProvider`].
#[derive(Debug, Clone)]
pub struct HttpIndexConfig {
    /// Request URL with an `{id}` placeholder.
    pub url_template: String,
    /// JSON pointer to the value, with an `{id}` placeholder.
    pub pointer_template: String,
    /// Asset symbol to source-specific identifier.
    pub ids: HashMap<Asset, String>,
    pub timeout: Duration,
}

/// Looks up an index over HTTP.
pub struct HttpIndexProvider {
    client: Client,
    config: HttpIndexConfig,
}

impl HttpIndexProvider {
    /// Build the provider, checking that the URL template is well formed.
    ///
    /// # Errors
    /// Returns an error if the template does not parse as a URL or the
    /// HTTP client cannot be built.
    pub fn new(config: HttpIndexConfig) -> Result<Self> {
        url::Url::parse(&config.url_template.replace("{id}", "sample"))?;
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    fn source_id(&self, asset: &Asset) -> std::result::Result<&str, PriceError> {
        self.config
            .ids
            .get(asset)
            .map(String::as_str)
            .ok_or_else(|| PriceError::NoSource {
                asset: asset.to_string(),
            })
    }
}

#[async_trait]
impl PriceIndexProvider for HttpIndexProvider {
    async fn query(&self, asset: &Asset) -> std::result::Result<Decimal, PriceError> {
        let id = self.source_id(asset)?;
        let url = self.config.url_template.replace("{id}", id);
        let unavailable = |reason: String| PriceError::Unavailable {
            asset: asset.to_string(),
            reason,
        };

        debug!(asset = %asset, url = %url, "Querying price index");

        let body: Value = self
            .client
            .get(&url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| unavailable(e.to_string()))?
            .json()
            .await
            .map_err(|e| unavailable(e.to_string()))?;

        let pointer = self.config.pointer_template.replace("{id}", id);
        parse_index(&body, &pointer).map_err(|reason| PriceError::Malformed {
            asset: asset.to_string(),
            reason,
        })
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

/// Read a non-negative decimal at `pointer`, accepting numbers or numeric strings.
///
/// # Errors
/// Returns a description of what was wrong with the document.
pub fn parse_index(body: &Value, pointer: &str) -> std::result::Result<Decimal, String> {
    let raw = match body.pointer(pointer) {
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => return Err(format!("value at {pointer} is not numeric: {other}")),
        None => return Err(format!("no value at {pointer}")),
    };
    let value = Decimal::from_str(&raw)
        .or_else(|_| Decimal::from_scientific(&raw))
        .map_err(|e| format!("cannot parse '{raw}': {e}"))?;
    if value.is_sign_negative() {
        return Err(format!("negative index {value}"));
    }
    Ok(value)
}
