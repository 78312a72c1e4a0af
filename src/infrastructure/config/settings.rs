//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all application settings.
//! Configuration is loaded from a TOML file, then environment variables
//! override individual values and supply the secrets.
//!
//! # Example
//!
//! ```no_run
//! use tonmarket::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::path::Path;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Deserialize;

use super::logging::LoggingConfig;
use super::markets::MarketsConfig;
use super::price::PriceConfig;
use super::settlement::SettlementConfig;
use super::store::{StoreBackend, StoreConfig};
use super::telegram::TelegramAppConfig;
use super::withdrawal::WithdrawalConfig;
use crate::error::{ConfigError, Result};

/// Asset class valued by `FIXED_INDEX_VALUE` when `FIXED_INDEX_ASSET` is unset.
const DEFAULT_FIXED_INDEX_ASSET: &str = "GIFTS";

/// Main application configuration.
///
/// Every section is optional; an empty file yields the defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Where balances are kept.
    #[serde(default)]
    pub store: StoreConfig,

    /// Withdrawal fee rate and rolling limits.
    #[serde(default)]
    pub withdrawal: WithdrawalConfig,

    /// Allowed assets and expiry bounds.
    #[serde(default)]
    pub markets: MarketsConfig,

    #[serde(default)]
    pub settlement: SettlementConfig,

    /// Price index sources.
    #[serde(default)]
    pub price: PriceConfig,

    /// Telegram notification configuration.
    #[serde(default)]
    pub telegram: TelegramAppConfig,
}

impl Config {
    /// Parse configuration from TOML content, apply environment overrides
    /// and validate.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed, an override does not parse
    /// or validation fails.
    pub fn parse_toml(content: &str) -> Result<Self> {
        Self::parse_with(content, |key| std::env::var(key).ok())
    }

    /// Like [`Config::parse_toml`] with an explicit variable lookup.
    pub fn parse_with(content: &str, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.apply_overrides(lookup)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The TOML content is malformed
    /// - Validation fails
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Apply environment-style overrides read through `lookup`.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(v) = lookup("WITHDRAW_FEE_RATE") {
            self.withdrawal.fee_rate = parse_decimal("WITHDRAW_FEE_RATE", &v)?;
        }
        if let Some(v) = lookup("WITHDRAW_DAILY_LIMIT_TON") {
            self.withdrawal.daily_limit_ton = parse_decimal("WITHDRAW_DAILY_LIMIT_TON", &v)?;
        }
        if let Some(v) = lookup("WITHDRAW_MONTHLY_LIMIT_TON") {
            self.withdrawal.monthly_limit_ton = parse_decimal("WITHDRAW_MONTHLY_LIMIT_TON", &v)?;
        }
        if let Some(v) = lookup("PREDICTION_ASSETS") {
            self.markets.assets = v
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
        }
        if let Some(v) = lookup("FIXED_INDEX_VALUE") {
            let value = parse_decimal("FIXED_INDEX_VALUE", &v)?;
            let asset = lookup("FIXED_INDEX_ASSET")
                .map(|a| a.trim().to_ascii_uppercase())
                .filter(|a| !a.is_empty())
                .unwrap_or_else(|| DEFAULT_FIXED_INDEX_ASSET.to_string());
            self.price.fixed.insert(asset, value);
        }
        if let Some(v) = lookup("DATABASE_PATH") {
            self.store.backend = StoreBackend::Sqlite;
            self.store.database_path = v;
        }
        if let Some(v) = lookup("TELEGRAM_BOT_TOKEN") {
            self.telegram.bot_token = Some(v);
        }
        if let Some(v) = lookup("TELEGRAM_CHAT_ID") {
            let chat_id = v.trim().parse().map_err(|_| ConfigError::InvalidValue {
                field: "TELEGRAM_CHAT_ID",
                reason: format!("'{v}' is not an integer chat id"),
            })?;
            self.telegram.chat_id = Some(chat_id);
        }
        Ok(())
    }

    /// Validate configuration values.
    ///
    /// Checks that all required fields are present and values are within
    /// acceptable ranges.
    pub fn validate(&self) -> Result<()> {
        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(invalid("logging.format", "must be 'pretty' or 'json'"));
        }

        let w = &self.withdrawal;
        if w.fee_rate < Decimal::ZERO || w.fee_rate >= Decimal::ONE {
            return Err(invalid("withdrawal.fee_rate", "must be in [0, 1)"));
        }
        if w.daily_limit_ton <= Decimal::ZERO {
            return Err(invalid("withdrawal.daily_limit_ton", "must be greater than 0"));
        }
        if w.monthly_limit_ton <= Decimal::ZERO {
            return Err(invalid("withdrawal.monthly_limit_ton", "must be greater than 0"));
        }

        if self.markets.assets.is_empty() {
            return Err(invalid("markets.assets", "at least one asset is required"));
        }
        if self.markets.assets.iter().any(|a| a.trim().is_empty()) {
            return Err(invalid("markets.assets", "asset symbols must not be empty"));
        }
        if self.markets.max_expiry_minutes < 1 {
            return Err(invalid("markets.max_expiry_minutes", "must be at least 1"));
        }

        if self.settlement.sweep_interval_secs == 0 {
            return Err(invalid("settlement.sweep_interval_secs", "must be greater than 0"));
        }

        let negative = |values: &std::collections::BTreeMap<String, Decimal>| {
            values.values().any(|v| v.is_sign_negative() && !v.is_zero())
        };
        if negative(&self.price.fixed) {
            return Err(invalid("price.fixed", "index values must not be negative"));
        }
        if negative(&self.price.defaults) {
            return Err(invalid("price.defaults", "index values must not be negative"));
        }
        if let Some(http) = &self.price.http {
            if !http.url_template.contains("{id}") {
                return Err(invalid("price.http.url_template", "must contain {id}"));
            }
            url::Url::parse(&http.url_template.replace("{id}", "sample"))
                .map_err(|e| invalid("price.http.url_template", &e.to_string()))?;
            if !http.pointer_template.starts_with('/') {
                return Err(invalid("price.http.pointer_template", "must be a JSON pointer"));
            }
            if http.timeout_secs == 0 {
                return Err(invalid("price.http.timeout_secs", "must be greater than 0"));
            }
        }

        if self.store.backend == StoreBackend::Sqlite && self.store.database_path.trim().is_empty()
        {
            return Err(ConfigError::MissingField {
                field: "store.database_path",
            }
            .into());
        }

        if self.telegram.enabled {
            if self.telegram.bot_token.is_none() {
                return Err(ConfigError::MissingField {
                    field: "TELEGRAM_BOT_TOKEN",
                }
                .into());
            }
            if self.telegram.chat_id.is_none() {
                return Err(ConfigError::MissingField {
                    field: "TELEGRAM_CHAT_ID",
                }
                .into());
            }
        }
        Ok(())
    }

    /// Initialize logging with the configured settings.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}

fn parse_decimal(field: &'static str, raw: &str) -> Result<Decimal> {
    Decimal::from_str(raw.trim()).map_err(|e| {
        ConfigError::InvalidValue {
            field,
            reason: format!("'{raw}' is not a decimal ({e})"),
        }
        .into()
    })
}

fn invalid(field: &'static str, reason: &str) -> crate::error::Error {
    ConfigError::InvalidValue {
        field,
        reason: reason.to_string(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    fn parse(content: &str, vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Config::parse_with(content, |key| vars.get(key).cloned())
    }

    fn invalid_field(err: Error) -> &'static str {
        match err {
            Error::Config(ConfigError::InvalidValue { field, .. }) => field,
            Error::Config(ConfigError::MissingField { field }) => field,
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_file_yields_defaults() {
        let config = parse("", &[]).unwrap();
        assert_eq!(config.withdrawal.fee_rate, dec!(0.01));
        assert_eq!(config.withdrawal.daily_limit_ton, dec!(500));
        assert_eq!(config.markets.assets, vec!["TON", "GIFTS"]);
        assert_eq!(config.markets.max_expiry_minutes, 10080);
        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert!(config.price.http.is_none());
        assert!(!config.telegram.enabled);
    }

    #[test]
    fn toml_sections_are_read() {
        let config = parse(
            r#"
            [withdrawal]
            fee_rate = "0.02"
            daily_limit_ton = 100

            [markets]
            assets = ["ton"]

            [price.fixed]
            GIFTS = 1000

            [price.http]
            pointer_template = "/{id}/usd"
            "#,
            &[],
        )
        .unwrap();

        assert_eq!(config.withdrawal.fee_rate, dec!(0.02));
        assert_eq!(config.withdrawal.daily_limit_ton, dec!(100));
        assert_eq!(config.withdrawal.monthly_limit_ton, dec!(5000));
        assert_eq!(config.price.fixed.get("GIFTS"), Some(&dec!(1000)));
        let http = config.price.http.unwrap();
        assert_eq!(http.pointer_template, "/{id}/usd");
        assert!(http.url_template.contains("{id}"));
    }

    #[test]
    fn environment_overrides_file_values() {
        let config = parse(
            "[withdrawal]\nfee_rate = \"0.05\"\n",
            &[
                ("WITHDRAW_FEE_RATE", "0.015"),
                ("WITHDRAW_MONTHLY_LIMIT_TON", "9000"),
                ("PREDICTION_ASSETS", "ton, gifts ,NOT"),
                ("FIXED_INDEX_VALUE", "1234.5"),
                ("DATABASE_PATH", "/tmp/ledger.db"),
            ],
        )
        .unwrap();

        assert_eq!(config.withdrawal.fee_rate, dec!(0.015));
        assert_eq!(config.withdrawal.monthly_limit_ton, dec!(9000));
        assert_eq!(config.markets.assets, vec!["ton", "gifts", "NOT"]);
        assert_eq!(config.price.fixed.get("GIFTS"), Some(&dec!(1234.5)));
        assert_eq!(config.store.backend, StoreBackend::Sqlite);
        assert_eq!(config.store.database_path, "/tmp/ledger.db");
    }

    #[test]
    fn fixed_index_asset_is_configurable() {
        let config = parse(
            "",
            &[("FIXED_INDEX_ASSET", "stars"), ("FIXED_INDEX_VALUE", "7")],
        )
        .unwrap();
        assert_eq!(config.price.fixed.get("STARS"), Some(&dec!(7)));
    }

    #[test]
    fn bad_override_names_the_variable() {
        let err = parse("", &[("WITHDRAW_DAILY_LIMIT_TON", "lots")]).unwrap_err();
        assert_eq!(invalid_field(err), "WITHDRAW_DAILY_LIMIT_TON");
    }

    #[test]
    fn validation_rejects_out_of_range_values() {
        let cases = [
            ("[withdrawal]\nfee_rate = 1\n", "withdrawal.fee_rate"),
            ("[withdrawal]\ndaily_limit_ton = 0\n", "withdrawal.daily_limit_ton"),
            ("[markets]\nassets = []\n", "markets.assets"),
            ("[markets]\nmax_expiry_minutes = 0\n", "markets.max_expiry_minutes"),
            ("[settlement]\nsweep_interval_secs = 0\n", "settlement.sweep_interval_secs"),
            ("[logging]\nformat = \"xml\"\n", "logging.format"),
            (
                "[price.http]\nurl_template = \"https://example.com/price\"\n",
                "price.http.url_template",
            ),
        ];
        for (content, field) in cases {
            let err = parse(content, &[]).unwrap_err();
            assert_eq!(invalid_field(err), field, "for {content:?}");
        }
    }

    #[test]
    fn telegram_requires_secrets_from_environment() {
        let err = parse("[telegram]\nenabled = true\n", &[]).unwrap_err();
        assert_eq!(invalid_field(err), "TELEGRAM_BOT_TOKEN");

        let config = parse(
            "[telegram]\nenabled = true\n",
            &[("TELEGRAM_BOT_TOKEN", "t"), ("TELEGRAM_CHAT_ID", "-100")],
        )
        .unwrap();
        assert_eq!(config.telegram.chat_id, Some(-100));
    }

    #[test]
    fn unknown_sections_are_rejected() {
        assert!(matches!(
            parse("[ledger]\nmode = \"strict\"\n", &[]).unwrap_err(),
            Error::Config(ConfigError::Parse(_))
        ));
    }
}
