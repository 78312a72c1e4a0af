//! Composition root: turns a [`Config`] into a running [`Engine`].

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::adapter::outbound::memory::MemoryBalanceStore;
#[cfg(feature = "telegram")]
use crate::adapter::outbound::notifier::telegram::{TelegramConfig, TelegramNotifier};
use crate::adapter::outbound::price::{
    FallbackIndexProvider, FixedIndexProvider, HttpIndexConfig, HttpIndexProvider,
    RoutedIndexProvider,
};
use crate::adapter::outbound::sqlite::database::connection::open;
use crate::adapter::outbound::sqlite::SqliteBalanceStore;
use crate::application::{Engine, EngineParts};
use crate::domain::Asset;
use crate::error::Result;
use crate::infrastructure::config::price::PriceConfig;
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::config::store::{StoreBackend, StoreConfig};
use crate::port::outbound::clock::{Clock, SystemClock};
use crate::port::outbound::notifier::{LogNotifier, NotifierRegistry};
use crate::port::outbound::price::PriceIndexProvider;
use crate::port::outbound::store::BalanceStore;

/// Open the configured balance store, migrating SQLite if needed.
pub fn build_store(config: &StoreConfig) -> Result<Arc<dyn BalanceStore>> {
    match config.backend {
        StoreBackend::Memory => {
            info!("Using in-memory balance store");
            Ok(Arc::new(MemoryBalanceStore::new()))
        }
        StoreBackend::Sqlite => {
            let pool = open(&config.database_path)?;
            info!(path = %config.database_path, "Using SQLite balance store");
            Ok(Arc::new(SqliteBalanceStore::new(pool)))
        }
    }
}

/// Build the price chain.
///
/// Fixed values win for their asset; everything else goes to the HTTP
/// source when configured and falls back to the static defaults.
pub fn build_prices(config: &PriceConfig) -> Result<Arc<dyn PriceIndexProvider>> {
    let mut defaults = RoutedIndexProvider::new();
    for (asset, value) in &config.defaults {
        defaults = defaults.route(Asset::new(asset), Arc::new(FixedIndexProvider::new(*value)));
    }
    let defaults: Arc<dyn PriceIndexProvider> = Arc::new(defaults);

    let fallback: Arc<dyn PriceIndexProvider> = match &config.http {
        Some(http) => {
            let ids: HashMap<Asset, String> = http
                .ids
                .iter()
                .map(|(asset, id)| (Asset::new(asset), id.clone()))
                .collect();
            let live = HttpIndexProvider::new(HttpIndexConfig {
                url_template: http.url_template.clone(),
                pointer_template: http.pointer_template.clone(),
                ids,
                timeout: Duration::from_secs(http.timeout_secs),
            })?;
            info!(sources = http.ids.len(), "HTTP price index enabled");
            Arc::new(FallbackIndexProvider::new(vec![Arc::new(live), defaults]))
        }
        None => defaults,
    };

    let mut routed = RoutedIndexProvider::new().with_default(fallback);
    for (asset, value) in &config.fixed {
        info!(asset = %asset, value = %value, "Fixed price index");
        routed = routed.route(Asset::new(asset), Arc::new(FixedIndexProvider::new(*value)));
    }
    Ok(Arc::new(routed))
}

/// Build notifier registry from configuration.
#[cfg(feature = "telegram")]
pub fn build_notifiers(config: &Config) -> NotifierRegistry {
    let mut registry = NotifierRegistry::new();
    registry.register(Box::new(LogNotifier));

    let tg = &config.telegram;
    if let (true, Some(token), Some(chat_id)) = (tg.enabled, &tg.bot_token, tg.chat_id) {
        let tg_config = TelegramConfig {
            notify_bets: tg.notify_bets,
            notify_settlements: tg.notify_settlements,
            notify_withdrawals: tg.notify_withdrawals,
            ..TelegramConfig::new(token.clone(), chat_id)
        };
        registry.register(Box::new(TelegramNotifier::new(tg_config)));
        info!(chat_id, "Telegram notifier enabled");
    }
    registry
}

/// Build notifier registry from configuration (non-telegram variant).
#[cfg(not(feature = "telegram"))]
pub fn build_notifiers(config: &Config) -> NotifierRegistry {
    let mut registry = NotifierRegistry::new();
    registry.register(Box::new(LogNotifier));
    if config.telegram.enabled {
        tracing::warn!("Telegram enabled in config but the binary was built without it");
    }
    registry
}

/// Wire the engine on the system clock.
///
/// Must run inside a Tokio runtime when Telegram is enabled.
pub fn build_engine(config: &Config) -> Result<Engine> {
    build_engine_with_clock(config, Arc::new(SystemClock))
}

pub fn build_engine_with_clock(config: &Config, clock: Arc<dyn Clock>) -> Result<Engine> {
    Ok(Engine::new(EngineParts {
        store: build_store(&config.store)?,
        prices: build_prices(&config.price)?,
        clock,
        notifiers: build_notifiers(config),
        rules: config.markets.rules(),
        policy: config.withdrawal.policy(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::config::price::HttpPriceConfig;
    use rust_decimal_macros::dec;
    use std::collections::BTreeMap;

    #[tokio::test]
    async fn fixed_values_take_precedence_over_defaults() {
        let config = PriceConfig {
            fixed: BTreeMap::from([("GIFTS".to_string(), dec!(1000))]),
            http: None,
            defaults: BTreeMap::from([
                ("GIFTS".to_string(), dec!(1)),
                ("TON".to_string(), dec!(5)),
            ]),
        };
        let prices = build_prices(&config).unwrap();

        assert_eq!(prices.query(&Asset::from("GIFTS")).await.unwrap(), dec!(1000));
        assert_eq!(prices.query(&Asset::from("TON")).await.unwrap(), dec!(5));
        assert!(prices.query(&Asset::from("NOT")).await.is_err());
    }

    #[tokio::test]
    async fn unreachable_http_source_falls_back_to_defaults() {
        let config = PriceConfig {
            fixed: BTreeMap::new(),
            http: Some(HttpPriceConfig {
                url_template: "http://127.0.0.1:9/price/{id}".into(),
                timeout_secs: 1,
                ..HttpPriceConfig::default()
            }),
            defaults: BTreeMap::from([("TON".to_string(), dec!(7))]),
        };
        let prices = build_prices(&config).unwrap();

        assert_eq!(prices.query(&Asset::from("TON")).await.unwrap(), dec!(7));
    }

    #[test]
    fn sqlite_store_is_created_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("balances.db");
        let config = StoreConfig {
            backend: StoreBackend::Sqlite,
            database_path: path.to_string_lossy().into_owned(),
        };
        build_store(&config).unwrap();
        assert!(path.exists());
    }

    #[tokio::test]
    async fn engine_builds_from_default_config() {
        let engine = build_engine(&Config::default()).unwrap();
        assert!(engine.list_markets(None).await.is_empty());
    }
}
