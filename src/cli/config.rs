//! Handler for the `config` command group.

use std::fs;
use std::path::Path;

use crate::cli::{output, ConfigPathArg};
use crate::error::{ConfigError, Result};
use crate::infrastructure::config::store::StoreBackend;
use crate::infrastructure::Config;

/// Default config template with documentation.
const CONFIG_TEMPLATE: &str = include_str!("../../config.toml.example");

/// Execute `config init`.
pub fn execute_init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(ConfigError::InvalidValue {
            field: "config",
            reason: "file already exists (use --force to overwrite)".to_string(),
        }
        .into());
    }

    fs::write(path, CONFIG_TEMPLATE)?;
    output::section("Config Initialized");
    output::ok("Created configuration file");
    output::key_value("Path", path.display());
    output::section("Next Steps");
    output::note(&format!("1. Edit {} with your settings", path.display()));
    output::note(&format!(
        "2. Run: tonmarket config validate -c {}",
        path.display()
    ));
    output::note(&format!("3. Run: tonmarket run -c {}", path.display()));
    Ok(())
}

/// Execute `config show`.
pub fn execute_show(arg: &ConfigPathArg) -> Result<()> {
    let config = arg.load()?;
    output::section("Effective Configuration");
    output::key_value("Source", arg.display());
    print_summary(&config);
    Ok(())
}

/// Execute `config validate`.
pub fn execute_validate(arg: &ConfigPathArg) -> Result<()> {
    let config = arg.load()?;
    output::ok(&format!("Configuration is valid: {}", arg.display()));
    if config.store.backend == StoreBackend::Memory {
        output::warn("Balances are kept in memory and lost on exit");
    }
    if config.price.http.is_none() && config.price.defaults.is_empty() {
        output::warn("No live or default price source; unlisted assets settle as draws");
    }
    Ok(())
}

fn print_summary(config: &Config) {
    output::section("Store");
    output::key_value("Backend", format!("{:?}", config.store.backend));
    if config.store.backend == StoreBackend::Sqlite {
        output::key_value("Database", &config.store.database_path);
    }

    output::section("Withdrawals");
    output::key_value("Fee rate", config.withdrawal.fee_rate);
    output::key_value("Daily limit", format!("{} TON", config.withdrawal.daily_limit_ton));
    output::key_value(
        "Monthly limit",
        format!("{} TON", config.withdrawal.monthly_limit_ton),
    );

    output::section("Markets");
    output::key_value("Assets", config.markets.assets.join(", "));
    output::key_value(
        "Max expiry",
        format!("{} min", config.markets.max_expiry_minutes),
    );
    output::key_value(
        "Sweep",
        if config.settlement.sweep_enabled {
            format!("every {}s", config.settlement.sweep_interval_secs)
        } else {
            "disabled".to_string()
        },
    );

    output::section("Price Index");
    for (asset, value) in &config.price.fixed {
        output::key_value(&format!("Fixed {asset}"), value);
    }
    match &config.price.http {
        Some(http) => output::key_value("HTTP", &http.url_template),
        None => output::key_value("HTTP", "disabled"),
    }
    for (asset, value) in &config.price.defaults {
        output::key_value(&format!("Default {asset}"), value);
    }

    output::section("Telegram");
    output::key_value("Enabled", config.telegram.enabled);
    output::key_value("Bot token", if config.telegram.bot_token.is_some() { "set" } else { "unset" });
}
