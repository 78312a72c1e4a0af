//! Telegram notification configuration.

use serde::Deserialize;

const fn default_true() -> bool {
    true
}

/// Telegram notification configuration.
///
/// The bot token and chat id are secrets and only come from
/// `TELEGRAM_BOT_TOKEN` / `TELEGRAM_CHAT_ID`.
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramAppConfig {
    /// Enable telegram notifications.
    #[serde(default)]
    pub enabled: bool,
    /// Send a message per bet (can be noisy).
    #[serde(default)]
    pub notify_bets: bool,
    #[serde(default = "default_true")]
    pub notify_settlements: bool,
    #[serde(default = "default_true")]
    pub notify_withdrawals: bool,
    #[serde(skip)]
    pub bot_token: Option<String>,
    #[serde(skip)]
    pub chat_id: Option<i64>,
}

impl Default for TelegramAppConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            notify_bets: false,
            notify_settlements: default_true(),
            notify_withdrawals: default_true(),
            bot_token: None,
            chat_id: None,
        }
    }
}
