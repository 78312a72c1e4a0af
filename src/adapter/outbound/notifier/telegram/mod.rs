//! Telegram notifications for ledger events.

mod format;

pub mod notifier;

pub use notifier::{TelegramConfig, TelegramNotifier};
