//! Notification adapters.
//!
//! Implements the `port::outbound::notifier::Notifier` trait for external
//! notification backends.

#[cfg(feature = "telegram")]
pub mod telegram;
