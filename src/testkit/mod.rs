//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`clock`] - [`ManualClock`], a clock tests move by hand.
//! - [`price`] - [`ScriptedIndexProvider`], per-asset index values set by tests.
//! - [`notifier`] - [`RecordingNotifier`], keeps every event for assertions.
//! - [`store`] - [`FlakyBalanceStore`], fails a chosen write.
//! - [`config`] - Canonical market rules and withdrawal policy.
//! - [`domain`] - Builders for domain primitives.
//! - [`engine`] - [`TestEngine`](engine::TestEngine), a fully wired engine on memory storage.

pub mod clock;
pub mod config;
pub mod domain;
pub mod engine;
pub mod notifier;
pub mod price;
pub mod store;

pub use clock::ManualClock;
pub use notifier::RecordingNotifier;
pub use price::ScriptedIndexProvider;
pub use store::FlakyBalanceStore;
