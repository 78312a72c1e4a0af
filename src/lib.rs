//! Tonmarket - internal TON ledger, binary prediction markets and a
//! rate-limited withdrawal queue.
//!
//! Users hold a TON balance, bet on whether an asset's price index ends above
//! or below the level captured when a market opened, and withdraw to an
//! external address within daily and monthly limits.
//!
//! # Architecture
//!
//! The crate follows a ports-and-adapters layout:
//!
//! - [`domain`] - Markets, bets, settlement math, withdrawal windows
//! - [`application`] - Ledger, market registry, withdrawal desk and the
//!   [`Engine`](application::Engine) facade over them
//! - [`port`] - Inbound request surface and outbound interfaces (balance
//!   store, price index, clock, notifier)
//! - [`adapter`] - JSON-lines server, in-memory and SQLite stores, price
//!   providers, Telegram notifier
//! - [`infrastructure`] - Configuration and wiring
//! - [`cli`] - Command-line entry points
//!
//! # Features
//!
//! - `telegram` (default) - Telegram notifications
//! - `testkit` - Test doubles for integration tests
//!
//! # Example
//!
//! ```no_run
//! use tonmarket::infrastructure::bootstrap::build_engine;
//! use tonmarket::infrastructure::Config;
//!
//! # async fn demo() -> tonmarket::error::Result<()> {
//! let config = Config::load("config.toml")?;
//! let engine = build_engine(&config)?;
//! let balance = engine.balance(&"alice".into()).await?;
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod application;
pub mod cli;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
