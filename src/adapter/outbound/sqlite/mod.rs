//! SQLite persistence adapters.
//!
//! Provides the durable [`BalanceStore`](crate::port::outbound::store::BalanceStore)
//! implementation using Diesel ORM.

pub mod database;
pub mod store;

pub use store::SqliteBalanceStore;
