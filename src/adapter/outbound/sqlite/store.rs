//! SQLite balance store implementation.
//!
//! Provides persistent storage for user balances using SQLite and Diesel ORM.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use rust_decimal::Decimal;

use super::database::connection::DbPool;
use super::database::model::BalanceRow;
use super::database::schema::balances;
use crate::domain::{Ton, UserId};
use crate::error::{Error, Result};
use crate::port::outbound::store::BalanceStore;

/// SQLite-backed balance store.
///
/// Implements the [`BalanceStore`] trait for durable balances.
pub struct SqliteBalanceStore {
    /// Database connection pool.
    pool: DbPool,
}

impl SqliteBalanceStore {
    /// Create a new SQLite balance store with the given connection pool.
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn parse_amount(row: &BalanceRow) -> Result<Ton> {
        Decimal::from_str(&row.amount).map_err(|e| {
            Error::Database(format!(
                "corrupt balance for {}: '{}' ({e})",
                row.user_id, row.amount
            ))
        })
    }
}

#[async_trait]
impl BalanceStore for SqliteBalanceStore {
    async fn balance(&self, user_id: &UserId) -> Result<Option<Ton>> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;

        let row: Option<BalanceRow> = balances::table
            .find(user_id.as_str())
            .select(BalanceRow::as_select())
            .first(&mut conn)
            .optional()
            .map_err(|e| Error::Database(e.to_string()))?;

        row.as_ref().map(Self::parse_amount).transpose()
    }

    async fn set_balance(&self, user_id: &UserId, amount: Ton) -> Result<()> {
        let row = BalanceRow {
            user_id: user_id.to_string(),
            amount: amount.normalize().to_string(),
            updated_at: Utc::now().to_rfc3339(),
        };
        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;

        diesel::replace_into(balances::table)
            .values(&row)
            .execute(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;

        Ok(())
    }
}
