//! Database model types for Diesel ORM.

use diesel::prelude::*;

use super::schema::balances;

/// Database row for a user balance.
///
/// Amounts are stored as decimal text so no precision is lost to SQLite's
/// floating point column types.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = balances)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct BalanceRow {
    pub user_id: String,
    pub amount: String,
    pub updated_at: String,
}
