//! Persistence port for user balances.

use async_trait::async_trait;

use crate::domain::{Ton, UserId};
use crate::error::Result;

/// Narrow get/set interface the ledger keeps balances behind.
///
/// # Implementation Notes
///
/// - Implementations must be thread-safe (`Send + Sync`)
/// - The store performs no validation; the ledger serializes access per
///   user and never writes a negative amount
#[async_trait]
pub trait BalanceStore: Send + Sync {
    /// Current balance, or `None` if the user has never been seen.
    async fn balance(&self, user_id: &UserId) -> Result<Option<Ton>>;

    /// Overwrite the balance for a user, creating the record if needed.
    async fn set_balance(&self, user_id: &UserId, amount: Ton) -> Result<()>;
}
