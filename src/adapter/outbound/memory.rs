//! In-memory balance store.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::domain::{Ton, UserId};
use crate::error::Result;
use crate::port::outbound::store::BalanceStore;

/// Balances held in process memory. Lost on restart.
#[derive(Debug, Default)]
pub struct MemoryBalanceStore {
    balances: RwLock<HashMap<UserId, Ton>>,
}

impl MemoryBalanceStore {
    /// Create a new empty memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of users with a balance record.
    #[must_use]
    pub fn len(&self) -> usize {
        self.balances.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.balances.read().is_empty()
    }
}

#[async_trait]
impl BalanceStore for MemoryBalanceStore {
    async fn balance(&self, user_id: &UserId) -> Result<Option<Ton>> {
        Ok(self.balances.read().get(user_id).copied())
    }

    async fn set_balance(&self, user_id: &UserId, amount: Ton) -> Result<()> {
        self.balances.write().insert(user_id.clone(), amount);
        Ok(())
    }
}
