//! Balance store that can be told to fail a write.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::adapter::outbound::memory::MemoryBalanceStore;
use crate::domain::{Ton, UserId};
use crate::error::{Error, Result};
use crate::port::outbound::store::BalanceStore;

/// Memory store whose `n`-th write from now fails once.
#[derive(Debug, Default)]
pub struct FlakyBalanceStore {
    inner: MemoryBalanceStore,
    writes: AtomicUsize,
    fail_at: AtomicUsize,
}

impl FlakyBalanceStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the `n`-th write after this call (1-based). Later writes succeed.
    pub fn fail_write(&self, n: usize) {
        let done = self.writes.load(Ordering::SeqCst);
        self.fail_at.store(done + n, Ordering::SeqCst);
    }

    /// Writes attempted so far, failed ones included.
    #[must_use]
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BalanceStore for FlakyBalanceStore {
    async fn balance(&self, user_id: &UserId) -> Result<Option<Ton>> {
        self.inner.balance(user_id).await
    }

    async fn set_balance(&self, user_id: &UserId, amount: Ton) -> Result<()> {
        let n = self.writes.fetch_add(1, Ordering::SeqCst) + 1;
        if n == self.fail_at.load(Ordering::SeqCst) {
            return Err(Error::Database(format!("write {n} refused")));
        }
        self.inner.set_balance(user_id, amount).await
    }
}
