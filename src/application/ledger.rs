//! Balance ledger.
//!
//! Every read-modify-write of a balance runs under that user's lock, so
//! concurrent debits can never both pass the sufficiency check against the
//! same snapshot. Composite operations take the lock once with
//! [`Ledger::lock`] and use the `*_locked` variants.

use std::sync::Arc;

use dashmap::DashMap;
use rust_decimal::Decimal;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::debug;

use crate::domain::{Ton, UserId};
use crate::error::{LedgerError, Result};
use crate::port::outbound::store::BalanceStore;

/// Proof that the holder owns a user's serialization scope.
pub struct UserGuard {
    user_id: UserId,
    _guard: OwnedMutexGuard<()>,
}

impl UserGuard {
    #[must_use]
    pub const fn user_id(&self) -> &UserId {
        &self.user_id
    }
}

/// Owns every balance; the only component allowed to change one.
pub struct Ledger {
    store: Arc<dyn BalanceStore>,
    locks: DashMap<UserId, Arc<Mutex<()>>>,
}

impl Ledger {
    #[must_use]
    pub fn new(store: Arc<dyn BalanceStore>) -> Self {
        Self {
            store,
            locks: DashMap::new(),
        }
    }

    /// Acquire the per-user lock.
    pub async fn lock(&self, user_id: &UserId) -> UserGuard {
        let mutex = self.locks.entry(user_id.clone()).or_default().clone();
        UserGuard {
            user_id: user_id.clone(),
            _guard: mutex.lock_owned().await,
        }
    }

    /// Current balance; zero for users never seen.
    pub async fn balance(&self, user_id: &UserId) -> Result<Ton> {
        Ok(self.store.balance(user_id).await?.unwrap_or(Decimal::ZERO))
    }

    /// Add `amount` to a balance and return the new balance.
    ///
    /// # Errors
    /// [`LedgerError::InvalidAmount`] if `amount` is negative or the new
    /// balance would leave the decimal range. Zero is a valid no-op credit.
    pub async fn credit(&self, user_id: &UserId, amount: Ton) -> Result<Ton> {
        let guard = self.lock(user_id).await;
        self.credit_locked(&guard, amount).await
    }

    /// Remove `amount` from a balance and return the new balance.
    ///
    /// # Errors
    /// [`LedgerError::InvalidAmount`] if `amount` is not positive,
    /// [`LedgerError::InsufficientBalance`] if it exceeds the balance.
    pub async fn debit(&self, user_id: &UserId, amount: Ton) -> Result<Ton> {
        let guard = self.lock(user_id).await;
        self.debit_locked(&guard, amount).await
    }

    pub async fn credit_locked(&self, guard: &UserGuard, amount: Ton) -> Result<Ton> {
        if amount < Decimal::ZERO {
            return Err(LedgerError::InvalidAmount { amount }.into());
        }
        let user_id = guard.user_id();
        let next = self
            .balance(user_id)
            .await?
            .checked_add(amount)
            .ok_or(LedgerError::InvalidAmount { amount })?;
        self.store.set_balance(user_id, next).await?;
        debug!(user_id = %user_id, amount = %amount, balance = %next, "Credited");
        Ok(next)
    }

    pub async fn debit_locked(&self, guard: &UserGuard, amount: Ton) -> Result<Ton> {
        if amount <= Decimal::ZERO {
            return Err(LedgerError::InvalidAmount { amount }.into());
        }
        let user_id = guard.user_id();
        let available = self.balance(user_id).await?;
        if available < amount {
            return Err(LedgerError::InsufficientBalance {
                user_id: user_id.clone(),
                available,
                requested: amount,
            }
            .into());
        }
        let next = available - amount;
        self.store.set_balance(user_id, next).await?;
        debug!(user_id = %user_id, amount = %amount, balance = %next, "Debited");
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::outbound::memory::MemoryBalanceStore;
    use crate::error::Error;
    use rust_decimal_macros::dec;

    fn ledger() -> Ledger {
        Ledger::new(Arc::new(MemoryBalanceStore::new()))
    }

    #[tokio::test]
    async fn unknown_user_has_zero_balance() {
        assert_eq!(ledger().balance(&UserId::from("ghost")).await.unwrap(), dec!(0));
    }

    #[tokio::test]
    async fn debit_then_credit_restores_balance() {
        let ledger = ledger();
        let user = UserId::from("alice");
        ledger.credit(&user, dec!(100)).await.unwrap();

        ledger.debit(&user, dec!(37.123456789)).await.unwrap();
        ledger.credit(&user, dec!(37.123456789)).await.unwrap();

        assert_eq!(ledger.balance(&user).await.unwrap(), dec!(100));
    }

    #[tokio::test]
    async fn credit_rejects_negative_and_accepts_zero() {
        let ledger = ledger();
        let user = UserId::from("alice");

        let err = ledger.credit(&user, dec!(-1)).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Ledger(LedgerError::InvalidAmount { .. })
        ));
        assert_eq!(ledger.credit(&user, dec!(0)).await.unwrap(), dec!(0));
    }

    #[tokio::test]
    async fn credit_past_decimal_range_is_refused() {
        let ledger = ledger();
        let user = UserId::from("alice");
        ledger.credit(&user, Decimal::MAX).await.unwrap();

        let err = ledger.credit(&user, dec!(1)).await.unwrap_err();
        assert_eq!(err.code(), "invalid_amount");
        assert_eq!(ledger.balance(&user).await.unwrap(), Decimal::MAX);
    }

    #[tokio::test]
    async fn debit_rejects_non_positive_amounts() {
        let ledger = ledger();
        let user = UserId::from("alice");
        ledger.credit(&user, dec!(5)).await.unwrap();

        for amount in [dec!(0), dec!(-3)] {
            let err = ledger.debit(&user, amount).await.unwrap_err();
            assert_eq!(err.code(), "invalid_amount");
        }
        assert_eq!(ledger.balance(&user).await.unwrap(), dec!(5));
    }

    #[tokio::test]
    async fn overdraft_is_refused_without_side_effects() {
        let ledger = ledger();
        let user = UserId::from("alice");
        ledger.credit(&user, dec!(10)).await.unwrap();

        let err = ledger.debit(&user, dec!(10.000000001)).await.unwrap_err();
        assert_eq!(err.code(), "insufficient_balance");
        assert_eq!(ledger.balance(&user).await.unwrap(), dec!(10));

        assert_eq!(ledger.debit(&user, dec!(10)).await.unwrap(), dec!(0));
    }

    #[tokio::test]
    async fn concurrent_debits_never_overdraw() {
        let ledger = Arc::new(ledger());
        let user = UserId::from("alice");
        ledger.credit(&user, dec!(10)).await.unwrap();

        let barrier = Arc::new(tokio::sync::Barrier::new(20));
        let mut handles = Vec::new();
        for _ in 0..20 {
            let ledger = ledger.clone();
            let user = user.clone();
            let barrier = barrier.clone();
            handles.push(tokio::spawn(async move {
                barrier.wait().await;
                ledger.debit(&user, dec!(1)).await.is_ok()
            }));
        }

        let mut succeeded = 0;
        for handle in handles {
            if handle.await.unwrap() {
                succeeded += 1;
            }
        }
        assert_eq!(succeeded, 10);
        assert_eq!(ledger.balance(&user).await.unwrap(), dec!(0));
    }

    #[tokio::test]
    async fn guard_scopes_several_steps() {
        let ledger = ledger();
        let user = UserId::from("alice");
        ledger.credit(&user, dec!(3)).await.unwrap();

        let guard = ledger.lock(&user).await;
        assert_eq!(guard.user_id(), &user);
        ledger.debit_locked(&guard, dec!(1)).await.unwrap();
        ledger.credit_locked(&guard, dec!(0.5)).await.unwrap();
        drop(guard);

        assert_eq!(ledger.balance(&user).await.unwrap(), dec!(2.5));
    }
}
