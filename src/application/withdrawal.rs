//! Rate-limited withdrawal queue.
//!
//! A request is checked against the trailing daily and monthly usage,
//! debited and logged while the ledger's user lock is held, so two
//! concurrent requests from one user always see each other's reservation.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::info;

use crate::application::ledger::Ledger;
use crate::domain::withdrawal::WithdrawalLogEntry;
use crate::domain::{LimitsView, Ton, Usage, UserId, WindowUsage, WithdrawalId, WithdrawalRequest};
use crate::error::{Error, Result, WithdrawalError};
use crate::port::outbound::clock::Clock;
use crate::port::outbound::notifier::{Event, NotifierRegistry, WithdrawalEvent};

/// Fee and limits applied to every withdrawal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithdrawalPolicy {
    /// Fraction of the gross amount kept as fee, e.g. 0.01 = 1%.
    pub fee_rate: Decimal,
    pub daily_limit: Ton,
    pub monthly_limit: Ton,
}

impl Default for WithdrawalPolicy {
    fn default() -> Self {
        Self {
            fee_rate: dec!(0.01),
            daily_limit: dec!(500),
            monthly_limit: dec!(5000),
        }
    }
}

/// An accepted request together with the limits after it.
#[derive(Debug, Clone)]
pub struct WithdrawalReceipt {
    pub request: WithdrawalRequest,
    pub limits: LimitsView,
}

pub struct WithdrawalDesk {
    policy: WithdrawalPolicy,
    ledger: Arc<Ledger>,
    clock: Arc<dyn Clock>,
    notifiers: Arc<NotifierRegistry>,
    log: Mutex<HashMap<UserId, Vec<WithdrawalLogEntry>>>,
    queue: RwLock<BTreeMap<WithdrawalId, WithdrawalRequest>>,
    next_id: AtomicU64,
}

impl WithdrawalDesk {
    #[must_use]
    pub fn new(
        policy: WithdrawalPolicy,
        ledger: Arc<Ledger>,
        clock: Arc<dyn Clock>,
        notifiers: Arc<NotifierRegistry>,
    ) -> Self {
        Self {
            policy,
            ledger,
            clock,
            notifiers,
            log: Mutex::new(HashMap::new()),
            queue: RwLock::new(BTreeMap::new()),
            next_id: AtomicU64::new(0),
        }
    }

    #[must_use]
    pub const fn policy(&self) -> &WithdrawalPolicy {
        &self.policy
    }

    /// Trailing daily and monthly totals for `user_id`.
    #[must_use]
    pub fn usage(&self, user_id: &UserId) -> Usage {
        self.usage_at(user_id, self.clock.now())
    }

    fn usage_at(&self, user_id: &UserId, now: DateTime<Utc>) -> Usage {
        let log = self.log.lock();
        log.get(user_id)
            .map(|entries| Usage::from_log(entries, now))
            .unwrap_or_default()
    }

    /// Used, remaining and limit for both windows.
    #[must_use]
    pub fn limits(&self, user_id: &UserId) -> LimitsView {
        self.view(self.usage(user_id))
    }

    fn view(&self, usage: Usage) -> LimitsView {
        LimitsView {
            daily: WindowUsage::new(usage.daily_used, self.policy.daily_limit),
            monthly: WindowUsage::new(usage.monthly_used, self.policy.monthly_limit),
        }
    }

    /// Reserve `amount` against the limits, debit it and queue a payout.
    ///
    /// # Errors
    /// Validation errors for an empty destination or a non-positive amount,
    /// [`WithdrawalError::DailyLimitExceeded`] /
    /// [`WithdrawalError::MonthlyLimitExceeded`] when the amount would cross
    /// a limit, and ledger errors when the balance does not cover it.
    pub async fn request_withdrawal(
        &self,
        user_id: &UserId,
        to: &str,
        amount: Ton,
    ) -> Result<WithdrawalReceipt> {
        let to = to.trim();
        if to.is_empty() {
            return Err(Error::Validation("destination address is required".into()));
        }
        if amount <= Decimal::ZERO {
            return Err(WithdrawalError::InvalidAmount { amount }.into());
        }

        let guard = self.ledger.lock(user_id).await;
        let now = self.clock.now();
        let usage = self.usage_at(user_id, now);

        if exceeds(amount, usage.daily_used, self.policy.daily_limit) {
            return Err(WithdrawalError::DailyLimitExceeded {
                requested: amount,
                used: usage.daily_used,
                limit: self.policy.daily_limit,
            }
            .into());
        }
        if exceeds(amount, usage.monthly_used, self.policy.monthly_limit) {
            return Err(WithdrawalError::MonthlyLimitExceeded {
                requested: amount,
                used: usage.monthly_used,
                limit: self.policy.monthly_limit,
            }
            .into());
        }

        let fee = amount * self.policy.fee_rate;
        self.ledger.debit_locked(&guard, amount).await?;

        self.log
            .lock()
            .entry(user_id.clone())
            .or_default()
            .push(WithdrawalLogEntry {
                user_id: user_id.clone(),
                timestamp: now,
                amount_ton: amount,
            });
        let id = WithdrawalId::new(self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        let request = WithdrawalRequest::pending(id, user_id.clone(), to, amount, fee, now);
        self.queue.write().insert(id, request.clone());
        let limits = self.view(self.usage_at(user_id, now));
        drop(guard);

        info!(
            request_id = %id,
            user_id = %user_id,
            amount = %amount,
            fee = %fee,
            daily_used = %limits.daily.used,
            "Withdrawal queued"
        );
        self.notifiers
            .notify_all(Event::WithdrawalRequested(WithdrawalEvent::from(&request)));

        Ok(WithdrawalReceipt { request, limits })
    }

    /// Mark a pending request as paid out. No ledger effect.
    pub fn complete_withdrawal(&self, id: WithdrawalId, tx_ref: &str) -> Result<WithdrawalRequest> {
        let tx_ref = tx_ref.trim();
        if tx_ref.is_empty() {
            return Err(Error::Validation("transaction reference is required".into()));
        }
        let completed = {
            let mut queue = self.queue.write();
            let request = queue.get_mut(&id).ok_or(WithdrawalError::NotFound(id))?;
            if !request.complete(tx_ref, self.clock.now()) {
                return Err(WithdrawalError::AlreadyProcessed(id).into());
            }
            request.clone()
        };

        info!(request_id = %id, tx_ref = %tx_ref, "Withdrawal completed");
        self.notifiers
            .notify_all(Event::WithdrawalCompleted(WithdrawalEvent::from(&completed)));
        Ok(completed)
    }

    /// Pending requests, oldest first.
    #[must_use]
    pub fn pending(&self) -> Vec<WithdrawalRequest> {
        self.queue
            .read()
            .values()
            .filter(|r| r.is_pending())
            .cloned()
            .collect()
    }

    pub fn withdrawal(&self, id: WithdrawalId) -> Result<WithdrawalRequest> {
        self.queue
            .read()
            .get(&id)
            .cloned()
            .ok_or_else(|| WithdrawalError::NotFound(id).into())
    }
}

/// True when `amount` on top of `used` would cross `limit`. The limit itself
/// is allowed; a sum outside the decimal range always crosses it.
fn exceeds(amount: Ton, used: Ton, limit: Ton) -> bool {
    !amount.checked_add(used).is_some_and(|total| total <= limit)
}
