//! Withdrawal requests, the append-only withdrawal log and rolling usage.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{UserId, WithdrawalId};
use super::money::Ton;

/// Trailing window for the daily limit.
#[must_use]
pub fn daily_window() -> Duration {
    Duration::hours(24)
}

/// Trailing window for the monthly limit (30 x 24h, not calendar months).
#[must_use]
pub fn monthly_window() -> Duration {
    Duration::hours(24 * 30)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WithdrawalStatus {
    Pending,
    Completed,
}

/// A queued payout to an external address awaiting manual settlement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawalRequest {
    id: WithdrawalId,
    user_id: UserId,
    to: String,
    amount_ton: Ton,
    fee_ton: Ton,
    net_ton: Ton,
    status: WithdrawalStatus,
    requested_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    completed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tx_ref: Option<String>,
}

impl WithdrawalRequest {
    /// Create a pending request. `net = amount - fee`.
    #[must_use]
    pub fn pending(
        id: WithdrawalId,
        user_id: UserId,
        to: impl Into<String>,
        amount_ton: Ton,
        fee_ton: Ton,
        requested_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            to: to.into(),
            amount_ton,
            fee_ton,
            net_ton: amount_ton - fee_ton,
            status: WithdrawalStatus::Pending,
            requested_at,
            completed_at: None,
            tx_ref: None,
        }
    }

    #[must_use]
    pub const fn id(&self) -> WithdrawalId {
        self.id
    }

    #[must_use]
    pub const fn user_id(&self) -> &UserId {
        &self.user_id
    }

    #[must_use]
    pub fn to(&self) -> &str {
        &self.to
    }

    #[must_use]
    pub const fn amount_ton(&self) -> Ton {
        self.amount_ton
    }

    #[must_use]
    pub const fn fee_ton(&self) -> Ton {
        self.fee_ton
    }

    #[must_use]
    pub const fn net_ton(&self) -> Ton {
        self.net_ton
    }

    #[must_use]
    pub const fn status(&self) -> WithdrawalStatus {
        self.status
    }

    #[must_use]
    pub const fn requested_at(&self) -> DateTime<Utc> {
        self.requested_at
    }

    #[must_use]
    pub const fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    #[must_use]
    pub fn tx_ref(&self) -> Option<&str> {
        self.tx_ref.as_deref()
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.status == WithdrawalStatus::Pending
    }

    /// Transition `pending -> completed`. Returns false if already completed.
    pub fn complete(&mut self, tx_ref: impl Into<String>, now: DateTime<Utc>) -> bool {
        if !self.is_pending() {
            return false;
        }
        self.status = WithdrawalStatus::Completed;
        self.completed_at = Some(now);
        self.tx_ref = Some(tx_ref.into());
        true
    }
}

/// One reserved withdrawal amount, used only for rolling usage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithdrawalLogEntry {
    pub user_id: UserId,
    pub timestamp: DateTime<Utc>,
    pub amount_ton: Ton,
}

/// Withdrawal totals in the trailing windows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Usage {
    pub daily_used: Ton,
    pub monthly_used: Ton,
}

impl Usage {
    /// Sum the entries that fall inside each trailing window ending at `now`.
    #[must_use]
    pub fn from_log<'a>(
        entries: impl IntoIterator<Item = &'a WithdrawalLogEntry>,
        now: DateTime<Utc>,
    ) -> Self {
        let daily_start = now - daily_window();
        let monthly_start = now - monthly_window();
        entries
            .into_iter()
            .filter(|e| e.timestamp <= now)
            .fold(Self::default(), |mut usage, e| {
                if e.timestamp > daily_start {
                    usage.daily_used += e.amount_ton;
                }
                if e.timestamp > monthly_start {
                    usage.monthly_used += e.amount_ton;
                }
                usage
            })
    }
}

/// Used / remaining / limit for one window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowUsage {
    pub used: Ton,
    pub remaining: Ton,
    pub limit: Ton,
}

impl WindowUsage {
    #[must_use]
    pub fn new(used: Ton, limit: Ton) -> Self {
        Self {
            used,
            remaining: (limit - used).max(Decimal::ZERO),
            limit,
        }
    }
}

/// Both windows, as reported to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitsView {
    pub daily: WindowUsage,
    pub monthly: WindowUsage,
}
