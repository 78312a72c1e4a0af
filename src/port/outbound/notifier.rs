//! Notifier port for event notifications.
//!
//! This module defines the trait for sending notifications about ledger
//! events such as placed bets, settled markets and queued withdrawals.

use rust_decimal::Decimal;

use crate::domain::{Bet, Market, Outcome, WithdrawalRequest};

/// Events that can trigger notifications.
#[derive(Debug, Clone)]
pub enum Event {
    /// A stake was debited and recorded on a market.
    BetPlaced(BetEvent),
    /// A market transitioned to settled.
    MarketSettled(SettlementEvent),
    /// A withdrawal was queued for manual payout.
    WithdrawalRequested(WithdrawalEvent),
    /// An operator marked a withdrawal as paid out.
    WithdrawalCompleted(WithdrawalEvent),
}

/// Bet placement event.
#[derive(Debug, Clone)]
pub struct BetEvent {
    pub market_id: String,
    pub asset: String,
    pub user_id: String,
    pub direction: String,
    pub stake: Decimal,
}

impl BetEvent {
    #[must_use]
    pub fn new(market: &Market, bet: &Bet) -> Self {
        Self {
            market_id: market.id().to_string(),
            asset: market.asset().to_string(),
            user_id: bet.user_id().to_string(),
            direction: bet.direction().to_string(),
            stake: bet.stake_ton(),
        }
    }
}

/// Market settlement event.
#[derive(Debug, Clone)]
pub struct SettlementEvent {
    pub market_id: String,
    pub asset: String,
    pub strike: Decimal,
    pub settle_index: Decimal,
    pub outcome: Outcome,
    pub pool_total: Decimal,
    pub fee_collected: Decimal,
    pub winners: usize,
}

impl SettlementEvent {
    /// Build from a settled market. Returns `None` while the market is open.
    #[must_use]
    pub fn from_market(market: &Market) -> Option<Self> {
        let settlement = market.settlement()?;
        Some(Self {
            market_id: market.id().to_string(),
            asset: market.asset().to_string(),
            strike: market.strike(),
            settle_index: settlement.settle_index,
            outcome: settlement.outcome,
            pool_total: market.pools().total(),
            fee_collected: settlement.fee_collected,
            winners: settlement.payouts.len(),
        })
    }
}

/// Withdrawal queue event.
#[derive(Debug, Clone)]
pub struct WithdrawalEvent {
    pub request_id: String,
    pub user_id: String,
    pub to: String,
    pub amount: Decimal,
    pub fee: Decimal,
    pub net: Decimal,
    pub tx_ref: Option<String>,
}

impl From<&WithdrawalRequest> for WithdrawalEvent {
    fn from(request: &WithdrawalRequest) -> Self {
        Self {
            request_id: request.id().to_string(),
            user_id: request.user_id().to_string(),
            to: request.to().to_string(),
            amount: request.amount_ton(),
            fee: request.fee_ton(),
            net: request.net_ton(),
            tx_ref: request.tx_ref().map(str::to_string),
        }
    }
}

/// Trait for notification handlers.
///
/// Implement this trait to receive events from the system.
/// Notifications are fire-and-forget (async but not awaited).
///
/// # Implementation Notes
///
/// - Implementations must be thread-safe (`Send + Sync`)
/// - The `notify` method should not block or perform slow I/O synchronously
pub trait Notifier: Send + Sync {
    /// Handle an event.
    ///
    /// This method should return quickly. For slow operations (e.g., HTTP calls),
    /// implementations should spawn an async task.
    fn notify(&self, event: Event);
}

/// Registry of notifiers (composite pattern).
///
/// Broadcasts events to all registered notifiers.
pub struct NotifierRegistry {
    notifiers: Vec<Box<dyn Notifier>>,
}

impl NotifierRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self { notifiers: vec![] }
    }

    /// Register a notifier.
    pub fn register(&mut self, notifier: Box<dyn Notifier>) {
        self.notifiers.push(notifier);
    }

    /// Notify all registered notifiers.
    pub fn notify_all(&self, event: Event) {
        for notifier in &self.notifiers {
            notifier.notify(event.clone());
        }
    }

    /// Number of registered notifiers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.notifiers.len()
    }

    /// Check if registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.notifiers.is_empty()
    }
}

impl Default for NotifierRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// A no-op notifier for testing or when notifications are disabled.
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _event: Event) {}
}

/// A logging notifier that logs events via tracing.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, event: Event) {
        use tracing::info;
        match event {
            Event::BetPlaced(e) => {
                info!(
                    market_id = %e.market_id,
                    user_id = %e.user_id,
                    direction = %e.direction,
                    stake = %e.stake,
                    "Bet placed"
                );
            }
            Event::MarketSettled(e) => {
                info!(
                    market_id = %e.market_id,
                    asset = %e.asset,
                    strike = %e.strike,
                    settle_index = %e.settle_index,
                    outcome = ?e.outcome,
                    fee = %e.fee_collected,
                    "Market settled"
                );
            }
            Event::WithdrawalRequested(e) => {
                info!(
                    request_id = %e.request_id,
                    user_id = %e.user_id,
                    amount = %e.amount,
                    net = %e.net,
                    "Withdrawal requested"
                );
            }
            Event::WithdrawalCompleted(e) => {
                info!(
                    request_id = %e.request_id,
                    user_id = %e.user_id,
                    tx_ref = e.tx_ref.as_deref().unwrap_or(""),
                    "Withdrawal completed"
                );
            }
        }
    }
}
