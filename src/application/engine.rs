//! Facade over the ledger, market registry and withdrawal desk.
//!
//! Inbound adapters talk to this type only. It wires the services onto one
//! ledger and runs the cross-service checks of each request.

use std::sync::Arc;

use rust_decimal::Decimal;

use crate::application::ledger::Ledger;
use crate::application::market::{MarketRegistry, MarketRules};
use crate::application::withdrawal::{WithdrawalDesk, WithdrawalPolicy, WithdrawalReceipt};
use crate::domain::{
    Asset, Bet, Direction, LimitsView, Market, MarketId, Ton, UserId, WithdrawalId,
    WithdrawalRequest,
};
use crate::error::{LedgerError, MarketError, Result};
use crate::port::outbound::clock::Clock;
use crate::port::outbound::notifier::NotifierRegistry;
use crate::port::outbound::price::PriceIndexProvider;
use crate::port::outbound::store::BalanceStore;

/// Everything the engine needs from the outside.
pub struct EngineParts {
    pub store: Arc<dyn BalanceStore>,
    pub prices: Arc<dyn PriceIndexProvider>,
    pub clock: Arc<dyn Clock>,
    pub notifiers: NotifierRegistry,
    pub rules: MarketRules,
    pub policy: WithdrawalPolicy,
}

/// A placed bet and the market it landed in.
#[derive(Debug, Clone)]
pub struct BetReceipt {
    pub market_id: MarketId,
    pub bet: Bet,
}

pub struct Engine {
    ledger: Arc<Ledger>,
    markets: Arc<MarketRegistry>,
    withdrawals: Arc<WithdrawalDesk>,
}

impl Engine {
    #[must_use]
    pub fn new(parts: EngineParts) -> Self {
        let notifiers = Arc::new(parts.notifiers);
        let ledger = Arc::new(Ledger::new(parts.store));
        let markets = Arc::new(MarketRegistry::new(
            parts.rules,
            ledger.clone(),
            parts.prices,
            parts.clock.clone(),
            notifiers.clone(),
        ));
        let withdrawals = Arc::new(WithdrawalDesk::new(
            parts.policy,
            ledger.clone(),
            parts.clock,
            notifiers,
        ));
        Self {
            ledger,
            markets,
            withdrawals,
        }
    }

    #[must_use]
    pub const fn ledger(&self) -> &Arc<Ledger> {
        &self.ledger
    }

    #[must_use]
    pub const fn markets(&self) -> &Arc<MarketRegistry> {
        &self.markets
    }

    #[must_use]
    pub const fn withdrawals(&self) -> &Arc<WithdrawalDesk> {
        &self.withdrawals
    }

    /// Find or create the market for `(asset, expiry)` and place a bet on it.
    ///
    /// Arguments and the balance are checked before a market is created, so
    /// a request that cannot succeed does not leave an empty market behind.
    pub async fn open_bet(
        &self,
        user_id: &UserId,
        asset: &Asset,
        direction: Direction,
        amount: Ton,
        expiry_minutes: i64,
    ) -> Result<BetReceipt> {
        if amount <= Decimal::ZERO {
            return Err(MarketError::NonPositiveStake { stake: amount }.into());
        }
        self.markets.validate(asset, expiry_minutes)?;
        let available = self.ledger.balance(user_id).await?;
        if available < amount {
            return Err(LedgerError::InsufficientBalance {
                user_id: user_id.clone(),
                available,
                requested: amount,
            }
            .into());
        }

        let market = self.markets.get_or_create(asset, expiry_minutes).await?;
        let bet = self
            .markets
            .place_bet(market.id(), user_id, direction, amount)
            .await?;
        Ok(BetReceipt {
            market_id: market.id(),
            bet,
        })
    }

    pub async fn list_markets(&self, user_id: Option<&UserId>) -> Vec<Market> {
        self.markets.markets(user_id).await
    }

    pub async fn settle_market(&self, market_id: MarketId) -> Result<Market> {
        self.markets.settle(market_id).await
    }

    pub async fn settle_due(&self) -> Vec<Market> {
        self.markets.settle_due().await
    }

    pub async fn balance(&self, user_id: &UserId) -> Result<Ton> {
        self.ledger.balance(user_id).await
    }

    /// Operator top-up.
    pub async fn credit(&self, user_id: &UserId, amount: Ton) -> Result<Ton> {
        self.ledger.credit(user_id, amount).await
    }

    pub async fn withdraw(&self, user_id: &UserId, to: &str, amount: Ton) -> Result<WithdrawalReceipt> {
        self.withdrawals.request_withdrawal(user_id, to, amount).await
    }

    #[must_use]
    pub fn limits(&self, user_id: &UserId) -> LimitsView {
        self.withdrawals.limits(user_id)
    }

    #[must_use]
    pub fn pending_withdrawals(&self) -> Vec<WithdrawalRequest> {
        self.withdrawals.pending()
    }

    pub fn complete_withdrawal(&self, id: WithdrawalId, tx_ref: &str) -> Result<WithdrawalRequest> {
        self.withdrawals.complete_withdrawal(id, tx_ref)
    }
}
