//! Market registry and settlement engine.
//!
//! Markets live behind their own async mutex. Bet placement and settlement
//! both lock the market first and the ledger's user lock second, never the
//! other way round. Price lookups happen with no lock held.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use rust_decimal::Decimal;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::application::ledger::Ledger;
use crate::domain::{Asset, Bet, BetId, Direction, Market, MarketId, Ton, UserId};
use crate::error::{MarketError, Result};
use crate::port::outbound::clock::Clock;
use crate::port::outbound::notifier::{BetEvent, Event, NotifierRegistry, SettlementEvent};
use crate::port::outbound::price::PriceIndexProvider;

/// Upper bound for `expiry_minutes` when none is configured (7 days).
pub const DEFAULT_MAX_EXPIRY_MINUTES: i64 = 7 * 24 * 60;

/// Which assets may be traded and how far out a market may expire.
#[derive(Debug, Clone)]
pub struct MarketRules {
    pub allowed_assets: Vec<Asset>,
    pub max_expiry_minutes: i64,
}

impl MarketRules {
    #[must_use]
    pub fn allows(&self, asset: &Asset) -> bool {
        self.allowed_assets.contains(asset)
    }
}

impl Default for MarketRules {
    fn default() -> Self {
        Self {
            allowed_assets: vec![Asset::from("TON")],
            max_expiry_minutes: DEFAULT_MAX_EXPIRY_MINUTES,
        }
    }
}

type MarketHandle = Arc<Mutex<Market>>;

#[derive(Default)]
struct Book {
    markets: BTreeMap<MarketId, MarketHandle>,
    open: HashMap<(Asset, DateTime<Utc>), MarketId>,
    /// Settled markets with payouts still to credit.
    unpaid: BTreeSet<MarketId>,
}

/// Creates markets, accepts bets and settles expired markets.
pub struct MarketRegistry {
    book: RwLock<Book>,
    next_market: AtomicU64,
    next_bet: AtomicU64,
    rules: MarketRules,
    ledger: Arc<Ledger>,
    prices: Arc<dyn PriceIndexProvider>,
    clock: Arc<dyn Clock>,
    notifiers: Arc<NotifierRegistry>,
}

impl MarketRegistry {
    #[must_use]
    pub fn new(
        rules: MarketRules,
        ledger: Arc<Ledger>,
        prices: Arc<dyn PriceIndexProvider>,
        clock: Arc<dyn Clock>,
        notifiers: Arc<NotifierRegistry>,
    ) -> Self {
        Self {
            book: RwLock::new(Book::default()),
            next_market: AtomicU64::new(0),
            next_bet: AtomicU64::new(0),
            rules,
            ledger,
            prices,
            clock,
            notifiers,
        }
    }

    #[must_use]
    pub const fn rules(&self) -> &MarketRules {
        &self.rules
    }

    /// Check the arguments of [`Self::get_or_create`] without side effects.
    pub fn validate(&self, asset: &Asset, expiry_minutes: i64) -> Result<()> {
        if !(1..=self.rules.max_expiry_minutes).contains(&expiry_minutes) {
            return Err(MarketError::InvalidExpiry {
                minutes: expiry_minutes,
                max: self.rules.max_expiry_minutes,
            }
            .into());
        }
        if !self.rules.allows(asset) {
            return Err(MarketError::UnsupportedAsset(asset.to_string()).into());
        }
        Ok(())
    }

    /// Return the open market for `(asset, now + expiry_minutes)`, creating it if needed.
    ///
    /// Only an exact expiry match is reused. A new market is struck at the
    /// current index.
    pub async fn get_or_create(&self, asset: &Asset, expiry_minutes: i64) -> Result<Market> {
        let handle = self.open_handle(asset, expiry_minutes).await?;
        let market = handle.lock().await;
        Ok(market.clone())
    }

    async fn open_handle(&self, asset: &Asset, expiry_minutes: i64) -> Result<MarketHandle> {
        self.validate(asset, expiry_minutes)?;
        let now = self.clock.now();
        let expiry = now + Duration::minutes(expiry_minutes);
        let key = (asset.clone(), expiry);

        if let Some(handle) = self.lookup_open(&key) {
            return Ok(handle);
        }

        let strike = self.index_or_zero(asset).await;

        let mut book = self.book.write();
        if let Some(id) = book.open.get(&key) {
            if let Some(handle) = book.markets.get(id) {
                return Ok(handle.clone());
            }
        }
        let id = MarketId::new(self.next_market.fetch_add(1, Ordering::SeqCst) + 1);
        let handle = Arc::new(Mutex::new(Market::new(id, asset.clone(), strike, now, expiry)));
        book.markets.insert(id, handle.clone());
        book.open.insert(key, id);
        info!(market_id = %id, asset = %asset, strike = %strike, expiry = %expiry, "Market created");
        Ok(handle)
    }

    fn lookup_open(&self, key: &(Asset, DateTime<Utc>)) -> Option<MarketHandle> {
        let book = self.book.read();
        book.open.get(key).and_then(|id| book.markets.get(id)).cloned()
    }

    fn handle(&self, market_id: MarketId) -> Result<MarketHandle> {
        self.book
            .read()
            .markets
            .get(&market_id)
            .cloned()
            .ok_or_else(|| MarketError::NotFound(market_id).into())
    }

    /// Debit the stake and record a bet, as one step under the market lock.
    ///
    /// Every refusal happens before the debit.
    pub async fn place_bet(
        &self,
        market_id: MarketId,
        user_id: &UserId,
        direction: Direction,
        stake: Ton,
    ) -> Result<Bet> {
        let handle = self.handle(market_id)?;
        let mut market = handle.lock().await;
        market.ensure_accepts(stake, self.clock.now())?;

        self.ledger.debit(user_id, stake).await?;

        let bet_id = BetId::new(self.next_bet.fetch_add(1, Ordering::SeqCst) + 1);
        let bet = Bet::new(bet_id, user_id.clone(), direction, stake);
        market.record_bet(bet.clone())?;

        info!(
            market_id = %market_id,
            bet_id = %bet_id,
            user_id = %user_id,
            direction = %direction,
            stake = %stake,
            "Bet placed"
        );
        self.notifiers
            .notify_all(Event::BetPlaced(BetEvent::new(&market, &bet)));
        Ok(bet)
    }

    /// Settle an expired market and credit its payouts.
    ///
    /// Settling a settled market returns the stored result. Payouts whose
    /// credit failed earlier are retried; applied ones are never paid twice.
    pub async fn settle(&self, market_id: MarketId) -> Result<Market> {
        let handle = self.handle(market_id)?;

        let (asset, needs_index) = {
            let market = handle.lock().await;
            if market.is_open() && !market.is_expired(self.clock.now()) {
                return Err(MarketError::NotExpired {
                    market_id,
                    expiry: market.expiry(),
                }
                .into());
            }
            if !market.is_open() && market.pending_payouts().next().is_none() {
                return Ok(market.clone());
            }
            (market.asset().clone(), market.is_open())
        };

        let settle_index = if needs_index {
            self.index_or_zero(&asset).await
        } else {
            Decimal::ZERO
        };

        let mut market = handle.lock().await;
        let newly_settled = market.is_open();
        if newly_settled {
            let settlement = market.settle(settle_index, self.clock.now())?;
            info!(
                market_id = %market_id,
                outcome = ?settlement.outcome,
                settle_index = %settlement.settle_index,
                fee = %settlement.fee_collected,
                "Market settled"
            );
            let key = (market.asset().clone(), market.expiry());
            let mut book = self.book.write();
            book.open.remove(&key);
            book.unpaid.insert(market_id);
        }

        let pending: Vec<_> = market.pending_payouts().cloned().collect();
        for payout in &pending {
            if let Err(e) = self.ledger.credit(&payout.user_id, payout.amount_ton).await {
                warn!(
                    market_id = %market_id,
                    bet_id = %payout.bet_id,
                    user_id = %payout.user_id,
                    error = %e,
                    "Payout credit failed, will retry"
                );
                return Err(e);
            }
            market.mark_payout_applied(payout.bet_id);
        }
        self.book.write().unpaid.remove(&market_id);

        if newly_settled || !pending.is_empty() {
            if let Some(event) = SettlementEvent::from_market(&market) {
                self.notifiers.notify_all(Event::MarketSettled(event));
            }
        }
        Ok(market.clone())
    }

    /// Settle every open market whose expiry has passed, and retry payouts
    /// of settled markets whose credits failed earlier.
    ///
    /// Failures are logged and left for the next sweep.
    pub async fn settle_due(&self) -> Vec<Market> {
        let now = self.clock.now();
        let due: BTreeSet<MarketId> = {
            let book = self.book.read();
            book.open
                .iter()
                .filter(|((_, expiry), _)| *expiry <= now)
                .map(|(_, id)| *id)
                .chain(book.unpaid.iter().copied())
                .collect()
        };

        let mut settled = Vec::with_capacity(due.len());
        for market_id in due {
            match self.settle(market_id).await {
                Ok(market) => settled.push(market),
                Err(e) => warn!(market_id = %market_id, error = %e, "Settlement failed"),
            }
        }
        settled
    }

    /// Snapshot of one market.
    pub async fn market(&self, market_id: MarketId) -> Result<Market> {
        let handle = self.handle(market_id)?;
        let market = handle.lock().await;
        Ok(market.clone())
    }

    /// Snapshot of all markets in id order.
    ///
    /// With a user filter only markets that user bet on are returned, each
    /// with its bet list narrowed to that user.
    pub async fn markets(&self, user_id: Option<&UserId>) -> Vec<Market> {
        let handles: Vec<MarketHandle> = self.book.read().markets.values().cloned().collect();
        let mut out = Vec::with_capacity(handles.len());
        for handle in handles {
            let market = handle.lock().await;
            match user_id {
                Some(user) if market.has_bet_from(user) => out.push(market.view_for(user)),
                Some(_) => {}
                None => out.push(market.clone()),
            }
        }
        out
    }

    /// Current index for `asset`, with any lookup failure read as zero.
    ///
    /// A zero strike settles as a draw, so a failed lookup at creation
    /// refunds every stake.
    pub async fn index_or_zero(&self, asset: &Asset) -> Decimal {
        match self.prices.query(asset).await {
            Ok(value) => value,
            Err(e) => {
                warn!(provider = self.prices.name(), asset = %asset, error = %e, "Price index unavailable, using 0");
                Decimal::ZERO
            }
        }
    }
}
