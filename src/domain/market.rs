//! Binary prediction market types.
//!
//! A [`Market`] pools stakes on whether an asset's index will end above or
//! below the strike captured at creation. Mutation is limited to
//! [`Market::record_bet`] and [`Market::settle`] so the pool totals always
//! match the recorded bets.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{Asset, BetId, MarketId, UserId};
use super::money::Ton;
use super::settlement::{decide_outcome, plan_payouts, Outcome, Payout};
use crate::error::MarketError;

/// Side of a binary market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Above,
    Below,
}

impl Direction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Above => "above",
            Self::Below => "below",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "above" => Ok(Self::Above),
            "below" => Ok(Self::Below),
            other => Err(format!("direction must be 'above' or 'below', got '{other}'")),
        }
    }
}

/// Lifecycle state of a market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketStatus {
    Open,
    Settled,
}

/// Total stakes on each side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pools {
    pub above: Ton,
    pub below: Ton,
}

impl Pools {
    #[must_use]
    pub const fn get(&self, direction: Direction) -> Ton {
        match direction {
            Direction::Above => self.above,
            Direction::Below => self.below,
        }
    }

    /// Pools grown by `stake` on one side, or `None` if either side or
    /// the total would leave the decimal range.
    #[must_use]
    pub fn checked_add(&self, direction: Direction, stake: Ton) -> Option<Self> {
        let mut next = *self;
        match direction {
            Direction::Above => next.above = self.above.checked_add(stake)?,
            Direction::Below => next.below = self.below.checked_add(stake)?,
        }
        next.above.checked_add(next.below)?;
        Some(next)
    }

    #[must_use]
    pub fn total(&self) -> Ton {
        self.above + self.below
    }
}

/// A stake placed on one side of a market. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bet {
    id: BetId,
    user_id: UserId,
    direction: Direction,
    stake_ton: Ton,
}

impl Bet {
    #[must_use]
    pub const fn new(id: BetId, user_id: UserId, direction: Direction, stake_ton: Ton) -> Self {
        Self {
            id,
            user_id,
            direction,
            stake_ton,
        }
    }

    #[must_use]
    pub const fn id(&self) -> BetId {
        self.id
    }

    #[must_use]
    pub const fn user_id(&self) -> &UserId {
        &self.user_id
    }

    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    #[must_use]
    pub const fn stake_ton(&self) -> Ton {
        self.stake_ton
    }
}

/// Recorded result of a settled market.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settlement {
    pub outcome: Outcome,
    pub settle_index: Decimal,
    pub fee_collected: Ton,
    pub unallocated: Ton,
    pub settled_at: DateTime<Utc>,
    pub payouts: Vec<Payout>,
}

/// A binary market on one asset with one expiry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Market {
    id: MarketId,
    asset: Asset,
    created_at: DateTime<Utc>,
    expiry: DateTime<Utc>,
    strike: Decimal,
    pools: Pools,
    bets: Vec<Bet>,
    status: MarketStatus,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    settlement: Option<Settlement>,
}

impl Market {
    /// Create an open market with empty pools.
    #[must_use]
    pub fn new(
        id: MarketId,
        asset: Asset,
        strike: Decimal,
        created_at: DateTime<Utc>,
        expiry: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            asset,
            created_at,
            expiry,
            strike,
            pools: Pools::default(),
            bets: Vec::new(),
            status: MarketStatus::Open,
            settlement: None,
        }
    }

    #[must_use]
    pub const fn id(&self) -> MarketId {
        self.id
    }

    #[must_use]
    pub const fn asset(&self) -> &Asset {
        &self.asset
    }

    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub const fn expiry(&self) -> DateTime<Utc> {
        self.expiry
    }

    #[must_use]
    pub const fn strike(&self) -> Decimal {
        self.strike
    }

    #[must_use]
    pub const fn pools(&self) -> &Pools {
        &self.pools
    }

    #[must_use]
    pub fn bets(&self) -> &[Bet] {
        &self.bets
    }

    #[must_use]
    pub const fn status(&self) -> MarketStatus {
        self.status
    }

    #[must_use]
    pub const fn settlement(&self) -> Option<&Settlement> {
        self.settlement.as_ref()
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.status == MarketStatus::Open
    }

    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expiry
    }

    /// True when the pool totals equal the sum of recorded stakes.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        let staked: Ton = self.bets.iter().map(Bet::stake_ton).sum();
        self.pools.total() == staked
    }

    /// Check every precondition of a bet before any money moves.
    pub fn ensure_accepts(&self, stake: Ton, now: DateTime<Utc>) -> Result<(), MarketError> {
        if stake <= Decimal::ZERO {
            return Err(MarketError::NonPositiveStake { stake });
        }
        if !self.is_open() || self.is_expired(now) {
            return Err(MarketError::Closed(self.id));
        }
        if self.pools.checked_add(Direction::Above, stake).is_none() {
            return Err(MarketError::Overflow(self.id));
        }
        Ok(())
    }

    /// Append a bet and grow its pool.
    ///
    /// Callers must have passed [`Market::ensure_accepts`] under the same
    /// market lock, which rules out the overflow error.
    pub fn record_bet(&mut self, bet: Bet) -> Result<(), MarketError> {
        debug_assert!(self.is_open());
        self.pools = self
            .pools
            .checked_add(bet.direction(), bet.stake_ton())
            .ok_or(MarketError::Overflow(self.id))?;
        self.bets.push(bet);
        Ok(())
    }

    /// Settle the market against `settle_index`.
    ///
    /// Transitions `open -> settled` and returns the recorded settlement.
    /// On a market that is already settled the stored result is returned
    /// unchanged. If the payout plan cannot be computed the market stays
    /// open.
    pub fn settle(
        &mut self,
        settle_index: Decimal,
        now: DateTime<Utc>,
    ) -> Result<&Settlement, MarketError> {
        let settlement = match self.settlement.take() {
            Some(settlement) => settlement,
            None => {
                let outcome = decide_outcome(self.strike, settle_index);
                let plan = plan_payouts(&self.pools, &self.bets, outcome)
                    .ok_or(MarketError::Overflow(self.id))?;
                Settlement {
                    outcome,
                    settle_index,
                    fee_collected: plan.fee,
                    unallocated: plan.unallocated,
                    settled_at: now,
                    payouts: plan.payouts,
                }
            }
        };
        self.status = MarketStatus::Settled;
        let settlement: &Settlement = self.settlement.insert(settlement);
        Ok(settlement)
    }

    /// Payouts not yet credited to the ledger.
    pub fn pending_payouts(&self) -> impl Iterator<Item = &Payout> {
        self.settlement
            .iter()
            .flat_map(|s| s.payouts.iter())
            .filter(|p| !p.applied)
    }

    /// Mark the payout for `bet_id` as credited.
    pub fn mark_payout_applied(&mut self, bet_id: BetId) {
        if let Some(settlement) = self.settlement.as_mut() {
            if let Some(payout) = settlement.payouts.iter_mut().find(|p| p.bet_id == bet_id) {
                payout.applied = true;
            }
        }
    }

    /// True when the user holds at least one bet here.
    #[must_use]
    pub fn has_bet_from(&self, user_id: &UserId) -> bool {
        self.bets.iter().any(|b| b.user_id() == user_id)
    }

    /// Copy of this market with the bet list narrowed to one user.
    ///
    /// Pools are left untouched so the view still shows market totals.
    #[must_use]
    pub fn view_for(&self, user_id: &UserId) -> Self {
        let mut view = self.clone();
        view.bets.retain(|b| b.user_id() == user_id);
        view
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rust_decimal_macros::dec;

    fn market(strike: Decimal) -> Market {
        let now = Utc::now();
        Market::new(
            MarketId::new(1),
            Asset::from("GIFTS"),
            strike,
            now,
            now + Duration::minutes(5),
        )
    }

    fn bet(id: u64, user: &str, direction: Direction, stake: Decimal) -> Bet {
        Bet::new(BetId::new(id), UserId::from(user), direction, stake)
    }

    #[test]
    fn direction_parses_case_insensitively() {
        assert_eq!("Above".parse::<Direction>(), Ok(Direction::Above));
        assert_eq!(" below ".parse::<Direction>(), Ok(Direction::Below));
        assert!("sideways".parse::<Direction>().is_err());
    }

    #[test]
    fn record_bet_keeps_pools_balanced() {
        let mut m = market(dec!(1000));
        m.record_bet(bet(1, "alice", Direction::Above, dec!(30))).unwrap();
        m.record_bet(bet(2, "bob", Direction::Below, dec!(12.5))).unwrap();

        assert_eq!(m.pools().above, dec!(30));
        assert_eq!(m.pools().below, dec!(12.5));
        assert!(m.is_balanced());
    }

    #[test]
    fn ensure_accepts_rejects_non_positive_stake() {
        let m = market(dec!(1000));
        let err = m.ensure_accepts(dec!(0), m.created_at()).unwrap_err();
        assert!(matches!(err, MarketError::NonPositiveStake { .. }));
    }

    #[test]
    fn ensure_accepts_rejects_after_expiry() {
        let m = market(dec!(1000));
        let err = m.ensure_accepts(dec!(1), m.expiry()).unwrap_err();
        assert_eq!(err, MarketError::Closed(MarketId::new(1)));
    }

    #[test]
    fn settle_is_recorded_once() {
        let mut m = market(dec!(1000));
        m.record_bet(bet(1, "alice", Direction::Above, dec!(30))).unwrap();

        let first = m.settle(dec!(1050), m.expiry()).unwrap().clone();
        let second = m.settle(dec!(900), m.expiry()).unwrap().clone();

        assert_eq!(first, second);
        assert_eq!(first.outcome, Outcome::Above);
        assert_eq!(m.status(), MarketStatus::Settled);
        assert!(m.ensure_accepts(dec!(1), m.created_at()).is_err());
    }

    #[test]
    fn payouts_can_be_marked_applied() {
        let mut m = market(dec!(1000));
        m.record_bet(bet(1, "alice", Direction::Above, dec!(30))).unwrap();
        m.record_bet(bet(2, "bob", Direction::Below, dec!(10))).unwrap();
        m.settle(dec!(1001), m.expiry()).unwrap();

        assert_eq!(m.pending_payouts().count(), 2);
        m.mark_payout_applied(BetId::new(1));
        let pending: Vec<_> = m.pending_payouts().map(|p| p.bet_id).collect();
        assert_eq!(pending, vec![BetId::new(2)]);
    }

    #[test]
    fn stake_that_would_overflow_the_pool_is_refused() {
        let mut m = market(dec!(1000));
        m.record_bet(bet(1, "alice", Direction::Above, Decimal::MAX)).unwrap();

        let err = m.ensure_accepts(dec!(1), m.created_at()).unwrap_err();
        assert_eq!(err, MarketError::Overflow(MarketId::new(1)));
        assert!(m.record_bet(bet(2, "bob", Direction::Below, dec!(1))).is_err());
        assert_eq!(m.bets().len(), 1);
        assert!(m.is_balanced());
    }

    #[test]
    fn view_for_filters_bets_only() {
        let mut m = market(dec!(1000));
        m.record_bet(bet(1, "alice", Direction::Above, dec!(30))).unwrap();
        m.record_bet(bet(2, "bob", Direction::Below, dec!(10))).unwrap();

        let view = m.view_for(&UserId::from("bob"));
        assert_eq!(view.bets().len(), 1);
        assert_eq!(view.pools().total(), dec!(40));
        assert!(m.has_bet_from(&UserId::from("alice")));
        assert!(!m.has_bet_from(&UserId::from("carol")));
    }

    #[test]
    fn settled_market_serializes_flat_settlement_fields() {
        let mut m = market(dec!(1000));
        m.record_bet(bet(1, "alice", Direction::Above, dec!(30))).unwrap();
        m.settle(dec!(1050), m.expiry()).unwrap();

        let json = serde_json::to_value(&m).unwrap();
        assert_eq!(json["status"], "settled");
        assert_eq!(json["outcome"], "above");
        assert!(json.get("settleIndex").is_some());
        assert!(json.get("feeCollected").is_some());
    }
}
