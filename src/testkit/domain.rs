//! Builders for domain primitives used across tests.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;

use crate::domain::{Asset, Bet, BetId, Direction, Market, MarketId, UserId};

/// Create a [`UserId`] from a string.
pub fn user(id: &str) -> UserId {
    UserId::from(id)
}

/// An open market struck at `strike` that expires five minutes after `now`.
pub fn open_market(id: u64, asset: &str, strike: Decimal, now: DateTime<Utc>) -> Market {
    Market::new(
        MarketId::new(id),
        Asset::from(asset),
        strike,
        now,
        now + Duration::minutes(5),
    )
}

/// Record a bet on `market` with the next free bet id.
///
/// # Panics
/// If the stake would overflow the market's pools.
pub fn bet(market: &mut Market, user_id: &str, direction: Direction, stake: Decimal) -> Bet {
    let id = BetId::new(market.bets().len() as u64 + 1);
    let bet = Bet::new(id, UserId::from(user_id), direction, stake);
    market
        .record_bet(bet.clone())
        .expect("stake fits the pool");
    bet
}
