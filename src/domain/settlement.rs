//! Outcome and payout computation for binary markets.
//!
//! Pure functions only; the market registry applies the results to the
//! ledger.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{BetId, UserId};
use super::market::{Bet, Direction, Pools};
use super::money::{floor_nanoton, Ton, SETTLEMENT_FEE_RATE, TIE_TOLERANCE};

/// Settled result of a market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Above,
    Below,
    /// Index ended within the tie band, or the strike was zero.
    Draw,
}

impl Outcome {
    /// Winning side, if the outcome is directional.
    #[must_use]
    pub const fn winner(self) -> Option<Direction> {
        match self {
            Self::Above => Some(Direction::Above),
            Self::Below => Some(Direction::Below),
            Self::Draw => None,
        }
    }
}

/// Credit owed to a single bet after settlement.
///
/// `applied` flips once the ledger credit has gone through, which makes
/// re-running payout application safe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payout {
    pub bet_id: BetId,
    pub user_id: UserId,
    pub amount_ton: Ton,
    pub applied: bool,
}

/// Fee and payout split computed for a market.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayoutPlan {
    pub fee: Ton,
    /// Distributable amount nobody is owed; non-zero only when the
    /// winning side is empty.
    pub unallocated: Ton,
    pub payouts: Vec<Payout>,
}

/// Decide the outcome of a market from its strike and settlement index.
#[must_use]
pub fn decide_outcome(strike: Decimal, settle_index: Decimal) -> Outcome {
    if strike.is_zero() {
        return Outcome::Draw;
    }
    let inside_band = settle_index
        .checked_sub(strike)
        .and_then(|moved| moved.checked_div(strike))
        .is_some_and(|relative| relative.abs() < TIE_TOLERANCE);
    if inside_band {
        Outcome::Draw
    } else if settle_index > strike {
        Outcome::Above
    } else {
        Outcome::Below
    }
}

/// Split the pooled stakes for the given outcome.
///
/// Each winner is paid its share of the distributable pool rounded down to
/// a nanoton, and the rounding remainder goes to the last winning bet, so
/// winners always receive exactly `total - fee`. Returns `None` only if an
/// intermediate amount leaves the decimal range.
#[must_use]
pub fn plan_payouts(pools: &Pools, bets: &[Bet], outcome: Outcome) -> Option<PayoutPlan> {
    let Some(winner) = outcome.winner() else {
        let payouts = bets
            .iter()
            .map(|bet| pending(bet, bet.stake_ton()))
            .collect();
        return Some(PayoutPlan {
            fee: Decimal::ZERO,
            unallocated: Decimal::ZERO,
            payouts,
        });
    };

    let total = pools.above.checked_add(pools.below)?;
    let fee = total.checked_mul(SETTLEMENT_FEE_RATE)?;
    let distributable = total.checked_sub(fee)?;
    let win_pool = pools.get(winner);

    if win_pool.is_zero() {
        return Some(PayoutPlan {
            fee,
            unallocated: distributable,
            payouts: Vec::new(),
        });
    }

    let mut payouts = Vec::new();
    let mut paid = Decimal::ZERO;
    for bet in bets.iter().filter(|bet| bet.direction() == winner) {
        // share <= 1, so the product never exceeds the distributable pool
        let share = bet.stake_ton().checked_div(win_pool)?;
        let amount = floor_nanoton(share.checked_mul(distributable)?);
        paid = paid.checked_add(amount)?;
        payouts.push(pending(bet, amount));
    }
    if let Some(last) = payouts.last_mut() {
        last.amount_ton = last.amount_ton.checked_add(distributable.checked_sub(paid)?)?;
    }

    Some(PayoutPlan {
        fee,
        unallocated: Decimal::ZERO,
        payouts,
    })
}

fn pending(bet: &Bet, amount_ton: Ton) -> Payout {
    Payout {
        bet_id: bet.id(),
        user_id: bet.user_id().clone(),
        amount_ton,
        applied: false,
    }
}
