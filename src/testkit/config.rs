//! Canonical test configurations.
//!
//! Single source of truth for the rules and limits used across tests.

use rust_decimal_macros::dec;

use crate::application::{MarketRules, WithdrawalPolicy};
use crate::domain::Asset;

/// TON and GIFTS, expiries up to one day.
pub fn market_rules() -> MarketRules {
    MarketRules {
        allowed_assets: vec![Asset::from("TON"), Asset::from("GIFTS")],
        max_expiry_minutes: 24 * 60,
    }
}

/// 1% fee, 500 TON a day, 5000 TON a month.
pub fn withdrawal_policy() -> WithdrawalPolicy {
    WithdrawalPolicy {
        fee_rate: dec!(0.01),
        daily_limit: dec!(500),
        monthly_limit: dec!(5000),
    }
}
