//! Withdrawal fee and limit configuration.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;

use crate::application::WithdrawalPolicy;

#[derive(Debug, Clone, Deserialize)]
pub struct WithdrawalConfig {
    /// Fraction of each withdrawal kept as fee (default: 0.01).
    #[serde(default = "default_fee_rate")]
    pub fee_rate: Decimal,
    /// Trailing 24h limit in TON (default: 500).
    #[serde(default = "default_daily_limit")]
    pub daily_limit_ton: Decimal,
    /// Trailing 30-day limit in TON (default: 5000).
    #[serde(default = "default_monthly_limit")]
    pub monthly_limit_ton: Decimal,
}

fn default_fee_rate() -> Decimal {
    dec!(0.01)
}

fn default_daily_limit() -> Decimal {
    dec!(500)
}

fn default_monthly_limit() -> Decimal {
    dec!(5000)
}

impl WithdrawalConfig {
    #[must_use]
    pub fn policy(&self) -> WithdrawalPolicy {
        WithdrawalPolicy {
            fee_rate: self.fee_rate,
            daily_limit: self.daily_limit_ton,
            monthly_limit: self.monthly_limit_ton,
        }
    }
}

impl Default for WithdrawalConfig {
    fn default() -> Self {
        Self {
            fee_rate: default_fee_rate(),
            daily_limit_ton: default_daily_limit(),
            monthly_limit_ton: default_monthly_limit(),
        }
    }
}
