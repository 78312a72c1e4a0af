//! Exchange-agnostic domain types: balances, markets, bets and withdrawals.

pub mod id;
pub mod market;
pub mod money;
pub mod settlement;
pub mod withdrawal;

pub use id::{Asset, BetId, MarketId, UserId, WithdrawalId};
pub use market::{Bet, Direction, Market, MarketStatus, Pools, Settlement};
pub use money::Ton;
pub use settlement::{Outcome, Payout};
pub use withdrawal::{LimitsView, Usage, WindowUsage, WithdrawalRequest, WithdrawalStatus};
