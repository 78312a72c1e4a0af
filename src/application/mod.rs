//! Application services (use cases).
//!
//! These services own the ledger, market and withdrawal state and
//! coordinate the outbound ports to implement each request.

pub mod api;
pub mod engine;
pub mod ledger;
pub mod market;
pub mod sweeper;
pub mod withdrawal;

pub use engine::{BetReceipt, Engine, EngineParts};
pub use ledger::{Ledger, UserGuard};
pub use market::{MarketRegistry, MarketRules};
pub use sweeper::{SettlementSweeper, SweeperHandle};
pub use withdrawal::{WithdrawalDesk, WithdrawalPolicy, WithdrawalReceipt};
