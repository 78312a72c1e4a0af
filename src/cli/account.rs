//! Handlers for the `balance` and `credit` commands.

use crate::application::Ledger;
use crate::cli::{output, BalanceArgs, CreditArgs};
use crate::domain::UserId;
use crate::error::{Error, Result};
use crate::infrastructure::bootstrap::build_store;
use crate::infrastructure::config::store::StoreBackend;
use crate::infrastructure::Config;

fn ledger(config: &Config) -> Result<Ledger> {
    if config.store.backend == StoreBackend::Memory {
        output::warn("Using the in-memory store; nothing is persisted");
    }
    Ok(Ledger::new(build_store(&config.store)?))
}

fn user(raw: &str) -> Result<UserId> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(Error::Validation("user id is required".into()));
    }
    Ok(UserId::new(raw))
}

/// Execute `balance <user>`.
pub async fn execute_balance(args: &BalanceArgs) -> Result<()> {
    let config = args.config.load()?;
    let user_id = user(&args.user)?;
    let balance = ledger(&config)?.balance(&user_id).await?;
    output::key_value(user_id.as_str(), format!("{balance} TON"));
    Ok(())
}

/// Execute `credit <user> <amount>`.
pub async fn execute_credit(args: &CreditArgs) -> Result<()> {
    let config = args.config.load()?;
    let user_id = user(&args.user)?;
    let balance = ledger(&config)?.credit(&user_id, args.amount).await?;
    output::ok(&format!("Credited {} TON", args.amount));
    output::key_value(user_id.as_str(), format!("{balance} TON"));
    Ok(())
}
