use rust_decimal::Decimal;
use tonmarket::domain::{Asset, Direction, MarketId, UserId};
use tonmarket::testkit::engine::TestEngine;

/// Credit `user` and place one bet, returning the market it landed in.
pub async fn funded_bet(
    t: &TestEngine,
    user: &str,
    balance: Decimal,
    asset: &str,
    direction: Direction,
    stake: Decimal,
    expiry_minutes: i64,
) -> MarketId {
    let user_id = UserId::from(user);
    t.engine.credit(&user_id, balance).await.expect("credit");
    t.engine
        .open_bet(&user_id, &Asset::from(asset), direction, stake, expiry_minutes)
        .await
        .expect("open bet")
        .market_id
}

pub async fn balance(t: &TestEngine, user: &str) -> Decimal {
    t.engine
        .balance(&UserId::from(user))
        .await
        .expect("balance")
}
