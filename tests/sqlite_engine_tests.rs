//! Engine on a SQLite balance store.

mod support;

use std::sync::Arc;

use chrono::Duration;
use rust_decimal_macros::dec;
use tonmarket::domain::{Asset, Direction, UserId};
use tonmarket::infrastructure::bootstrap::build_engine_with_clock;
use tonmarket::infrastructure::Config;
use tonmarket::testkit::ManualClock;

use support::config::{sqlite_config, write_temp_config};

#[tokio::test]
async fn balances_survive_an_engine_restart() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_temp_config(&sqlite_config(&dir.path().join("ledger.db")));
    let config = Config::load(file.path()).unwrap();
    let clock = Arc::new(ManualClock::at("2025-03-01T12:00:00Z"));
    let alice = UserId::from("alice");

    {
        let engine = build_engine_with_clock(&config, clock.clone()).unwrap();
        engine.credit(&alice, dec!(100)).await.unwrap();
        engine.withdraw(&alice, "EQdest", dec!(25.5)).await.unwrap();
    }

    let engine = build_engine_with_clock(&config, clock).unwrap();
    assert_eq!(engine.balance(&alice).await.unwrap(), dec!(74.5));
    // Limits and the queue are process-local.
    assert_eq!(engine.limits(&alice).daily.used, dec!(0));
    assert!(engine.pending_withdrawals().is_empty());
}

#[tokio::test]
async fn draw_on_sqlite_restores_stake() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = Config::load(
        write_temp_config(&sqlite_config(&dir.path().join("ledger.db"))).path(),
    )
    .unwrap();
    config.price.fixed.insert("GIFTS".into(), dec!(1000));
    let clock = Arc::new(ManualClock::at("2025-03-01T12:00:00Z"));
    let engine = build_engine_with_clock(&config, clock.clone()).unwrap();
    let bob = UserId::from("bob");

    engine.credit(&bob, dec!(12.345678901)).await.unwrap();
    let receipt = engine
        .open_bet(&bob, &Asset::from("GIFTS"), Direction::Below, dec!(2.000000001), 1)
        .await
        .unwrap();
    assert_eq!(engine.balance(&bob).await.unwrap(), dec!(10.3456789));

    clock.advance(Duration::minutes(2));
    engine.settle_market(receipt.market_id).await.unwrap();
    assert_eq!(engine.balance(&bob).await.unwrap(), dec!(12.345678901));
}
