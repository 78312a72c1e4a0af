//! Withdrawal limits and queue through the engine.

mod support;

use chrono::Duration;
use rust_decimal_macros::dec;
use tonmarket::application::WithdrawalPolicy;
use tonmarket::domain::{UserId, WithdrawalStatus};
use tonmarket::testkit::config::market_rules;
use tonmarket::testkit::engine::TestEngine;

#[tokio::test]
async fn daily_boundary_accepts_exact_limit_and_rejects_epsilon_over() {
    let t = TestEngine::new();
    let alice = UserId::from("alice");
    t.engine.credit(&alice, dec!(1000)).await.unwrap();

    t.engine.withdraw(&alice, "EQdest", dec!(490)).await.unwrap();

    let err = t.engine.withdraw(&alice, "EQdest", dec!(10.01)).await.unwrap_err();
    assert_eq!(err.code(), "daily_limit_exceeded");

    let receipt = t.engine.withdraw(&alice, "EQdest", dec!(10)).await.unwrap();
    assert_eq!(receipt.limits.daily.used, dec!(500));
    assert_eq!(receipt.limits.daily.remaining, dec!(0));
}

#[tokio::test]
async fn monthly_limit_applies_across_days() {
    let policy = WithdrawalPolicy {
        fee_rate: dec!(0.01),
        daily_limit: dec!(100),
        monthly_limit: dec!(250),
    };
    let t = TestEngine::with(market_rules(), policy);
    let alice = UserId::from("alice");
    t.engine.credit(&alice, dec!(1000)).await.unwrap();

    for _ in 0..2 {
        t.engine.withdraw(&alice, "EQdest", dec!(100)).await.unwrap();
        t.clock.advance(Duration::days(1));
    }
    let err = t.engine.withdraw(&alice, "EQdest", dec!(60)).await.unwrap_err();
    assert_eq!(err.code(), "monthly_limit_exceeded");
    t.engine.withdraw(&alice, "EQdest", dec!(50)).await.unwrap();

    t.clock.advance(Duration::days(30));
    let limits = t.engine.limits(&alice);
    assert_eq!(limits.monthly.used, dec!(0));
    assert_eq!(limits.monthly.remaining, dec!(250));
}

#[tokio::test]
async fn fee_is_split_from_gross_amount() {
    let t = TestEngine::new();
    let bob = UserId::from("bob");
    t.engine.credit(&bob, dec!(200)).await.unwrap();

    let receipt = t.engine.withdraw(&bob, "EQbob", dec!(150)).await.unwrap();

    assert_eq!(receipt.request.fee_ton(), dec!(1.5));
    assert_eq!(receipt.request.net_ton(), dec!(148.5));
    assert_eq!(t.engine.balance(&bob).await.unwrap(), dec!(50));
}

#[tokio::test]
async fn pending_queue_drains_on_completion() {
    let t = TestEngine::new();
    let alice = UserId::from("alice");
    let bob = UserId::from("bob");
    t.engine.credit(&alice, dec!(10)).await.unwrap();
    t.engine.credit(&bob, dec!(10)).await.unwrap();

    let first = t.engine.withdraw(&alice, "EQa", dec!(1)).await.unwrap().request;
    let second = t.engine.withdraw(&bob, "EQb", dec!(2)).await.unwrap().request;

    let pending = t.engine.pending_withdrawals();
    assert_eq!(
        pending.iter().map(|r| r.id()).collect::<Vec<_>>(),
        vec![first.id(), second.id()]
    );

    let done = t.engine.complete_withdrawal(first.id(), "tx-1").unwrap();
    assert_eq!(done.status(), WithdrawalStatus::Completed);
    assert_eq!(t.engine.pending_withdrawals(), vec![second]);
}

#[tokio::test]
async fn rejected_request_does_not_count_against_limits() {
    let t = TestEngine::new();
    let alice = UserId::from("alice");
    t.engine.credit(&alice, dec!(20)).await.unwrap();

    let err = t.engine.withdraw(&alice, "EQdest", dec!(30)).await.unwrap_err();
    assert_eq!(err.code(), "insufficient_balance");

    assert_eq!(t.engine.limits(&alice).daily.used, dec!(0));
    assert!(t.engine.pending_withdrawals().is_empty());
}
