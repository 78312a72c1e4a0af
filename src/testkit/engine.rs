//! Fully wired engine for tests.

use std::sync::Arc;

use crate::adapter::outbound::memory::MemoryBalanceStore;
use crate::application::{Engine, EngineParts, MarketRules, WithdrawalPolicy};
use crate::port::outbound::notifier::NotifierRegistry;

use super::{config, ManualClock, RecordingNotifier, ScriptedIndexProvider};

/// An [`Engine`] on memory storage with handles to its test doubles.
pub struct TestEngine {
    pub engine: Engine,
    pub clock: Arc<ManualClock>,
    pub prices: Arc<ScriptedIndexProvider>,
    pub notifier: RecordingNotifier,
}

impl TestEngine {
    /// Canonical rules and policy, clock at 2025-03-01T12:00:30Z.
    #[must_use]
    pub fn new() -> Self {
        Self::with(config::market_rules(), config::withdrawal_policy())
    }

    #[must_use]
    pub fn with(rules: MarketRules, policy: WithdrawalPolicy) -> Self {
        let clock = Arc::new(ManualClock::at("2025-03-01T12:00:30Z"));
        let prices = Arc::new(ScriptedIndexProvider::new());
        let notifier = RecordingNotifier::new();
        let mut notifiers = NotifierRegistry::new();
        notifiers.register(Box::new(notifier.clone()));

        let engine = Engine::new(EngineParts {
            store: Arc::new(MemoryBalanceStore::new()),
            prices: prices.clone(),
            clock: clock.clone(),
            notifiers,
            rules,
            policy,
        });

        Self {
            engine,
            clock,
            prices,
            notifier,
        }
    }
}

impl Default for TestEngine {
    fn default() -> Self {
        Self::new()
    }
}
