//! Scripted price index.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use rust_decimal::Decimal;

use crate::domain::Asset;
use crate::error::PriceError;
use crate::port::outbound::price::PriceIndexProvider;

/// Returns whatever the test last set for an asset; fails for unset assets.
#[derive(Debug, Default)]
pub struct ScriptedIndexProvider {
    values: Mutex<HashMap<Asset, Decimal>>,
    calls: AtomicUsize,
}

impl ScriptedIndexProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, asset: &str, value: Decimal) {
        self.values.lock().insert(Asset::from(asset), value);
    }

    /// Make lookups for `asset` fail.
    pub fn fail(&self, asset: &str) {
        self.values.lock().remove(&Asset::from(asset));
    }

    /// Number of queries served, failed ones included.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PriceIndexProvider for ScriptedIndexProvider {
    async fn query(&self, asset: &Asset) -> Result<Decimal, PriceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.values
            .lock()
            .get(asset)
            .copied()
            .ok_or_else(|| PriceError::Unavailable {
                asset: asset.to_string(),
                reason: "scripted failure".into(),
            })
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}
