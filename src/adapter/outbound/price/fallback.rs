//! Ordered chain of index sources.

use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;
use tracing::warn;

use crate::domain::Asset;
use crate::error::PriceError;
use crate::port::outbound::price::PriceIndexProvider;

/// Asks each provider in turn and returns the first answer.
///
/// When every provider fails the last error is returned.
pub struct FallbackIndexProvider {
    providers: Vec<Arc<dyn PriceIndexProvider>>,
}

impl FallbackIndexProvider {
    #[must_use]
    pub fn new(providers: Vec<Arc<dyn PriceIndexProvider>>) -> Self {
        Self { providers }
    }
}

#[async_trait]
impl PriceIndexProvider for FallbackIndexProvider {
    async fn query(&self, asset: &Asset) -> Result<Decimal, PriceError> {
        let mut last = PriceError::NoSource {
            asset: asset.to_string(),
        };
        for provider in &self.providers {
            match provider.query(asset).await {
                Ok(value) => return Ok(value),
                Err(e) => {
                    warn!(provider = provider.name(), asset = %asset, error = %e, "Price source failed, trying next");
                    last = e;
                }
            }
        }
        Err(last)
    }

    fn name(&self) -> &'static str {
        "fallback"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::outbound::price::FixedIndexProvider;
    use rust_decimal_macros::dec;

    struct Failing;

    #[async_trait]
    impl PriceIndexProvider for Failing {
        async fn query(&self, asset: &Asset) -> Result<Decimal, PriceError> {
            Err(PriceError::Unavailable {
                asset: asset.to_string(),
                reason: "down".into(),
            })
        }

        fn name(&self) -> &'static str {
            "failing"
        }
    }

    #[tokio::test]
    async fn first_success_wins() {
        let chain = FallbackIndexProvider::new(vec![
            Arc::new(Failing),
            Arc::new(FixedIndexProvider::new(dec!(7))),
            Arc::new(FixedIndexProvider::new(dec!(9))),
        ]);
        assert_eq!(chain.query(&Asset::from("TON")).await.unwrap(), dec!(7));
    }

    #[tokio::test]
    async fn all_failing_returns_last_error() {
        let chain = FallbackIndexProvider::new(vec![Arc::new(Failing), Arc::new(Failing)]);
        let err = chain.query(&Asset::from("TON")).await.unwrap_err();
        assert!(matches!(err, PriceError::Unavailable { .. }));
    }

    #[tokio::test]
    async fn empty_chain_has_no_source() {
        let chain = FallbackIndexProvider::new(Vec::new());
        let err = chain.query(&Asset::from("TON")).await.unwrap_err();
        assert!(matches!(err, PriceError::NoSource { .. }));
    }
}
