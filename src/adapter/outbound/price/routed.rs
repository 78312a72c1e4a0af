//! Per-asset routing between index sources.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::Asset;
use crate::error::PriceError;
use crate::port::outbound::price::PriceIndexProvider;

/// Sends each asset to its own provider, or to a default one.
#[derive(Default)]
pub struct RoutedIndexProvider {
    routes: HashMap<Asset, Arc<dyn PriceIndexProvider>>,
    default: Option<Arc<dyn PriceIndexProvider>>,
}

impl RoutedIndexProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Route `asset` to `provider`.
    #[must_use]
    pub fn route(mut self, asset: Asset, provider: Arc<dyn PriceIndexProvider>) -> Self {
        self.routes.insert(asset, provider);
        self
    }

    /// Provider for assets without a dedicated route.
    #[must_use]
    pub fn with_default(mut self, provider: Arc<dyn PriceIndexProvider>) -> Self {
        self.default = Some(provider);
        self
    }
}

#[async_trait]
impl PriceIndexProvider for RoutedIndexProvider {
    async fn query(&self, asset: &Asset) -> Result<Decimal, PriceError> {
        match self.routes.get(asset).or(self.default.as_ref()) {
            Some(provider) => provider.query(asset).await,
            None => Err(PriceError::NoSource {
                asset: asset.to_string(),
            }),
        }
    }

    fn name(&self) -> &'static str {
        "routed"
    }
}
