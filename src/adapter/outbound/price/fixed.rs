//! Constant index source.

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::Asset;
use crate::error::PriceError;
use crate::port::outbound::price::PriceIndexProvider;

/// Returns the same configured value for every query.
///
/// Used for asset classes that have no live feed.
#[derive(Debug, Clone, Copy)]
pub struct FixedIndexProvider {
    value: Decimal,
}

impl FixedIndexProvider {
    #[must_use]
    pub const fn new(value: Decimal) -> Self {
        Self { value }
    }
}

#[async_trait]
impl PriceIndexProvider for FixedIndexProvider {
    async fn query(&self, _asset: &Asset) -> Result<Decimal, PriceError> {
        Ok(self.value)
    }

    fn name(&self) -> &'static str {
        "fixed"
    }
}
