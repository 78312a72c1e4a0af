//! Price index port.
//!
//! The market registry only needs a number per asset: a spot price, a
//! market capitalization or a fixed constant are all valid sources.

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::Asset;
use crate::error::PriceError;

/// Source of the numeric index a market is struck and settled against.
#[async_trait]
pub trait PriceIndexProvider: Send + Sync {
    /// Current index value for `asset`.
    async fn query(&self, asset: &Asset) -> Result<Decimal, PriceError>;

    /// Provider name for logs.
    fn name(&self) -> &'static str;
}
