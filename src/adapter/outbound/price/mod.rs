//! Price index adapters.
//!
//! Every source implements
//! [`PriceIndexProvider`](crate::port::outbound::price::PriceIndexProvider);
//! [`FallbackIndexProvider`] and [`RoutedIndexProvider`] compose them so
//! the market registry never sees which API answered.

mod fallback;
mod fixed;
mod http;
mod routed;

pub use fallback::FallbackIndexProvider;
pub use fixed::FixedIndexProvider;
pub use http::{parse_index, HttpIndexConfig, HttpIndexProvider};
pub use routed::RoutedIndexProvider;
