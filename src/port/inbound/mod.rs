//! Inbound (driving) ports consumed by inbound adapters.
//!
//! # Modules
//!
//! - [`api`]: Request/reply types and the [`RequestHandler`](api::RequestHandler) trait

pub mod api;
