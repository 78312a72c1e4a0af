//! Hexagonal ports.
//!
//! - [`inbound`] - the request/response contract offered to callers
//! - [`outbound`] - storage, price index, clock and notifier contracts

pub mod inbound;
pub mod outbound;
