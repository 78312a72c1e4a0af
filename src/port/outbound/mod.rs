//! Outbound ports (driven side): interfaces implemented by outbound adapters.
//!
//! These contracts describe infrastructure dependencies such as balance
//! storage, price index sources, the clock and notifications.

pub mod clock;
pub mod notifier;
pub mod price;
pub mod store;
