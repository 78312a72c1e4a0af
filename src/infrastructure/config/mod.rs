//! Infrastructure configuration modules.

pub mod logging;
pub mod markets;
pub mod price;
pub mod settings;
pub mod settlement;
pub mod store;
pub mod telegram;
pub mod withdrawal;

pub use settings::Config;
