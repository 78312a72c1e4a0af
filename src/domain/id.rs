//! Domain identifier types with proper encapsulation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// User identifier - newtype for type safety.
///
/// The inner String is private to ensure all construction goes through
/// the defined constructors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Create a new `UserId` from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the user ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for UserId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Asset symbol a market is written on, e.g. `TON` or `GIFTS`.
///
/// Symbols are normalized to upper case so allow-list checks and market
/// lookups are case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Asset(String);

impl Asset {
    /// Create a new `Asset`, trimming and upper-casing the symbol.
    pub fn new(symbol: impl AsRef<str>) -> Self {
        Self(symbol.as_ref().trim().to_ascii_uppercase())
    }

    /// Get the symbol as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Asset {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Asset {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<Asset> for String {
    fn from(asset: Asset) -> Self {
        asset.0
    }
}

macro_rules! sequence_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// Create a new identifier from a u64 value.
            #[must_use]
            pub const fn new(id: u64) -> Self {
                Self(id)
            }

            /// Get the underlying value.
            #[must_use]
            pub const fn value(&self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "-{}"), self.0)
            }
        }
    };
}

sequence_id!(
    /// Market identifier, assigned in creation order.
    MarketId,
    "mkt"
);

sequence_id!(
    /// Bet identifier, monotonically increasing across all markets.
    BetId,
    "bet"
);

sequence_id!(
    /// Withdrawal request identifier.
    WithdrawalId,
    "wd"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_id_new_and_as_str() {
        let id = UserId::new("tg-42");
        assert_eq!(id.as_str(), "tg-42");
        assert_eq!(format!("{id}"), "tg-42");
    }

    #[test]
    fn asset_is_normalized() {
        assert_eq!(Asset::new(" gifts ").as_str(), "GIFTS");
        assert_eq!(Asset::from("ton"), Asset::from("TON"));
    }

    #[test]
    fn asset_is_normalized_when_deserialized() {
        let asset: Asset = serde_json::from_str("\"gifts\"").unwrap();
        assert_eq!(asset.as_str(), "GIFTS");
        assert_eq!(serde_json::to_string(&asset).unwrap(), "\"GIFTS\"");
    }

    #[test]
    fn sequence_ids_display_with_prefix() {
        assert_eq!(MarketId::new(3).to_string(), "mkt-3");
        assert_eq!(BetId::new(7).to_string(), "bet-7");
        assert_eq!(WithdrawalId::new(1).to_string(), "wd-1");
    }

    #[test]
    fn sequence_ids_serialize_as_numbers() {
        let json = serde_json::to_string(&MarketId::new(12)).unwrap();
        assert_eq!(json, "12");
        let back: MarketId = serde_json::from_str("12").unwrap();
        assert_eq!(back.value(), 12);
    }
}
