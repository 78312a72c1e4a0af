use rust_decimal::Decimal;
use thiserror::Error;

use crate::domain::id::{MarketId, UserId, WithdrawalId};

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Balance ledger errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("invalid amount: {amount}")]
    InvalidAmount { amount: Decimal },

    #[error("insufficient balance for {user_id}: {available} < {requested}")]
    InsufficientBalance {
        user_id: UserId,
        available: Decimal,
        requested: Decimal,
    },
}

/// Prediction market errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MarketError {
    #[error("unsupported asset: {0}")]
    UnsupportedAsset(String),

    #[error("market not found: {0}")]
    NotFound(MarketId),

    #[error("market {0} is closed for betting")]
    Closed(MarketId),

    #[error("market {market_id} not expired (expires at {expiry})")]
    NotExpired {
        market_id: MarketId,
        expiry: chrono::DateTime<chrono::Utc>,
    },

    #[error("stake must be positive, got {stake}")]
    NonPositiveStake { stake: Decimal },

    #[error("expiry must be between 1 and {max} minutes, got {minutes}")]
    InvalidExpiry { minutes: i64, max: i64 },

    #[error("stakes in market {0} exceed the representable amount")]
    Overflow(MarketId),
}

/// Withdrawal limiter and queue errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WithdrawalError {
    #[error("withdrawal amount must be positive, got {amount}")]
    InvalidAmount { amount: Decimal },

    #[error("daily withdrawal limit exceeded: {used} used + {requested} requested > {limit}")]
    DailyLimitExceeded {
        requested: Decimal,
        used: Decimal,
        limit: Decimal,
    },

    #[error("monthly withdrawal limit exceeded: {used} used + {requested} requested > {limit}")]
    MonthlyLimitExceeded {
        requested: Decimal,
        used: Decimal,
        limit: Decimal,
    },

    #[error("withdrawal not found: {0}")]
    NotFound(WithdrawalId),

    #[error("withdrawal {0} already processed")]
    AlreadyProcessed(WithdrawalId),
}

/// Price index lookup failures.
///
/// Never surfaced past the market registry; the registry substitutes a
/// zero index instead.
#[derive(Error, Debug, Clone)]
pub enum PriceError {
    #[error("no price source configured for {asset}")]
    NoSource { asset: String },

    #[error("price source unavailable for {asset}: {reason}")]
    Unavailable { asset: String, reason: String },

    #[error("malformed price response for {asset}: {reason}")]
    Malformed { asset: String, reason: String },
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Market(#[from] MarketError),

    #[error(transparent)]
    Withdrawal(#[from] WithdrawalError),

    #[error(transparent)]
    Price(#[from] PriceError),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("database error: {0}")]
    Database(String),
}

impl Error {
    /// Stable snake_case code for the inbound request surface.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Ledger(LedgerError::InvalidAmount { .. }) => "invalid_amount",
            Self::Ledger(LedgerError::InsufficientBalance { .. }) => "insufficient_balance",
            Self::Market(MarketError::UnsupportedAsset(_)) => "unsupported_asset",
            Self::Market(MarketError::NotFound(_)) => "not_found",
            Self::Market(MarketError::Closed(_)) => "market_closed",
            Self::Market(MarketError::NotExpired { .. }) => "not_expired",
            Self::Market(MarketError::NonPositiveStake { .. }) => "invalid_amount",
            Self::Market(MarketError::InvalidExpiry { .. }) => "validation",
            Self::Market(MarketError::Overflow(_)) => "invalid_amount",
            Self::Withdrawal(WithdrawalError::InvalidAmount { .. }) => "invalid_amount",
            Self::Withdrawal(WithdrawalError::DailyLimitExceeded { .. }) => "daily_limit_exceeded",
            Self::Withdrawal(WithdrawalError::MonthlyLimitExceeded { .. }) => {
                "monthly_limit_exceeded"
            }
            Self::Withdrawal(WithdrawalError::NotFound(_)) => "not_found",
            Self::Withdrawal(WithdrawalError::AlreadyProcessed(_)) => "already_processed",
            Self::Price(_) => "external_provider_failure",
            Self::Validation(_) | Self::Json(_) => "validation",
            Self::Http(_) | Self::Url(_) => "external_provider_failure",
            Self::Io(_) | Self::Connection(_) | Self::Database(_) => "internal",
        }
    }

    /// True when the caller can fix the request and retry.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        !matches!(self.code(), "internal" | "config")
    }
}

pub type Result<T> = std::result::Result<T, Error>;
