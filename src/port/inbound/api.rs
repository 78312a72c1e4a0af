//! Request/reply surface consumed by inbound adapters.
//!
//! Requests are tagged by `op`; replies and request fields use camelCase.
//! Amounts are decimals and may be sent as JSON numbers or strings.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{
    Asset, Bet, Direction, LimitsView, Market, MarketId, UserId, WindowUsage, WithdrawalId,
    WithdrawalRequest,
};
use crate::error::Error;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum Request {
    OpenBet {
        user_id: UserId,
        asset: Asset,
        direction: Direction,
        amount: Decimal,
        expiry_minutes: i64,
    },
    ListMarkets {
        #[serde(default)]
        user_id: Option<UserId>,
    },
    SettleMarket {
        market_id: MarketId,
    },
    Balance {
        user_id: UserId,
    },
    Withdraw {
        user_id: UserId,
        to: String,
        amount_ton: Decimal,
    },
    Limits {
        user_id: UserId,
    },
    AdminCredit {
        user_id: UserId,
        amount_ton: Decimal,
    },
    AdminPendingWithdrawals,
    AdminCompleteWithdrawal {
        request_id: WithdrawalId,
        tx_ref: String,
    },
}

impl Request {
    /// User the request acts for, if any.
    #[must_use]
    pub fn user_id(&self) -> Option<&UserId> {
        match self {
            Self::OpenBet { user_id, .. }
            | Self::Balance { user_id }
            | Self::Withdraw { user_id, .. }
            | Self::Limits { user_id }
            | Self::AdminCredit { user_id, .. } => Some(user_id),
            Self::ListMarkets { user_id } => user_id.as_ref(),
            Self::SettleMarket { .. }
            | Self::AdminPendingWithdrawals
            | Self::AdminCompleteWithdrawal { .. } => None,
        }
    }
}

/// Successful outcome of a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Response {
    #[serde(rename_all = "camelCase")]
    BetOpened { bet: Bet, market_id: MarketId },
    Markets { markets: Vec<Market> },
    Market(Box<Market>),
    #[serde(rename_all = "camelCase")]
    Balance { balance_ton: Decimal },
    #[serde(rename_all = "camelCase")]
    WithdrawalAccepted {
        request_id: WithdrawalId,
        fee_ton: Decimal,
        net_ton: Decimal,
        daily: WindowUsage,
        monthly: WindowUsage,
    },
    Limits(LimitsView),
    #[serde(rename_all = "camelCase")]
    Credited { user_id: UserId, balance_ton: Decimal },
    Withdrawals { withdrawals: Vec<WithdrawalRequest> },
    Withdrawal(Box<WithdrawalRequest>),
}

/// Failure body: `{"status":400,"code":"...","error":"..."}`.
///
/// Limit failures also carry the caller's current usage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorReply {
    pub status: u16,
    pub code: &'static str,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<LimitsView>,
}

impl ErrorReply {
    #[must_use]
    pub fn from_error(error: &Error) -> Self {
        Self {
            status: if error.is_client_error() { 400 } else { 500 },
            code: error.code(),
            error: error.to_string(),
            usage: None,
        }
    }

    #[must_use]
    pub fn with_usage(mut self, usage: LimitsView) -> Self {
        self.usage = Some(usage);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Reply {
    Ok(Response),
    Err(ErrorReply),
}

impl Reply {
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        matches!(self, Self::Ok(_))
    }
}

/// Executes requests against the core.
#[async_trait]
pub trait RequestHandler: Send + Sync {
    async fn handle(&self, request: Request) -> Reply;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn parses_open_bet_with_numeric_amount() {
        let request: Request = serde_json::from_value(json!({
            "op": "open_bet",
            "userId": "alice",
            "asset": "ton",
            "direction": "above",
            "amount": 30,
            "expiryMinutes": 5
        }))
        .unwrap();

        assert_eq!(
            request,
            Request::OpenBet {
                user_id: UserId::from("alice"),
                asset: Asset::from("TON"),
                direction: Direction::Above,
                amount: dec!(30),
                expiry_minutes: 5,
            }
        );
    }

    #[test]
    fn parses_string_amounts_and_optional_filter() {
        let request: Request = serde_json::from_value(json!({
            "op": "withdraw", "userId": "alice", "to": "EQdest", "amountTon": "10.01"
        }))
        .unwrap();
        assert!(matches!(request, Request::Withdraw { amount_ton, .. } if amount_ton == dec!(10.01)));

        let request: Request = serde_json::from_value(json!({"op": "list_markets"})).unwrap();
        assert_eq!(request, Request::ListMarkets { user_id: None });
        assert_eq!(request.user_id(), None);
    }

    #[test]
    fn missing_param_is_a_parse_error() {
        assert!(serde_json::from_value::<Request>(json!({"op": "balance"})).is_err());
        assert!(serde_json::from_value::<Request>(json!({"op": "explode"})).is_err());
    }

    #[test]
    fn replies_serialize_flat() {
        let reply = Reply::Ok(Response::Balance {
            balance_ton: dec!(99.4),
        });
        assert_eq!(
            serde_json::to_value(&reply).unwrap(),
            json!({"balanceTon": "99.4"})
        );

        let err = Error::Validation("userId is required".into());
        let reply = Reply::Err(ErrorReply::from_error(&err));
        let value = serde_json::to_value(&reply).unwrap();
        assert_eq!(value["status"], 400);
        assert_eq!(value["code"], "validation");
        assert!(value.get("usage").is_none());
    }
}
