//! Request dispatch onto the [`Engine`].

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::application::engine::Engine;
use crate::domain::UserId;
use crate::error::{Error, Result, WithdrawalError};
use crate::port::inbound::api::{ErrorReply, Reply, Request, RequestHandler, Response};

impl Engine {
    async fn execute(&self, request: Request) -> Result<Response> {
        let response = match request {
            Request::OpenBet {
                user_id,
                asset,
                direction,
                amount,
                expiry_minutes,
            } => {
                let receipt = self
                    .open_bet(&user_id, &asset, direction, amount, expiry_minutes)
                    .await?;
                Response::BetOpened {
                    bet: receipt.bet,
                    market_id: receipt.market_id,
                }
            }
            Request::ListMarkets { user_id } => Response::Markets {
                markets: self.list_markets(user_id.as_ref()).await,
            },
            Request::SettleMarket { market_id } => {
                Response::Market(Box::new(self.settle_market(market_id).await?))
            }
            Request::Balance { user_id } => Response::Balance {
                balance_ton: self.balance(&user_id).await?,
            },
            Request::Withdraw {
                user_id,
                to,
                amount_ton,
            } => {
                let receipt = self.withdraw(&user_id, &to, amount_ton).await?;
                Response::WithdrawalAccepted {
                    request_id: receipt.request.id(),
                    fee_ton: receipt.request.fee_ton(),
                    net_ton: receipt.request.net_ton(),
                    daily: receipt.limits.daily,
                    monthly: receipt.limits.monthly,
                }
            }
            Request::Limits { user_id } => Response::Limits(self.limits(&user_id)),
            Request::AdminCredit {
                user_id,
                amount_ton,
            } => {
                let balance_ton = self.credit(&user_id, amount_ton).await?;
                Response::Credited {
                    user_id,
                    balance_ton,
                }
            }
            Request::AdminPendingWithdrawals => Response::Withdrawals {
                withdrawals: self.pending_withdrawals(),
            },
            Request::AdminCompleteWithdrawal { request_id, tx_ref } => {
                Response::Withdrawal(Box::new(self.complete_withdrawal(request_id, &tx_ref)?))
            }
        };
        Ok(response)
    }

    fn error_reply(&self, request_user: Option<&UserId>, error: &Error) -> ErrorReply {
        let reply = ErrorReply::from_error(error);
        match (error, request_user) {
            (
                Error::Withdrawal(
                    WithdrawalError::DailyLimitExceeded { .. }
                    | WithdrawalError::MonthlyLimitExceeded { .. },
                ),
                Some(user_id),
            ) => reply.with_usage(self.limits(user_id)),
            _ => reply,
        }
    }
}

#[async_trait]
impl RequestHandler for Engine {
    async fn handle(&self, request: Request) -> Reply {
        let user_id = request.user_id().cloned();
        match self.execute(request).await {
            Ok(response) => Reply::Ok(response),
            Err(e) => {
                if e.is_client_error() {
                    debug!(code = e.code(), error = %e, "Request refused");
                } else {
                    warn!(code = e.code(), error = %e, "Request failed");
                }
                Reply::Err(self.error_reply(user_id.as_ref(), &e))
            }
        }
    }
}
