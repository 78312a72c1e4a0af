//! Message formatting for Telegram notifications.

use crate::domain::Outcome;
use crate::port::outbound::notifier::Event;

use super::notifier::TelegramConfig;

/// Format an event into a Telegram message, or None if the event should be skipped.
pub fn format_event_message(event: &Event, config: &TelegramConfig) -> Option<String> {
    match event {
        Event::BetPlaced(e) if config.notify_bets => Some(format!(
            "🎲 *Bet Placed*\n\
            \n\
            📋 Market: `{}` {}\n\
            👤 User: {}\n\
            📈 {} `{}` TON",
            e.market_id,
            escape_markdown(&e.asset),
            escape_markdown(&truncate(&e.user_id, 24)),
            escape_markdown(&e.direction),
            e.stake
        )),
        Event::MarketSettled(e) if config.notify_settlements => {
            let outcome = match e.outcome {
                Outcome::Above => "⬆️ Above",
                Outcome::Below => "⬇️ Below",
                Outcome::Draw => "🤝 Draw",
            };
            Some(format!(
                "🏁 *Market Settled*\n\
                \n\
                📋 Market: `{}` {}\n\
                🎯 Strike: `{}` → `{}`\n\
                {}\n\
                💰 Pool: `{}` TON, fee `{}` TON\n\
                🏆 Winners: `{}`",
                e.market_id,
                escape_markdown(&e.asset),
                e.strike,
                e.settle_index,
                outcome,
                e.pool_total,
                e.fee_collected,
                e.winners
            ))
        }
        Event::WithdrawalRequested(e) if config.notify_withdrawals => Some(format!(
            "💸 *Withdrawal Requested*\n\
            \n\
            🧾 Request: `{}`\n\
            👤 User: {}\n\
            📬 To: `{}`\n\
            💵 Amount: `{}` TON \\(net `{}`, fee `{}`\\)",
            e.request_id,
            escape_markdown(&truncate(&e.user_id, 24)),
            escape_code(&e.to),
            e.amount,
            e.net,
            e.fee
        )),
        Event::WithdrawalCompleted(e) if config.notify_withdrawals => Some(format!(
            "✅ *Withdrawal Completed*\n\
            \n\
            🧾 Request: `{}`\n\
            🔗 Tx: `{}`",
            e.request_id,
            escape_code(e.tx_ref.as_deref().unwrap_or("-"))
        )),
        _ => None,
    }
}

/// Truncate a string with ellipsis (Unicode-safe).
pub fn truncate(s: &str, max_chars: usize) -> String {
    let char_count = s.chars().count();
    if char_count > max_chars {
        let truncated: String = s.chars().take(max_chars).collect();
        format!("{}...", truncated)
    } else {
        s.to_string()
    }
}

/// Escape special characters for Telegram `MarkdownV2`.
pub fn escape_markdown(text: &str) -> String {
    let special_chars = [
        '_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.', '!',
    ];
    let mut result = String::with_capacity(text.len() * 2);

    for c in text.chars() {
        if special_chars.contains(&c) {
            result.push('\\');
        }
        result.push(c);
    }

    result
}

/// Escape text placed inside an inline code span.
pub fn escape_code(text: &str) -> String {
    text.replace('\\', "\\\\").replace('`', "\\`")
}
