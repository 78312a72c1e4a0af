//! Inbound adapters (driving side).

pub mod jsonl;
