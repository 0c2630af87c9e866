//! Interaction logging: JSONL append-only with graceful degradation.

pub mod jsonl;
pub mod shared;

pub use jsonl::{InteractionEvent, InteractionLog, LogEntry, Severity};
pub use shared::LogHandle;
