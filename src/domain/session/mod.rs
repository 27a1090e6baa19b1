//! Session - per-user conversational context and its mutable state.
//!
//! One `Session` exists per user identity, created lazily on first contact
//! and living for the process lifetime (expiry can be added behind the store
//! port without touching this module). The `SessionState` inside it is
//! mutated only by operation execution, never directly by an agent.

mod session;
mod state;
mod transcript;

pub use session::Session;
pub use state::{LogAction, LogEntry, PurchaseRecord, SessionState};
pub use transcript::{TranscriptMessage, TranscriptRole};
