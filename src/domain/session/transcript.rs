//! Transcript messages - the conversational record of a session.
//!
//! Distinct from the interaction log: the transcript holds every utterance
//! and reply, while the log records only audited purchase/refund actions.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;

/// Who produced a transcript message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TranscriptRole {
    User,
    Assistant,
}

/// One message in a session's transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptMessage {
    pub role: TranscriptRole,
    pub content: String,
    pub timestamp: Timestamp,
}

impl TranscriptMessage {
    /// Creates a user message stamped now.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: TranscriptRole::User,
            content: content.into(),
            timestamp: Timestamp::now(),
        }
    }

    /// Creates an assistant message stamped now.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: TranscriptRole::Assistant,
            content: content.into(),
            timestamp: Timestamp::now(),
        }
    }
}
