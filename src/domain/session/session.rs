//! Session aggregate.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{SessionId, Timestamp, UserId};

use super::state::SessionState;
use super::transcript::TranscriptMessage;

/// Per-user conversational context plus its mutable state.
///
/// The aggregate owns its `SessionState` exclusively; state mutation goes
/// through operation execution at the application boundary, which is why
/// `state_mut` is crate-internal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    id: SessionId,
    user_id: UserId,
    created_at: Timestamp,
    state: SessionState,
    transcript: Vec<TranscriptMessage>,
}

impl Session {
    /// Creates a new session with the given initial state.
    pub fn new(id: SessionId, user_id: UserId, initial_state: SessionState) -> Self {
        Self {
            id,
            user_id,
            created_at: Timestamp::now(),
            state: initial_state,
            transcript: Vec::new(),
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    /// Read access to the shared state.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Mutable state access for operation execution only.
    pub(crate) fn state_mut(&mut self) -> &mut SessionState {
        &mut self.state
    }

    /// The conversational record, oldest first.
    pub fn transcript(&self) -> &[TranscriptMessage] {
        &self.transcript
    }

    /// Appends a message to the transcript.
    pub fn append_message(&mut self, message: TranscriptMessage) {
        self.transcript.push(message);
    }
}
