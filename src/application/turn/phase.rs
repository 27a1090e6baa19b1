//! Lifecycle phases of a single turn.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a turn currently stands while the handler works through it.
///
/// A turn moves strictly forward:
///
/// ```text
/// AwaitingInput -> AgentSelected -> OperationPending -> ReplyReady
///       \                \________________________________/
///        \________________________________________________/
/// ```
///
/// `OperationPending` is skipped when the handling agent answers without
/// requesting an operation, and `AgentSelected` is skipped when the
/// coordinator replies directly or the turn falls back to a degraded reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnPhase {
    /// The user utterance has been recorded; no agent chosen yet.
    AwaitingInput,
    /// The coordinator has settled on a handling agent.
    AgentSelected,
    /// The handling agent requested an operation; it has not been
    /// executed and summarised yet.
    OperationPending,
    /// A reply for the user exists and the turn is about to complete.
    ReplyReady,
}

impl TurnPhase {
    /// Whether moving to `next` respects the forward-only ordering.
    pub fn can_advance_to(self, next: TurnPhase) -> bool {
        use TurnPhase::*;
        matches!(
            (self, next),
            (AwaitingInput, AgentSelected)
                | (AgentSelected, OperationPending)
                | (AgentSelected, ReplyReady)
                | (OperationPending, ReplyReady)
                | (AwaitingInput, ReplyReady)
        )
    }

    /// Move to `next`, logging the transition.
    ///
    /// Backwards transitions indicate a handler bug and are rejected in
    /// debug builds.
    pub(crate) fn advance(&mut self, next: TurnPhase) {
        debug_assert!(
            self.can_advance_to(next),
            "invalid turn transition {self} -> {next}"
        );
        tracing::debug!(from = %self, to = %next, "turn phase");
        *self = next;
    }
}

impl fmt::Display for TurnPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TurnPhase::AwaitingInput => "awaiting_input",
            TurnPhase::AgentSelected => "agent_selected",
            TurnPhase::OperationPending => "operation_pending",
            TurnPhase::ReplyReady => "reply_ready",
        };
        f.write_str(label)
    }
}
