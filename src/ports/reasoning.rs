//! Reasoning engine port - the opaque natural-language capability.
//!
//! Given instructions, a transcript, and the operations and delegates
//! available to the current agent, a conforming provider produces exactly
//! one of: a free-text reply, a request to invoke one operation, or a
//! request to transfer the turn to a named delegate. Any provider with
//! that contract is acceptable.
//!
//! # Design
//!
//! - One suspension point per turn: only `infer` may block for long, and
//!   callers may cancel or time it out freely because state mutation
//!   happens strictly after it returns.
//! - Errors here are the one condition that surfaces at the turn boundary;
//!   everything else travels as operation outcome data.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::operations::{OperationCall, OperationDefinition, OperationOutcome};
use crate::domain::session::TranscriptMessage;

/// A peer agent the current agent may transfer the turn to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelegateDescriptor {
    pub name: String,
    pub description: String,
}

impl DelegateDescriptor {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Everything a provider needs to produce one inference.
#[derive(Debug, Clone)]
pub struct InferenceRequest {
    /// Rendered instruction policy for the current agent.
    pub instructions: String,
    /// Conversation so far, oldest first, ending with the user's utterance.
    pub transcript: Vec<TranscriptMessage>,
    /// Operations the current agent may request.
    pub operations: Vec<OperationDefinition>,
    /// Delegates the current agent may transfer to.
    pub delegates: Vec<DelegateDescriptor>,
    /// Outcome of an operation executed earlier in this turn, if any.
    pub prior_outcome: Option<OperationOutcome>,
}

impl InferenceRequest {
    /// Creates a request with instructions and transcript only.
    pub fn new(instructions: impl Into<String>, transcript: Vec<TranscriptMessage>) -> Self {
        Self {
            instructions: instructions.into(),
            transcript,
            operations: Vec::new(),
            delegates: Vec::new(),
            prior_outcome: None,
        }
    }

    /// Sets the available operations.
    pub fn with_operations(mut self, operations: Vec<OperationDefinition>) -> Self {
        self.operations = operations;
        self
    }

    /// Sets the available delegates.
    pub fn with_delegates(mut self, delegates: Vec<DelegateDescriptor>) -> Self {
        self.delegates = delegates;
        self
    }

    /// Attaches a prior operation outcome for reply composition.
    pub fn with_prior_outcome(mut self, outcome: OperationOutcome) -> Self {
        self.prior_outcome = Some(outcome);
        self
    }
}

/// The provider's decision for one inference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InferenceOutcome {
    /// A final natural-language reply.
    Reply(String),
    /// A request to invoke exactly one operation.
    Invoke(OperationCall),
    /// A request to transfer the turn to the named delegate.
    Transfer { agent: String },
}

/// Failures of the reasoning engine itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReasoningError {
    /// Provider is unavailable.
    #[error("reasoning engine unavailable: {message}")]
    Unavailable { message: String },

    /// Request timed out.
    #[error("reasoning request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u32 },

    /// API key or authentication failed.
    #[error("reasoning engine authentication failed")]
    AuthenticationFailed,

    /// Network error during the request.
    #[error("network error: {0}")]
    Network(String),

    /// Provider response could not be parsed.
    #[error("failed to parse provider response: {0}")]
    Parse(String),

    /// Request was malformed before it left the process.
    #[error("invalid inference request: {0}")]
    InvalidRequest(String),
}

impl ReasoningError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        ReasoningError::Unavailable {
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        ReasoningError::Network(message.into())
    }

    pub fn parse(message: impl Into<String>) -> Self {
        ReasoningError::Parse(message.into())
    }
}

/// Port for the natural-language reasoning capability.
#[async_trait]
pub trait ReasoningEngine: Send + Sync {
    /// Produces one inference for the current agent.
    async fn infer(&self, request: InferenceRequest) -> Result<InferenceOutcome, ReasoningError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_builder_composes() {
        let request = InferenceRequest::new("be helpful", vec![])
            .with_delegates(vec![DelegateDescriptor::new("sales", "sells courses")])
            .with_prior_outcome(OperationOutcome::success(
                "current_time",
                serde_json::json!({}),
            ));

        assert_eq!(request.delegates.len(), 1);
        assert!(request.prior_outcome.is_some());
        assert!(request.operations.is_empty());
    }

    #[test]
    fn reasoning_engine_is_object_safe() {
        fn _accepts_dyn(_engine: &dyn ReasoningEngine) {}
    }

    #[test]
    fn errors_display_their_condition() {
        assert!(ReasoningError::unavailable("503")
            .to_string()
            .contains("unavailable"));
        assert!(ReasoningError::Timeout { timeout_secs: 30 }
            .to_string()
            .contains("30s"));
    }
}
