//! Scripted reasoning engine for tests.
//!
//! Returns pre-configured outcomes in order, captures every request for
//! verification, and can inject errors and simulated latency, so turn-loop
//! behavior is testable without a real provider.
//!
//! # Example
//!
//! ```ignore
//! let engine = ScriptedEngine::new()
//!     .with_transfer("sales")
//!     .with_reply("Happy to help!");
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

use crate::domain::operations::OperationCall;
use crate::ports::{InferenceOutcome, InferenceRequest, ReasoningEngine, ReasoningError};

/// Queue-driven reasoning engine.
#[derive(Debug, Clone, Default)]
pub struct ScriptedEngine {
    script: Arc<Mutex<VecDeque<Result<InferenceOutcome, ReasoningError>>>>,
    requests: Arc<Mutex<Vec<InferenceRequest>>>,
    delay: Duration,
}

impl ScriptedEngine {
    /// Creates an engine with an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a free-text reply.
    pub fn with_reply(self, content: impl Into<String>) -> Self {
        self.push(Ok(InferenceOutcome::Reply(content.into())));
        self
    }

    /// Queues an operation invocation.
    pub fn with_invocation(self, name: impl Into<String>, arguments: serde_json::Value) -> Self {
        self.push(Ok(InferenceOutcome::Invoke(OperationCall::new(
            name, arguments,
        ))));
        self
    }

    /// Queues a transfer to the named delegate.
    pub fn with_transfer(self, agent: impl Into<String>) -> Self {
        self.push(Ok(InferenceOutcome::Transfer {
            agent: agent.into(),
        }));
        self
    }

    /// Queues an error.
    pub fn with_error(self, error: ReasoningError) -> Self {
        self.push(Err(error));
        self
    }

    /// Adds simulated latency per inference.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    fn push(&self, entry: Result<InferenceOutcome, ReasoningError>) {
        self.script.lock().unwrap().push_back(entry);
    }

    /// Requests captured so far, in order.
    pub fn requests(&self) -> Vec<InferenceRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of inferences performed.
    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Unconsumed script entries.
    pub fn remaining(&self) -> usize {
        self.script.lock().unwrap().len()
    }
}

#[async_trait]
impl ReasoningEngine for ScriptedEngine {
    async fn infer(&self, request: InferenceRequest) -> Result<InferenceOutcome, ReasoningError> {
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        self.requests.lock().unwrap().push(request);

        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ReasoningError::unavailable("script exhausted")))
    }
}
