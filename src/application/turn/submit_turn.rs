//! Submit-turn command: one user utterance in, one reply out.
//!
//! The handler drives the whole turn: lazy session creation, coordinator
//! routing, at most one operation execution, and final reply composition.
//!
//! # Design
//!
//! - Turns for the same session are serialized with a per-session lock;
//!   turns for different sessions proceed concurrently.
//! - Session state mutates only after an inference has returned, so a
//!   cancelled or timed-out inference leaves the session untouched.
//! - State is saved immediately after an operation executes, before the
//!   final reply is composed. A crash between the two loses wording, not
//!   a purchase or refund.
//! - Engine failures never fail the turn: the user gets an apology, the
//!   result is flagged `degraded`, and the transcript is still persisted.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use thiserror::Error;
use tokio::sync::Mutex as TurnLock;
use tracing::Instrument;

use crate::domain::agents::{instructions_for, AgentKind};
use crate::domain::catalog::Catalog;
use crate::domain::foundation::{SessionId, Timestamp, UserId};
use crate::domain::operations::{OperationError, OperationOutcome, OperationRegistry};
use crate::domain::session::{Session, SessionState, TranscriptMessage};
use crate::ports::{
    DelegateDescriptor, InferenceOutcome, InferenceRequest, ReasoningEngine, SessionStore,
    SessionStoreError,
};

use super::phase::TurnPhase;

/// Reply used when the reasoning engine fails or misbehaves past retry.
pub const FALLBACK_REPLY: &str =
    "I'm sorry, I'm having trouble responding right now. Please try again in a moment.";

/// Wire name of the synthetic transfer capability, used when reporting
/// routing problems back to the engine as outcome data.
const TRANSFER_OPERATION: &str = "transfer_to_agent";

/// One user utterance addressed to the concierge.
#[derive(Debug, Clone)]
pub struct SubmitTurnCommand {
    pub user_id: UserId,
    pub utterance: String,
}

impl SubmitTurnCommand {
    pub fn new(user_id: impl Into<UserId>, utterance: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            utterance: utterance.into(),
        }
    }
}

/// What one completed turn produced.
#[derive(Debug, Clone)]
pub struct SubmitTurnResult {
    /// Session the turn ran against (created lazily on first contact).
    pub session_id: SessionId,
    /// Agent whose reply the user sees.
    pub agent: AgentKind,
    /// Natural-language reply for the user.
    pub reply: String,
    /// Outcome of the operation executed this turn, if any.
    pub executed_operation: Option<OperationOutcome>,
    /// True when the reply is a fallback because the engine failed.
    pub degraded: bool,
}

/// Failures that abort a turn.
///
/// Only persistence can abort a turn; reasoning failures degrade it
/// instead.
#[derive(Debug, Error)]
pub enum TurnError {
    #[error(transparent)]
    Store(#[from] SessionStoreError),
}

/// How the coordinator settled the routing question.
enum Selection {
    /// The coordinator answered the user directly.
    Handled { reply: String, degraded: bool },
    /// The turn belongs to this specialist.
    Routed(AgentKind),
}

/// Handles [`SubmitTurnCommand`]s against the ports.
pub struct SubmitTurnHandler {
    store: Arc<dyn SessionStore>,
    engine: Arc<dyn ReasoningEngine>,
    catalog: Arc<Catalog>,
    registry: OperationRegistry,
    turn_locks: Mutex<HashMap<SessionId, Arc<TurnLock<()>>>>,
}

impl SubmitTurnHandler {
    pub fn new(
        store: Arc<dyn SessionStore>,
        engine: Arc<dyn ReasoningEngine>,
        catalog: Arc<Catalog>,
        registry: OperationRegistry,
    ) -> Self {
        Self {
            store,
            engine,
            catalog,
            registry,
            turn_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Runs one full turn for the user.
    ///
    /// # Errors
    ///
    /// - `TurnError::Store` if the session cannot be created, loaded, or
    ///   saved
    pub async fn handle(&self, command: SubmitTurnCommand) -> Result<SubmitTurnResult, TurnError> {
        let session_id = self.ensure_session(&command.user_id).await?;

        let lock = self.turn_lock(session_id);
        let _serialized = lock.lock().await;

        let span = tracing::info_span!(
            "turn",
            session_id = %session_id,
            user_id = %command.user_id,
        );
        self.run_turn(session_id, &command.utterance)
            .instrument(span)
            .await
    }

    async fn run_turn(
        &self,
        session_id: SessionId,
        utterance: &str,
    ) -> Result<SubmitTurnResult, TurnError> {
        let mut session = self.store.load(&session_id).await?;
        session.append_message(TranscriptMessage::user(utterance));

        let mut phase = TurnPhase::AwaitingInput;

        let (agent, reply, executed_operation, degraded) =
            match self.select_agent(&session).await {
                Selection::Handled { reply, degraded } => {
                    (AgentKind::Coordinator, reply, None, degraded)
                }
                Selection::Routed(specialist) => {
                    phase.advance(TurnPhase::AgentSelected);
                    tracing::info!(agent = %specialist, "turn routed");
                    let (reply, executed, degraded) = self
                        .specialist_turn(specialist, &mut session, &mut phase)
                        .await?;
                    (specialist, reply, executed, degraded)
                }
            };

        phase.advance(TurnPhase::ReplyReady);
        session.append_message(TranscriptMessage::assistant(reply.as_str()));
        self.store.save(&session).await?;

        if degraded {
            tracing::warn!(agent = %agent, "turn completed with fallback reply");
        }

        Ok(SubmitTurnResult {
            session_id,
            agent,
            reply,
            executed_operation,
            degraded,
        })
    }

    /// Asks the coordinator where the turn belongs.
    async fn select_agent(&self, session: &Session) -> Selection {
        let request = self.request_for(AgentKind::Coordinator, session);
        match self.engine.infer(request).await {
            Ok(InferenceOutcome::Reply(reply)) => Selection::Handled {
                reply,
                degraded: false,
            },
            Ok(InferenceOutcome::Transfer { agent }) => match resolve_specialist(&agent) {
                Some(specialist) => Selection::Routed(specialist),
                None => {
                    tracing::debug!(requested = %agent, "transfer to unknown agent");
                    let feedback = OperationOutcome::failure(
                        TRANSFER_OPERATION,
                        OperationError::InvalidArguments {
                            name: TRANSFER_OPERATION.to_string(),
                            reason: format!("no agent named '{}'", agent),
                        },
                    );
                    self.reprompt_coordinator(session, feedback).await
                }
            },
            Ok(InferenceOutcome::Invoke(call)) => {
                // The coordinator has no operations; reject as data and
                // give it one chance to answer or route instead.
                let feedback = OperationOutcome::failure(
                    call.name().to_string(),
                    OperationError::NotPermitted {
                        agent: AgentKind::Coordinator.to_string(),
                        name: call.name().to_string(),
                    },
                );
                self.reprompt_coordinator(session, feedback).await
            }
            Err(error) => {
                tracing::warn!(%error, "coordinator inference failed");
                Selection::Handled {
                    reply: FALLBACK_REPLY.to_string(),
                    degraded: true,
                }
            }
        }
    }

    /// One corrective reprompt after the coordinator misbehaved.
    async fn reprompt_coordinator(
        &self,
        session: &Session,
        feedback: OperationOutcome,
    ) -> Selection {
        let request = self
            .request_for(AgentKind::Coordinator, session)
            .with_prior_outcome(feedback);
        match self.engine.infer(request).await {
            Ok(InferenceOutcome::Reply(reply)) => Selection::Handled {
                reply,
                degraded: false,
            },
            Ok(InferenceOutcome::Transfer { agent }) => match resolve_specialist(&agent) {
                Some(specialist) => Selection::Routed(specialist),
                None => Selection::Handled {
                    reply: FALLBACK_REPLY.to_string(),
                    degraded: true,
                },
            },
            Ok(InferenceOutcome::Invoke(_)) => Selection::Handled {
                reply: FALLBACK_REPLY.to_string(),
                degraded: true,
            },
            Err(error) => {
                tracing::warn!(%error, "coordinator reprompt failed");
                Selection::Handled {
                    reply: FALLBACK_REPLY.to_string(),
                    degraded: true,
                }
            }
        }
    }

    /// Lets the chosen specialist handle the turn, executing at most one
    /// operation.
    async fn specialist_turn(
        &self,
        agent: AgentKind,
        session: &mut Session,
        phase: &mut TurnPhase,
    ) -> Result<(String, Option<OperationOutcome>, bool), TurnError> {
        let request = self.request_for(agent, session);
        match self.engine.infer(request).await {
            Ok(InferenceOutcome::Reply(reply)) => Ok((reply, None, false)),
            Ok(InferenceOutcome::Invoke(call)) => {
                phase.advance(TurnPhase::OperationPending);
                tracing::info!(operation = %call.name(), "operation requested");
                let outcome = self.registry.execute(
                    agent,
                    &call,
                    session.state_mut(),
                    &self.catalog,
                    Timestamp::now(),
                );
                // Persist before composing: the operation's effect must
                // survive even if the reply does not.
                self.store.save(session).await?;

                let (reply, degraded) = self.compose_reply(agent, session, &outcome).await;
                Ok((reply, Some(outcome), degraded))
            }
            Ok(InferenceOutcome::Transfer { agent: target }) => {
                // Routing is single-level; specialists cannot transfer.
                tracing::debug!(from = %agent, requested = %target, "specialist attempted transfer");
                let feedback = OperationOutcome::failure(
                    TRANSFER_OPERATION,
                    OperationError::NotPermitted {
                        agent: agent.to_string(),
                        name: TRANSFER_OPERATION.to_string(),
                    },
                );
                let request = self.request_for(agent, session).with_prior_outcome(feedback);
                match self.engine.infer(request).await {
                    Ok(InferenceOutcome::Reply(reply)) => Ok((reply, None, false)),
                    Ok(_) => Ok((FALLBACK_REPLY.to_string(), None, true)),
                    Err(error) => {
                        tracing::warn!(%error, "specialist reprompt failed");
                        Ok((FALLBACK_REPLY.to_string(), None, true))
                    }
                }
            }
            Err(error) => {
                tracing::warn!(%error, agent = %agent, "specialist inference failed");
                Ok((FALLBACK_REPLY.to_string(), None, true))
            }
        }
    }

    /// Asks the specialist to word a reply around the executed outcome.
    async fn compose_reply(
        &self,
        agent: AgentKind,
        session: &Session,
        outcome: &OperationOutcome,
    ) -> (String, bool) {
        let request = self
            .request_for(agent, session)
            .with_prior_outcome(outcome.clone());
        match self.engine.infer(request).await {
            Ok(InferenceOutcome::Reply(reply)) => (reply, false),
            // One operation per turn: a further invocation or transfer at
            // this point is refused and the outcome summarised instead.
            Ok(_) => {
                tracing::warn!(agent = %agent, "engine requested more work during composition");
                (summary_reply(outcome), true)
            }
            Err(error) => {
                tracing::warn!(%error, "reply composition failed, summarizing outcome");
                (summary_reply(outcome), true)
            }
        }
    }

    /// Finds the user's session, creating one on first contact.
    async fn ensure_session(&self, user_id: &UserId) -> Result<SessionId, TurnError> {
        if let Some(id) = self.store.find_by_user(user_id).await? {
            return Ok(id);
        }
        match self.store.create(user_id, SessionState::initial()).await {
            Ok(id) => {
                tracing::info!(session_id = %id, user_id = %user_id, "session created");
                Ok(id)
            }
            // Lost a creation race; the winner's session serves this turn.
            Err(SessionStoreError::DuplicateUser(_)) => match self
                .store
                .find_by_user(user_id)
                .await?
            {
                Some(id) => Ok(id),
                None => Err(SessionStoreError::DuplicateUser(user_id.clone()).into()),
            },
            Err(error) => Err(error.into()),
        }
    }

    fn turn_lock(&self, id: SessionId) -> Arc<TurnLock<()>> {
        let mut locks = self
            .turn_locks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        locks.entry(id).or_default().clone()
    }

    fn request_for(&self, agent: AgentKind, session: &Session) -> InferenceRequest {
        let instructions = instructions_for(agent, session.state(), &self.catalog);
        let mut request = InferenceRequest::new(instructions, session.transcript().to_vec())
            .with_operations(self.registry.definitions_for(agent));
        if agent == AgentKind::Coordinator {
            request = request.with_delegates(delegate_roster());
        }
        request
    }
}

/// Specialists the coordinator may route to, as delegate descriptors.
fn delegate_roster() -> Vec<DelegateDescriptor> {
    AgentKind::SPECIALISTS
        .iter()
        .map(|kind| DelegateDescriptor::new(kind.name(), kind.description()))
        .collect()
}

/// Resolves a transfer target to a specialist, rejecting the coordinator
/// and unknown names.
fn resolve_specialist(name: &str) -> Option<AgentKind> {
    AgentKind::from_name(name).filter(|kind| AgentKind::SPECIALISTS.contains(kind))
}

/// Last-resort wording when the engine cannot phrase the outcome itself.
fn summary_reply(outcome: &OperationOutcome) -> String {
    match outcome {
        OperationOutcome::Success { payload, .. } => payload
            .get("message")
            .and_then(serde_json::Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| "Done. Is there anything else I can help with?".to_string()),
        OperationOutcome::Error { error, .. } => {
            format!("I couldn't complete that: {}.", error)
        }
    }
}
