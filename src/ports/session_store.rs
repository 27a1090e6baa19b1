//! Session store port - persistence-agnostic session access.
//!
//! # Design
//!
//! - Load/save hooks only: an in-memory and a durable implementation are
//!   interchangeable without touching operations or agents.
//! - No internal locking. Turn serialization per session is the
//!   application layer's job; the store only guarantees that sessions for
//!   different ids never interfere.
//! - `create` is not idempotent: callers that create lazily must check
//!   `find_by_user` first.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::{SessionId, UserId};
use crate::domain::session::{Session, SessionState};

/// Errors raised by session store implementations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionStoreError {
    /// No session with the given id.
    #[error("session not found: {0}")]
    NotFound(SessionId),

    /// A session already exists for the user.
    #[error("user '{0}' already has a session")]
    DuplicateUser(UserId),

    /// Serialization or deserialization failed.
    #[error("session serialization failed: {0}")]
    Serialization(String),

    /// Underlying storage failed.
    #[error("session storage error: {0}")]
    Io(String),
}

/// Port for session persistence.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Creates a session for a user with the given initial state.
    ///
    /// # Errors
    ///
    /// - `DuplicateUser` if the user already has a session
    async fn create(
        &self,
        user_id: &UserId,
        initial_state: SessionState,
    ) -> Result<SessionId, SessionStoreError>;

    /// Finds the session id for a user, if one exists.
    async fn find_by_user(&self, user_id: &UserId) -> Result<Option<SessionId>, SessionStoreError>;

    /// Loads a session by id.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no session with the id exists
    async fn load(&self, id: &SessionId) -> Result<Session, SessionStoreError>;

    /// Saves a session, replacing any stored version.
    async fn save(&self, session: &Session) -> Result<(), SessionStoreError>;

    /// Returns true if a session with the id exists.
    async fn exists(&self, id: &SessionId) -> Result<bool, SessionStoreError>;

    /// Deletes a session (primarily for tests and future expiry sweeps).
    async fn delete(&self, id: &SessionId) -> Result<(), SessionStoreError>;
}
