//! In-memory session store.
//!
//! The reference deployment: sessions live for the process lifetime.
//! Also the workhorse for tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{SessionId, UserId};
use crate::domain::session::{Session, SessionState};
use crate::ports::{SessionStore, SessionStoreError};

/// HashMap-backed session store.
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<SessionId, Session>>>,
    by_user: Arc<RwLock<HashMap<UserId, SessionId>>>,
}

impl InMemorySessionStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions (for tests).
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn create(
        &self,
        user_id: &UserId,
        initial_state: SessionState,
    ) -> Result<SessionId, SessionStoreError> {
        let mut by_user = self.by_user.write().await;
        if by_user.contains_key(user_id) {
            return Err(SessionStoreError::DuplicateUser(user_id.clone()));
        }

        let id = SessionId::new();
        let session = Session::new(id, user_id.clone(), initial_state);
        self.sessions.write().await.insert(id, session);
        by_user.insert(user_id.clone(), id);
        Ok(id)
    }

    async fn find_by_user(&self, user_id: &UserId) -> Result<Option<SessionId>, SessionStoreError> {
        Ok(self.by_user.read().await.get(user_id).copied())
    }

    async fn load(&self, id: &SessionId) -> Result<Session, SessionStoreError> {
        self.sessions
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or(SessionStoreError::NotFound(*id))
    }

    async fn save(&self, session: &Session) -> Result<(), SessionStoreError> {
        self.sessions
            .write()
            .await
            .insert(*session.id(), session.clone());
        self.by_user
            .write()
            .await
            .insert(session.user_id().clone(), *session.id());
        Ok(())
    }

    async fn exists(&self, id: &SessionId) -> Result<bool, SessionStoreError> {
        Ok(self.sessions.read().await.contains_key(id))
    }

    async fn delete(&self, id: &SessionId) -> Result<(), SessionStoreError> {
        let removed = self.sessions.write().await.remove(id);
        if let Some(session) = removed {
            self.by_user.write().await.remove(session.user_id());
        }
        Ok(())
    }
}
