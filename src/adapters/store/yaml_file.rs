//! File-based session store.
//!
//! Stores one YAML document per session under a base directory, named by
//! session id. The durable option behind the same port as the in-memory
//! store; nothing above the port changes when it is swapped in.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tokio::fs;

use crate::domain::foundation::{SessionId, UserId};
use crate::domain::session::{Session, SessionState};
use crate::ports::{SessionStore, SessionStoreError};

/// YAML-file-per-session store.
#[derive(Debug, Clone)]
pub struct YamlFileSessionStore {
    base_path: PathBuf,
}

impl YamlFileSessionStore {
    /// Creates a store rooted at the given directory.
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    fn session_file(&self, id: &SessionId) -> PathBuf {
        self.base_path.join(format!("{}.yaml", id))
    }

    async fn ensure_base_dir(&self) -> Result<(), SessionStoreError> {
        fs::create_dir_all(&self.base_path)
            .await
            .map_err(|e| SessionStoreError::Io(e.to_string()))
    }

    /// Lists ids of every stored session by scanning the base directory.
    async fn stored_ids(&self) -> Result<Vec<SessionId>, SessionStoreError> {
        if !self.base_path.exists() {
            return Ok(Vec::new());
        }
        let mut ids = Vec::new();
        let mut entries = fs::read_dir(&self.base_path)
            .await
            .map_err(|e| SessionStoreError::Io(e.to_string()))?;
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| SessionStoreError::Io(e.to_string()))?
        {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("yaml") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                if let Ok(id) = SessionId::from_str(stem) {
                    ids.push(id);
                }
            }
        }
        Ok(ids)
    }
}

#[async_trait]
impl SessionStore for YamlFileSessionStore {
    async fn create(
        &self,
        user_id: &UserId,
        initial_state: SessionState,
    ) -> Result<SessionId, SessionStoreError> {
        if self.find_by_user(user_id).await?.is_some() {
            return Err(SessionStoreError::DuplicateUser(user_id.clone()));
        }

        let id = SessionId::new();
        let session = Session::new(id, user_id.clone(), initial_state);
        self.save(&session).await?;
        Ok(id)
    }

    async fn find_by_user(&self, user_id: &UserId) -> Result<Option<SessionId>, SessionStoreError> {
        for id in self.stored_ids().await? {
            let session = self.load(&id).await?;
            if session.user_id() == user_id {
                return Ok(Some(id));
            }
        }
        Ok(None)
    }

    async fn load(&self, id: &SessionId) -> Result<Session, SessionStoreError> {
        let path = self.session_file(id);
        if !path.exists() {
            return Err(SessionStoreError::NotFound(*id));
        }
        let yaml = fs::read_to_string(&path)
            .await
            .map_err(|e| SessionStoreError::Io(e.to_string()))?;
        serde_yaml::from_str(&yaml).map_err(|e| SessionStoreError::Serialization(e.to_string()))
    }

    async fn save(&self, session: &Session) -> Result<(), SessionStoreError> {
        self.ensure_base_dir().await?;
        let yaml = serde_yaml::to_string(session)
            .map_err(|e| SessionStoreError::Serialization(e.to_string()))?;
        fs::write(self.session_file(session.id()), yaml)
            .await
            .map_err(|e| SessionStoreError::Io(e.to_string()))
    }

    async fn exists(&self, id: &SessionId) -> Result<bool, SessionStoreError> {
        Ok(self.session_file(id).exists())
    }

    async fn delete(&self, id: &SessionId) -> Result<(), SessionStoreError> {
        let path = self.session_file(id);
        if path.exists() {
            fs::remove_file(&path)
                .await
                .map_err(|e| SessionStoreError::Io(e.to_string()))?;
        }
        Ok(())
    }
}
