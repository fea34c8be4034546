//! Registry of live sessions for multi-user channels.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::SessionError;

use super::session::Session;

/// Handle to one session. The lock is held for a whole turn so turns of the
/// same session never interleave.
pub type SessionHandle = Arc<Mutex<Session>>;

/// Live sessions allowed when no limit is configured.
pub const DEFAULT_MAX_SESSIONS: usize = 1000;

/// Holds independent sessions keyed by id.
pub struct SessionManager {
    sessions: RwLock<HashMap<Uuid, SessionHandle>>,
    max_sessions: usize,
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SESSIONS)
    }
}

impl SessionManager {
    pub fn new(max_sessions: usize) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            max_sessions,
        }
    }

    /// Start a fresh session and return its handle.
    ///
    /// Fails with `LimitReached` while `max_sessions` sessions are live.
    pub async fn create(&self) -> Result<(Uuid, SessionHandle), SessionError> {
        let mut sessions = self.sessions.write().await;
        if sessions.len() >= self.max_sessions {
            warn!(max = self.max_sessions, "Session limit reached");
            return Err(SessionError::LimitReached {
                max: self.max_sessions,
            });
        }

        let session = Session::new();
        let id = session.id;
        let handle = Arc::new(Mutex::new(session));
        sessions.insert(id, Arc::clone(&handle));
        debug!(session_id = %id, active = sessions.len(), "Session created");
        Ok((id, handle))
    }

    pub async fn get(&self, id: Uuid) -> Result<SessionHandle, SessionError> {
        self.sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(SessionError::NotFound { id })
    }

    /// Drop a session. Turns already holding its handle finish normally.
    pub async fn remove(&self, id: Uuid) -> Result<(), SessionError> {
        match self.sessions.write().await.remove(&id) {
            Some(_) => {
                debug!(session_id = %id, "Session removed");
                Ok(())
            }
            None => Err(SessionError::NotFound { id }),
        }
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}
