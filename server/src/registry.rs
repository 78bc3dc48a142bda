//! Directory of live sessions.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::info;

use crate::session::Session;
use crate::transport::ConnectionId;

/// Shared map from session id to live session. Removal also guarantees the
/// session's tick task has fully stopped before it returns, so no tick can
/// fire against a forgotten session.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: Mutex<HashMap<String, Arc<Session>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, session: Arc<Session>) {
        self.sessions
            .lock()
            .unwrap()
            .insert(session.id().to_string(), session);
    }

    pub fn get(&self, id: &str) -> Option<Arc<Session>> {
        self.sessions.lock().unwrap().get(id).cloned()
    }

    /// Find the session a connection is seated in. Linear scan; the live
    /// session count stays small.
    pub fn find_by_participant(&self, conn: ConnectionId) -> Option<Arc<Session>> {
        let sessions = self.sessions.lock().unwrap();
        sessions
            .values()
            .find(|session| session.has_participant(conn))
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forget a session and cancel its tick task.
    pub async fn remove(&self, id: &str) -> Option<Arc<Session>> {
        let session = self.sessions.lock().unwrap().remove(id);
        if let Some(session) = &session {
            session.stop().await;
            info!(session = %id, "session removed");
        }
        session
    }
}
