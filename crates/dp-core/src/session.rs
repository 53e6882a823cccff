//! Cookie-keyed session store for the LTI tools.
//!
//! A verified launch creates one session; every later request in the wizard
//! presents the opaque cookie and trusts the stored launch context instead of
//! re-verifying. Sessions expire after an idle period and are swept lazily.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::launch::LaunchContext;
use crate::wizard::Wizard;

/// Opaque identifier carried in the session cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn parse(s: &str) -> Option<Self> {
        Uuid::parse_str(s).ok().map(Self)
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}

/// One user's workflow session.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: SessionId,
    pub launch: LaunchContext,
    pub wizard: Wizard,
    last_seen: Instant,
}

/// Manages the lifecycle of wizard sessions.
#[derive(Debug, Clone)]
pub struct SessionManager {
    sessions: Arc<RwLock<HashMap<SessionId, Session>>>,
    idle_timeout: Duration,
}

impl SessionManager {
    /// Default idle expiry for a wizard session.
    pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(2 * 60 * 60);

    pub fn new() -> Self {
        Self::with_idle_timeout(Self::DEFAULT_IDLE_TIMEOUT)
    }

    pub fn with_idle_timeout(idle_timeout: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            idle_timeout,
        }
    }

    /// Create a session for a freshly verified launch.
    pub async fn create_session(&self, launch: LaunchContext) -> SessionId {
        let id = SessionId::generate();
        let session = Session {
            id,
            launch,
            wizard: Wizard::new(),
            last_seen: Instant::now(),
        };
        self.sessions.write().await.insert(id, session);
        id
    }

    /// Look up a session by id, refreshing its idle clock. Expired sessions
    /// are removed and reported as absent.
    pub async fn get_session(&self, id: SessionId) -> Option<Session> {
        let mut sessions = self.sessions.write().await;
        match sessions.get_mut(&id) {
            Some(session) if session.last_seen.elapsed() <= self.idle_timeout => {
                session.last_seen = Instant::now();
                Some(session.clone())
            }
            Some(_) => {
                sessions.remove(&id);
                None
            }
            None => None,
        }
    }

    /// Mutate a session in place under the store lock.
    pub async fn update_session<F>(&self, id: SessionId, f: F) -> crate::Result<()>
    where
        F: FnOnce(&mut Session),
    {
        let mut sessions = self.sessions.write().await;
        if let Some(session) = sessions.get_mut(&id) {
            f(session);
            session.last_seen = Instant::now();
            Ok(())
        } else {
            Err(crate::Error::session(format!("Session {} not found", id)))
        }
    }

    /// Drop a finished session.
    pub async fn remove_session(&self, id: SessionId) {
        self.sessions.write().await.remove(&id);
    }

    /// Number of live sessions (expired ones included until swept).
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn launch() -> LaunchContext {
        LaunchContext {
            course_id: 5,
            user_id: 1,
            sis_id: "u1abc123".to_string(),
            full_name: None,
            email: None,
            roles: vec!["Learner".to_string()],
            outcome_service_url: "https://canvas.example.com/outcome".to_string(),
            result_sourcedid: "sourced-1".to_string(),
        }
    }

    #[tokio::test]
    async fn created_session_is_retrievable() {
        let manager = SessionManager::new();
        let id = manager.create_session(launch()).await;
        let session = manager.get_session(id).await.expect("session should exist");
        assert_eq!(session.launch.course_id, 5);
        assert_eq!(session.wizard.state, crate::wizard::WizardState::Launched);
    }

    #[tokio::test]
    async fn expired_session_is_swept_on_access() {
        let manager = SessionManager::with_idle_timeout(Duration::from_secs(0));
        let id = manager.create_session(launch()).await;
        tokio::time::sleep(Duration::from_millis(5)).await;
        assert!(manager.get_session(id).await.is_none());
        assert!(manager.is_empty().await);
    }

    #[tokio::test]
    async fn update_mutates_under_the_lock() {
        let manager = SessionManager::new();
        let id = manager.create_session(launch()).await;
        manager
            .update_session(id, |s| {
                s.wizard.answers.program_code = Some("CINTE".to_string());
            })
            .await
            .unwrap();
        let session = manager.get_session(id).await.unwrap();
        assert_eq!(session.wizard.answers.program_code.as_deref(), Some("CINTE"));
    }

    #[tokio::test]
    async fn unknown_session_id_errors_on_update() {
        let manager = SessionManager::new();
        let id = SessionId::generate();
        assert!(manager.update_session(id, |_| {}).await.is_err());
    }
}
