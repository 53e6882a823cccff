//! Shared application state.

use std::sync::Arc;

use axum_extra::extract::cookie::CookieJar;
use url::Url;

use dp_client_api::CanvasApi;
use dp_core::config::LtiConfig;
use dp_core::wizard::{WizardAction, WizardError, WizardState};
use dp_core::{Session, SessionId, SessionManager, SnapshotStore};

use crate::error::AppError;

/// Name of the cookie carrying the session id.
pub const SESSION_COOKIE: &str = "dp_session";

/// Everything the route handlers share.
pub struct AppState {
    pub canvas: Arc<dyn CanvasApi>,
    pub sessions: SessionManager,
    pub reference: Arc<SnapshotStore>,
    pub lti: LtiConfig,
    /// Externally visible URL of the launch route, as the LMS signs it.
    pub launch_url: Url,
}

impl AppState {
    pub fn new(
        canvas: Arc<dyn CanvasApi>,
        reference: Arc<SnapshotStore>,
        lti: LtiConfig,
        launch_url: Url,
    ) -> Arc<Self> {
        Arc::new(Self {
            canvas,
            sessions: SessionManager::new(),
            reference,
            lti,
            launch_url,
        })
    }

    /// Resolve the session named by the cookie jar, or reject the request.
    pub async fn require_session(&self, jar: &CookieJar) -> Result<Session, AppError> {
        let id = jar
            .get(SESSION_COOKIE)
            .and_then(|cookie| SessionId::parse(cookie.value()))
            .ok_or(AppError::SessionMissing)?;
        self.sessions.get_session(id).await.ok_or(AppError::SessionMissing)
    }

    /// Apply a wizard action to the stored session under the store lock.
    /// An out-of-order action leaves the session untouched and surfaces as a
    /// redirect to the page the state machine names.
    pub async fn apply_action(
        &self,
        id: SessionId,
        action: WizardAction,
    ) -> Result<WizardState, AppError> {
        let mut outcome: Option<Result<WizardState, WizardError>> = None;
        self.sessions
            .update_session(id, |session| {
                outcome = Some(session.wizard.apply(action));
            })
            .await?;
        let next = outcome.expect("update closure always runs")?;
        Ok(next)
    }
}
