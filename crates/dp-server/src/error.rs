//! Uniform error-to-response mapping for the web tools.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use thiserror::Error;

use dp_client_api::ClientApiError;
use dp_core::wizard::WizardError;
use dp_lti::LtiError;

#[derive(Debug, Error)]
pub enum AppError {
    /// Launch signature rejected; answered as plain text like the original
    /// tools do.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Launched outside an assignment context; explained inline.
    #[error("not an assignment launch")]
    NotAssignmentLaunch,

    /// No (or an expired) session cookie on a post-launch route.
    #[error("no active session")]
    SessionMissing,

    /// A form arrived out of order; the user is sent back to the page the
    /// state machine names.
    #[error(transparent)]
    WizardOrder(#[from] WizardError),

    /// A required form field was absent; back to the originating page.
    #[error("missing form field, returning to {0}")]
    MissingField(&'static str),

    #[error("canvas request failed: {0}")]
    Canvas(#[from] ClientApiError),

    #[error(transparent)]
    Core(#[from] dp_core::Error),
}

impl From<LtiError> for AppError {
    fn from(err: LtiError) -> Self {
        match err {
            LtiError::NotAssignmentLaunch => AppError::NotAssignmentLaunch,
            other => AppError::Unauthorized(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Unauthorized(detail) => {
                tracing::warn!(%detail, "rejected launch");
                (
                    StatusCode::UNAUTHORIZED,
                    format!("unauthorized attempt: {}", detail),
                )
                    .into_response()
            }
            AppError::NotAssignmentLaunch => Html(crate::pages::not_assignment_launch_page())
                .into_response(),
            AppError::SessionMissing => (
                StatusCode::UNAUTHORIZED,
                "No active session. Launch the tool from Canvas again.",
            )
                .into_response(),
            AppError::WizardOrder(err) => Redirect::to(err.resume.page_path()).into_response(),
            AppError::MissingField(page) => Redirect::to(page).into_response(),
            AppError::Canvas(err) => {
                tracing::error!(error = %err, "canvas call failed");
                (StatusCode::BAD_GATEWAY, format!("Canvas request failed: {}", err))
                    .into_response()
            }
            AppError::Core(err) => {
                tracing::error!(error = %err, "internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
            }
        }
    }
}
