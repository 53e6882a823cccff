//! Error types for the Canvas REST client

use dp_canvas_api::CanvasErrorBody;
use dp_client_api::ClientApiError;
use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur when talking to the Canvas REST API.
#[derive(Debug, Error)]
pub enum CanvasClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("URL parsing error: {0}")]
    Url(#[from] url::ParseError),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Canvas returned error status {status}: {body:?}")]
    ServerError {
        status: StatusCode,
        body: CanvasErrorBody,
    },

    #[error("Unexpected response format: {0}")]
    UnexpectedResponse(String),
}

/// Result type alias for Canvas client operations.
pub type CanvasResult<T> = Result<T, CanvasClientError>;

impl From<CanvasClientError> for ClientApiError {
    fn from(err: CanvasClientError) -> Self {
        match err {
            CanvasClientError::ServerError { status, body } if status == StatusCode::NOT_FOUND => {
                ClientApiError::NotFound(body.message.unwrap_or_else(|| "resource".to_string()))
            }
            CanvasClientError::ServerError { status, body } => ClientApiError::Canvas {
                status: status.as_u16(),
                message: body.message.unwrap_or_default(),
            },
            CanvasClientError::Http(e) => ClientApiError::Transport(e.to_string()),
            other => ClientApiError::Unexpected(other.to_string()),
        }
    }
}
