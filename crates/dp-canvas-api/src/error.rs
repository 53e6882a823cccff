//! Contract-level errors

use thiserror::Error;

/// Errors raised while interpreting Canvas payloads against the contract.
#[derive(Debug, Error)]
pub enum ApiContractError {
    #[error("invalid payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),

    #[error("validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),
}
