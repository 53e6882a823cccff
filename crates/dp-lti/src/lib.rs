//! LTI 1.0 launch verification
//!
//! An LTI launch is an OAuth 1.0 signed POST from the LMS carrying course,
//! user, and role context. This crate recomputes the HMAC-SHA1 signature over
//! the launch parameters with the shared consumer secret, rejects mismatches,
//! and extracts the allow-listed parameters into a
//! [`LaunchContext`](dp_core::LaunchContext). Verification happens exactly
//! once per session; every later request trusts the session instead.

pub mod launch;
pub mod signature;

pub use launch::extract_launch;
pub use signature::{sign, verify_signature};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LtiError {
    #[error("launch carries no oauth_signature")]
    MissingSignature,

    #[error("unsupported oauth_signature_method: {0}")]
    UnsupportedSignatureMethod(String),

    #[error("oauth signature mismatch")]
    InvalidSignature,

    #[error("not an assignment launch: no outcome service in the request")]
    NotAssignmentLaunch,

    #[error("launch parameter missing or invalid: {0}")]
    MissingParameter(&'static str),
}

pub type LtiResult<T> = Result<T, LtiError>;
