//! Thesis archiving support
//!
//! Covers the final step of a degree project: minting the TRITA report
//! identifier from a centralized database counter, generating the cover page
//! through the university's cover service, and splicing the cover in front of
//! the submitted thesis PDF.

pub mod cover;
pub mod merge;
pub mod trita;

pub use cover::{CoverClient, CoverLanguage, CoverRequest};
pub use merge::merge_cover;
pub use trita::TritaRegistry;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("no TRITA series configured for school {0}")]
    UnknownSchool(String),

    #[error("cover service request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("cover service returned status {status}")]
    CoverService { status: u16 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("pdf merge failed with status {status}: {stderr}")]
    Merge { status: i32, stderr: String },
}

pub type ArchiveResult<T> = Result<T, ArchiveError>;
