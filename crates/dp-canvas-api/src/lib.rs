//! Canvas LMS REST API contract types
//!
//! This crate defines the schema types for the slice of the Canvas REST API
//! used by the degree-project tools: custom gradebook columns and their
//! per-user data, sections, enrollments, assignments, submissions, peer
//! reviews, announcements, calendar events, user profiles, and the namespaced
//! per-user custom-data blob. These types are shared between the HTTP client,
//! the in-memory mock, and the web tools.

pub mod error;
pub mod pagination;
pub mod types;

pub use error::*;
pub use pagination::*;
pub use types::*;
