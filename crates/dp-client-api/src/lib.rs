//! Canvas resource-access trait for the degree-project tools

use async_trait::async_trait;
use dp_canvas_api::*;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientApiError {
    /// The upstream rejected or failed the request; carries the HTTP status
    /// and whatever detail the error body offered.
    #[error("canvas returned {status}: {message}")]
    Canvas { status: u16, message: String },
    /// The resource (column, section, user, blob) does not exist upstream.
    #[error("not found: {0}")]
    NotFound(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("unexpected: {0}")]
    Unexpected(String),
}

pub type ClientApiResult<T> = Result<T, ClientApiError>;

/// The uniform interface over the Canvas REST operations the tools perform.
/// Every method returns a result the caller must branch on; implementations
/// exist for HTTP (`dp-canvas-client`) and in-memory test doubles
/// (`dp-canvas-mock`).
#[async_trait]
pub trait CanvasApi: Send + Sync {
    // Custom gradebook columns
    async fn list_custom_columns(&self, course_id: u64) -> ClientApiResult<Vec<CustomColumn>>;
    async fn list_column_entries(
        &self,
        course_id: u64,
        column_id: u64,
    ) -> ClientApiResult<Vec<ColumnDatum>>;
    async fn put_column_entry(
        &self,
        course_id: u64,
        column_id: u64,
        user_id: u64,
        content: &str,
    ) -> ClientApiResult<ColumnDatum>;

    // Sections and enrollments
    async fn list_sections(&self, course_id: u64) -> ClientApiResult<Vec<Section>>;
    async fn create_section(&self, course_id: u64, name: &str) -> ClientApiResult<Section>;
    async fn list_enrollments(&self, course_id: u64) -> ClientApiResult<Vec<Enrollment>>;
    async fn enroll_user(
        &self,
        course_id: u64,
        request: &CreateEnrollmentRequest,
    ) -> ClientApiResult<Enrollment>;

    // Assignments, submissions, peer reviews
    async fn list_assignments(&self, course_id: u64) -> ClientApiResult<Vec<Assignment>>;
    async fn get_submission(
        &self,
        course_id: u64,
        assignment_id: u64,
        user_id: u64,
    ) -> ClientApiResult<Submission>;
    async fn list_peer_reviews(
        &self,
        course_id: u64,
        assignment_id: u64,
    ) -> ClientApiResult<Vec<PeerReview>>;

    // Announcements and calendar events
    async fn create_announcement(
        &self,
        course_id: u64,
        request: &CreateAnnouncementRequest,
    ) -> ClientApiResult<DiscussionTopic>;
    async fn create_calendar_event(
        &self,
        user_id: u64,
        request: &CreateCalendarEventRequest,
    ) -> ClientApiResult<CalendarEvent>;

    // Users and the program-of-study blob
    async fn get_user_profile(&self, user_id: u64) -> ClientApiResult<UserProfile>;
    async fn get_user_profile_by_sis_id(&self, sis_id: &str) -> ClientApiResult<UserProfile>;
    async fn get_program_of_study(&self, sis_id: &str) -> ClientApiResult<Option<ProgramOfStudy>>;
    async fn put_program_of_study(
        &self,
        sis_id: &str,
        data: &ProgramOfStudy,
    ) -> ClientApiResult<()>;
}
