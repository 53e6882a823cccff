//! REST API client for the Canvas LMS
//!
//! This crate provides the HTTP implementation of the [`CanvasApi`] trait:
//! Bearer-token authentication, `Link`-header pagination, and the
//! custom-column registry the degree-project tools store their workflow
//! answers in.

pub mod auth;
pub mod client;
pub mod columns;
pub mod error;
pub mod paging;

pub use auth::*;
pub use client::*;
pub use columns::{find_column_id, ColumnRegistry};
pub use error::*;

use async_trait::async_trait;
use dp_canvas_api::*;
use dp_client_api::{CanvasApi, ClientApiResult};

#[async_trait]
impl CanvasApi for client::CanvasClient {
    async fn list_custom_columns(&self, course_id: u64) -> ClientApiResult<Vec<CustomColumn>> {
        self.list_custom_columns(course_id).await.map_err(Into::into)
    }

    async fn list_column_entries(
        &self,
        course_id: u64,
        column_id: u64,
    ) -> ClientApiResult<Vec<ColumnDatum>> {
        self.list_column_entries(course_id, column_id).await.map_err(Into::into)
    }

    async fn put_column_entry(
        &self,
        course_id: u64,
        column_id: u64,
        user_id: u64,
        content: &str,
    ) -> ClientApiResult<ColumnDatum> {
        self.put_column_entry(course_id, column_id, user_id, content)
            .await
            .map_err(Into::into)
    }

    async fn list_sections(&self, course_id: u64) -> ClientApiResult<Vec<Section>> {
        self.list_sections(course_id).await.map_err(Into::into)
    }

    async fn create_section(&self, course_id: u64, name: &str) -> ClientApiResult<Section> {
        self.create_section(course_id, name).await.map_err(Into::into)
    }

    async fn list_enrollments(&self, course_id: u64) -> ClientApiResult<Vec<Enrollment>> {
        self.list_enrollments(course_id).await.map_err(Into::into)
    }

    async fn enroll_user(
        &self,
        course_id: u64,
        request: &CreateEnrollmentRequest,
    ) -> ClientApiResult<Enrollment> {
        self.enroll_user(course_id, request).await.map_err(Into::into)
    }

    async fn list_assignments(&self, course_id: u64) -> ClientApiResult<Vec<Assignment>> {
        self.list_assignments(course_id).await.map_err(Into::into)
    }

    async fn get_submission(
        &self,
        course_id: u64,
        assignment_id: u64,
        user_id: u64,
    ) -> ClientApiResult<Submission> {
        self.get_submission(course_id, assignment_id, user_id).await.map_err(Into::into)
    }

    async fn list_peer_reviews(
        &self,
        course_id: u64,
        assignment_id: u64,
    ) -> ClientApiResult<Vec<PeerReview>> {
        self.list_peer_reviews(course_id, assignment_id).await.map_err(Into::into)
    }

    async fn create_announcement(
        &self,
        course_id: u64,
        request: &CreateAnnouncementRequest,
    ) -> ClientApiResult<DiscussionTopic> {
        self.create_announcement(course_id, request).await.map_err(Into::into)
    }

    async fn create_calendar_event(
        &self,
        user_id: u64,
        request: &CreateCalendarEventRequest,
    ) -> ClientApiResult<CalendarEvent> {
        self.create_calendar_event(user_id, request).await.map_err(Into::into)
    }

    async fn get_user_profile(&self, user_id: u64) -> ClientApiResult<UserProfile> {
        self.get_user_profile(user_id).await.map_err(Into::into)
    }

    async fn get_user_profile_by_sis_id(&self, sis_id: &str) -> ClientApiResult<UserProfile> {
        self.get_user_profile_by_sis_id(sis_id).await.map_err(Into::into)
    }

    async fn get_program_of_study(&self, sis_id: &str) -> ClientApiResult<Option<ProgramOfStudy>> {
        self.get_program_of_study(sis_id).await.map_err(Into::into)
    }

    async fn put_program_of_study(
        &self,
        sis_id: &str,
        data: &ProgramOfStudy,
    ) -> ClientApiResult<()> {
        self.put_program_of_study(sis_id, data).await.map_err(Into::into)
    }
}
