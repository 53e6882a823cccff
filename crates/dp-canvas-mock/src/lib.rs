//! In-memory [`CanvasApi`] implementation for tests.
//!
//! Backs every resource with plain maps so wizard flows can run end-to-end
//! without a Canvas instance. Setter methods seed fixtures; accessor methods
//! let tests assert on what the tools wrote.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use dp_canvas_api::*;
use dp_client_api::{CanvasApi, ClientApiError, ClientApiResult};

#[derive(Debug, Default)]
struct Inner {
    next_id: u64,
    columns: HashMap<u64, Vec<CustomColumn>>,
    column_data: HashMap<(u64, u64), HashMap<u64, String>>,
    sections: HashMap<u64, Vec<Section>>,
    enrollments: HashMap<u64, Vec<Enrollment>>,
    assignments: HashMap<u64, Vec<Assignment>>,
    submissions: HashMap<(u64, u64, u64), Submission>,
    peer_reviews: HashMap<(u64, u64), Vec<PeerReview>>,
    announcements: HashMap<u64, Vec<DiscussionTopic>>,
    calendar_events: HashMap<u64, Vec<CalendarEvent>>,
    profiles: HashMap<u64, UserProfile>,
    programs_of_study: HashMap<String, ProgramOfStudy>,
}

impl Inner {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

/// An in-memory Canvas double.
#[derive(Debug, Clone, Default)]
pub struct MockCanvas {
    inner: Arc<RwLock<Inner>>,
}

impl MockCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    // Fixture seeding

    /// Create a custom column in a course and return its id.
    pub async fn add_custom_column(&self, course_id: u64, title: &str) -> u64 {
        let mut inner = self.inner.write().await;
        let id = inner.next_id();
        inner.columns.entry(course_id).or_default().push(CustomColumn {
            id,
            title: title.to_string(),
            position: None,
            hidden: false,
            read_only: false,
        });
        id
    }

    pub async fn add_user_profile(&self, profile: UserProfile) {
        self.inner.write().await.profiles.insert(profile.id, profile);
    }

    pub async fn set_program_of_study(&self, sis_id: &str, data: ProgramOfStudy) {
        self.inner.write().await.programs_of_study.insert(sis_id.to_string(), data);
    }

    pub async fn add_assignment(&self, course_id: u64, assignment: Assignment) {
        self.inner.write().await.assignments.entry(course_id).or_default().push(assignment);
    }

    pub async fn add_submission(&self, course_id: u64, submission: Submission) {
        let key = (course_id, submission.assignment_id, submission.user_id);
        self.inner.write().await.submissions.insert(key, submission);
    }

    pub async fn add_peer_review(&self, course_id: u64, assignment_id: u64, review: PeerReview) {
        self.inner
            .write()
            .await
            .peer_reviews
            .entry((course_id, assignment_id))
            .or_default()
            .push(review);
    }

    // Assertion accessors

    /// Raw stored content of one user's column entry.
    pub async fn column_content(
        &self,
        course_id: u64,
        column_id: u64,
        user_id: u64,
    ) -> Option<String> {
        self.inner
            .read()
            .await
            .column_data
            .get(&(course_id, column_id))
            .and_then(|entries| entries.get(&user_id))
            .cloned()
    }

    /// Names of sections the user is enrolled in, in enrollment order.
    pub async fn section_names_for_user(&self, course_id: u64, user_id: u64) -> Vec<String> {
        let inner = self.inner.read().await;
        let sections = inner.sections.get(&course_id).cloned().unwrap_or_default();
        inner
            .enrollments
            .get(&course_id)
            .map(|enrollments| {
                enrollments
                    .iter()
                    .filter(|e| e.user_id == user_id)
                    .filter_map(|e| {
                        let section_id = e.course_section_id?;
                        sections.iter().find(|s| s.id == section_id).map(|s| s.name.clone())
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    pub async fn announcements_for(&self, course_id: u64) -> Vec<DiscussionTopic> {
        self.inner.read().await.announcements.get(&course_id).cloned().unwrap_or_default()
    }

    pub async fn calendar_events_for(&self, user_id: u64) -> Vec<CalendarEvent> {
        self.inner.read().await.calendar_events.get(&user_id).cloned().unwrap_or_default()
    }
}

#[async_trait]
impl CanvasApi for MockCanvas {
    async fn list_custom_columns(&self, course_id: u64) -> ClientApiResult<Vec<CustomColumn>> {
        Ok(self.inner.read().await.columns.get(&course_id).cloned().unwrap_or_default())
    }

    async fn list_column_entries(
        &self,
        course_id: u64,
        column_id: u64,
    ) -> ClientApiResult<Vec<ColumnDatum>> {
        Ok(self
            .inner
            .read()
            .await
            .column_data
            .get(&(course_id, column_id))
            .map(|entries| {
                let mut data: Vec<ColumnDatum> = entries
                    .iter()
                    .map(|(user_id, content)| ColumnDatum {
                        user_id: *user_id,
                        content: content.clone(),
                    })
                    .collect();
                data.sort_by_key(|d| d.user_id);
                data
            })
            .unwrap_or_default())
    }

    async fn put_column_entry(
        &self,
        course_id: u64,
        column_id: u64,
        user_id: u64,
        content: &str,
    ) -> ClientApiResult<ColumnDatum> {
        let mut inner = self.inner.write().await;
        let exists = inner
            .columns
            .get(&course_id)
            .is_some_and(|cols| cols.iter().any(|c| c.id == column_id));
        if !exists {
            return Err(ClientApiError::NotFound(format!(
                "custom column {} in course {}",
                column_id, course_id
            )));
        }
        inner
            .column_data
            .entry((course_id, column_id))
            .or_default()
            .insert(user_id, content.to_string());
        Ok(ColumnDatum {
            user_id,
            content: content.to_string(),
        })
    }

    async fn list_sections(&self, course_id: u64) -> ClientApiResult<Vec<Section>> {
        Ok(self.inner.read().await.sections.get(&course_id).cloned().unwrap_or_default())
    }

    async fn create_section(&self, course_id: u64, name: &str) -> ClientApiResult<Section> {
        let mut inner = self.inner.write().await;
        let id = inner.next_id();
        let section = Section {
            id,
            name: name.to_string(),
            course_id,
            sis_section_id: None,
        };
        inner.sections.entry(course_id).or_default().push(section.clone());
        Ok(section)
    }

    async fn list_enrollments(&self, course_id: u64) -> ClientApiResult<Vec<Enrollment>> {
        Ok(self.inner.read().await.enrollments.get(&course_id).cloned().unwrap_or_default())
    }

    async fn enroll_user(
        &self,
        course_id: u64,
        request: &CreateEnrollmentRequest,
    ) -> ClientApiResult<Enrollment> {
        let mut inner = self.inner.write().await;
        let id = inner.next_id();
        let attrs = &request.enrollment;
        let enrollment = Enrollment {
            id,
            user_id: attrs.user_id,
            course_id,
            role: attrs.role,
            enrollment_state: attrs.enrollment_state,
            course_section_id: attrs.course_section_id,
            user: None,
        };
        inner.enrollments.entry(course_id).or_default().push(enrollment.clone());
        Ok(enrollment)
    }

    async fn list_assignments(&self, course_id: u64) -> ClientApiResult<Vec<Assignment>> {
        Ok(self.inner.read().await.assignments.get(&course_id).cloned().unwrap_or_default())
    }

    async fn get_submission(
        &self,
        course_id: u64,
        assignment_id: u64,
        user_id: u64,
    ) -> ClientApiResult<Submission> {
        self.inner
            .read()
            .await
            .submissions
            .get(&(course_id, assignment_id, user_id))
            .cloned()
            .ok_or_else(|| {
                ClientApiError::NotFound(format!(
                    "submission for user {} on assignment {}",
                    user_id, assignment_id
                ))
            })
    }

    async fn list_peer_reviews(
        &self,
        course_id: u64,
        assignment_id: u64,
    ) -> ClientApiResult<Vec<PeerReview>> {
        Ok(self
            .inner
            .read()
            .await
            .peer_reviews
            .get(&(course_id, assignment_id))
            .cloned()
            .unwrap_or_default())
    }

    async fn create_announcement(
        &self,
        course_id: u64,
        request: &CreateAnnouncementRequest,
    ) -> ClientApiResult<DiscussionTopic> {
        let mut inner = self.inner.write().await;
        let id = inner.next_id();
        let topic = DiscussionTopic {
            id,
            title: request.title.clone(),
            message: Some(request.message.clone()),
            posted_at: None,
        };
        inner.announcements.entry(course_id).or_default().push(topic.clone());
        Ok(topic)
    }

    async fn create_calendar_event(
        &self,
        user_id: u64,
        request: &CreateCalendarEventRequest,
    ) -> ClientApiResult<CalendarEvent> {
        let mut inner = self.inner.write().await;
        let id = inner.next_id();
        let attrs = &request.calendar_event;
        let event = CalendarEvent {
            id,
            title: attrs.title.clone(),
            context_code: attrs.context_code.clone(),
            start_at: attrs.start_at,
            end_at: attrs.end_at,
            description: attrs.description.clone(),
        };
        inner.calendar_events.entry(user_id).or_default().push(event.clone());
        Ok(event)
    }

    async fn get_user_profile(&self, user_id: u64) -> ClientApiResult<UserProfile> {
        self.inner
            .read()
            .await
            .profiles
            .get(&user_id)
            .cloned()
            .ok_or_else(|| ClientApiError::NotFound(format!("user {}", user_id)))
    }

    async fn get_user_profile_by_sis_id(&self, sis_id: &str) -> ClientApiResult<UserProfile> {
        self.inner
            .read()
            .await
            .profiles
            .values()
            .find(|p| p.sis_user_id.as_deref() == Some(sis_id))
            .cloned()
            .ok_or_else(|| ClientApiError::NotFound(format!("user with sis id {}", sis_id)))
    }

    async fn get_program_of_study(&self, sis_id: &str) -> ClientApiResult<Option<ProgramOfStudy>> {
        Ok(self.inner.read().await.programs_of_study.get(sis_id).cloned())
    }

    async fn put_program_of_study(
        &self,
        sis_id: &str,
        data: &ProgramOfStudy,
    ) -> ClientApiResult<()> {
        self.inner
            .write()
            .await
            .programs_of_study
            .insert(sis_id.to_string(), data.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn column_writes_are_visible_to_reads() {
        let mock = MockCanvas::new();
        let column_id = mock.add_custom_column(5, "Examiner").await;
        mock.put_column_entry(5, column_id, 1, "⚠⚠Jane Doe").await.unwrap();

        let entries = mock.list_column_entries(5, column_id).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].content, "⚠⚠Jane Doe");
    }

    #[tokio::test]
    async fn put_to_unknown_column_is_not_found() {
        let mock = MockCanvas::new();
        let err = mock.put_column_entry(5, 99, 1, "x").await.unwrap_err();
        assert!(matches!(err, ClientApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn sections_find_or_create_flow() {
        let mock = MockCanvas::new();
        assert!(mock.list_sections(5).await.unwrap().is_empty());
        let section = mock.create_section(5, "Awaiting Assignment of Examiner").await.unwrap();
        mock.enroll_user(5, &CreateEnrollmentRequest::active_student(1, section.id))
            .await
            .unwrap();
        assert_eq!(
            mock.section_names_for_user(5, 1).await,
            vec!["Awaiting Assignment of Examiner".to_string()]
        );
    }
}
