//! API contract types for the Canvas LMS REST endpoints used by the tools

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A custom gradebook column in a course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomColumn {
    pub id: u64,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub read_only: bool,
}

/// A single datum in a custom gradebook column: one user's stored content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDatum {
    pub user_id: u64,
    pub content: String,
}

/// Write payload for a column datum (`PUT .../custom_gradebook_columns/:id/data/:user_id`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDatumUpdate {
    pub column_data: ColumnDatumContent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDatumContent {
    pub content: String,
}

impl ColumnDatumUpdate {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            column_data: ColumnDatumContent {
                content: content.into(),
            },
        }
    }
}

/// A course section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub id: u64,
    pub name: String,
    pub course_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sis_section_id: Option<String>,
}

/// Write payload for section creation (`POST .../courses/:id/sections`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CreateSectionRequest {
    pub course_section: SectionAttributes,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionAttributes {
    pub name: String,
}

impl CreateSectionRequest {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            course_section: SectionAttributes { name: name.into() },
        }
    }
}

/// Enrollment roles accepted by the enrollments endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnrollmentRole {
    StudentEnrollment,
    TeacherEnrollment,
    TaEnrollment,
    ObserverEnrollment,
    DesignerEnrollment,
}

/// Enrollment workflow states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnrollmentState {
    Active,
    Invited,
    Inactive,
}

/// An enrollment of a user in a course (roster entry).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enrollment {
    pub id: u64,
    pub user_id: u64,
    pub course_id: u64,
    #[serde(rename = "type")]
    pub role: EnrollmentRole,
    pub enrollment_state: EnrollmentState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_section_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserDisplay>,
}

/// Minimal user object embedded in roster responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDisplay {
    pub id: u64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sortable_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sis_user_id: Option<String>,
}

/// Write payload for enrollment creation (`POST .../courses/:id/enrollments`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateEnrollmentRequest {
    pub enrollment: EnrollmentAttributes,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollmentAttributes {
    pub user_id: u64,
    #[serde(rename = "type")]
    pub role: EnrollmentRole,
    pub enrollment_state: EnrollmentState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_section_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notify: Option<bool>,
}

impl CreateEnrollmentRequest {
    /// An immediately-active student enrollment in the given section.
    pub fn active_student(user_id: u64, section_id: u64) -> Self {
        Self {
            enrollment: EnrollmentAttributes {
                user_id,
                role: EnrollmentRole::StudentEnrollment,
                enrollment_state: EnrollmentState::Active,
                course_section_id: Some(section_id),
                notify: None,
            },
        }
    }
}

/// An assignment in a course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: u64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points_possible: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grading_type: Option<String>,
}

/// A user's submission for an assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub assignment_id: u64,
    pub user_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workflow_state: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub attachments: Vec<Attachment>,
}

/// A file attached to a submission (e.g. the thesis PDF).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub id: u64,
    pub filename: String,
    pub url: String,
    #[serde(rename = "content-type", skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

/// A peer-review assignment pairing an assessor with a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerReview {
    pub id: u64,
    pub assessor_id: u64,
    pub user_id: u64,
    pub asset_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workflow_state: Option<String>,
}

/// Write payload for an announcement, a published discussion topic flagged
/// `is_announcement` (`POST .../courses/:id/discussion_topics`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CreateAnnouncementRequest {
    #[validate(length(min = 1, message = "Announcement title cannot be empty"))]
    pub title: String,
    #[validate(length(min = 1, message = "Announcement message cannot be empty"))]
    pub message: String,
    pub published: bool,
    pub is_announcement: bool,
}

impl CreateAnnouncementRequest {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            published: true,
            is_announcement: true,
        }
    }
}

/// A discussion topic as returned by Canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscussionTopic {
    pub id: u64,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub posted_at: Option<DateTime<Utc>>,
}

/// Write payload for a calendar event (`POST /calendar_events?as_user_id=...`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateCalendarEventRequest {
    pub calendar_event: CalendarEventAttributes,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEventAttributes {
    /// Context the event is placed in, e.g. `user_1234`.
    pub context_code: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
}

impl CreateCalendarEventRequest {
    /// A zero-duration event in the given user's calendar.
    pub fn for_user(
        user_id: u64,
        at: DateTime<Utc>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            calendar_event: CalendarEventAttributes {
                context_code: format!("user_{}", user_id),
                title: title.into(),
                description: Some(description.into()),
                start_at: at,
                end_at: at,
            },
        }
    }
}

/// A calendar event as returned by Canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: u64,
    pub title: String,
    pub context_code: String,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A user profile (`GET /users/:id/profile` or `/users/sis_user_id:<sis>/profile`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: u64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sortable_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sis_user_id: Option<String>,
}

/// Namespace under which the tools store per-user program-of-study data.
pub const PROGRAM_OF_STUDY_NS: &str = "se.kth.canvas-app.program_of_study";

/// The program-of-study blob stored in a user's namespaced custom data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramOfStudy {
    #[serde(default)]
    pub programs: Vec<ProgramMembership>,
}

/// One program a student belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramMembership {
    pub code: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<i32>,
}

/// Envelope for custom-data reads and writes: Canvas wraps the stored value
/// in a `data` member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomDataEnvelope<T> {
    pub data: T,
}

/// Write payload for namespaced custom data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomDataUpdate<T> {
    pub ns: String,
    pub data: T,
}

impl<T> CustomDataUpdate<T> {
    pub fn program_of_study(data: T) -> Self {
        Self {
            ns: PROGRAM_OF_STUDY_NS.to_string(),
            data,
        }
    }
}

/// Error body Canvas returns on non-2xx responses. The shape varies per
/// endpoint, so the detail is kept loosely typed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CanvasErrorBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_datum_update_serializes_to_canvas_shape() {
        let update = ColumnDatumUpdate::new("⚠⚠Jane Doe");
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json["column_data"]["content"], "⚠⚠Jane Doe");
    }

    #[test]
    fn enrollment_request_defaults_to_active_student() {
        let req = CreateEnrollmentRequest::active_student(17, 99);
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["enrollment"]["type"], "StudentEnrollment");
        assert_eq!(json["enrollment"]["enrollment_state"], "active");
        assert_eq!(json["enrollment"]["course_section_id"], 99);
        assert!(json["enrollment"].get("notify").is_none());
    }

    #[test]
    fn calendar_event_uses_user_context_code() {
        let at = DateTime::parse_from_rfc3339("2026-03-14T13:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let req = CreateCalendarEventRequest::for_user(42, at, "Presentation", "Room 4523");
        assert_eq!(req.calendar_event.context_code, "user_42");
        assert_eq!(req.calendar_event.start_at, req.calendar_event.end_at);
    }

    #[test]
    fn program_of_study_roundtrips_through_envelope() {
        let blob = CustomDataUpdate::program_of_study(ProgramOfStudy {
            programs: vec![ProgramMembership {
                code: "TCOMK".to_string(),
                name: "Information and Communication Technology".to_string(),
                start: Some(2016),
            }],
        });
        let json = serde_json::to_string(&blob).unwrap();
        assert!(json.contains(PROGRAM_OF_STUDY_NS));

        let envelope: CustomDataEnvelope<ProgramOfStudy> =
            serde_json::from_str(r#"{"data":{"programs":[{"code":"CINTE","name":"ICT"}]}}"#)
                .unwrap();
        assert_eq!(envelope.data.programs[0].code, "CINTE");
    }
}
