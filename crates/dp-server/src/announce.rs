//! Presentation announcements: an instructor flow that posts a course
//! announcement and drops the presentation into the student's calendar.
//!
//! The announcement is enriched from the course's draft assignment: the
//! student's submitted draft names the thesis file, and the assigned peer
//! reviewers become the opponents listed in the announcement.

use std::sync::Arc;

use axum::extract::{Form, State};
use axum_extra::extract::cookie::CookieJar;
use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use tracing::{info, warn};

use dp_canvas_api::{CreateAnnouncementRequest, CreateCalendarEventRequest, EnrollmentRole};
use dp_client_api::ClientApiError;

use crate::error::AppError;
use crate::pages;
use crate::state::AppState;
use crate::wizard::PageResponse;

/// Assignment holding the draft the opponents review.
pub const DRAFT_ASSIGNMENT_NAME: &str = "Utkast till/Draft for opponent";

/// `GET /announce` — the announcement form, offering the course roster as
/// student suggestions. Instructor launches only.
pub async fn announce_form(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<PageResponse, AppError> {
    let session = state.require_session(&jar).await?;
    if !session.launch.is_instructor() {
        return Err(AppError::Unauthorized(
            "announcements require an instructor role".to_string(),
        ));
    }

    let roster = state.canvas.list_enrollments(session.launch.course_id).await?;
    let mut students = std::collections::BTreeMap::new();
    for enrollment in roster {
        if enrollment.role == EnrollmentRole::StudentEnrollment {
            let name = enrollment
                .user
                .map(|u| u.name)
                .unwrap_or_else(|| enrollment.user_id.to_string());
            students.entry(enrollment.user_id).or_insert(name);
        }
    }
    let students: Vec<(u64, String)> = students.into_iter().collect();
    Ok(PageResponse::Page(pages::announce_form(&students)))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AnnounceForm {
    pub student_id: String,
    pub date: String,
    pub time: String,
    pub location: String,
    pub title: String,
}

/// Opponents assigned as peer reviewers of the student's draft, plus the
/// submitted draft's file name when one exists.
async fn draft_details(
    state: &AppState,
    course_id: u64,
    student_id: u64,
) -> Result<(Vec<String>, Option<String>), AppError> {
    let assignments = state.canvas.list_assignments(course_id).await?;
    let Some(draft) = assignments.iter().find(|a| a.name == DRAFT_ASSIGNMENT_NAME) else {
        warn!(course_id, "course has no draft assignment; announcing without opponents");
        return Ok((Vec::new(), None));
    };

    let thesis_file = match state.canvas.get_submission(course_id, draft.id, student_id).await {
        Ok(submission) => submission.attachments.first().map(|a| a.filename.clone()),
        Err(ClientApiError::NotFound(_)) => None,
        Err(e) => return Err(e.into()),
    };

    let mut opponents = Vec::new();
    for review in state.canvas.list_peer_reviews(course_id, draft.id).await? {
        if review.user_id != student_id {
            continue;
        }
        match state.canvas.get_user_profile(review.assessor_id).await {
            Ok(profile) => opponents.push(profile.name),
            Err(ClientApiError::NotFound(_)) => {
                warn!(assessor = review.assessor_id, "peer reviewer has no profile")
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok((opponents, thesis_file))
}

/// `POST /announce` — create the announcement and the calendar event.
pub async fn announce(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<AnnounceForm>,
) -> Result<PageResponse, AppError> {
    let session = state.require_session(&jar).await?;
    if !session.launch.is_instructor() {
        return Err(AppError::Unauthorized(
            "announcements require an instructor role".to_string(),
        ));
    }
    let course_id = session.launch.course_id;

    let date: NaiveDate =
        form.date.parse().map_err(|_| AppError::MissingField("/announce"))?;
    let time = NaiveTime::parse_from_str(form.time.trim(), "%H:%M")
        .or_else(|_| form.time.trim().parse())
        .unwrap_or_else(|_| NaiveTime::from_hms_opt(13, 0, 0).expect("13:00 is a valid time"));

    // The student field takes a Canvas user id or, failing that, a SIS id.
    let student_ref = form.student_id.trim();
    if student_ref.is_empty() {
        return Err(AppError::MissingField("/announce"));
    }
    let profile = match student_ref.parse::<u64>() {
        Ok(id) => state.canvas.get_user_profile(id).await?,
        Err(_) => state.canvas.get_user_profile_by_sis_id(student_ref).await?,
    };
    let student_id = profile.id;
    let (opponents, thesis_file) = draft_details(&state, course_id, student_id).await?;

    let announcement_title =
        format!("Degree project presentation by {}: {}", profile.name, form.title);
    let mut message = format!(
        "<p><span lang=\"en\">{name} will present the degree project \"{title}\" on {date} at \
         {time} in {location}.</span> | <span lang=\"sv\">{name} presenterar examensarbetet \
         \"{title}\" den {date} kl. {time} i {location}.</span></p>",
        name = profile.name,
        title = form.title,
        location = form.location,
    );
    if !opponents.is_empty() {
        message.push_str("\n<h3>Opponent(s)</h3>\n<ul>");
        for opponent in &opponents {
            message.push_str(&format!("<li>{}</li>", opponent));
        }
        message.push_str("</ul>");
    }
    if let Some(filename) = thesis_file {
        message.push_str(&format!("\n<p>Draft under review: {}</p>", filename));
    }

    state
        .canvas
        .create_announcement(course_id, &CreateAnnouncementRequest::new(&announcement_title, &message))
        .await?;

    let start = date.and_time(time).and_utc();
    state
        .canvas
        .create_calendar_event(
            student_id,
            &CreateCalendarEventRequest::for_user(student_id, start, &announcement_title, &message),
        )
        .await?;

    info!(course_id, student = student_id, "presentation announced");
    Ok(PageResponse::Page(pages::announce_confirmation(&profile.name, date)))
}
