//! Write the collected wizard answers back to Canvas.
//!
//! The answers land in the course's custom gradebook columns, and the student
//! is enrolled into the administrative sections the education office works
//! from. Course code and examiner are written as tentative values; they stay
//! marked until the office confirms them.

use tracing::{info, warn};

use dp_client_api::{CanvasApi, ClientApiError, ClientApiResult};
use dp_canvas_api::CreateEnrollmentRequest;
use dp_canvas_client::ColumnRegistry;
use dp_core::wizard::Wizard;
use dp_core::{ColumnValue, LaunchContext};

pub const COL_EXAMINER: &str = "Examiner";
pub const COL_COURSE_CODE: &str = "Course_code";
pub const COL_DIVA_PERMISSION: &str = "Student_approves_fulltext";
pub const COL_TENTATIVE_TITLE: &str = "Tentative_title";
pub const COL_PRELIM_DESCRIPTION: &str = "Prelim_description";
pub const COL_PLACE: &str = "Place";
pub const COL_CONTACT: &str = "Contact";
pub const COL_PLANNED_START: &str = "Planned_start_date";

/// Section every finishing student lands in.
pub const AWAITING_EXAMINER_SECTION: &str = "Awaiting Assignment of Examiner";

/// Examiner column content when no examiner could be chosen.
pub const NO_EXAMINER_PLACEHOLDER: &str = "No examiner selected";

/// Write one optional answer column, tolerating a course that does not carry
/// the column at all.
async fn put_optional(
    registry: &ColumnRegistry<'_>,
    column: &str,
    user_id: u64,
    value: ColumnValue,
) -> ClientApiResult<()> {
    match registry.put_entry(column, user_id, &value).await {
        Ok(()) => Ok(()),
        Err(ClientApiError::NotFound(_)) => {
            warn!(column, "course has no such custom column; skipping");
            Ok(())
        }
        Err(e) => Err(e),
    }
}

/// Write every collected answer to the course's columns and enroll the
/// student in the administrative sections. The `Examiner` and `Course_code`
/// columns are required; the rest are skipped if the course lacks them.
pub async fn finalize(
    canvas: &dyn CanvasApi,
    launch: &LaunchContext,
    wizard: &Wizard,
) -> ClientApiResult<()> {
    let course_id = launch.course_id;
    let user_id = launch.user_id;
    let registry = ColumnRegistry::load(canvas, course_id).await?;

    let examiner = wizard.answers.selected_examiner.clone();
    let course_code = wizard.answers.selected_course.clone().unwrap_or_default();

    registry
        .put_entry(
            COL_EXAMINER,
            user_id,
            &ColumnValue::Tentative(
                examiner.clone().unwrap_or_else(|| NO_EXAMINER_PLACEHOLDER.to_string()),
            ),
        )
        .await?;
    registry
        .put_entry(
            COL_COURSE_CODE,
            user_id,
            &ColumnValue::Tentative(course_code.clone()),
        )
        .await?;

    if let Some(general) = &wizard.answers.general {
        if !general.diva_permission.is_empty() {
            put_optional(
                &registry,
                COL_DIVA_PERMISSION,
                user_id,
                ColumnValue::Confirmed(general.diva_permission.clone()),
            )
            .await?;
        }
        if !general.tentative_title.is_empty() {
            put_optional(
                &registry,
                COL_TENTATIVE_TITLE,
                user_id,
                ColumnValue::Confirmed(general.tentative_title.clone()),
            )
            .await?;
        }
        if !general.prelim_description.is_empty() {
            put_optional(
                &registry,
                COL_PRELIM_DESCRIPTION,
                user_id,
                ColumnValue::Confirmed(general.prelim_description.clone()),
            )
            .await?;
        }
        if let Some(place) = general.place_string() {
            put_optional(&registry, COL_PLACE, user_id, ColumnValue::Confirmed(place)).await?;
        }
        if !general.contact.is_empty() {
            put_optional(
                &registry,
                COL_CONTACT,
                user_id,
                ColumnValue::Confirmed(general.contact.clone()),
            )
            .await?;
        }
        if let Some(start) = general.planned_start {
            put_optional(
                &registry,
                COL_PLANNED_START,
                user_id,
                ColumnValue::Confirmed(start.to_string()),
            )
            .await?;
        }
    }

    let mut section_names = vec![AWAITING_EXAMINER_SECTION.to_string()];
    if let Some(examiner) = examiner {
        section_names.push(examiner);
    }
    add_student_to_sections(canvas, course_id, user_id, &section_names).await?;

    info!(course_id, user_id, course = %course_code, "wizard answers written back");
    Ok(())
}

/// Resolve a section by name, creating it if the course has none with that
/// name.
async fn section_id_with_name(
    canvas: &dyn CanvasApi,
    course_id: u64,
    existing: &[dp_canvas_api::Section],
    name: &str,
) -> ClientApiResult<u64> {
    if let Some(section) = existing.iter().find(|s| s.name == name) {
        return Ok(section.id);
    }
    let created = canvas.create_section(course_id, name).await?;
    Ok(created.id)
}

/// Enroll a student as an active member of each named section.
pub async fn add_student_to_sections(
    canvas: &dyn CanvasApi,
    course_id: u64,
    user_id: u64,
    section_names: &[String],
) -> ClientApiResult<()> {
    let existing = canvas.list_sections(course_id).await?;
    for name in section_names {
        let section_id = section_id_with_name(canvas, course_id, &existing, name).await?;
        canvas
            .enroll_user(course_id, &CreateEnrollmentRequest::active_student(user_id, section_id))
            .await?;
    }
    Ok(())
}
