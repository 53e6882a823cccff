//! Route handlers for the student application wizard.
//!
//! Each handler translates a request into a wizard action, applies it to the
//! session, and renders the next page. Page ordering lives in the state
//! machine (`dp_core::wizard`), not in the handlers.

use std::sync::Arc;

use axum::extract::{Form, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use chrono::{Datelike, Months, Utc};
use serde::Deserialize;
use tracing::info;

use dp_canvas_api::{ProgramMembership, ProgramOfStudy};
use dp_canvas_client::ColumnRegistry;
use dp_client_api::ClientApiError;
use dp_core::wizard::{GeneralInfo, GradingScale, WizardAction, WizardState};
use dp_core::{ColumnValue, Session};
use dp_lti::{extract_launch, verify_signature};

use crate::error::AppError;
use crate::finalize::{self, COL_COURSE_CODE};
use crate::pages;
use crate::state::{AppState, SESSION_COOKIE};

/// Either a rendered page or a redirect to the next one.
#[derive(Debug)]
pub enum PageResponse {
    Page(String),
    Redirect(&'static str),
}

impl IntoResponse for PageResponse {
    fn into_response(self) -> Response {
        match self {
            PageResponse::Page(html) => Html(html).into_response(),
            PageResponse::Redirect(to) => Redirect::to(to).into_response(),
        }
    }
}

fn redirect_unless(session: &Session, expected: WizardState) -> Result<(), PageResponse> {
    if session.wizard.state == expected {
        Ok(())
    } else {
        Err(PageResponse::Redirect(session.wizard.state.page_path()))
    }
}

/// `POST /start` — the LTI launch. Verifies the OAuth1 signature, extracts
/// the launch context, opens a session, and hands the student to the wizard.
/// This is the only route that authenticates the caller.
pub async fn start(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(params): Form<Vec<(String, String)>>,
) -> Result<(CookieJar, Redirect), AppError> {
    verify_signature(
        "POST",
        state.launch_url.as_str(),
        &params,
        &state.lti.consumer_secret,
    )?;
    let launch = extract_launch(&params)?;
    info!(course = launch.course_id, user = launch.user_id, "verified LTI launch");

    let id = state.sessions.create_session(launch).await;
    let jar = jar.add(
        Cookie::build((SESSION_COOKIE, id.to_string()))
            .path("/")
            .http_only(true),
    );
    Ok((jar, Redirect::to("/getUserProgram")))
}

/// `GET /getUserProgram` — resolve the student's program. A single stored
/// program of study is taken as-is; zero or several mean the student picks
/// from the school's cycle-relevant programs.
pub async fn get_user_program(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<PageResponse, AppError> {
    let session = state.require_session(&jar).await?;
    if let Err(redirect) = redirect_unless(&session, WizardState::Launched) {
        return Ok(redirect);
    }
    if session.launch.sis_id.is_empty() {
        return Ok(PageResponse::Page(pages::no_sis_id_page()));
    }

    let stored = state.canvas.get_program_of_study(&session.launch.sis_id).await?;
    let codes: Vec<String> = stored
        .map(|blob| blob.programs.into_iter().map(|p| p.code).collect())
        .unwrap_or_default();

    if codes.len() == 1 {
        let code = codes.into_iter().next().expect("one element");
        info!(program = %code, "single stored program of study; skipping the prompt");
        state.apply_action(session.id, WizardAction::ProgramChosen(code)).await?;
        return Ok(PageResponse::Redirect("/getGeneralData"));
    }

    let reference = state.reference.current();
    Ok(PageResponse::Page(pages::program_form(&reference.programs)))
}

#[derive(Debug, Deserialize)]
pub struct ProgramForm {
    pub program_code: Option<String>,
}

/// `POST /gotUsersProgram` — the student picked a program. The choice is
/// also stored in the student's program-of-study blob so the next launch
/// skips the prompt.
pub async fn got_users_program(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<ProgramForm>,
) -> Result<PageResponse, AppError> {
    let session = state.require_session(&jar).await?;

    let code = form
        .program_code
        .filter(|c| !c.is_empty())
        .ok_or(AppError::MissingField("/getUserProgram"))?;
    let reference = state.reference.current();
    let program = reference
        .programs
        .get(&code)
        .ok_or(AppError::MissingField("/getUserProgram"))?;

    state.apply_action(session.id, WizardAction::ProgramChosen(code.clone())).await?;

    if !session.launch.sis_id.is_empty() {
        let blob = ProgramOfStudy {
            programs: vec![ProgramMembership {
                code,
                name: program.title_en.clone(),
                start: Some(Utc::now().year()),
            }],
        };
        state.canvas.put_program_of_study(&session.launch.sis_id, &blob).await?;
    }

    Ok(PageResponse::Redirect("/getGeneralData"))
}

/// `GET /getGeneralData` — the main survey form.
pub async fn get_general_data(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<PageResponse, AppError> {
    let session = state.require_session(&jar).await?;
    if let Err(redirect) = redirect_unless(&session, WizardState::ProgramKnown) {
        return Ok(redirect);
    }

    let reference = state.reference.current();
    let program_code = session
        .wizard
        .answers
        .program_code
        .clone()
        .ok_or(AppError::MissingField("/getUserProgram"))?;
    let program = reference
        .programs
        .get(&program_code)
        .ok_or(AppError::MissingField("/getUserProgram"))?;

    let today = Utc::now().date_naive();
    let start_max = today.checked_add_months(Months::new(11)).unwrap_or(today);
    Ok(PageResponse::Page(pages::general_form(
        &program_code,
        program,
        reference.cycle_number,
        today,
        start_max,
    )))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AssessmentForm {
    pub diva_permission: String,
    pub tentative_title: String,
    pub prelim_description: String,
    pub company: String,
    pub country_code: String,
    pub university: String,
    pub contact: String,
    pub planned_start: String,
    pub grading_scale: Option<String>,
}

/// `POST /assessment` — collect the survey answers and branch on the grading
/// scale.
pub async fn assessment(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<AssessmentForm>,
) -> Result<PageResponse, AppError> {
    let session = state.require_session(&jar).await?;

    let info = GeneralInfo {
        diva_permission: form.diva_permission,
        tentative_title: form.tentative_title,
        prelim_description: form.prelim_description,
        company: form.company,
        country_code: form.country_code,
        university: form.university,
        contact: form.contact,
        planned_start: form.planned_start.parse().ok(),
        grading_scale: Some(GradingScale::from_form(form.grading_scale.as_deref())),
    };
    state.apply_action(session.id, WizardAction::GeneralInfoSubmitted(info)).await?;

    // Re-read to let program rules (TIVNM) override the submitted scale.
    let session = state.require_session(&jar).await?;
    Ok(match session.wizard.grading_scale() {
        GradingScale::AF => PageResponse::Redirect("/grading_scale_AF"),
        GradingScale::PF => PageResponse::Redirect("/grading_scale_PF"),
    })
}

/// Shared body of the course-selection pages. An administrator-imposed
/// choice list in the `Course_code` column beats the per-program filter.
async fn course_page(
    state: &AppState,
    jar: &CookieJar,
    scale_override: Option<GradingScale>,
) -> Result<PageResponse, AppError> {
    let session = state.require_session(jar).await?;
    if let Err(redirect) = redirect_unless(&session, WizardState::GeneralInfoCollected) {
        return Ok(redirect);
    }

    let scale = scale_override.unwrap_or_else(|| session.wizard.grading_scale());
    let reference = state.reference.current();
    let program_code = session
        .wizard
        .answers
        .program_code
        .clone()
        .ok_or(AppError::MissingField("/getUserProgram"))?;

    let registry = ColumnRegistry::load(state.canvas.as_ref(), session.launch.course_id).await?;
    let stored = match registry.get_entry(COL_COURSE_CODE, session.launch.user_id).await {
        Ok(value) => value,
        // A course without the column simply has no constraints configured.
        Err(ClientApiError::NotFound(_)) => None,
        Err(e) => return Err(e.into()),
    };

    let courses = match stored {
        Some(ColumnValue::ConstrainedChoice(choices)) => {
            let full = match scale {
                GradingScale::AF => &reference.af_courses,
                GradingScale::PF => &reference.pf_courses,
            };
            let mut restricted =
                dp_core::reference::ReferenceData::restrict_to_choices(full, &choices);
            restricted.sort();
            restricted
        }
        _ => reference.courses_for_program(&program_code, scale),
    };

    Ok(PageResponse::Page(pages::course_form(scale, &courses, &reference)))
}

/// `GET /grading_scale` — course selection at the session's grading scale.
pub async fn grading_scale(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<PageResponse, AppError> {
    course_page(&state, &jar, None).await
}

/// `GET /grading_scale_AF`
pub async fn grading_scale_af(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<PageResponse, AppError> {
    course_page(&state, &jar, Some(GradingScale::AF)).await
}

/// `GET /grading_scale_PF`
pub async fn grading_scale_pf(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<PageResponse, AppError> {
    course_page(&state, &jar, Some(GradingScale::PF)).await
}

#[derive(Debug, Deserialize)]
pub struct CourseForm {
    pub selected_course: Option<String>,
}

/// `POST /Examiner` — the student picked a course; offer its examiners, or
/// fall through to the no-examiner outcome when none are configured.
pub async fn examiner(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<CourseForm>,
) -> Result<PageResponse, AppError> {
    let session = state.require_session(&jar).await?;

    let course = form
        .selected_course
        .filter(|c| !c.is_empty())
        .ok_or(AppError::MissingField("/grading_scale"))?;

    state.apply_action(session.id, WizardAction::CourseSelected(course.clone())).await?;

    let examiners = state.reference.current().examiners_for_course(&course);
    if examiners.is_empty() {
        info!(course = %course, "no examiners configured for course");
        state.apply_action(session.id, WizardAction::NoExaminerFound).await?;
        return Ok(PageResponse::Redirect("/OutcomeNoExaminer"));
    }

    Ok(PageResponse::Page(pages::examiner_form(&examiners)))
}

#[derive(Debug, Deserialize)]
pub struct ExaminerForm {
    pub selected_examiner: Option<String>,
}

/// `POST /Outcome` — the student picked an examiner (or skipped the field);
/// write everything back to Canvas and finish.
pub async fn outcome(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<ExaminerForm>,
) -> Result<PageResponse, AppError> {
    let session = state.require_session(&jar).await?;

    match form.selected_examiner.filter(|e| !e.is_empty()) {
        Some(examiner) => {
            state.apply_action(session.id, WizardAction::ExaminerSelected(examiner)).await?;
        }
        None => {
            state.apply_action(session.id, WizardAction::NoExaminerFound).await?;
        }
    }

    let session = state.require_session(&jar).await?;
    finalize::finalize(state.canvas.as_ref(), &session.launch, &session.wizard).await?;
    state.apply_action(session.id, WizardAction::Finalized).await?;

    let course = session.wizard.answers.selected_course.clone().unwrap_or_default();
    Ok(PageResponse::Page(match &session.wizard.answers.selected_examiner {
        Some(examiner) => pages::outcome_page(&course, examiner),
        None => pages::outcome_no_examiner_page(&course),
    }))
}

/// `GET /Outcome` — the done page for a wizard that already finished.
pub async fn outcome_done(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<PageResponse, AppError> {
    let session = state.require_session(&jar).await?;
    if let Err(redirect) = redirect_unless(&session, WizardState::Completed) {
        return Ok(redirect);
    }
    let course = session.wizard.answers.selected_course.clone().unwrap_or_default();
    Ok(PageResponse::Page(match &session.wizard.answers.selected_examiner {
        Some(examiner) => pages::outcome_page(&course, examiner),
        None => pages::outcome_no_examiner_page(&course),
    }))
}

/// `GET /OutcomeNoExaminer` — finish for a course without examiners.
pub async fn outcome_no_examiner(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<PageResponse, AppError> {
    let session = state.require_session(&jar).await?;
    if let Err(redirect) = redirect_unless(&session, WizardState::NoExaminerAvailable) {
        return Ok(redirect);
    }

    finalize::finalize(state.canvas.as_ref(), &session.launch, &session.wizard).await?;
    state.apply_action(session.id, WizardAction::Finalized).await?;

    let course = session.wizard.answers.selected_course.clone().unwrap_or_default();
    Ok(PageResponse::Page(pages::outcome_no_examiner_page(&course)))
}

/// `GET /Reload` — rebuild the reference snapshot from disk.
pub async fn reload(State(state): State<Arc<AppState>>) -> Result<PageResponse, AppError> {
    let fresh = state.reference.reload()?;
    Ok(PageResponse::Page(pages::reload_page(
        &fresh.school_acronym,
        fresh.cycle_number,
    )))
}
