//! Explicit state machine for the degree-project application wizard.
//!
//! The original tools encoded page ordering as literal redirect targets
//! scattered through the handlers. Here the ordering is a transition table:
//! each HTTP handler translates its form submission into a [`WizardAction`],
//! applies it, and either renders the next page for the resulting state or
//! redirects back to the page the [`WizardError`] names.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Grading scale for the degree project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GradingScale {
    /// Graded A-F.
    AF,
    /// Pass/Fail (the default).
    PF,
}

impl GradingScale {
    /// Parse the wizard form's radio values. An absent field defaults to A-F,
    /// matching the assessment form's fallback.
    pub fn from_form(value: Option<&str>) -> Self {
        match value {
            Some("grading_scale_PF") => GradingScale::PF,
            _ => GradingScale::AF,
        }
    }
}

/// The general-information page's answers, collected in one submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralInfo {
    /// `yes_to_diva` / `no_to_diva`.
    pub diva_permission: String,
    pub tentative_title: String,
    pub prelim_description: String,
    pub company: String,
    pub country_code: String,
    pub university: String,
    pub contact: String,
    pub planned_start: Option<NaiveDate>,
    pub grading_scale: Option<GradingScale>,
}

impl GeneralInfo {
    /// The `Place` column content: the non-empty location fields rendered as
    /// `key = value` pairs joined by `", "`. Empty when nothing was entered.
    pub fn place_string(&self) -> Option<String> {
        let mut parts = Vec::new();
        if !self.company.is_empty() {
            parts.push(format!("company = {}", self.company));
        }
        if !self.university.is_empty() {
            parts.push(format!("university = {}", self.university));
        }
        if !self.country_code.is_empty() {
            parts.push(format!("country_code = {}", self.country_code));
        }
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }
}

/// Answers accumulated across the wizard pages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WizardAnswers {
    pub program_code: Option<String>,
    pub general: Option<GeneralInfo>,
    pub selected_course: Option<String>,
    pub selected_examiner: Option<String>,
}

/// The wizard's states, one per page boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WizardState {
    /// Launch verified; the student's program is not yet known.
    Launched,
    /// Program selected or recovered from stored program-of-study data.
    ProgramKnown,
    /// The general-information form was submitted.
    GeneralInfoCollected,
    /// A course code was chosen for the selected grading scale.
    CourseChosen,
    /// An examiner was chosen for the course.
    ExaminerChosen,
    /// The chosen course has no examiners configured.
    NoExaminerAvailable,
    /// Answers written back to Canvas; the wizard is done.
    Completed,
}

impl WizardState {
    /// The route that services this state, used to send a stray request back
    /// to the page it belongs on.
    pub fn page_path(&self) -> &'static str {
        match self {
            WizardState::Launched => "/getUserProgram",
            WizardState::ProgramKnown => "/getGeneralData",
            WizardState::GeneralInfoCollected => "/grading_scale",
            WizardState::CourseChosen => "/Examiner",
            WizardState::ExaminerChosen => "/Outcome",
            WizardState::NoExaminerAvailable => "/OutcomeNoExaminer",
            WizardState::Completed => "/Outcome",
        }
    }
}

/// Typed actions the pages can submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardAction {
    ProgramChosen(String),
    GeneralInfoSubmitted(GeneralInfo),
    CourseSelected(String),
    ExaminerSelected(String),
    NoExaminerFound,
    Finalized,
}

/// A transition was attempted from a state that does not accept it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("action not valid in state {state:?}; resume at {}", resume.page_path())]
pub struct WizardError {
    pub state: WizardState,
    /// State whose page the user should be sent back to.
    pub resume: WizardState,
}

/// Pure transition table. Returns the next state, or the error naming the
/// state to resume from.
pub fn transition(state: WizardState, action: &WizardAction) -> Result<WizardState, WizardError> {
    use WizardAction as A;
    use WizardState as S;
    match (state, action) {
        (S::Launched, A::ProgramChosen(_)) => Ok(S::ProgramKnown),
        (S::ProgramKnown, A::GeneralInfoSubmitted(_)) => Ok(S::GeneralInfoCollected),
        (S::GeneralInfoCollected, A::CourseSelected(_)) => Ok(S::CourseChosen),
        (S::CourseChosen, A::ExaminerSelected(_)) => Ok(S::ExaminerChosen),
        (S::CourseChosen, A::NoExaminerFound) => Ok(S::NoExaminerAvailable),
        (S::ExaminerChosen | S::NoExaminerAvailable, A::Finalized) => Ok(S::Completed),
        // Re-submitting the current page's form is allowed; anything else is
        // sent back to the page the current state belongs on.
        (s, _) => Err(WizardError { state: s, resume: s }),
    }
}

/// Wizard position plus the answers collected so far.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wizard {
    pub state: WizardState,
    pub answers: WizardAnswers,
}

impl Default for WizardState {
    fn default() -> Self {
        WizardState::Launched
    }
}

impl Wizard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply an action: advance the state and record the answer it carries.
    pub fn apply(&mut self, action: WizardAction) -> Result<WizardState, WizardError> {
        let next = transition(self.state, &action)?;
        match action {
            WizardAction::ProgramChosen(code) => self.answers.program_code = Some(code),
            WizardAction::GeneralInfoSubmitted(info) => self.answers.general = Some(info),
            WizardAction::CourseSelected(course) => self.answers.selected_course = Some(course),
            WizardAction::ExaminerSelected(examiner) => {
                self.answers.selected_examiner = Some(examiner)
            }
            WizardAction::NoExaminerFound | WizardAction::Finalized => {}
        }
        self.state = next;
        Ok(next)
    }

    /// The grading scale in effect: the submitted one, forced to A-F for
    /// programs that only admit graded projects.
    pub fn grading_scale(&self) -> GradingScale {
        if self.answers.program_code.as_deref() == Some("TIVNM") {
            return GradingScale::AF;
        }
        self.answers
            .general
            .as_ref()
            .and_then(|g| g.grading_scale)
            .unwrap_or(GradingScale::AF)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn general_info() -> GeneralInfo {
        GeneralInfo {
            diva_permission: "yes_to_diva".to_string(),
            tentative_title: "A Study".to_string(),
            prelim_description: "Of things".to_string(),
            grading_scale: Some(GradingScale::PF),
            ..GeneralInfo::default()
        }
    }

    #[test]
    fn ordered_walk_reaches_completed() {
        let mut wizard = Wizard::new();
        wizard.apply(WizardAction::ProgramChosen("CINTE".to_string())).unwrap();
        wizard.apply(WizardAction::GeneralInfoSubmitted(general_info())).unwrap();
        wizard.apply(WizardAction::CourseSelected("II225X".to_string())).unwrap();
        wizard.apply(WizardAction::ExaminerSelected("Jane Doe".to_string())).unwrap();
        assert_eq!(wizard.apply(WizardAction::Finalized).unwrap(), WizardState::Completed);

        assert_eq!(wizard.answers.program_code.as_deref(), Some("CINTE"));
        assert_eq!(wizard.answers.selected_course.as_deref(), Some("II225X"));
        assert_eq!(wizard.answers.selected_examiner.as_deref(), Some("Jane Doe"));
    }

    #[test]
    fn no_examiner_branch_also_completes() {
        let mut wizard = Wizard::new();
        wizard.apply(WizardAction::ProgramChosen("CDATE".to_string())).unwrap();
        wizard.apply(WizardAction::GeneralInfoSubmitted(general_info())).unwrap();
        wizard.apply(WizardAction::CourseSelected("DA231X".to_string())).unwrap();
        assert_eq!(
            wizard.apply(WizardAction::NoExaminerFound).unwrap(),
            WizardState::NoExaminerAvailable
        );
        assert_eq!(wizard.apply(WizardAction::Finalized).unwrap(), WizardState::Completed);
        assert_eq!(wizard.answers.selected_examiner, None);
    }

    #[test]
    fn out_of_order_action_names_the_resume_page() {
        let mut wizard = Wizard::new();
        let err = wizard
            .apply(WizardAction::CourseSelected("II225X".to_string()))
            .unwrap_err();
        assert_eq!(err.resume, WizardState::Launched);
        assert_eq!(err.resume.page_path(), "/getUserProgram");
        // The failed action must not have advanced the state.
        assert_eq!(wizard.state, WizardState::Launched);
    }

    #[test]
    fn tivnm_is_always_graded() {
        let mut wizard = Wizard::new();
        wizard.apply(WizardAction::ProgramChosen("TIVNM".to_string())).unwrap();
        let mut info = general_info();
        info.grading_scale = Some(GradingScale::PF);
        wizard.apply(WizardAction::GeneralInfoSubmitted(info)).unwrap();
        assert_eq!(wizard.grading_scale(), GradingScale::AF);
    }

    #[test]
    fn place_string_joins_nonempty_fields() {
        let info = GeneralInfo {
            company: "ACME AB".to_string(),
            country_code: "SE".to_string(),
            ..GeneralInfo::default()
        };
        assert_eq!(
            info.place_string().unwrap(),
            "company = ACME AB, country_code = SE"
        );
        assert_eq!(GeneralInfo::default().place_string(), None);
    }
}
