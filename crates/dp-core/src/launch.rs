//! Immutable launch context captured when an LTI launch is verified.

use serde::{Deserialize, Serialize};

/// The allow-listed launch parameters a verified LTI launch contributes to a
/// session. Created once at launch verification; read-only afterward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchContext {
    /// Canvas course the tool was launched from (`custom_canvas_course_id`).
    pub course_id: u64,
    /// Canvas user taking the tool (`custom_canvas_user_id`).
    pub user_id: u64,
    /// SIS identifier of the user (`lis_person_sourcedid`).
    pub sis_id: String,
    /// Full name, blank if the tool was not configured to receive it.
    pub full_name: Option<String>,
    /// Primary contact email, blank under the same condition.
    pub email: Option<String>,
    /// Role claims from `roles`/`ext_roles`, comma-split.
    pub roles: Vec<String>,
    /// Outcome service URL — present only on assignment launches.
    pub outcome_service_url: String,
    /// Result sourcedid paired with the outcome service.
    pub result_sourcedid: String,
}

impl LaunchContext {
    /// True when any role claim marks the caller as instructor-level staff.
    pub fn is_instructor(&self) -> bool {
        self.roles.iter().any(|r| {
            r.ends_with("Instructor") || r.ends_with("TeachingAssistant") || r.ends_with("Administrator")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context_with_roles(roles: &[&str]) -> LaunchContext {
        LaunchContext {
            course_id: 5,
            user_id: 1,
            sis_id: "u1abc123".to_string(),
            full_name: Some("Jane Doe".to_string()),
            email: None,
            roles: roles.iter().map(|r| r.to_string()).collect(),
            outcome_service_url: "https://canvas.example.com/outcome".to_string(),
            result_sourcedid: "sourced-1".to_string(),
        }
    }

    #[test]
    fn urn_style_instructor_role_is_recognized() {
        let ctx = context_with_roles(&["urn:lti:role:ims/lis/Instructor"]);
        assert!(ctx.is_instructor());
    }

    #[test]
    fn learner_is_not_instructor() {
        let ctx = context_with_roles(&["Learner"]);
        assert!(!ctx.is_instructor());
    }
}
