//! Launch-parameter extraction after signature verification.

use dp_core::LaunchContext;
use tracing::debug;

use crate::{LtiError, LtiResult};

fn param<'a>(params: &'a [(String, String)], name: &str) -> Option<&'a str> {
    params.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str())
}

fn nonempty(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}

/// Copy the allow-listed launch parameters into a [`LaunchContext`].
///
/// Only assignment launches are accepted: those are the launches that carry
/// the outcome service, and they are the only ones Canvas shows in the
/// gradebook. Name and email may be blank if the tool was not configured to
/// receive private information.
pub fn extract_launch(params: &[(String, String)]) -> LtiResult<LaunchContext> {
    let outcome_service_url = nonempty(param(params, "lis_outcome_service_url"))
        .ok_or(LtiError::NotAssignmentLaunch)?;
    let result_sourcedid =
        nonempty(param(params, "lis_result_sourcedid")).ok_or(LtiError::NotAssignmentLaunch)?;

    let course_id = param(params, "custom_canvas_course_id")
        .and_then(|v| v.parse().ok())
        .ok_or(LtiError::MissingParameter("custom_canvas_course_id"))?;
    let user_id = param(params, "custom_canvas_user_id")
        .and_then(|v| v.parse().ok())
        .ok_or(LtiError::MissingParameter("custom_canvas_user_id"))?;

    let mut roles: Vec<String> = Vec::new();
    for key in ["roles", "ext_roles"] {
        if let Some(claim) = param(params, key) {
            roles.extend(
                claim.split(',').map(str::trim).filter(|r| !r.is_empty()).map(str::to_string),
            );
        }
    }

    let context = LaunchContext {
        course_id,
        user_id,
        sis_id: nonempty(param(params, "lis_person_sourcedid")).unwrap_or_default(),
        full_name: nonempty(param(params, "lis_person_name_full")),
        email: nonempty(param(params, "lis_person_contact_email_primary")),
        roles,
        outcome_service_url,
        result_sourcedid,
    };
    debug!(course = context.course_id, user = context.user_id, "launch context extracted");
    Ok(context)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assignment_launch() -> Vec<(String, String)> {
        [
            ("lis_outcome_service_url", "https://canvas.example.com/outcome"),
            ("lis_result_sourcedid", "sourced-1"),
            ("lis_person_name_full", "Jane Doe"),
            ("lis_person_contact_email_primary", "jane@example.com"),
            ("lis_person_sourcedid", "u1abc123"),
            ("custom_canvas_course_id", "5"),
            ("custom_canvas_user_id", "1"),
            ("roles", "Learner"),
            ("ext_roles", "urn:lti:role:ims/lis/Learner"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    #[test]
    fn assignment_launch_extracts_all_fields() {
        let context = extract_launch(&assignment_launch()).unwrap();
        assert_eq!(context.course_id, 5);
        assert_eq!(context.user_id, 1);
        assert_eq!(context.sis_id, "u1abc123");
        assert_eq!(context.full_name.as_deref(), Some("Jane Doe"));
        assert_eq!(context.roles.len(), 2);
    }

    #[test]
    fn launch_without_outcome_service_is_rejected() {
        let params: Vec<(String, String)> = assignment_launch()
            .into_iter()
            .filter(|(k, _)| k != "lis_outcome_service_url")
            .collect();
        assert!(matches!(extract_launch(&params), Err(LtiError::NotAssignmentLaunch)));
    }

    #[test]
    fn non_numeric_course_id_is_rejected() {
        let mut params = assignment_launch();
        for (k, v) in &mut params {
            if k == "custom_canvas_course_id" {
                *v = "not-a-number".to_string();
            }
        }
        assert!(matches!(
            extract_launch(&params),
            Err(LtiError::MissingParameter("custom_canvas_course_id"))
        ));
    }

    #[test]
    fn blank_name_becomes_none() {
        let mut params = assignment_launch();
        for (k, v) in &mut params {
            if k == "lis_person_name_full" {
                *v = "  ".to_string();
            }
        }
        let context = extract_launch(&params).unwrap();
        assert_eq!(context.full_name, None);
    }
}
