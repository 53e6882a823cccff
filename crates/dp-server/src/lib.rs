//! LTI web tools for administering degree-project courses in Canvas.
//!
//! One axum application hosts the student wizard (launch → program → survey →
//! course → examiner → write-back), the instructor announcement flow, and the
//! reference-data reload route.

pub mod announce;
pub mod error;
pub mod finalize;
pub mod pages;
pub mod state;
pub mod wizard;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

pub use error::AppError;
pub use state::{AppState, SESSION_COOKIE};

/// Build the application router.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/start", post(wizard::start))
        .route("/getUserProgram", get(wizard::get_user_program))
        .route("/gotUsersProgram", post(wizard::got_users_program))
        .route("/getGeneralData", get(wizard::get_general_data))
        .route("/assessment", post(wizard::assessment))
        .route("/grading_scale", get(wizard::grading_scale))
        .route("/grading_scale_AF", get(wizard::grading_scale_af))
        .route("/grading_scale_PF", get(wizard::grading_scale_pf))
        .route("/Examiner", post(wizard::examiner))
        .route("/Outcome", post(wizard::outcome).get(wizard::outcome_done))
        .route("/OutcomeNoExaminer", get(wizard::outcome_no_examiner))
        .route("/Reload", get(wizard::reload))
        .route("/announce", get(announce::announce_form).post(announce::announce))
        .with_state(state)
}
