pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, patch, post},
    Router,
};

use crate::generation::handlers as coaching;
use crate::integrations::readai;
use crate::meetings::{handlers as meetings, webhook};
use crate::state::AppState;

/// Request body ceiling. Sized for uploaded meeting documents.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health::health_handler))
        // Coaching flow
        .route("/api/assessment", post(coaching::handle_assessment))
        .route("/api/mentor", post(coaching::handle_mentor))
        .route("/api/plan", post(coaching::handle_plan))
        // Meetings
        .route("/api/meeting/extract", post(meetings::handle_extract))
        .route(
            "/api/meeting/extract-file",
            post(meetings::handle_extract_file),
        )
        .route("/api/meeting/followups", post(meetings::handle_followups))
        .route("/api/meeting/history", get(meetings::handle_history))
        .route("/api/meeting/reminders", get(meetings::handle_reminders))
        .route(
            "/api/meeting/:id/action-items/:index",
            patch(meetings::handle_toggle_action_item),
        )
        // Integrations
        .route("/api/webhook/meeting", post(webhook::handle_meeting_webhook))
        .route("/api/readai/connect", post(readai::handle_connect))
        .route("/api/readai/meetings", post(readai::handle_meetings))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}
