//! Axum route handlers for the coaching endpoints.

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde_json::{Map, Value};

use crate::errors::AppError;
use crate::generation::dispatcher::generate_structured;
use crate::generation::kinds::ResponseKind;
use crate::generation::prompts::{
    ASSESSMENT_PROMPT_TEMPLATE, MENTOR_PROMPT_TEMPLATE, PLAN_PROMPT_TEMPLATE,
};
use crate::models::coaching::CoachingRequest;
use crate::state::AppState;

/// POST /api/assessment
pub async fn handle_assessment(
    State(state): State<AppState>,
    payload: Result<Json<CoachingRequest>, JsonRejection>,
) -> Result<Json<Map<String, Value>>, AppError> {
    let Json(request) = payload?;
    coach(&state, ResponseKind::Assessment, ASSESSMENT_PROMPT_TEMPLATE, &request).await
}

/// POST /api/mentor
pub async fn handle_mentor(
    State(state): State<AppState>,
    payload: Result<Json<CoachingRequest>, JsonRejection>,
) -> Result<Json<Map<String, Value>>, AppError> {
    let Json(request) = payload?;
    coach(
        &state,
        ResponseKind::MentorRecommendation,
        MENTOR_PROMPT_TEMPLATE,
        &request,
    )
    .await
}

/// POST /api/plan
///
/// The plan is long enough to hit the token ceiling; a truncated response
/// goes through the configured repair strategy before it is rejected.
pub async fn handle_plan(
    State(state): State<AppState>,
    payload: Result<Json<CoachingRequest>, JsonRejection>,
) -> Result<Json<Map<String, Value>>, AppError> {
    let Json(request) = payload?;
    coach(&state, ResponseKind::ExecutionPlan, PLAN_PROMPT_TEMPLATE, &request).await
}

async fn coach(
    state: &AppState,
    kind: ResponseKind,
    template: &str,
    request: &CoachingRequest,
) -> Result<Json<Map<String, Value>>, AppError> {
    request.validate()?;

    let prompt = request.render(template);
    let result = generate_structured(
        state.llm.as_ref(),
        kind,
        &prompt,
        Some(request.direction_label.as_str()),
        state.config.repair_strategy,
    )
    .await?;

    Ok(Json(result))
}
