//! Axum route handlers for the meeting endpoints.

use std::sync::Arc;

use axum::{
    extract::{
        multipart::MultipartRejection,
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Multipart, Path, Query, State,
    },
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tokio::task::JoinError;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::generation::dispatcher::generate_structured;
use crate::generation::kinds::ResponseKind;
use crate::meetings::documents::{detect_kind, infer_title, DocumentError, DocumentKind};
use crate::meetings::history::{upcoming_reminders, Reminder, MAX_REMINDERS};
use crate::meetings::prompts::{FOLLOWUPS_PROMPT_TEMPLATE, MEETING_EXTRACT_PROMPT_TEMPLATE};
use crate::models::meeting::{ActionItem, MeetingRecord, DEFAULT_MEETING_TITLE};
use crate::state::AppState;

/// Meetings sent to the follow-up prompt when the caller sends none.
const FOLLOWUP_HISTORY_SIZE: usize = 5;
const DEFAULT_HISTORY_LIMIT: usize = 10;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MeetingExtractRequest {
    pub title: Option<String>,
    pub notes: String,
}

#[derive(Debug, Serialize)]
pub struct ExtractFileResponse {
    pub text: String,
    pub title: String,
    pub filename: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FollowUpsRequest {
    pub recent_meetings: Option<Vec<Value>>,
    pub current_meeting: Option<Value>,
    pub user_context: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub meetings: Vec<MeetingRecord>,
}

#[derive(Debug, Serialize)]
pub struct RemindersResponse {
    pub reminders: Vec<Reminder>,
}

#[derive(Debug, Deserialize)]
pub struct ActionItemToggle {
    pub completed: bool,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/meeting/extract
pub async fn handle_extract(
    State(state): State<AppState>,
    payload: Result<Json<MeetingExtractRequest>, JsonRejection>,
) -> Result<Json<Map<String, Value>>, AppError> {
    let Json(request) = payload?;
    let title = meeting_title(request.title.as_deref());
    let result = extract_and_record(&state, &title, &request.notes, "manual").await?;
    Ok(Json(result))
}

/// POST /api/meeting/extract-file
///
/// Returns the extracted text for review; nothing is generated here.
pub async fn handle_extract_file(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ExtractFileResponse>, AppError> {
    let mut multipart = multipart?;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().map(str::to_string);
        let kind = detect_kind(field.content_type(), filename.as_deref())?;
        let bytes = field.bytes().await?;
        if bytes.is_empty() {
            return Err(DocumentError::Empty.into());
        }

        info!(
            "Extracting text from upload {:?} ({kind:?}, {} bytes)",
            filename,
            bytes.len()
        );

        let extractor = Arc::clone(&state.documents);
        let text = tokio::task::spawn_blocking(move || extractor.extract_text(kind, &bytes))
            .await
            .map_err(|e| extraction_aborted(kind, e))??;

        let title = infer_title(&text, filename.as_deref())
            .unwrap_or_else(|| DEFAULT_MEETING_TITLE.to_string());

        return Ok(Json(ExtractFileResponse {
            text,
            title,
            filename,
        }));
    }

    Err(AppError::Validation("No file uploaded".to_string()))
}

/// POST /api/meeting/followups
pub async fn handle_followups(
    State(state): State<AppState>,
    payload: Result<Json<FollowUpsRequest>, JsonRejection>,
) -> Result<Json<Map<String, Value>>, AppError> {
    let Json(request) = payload?;

    let current_meeting = match request.current_meeting {
        Some(meeting @ Value::Object(_)) => meeting,
        _ => {
            return Err(AppError::Validation(
                "currentMeeting is required".to_string(),
            ))
        }
    };

    let recent_meetings = match request.recent_meetings {
        Some(meetings) => meetings.into_iter().take(FOLLOWUP_HISTORY_SIZE).collect(),
        None => state
            .meetings
            .recent(FOLLOWUP_HISTORY_SIZE)
            .await
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()
            .map_err(anyhow::Error::from)?,
    };

    let user_context = match request.user_context {
        Some(context) if !context.is_null() => pretty(&context)?,
        _ => "Not provided".to_string(),
    };

    let prompt = FOLLOWUPS_PROMPT_TEMPLATE
        .replace("{recent_meetings}", &pretty(&Value::Array(recent_meetings))?)
        .replace("{current_meeting}", &pretty(&current_meeting)?)
        .replace("{user_context}", &user_context);

    let result = generate_structured(
        state.llm.as_ref(),
        ResponseKind::FollowUps,
        &prompt,
        None,
        state.config.repair_strategy,
    )
    .await?;

    Ok(Json(result))
}

/// GET /api/meeting/history
pub async fn handle_history(
    State(state): State<AppState>,
    query: Result<Query<HistoryQuery>, QueryRejection>,
) -> Result<Json<HistoryResponse>, AppError> {
    let Query(query) = query?;
    let limit = query.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
    Ok(Json(HistoryResponse {
        meetings: state.meetings.recent(limit).await,
    }))
}

/// GET /api/meeting/reminders
pub async fn handle_reminders(State(state): State<AppState>) -> Json<RemindersResponse> {
    let records = state.meetings.recent(usize::MAX).await;
    Json(RemindersResponse {
        reminders: upcoming_reminders(&records, MAX_REMINDERS),
    })
}

/// PATCH /api/meeting/:id/action-items/:index
pub async fn handle_toggle_action_item(
    State(state): State<AppState>,
    path: Result<Path<(Uuid, usize)>, PathRejection>,
    payload: Result<Json<ActionItemToggle>, JsonRejection>,
) -> Result<Json<ActionItem>, AppError> {
    let Path((meeting_id, index)) = path?;
    let Json(toggle) = payload?;

    let item = state
        .meetings
        .mark_complete(meeting_id, index, toggle.completed)
        .await?;
    Ok(Json(item))
}

// ────────────────────────────────────────────────────────────────────────────
// Shared pipeline
// ────────────────────────────────────────────────────────────────────────────

/// Runs the extraction prompt, stamps `title` and `meetingId`, and appends
/// the meeting to history. Blank notes are rejected before any generation.
pub(crate) async fn extract_and_record(
    state: &AppState,
    title: &str,
    notes: &str,
    source: &str,
) -> Result<Map<String, Value>, AppError> {
    let notes = notes.trim();
    if notes.is_empty() {
        return Err(AppError::Validation("notes cannot be empty".to_string()));
    }

    let prompt = MEETING_EXTRACT_PROMPT_TEMPLATE
        .replace("{title}", title)
        .replace("{notes}", notes);

    let mut result = generate_structured(
        state.llm.as_ref(),
        ResponseKind::MeetingExtraction,
        &prompt,
        Some(title),
        state.config.repair_strategy,
    )
    .await?;

    let record = MeetingRecord::from_extraction(title, &result, source);
    // Indices in the response must match the stored items the toggle addresses.
    result.insert(
        "actionItems".to_string(),
        serde_json::to_value(&record.action_items).map_err(anyhow::Error::from)?,
    );
    result.insert("meetingId".to_string(), json!(record.id));
    info!(
        "Recorded meeting {} from {source} ({} action items)",
        record.id,
        record.action_items.len()
    );
    state.meetings.append(record).await;

    Ok(result)
}

pub(crate) fn meeting_title(title: Option<&str>) -> String {
    title
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(DEFAULT_MEETING_TITLE)
        .to_string()
}

/// A parser panic becomes a 400 for that document kind; other join
/// failures stay internal.
fn extraction_aborted(kind: DocumentKind, err: JoinError) -> AppError {
    if !err.is_panic() {
        return AppError::Internal(err.into());
    }
    warn!("Document parser panicked on a {kind:?} upload");
    let reason = "the file appears to be corrupt".to_string();
    match kind {
        DocumentKind::Pdf => DocumentError::Pdf(reason).into(),
        DocumentKind::Docx => DocumentError::Docx(reason).into(),
        DocumentKind::PlainText => AppError::Internal(err.into()),
    }
}

fn pretty(value: &Value) -> Result<String, AppError> {
    serde_json::to_string_pretty(value).map_err(|e| AppError::Internal(e.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meeting_title_defaults() {
        assert_eq!(meeting_title(Some("  Weekly sync ")), "Weekly sync");
        assert_eq!(meeting_title(Some("   ")), DEFAULT_MEETING_TITLE);
        assert_eq!(meeting_title(None), DEFAULT_MEETING_TITLE);
    }

    #[test]
    fn test_followups_request_accepts_camel_case() {
        let request: FollowUpsRequest = serde_json::from_value(json!({
            "currentMeeting": {"summary": "Talked SQL"},
            "userContext": {"directionLabel": "Data"}
        }))
        .unwrap();
        assert!(request.recent_meetings.is_none());
        assert_eq!(request.current_meeting.unwrap()["summary"], "Talked SQL");
    }
}
