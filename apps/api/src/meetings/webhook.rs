//! Inbound meeting webhook.
//!
//! Recorders and note-taking tools push very different payloads. We only
//! look for a handful of well-known fields and hand the text to the same
//! extraction pipeline as typed notes.

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde_json::{Map, Value};
use tracing::info;

use crate::errors::AppError;
use crate::meetings::handlers::{extract_and_record, meeting_title};
use crate::state::AppState;

const DEFAULT_SOURCE: &str = "webhook";

/// What we could pull out of a webhook payload.
#[derive(Debug, PartialEq)]
pub struct WebhookMeeting {
    pub title: String,
    pub notes: String,
    pub source: String,
}

impl WebhookMeeting {
    /// Notes come from `notes`, then `transcript`, then `content`.
    pub fn from_payload(payload: &Value) -> Result<Self, AppError> {
        let notes = non_empty_str(payload.get("notes"))
            .map(str::to_string)
            .or_else(|| payload.get("transcript").and_then(transcript_text))
            .or_else(|| non_empty_str(payload.get("content")).map(str::to_string))
            .ok_or_else(|| {
                AppError::Validation(
                    "Webhook payload has no notes, transcript or content".to_string(),
                )
            })?;

        let title = non_empty_str(payload.get("title"))
            .or_else(|| non_empty_str(payload.get("meeting_title")));

        Ok(WebhookMeeting {
            title: meeting_title(title),
            notes,
            source: non_empty_str(payload.get("source"))
                .unwrap_or(DEFAULT_SOURCE)
                .to_string(),
        })
    }
}

/// POST /api/webhook/meeting
///
/// Responds with the meeting extraction plus the `source` tag.
pub async fn handle_meeting_webhook(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Map<String, Value>>, AppError> {
    let Json(payload) = payload?;
    let meeting = WebhookMeeting::from_payload(&payload)?;
    info!(
        "Webhook meeting from {} ({} chars)",
        meeting.source,
        meeting.notes.len()
    );

    let mut result =
        extract_and_record(&state, &meeting.title, &meeting.notes, &meeting.source).await?;
    result.insert("source".to_string(), Value::String(meeting.source));
    Ok(Json(result))
}

/// A transcript is either plain text or a list of `{speaker, text}` segments.
fn transcript_text(transcript: &Value) -> Option<String> {
    match transcript {
        Value::String(text) if !text.trim().is_empty() => Some(text.clone()),
        Value::Array(segments) => {
            let lines: Vec<String> = segments.iter().filter_map(segment_line).collect();
            if lines.is_empty() {
                None
            } else {
                Some(lines.join("\n"))
            }
        }
        _ => None,
    }
}

fn segment_line(segment: &Value) -> Option<String> {
    match segment {
        Value::String(_) => non_empty_str(Some(segment)).map(str::to_string),
        Value::Object(fields) => {
            let text = non_empty_str(fields.get("text"))?;
            Some(match non_empty_str(fields.get("speaker")) {
                Some(speaker) => format!("{speaker}: {text}"),
                None => text.to_string(),
            })
        }
        _ => None,
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}
