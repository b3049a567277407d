//! Read.ai meeting-notes integration.
//!
//! The API key is supplied per request by the user and never stored.
//! Anything short of an explicit auth rejection degrades gracefully:
//! `connect` reports an unverified connection and `meetings` falls back to
//! a canned list tagged `source: "mock"`.

use std::time::Duration;

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::state::AppState;

/// Shortest key we bother sending upstream.
pub const MIN_API_KEY_CHARS: usize = 20;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const MEETINGS_PAGE_SIZE: u32 = 10;

#[derive(Debug, Error)]
pub enum ReadAiError {
    #[error("Read.ai API key must be at least 20 characters (got {0})")]
    InvalidKey(usize),

    #[error("Read.ai rejected the API key (HTTP {0})")]
    Unauthorized(u16),

    #[error("HTTP request to Read.ai failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Read.ai returned error {status}: {message}")]
    Api { status: u16, message: String },
}

#[derive(Clone)]
pub struct ReadAiClient {
    client: Client,
    base_url: String,
}

impl ReadAiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ReadAiError> {
        Ok(Self {
            client: Client::builder().timeout(REQUEST_TIMEOUT).build()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Cheapest authenticated call: one meeting.
    pub async fn verify(&self, api_key: &str) -> Result<(), ReadAiError> {
        self.get_meetings(api_key, 1).await.map(|_| ())
    }

    pub async fn meetings(&self, api_key: &str) -> Result<Vec<Value>, ReadAiError> {
        let body = self.get_meetings(api_key, MEETINGS_PAGE_SIZE).await?;
        Ok(meeting_list(body))
    }

    async fn get_meetings(&self, api_key: &str, limit: u32) -> Result<Value, ReadAiError> {
        let response = self
            .client
            .get(format!("{}/meetings", self.base_url))
            .bearer_auth(api_key)
            .query(&[("limit", limit)])
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ReadAiError::Unauthorized(status.as_u16()));
        }
        if !status.is_success() {
            return Err(ReadAiError::Api {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        Ok(response.json().await?)
    }
}

/// Trims the key and checks its length.
pub fn validate_key(api_key: &str) -> Result<&str, ReadAiError> {
    let key = api_key.trim();
    let chars = key.chars().count();
    if chars < MIN_API_KEY_CHARS {
        return Err(ReadAiError::InvalidKey(chars));
    }
    Ok(key)
}

/// The list may be the body itself or sit under `meetings` / `data`.
fn meeting_list(body: Value) -> Vec<Value> {
    match body {
        Value::Array(items) => items,
        Value::Object(mut fields) => ["meetings", "data"]
            .iter()
            .find_map(|key| match fields.remove(*key) {
                Some(Value::Array(items)) => Some(items),
                _ => None,
            })
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}

/// Sample meetings shown when Read.ai cannot be reached.
pub fn mock_meetings() -> Vec<Value> {
    vec![
        json!({
            "id": "mock-1",
            "title": "Mentor session: portfolio review",
            "date": "2025-01-14T16:00:00Z",
            "durationMinutes": 45,
            "summary": "Walked through the SQL dashboard project and how to present it.",
            "notes": "Mentor suggested adding a README with the business question up front. \
                      Next step: publish the dashboard and share the link before the next session."
        }),
        json!({
            "id": "mock-2",
            "title": "Informational interview: analytics team",
            "date": "2025-01-09T18:30:00Z",
            "durationMinutes": 30,
            "summary": "Learned how the team scopes analysis requests.",
            "notes": "They value clear written summaries over complex models. \
                      Suggested practicing with public datasets and writing one-page findings."
        }),
    ]
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReadAiRequest {
    pub api_key: String,
}

#[derive(Debug, Serialize)]
pub struct ConnectResponse {
    pub connected: bool,
    pub verified: bool,
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct MeetingsResponse {
    pub meetings: Vec<Value>,
    pub source: &'static str,
}

/// POST /api/readai/connect
pub async fn handle_connect(
    State(state): State<AppState>,
    payload: Result<Json<ReadAiRequest>, JsonRejection>,
) -> Result<Json<ConnectResponse>, AppError> {
    let Json(request) = payload?;
    let api_key = validate_key(&request.api_key)?;

    match state.readai.verify(api_key).await {
        Ok(()) => {
            info!("Read.ai key verified");
            Ok(Json(ConnectResponse {
                connected: true,
                verified: true,
                status: "connected",
            }))
        }
        Err(e @ ReadAiError::Unauthorized(_)) => Err(e.into()),
        Err(e) => {
            warn!("Could not verify Read.ai key: {e}");
            Ok(Json(ConnectResponse {
                connected: true,
                verified: false,
                status: "unverified",
            }))
        }
    }
}

/// POST /api/readai/meetings
pub async fn handle_meetings(
    State(state): State<AppState>,
    payload: Result<Json<ReadAiRequest>, JsonRejection>,
) -> Result<Json<MeetingsResponse>, AppError> {
    let Json(request) = payload?;
    let api_key = validate_key(&request.api_key)?;

    match state.readai.meetings(api_key).await {
        Ok(meetings) => Ok(Json(MeetingsResponse {
            meetings,
            source: "readai",
        })),
        Err(e @ ReadAiError::Unauthorized(_)) => Err(e.into()),
        Err(e) => {
            warn!("Read.ai unavailable, serving sample meetings: {e}");
            Ok(Json(MeetingsResponse {
                meetings: mock_meetings(),
                source: "mock",
            }))
        }
    }
}
