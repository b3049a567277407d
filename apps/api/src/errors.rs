use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::extraction::GenerationParseError;
use crate::integrations::readai::ReadAiError;
use crate::llm_client::LlmError;
use crate::meetings::documents::DocumentError;
use crate::meetings::history::HistoryError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Every variant renders as `{"error": "<message>"}`. Generation failures get
/// a generic message; the details only go to the log.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unsupported media: {0}")]
    UnsupportedMedia(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Upstream generation error ({what}): {source}")]
    Upstream {
        what: &'static str,
        #[source]
        source: LlmError,
    },

    #[error("Generation parse error ({what}): {source}")]
    GenerationParse {
        what: &'static str,
        #[source]
        source: GenerationParseError,
    },

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

// Extractor rejections render as validation errors carrying axum's message.
macro_rules! rejection_as_validation {
    ($($rejection:ty),+ $(,)?) => {
        $(
            impl From<$rejection> for AppError {
                fn from(rejection: $rejection) -> Self {
                    AppError::Validation(rejection.body_text())
                }
            }
        )+
    };
}

rejection_as_validation!(
    JsonRejection,
    QueryRejection,
    PathRejection,
    MultipartRejection,
    MultipartError,
);

impl From<DocumentError> for AppError {
    fn from(e: DocumentError) -> Self {
        match e {
            DocumentError::Unsupported(_) => AppError::UnsupportedMedia(e.to_string()),
            DocumentError::Pdf(_) | DocumentError::Docx(_) | DocumentError::Empty => {
                AppError::Validation(e.to_string())
            }
        }
    }
}

impl From<HistoryError> for AppError {
    fn from(e: HistoryError) -> Self {
        AppError::NotFound(e.to_string())
    }
}

impl From<ReadAiError> for AppError {
    fn from(e: ReadAiError) -> Self {
        match e {
            ReadAiError::InvalidKey(_) | ReadAiError::Unauthorized(_) => {
                AppError::Validation(e.to_string())
            }
            ReadAiError::Http(_) | ReadAiError::Api { .. } => AppError::Internal(e.into()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::UnsupportedMedia(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Upstream { what, source } => {
                tracing::error!("Upstream generation error ({what}): {source}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Failed to generate {what}"),
                )
            }
            AppError::GenerationParse { what, source } => {
                tracing::error!(
                    "Could not parse generated {what} ({} chars): {source}",
                    source.raw().len()
                );
                tracing::debug!("Unparseable model output: {}", source.raw());
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Failed to generate {what}"),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({ "error": message }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction;

    async fn render(error: AppError) -> (StatusCode, serde_json::Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_validation_is_400_with_message() {
        let (status, body) = render(AppError::Validation("notes cannot be empty".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "notes cannot be empty"}));
    }

    #[tokio::test]
    async fn test_parse_error_hides_raw_output() {
        let source = extraction::extract("secret model text").unwrap_err();
        let (status, body) = render(AppError::GenerationParse {
            what: "execution plan",
            source,
        })
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": "Failed to generate execution plan"}));
    }

    #[tokio::test]
    async fn test_upstream_error_is_generic() {
        let (status, body) = render(AppError::Upstream {
            what: "assessment",
            source: LlmError::EmptyContent,
        })
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to generate assessment");
    }

    #[tokio::test]
    async fn test_unsupported_document_is_400() {
        let (status, body) =
            render(DocumentError::Unsupported(".pptx".to_string()).into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains(".pptx"));
    }

    #[tokio::test]
    async fn test_missing_meeting_is_404() {
        let id = uuid::Uuid::new_v4();
        let (status, body) = render(HistoryError::MeetingNotFound(id).into()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], format!("Meeting {id} not found"));
    }

    #[tokio::test]
    async fn test_not_found_is_404() {
        let (status, _) = render(AppError::NotFound("Meeting not found".into())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
