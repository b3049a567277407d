//! Prompt dispatcher: sends one prompt and returns a normalized JSON object.
//!
//! Flow: system prompt + user prompt → TextCompletion → extract (with repair
//! for kinds that allow it) → top-level object check → per-kind normalization.
//! Exactly one upstream call per invocation; nothing is retried.

use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::errors::AppError;
use crate::extraction::{self, RepairStrategy};
use crate::generation::kinds::{normalize, ResponseKind};
use crate::llm_client::prompts::SYSTEM_PROMPT;
use crate::llm_client::{CompletionRequest, TextCompletion};

pub async fn generate_structured(
    llm: &dyn TextCompletion,
    kind: ResponseKind,
    prompt: &str,
    label: Option<&str>,
    repair: RepairStrategy,
) -> Result<Map<String, Value>, AppError> {
    info!(
        "Generating {} (prompt_chars={}, max_tokens={})",
        kind.noun(),
        prompt.len(),
        kind.max_tokens()
    );

    let raw = llm
        .complete(CompletionRequest {
            system: SYSTEM_PROMPT,
            prompt,
            max_tokens: kind.max_tokens(),
        })
        .await
        .map_err(|source| AppError::Upstream {
            what: kind.noun(),
            source,
        })?;

    debug!("{} response length: {}", kind.noun(), raw.len());

    let mut object = if kind.allows_repair() {
        extraction::extract_with_repair(&raw, repair)
    } else {
        extraction::extract(&raw)
    }
    .and_then(|value| extraction::into_object(value, &raw))
    .map_err(|source| AppError::GenerationParse {
        what: kind.noun(),
        source,
    })?;

    normalize(kind, &mut object, label);
    Ok(object)
}
