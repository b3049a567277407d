//! Response extractor: turns raw model text into structured JSON.
//!
//! Generative APIs wrap JSON in markdown fences even when told not to, and cut
//! long responses off at the output-token ceiling. `extract` handles the
//! former; `extract_with_repair` additionally attempts a single truncation
//! repair (see `repair`). Neither ever evaluates the text.

pub mod repair;

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

pub use repair::RepairStrategy;

const FENCE: &str = "```";

#[derive(Debug, Error)]
pub enum GenerationParseError {
    #[error("model output is not valid JSON: {source}")]
    InvalidJson {
        raw: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("model output is a JSON {found}, expected an object")]
    NotAnObject { raw: String, found: &'static str },
}

impl GenerationParseError {
    /// The unmodified model output, kept for diagnostic logging.
    pub fn raw(&self) -> &str {
        match self {
            GenerationParseError::InvalidJson { raw, .. }
            | GenerationParseError::NotAnObject { raw, .. } => raw,
        }
    }
}

/// Strips a leading ```` ```lang ```` line and a trailing ```` ``` ```` from model output.
///
/// The opening fence is removed up to and including the first line break,
/// whatever the language tag. The trailing fence is only looked for when the
/// text opened with one.
pub fn strip_fences(text: &str) -> &str {
    let mut cleaned = text.trim();

    if cleaned.starts_with(FENCE) {
        if let Some(newline) = cleaned.find('\n') {
            cleaned = &cleaned[newline + 1..];
        }
        if let Some(stripped) = cleaned.strip_suffix(FENCE) {
            cleaned = stripped;
        }
    }

    cleaned.trim()
}

/// Strict extraction: fence stripping followed by a single parse.
pub fn extract(text: &str) -> Result<Value, GenerationParseError> {
    serde_json::from_str(strip_fences(text)).map_err(|source| GenerationParseError::InvalidJson {
        raw: text.to_string(),
        source,
    })
}

/// Extraction with one truncation-repair attempt when the strict parse fails.
///
/// Repair only runs when the text has more opening than closing braces or
/// brackets. Otherwise the original parse error is returned untouched.
pub fn extract_with_repair(
    text: &str,
    strategy: RepairStrategy,
) -> Result<Value, GenerationParseError> {
    let parse_error = match extract(text) {
        Ok(value) => return Ok(value),
        Err(e) => e,
    };

    warn!(
        ?strategy,
        response_len = text.len(),
        "Strict JSON parse failed, attempting truncation repair"
    );

    let Some(repaired) = repair::repair_truncated(text, strategy) else {
        debug!("No unclosed structures found, skipping repair");
        return Err(parse_error);
    };

    serde_json::from_str(&repaired).map_err(|source| GenerationParseError::InvalidJson {
        raw: text.to_string(),
        source,
    })
}

/// Unwraps a top-level JSON object; anything else is a parse failure.
pub fn into_object(value: Value, raw: &str) -> Result<Map<String, Value>, GenerationParseError> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(GenerationParseError::NotAnObject {
            raw: raw.to_string(),
            found: json_type_name(&other),
        }),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
