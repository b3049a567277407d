use std::sync::Arc;

use crate::config::Config;
use crate::integrations::readai::ReadAiClient;
use crate::llm_client::TextCompletion;
use crate::meetings::documents::DocumentTextExtractor;
use crate::meetings::history::MeetingRepository;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Generation backend. `LlmClient` in production, canned responses in tests.
    pub llm: Arc<dyn TextCompletion>,
    pub documents: Arc<dyn DocumentTextExtractor>,
    /// Rolling meeting history. In-memory by default.
    pub meetings: Arc<dyn MeetingRepository>,
    pub readai: ReadAiClient,
    pub config: Config,
}
