mod config;
mod errors;
mod extraction;
mod generation;
mod integrations;
mod llm_client;
mod meetings;
mod models;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::integrations::readai::ReadAiClient;
use crate::llm_client::LlmClient;
use crate::meetings::documents::StandardDocumentExtractor;
use crate::meetings::history::InMemoryMeetingRepository;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Cago API v{}", env!("CARGO_PKG_VERSION"));

    let llm = LlmClient::new(config.anthropic_api_key.clone(), config.llm_timeout)?;
    info!(
        "LLM client initialized (model: {}, timeout: {:?})",
        llm_client::MODEL,
        config.llm_timeout
    );
    info!("JSON repair strategy: {:?}", config.repair_strategy);

    let meetings = InMemoryMeetingRepository::new(config.meeting_history_limit);
    info!(
        "Meeting history: in-memory, keeping {} meetings",
        config.meeting_history_limit
    );

    let readai = ReadAiClient::new(config.readai_api_url.clone())?;

    let state = AppState {
        llm: Arc::new(llm),
        documents: Arc::new(StandardDocumentExtractor),
        meetings: Arc::new(meetings),
        readai,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
