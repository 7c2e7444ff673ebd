//! Course Assistant server
//!
//! Serves the chat bridge for the course-selection page and relays each
//! turn to the configured assistant endpoint.

use course_assistant::api::{create_router, AppState};
use course_assistant::chat::{HttpChatClient, LoggingTransport};
use course_assistant::config::AssistantConfig;
use course_assistant::runtime::Assistant;
use course_assistant::store::{InMemoryKvStore, KvStore, SqliteKvStore, TranscriptStore};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "course_assistant=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    let config = AssistantConfig::from_env();

    // Storage
    let kv: Arc<dyn KvStore> = if config.uses_memory_store() {
        tracing::warn!("Using in-memory storage; the transcript will not survive a restart");
        Arc::new(InMemoryKvStore::new())
    } else {
        if let Some(parent) = PathBuf::from(&config.db_path).parent() {
            std::fs::create_dir_all(parent)?;
        }
        tracing::info!(path = %config.db_path, "Opening database");
        Arc::new(SqliteKvStore::open(&config.db_path)?)
    };
    let store = TranscriptStore::new(kv, &config.namespace);

    // Transport
    let transport = LoggingTransport::new(HttpChatClient::new(&config.api_url)?);
    tracing::info!(api_url = %config.api_url, "Assistant endpoint configured");

    let assistant = Assistant::start(store, transport).await;

    // Create router
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = create_router(AppState::new(assistant))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Course assistant listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
