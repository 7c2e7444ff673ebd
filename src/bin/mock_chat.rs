//! Stub assistant endpoint for local development
//!
//! Answers every `POST /chat` with the same AI-course recommendation.

use course_assistant::chat::mock_server::{router, CannedReply};
use course_assistant::config::mock_chat_port;
use std::net::SocketAddr;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "course_assistant=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let app = router(CannedReply::default()).layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([127, 0, 0, 1], mock_chat_port()));
    tracing::info!("Mock chat server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
