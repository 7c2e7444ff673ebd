//! Transport to the course assistant inference endpoint
//!
//! A single `POST <base>/chat` per user turn. No retry, no caching.

mod error;
mod http;
pub mod mock_server;
mod types;

pub use error::{TransportError, TransportErrorKind};
pub use http::HttpChatClient;
pub use types::{ChatRequest, ChatResponse};

use async_trait::async_trait;
use std::sync::Arc;

/// Sends one chat exchange to the assistant
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Send the request and wait for the assistant's reply
    async fn send(&self, request: &ChatRequest) -> Result<ChatResponse, TransportError>;

    /// Endpoint the transport talks to (for diagnostics)
    fn endpoint(&self) -> &str;
}

#[async_trait]
impl<T: ChatTransport + ?Sized> ChatTransport for Arc<T> {
    async fn send(&self, request: &ChatRequest) -> Result<ChatResponse, TransportError> {
        (**self).send(request).await
    }

    fn endpoint(&self) -> &str {
        (**self).endpoint()
    }
}

/// Logging wrapper: records every exchange outcome, then hands it back unchanged
pub struct LoggingTransport<T> {
    inner: T,
}

impl<T: ChatTransport> LoggingTransport<T> {
    pub fn new(inner: T) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<T: ChatTransport> ChatTransport for LoggingTransport<T> {
    async fn send(&self, request: &ChatRequest) -> Result<ChatResponse, TransportError> {
        let start = std::time::Instant::now();
        let result = self.inner.send(request).await;
        let duration = start.elapsed();

        match &result {
            Ok(response) => {
                tracing::info!(
                    endpoint = %self.inner.endpoint(),
                    duration_ms = %duration.as_millis(),
                    messages = request.messages.len(),
                    ranked = response.ranked_course_ids.len(),
                    "Chat request completed"
                );
            }
            Err(e) => {
                tracing::error!(
                    endpoint = %self.inner.endpoint(),
                    duration_ms = %duration.as_millis(),
                    messages = request.messages.len(),
                    semesters = %request.semesters,
                    kind = e.kind.as_str(),
                    status = ?e.status,
                    error = %e,
                    "Chat request failed"
                );
            }
        }

        result
    }

    fn endpoint(&self) -> &str {
        self.inner.endpoint()
    }
}
