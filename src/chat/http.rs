//! reqwest-backed chat transport

use super::{ChatRequest, ChatResponse, ChatTransport, TransportError};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};

/// HTTP client for `POST <base>/chat`
pub struct HttpChatClient {
    client: Client,
    endpoint: String,
}

impl HttpChatClient {
    /// Build a client with reqwest's default transport settings
    pub fn new(base_url: &str) -> Result<Self, TransportError> {
        let client = Client::builder().build().map_err(|e| {
            TransportError::network(format!("Failed to create HTTP client: {e}")).with_source(e)
        })?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            endpoint: format!("{}/chat", base_url.trim_end_matches('/')),
        }
    }

    fn classify_error(status: StatusCode, body: &str) -> TransportError {
        let err = match status.as_u16() {
            400..=499 => TransportError::client_error(format!("Chat request rejected: {body}")),
            500..=599 => TransportError::server_error(format!("Chat server error: {body}")),
            _ => TransportError::network(format!("Unexpected HTTP {status}: {body}")),
        };
        err.with_status(status.as_u16())
    }
}

#[async_trait]
impl ChatTransport for HttpChatClient {
    async fn send(&self, request: &ChatRequest) -> Result<ChatResponse, TransportError> {
        if request.messages.is_empty() {
            return Err(TransportError::invalid_request(
                "Chat request must carry at least one message",
            ));
        }

        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(TransportError::from_reqwest)?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            TransportError::network(format!("Failed to read chat response: {e}")).with_source(e)
        })?;

        if !status.is_success() {
            return Err(Self::classify_error(status, &body));
        }

        serde_json::from_str(&body).map_err(|e| {
            TransportError::decode(format!("Failed to parse chat response: {e} - body: {body}"))
                .with_source(e)
        })
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}
