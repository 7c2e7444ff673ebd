//! HTTP API for the hosting page
//!
//! Submit, clear, transcript snapshot and the SSE event stream, plus the
//! stateless rerank and schedule-totals helpers.

mod handlers;
mod sse;
mod types;

pub use handlers::create_router;
pub use types::*;

use crate::runtime::AssistantHandle;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub assistant: AssistantHandle,
}

impl AppState {
    pub fn new(assistant: AssistantHandle) -> Self {
        Self { assistant }
    }
}
