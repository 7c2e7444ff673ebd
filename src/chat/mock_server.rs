//! Stub inference endpoint
//!
//! Answers every `POST /chat` with a canned reply so the assistant can be
//! exercised without the real recommendation service.

use super::types::{ChatRequest, ChatResponse};
use crate::course::CourseId;
use axum::{extract::State, routing::post, Json, Router};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// Fixed reply served by the stub
#[derive(Debug, Clone)]
pub struct CannedReply {
    pub response: String,
    pub ranked_course_ids: Vec<CourseId>,
}

impl Default for CannedReply {
    fn default() -> Self {
        Self {
            response: "根據你的喜好與查詢，我推薦你一些有關AI的課程，希望對你有幫助！包括: 機器學習、人工智慧導論、資料探勘與應用、自然語言處理".to_string(),
            ranked_course_ids: ["AI50001", "AI10001", "AI50003", "AI50004"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

/// Router serving the stub `/chat` endpoint
pub fn router(reply: CannedReply) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/chat", post(chat))
        .with_state(Arc::new(reply))
        .layer(cors)
}

async fn chat(
    State(reply): State<Arc<CannedReply>>,
    Json(request): Json<ChatRequest>,
) -> Json<ChatResponse> {
    tracing::debug!(
        semesters = %request.semesters,
        selected = ?request.current_selected_course_id,
        messages = request.messages.len(),
        "Received chat request"
    );
    for message in &request.messages {
        tracing::debug!(role = message.role.as_str(), content = %message.content, "Chat message");
    }

    Json(ChatResponse {
        response: reply.response.clone(),
        ranked_course_ids: reply.ranked_course_ids.clone(),
    })
}
