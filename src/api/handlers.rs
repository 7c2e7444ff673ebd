//! HTTP request handlers

use super::sse::sse_stream;
use super::types::{
    CoursesResponse, ErrorResponse, RerankRequest, SubmitRequest, SubmitResponse,
    SuccessResponse, TotalsRequest, TranscriptResponse,
};
use super::AppState;
use crate::rerank::rerank;
use crate::runtime::RuntimeError;
use crate::schedule::{total_credits_and_hours, ScheduleTotals};
use crate::state_machine::ExchangeContext;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Conversation
        .route("/api/transcript", get(get_transcript))
        .route("/api/chat", post(send_chat))
        .route("/api/clear", post(clear_transcript))
        .route("/api/events", get(stream_events))
        // Course list helpers
        .route("/api/rerank", post(rerank_courses))
        .route("/api/schedule/totals", post(schedule_totals))
        // Version
        .route("/version", get(get_version))
        .with_state(state)
}

// ============================================================
// Conversation
// ============================================================

async fn get_transcript(State(state): State<AppState>) -> Json<TranscriptResponse> {
    let snapshot = state.assistant.snapshot();
    Json(TranscriptResponse {
        messages: snapshot.transcript.messages().to_vec(),
        busy: snapshot.busy,
    })
}

async fn send_chat(
    State(state): State<AppState>,
    Json(req): Json<SubmitRequest>,
) -> Result<(StatusCode, Json<SubmitResponse>), AppError> {
    if req.text.trim().is_empty() {
        return Err(AppError::BadRequest("Message text is required".to_string()));
    }

    let context = ExchangeContext {
        semester: req.semester,
        courses: req.courses,
        selected_course_ids: req.selected_course_ids,
    };

    let submitted = state.assistant.submit(req.text, context).await?;
    tracing::debug!(
        exchange_id = %submitted.exchange_id,
        accepted = submitted.accepted,
        "Chat message handled"
    );

    Ok((
        StatusCode::ACCEPTED,
        Json(SubmitResponse {
            accepted: submitted.accepted,
            exchange_id: submitted.exchange_id,
        }),
    ))
}

async fn clear_transcript(
    State(state): State<AppState>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.assistant.clear().await?;
    Ok(Json(SuccessResponse { ok: true }))
}

async fn stream_events(State(state): State<AppState>) -> impl IntoResponse {
    // Subscribe before reading the snapshot so nothing falls in between
    let broadcast_rx = state.assistant.subscribe();
    sse_stream(state.assistant.snapshot(), broadcast_rx)
}

// ============================================================
// Course list helpers
// ============================================================

async fn rerank_courses(Json(req): Json<RerankRequest>) -> Json<CoursesResponse> {
    Json(CoursesResponse {
        courses: rerank(&req.courses, &req.ranked_course_ids),
    })
}

async fn schedule_totals(Json(req): Json<TotalsRequest>) -> Json<ScheduleTotals> {
    Json(total_credits_and_hours(&req.courses))
}

// ============================================================
// Version
// ============================================================

async fn get_version() -> &'static str {
    concat!("course-assistant ", env!("CARGO_PKG_VERSION"))
}

// ============================================================
// Error Handling
// ============================================================

#[derive(Debug)]
enum AppError {
    BadRequest(String),
    Internal(String),
}

impl From<RuntimeError> for AppError {
    fn from(err: RuntimeError) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}
