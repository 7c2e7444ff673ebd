//! Server-Sent Events support

use crate::runtime::{AssistantEvent, AssistantSnapshot};
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::Stream;
use serde_json::json;
use std::convert::Infallible;
use std::time::Duration;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

/// Convert broadcast stream to SSE stream, starting with the current snapshot
pub fn sse_stream(
    snapshot: AssistantSnapshot,
    broadcast_rx: tokio::sync::broadcast::Receiver<AssistantEvent>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let init = futures::stream::once(async move { Ok(init_event(&snapshot)) });

    let broadcasts = BroadcastStream::new(broadcast_rx).filter_map(|result| match result {
        Ok(event) => Some(Ok(to_sse_event(event))),
        Err(_) => None, // Skip lagged messages
    });

    Sse::new(init.chain(broadcasts)).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    )
}

fn init_event(snapshot: &AssistantSnapshot) -> Event {
    let data = json!({
        "type": "init",
        "messages": snapshot.transcript.messages(),
        "busy": snapshot.busy,
    });
    Event::default().event("init").data(data.to_string())
}

fn to_sse_event(event: AssistantEvent) -> Event {
    let (event_type, data) = match event {
        AssistantEvent::Transcript { messages } => (
            "transcript",
            json!({
                "type": "transcript",
                "messages": messages
            }),
        ),
        AssistantEvent::StateChange { state } => (
            "state_change",
            json!({
                "type": "state_change",
                "state": state
            }),
        ),
        AssistantEvent::CoursesReordered { courses } => (
            "courses_reordered",
            json!({
                "type": "courses_reordered",
                "courses": courses
            }),
        ),
        AssistantEvent::ExchangeDone => (
            "exchange_done",
            json!({
                "type": "exchange_done"
            }),
        ),
        AssistantEvent::Error { message } => (
            "error",
            json!({
                "type": "error",
                "message": message
            }),
        ),
    };

    Event::default().event(event_type).data(data.to_string())
}
