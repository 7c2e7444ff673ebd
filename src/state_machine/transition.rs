//! Pure state transition function

use super::{Effect, Event, ExchangeState};
use crate::chat::ChatRequest;
use crate::rerank::rerank;
use crate::transcript::Transcript;
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: ExchangeState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: ExchangeState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    #[must_use]
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Errors that can occur during transition
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Assistant is busy with another message")]
    Busy,
    #[error("Unexpected event: {0}")]
    UnexpectedEvent(String),
}

/// Pure transition function.
///
/// `transcript` is the transcript as it stands when the event is handled;
/// transitions never mutate it directly, they ask for it via effects.
pub fn transition(
    state: &ExchangeState,
    transcript: &Transcript,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    match (state, event) {
        // ============================================================
        // Submit
        // ============================================================

        // Blank input is ignored without a trace
        (ExchangeState::Idle, Event::UserSubmit { text, .. }) if text.trim().is_empty() => {
            Ok(TransitionResult::new(ExchangeState::Idle))
        }

        (ExchangeState::Idle, Event::UserSubmit { text, exchange_id, context }) => {
            Ok(TransitionResult::new(ExchangeState::Merging { exchange_id, context })
                .with_effect(Effect::MergeUserMessage { text })
                .with_effect(Effect::PersistTranscript))
        }

        (ExchangeState::Merging { .. } | ExchangeState::Sending { .. }, Event::UserSubmit { .. }) => {
            Err(TransitionError::Busy)
        }

        // Merging + Merged -> Sending, with the request built from the merged transcript
        (ExchangeState::Merging { exchange_id, context }, Event::Merged) => {
            let request = ChatRequest::new(
                transcript.request_window(),
                context.semester.clone(),
                context.selected_course_ids.clone(),
            );
            Ok(TransitionResult::new(ExchangeState::Sending {
                exchange_id: exchange_id.clone(),
                context: context.clone(),
            })
            .with_effect(Effect::SendChatRequest {
                exchange_id: exchange_id.clone(),
                request,
            }))
        }

        // ============================================================
        // Reply handling
        // ============================================================
        (
            ExchangeState::Sending { exchange_id, context },
            Event::ChatResponded { exchange_id: reply_id, response },
        ) if *exchange_id == reply_id => {
            let mut result = TransitionResult::new(ExchangeState::Idle)
                .with_effect(Effect::AppendAssistantMessage {
                    content: response.response,
                })
                .with_effect(Effect::PersistTranscript);

            if !response.ranked_course_ids.is_empty() {
                result = result.with_effect(Effect::EmitReorderedCourses {
                    courses: rerank(&context.courses, &response.ranked_course_ids),
                });
            }

            Ok(result.with_effect(Effect::NotifyExchangeDone))
        }

        // Failure leaves the merged transcript as is; the next submit edits the
        // unanswered message
        (
            ExchangeState::Sending { exchange_id, .. },
            Event::ChatFailed { exchange_id: failed_id, message, .. },
        ) if *exchange_id == failed_id => Ok(TransitionResult::new(ExchangeState::Idle)
            .with_effect(Effect::NotifyError { message })),

        // ============================================================
        // Clear
        // ============================================================
        // Clearing abandons any exchange in flight; its reply no longer matches and is dropped
        (_, Event::ClearTranscript) => Ok(TransitionResult::new(ExchangeState::Idle)
            .with_effect(Effect::ResetTranscript)
            .with_effect(Effect::ForgetStoredTranscript)),

        // ============================================================
        // Everything else (stale replies, Merged outside Merging)
        // ============================================================
        (state, event) => Err(TransitionError::UnexpectedEvent(format!(
            "{} in state {}",
            event_name(&event),
            state.name()
        ))),
    }
}

fn event_name(event: &Event) -> &'static str {
    match event {
        Event::UserSubmit { .. } => "user_submit",
        Event::ClearTranscript => "clear_transcript",
        Event::Merged => "merged",
        Event::ChatResponded { .. } => "chat_responded",
        Event::ChatFailed { .. } => "chat_failed",
    }
}
