//! Assistant runtime executor

use super::{AssistantEvent, AssistantSnapshot, Envelope};
use crate::chat::ChatTransport;
use crate::state_machine::{transition, Effect, Event, ExchangeState, TransitionError};
use crate::store::{KvStore, TranscriptStore};
use crate::transcript::{MergeOutcome, Transcript};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, watch};

/// Event loop that owns the transcript and the exchange state
pub struct ConversationRuntime<S, T>
where
    S: KvStore + 'static,
    T: ChatTransport + 'static,
{
    state: ExchangeState,
    transcript: Transcript,
    store: TranscriptStore<S>,
    transport: Arc<T>,
    event_rx: mpsc::Receiver<Envelope>,
    /// Weak so the loop ends once every handle is gone
    event_tx: mpsc::WeakSender<Envelope>,
    broadcast_tx: broadcast::Sender<AssistantEvent>,
    snapshot_tx: watch::Sender<AssistantSnapshot>,
}

impl<S, T> ConversationRuntime<S, T>
where
    S: KvStore + 'static,
    T: ChatTransport + 'static,
{
    pub fn new(
        transcript: Transcript,
        store: TranscriptStore<S>,
        transport: Arc<T>,
        event_rx: mpsc::Receiver<Envelope>,
        event_tx: mpsc::WeakSender<Envelope>,
        broadcast_tx: broadcast::Sender<AssistantEvent>,
        snapshot_tx: watch::Sender<AssistantSnapshot>,
    ) -> Self {
        Self {
            state: ExchangeState::Idle,
            transcript,
            store,
            transport,
            event_rx,
            event_tx,
            broadcast_tx,
            snapshot_tx,
        }
    }

    pub async fn run(mut self) {
        tracing::info!(key = %self.store.key(), "Assistant runtime started");

        while let Some(Envelope { event, reply }) = self.event_rx.recv().await {
            let verdict = self.process_event(event).await;
            if let Some(reply) = reply {
                // The caller may have stopped waiting
                let _ = reply.send(verdict);
            }
        }

        tracing::info!(key = %self.store.key(), "Assistant runtime stopped");
    }

    /// Handle one event and everything it chains into.
    ///
    /// The verdict is that of the first transition; chained events only log.
    async fn process_event(&mut self, event: Event) -> Result<(), TransitionError> {
        // Chained effects feed events back in without recursion
        let mut events_to_process = vec![event];
        let mut verdict = None;

        while let Some(current_event) = events_to_process.pop() {
            let result = match transition(&self.state, &self.transcript, current_event) {
                Ok(r) => r,
                Err(e) => {
                    match &e {
                        TransitionError::Busy => {
                            tracing::debug!(state = self.state.name(), "Dropping input while busy");
                        }
                        TransitionError::UnexpectedEvent(_) => {
                            tracing::warn!(error = %e, "Ignoring event");
                        }
                    }
                    if verdict.is_none() {
                        verdict = Some(Err(e));
                    }
                    continue;
                }
            };
            if verdict.is_none() {
                verdict = Some(Ok(()));
            }

            let old_state = std::mem::replace(&mut self.state, result.new_state);
            if old_state != self.state {
                tracing::debug!(from = old_state.name(), to = self.state.name(), "State change");
                self.broadcast(AssistantEvent::StateChange {
                    state: serde_json::to_value(&self.state).unwrap_or(serde_json::Value::Null),
                });
            }

            for effect in result.effects {
                if let Some(generated_event) = self.execute_effect(effect).await {
                    events_to_process.push(generated_event);
                }
            }
        }

        self.publish_snapshot();
        verdict.unwrap_or(Ok(()))
    }

    async fn execute_effect(&mut self, effect: Effect) -> Option<Event> {
        match effect {
            Effect::MergeUserMessage { text } => {
                let outcome = self.transcript.merge_user_message(text);
                if outcome == MergeOutcome::ReplacedUnanswered {
                    tracing::debug!("Replaced unanswered user message");
                }
                self.broadcast_transcript();
                Some(Event::Merged)
            }

            Effect::AppendAssistantMessage { content } => {
                self.transcript.push_assistant(content);
                self.broadcast_transcript();
                None
            }

            Effect::PersistTranscript => {
                if let Err(e) = self.store.persist(&self.transcript).await {
                    tracing::warn!(key = %self.store.key(), error = %e, "Failed to persist transcript");
                }
                None
            }

            Effect::ResetTranscript => {
                self.transcript = Transcript::welcome();
                self.broadcast_transcript();
                None
            }

            Effect::ForgetStoredTranscript => {
                if let Err(e) = self.store.clear().await {
                    tracing::warn!(key = %self.store.key(), error = %e, "Failed to remove stored transcript");
                }
                None
            }

            Effect::SendChatRequest {
                exchange_id,
                request,
            } => {
                // Publish busy before the request leaves so snapshots never lag the wire
                self.publish_snapshot();

                let Some(event_tx) = self.event_tx.upgrade() else {
                    tracing::debug!(exchange_id = %exchange_id, "No handles left, not sending");
                    return None;
                };
                let transport = self.transport.clone();

                tokio::spawn(async move {
                    tracing::info!(
                        exchange_id = %exchange_id,
                        messages = request.messages.len(),
                        "Sending chat request (background)"
                    );

                    let event = match transport.send(&request).await {
                        Ok(response) => Event::ChatResponded {
                            exchange_id,
                            response,
                        },
                        Err(e) => Event::ChatFailed {
                            exchange_id,
                            message: e.to_string(),
                            kind: e.kind,
                        },
                    };
                    let _ = event_tx.send(event.into()).await;
                });
                None
            }

            Effect::EmitReorderedCourses { courses } => {
                tracing::debug!(count = courses.len(), "Emitting reordered courses");
                self.broadcast(AssistantEvent::CoursesReordered { courses });
                None
            }

            Effect::NotifyError { message } => {
                self.broadcast(AssistantEvent::Error { message });
                None
            }

            Effect::NotifyExchangeDone => {
                self.broadcast(AssistantEvent::ExchangeDone);
                None
            }
        }
    }

    fn broadcast(&self, event: AssistantEvent) {
        // No subscribers is fine
        let _ = self.broadcast_tx.send(event);
    }

    fn broadcast_transcript(&self) {
        self.broadcast(AssistantEvent::Transcript {
            messages: self.transcript.messages().to_vec(),
        });
    }

    fn publish_snapshot(&self) {
        let snapshot = AssistantSnapshot {
            transcript: self.transcript.clone(),
            busy: self.state.is_busy(),
        };
        self.snapshot_tx.send_replace(snapshot);
    }
}
