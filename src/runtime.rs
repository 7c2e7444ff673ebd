//! Runtime for the chat exchange
//!
//! A single task owns the transcript and the exchange state and handles
//! events one at a time. The transport call is the only background work;
//! its outcome comes back through the same event channel.

mod executor;

#[cfg(test)]
pub mod testing;

pub use executor::ConversationRuntime;

use crate::chat::ChatTransport;
use crate::course::Course;
use crate::state_machine::{Event, ExchangeContext, TransitionError};
use crate::store::{KvStore, TranscriptStore};
use crate::transcript::{Message, Transcript};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{broadcast, mpsc, oneshot, watch};

/// Events sent to subscribers of a running assistant
#[derive(Debug, Clone)]
pub enum AssistantEvent {
    /// Full transcript after a change
    Transcript { messages: Vec<Message> },
    StateChange {
        /// Full state as JSON object (e.g. `{"type":"sending","exchange_id":"..."}`)
        state: serde_json::Value,
    },
    /// Course list reordered by the assistant's ranking
    CoursesReordered { courses: Vec<Course> },
    ExchangeDone,
    Error { message: String },
}

/// Latest transcript and busy flag
#[derive(Debug, Clone, Default)]
pub struct AssistantSnapshot {
    pub transcript: Transcript,
    pub busy: bool,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RuntimeError {
    #[error("Assistant runtime has stopped")]
    Stopped,
    #[error(transparent)]
    Rejected(#[from] TransitionError),
}

/// Event queued for the runtime, with an optional channel for its verdict
#[derive(Debug)]
pub struct Envelope {
    pub event: Event,
    pub reply: Option<oneshot::Sender<Result<(), TransitionError>>>,
}

impl From<Event> for Envelope {
    fn from(event: Event) -> Self {
        Self { event, reply: None }
    }
}

/// Outcome of a submit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submitted {
    pub exchange_id: String,
    /// False when the text was blank or another exchange was in flight
    pub accepted: bool,
}

/// Handle to interact with a running assistant
#[derive(Clone)]
pub struct AssistantHandle {
    event_tx: mpsc::Sender<Envelope>,
    broadcast_tx: broadcast::Sender<AssistantEvent>,
    snapshot_rx: watch::Receiver<AssistantSnapshot>,
}

impl AssistantHandle {
    /// Hand a user message to the runtime and report whether it started an exchange.
    ///
    /// Blank text and submits made while an exchange is in flight are
    /// dropped with `accepted: false`.
    pub async fn submit(
        &self,
        text: impl Into<String>,
        context: ExchangeContext,
    ) -> Result<Submitted, RuntimeError> {
        let text = text.into();
        let exchange_id = uuid::Uuid::new_v4().to_string();
        if text.trim().is_empty() {
            return Ok(Submitted {
                exchange_id,
                accepted: false,
            });
        }

        let verdict = self
            .dispatch(Event::UserSubmit {
                text,
                exchange_id: exchange_id.clone(),
                context,
            })
            .await?;

        match verdict {
            Ok(()) => Ok(Submitted {
                exchange_id,
                accepted: true,
            }),
            Err(TransitionError::Busy) => Ok(Submitted {
                exchange_id,
                accepted: false,
            }),
            Err(e) => Err(e.into()),
        }
    }

    /// Reset the transcript to the welcome message and forget the stored copy.
    ///
    /// An exchange still in flight is abandoned; its reply is discarded.
    pub async fn clear(&self) -> Result<(), RuntimeError> {
        self.dispatch(Event::ClearTranscript).await??;
        Ok(())
    }

    /// Queue an event and wait for the runtime to handle it
    async fn dispatch(&self, event: Event) -> Result<Result<(), TransitionError>, RuntimeError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.event_tx
            .send(Envelope {
                event,
                reply: Some(reply_tx),
            })
            .await
            .map_err(|_| RuntimeError::Stopped)?;
        reply_rx.await.map_err(|_| RuntimeError::Stopped)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AssistantEvent> {
        self.broadcast_tx.subscribe()
    }

    pub fn snapshot(&self) -> AssistantSnapshot {
        self.snapshot_rx.borrow().clone()
    }

    /// Watch channel that changes whenever the snapshot does
    pub fn watch(&self) -> watch::Receiver<AssistantSnapshot> {
        self.snapshot_rx.clone()
    }
}

/// Entry point for starting an assistant runtime
pub struct Assistant;

impl Assistant {
    /// Restore the stored transcript and spawn the event loop
    pub async fn start<S, T>(store: TranscriptStore<S>, transport: T) -> AssistantHandle
    where
        S: KvStore + 'static,
        T: ChatTransport + 'static,
    {
        let transcript = store.restore().await;
        tracing::info!(
            key = %store.key(),
            messages = transcript.len(),
            endpoint = %transport.endpoint(),
            "Starting assistant runtime"
        );

        let (event_tx, event_rx) = mpsc::channel(32);
        let (broadcast_tx, _) = broadcast::channel(128);
        let (snapshot_tx, snapshot_rx) = watch::channel(AssistantSnapshot {
            transcript: transcript.clone(),
            busy: false,
        });

        let runtime = ConversationRuntime::new(
            transcript,
            store,
            Arc::new(transport),
            event_rx,
            event_tx.downgrade(),
            broadcast_tx.clone(),
            snapshot_tx,
        );
        tokio::spawn(runtime.run());

        AssistantHandle {
            event_tx,
            broadcast_tx,
            snapshot_rx,
        }
    }
}
