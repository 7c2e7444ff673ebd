//! Events that drive the exchange state machine

use super::state::ExchangeContext;
use crate::chat::{ChatResponse, TransportErrorKind};

/// Events that trigger state transitions
#[derive(Debug, Clone)]
pub enum Event {
    // User events
    UserSubmit {
        text: String,
        exchange_id: String,
        context: ExchangeContext,
    },
    ClearTranscript,

    // Runtime events
    /// User message has been folded into the transcript
    Merged,

    // Transport events
    ChatResponded {
        exchange_id: String,
        response: ChatResponse,
    },
    ChatFailed {
        exchange_id: String,
        message: String,
        kind: TransportErrorKind,
    },
}
