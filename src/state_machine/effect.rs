//! Effects produced by state transitions

use crate::chat::ChatRequest;
use crate::course::Course;

/// Effects to be executed after a state transition
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Fold user text into the transcript (append or replace the unanswered turn)
    MergeUserMessage { text: String },

    /// Append the assistant's reply to the full transcript
    AppendAssistantMessage { content: String },

    /// Write the transcript to the store
    PersistTranscript,

    /// Replace the transcript with the welcome transcript
    ResetTranscript,

    /// Drop the stored transcript
    ForgetStoredTranscript,

    /// Send the request in the background
    SendChatRequest {
        exchange_id: String,
        request: ChatRequest,
    },

    /// Hand the reordered course list to the hosting page
    EmitReorderedCourses { courses: Vec<Course> },

    /// Surface a transient error
    NotifyError { message: String },

    /// Exchange finished with a reply
    NotifyExchangeDone,
}
