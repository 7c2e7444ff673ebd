//! Conversation transcript types
//!
//! A transcript is never empty: it starts from the welcome message and every
//! mutation either appends or replaces the last entry.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Greeting the assistant opens every fresh conversation with
pub const WELCOME_MESSAGE: &str = "您好！我是您的智慧選課助手，我能幫您快速找到適合您的課程。";

/// Message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// Single transcript entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TranscriptError {
    #[error("transcript must contain at least one message")]
    Empty,
}

/// How a user message was folded into the transcript
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// Last entry was an assistant reply; the message was appended
    Appended,
    /// Last entry was an unanswered user message; it was replaced
    ReplacedUnanswered,
}

/// Ordered, non-empty conversation history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Message>", into = "Vec<Message>")]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    /// Fresh transcript holding only the welcome message
    pub fn welcome() -> Self {
        Self {
            messages: vec![Message::assistant(WELCOME_MESSAGE)],
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Never true for a constructed transcript
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> &Message {
        // Non-empty by construction
        &self.messages[self.messages.len() - 1]
    }

    /// Fold a user message into the transcript.
    ///
    /// After an assistant reply the message is appended. If the last entry is
    /// a user message that never got a reply, it is replaced instead, so a
    /// resend after a failure edits the pending message rather than stacking
    /// a second one.
    pub fn merge_user_message(&mut self, text: impl Into<String>) -> MergeOutcome {
        let message = Message::user(text);
        if self.last().role == Role::Assistant {
            self.messages.push(message);
            MergeOutcome::Appended
        } else {
            let last = self.messages.len() - 1;
            self.messages[last] = message;
            MergeOutcome::ReplacedUnanswered
        }
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.messages.push(Message::assistant(content));
    }

    /// Messages to put on the wire for this transcript
    pub fn request_window(&self) -> Vec<Message> {
        truncate_for_request(&self.messages).to_vec()
    }
}

impl Default for Transcript {
    fn default() -> Self {
        Self::welcome()
    }
}

impl TryFrom<Vec<Message>> for Transcript {
    type Error = TranscriptError;

    fn try_from(messages: Vec<Message>) -> Result<Self, Self::Error> {
        if messages.is_empty() {
            return Err(TranscriptError::Empty);
        }
        Ok(Self { messages })
    }
}

impl From<Transcript> for Vec<Message> {
    fn from(transcript: Transcript) -> Self {
        transcript.messages
    }
}

/// Request-local window: drops the oldest message when more than one is present.
///
/// Only the view sent to the inference endpoint is narrowed; the stored
/// transcript keeps every message.
pub fn truncate_for_request(messages: &[Message]) -> &[Message] {
    if messages.len() > 1 {
        &messages[1..]
    } else {
        messages
    }
}
