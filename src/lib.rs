//! Course Assistant - chat-driven course selection backend
//!
//! Owns the conversation transcript between a student and the remote course
//! assistant, relays each turn to the inference endpoint, and reorders the
//! hosting page's course list from the assistant's ranked suggestions.

#![allow(clippy::missing_errors_doc, clippy::must_use_candidate, clippy::module_name_repetitions)]

pub mod api;
pub mod chat;
pub mod config;
pub mod course;
pub mod rerank;
pub mod runtime;
pub mod schedule;
pub mod state_machine;
pub mod store;
pub mod transcript;

pub use chat::{ChatRequest, ChatResponse, ChatTransport, HttpChatClient, TransportError};
pub use course::{Course, CourseId};
pub use rerank::rerank;
pub use runtime::{Assistant, AssistantEvent, AssistantHandle};
pub use transcript::{Message, Role, Transcript};
