//! Exchange state types

use crate::course::{Course, CourseId};
use serde::Serialize;

/// What the hosting page knew when the user hit send
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExchangeContext {
    pub semester: String,
    /// Course list currently displayed; reordered when the reply ranks courses
    pub courses: Vec<Course>,
    pub selected_course_ids: Vec<CourseId>,
}

/// Exchange state
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExchangeState {
    /// Ready to accept a submit
    #[default]
    Idle,

    /// User text accepted, being folded into the transcript
    Merging {
        exchange_id: String,
        #[serde(skip)]
        context: ExchangeContext,
    },

    /// Request in flight
    Sending {
        exchange_id: String,
        #[serde(skip)]
        context: ExchangeContext,
    },
}

impl ExchangeState {
    /// Busy states reject new submits
    pub fn is_busy(&self) -> bool {
        !matches!(self, ExchangeState::Idle)
    }

    pub fn name(&self) -> &'static str {
        match self {
            ExchangeState::Idle => "idle",
            ExchangeState::Merging { .. } => "merging",
            ExchangeState::Sending { .. } => "sending",
        }
    }

    pub fn exchange_id(&self) -> Option<&str> {
        match self {
            ExchangeState::Idle => None,
            ExchangeState::Merging { exchange_id, .. }
            | ExchangeState::Sending { exchange_id, .. } => Some(exchange_id),
        }
    }
}
