//! Wire types for the `/chat` endpoint

use crate::course::CourseId;
use crate::transcript::Message;
use serde::{Deserialize, Serialize};

/// Request body sent to the assistant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub messages: Vec<Message>,
    /// Semester the student is browsing (e.g. `"1131"`)
    pub semesters: String,
    /// Courses already in the student's schedule, as a preference hint
    pub current_selected_course_id: Vec<CourseId>,
}

impl ChatRequest {
    pub fn new(
        messages: Vec<Message>,
        semesters: impl Into<String>,
        current_selected_course_id: Vec<CourseId>,
    ) -> Self {
        Self {
            messages,
            semesters: semesters.into(),
            current_selected_course_id,
        }
    }
}

/// Assistant reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub response: String,
    /// Course numbers in the assistant's preferred order
    #[serde(default)]
    pub ranked_course_ids: Vec<CourseId>,
}
