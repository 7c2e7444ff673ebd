//! API request and response types

use crate::course::{Course, CourseId};
use crate::transcript::Message;
use serde::{Deserialize, Serialize};

/// Request to send a chat message
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequest {
    pub text: String,
    #[serde(default)]
    pub semester: String,
    /// Course list currently displayed by the page
    #[serde(default)]
    pub courses: Vec<Course>,
    #[serde(default)]
    pub selected_course_ids: Vec<CourseId>,
}

/// Response for chat action
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    /// False when the runtime dropped the message because an exchange was in flight
    pub accepted: bool,
    pub exchange_id: String,
}

#[derive(Debug, Serialize)]
pub struct TranscriptResponse {
    pub messages: Vec<Message>,
    pub busy: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RerankRequest {
    pub courses: Vec<Course>,
    #[serde(default)]
    pub ranked_course_ids: Vec<CourseId>,
}

#[derive(Debug, Serialize)]
pub struct CoursesResponse {
    pub courses: Vec<Course>,
}

#[derive(Debug, Deserialize)]
pub struct TotalsRequest {
    pub courses: Vec<Course>,
}

/// Generic success response
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub ok: bool,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
