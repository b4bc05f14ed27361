use serde::{Deserialize, Serialize};

use crate::types::{Message, Proof};

/// Text used when a reply arrives without a `response` field.
pub const MISSING_RESPONSE_TEXT: &str = "Sorry, I couldn't process that request.";

/// Body returned by `POST /get_chat_reply/{projectId}`.
///
/// Only `response` and `proof` feed the conversation; the echoed fields are
/// kept so callers can log them.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ChatReplyResponse {
    /// Status message from the backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// The project the reply was generated for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,

    /// The query the backend answered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,

    /// The assistant's answer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,

    /// Chunks that support the answer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proof: Option<Vec<Proof>>,
}

impl ChatReplyResponse {
    /// Converts the reply into the assistant message appended to the session.
    ///
    /// A missing or empty `response` is replaced with [`MISSING_RESPONSE_TEXT`].
    pub fn into_message(self) -> Message {
        let text = self
            .response
            .filter(|response| !response.is_empty())
            .unwrap_or_else(|| MISSING_RESPONSE_TEXT.to_string());
        Message::assistant(text, self.proof)
    }
}
