use serde::{Deserialize, Serialize};

use crate::types::{HistoryEntry, Message};

/// Body of `POST /get_chat_reply/{projectId}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatReplyRequest {
    /// The new user query.
    pub query: String,

    /// Every message that preceded the query, oldest first.
    #[serde(rename = "messageHistory")]
    pub message_history: Vec<HistoryEntry>,
}

impl ChatReplyRequest {
    /// Builds a request from the query and the conversation as it stood before
    /// the query was appended.
    pub fn new(query: impl Into<String>, prior: &[Message]) -> Self {
        Self {
            query: query.into(),
            message_history: prior.iter().map(Message::to_history_entry).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialization() {
        let prior = vec![Message::user("hi"), Message::assistant("hello", None)];
        let request = ChatReplyRequest::new("how are you", &prior);
        let json = serde_json::to_string(&request).unwrap();
        assert_eq!(
            json,
            r#"{"query":"how are you","messageHistory":[{"text":"hi","isUser":true},{"text":"hello","isUser":false}]}"#
        );
    }

    #[test]
    fn test_serialization_empty_history() {
        let request = ChatReplyRequest::new("first", &[]);
        let json = serde_json::to_string(&request).unwrap();
        assert_eq!(json, r#"{"query":"first","messageHistory":[]}"#);
    }
}
