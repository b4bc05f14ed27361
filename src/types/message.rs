use serde::{Deserialize, Serialize};

use crate::types::{HistoryEntry, Proof, unique_file_names};

/// A single entry in the conversation.
///
/// Messages are created when the user sends a query or when a reply (or the
/// fallback for a failed reply) arrives, and are never mutated afterwards.
/// Only assistant messages carry proofs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    /// The message text exactly as typed or as returned by the backend.
    pub text: String,

    /// Whether the user authored this message.
    #[serde(rename = "isUser")]
    pub is_user: bool,

    /// Citations attached to an assistant reply.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proofs: Option<Vec<Proof>>,
}

impl Message {
    /// Creates a user message carrying the raw input text.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_user: true,
            proofs: None,
        }
    }

    /// Creates an assistant message.
    pub fn assistant(text: impl Into<String>, proofs: Option<Vec<Proof>>) -> Self {
        Self {
            text: text.into(),
            is_user: false,
            proofs,
        }
    }

    /// Returns the proof chips to display for this message.
    ///
    /// User messages never show chips even if proofs were somehow attached.
    pub fn proof_chips(&self) -> Vec<&str> {
        match (&self.proofs, self.is_user) {
            (Some(proofs), false) => unique_file_names(proofs),
            _ => Vec::new(),
        }
    }

    /// Projects this message onto the `{text, isUser}` shape sent as history.
    pub fn to_history_entry(&self) -> HistoryEntry {
        HistoryEntry {
            text: self.text.clone(),
            is_user: self.is_user,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialization_user() {
        let json = serde_json::to_string(&Message::user("hello")).unwrap();
        assert_eq!(json, r#"{"text":"hello","isUser":true}"#);
    }

    #[test]
    fn test_serialization_assistant_with_proofs() {
        let message = Message::assistant("hi", Some(vec![Proof::new(1, "a.md", 0.5)]));
        let json = serde_json::to_string(&message).unwrap();
        assert_eq!(
            json,
            r#"{"text":"hi","isUser":false,"proofs":[{"chunk_id":1,"file_name":"a.md","similarity_score":0.5}]}"#
        );
    }

    #[test]
    fn proof_chips_dedupe() {
        let message = Message::assistant(
            "answer",
            Some(vec![
                Proof::new(1, "a", 0.9),
                Proof::new(2, "a", 0.8),
                Proof::new(3, "b", 0.7),
            ]),
        );
        assert_eq!(message.proof_chips(), vec!["a", "b"]);
    }

    #[test]
    fn proof_chips_absent() {
        assert!(Message::assistant("x", None).proof_chips().is_empty());
        assert!(Message::assistant("x", Some(vec![])).proof_chips().is_empty());
        let mut user = Message::user("q");
        user.proofs = Some(vec![Proof::new(1, "a", 0.1)]);
        assert!(user.proof_chips().is_empty());
    }

    #[test]
    fn history_entry_drops_proofs() {
        let message = Message::assistant("hi", Some(vec![Proof::new(1, "a", 0.1)]));
        let entry = message.to_history_entry();
        assert_eq!(entry.text, "hi");
        assert!(!entry.is_user);
    }
}
