use serde::{Deserialize, Serialize};

/// A prior message as sent in `messageHistory`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HistoryEntry {
    /// The message text.
    pub text: String,

    /// Whether the user authored the message.
    #[serde(rename = "isUser")]
    pub is_user: bool,
}
