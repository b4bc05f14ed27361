//! The seam between the chat logic and the network.
//!
//! [`Backend`] names the two calls the selector and the session make.  The
//! HTTP [`Client`](crate::Client) is the production implementation; tests
//! substitute in-memory fakes.

use crate::error::Result;
use crate::types::{ChatReplyRequest, ChatReplyResponse, Project};

/// A document Q&A backend.
#[async_trait::async_trait]
pub trait Backend: Send + Sync {
    /// Fetches every project the backend exposes.
    async fn list_projects(&self) -> Result<Vec<Project>>;

    /// Asks the backend to answer `request` against the given project.
    async fn get_chat_reply(
        &self,
        project_id: &str,
        request: &ChatReplyRequest,
    ) -> Result<ChatReplyResponse>;
}
