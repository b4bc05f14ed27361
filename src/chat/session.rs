//! Core chat session management.
//!
//! This module provides the `ChatSession` struct which owns the conversation
//! for the selected project: the append-only message list, the loading flag
//! and the input buffer.
//!
//! A send is split in two halves so that the state transitions can be driven
//! without holding the session across the network call:
//!
//! - [`ChatSession::begin_send`] checks the guard, appends the user message,
//!   clears the input and raises the loading flag.  It returns a
//!   [`PendingReply`] carrying the request to issue.
//! - [`ChatSession::complete`] appends the assistant message (or the error
//!   fallback) and lowers the loading flag.
//!
//! [`ChatSession::send`] composes both halves with the backend call.
//!
//! Only one reply may be outstanding at a time; a second `begin_send` while
//! loading is rejected with [`Error::Busy`].  Every pending reply is tagged
//! with the session epoch, which advances on each project change, and a reply
//! that completes under a different epoch is dropped rather than appended to
//! the new project's conversation.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use serde::Serialize;
use serde_json::to_writer_pretty;

use crate::Error;
use crate::backend::Backend;
use crate::error::Result;
use crate::observability::{
    SESSION_FAILED_REPLIES, SESSION_REJECTED_SENDS, SESSION_RESETS, SESSION_SENDS,
    SESSION_STALE_REPLIES,
};
use crate::types::{ChatReplyRequest, ChatReplyResponse, Message};

use super::render::Renderer;
use super::selector::ProjectSelector;

/// Text of the assistant message appended when a reply cannot be obtained.
pub const ERROR_REPLY_TEXT: &str = "Sorry, there was an error processing your request.";

/// How often an outstanding reply checks for a user interrupt.
const INTERRUPT_POLL: Duration = Duration::from_millis(50);

/// A reply request issued by [`ChatSession::begin_send`] and not yet completed.
#[derive(Debug, Clone)]
pub struct PendingReply {
    project_id: String,
    epoch: u64,
    request: ChatReplyRequest,
}

impl PendingReply {
    /// The project the request was issued against.
    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// The request body to POST.
    pub fn request(&self) -> &ChatReplyRequest {
        &self.request
    }
}

/// A chat session scoped to one project at a time.
#[derive(Debug, Default)]
pub struct ChatSession {
    project_id: Option<String>,
    messages: Vec<Message>,
    loading: bool,
    input: String,
    epoch: u64,
    sends: u64,
    failed_replies: u64,
    stale_replies: u64,
}

/// Aggregated stats for a chat session.
#[derive(Debug, Clone)]
pub struct SessionStats {
    /// The project the conversation belongs to, if any.
    pub project_id: Option<String>,
    /// The number of messages in the conversation.
    pub message_count: usize,
    /// Whether a reply is outstanding.
    pub loading: bool,
    /// Sends accepted since the session was created.
    pub total_sends: u64,
    /// Replies replaced by the error fallback.
    pub failed_replies: u64,
    /// Replies dropped because the project changed while they were in flight.
    pub stale_replies: u64,
}

impl ChatSession {
    /// Creates an empty session with no project.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty session for the given project.
    pub fn for_project(project_id: impl Into<String>) -> Self {
        Self {
            project_id: Some(project_id.into()),
            ..Self::default()
        }
    }

    /// Switches the conversation to another project.
    ///
    /// When the id differs from the current one, the message list is cleared,
    /// the loading flag is lowered and the epoch advances, all in this one
    /// call; any reply still in flight for the old project will be dropped on
    /// completion.  Lowering the flag also resets the busy guard: the new
    /// project may `begin_send` while the old project's request is still
    /// outstanding.  The input buffer is kept.  Returns true when the project
    /// changed.
    pub fn set_project(&mut self, project_id: Option<String>) -> bool {
        if self.project_id == project_id {
            return false;
        }
        tracing::debug!(
            from = ?self.project_id,
            to = ?project_id,
            dropped = self.messages.len(),
            "switching project"
        );
        SESSION_RESETS.click();
        self.project_id = project_id;
        self.messages.clear();
        self.loading = false;
        self.epoch += 1;
        true
    }

    /// Follows the selector's resolved project.
    ///
    /// Equivalent to [`set_project`](Self::set_project) with the id of
    /// [`ProjectSelector::selected_project`]; the conversation is reset only
    /// when that id differs from the session's.
    pub fn sync_with(&mut self, selector: &ProjectSelector) -> bool {
        let project_id = selector.selected_project().map(|project| project.id.clone());
        self.set_project(project_id)
    }

    /// The project the conversation belongs to.
    pub fn project_id(&self) -> Option<&str> {
        self.project_id.as_deref()
    }

    /// The conversation, oldest first.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Returns the number of messages in the conversation.
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    /// Whether a reply is outstanding.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// The pending input text.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Replaces the pending input text.
    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input = input.into();
    }

    /// Whether a send of the current input would be accepted.
    pub fn can_send(&self) -> bool {
        !self.input.trim().is_empty()
            && self.project_id.as_deref().is_some_and(|id| !id.is_empty())
            && !self.loading
    }

    /// Starts a send.
    ///
    /// Rejects, leaving the session untouched, when `text` is blank, no
    /// project is selected, or a reply is already outstanding.  Otherwise
    /// appends the user message with the raw text, clears the input buffer,
    /// raises the loading flag and returns the request to issue.  The
    /// request's history is the conversation as it stood before the user
    /// message was appended.
    pub fn begin_send(&mut self, text: &str) -> Result<PendingReply> {
        if text.trim().is_empty() {
            return Err(Error::validation(
                "message is empty",
                Some("query".to_string()),
            ));
        }
        let Some(project_id) = self.project_id.clone().filter(|id| !id.is_empty()) else {
            return Err(Error::validation(
                "no project selected",
                Some("project_id".to_string()),
            ));
        };
        if self.loading {
            return Err(Error::busy("a reply is still outstanding"));
        }

        let request = ChatReplyRequest::new(text, &self.messages);
        self.messages.push(Message::user(text));
        self.input.clear();
        self.loading = true;
        self.sends += 1;
        SESSION_SENDS.click();

        Ok(PendingReply {
            project_id,
            epoch: self.epoch,
            request,
        })
    }

    /// Finishes a send with the backend's outcome.
    ///
    /// A successful reply becomes an assistant message carrying its proofs; a
    /// failure becomes the [`ERROR_REPLY_TEXT`] fallback.  Either way the
    /// loading flag is lowered.  Returns the appended message, or `None` when
    /// the project changed since `pending` was issued and the reply was
    /// dropped.
    pub fn complete(
        &mut self,
        pending: PendingReply,
        outcome: Result<ChatReplyResponse>,
    ) -> Option<&Message> {
        if pending.epoch != self.epoch {
            self.stale_replies += 1;
            SESSION_STALE_REPLIES.click();
            tracing::info!(
                project_id = %pending.project_id,
                "dropping reply for a project that is no longer selected"
            );
            return None;
        }

        let message = match outcome {
            Ok(reply) => reply.into_message(),
            Err(err) => {
                self.failed_replies += 1;
                SESSION_FAILED_REPLIES.click();
                tracing::warn!(
                    project_id = %pending.project_id,
                    error = %err,
                    "chat reply failed"
                );
                Message::assistant(ERROR_REPLY_TEXT, None)
            }
        };
        self.messages.push(message);
        self.loading = false;
        self.messages.last()
    }

    /// Sends `text` and waits for the reply.
    ///
    /// This method:
    /// 1. Starts the send, rendering the user message and the loading state
    /// 2. Posts the request to the backend
    /// 3. Completes the send with the reply or the error fallback
    /// 4. Renders the assistant message
    ///
    /// Setting `interrupted` abandons the wait; the send completes with the
    /// error fallback.
    ///
    /// # Errors
    ///
    /// Returns an error only when the send is rejected by its guard; backend
    /// failures become chat messages.
    pub async fn send<B: Backend + ?Sized>(
        &mut self,
        backend: &B,
        text: &str,
        renderer: &mut dyn Renderer,
        interrupted: &AtomicBool,
    ) -> Result<()> {
        let pending = self.begin_send(text).inspect_err(|err| {
            SESSION_REJECTED_SENDS.click();
            tracing::debug!(error = %err, "send rejected");
        })?;
        if let Some(message) = self.messages.last() {
            renderer.print_message(message);
        }
        renderer.print_loading();
        renderer.scroll_to_end();

        let outcome = await_reply(backend, &pending, interrupted).await;

        renderer.finish_loading();
        if let Some(message) = self.complete(pending, outcome) {
            renderer.print_message(message);
            renderer.scroll_to_end();
        }
        Ok(())
    }

    /// Sends the current input buffer.
    pub async fn submit<B: Backend + ?Sized>(
        &mut self,
        backend: &B,
        renderer: &mut dyn Renderer,
        interrupted: &AtomicBool,
    ) -> Result<()> {
        let text = self.input.clone();
        self.send(backend, &text, renderer, interrupted).await
    }

    /// Writes the conversation to `path` as pretty-printed JSON.
    pub fn save_transcript_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let transcript = TranscriptFile::new(self.project_id.as_deref(), &self.messages);
        let file = File::create(path.as_ref())
            .map_err(|err| Error::io("failed to create transcript file", err))?;
        let writer = BufWriter::new(file);
        to_writer_pretty(writer, &transcript).map_err(|err| {
            Error::serialization("failed to serialize transcript", Some(Box::new(err)))
        })
    }

    /// Returns the current session statistics snapshot.
    pub fn stats(&self) -> SessionStats {
        SessionStats {
            project_id: self.project_id.clone(),
            message_count: self.message_count(),
            loading: self.loading,
            total_sends: self.sends,
            failed_replies: self.failed_replies,
            stale_replies: self.stale_replies,
        }
    }
}

async fn await_reply<B: Backend + ?Sized>(
    backend: &B,
    pending: &PendingReply,
    interrupted: &AtomicBool,
) -> Result<ChatReplyResponse> {
    let mut reply = backend.get_chat_reply(&pending.project_id, &pending.request);
    loop {
        tokio::select! {
            outcome = &mut reply => return outcome,
            _ = tokio::time::sleep(INTERRUPT_POLL) => {
                if interrupted.load(Ordering::Relaxed) {
                    return Err(Error::abort("reply abandoned by the user"));
                }
            }
        }
    }
}

#[derive(Serialize)]
struct TranscriptFile<'a> {
    version: u8,
    project_id: Option<&'a str>,
    messages: &'a [Message],
}

impl<'a> TranscriptFile<'a> {
    fn new(project_id: Option<&'a str>, messages: &'a [Message]) -> Self {
        Self {
            version: 1,
            project_id,
            messages,
        }
    }
}
