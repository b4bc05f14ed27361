//! Chat client state for project-scoped conversations.
//!
//! This module provides the pieces the `proofchat-chat` REPL is built from:
//!
//! - [`selector`]: the project list and the current selection
//! - [`session`]: the conversation, the loading flag and the send lifecycle
//! - [`config`]: CLI argument parsing and configuration
//! - [`commands`]: slash command parsing
//! - [`render`]: terminal output
//!
//! The selector and the session are independent; the caller feeds the
//! selected project into [`ChatSession::sync_with`], which resets the
//! conversation whenever the resolved project id changes.

mod commands;
mod config;
mod render;
mod selector;
mod session;

pub use commands::{ChatCommand, help_text, parse_command};
pub use config::{ChatArgs, ChatConfig};
pub use render::{PlainTextRenderer, Renderer};
pub use selector::{PLACEHOLDER_LABEL, ProjectSelector};
pub use session::{ChatSession, ERROR_REPLY_TEXT, PendingReply, SessionStats};
