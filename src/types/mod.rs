// Public modules
pub mod chat_reply_request;
pub mod chat_reply_response;
pub mod history_entry;
pub mod message;
pub mod project;
pub mod project_list;
pub mod proof;

// Re-exports
pub use chat_reply_request::ChatReplyRequest;
pub use chat_reply_response::{ChatReplyResponse, MISSING_RESPONSE_TEXT};
pub use history_entry::HistoryEntry;
pub use message::Message;
pub use project::Project;
pub use project_list::ProjectList;
pub use proof::{Proof, unique_file_names};
