// Public modules
pub mod backend;
pub mod chat;
pub mod client;
pub mod error;
pub mod types;

mod observability;

// Re-exports
pub use backend::Backend;
pub use client::Client;
pub use error::{Error, Result};
pub use observability::register_biometrics;
pub use types::*;
