//! Configuration types for the chat application.
//!
//! This module provides CLI argument parsing via `arrrg` and configuration
//! structures for controlling chat behavior.

use std::time::Duration;

use arrrg_derive::CommandLine;

/// Command-line arguments for the proofchat-chat tool.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
pub struct ChatArgs {
    /// Backend base URL.
    #[arrrg(
        optional,
        "Backend URL (default: $PROOFCHAT_API_URL or http://localhost:5000)",
        "URL"
    )]
    pub api_url: Option<String>,

    /// Project to select instead of the first listed one.
    #[arrrg(optional, "Project id to select on startup", "ID")]
    pub project: Option<String>,

    /// Per-request timeout in seconds.
    #[arrrg(optional, "Request timeout in seconds (default: none)", "SECONDS")]
    pub timeout_secs: Option<u64>,

    /// Disable ANSI colors and styles.
    #[arrrg(flag, "Disable ANSI colors/styles")]
    pub no_color: bool,
}

/// Configuration for a chat client.
///
/// This struct holds the resolved configuration values after processing
/// command-line arguments with appropriate defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatConfig {
    /// Backend URL; `None` defers to the environment and then the default.
    pub api_url: Option<String>,

    /// Project to select on startup.
    pub initial_project: Option<String>,

    /// Request timeout.  `None` lets a request wait indefinitely.
    pub timeout: Option<Duration>,

    /// Whether to use ANSI colors and styles in output.
    pub use_color: bool,
}

impl ChatConfig {
    /// Creates a new ChatConfig with default values.
    ///
    /// Defaults:
    /// - URL: resolved by the client
    /// - Project: the first one listed
    /// - Timeout: none
    /// - Color: enabled
    pub fn new() -> Self {
        Self {
            api_url: None,
            initial_project: None,
            timeout: None,
            use_color: true,
        }
    }

    /// Sets the backend URL.
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = Some(api_url.into());
        self
    }

    /// Sets the project selected on startup.
    pub fn with_initial_project(mut self, project: impl Into<String>) -> Self {
        self.initial_project = Some(project.into());
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Disables ANSI color output.
    pub fn without_color(mut self) -> Self {
        self.use_color = false;
        self
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl From<ChatArgs> for ChatConfig {
    fn from(args: ChatArgs) -> Self {
        ChatConfig {
            api_url: args.api_url,
            initial_project: args.project,
            timeout: args.timeout_secs.map(Duration::from_secs),
            use_color: !args.no_color,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ChatConfig::new();
        assert!(config.api_url.is_none());
        assert!(config.initial_project.is_none());
        assert!(config.timeout.is_none());
        assert!(config.use_color);
    }

    #[test]
    fn config_from_args_defaults() {
        let config = ChatConfig::from(ChatArgs::default());
        assert_eq!(config, ChatConfig::default());
    }

    #[test]
    fn config_from_args_custom() {
        let args = ChatArgs {
            api_url: Some("http://rag.internal:8080".to_string()),
            project: Some("handbook".to_string()),
            timeout_secs: Some(45),
            no_color: true,
        };
        let config = ChatConfig::from(args);
        assert_eq!(config.api_url.as_deref(), Some("http://rag.internal:8080"));
        assert_eq!(config.initial_project.as_deref(), Some("handbook"));
        assert_eq!(config.timeout, Some(Duration::from_secs(45)));
        assert!(!config.use_color);
    }

    #[test]
    fn config_builder_pattern() {
        let config = ChatConfig::new()
            .with_api_url("http://localhost:9000")
            .with_initial_project("p-2")
            .with_timeout(Some(Duration::from_secs(5)))
            .without_color();

        assert_eq!(config.api_url.as_deref(), Some("http://localhost:9000"));
        assert_eq!(config.initial_project.as_deref(), Some("p-2"));
        assert_eq!(config.timeout, Some(Duration::from_secs(5)));
        assert!(!config.use_color);
    }
}
