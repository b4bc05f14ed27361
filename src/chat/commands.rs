//! Slash command parsing for the chat application.
//!
//! This module handles parsing of special commands that start with `/`,
//! allowing users to control the client without sending messages to the
//! backend.

/// A parsed chat command.
///
/// These commands control the client and are not sent to the backend.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatCommand {
    /// List the available projects and the current selection.
    Projects,

    /// Select a project by id.
    Project(String),

    /// Fetch the project list again.
    Reload,

    /// Print the whole conversation.
    History,

    /// Save the conversation to a file.
    SaveTranscript(String),

    /// Display session statistics.
    Stats,

    /// Display help information.
    Help,

    /// Exit the chat application.
    Quit,

    /// Report a parsing error back to the caller.
    Invalid(String),
}

/// Parses user input for slash commands.
///
/// Returns `Some(ChatCommand)` if the input is a command, or `None` if it
/// should be sent as a chat message.
///
/// # Examples
///
/// ```
/// # use proofchat::chat::parse_command;
/// assert!(parse_command("/quit").is_some());
/// assert!(parse_command("/project handbook").is_some());
/// assert!(parse_command("What is the refund policy?").is_none());
/// ```
pub fn parse_command(input: &str) -> Option<ChatCommand> {
    let input = input.trim();

    let rest = input.strip_prefix('/')?;
    let mut parts = rest.splitn(2, ' ');
    let command = parts.next()?.to_lowercase();
    let argument = parts.next().map(|s| s.trim()).filter(|s| !s.is_empty());

    let result = match command.as_str() {
        "projects" | "ls" => ChatCommand::Projects,
        "project" | "use" => match argument {
            Some(id) => ChatCommand::Project(id.to_string()),
            None => ChatCommand::Projects,
        },
        "reload" | "refresh" => ChatCommand::Reload,
        "history" => ChatCommand::History,
        "save" => match argument {
            Some(path) => ChatCommand::SaveTranscript(path.to_string()),
            None => ChatCommand::Invalid("/save requires a file path".to_string()),
        },
        "stats" | "status" => ChatCommand::Stats,
        "help" | "?" => ChatCommand::Help,
        "quit" | "exit" | "q" => ChatCommand::Quit,
        _ => ChatCommand::Invalid(format!("Unknown command: /{}", command)),
    };

    Some(result)
}

/// Returns help text describing available commands.
pub fn help_text() -> &'static str {
    r#"Available commands:
  /projects              List projects and show the current selection
  /project <id>          Select a project (clears the conversation)
  /reload                Fetch the project list again
  /history               Print the whole conversation
  /save <file>           Save the conversation as JSON
  /stats                 Show session statistics
  /help                  Show this help message
  /quit                  Exit the chat"#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_quit_commands() {
        assert_eq!(parse_command("/quit"), Some(ChatCommand::Quit));
        assert_eq!(parse_command("/exit"), Some(ChatCommand::Quit));
        assert_eq!(parse_command("/q"), Some(ChatCommand::Quit));
        assert_eq!(parse_command("  /quit  "), Some(ChatCommand::Quit));
    }

    #[test]
    fn parse_project() {
        assert_eq!(
            parse_command("/project handbook"),
            Some(ChatCommand::Project("handbook".to_string()))
        );
        assert_eq!(
            parse_command("/PROJECT   team docs  "),
            Some(ChatCommand::Project("team docs".to_string()))
        );
        assert_eq!(parse_command("/project"), Some(ChatCommand::Projects));
        assert_eq!(parse_command("/projects"), Some(ChatCommand::Projects));
    }

    #[test]
    fn parse_reload_and_history() {
        assert_eq!(parse_command("/reload"), Some(ChatCommand::Reload));
        assert_eq!(parse_command("/refresh"), Some(ChatCommand::Reload));
        assert_eq!(parse_command("/history"), Some(ChatCommand::History));
    }

    #[test]
    fn parse_save() {
        assert_eq!(
            parse_command("/save chat.json"),
            Some(ChatCommand::SaveTranscript("chat.json".to_string()))
        );
        assert!(matches!(
            parse_command("/save"),
            Some(ChatCommand::Invalid(msg)) if msg.contains("requires")
        ));
    }

    #[test]
    fn parse_unknown() {
        assert_eq!(
            parse_command("/model x"),
            Some(ChatCommand::Invalid("Unknown command: /model".to_string()))
        );
    }

    #[test]
    fn non_commands() {
        assert_eq!(parse_command("Hello!"), None);
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command("  "), None);
        assert_eq!(parse_command("a/b"), None);
    }

    #[test]
    fn help_text_not_empty() {
        let help = help_text();
        assert!(help.contains("/quit"));
        assert!(help.contains("/project <id>"));
        assert!(help.contains("/reload"));
    }
}
