//! Output rendering for the chat client.
//!
//! This module provides a trait-based rendering abstraction so the session can
//! announce conversation changes without knowing where they are displayed.
//! The default implementation writes to stdout with optional ANSI styling.

use std::io::{self, Stdout, Write};

use crate::types::{Message, Project};

/// ANSI escape code for dim text (used for the loading indicator).
const ANSI_DIM: &str = "\x1b[2m";

/// ANSI escape code for bold text (used for speaker labels).
const ANSI_BOLD: &str = "\x1b[1m";

/// ANSI escape code to reset all styling.
const ANSI_RESET: &str = "\x1b[0m";

/// ANSI escape code for cyan text (used for proof chips).
const ANSI_CYAN: &str = "\x1b[36m";

/// ANSI escape code for green text (used for the selected project).
const ANSI_GREEN: &str = "\x1b[32m";

/// ANSI escape code that returns to column 0 and clears the line.
const ANSI_CLEAR_LINE: &str = "\r\x1b[2K";

/// Trait for rendering chat output.
pub trait Renderer: Send {
    /// Print one conversation message, including its proof chips.
    fn print_message(&mut self, message: &Message);

    /// Show that a reply is outstanding.
    fn print_loading(&mut self);

    /// Remove the loading indicator once the reply (or its fallback) is in.
    fn finish_loading(&mut self);

    /// Print the greeting shown while the conversation is empty.
    fn print_welcome(&mut self);

    /// Print the selector: its label and every available project.
    fn print_projects(&mut self, label: &str, projects: &[Project], selected: Option<&str>);

    /// Print an error message.
    fn print_error(&mut self, error: &str);

    /// Print an informational message.
    fn print_info(&mut self, info: &str);

    /// Bring the end of the conversation into view.
    ///
    /// Called after every change to the message list.  Best effort.
    fn scroll_to_end(&mut self);

    /// Print a whole conversation, or the welcome text when it is empty.
    fn print_conversation(&mut self, messages: &[Message]) {
        if messages.is_empty() {
            self.print_welcome();
        } else {
            for message in messages {
                self.print_message(message);
            }
        }
        self.scroll_to_end();
    }
}

/// Plain text renderer with optional ANSI styling.
pub struct PlainTextRenderer<W: Write + Send = Stdout> {
    out: W,
    use_color: bool,
    loading: bool,
}

impl PlainTextRenderer<Stdout> {
    /// Creates a new PlainTextRenderer with ANSI colors enabled.
    pub fn new() -> Self {
        Self::with_color(true)
    }

    /// Creates a new PlainTextRenderer with specified color setting.
    pub fn with_color(use_color: bool) -> Self {
        Self::with_writer(io::stdout(), use_color)
    }
}

impl<W: Write + Send> PlainTextRenderer<W> {
    /// Creates a renderer that writes to `out`.
    pub fn with_writer(out: W, use_color: bool) -> Self {
        Self {
            out,
            use_color,
            loading: false,
        }
    }

    /// Consumes the renderer and returns its writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn style(&self, code: &'static str) -> &'static str {
        if self.use_color { code } else { "" }
    }

    fn clear_loading(&mut self) {
        if self.loading {
            let clear = if self.use_color { ANSI_CLEAR_LINE } else { "" };
            let _ = write!(self.out, "{clear}");
            self.loading = false;
        }
    }
}

impl Default for PlainTextRenderer<Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write + Send> Renderer for PlainTextRenderer<W> {
    fn print_message(&mut self, message: &Message) {
        self.clear_loading();
        let (bold, cyan, reset) = (
            self.style(ANSI_BOLD),
            self.style(ANSI_CYAN),
            self.style(ANSI_RESET),
        );
        let speaker = if message.is_user { "You" } else { "Assistant" };
        let _ = writeln!(self.out, "{bold}{speaker}:{reset} {}", message.text);

        let chips = message.proof_chips();
        if !chips.is_empty() {
            let chips = chips
                .iter()
                .map(|name| format!("{cyan}[{name}]{reset}"))
                .collect::<Vec<_>>()
                .join(" ");
            let _ = writeln!(self.out, "  REF {chips}");
        }
    }

    fn print_loading(&mut self) {
        if self.use_color {
            let _ = write!(self.out, "{ANSI_DIM}Assistant is thinking...{ANSI_RESET}");
        } else {
            let _ = writeln!(self.out, "Assistant is thinking...");
        }
        self.loading = self.use_color;
        let _ = self.out.flush();
    }

    fn finish_loading(&mut self) {
        self.clear_loading();
        let _ = self.out.flush();
    }

    fn print_welcome(&mut self) {
        let _ = writeln!(self.out, "Start a conversation");
        let _ = writeln!(self.out, "Type a message to begin chatting");
    }

    fn print_projects(&mut self, label: &str, projects: &[Project], selected: Option<&str>) {
        self.clear_loading();
        let (bold, green, reset) = (
            self.style(ANSI_BOLD),
            self.style(ANSI_GREEN),
            self.style(ANSI_RESET),
        );
        let _ = writeln!(self.out, "{bold}Project:{reset} {label}");
        if projects.is_empty() {
            let _ = writeln!(self.out, "  (no projects)");
        }
        for project in projects {
            if selected == Some(project.id.as_str()) {
                let _ = writeln!(self.out, "  {green}* {} ({}){reset}", project.name, project.id);
            } else {
                let _ = writeln!(self.out, "    {} ({})", project.name, project.id);
            }
        }
    }

    fn print_error(&mut self, error: &str) {
        self.clear_loading();
        let _ = self.out.flush();
        eprintln!("Error: {error}");
    }

    fn print_info(&mut self, info: &str) {
        self.clear_loading();
        let _ = writeln!(self.out, "{info}");
    }

    fn scroll_to_end(&mut self) {
        let _ = self.out.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Proof;

    fn render(f: impl FnOnce(&mut PlainTextRenderer<Vec<u8>>)) -> String {
        let mut renderer = PlainTextRenderer::with_writer(Vec::new(), false);
        f(&mut renderer);
        String::from_utf8(renderer.into_inner()).unwrap()
    }

    #[test]
    fn renderer_default_has_color() {
        let renderer = PlainTextRenderer::new();
        assert!(renderer.use_color);
    }

    #[test]
    fn renderer_without_color() {
        let renderer = PlainTextRenderer::with_color(false);
        assert!(!renderer.use_color);
    }

    #[test]
    fn proof_chips_are_deduplicated() {
        let message = Message::assistant(
            "See the docs.",
            Some(vec![
                Proof::new(1, "a", 0.9),
                Proof::new(2, "a", 0.8),
                Proof::new(3, "b", 0.7),
            ]),
        );
        let output = render(|r| r.print_message(&message));
        assert_eq!(output, "Assistant: See the docs.\n  REF [a] [b]\n");
    }

    #[test]
    fn empty_proofs_print_no_chips() {
        let message = Message::assistant("Hi there", Some(vec![]));
        let output = render(|r| r.print_message(&message));
        assert_eq!(output, "Assistant: Hi there\n");
    }

    #[test]
    fn user_message() {
        let output = render(|r| r.print_message(&Message::user("hello")));
        assert_eq!(output, "You: hello\n");
    }

    #[test]
    fn empty_conversation_prints_welcome() {
        let output = render(|r| r.print_conversation(&[]));
        assert!(output.contains("Start a conversation"));
        assert!(output.contains("Type a message to begin chatting"));
    }

    #[test]
    fn projects_mark_selection() {
        let projects = vec![Project::new("a", "Alpha"), Project::new("b", "Beta")];
        let output = render(|r| r.print_projects("Beta", &projects, Some("b")));
        assert_eq!(
            output,
            "Project: Beta\n    Alpha (a)\n  * Beta (b)\n"
        );
    }

    #[test]
    fn no_projects_shows_placeholder() {
        let output = render(|r| r.print_projects("Select Project", &[], None));
        assert_eq!(output, "Project: Select Project\n  (no projects)\n");
    }

    #[test]
    fn colored_loading_is_cleared_before_next_message() {
        let mut renderer = PlainTextRenderer::with_writer(Vec::new(), true);
        renderer.print_loading();
        renderer.print_message(&Message::assistant("done", None));
        let output = String::from_utf8(renderer.into_inner()).unwrap();
        let clear = output.find(ANSI_CLEAR_LINE).unwrap();
        let reply = output.find("done").unwrap();
        assert!(clear < reply);
    }
}
