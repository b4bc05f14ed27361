//! Interactive chat client for project-scoped document Q&A backends.
//!
//! This binary lists the backend's projects, keeps a conversation for the
//! selected one, and prints each reply with the files it cites.
//!
//! # Usage
//!
//! ```bash
//! # Talk to a backend on http://localhost:5000
//! proofchat-chat
//!
//! # Point at another backend and start in a given project
//! proofchat-chat --api-url http://rag.internal:8080 --project handbook
//!
//! # Disable colors (useful for piping output)
//! proofchat-chat --no-color
//! ```
//!
//! Set `RUST_LOG=proofchat=debug` to see request logging on stderr.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use arrrg::CommandLine;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing_subscriber::EnvFilter;

use proofchat::chat::{
    ChatArgs, ChatCommand, ChatConfig, ChatSession, PlainTextRenderer, ProjectSelector, Renderer,
    help_text, parse_command,
};
use proofchat::Client;

/// Main entry point for the proofchat-chat application.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("proofchat=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let (args, _) = ChatArgs::from_command_line_relaxed("proofchat-chat [OPTIONS]");
    let config = ChatConfig::from(args);

    let client = Client::with_options(config.api_url.clone(), config.timeout)?;
    let mut renderer = PlainTextRenderer::with_color(config.use_color);
    let mut rl = DefaultEditor::new()?;

    let mut selector = ProjectSelector::new();
    if let Some(project) = &config.initial_project {
        selector.select_project(project.clone());
    }
    selector.load(&client).await;
    let mut session = ChatSession::new();
    session.sync_with(&selector);

    // Flag for abandoning a reply that is taking too long
    let interrupted = Arc::new(AtomicBool::new(false));

    // Set up Ctrl+C handler
    let interrupted_clone = interrupted.clone();
    ctrlc::set_handler(move || {
        interrupted_clone.store(true, Ordering::Relaxed);
    })?;

    println!("proofchat ({})", client.base_url());
    renderer.print_projects(
        selector.label(),
        selector.projects(),
        selector.selected_id(),
    );
    println!("Type /help for commands, /quit to exit\n");
    renderer.print_conversation(session.messages());

    loop {
        // Reset interrupt flag before each input
        interrupted.store(false, Ordering::Relaxed);

        let readline = rl.readline("You: ");

        match readline {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(line.as_str());

                if let Some(cmd) = parse_command(&line) {
                    match cmd {
                        ChatCommand::Quit => {
                            println!("Goodbye!");
                            break;
                        }
                        ChatCommand::Projects => {
                            renderer.print_projects(
                                selector.label(),
                                selector.projects(),
                                selector.selected_id(),
                            );
                        }
                        ChatCommand::Project(id) => {
                            if selector.find(&id).is_none() {
                                renderer.print_error(&format!("No project with id {id}"));
                                continue;
                            }
                            selector.select_project(id);
                            if session.sync_with(&selector) {
                                renderer.print_info(&format!(
                                    "Switched to {}. Conversation cleared.",
                                    selector.label()
                                ));
                                renderer.print_conversation(session.messages());
                            } else {
                                renderer.print_info(&format!("Already using {}.", selector.label()));
                            }
                        }
                        ChatCommand::Reload => {
                            if selector.reload(&client).await {
                                renderer.print_info(&format!(
                                    "Loaded {} project(s).",
                                    selector.projects().len()
                                ));
                            } else {
                                renderer.print_info(
                                    "Could not refresh projects; keeping the current list.",
                                );
                            }
                            if session.sync_with(&selector) {
                                renderer.print_conversation(session.messages());
                            }
                            renderer.print_projects(
                                selector.label(),
                                selector.projects(),
                                selector.selected_id(),
                            );
                        }
                        ChatCommand::History => {
                            renderer.print_conversation(session.messages());
                        }
                        ChatCommand::SaveTranscript(path) => {
                            match session.save_transcript_to(&path) {
                                Ok(_) => {
                                    renderer.print_info(&format!("Transcript saved to {}", path))
                                }
                                Err(err) => renderer
                                    .print_error(&format!("Failed to save transcript: {}", err)),
                            }
                        }
                        ChatCommand::Stats => {
                            print_stats(&selector, &session);
                        }
                        ChatCommand::Help => {
                            for line in help_text().lines() {
                                println!("    {}", line);
                            }
                        }
                        ChatCommand::Invalid(message) => {
                            renderer.print_error(&message);
                        }
                    }
                    continue;
                }

                // Regular message - send to the backend
                session.set_input(line);
                if let Err(e) = session
                    .submit(&client, &mut renderer, &interrupted)
                    .await
                {
                    if e.is_validation() {
                        renderer.print_info("Select a project first (/projects).");
                    } else {
                        renderer.print_error(&e.to_string());
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl+C at prompt - soft interrupt
                println!();
                continue;
            }
            Err(ReadlineError::Eof) => {
                // Ctrl+D - exit
                println!("\nGoodbye!");
                break;
            }
            Err(err) => {
                renderer.print_error(&format!("Input error: {}", err));
                break;
            }
        }
    }

    Ok(())
}

fn print_stats(selector: &ProjectSelector, session: &ChatSession) {
    let stats = session.stats();
    println!("    Session Statistics:");
    println!("      Project: {}", selector.label());
    if let Some(id) = stats.project_id.as_deref() {
        println!("      Project id: {}", id);
    }
    println!("      Projects available: {}", selector.projects().len());
    println!("      Messages: {}", stats.message_count);
    println!("      Sends: {}", stats.total_sends);
    println!("      Failed replies: {}", stats.failed_replies);
    println!("      Dropped stale replies: {}", stats.stale_replies);
}
