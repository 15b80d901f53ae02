//! Terminal UI for interactive mode.
//!
//! Provides a readline-style chat REPL with:
//! - Input history persisted between runs
//! - Slash commands
//! - A User/System transcript for the lifetime of the REPL
//! - Approval prompts for destructive diagnostics

use std::path::PathBuf;
use std::sync::Arc;

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use netdiag_agent::{AutoApproveHandler, PermissionHandler, Router};
use netdiag_core::{ChatMessage, Config, Transcript};

use crate::{AppContext, Cli};

mod commands;
mod handlers;

pub use handlers::{CliEventHandler, CliPermissionHandler};

/// Run the interactive REPL.
pub async fn run(cli: Cli, ctx: Arc<AppContext>) -> anyhow::Result<()> {
    let permissions: Arc<dyn PermissionHandler> = if cli.yes {
        Arc::new(AutoApproveHandler)
    } else {
        Arc::new(CliPermissionHandler::new())
    };
    let router = ctx.router(permissions, Arc::new(CliEventHandler::new()))?;

    print_welcome_banner(&cli, &ctx);

    let mut transcript = Transcript::new();
    let mut editor = DefaultEditor::new()?;

    // Load history if it exists
    let history_path = get_history_path();
    if history_path.exists() {
        let _ = editor.load_history(&history_path);
    }

    // Main REPL loop
    loop {
        match editor.readline(">>> ") {
            Ok(line) => {
                let line = line.trim();

                if line.is_empty() {
                    continue;
                }

                let _ = editor.add_history_entry(line);

                if line.starts_with('/') {
                    match commands::handle_command(line, &transcript) {
                        commands::CommandResult::Continue => continue,
                        commands::CommandResult::Exit => break,
                        commands::CommandResult::Error(e) => {
                            eprintln!("Error: {}", e);
                            continue;
                        }
                    }
                }

                process_message(line, &router, &mut transcript).await;
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("\nGoodbye!");
                break;
            }
            Err(err) => {
                eprintln!("Error: {:?}", err);
                break;
            }
        }
    }

    // Save history
    if let Some(parent) = history_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    let _ = editor.save_history(&history_path);

    Ok(())
}

/// Route one line and append both sides of the exchange to the transcript.
async fn process_message(input: &str, router: &Router, transcript: &mut Transcript) {
    let user = transcript.push(ChatMessage::user(input));
    println!("{}", user);

    let reply = router.dispatch(input).await;

    let system = transcript.push(ChatMessage::system(reply.to_string()));
    println!("{}", system);
    println!();
}

/// Print the welcome banner.
fn print_welcome_banner(cli: &Cli, ctx: &AppContext) {
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!(
        "║  netdiag v{:<51}║",
        env!("CARGO_PKG_VERSION")
    );
    println!("╠══════════════════════════════════════════════════════════════╣");
    println!("║  Type 'help' for diagnostics, /help for REPL commands.       ║");
    println!("║  Press Ctrl+D to exit.                                       ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    println!(
        "[Targets: ping {} | dns {} | latency {}]",
        ctx.config.targets.connectivity_host,
        ctx.config.targets.dns_host,
        ctx.config.targets.latency_host
    );

    if cli.yes {
        println!("[Approval prompts disabled]");
    } else if !ctx.config.permissions.confirm_destructive {
        println!("[Destructive diagnostics run without confirmation]");
    }
    println!();
}

/// Get the path to the history file.
fn get_history_path() -> PathBuf {
    Config::data_dir().join("history.txt")
}
