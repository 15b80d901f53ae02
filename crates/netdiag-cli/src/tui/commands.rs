//! Slash command handling for the REPL.

use netdiag_core::{help_text, Transcript};

/// Result of command execution.
#[derive(Debug, PartialEq, Eq)]
pub enum CommandResult {
    /// Continue the REPL loop
    Continue,
    /// Exit the REPL
    Exit,
    /// An error occurred
    Error(String),
}

/// Handle a slash command.
pub fn handle_command(input: &str, transcript: &Transcript) -> CommandResult {
    let parts: Vec<&str> = input.split_whitespace().collect();
    let command = parts.first().copied().unwrap_or("");
    let args = parts.get(1..).unwrap_or_default();

    match command {
        "/help" | "/h" | "/?" => {
            print_help();
            CommandResult::Continue
        }
        "/exit" | "/quit" | "/q" => {
            println!("Goodbye!");
            CommandResult::Exit
        }
        "/clear" => {
            // Clear screen using ANSI escape codes
            print!("\x1B[2J\x1B[1;1H");
            CommandResult::Continue
        }
        "/commands" => {
            println!("{}", help_text());
            CommandResult::Continue
        }
        "/history" => handle_history_command(args, transcript),
        _ => CommandResult::Error(format!(
            "Unknown command: {}. Type /help for available commands.",
            command
        )),
    }
}

/// Print help information.
fn print_help() {
    println!("Available commands:");
    println!();
    println!("  /help, /h, /?     Show this help message");
    println!("  /exit, /quit, /q  Exit the REPL");
    println!("  /clear            Clear the screen");
    println!("  /commands         List the diagnostics you can ask for");
    println!("  /history [n]      Show the last n messages (default 10)");
    println!();
    println!("Anything else is sent as a command, e.g. 'check dns'.");
    println!();
    println!("Tips:");
    println!("  - Press Ctrl+D to exit");
    println!("  - Use Up/Down arrows for input history");
    println!("  - Start netdiag with -y to skip approval prompts");
}

/// Handle /history command.
fn handle_history_command(args: &[&str], transcript: &Transcript) -> CommandResult {
    let limit = match args.first() {
        Some(arg) => match arg.parse::<usize>() {
            Ok(n) => n,
            Err(_) => {
                return CommandResult::Error(format!("Invalid message count: {}", arg));
            }
        },
        None => 10,
    };

    print!("{}", render_history(transcript, limit));
    CommandResult::Continue
}

fn render_history(transcript: &Transcript, limit: usize) -> String {
    if transcript.is_empty() {
        return "No messages yet.\n".to_string();
    }

    let recent = transcript.recent(limit);
    let mut out = format!(
        "Recent messages ({} of {}):\n\n",
        recent.len(),
        transcript.len()
    );
    for msg in recent {
        let first_line = msg.text.lines().next().unwrap_or("");
        let more = if msg.text.lines().nth(1).is_some() {
            " ..."
        } else {
            ""
        };
        out.push_str(&format!(
            "[{}] {}: {}{}\n",
            msg.timestamp.format("%H:%M:%S"),
            msg.sender,
            first_line,
            more
        ));
    }
    out
}
