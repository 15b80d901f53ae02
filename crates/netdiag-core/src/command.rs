//! The fixed command set understood by the router.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Reply for any input that is not one of the fixed commands.
pub const UNKNOWN_COMMAND_MESSAGE: &str = "Unknown command. Try 'help' for a list of commands.";

/// A diagnostic backed by an external utility or the bandwidth meter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// Ping a well-known address and report reachability
    Connectivity,
    /// Dump the platform's interface configuration
    IpConfig,
    /// Resolve a well-known hostname
    Dns,
    /// Ping a well-known hostname and show the raw output
    Latency,
    /// Measure download and upload bandwidth
    Speed,
    /// Release and renew the address lease
    RestartNetwork,
    /// Dump the routing table
    Routes,
}

impl DiagnosticKind {
    /// All diagnostics, in the order they are listed by `help`.
    pub const ALL: [DiagnosticKind; 7] = [
        DiagnosticKind::Connectivity,
        DiagnosticKind::IpConfig,
        DiagnosticKind::Dns,
        DiagnosticKind::Latency,
        DiagnosticKind::Speed,
        DiagnosticKind::RestartNetwork,
        DiagnosticKind::Routes,
    ];

    /// The literal a user types to run this diagnostic.
    pub fn phrase(&self) -> &'static str {
        match self {
            DiagnosticKind::Connectivity => "check connectivity",
            DiagnosticKind::IpConfig => "check ip",
            DiagnosticKind::Dns => "check dns",
            DiagnosticKind::Latency => "check latency",
            DiagnosticKind::Speed => "check speed",
            DiagnosticKind::RestartNetwork => "restart network",
            DiagnosticKind::Routes => "check routes",
        }
    }

    /// One-line description for listings.
    pub fn description(&self) -> &'static str {
        match self {
            DiagnosticKind::Connectivity => "Ping a public address and report whether it answers",
            DiagnosticKind::IpConfig => "Show interface addresses and configuration",
            DiagnosticKind::Dns => "Look up a well-known hostname",
            DiagnosticKind::Latency => "Ping a well-known hostname and show round-trip times",
            DiagnosticKind::Speed => "Measure download and upload bandwidth",
            DiagnosticKind::RestartNetwork => "Release and renew the network address lease",
            DiagnosticKind::Routes => "Show the routing table",
        }
    }

    /// Whether running this diagnostic changes system state.
    pub fn is_destructive(&self) -> bool {
        matches!(self, DiagnosticKind::RestartNetwork)
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.phrase())
    }
}

/// A recognized command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    /// Run a diagnostic
    Diagnostic(DiagnosticKind),
    /// List the available commands
    Help,
}

impl Command {
    /// Every recognized command, in help order.
    pub const ALL: [Command; 8] = [
        Command::Diagnostic(DiagnosticKind::Connectivity),
        Command::Diagnostic(DiagnosticKind::IpConfig),
        Command::Diagnostic(DiagnosticKind::Dns),
        Command::Diagnostic(DiagnosticKind::Latency),
        Command::Diagnostic(DiagnosticKind::Speed),
        Command::Diagnostic(DiagnosticKind::RestartNetwork),
        Command::Diagnostic(DiagnosticKind::Routes),
        Command::Help,
    ];

    /// Parse free text into a command.
    ///
    /// Matching is exact after trimming and lowercasing; there is no prefix
    /// or fuzzy matching.
    pub fn parse(input: &str) -> Option<Command> {
        let normalized = normalize(input);
        Self::ALL
            .iter()
            .copied()
            .find(|command| command.phrase() == normalized)
    }

    /// The literal a user types for this command.
    pub fn phrase(&self) -> &'static str {
        match self {
            Command::Diagnostic(kind) => kind.phrase(),
            Command::Help => "help",
        }
    }

    /// One-line description for listings.
    pub fn description(&self) -> &'static str {
        match self {
            Command::Diagnostic(kind) => kind.description(),
            Command::Help => "List the available commands",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.phrase())
    }
}

/// Normalize user input for matching.
pub fn normalize(input: &str) -> String {
    input.trim().to_lowercase()
}

/// The fixed reply to `help`.
pub fn help_text() -> String {
    let mut text = String::from("Available commands:");
    for command in Command::ALL {
        text.push_str("\n- ");
        text.push_str(command.phrase());
    }
    text
}
