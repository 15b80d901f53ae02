//! Event and permission handlers for CLI integration.
//!
//! This module provides:
//! - [`CliEventHandler`]: shows a spinner while a diagnostic runs
//! - [`CliPermissionHandler`]: prompts before destructive diagnostics (y/n/a)

use std::collections::HashSet;
use std::io::{self, Write};
use std::time::Duration;

use async_trait::async_trait;
use indicatif::{ProgressBar, ProgressStyle};
use parking_lot::Mutex;

use netdiag_agent::{PermissionHandler, RouterEventHandler};
use netdiag_core::{DiagnosticKind, DiagnosticOutcome};

// ============================================================================
// CLI Event Handler
// ============================================================================

/// Event handler that shows progress on stderr.
///
/// A spinner is drawn while a diagnostic runs (a speed test can take tens of
/// seconds). Failures get a recovery hint when one is known.
pub struct CliEventHandler {
    spinner: Mutex<Option<ProgressBar>>,
}

impl CliEventHandler {
    /// Create a new CLI event handler.
    pub fn new() -> Self {
        Self {
            spinner: Mutex::new(None),
        }
    }
}

impl Default for CliEventHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl RouterEventHandler for CliEventHandler {
    fn on_start(&self, kind: DiagnosticKind) {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "✓"])
            .template("{spinner} {msg}")
        {
            spinner.set_style(style);
        }
        spinner.set_message(format!("Running {}...", kind));
        spinner.enable_steady_tick(Duration::from_millis(80));

        *self.spinner.lock() = Some(spinner);
    }

    fn on_complete(&self, _kind: DiagnosticKind, outcome: &DiagnosticOutcome) {
        if let Some(spinner) = self.spinner.lock().take() {
            spinner.finish_and_clear();
        }

        if let Some(hint) = outcome
            .failure_kind()
            .and_then(|kind| kind.recovery_suggestion())
        {
            eprintln!("[Hint: {}]", hint);
        }
    }
}

// ============================================================================
// CLI Permission Handler
// ============================================================================

/// Permission handler that prompts the user for approval.
///
/// Supports the following responses:
/// - `y` or `yes`: run this time
/// - `n` or `no` (or empty): skip
/// - `a` or `always`: run, and stop asking for this diagnostic
///
/// Diagnostics marked as "always approved" are tracked for the lifetime of
/// the handler.
pub struct CliPermissionHandler {
    always_approved: Mutex<HashSet<DiagnosticKind>>,
}

impl CliPermissionHandler {
    /// Create a new CLI permission handler.
    pub fn new() -> Self {
        Self {
            always_approved: Mutex::new(HashSet::new()),
        }
    }

    /// Check if a diagnostic is in the always-approved set.
    pub fn is_always_approved(&self, kind: DiagnosticKind) -> bool {
        self.always_approved.lock().contains(&kind)
    }

    /// Mark a diagnostic as always approved.
    pub fn set_always_approved(&self, kind: DiagnosticKind) {
        self.always_approved.lock().insert(kind);
    }

    /// Read user input for approval (sync blocking version).
    fn prompt_user_sync(kind: DiagnosticKind) -> ApprovalResponse {
        eprintln!();
        eprintln!("'{}' will: {}", kind, kind.description());
        eprintln!("This changes the network configuration of this machine.");
        eprint!("Proceed? [y]es / [n]o / [a]lways: ");
        io::stderr().flush().ok();

        let mut input = String::new();
        if io::stdin().read_line(&mut input).is_err() {
            return ApprovalResponse::Deny;
        }

        parse_response(&input)
    }
}

impl Default for CliPermissionHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Response from the user for approval request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ApprovalResponse {
    /// Approve this single run
    Approve,
    /// Skip this run
    Deny,
    /// Approve and stop asking
    AlwaysApprove,
}

fn parse_response(input: &str) -> ApprovalResponse {
    match input.trim().to_lowercase().as_str() {
        "y" | "yes" => ApprovalResponse::Approve,
        "n" | "no" | "" => ApprovalResponse::Deny,
        "a" | "always" => ApprovalResponse::AlwaysApprove,
        _ => {
            eprintln!("Unknown response, skipping.");
            ApprovalResponse::Deny
        }
    }
}

#[async_trait]
impl PermissionHandler for CliPermissionHandler {
    async fn request_approval(&self, kind: DiagnosticKind) -> bool {
        if self.is_always_approved(kind) {
            eprintln!("[{}] Auto-approved", kind);
            return true;
        }

        // stdin read is blocking I/O
        let response = tokio::task::spawn_blocking(move || Self::prompt_user_sync(kind))
            .await
            .unwrap_or(ApprovalResponse::Deny);

        match response {
            ApprovalResponse::Approve => true,
            ApprovalResponse::AlwaysApprove => {
                self.set_always_approved(kind);
                true
            }
            ApprovalResponse::Deny => false,
        }
    }
}
