//! Structured results of running a diagnostic.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Why a diagnostic could not run to completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The external utility is not installed or not on PATH
    NotFound,
    /// The OS refused to launch the utility
    PermissionDenied,
    /// The configured execution timeout elapsed
    Timeout,
    /// A network request made by the diagnostic failed
    Network,
    /// Any other I/O fault while launching or reading the utility
    Io,
    /// Anything else
    Other,
}

impl FailureKind {
    /// A hint for getting past this kind of failure.
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            FailureKind::NotFound => {
                Some("Install the utility or add it to PATH; run 'netdiag doctor' to check")
            }
            FailureKind::PermissionDenied => Some("Re-run with elevated privileges"),
            FailureKind::Timeout => Some("Raise execution.timeout_secs in the config file"),
            FailureKind::Network => Some("Check your internet connection or the speedtest URLs"),
            FailureKind::Io | FailureKind::Other => None,
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FailureKind::NotFound => "not found",
            FailureKind::PermissionDenied => "permission denied",
            FailureKind::Timeout => "timeout",
            FailureKind::Network => "network",
            FailureKind::Io => "io",
            FailureKind::Other => "other",
        };
        f.write_str(label)
    }
}

/// Outcome of a single routed command.
///
/// Renders (via `Display`) to the text shown to the user:
/// the raw output on success, `Error: <message>` on failure and
/// `Skipped: <reason>` when a destructive diagnostic was not approved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DiagnosticOutcome {
    /// The diagnostic ran; `output` is raw tool output or a summary sentence
    Success { output: String },
    /// Launching or talking to the external facility failed
    ExecutionFailed { kind: FailureKind, message: String },
    /// The diagnostic was not run because approval was declined
    Declined { reason: String },
}

impl DiagnosticOutcome {
    /// Create a successful outcome.
    pub fn success(output: impl Into<String>) -> Self {
        DiagnosticOutcome::Success {
            output: output.into(),
        }
    }

    /// Create a failed outcome.
    pub fn failed(kind: FailureKind, message: impl Into<String>) -> Self {
        DiagnosticOutcome::ExecutionFailed {
            kind,
            message: message.into(),
        }
    }

    /// Create a declined outcome.
    pub fn declined(reason: impl Into<String>) -> Self {
        DiagnosticOutcome::Declined {
            reason: reason.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, DiagnosticOutcome::Success { .. })
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, DiagnosticOutcome::ExecutionFailed { .. })
    }

    /// The failure kind, if this is a failure.
    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            DiagnosticOutcome::ExecutionFailed { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

impl fmt::Display for DiagnosticOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticOutcome::Success { output } => f.write_str(output),
            DiagnosticOutcome::ExecutionFailed { message, .. } => write!(f, "Error: {}", message),
            DiagnosticOutcome::Declined { reason } => write!(f, "Skipped: {}", reason),
        }
    }
}
