//! # netdiag-tools
//!
//! Diagnostic executors for netdiag.
//!
//! This crate provides:
//! - Process execution behind the [`CommandRunner`] seam
//! - Per-platform invocations of the OS networking utilities
//! - Bandwidth measurement behind the [`BandwidthMeter`] seam
//! - One [`Diagnostic`] implementation per command
//!
//! ## Architecture
//!
//! Diagnostics implement the [`Diagnostic`] trait and are registered with a
//! [`DiagnosticRegistry`] keyed by [`DiagnosticKind`]. Running a diagnostic
//! through the registry never fails: execution faults are folded into a
//! [`DiagnosticOutcome`].
//!
//! ## Example
//!
//! ```ignore
//! use netdiag_core::{Config, DiagnosticKind};
//! use netdiag_tools::{DiagnosticContext, DiagnosticRegistry};
//!
//! let registry = DiagnosticRegistry::with_builtins();
//! let ctx = DiagnosticContext::from_config(&Config::default())?;
//! let outcome = registry.run(DiagnosticKind::Dns, &ctx).await;
//! println!("{}", outcome);
//! ```

use std::sync::Arc;

use netdiag_core::{DiagnosticOutcome, FailureKind};
use thiserror::Error;

pub mod connectivity;
pub mod dns;
pub mod interfaces;
pub mod latency;
pub mod platform;
pub mod process;
pub mod registry;
pub mod restart;
pub mod speed;

pub use netdiag_core::DiagnosticKind;
pub use platform::Platform;
pub use process::{CommandRunner, Invocation, ProcessOutput, SystemRunner};
pub use registry::{Diagnostic, DiagnosticContext, DiagnosticRegistry};
pub use speed::{BandwidthMeter, HttpBandwidthMeter};

// Re-export diagnostics for convenience
pub use connectivity::ConnectivityCheck;
pub use dns::DnsCheck;
pub use interfaces::{IpConfigCheck, RoutesCheck};
pub use latency::LatencyCheck;
pub use restart::RestartNetwork;
pub use speed::SpeedTest;

impl DiagnosticRegistry {
    /// Create a registry with every built-in diagnostic registered.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();

        registry.register(Arc::new(ConnectivityCheck));
        registry.register(Arc::new(IpConfigCheck));
        registry.register(Arc::new(DnsCheck));
        registry.register(Arc::new(LatencyCheck));
        registry.register(Arc::new(SpeedTest));
        registry.register(Arc::new(RestartNetwork));
        registry.register(Arc::new(RoutesCheck));

        registry
    }
}

/// Errors that can occur while running a diagnostic.
#[derive(Debug, Error)]
pub enum ToolError {
    /// No diagnostic is registered for the requested kind.
    #[error("no diagnostic registered for '{0}'")]
    NotRegistered(DiagnosticKind),

    /// The external utility could not be started.
    #[error("failed to launch '{program}': {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The external utility ran past the configured timeout.
    #[error("'{program}' timed out after {seconds} seconds")]
    Timeout { program: String, seconds: u64 },

    /// HTTP transport error during bandwidth measurement.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The speed test server answered with a non-success status.
    #[error("speed test server returned HTTP {status} for {url}")]
    BadStatus { url: String, status: u16 },
}

impl ToolError {
    /// Classify this error for the structured outcome.
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            ToolError::Launch { source, .. } => match source.kind() {
                std::io::ErrorKind::NotFound => FailureKind::NotFound,
                std::io::ErrorKind::PermissionDenied => FailureKind::PermissionDenied,
                _ => FailureKind::Io,
            },
            ToolError::Timeout { .. } => FailureKind::Timeout,
            ToolError::Http(e) if e.is_timeout() => FailureKind::Timeout,
            ToolError::Http(_) | ToolError::BadStatus { .. } => FailureKind::Network,
            ToolError::NotRegistered(_) => FailureKind::Other,
        }
    }

    /// Get a recovery suggestion for this error.
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        self.failure_kind().recovery_suggestion()
    }

    /// Fold this error into the outcome shown to the user.
    pub fn into_outcome(self) -> DiagnosticOutcome {
        DiagnosticOutcome::failed(self.failure_kind(), self.to_string())
    }
}
