//! Approval and lifecycle callbacks used by the router.
//!
//! The router asks a [`PermissionHandler`] before running a diagnostic that
//! changes system state, and notifies a [`RouterEventHandler`] around every
//! diagnostic it runs. Front ends implement both; the types here cover the
//! non-interactive cases.

use async_trait::async_trait;
use netdiag_core::{DiagnosticKind, DiagnosticOutcome};
use tracing::debug;

/// Callback for approving destructive diagnostics.
#[async_trait]
pub trait PermissionHandler: Send + Sync {
    /// Request approval to run `kind`.
    ///
    /// Returns `true` if the diagnostic should proceed.
    async fn request_approval(&self, kind: DiagnosticKind) -> bool;
}

/// A permission handler that approves everything.
///
/// Used for `--yes` and for one-shot runs where no prompt is possible.
pub struct AutoApproveHandler;

#[async_trait]
impl PermissionHandler for AutoApproveHandler {
    async fn request_approval(&self, kind: DiagnosticKind) -> bool {
        debug!(%kind, "Auto-approving diagnostic");
        true
    }
}

/// A permission handler that denies everything.
pub struct DenyAllHandler;

#[async_trait]
impl PermissionHandler for DenyAllHandler {
    async fn request_approval(&self, kind: DiagnosticKind) -> bool {
        debug!(%kind, "Denying diagnostic (DenyAllHandler)");
        false
    }
}

/// Notifications emitted while the router runs a diagnostic.
pub trait RouterEventHandler: Send + Sync {
    /// Called just before a diagnostic starts.
    fn on_start(&self, _kind: DiagnosticKind) {}

    /// Called after a diagnostic finishes, whatever the outcome.
    fn on_complete(&self, _kind: DiagnosticKind, _outcome: &DiagnosticOutcome) {}
}

/// Default event handler that does nothing.
pub struct NoOpEventHandler;

impl RouterEventHandler for NoOpEventHandler {}
