//! `check connectivity`: is a well-known address reachable?

use async_trait::async_trait;
use netdiag_core::{DiagnosticKind, DiagnosticOutcome};

use crate::registry::{Diagnostic, DiagnosticContext};
use crate::ToolError;

pub const REACHABLE: &str = "Network is reachable.";
pub const UNREACHABLE: &str = "No network connectivity.";

/// Pings the configured address; the exit status alone decides the answer.
pub struct ConnectivityCheck;

#[async_trait]
impl Diagnostic for ConnectivityCheck {
    fn kind(&self) -> DiagnosticKind {
        DiagnosticKind::Connectivity
    }

    async fn run(&self, ctx: &DiagnosticContext) -> Result<DiagnosticOutcome, ToolError> {
        let targets = &ctx.config.targets;
        let output = ctx
            .run(&ctx.platform.ping(&targets.connectivity_host, targets.ping_count))
            .await?;

        let summary = if output.success() { REACHABLE } else { UNREACHABLE };
        Ok(DiagnosticOutcome::success(summary))
    }
}
