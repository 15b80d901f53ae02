//! `check latency`: raw ping output for a well-known hostname.

use async_trait::async_trait;
use netdiag_core::{DiagnosticKind, DiagnosticOutcome};

use crate::registry::{Diagnostic, DiagnosticContext};
use crate::ToolError;

pub struct LatencyCheck;

#[async_trait]
impl Diagnostic for LatencyCheck {
    fn kind(&self) -> DiagnosticKind {
        DiagnosticKind::Latency
    }

    async fn run(&self, ctx: &DiagnosticContext) -> Result<DiagnosticOutcome, ToolError> {
        let targets = &ctx.config.targets;
        let output = ctx
            .run(&ctx.platform.ping(&targets.latency_host, targets.ping_count))
            .await?;

        // No numeric extraction: the round-trip lines are shown as-is.
        Ok(DiagnosticOutcome::success(output.stdout))
    }
}
