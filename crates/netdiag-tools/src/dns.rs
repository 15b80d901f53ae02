//! `check dns`: can a well-known hostname be resolved?
//!
//! Success is decided by looking for a marker substring in the lookup
//! tool's output (`Non-authoritative answer` by default). This is a
//! heuristic: a resolver that answers authoritatively, or a localized
//! `nslookup`, is reported as a DNS issue even though resolution worked.
//! The marker is configurable via `dns.success_marker`.

use async_trait::async_trait;
use netdiag_core::{DiagnosticKind, DiagnosticOutcome};

use crate::registry::{Diagnostic, DiagnosticContext};
use crate::ToolError;

pub const DNS_WORKING: &str = "DNS resolution is working.";
pub const DNS_ISSUE: &str = "DNS issue detected.";

pub struct DnsCheck;

#[async_trait]
impl Diagnostic for DnsCheck {
    fn kind(&self) -> DiagnosticKind {
        DiagnosticKind::Dns
    }

    async fn run(&self, ctx: &DiagnosticContext) -> Result<DiagnosticOutcome, ToolError> {
        let output = ctx
            .run(&ctx.platform.dns_lookup(&ctx.config.targets.dns_host))
            .await?;

        let summary = if output.stdout.contains(&ctx.config.dns.success_marker) {
            DNS_WORKING
        } else {
            DNS_ISSUE
        };
        Ok(DiagnosticOutcome::success(summary))
    }
}
