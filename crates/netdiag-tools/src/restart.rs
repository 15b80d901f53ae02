//! `restart network`: release and renew the address lease.

use async_trait::async_trait;
use netdiag_core::{DiagnosticKind, DiagnosticOutcome};
use tracing::{info, warn};

use crate::registry::{Diagnostic, DiagnosticContext};
use crate::ToolError;

pub const RESTARTED: &str = "Network adapter restarted successfully.";

/// Runs the release and renew commands in sequence.
///
/// Exit statuses are logged but do not change the reply; only a failure to
/// launch either command is reported as an error.
pub struct RestartNetwork;

#[async_trait]
impl Diagnostic for RestartNetwork {
    fn kind(&self) -> DiagnosticKind {
        DiagnosticKind::RestartNetwork
    }

    async fn run(&self, ctx: &DiagnosticContext) -> Result<DiagnosticOutcome, ToolError> {
        let interface = ctx.config.restart.interface.as_deref();

        for invocation in [
            ctx.platform.lease_release(interface),
            ctx.platform.lease_renew(interface),
        ] {
            let output = ctx.run(&invocation).await?;
            if output.success() {
                info!(command = %invocation, "Lease command completed");
            } else {
                warn!(
                    command = %invocation,
                    exit_code = ?output.exit_code,
                    stderr = %output.stderr.trim(),
                    "Lease command exited unsuccessfully"
                );
            }
        }

        Ok(DiagnosticOutcome::success(RESTARTED))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{context, ScriptedRunner, Step};
    use crate::Platform;

    #[tokio::test]
    async fn test_release_then_renew() {
        let runner = ScriptedRunner::new(vec![]);
        let ctx = context(runner.clone(), Platform::Windows);

        let outcome = RestartNetwork.run(&ctx).await.unwrap();
        assert_eq!(outcome.to_string(), RESTARTED);

        let calls: Vec<String> = runner.calls().iter().map(|c| c.to_string()).collect();
        assert_eq!(calls, vec!["ipconfig /release", "ipconfig /renew"]);
    }

    #[tokio::test]
    async fn test_fixed_message_despite_failures() {
        let runner = ScriptedRunner::new(vec![
            Step::Exit { code: 1, stdout: "" },
            Step::Exit { code: 2, stdout: "" },
        ]);
        let mut ctx = context(runner.clone(), Platform::Linux);
        ctx.config.restart.interface = Some("eth0".to_string());

        let outcome = RestartNetwork.run(&ctx).await.unwrap();
        assert_eq!(outcome.to_string(), RESTARTED);

        let calls: Vec<String> = runner.calls().iter().map(|c| c.to_string()).collect();
        assert_eq!(calls, vec!["dhclient -r eth0", "dhclient eth0"]);
    }

    #[tokio::test]
    async fn test_launch_failure_stops_sequence() {
        let runner = ScriptedRunner::new(vec![Step::Missing]);
        let ctx = context(runner.clone(), Platform::Linux);

        let err = RestartNetwork.run(&ctx).await.unwrap_err();
        assert!(err.to_string().contains("dhclient"));
        assert_eq!(runner.calls().len(), 1);
    }
}
