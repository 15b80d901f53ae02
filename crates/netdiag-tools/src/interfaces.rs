//! `check ip` and `check routes`: verbatim dumps of interface and routing state.

use async_trait::async_trait;
use netdiag_core::{DiagnosticKind, DiagnosticOutcome};

use crate::registry::{Diagnostic, DiagnosticContext};
use crate::ToolError;

/// Shows the platform's interface configuration.
pub struct IpConfigCheck;

#[async_trait]
impl Diagnostic for IpConfigCheck {
    fn kind(&self) -> DiagnosticKind {
        DiagnosticKind::IpConfig
    }

    async fn run(&self, ctx: &DiagnosticContext) -> Result<DiagnosticOutcome, ToolError> {
        let output = ctx.run(&ctx.platform.ip_config()).await?;
        Ok(DiagnosticOutcome::success(output.stdout))
    }
}

/// Shows the platform's routing table.
pub struct RoutesCheck;

#[async_trait]
impl Diagnostic for RoutesCheck {
    fn kind(&self) -> DiagnosticKind {
        DiagnosticKind::Routes
    }

    async fn run(&self, ctx: &DiagnosticContext) -> Result<DiagnosticOutcome, ToolError> {
        let output = ctx.run(&ctx.platform.routes()).await?;
        Ok(DiagnosticOutcome::success(output.stdout))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{context, ScriptedRunner, Step};
    use crate::Platform;

    #[tokio::test]
    async fn test_ip_config_verbatim() {
        let raw = "Windows IP Configuration\r\n\r\nEthernet adapter Ethernet:\r\n";
        let runner = ScriptedRunner::new(vec![Step::Exit { code: 0, stdout: raw }]);
        let ctx = context(runner.clone(), Platform::Windows);

        let outcome = IpConfigCheck.run(&ctx).await.unwrap();
        assert_eq!(outcome.to_string(), raw);
        assert_eq!(runner.calls()[0].to_string(), "ipconfig");
    }

    #[tokio::test]
    async fn test_routes_verbatim() {
        let raw = "default via 192.168.1.1 dev wlan0 proto dhcp metric 600\n";
        let runner = ScriptedRunner::new(vec![Step::Exit { code: 0, stdout: raw }]);
        let ctx = context(runner.clone(), Platform::Linux);

        let outcome = RoutesCheck.run(&ctx).await.unwrap();
        assert_eq!(outcome.to_string(), raw);
        assert_eq!(runner.calls()[0].to_string(), "ip route show");
    }

    #[tokio::test]
    async fn test_routes_missing_utility() {
        let runner = ScriptedRunner::new(vec![Step::Missing]);
        let ctx = context(runner, Platform::MacOs);

        let err = RoutesCheck.run(&ctx).await.unwrap_err();
        assert_eq!(
            err.into_outcome().to_string(),
            "Error: failed to launch 'netstat': No such file or directory (os error 2)"
        );
    }
}
