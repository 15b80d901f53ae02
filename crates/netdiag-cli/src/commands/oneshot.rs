//! One-shot mode: dispatch a single command and exit.

use std::io::IsTerminal;
use std::sync::Arc;

use netdiag_agent::{DenyAllHandler, NoOpEventHandler, PermissionHandler, RouterEventHandler};

use crate::tui::{CliEventHandler, CliPermissionHandler};
use crate::{AppContext, Cli};

/// Run `input` through the router and print the reply.
///
/// Returns `false` when the diagnostic failed to execute.
pub async fn run(input: &str, cli: &Cli, ctx: &Arc<AppContext>) -> anyhow::Result<bool> {
    let permissions: Arc<dyn PermissionHandler> = if cli.yes {
        Arc::new(netdiag_agent::AutoApproveHandler)
    } else if std::io::stdin().is_terminal() {
        Arc::new(CliPermissionHandler::new())
    } else {
        // Nobody to ask
        Arc::new(DenyAllHandler)
    };

    let events: Arc<dyn RouterEventHandler> = if cli.json {
        Arc::new(NoOpEventHandler)
    } else {
        Arc::new(CliEventHandler::new())
    };

    let router = ctx.router(permissions, events)?;
    let reply = router.dispatch(input).await;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&reply)?);
    } else {
        println!("{}", reply);
    }

    Ok(!reply.outcome.is_failure())
}
