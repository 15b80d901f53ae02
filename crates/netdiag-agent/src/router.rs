//! Command routing.
//!
//! ```text
//! Front end (REPL / one-shot)
//!   └─> Router (normalize + match + approval)
//!       ├─> PermissionHandler (destructive diagnostics only)
//!       └─> DiagnosticRegistry (lookup and dispatch)
//!           └─> Diagnostic implementations
//! ```
//!
//! Routing never fails: unknown input gets a fixed reply, and execution
//! faults come back as `ExecutionFailed` outcomes.

use std::fmt;
use std::sync::Arc;

use netdiag_core::{help_text, Command, DiagnosticKind, DiagnosticOutcome, UNKNOWN_COMMAND_MESSAGE};
use netdiag_tools::{DiagnosticContext, DiagnosticRegistry};
use serde::Serialize;
use tracing::{debug, info};

use crate::permission::{NoOpEventHandler, PermissionHandler, RouterEventHandler};

/// The router's answer to one line of input.
#[derive(Debug, Clone, Serialize)]
pub struct Reply {
    /// Input as typed
    pub input: String,
    /// Matched command, `None` for unknown input
    pub command: Option<Command>,
    /// Structured outcome
    pub outcome: DiagnosticOutcome,
}

impl Reply {
    /// Whether the input named a known command.
    pub fn is_recognized(&self) -> bool {
        self.command.is_some()
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.outcome)
    }
}

/// Maps input text to diagnostics and runs them.
pub struct Router {
    registry: DiagnosticRegistry,
    context: DiagnosticContext,
    confirm_destructive: bool,
    permissions: Arc<dyn PermissionHandler>,
    events: Arc<dyn RouterEventHandler>,
}

impl Router {
    /// Create a router that confirms destructive diagnostics.
    pub fn new(
        registry: DiagnosticRegistry,
        context: DiagnosticContext,
        permissions: Arc<dyn PermissionHandler>,
    ) -> Self {
        Self {
            registry,
            context,
            confirm_destructive: true,
            permissions,
            events: Arc::new(NoOpEventHandler),
        }
    }

    /// Whether `kind` must be approved before it runs.
    pub fn requires_approval(&self, kind: DiagnosticKind) -> bool {
        self.confirm_destructive && kind.is_destructive()
    }

    /// Route one line of input.
    pub async fn dispatch(&self, input: &str) -> Reply {
        let command = Command::parse(input);

        let outcome = match command {
            Some(command) => {
                info!(%command, "Dispatching command");
                self.execute(command).await
            }
            None => {
                debug!(input = %input.trim(), "Unknown command");
                DiagnosticOutcome::success(UNKNOWN_COMMAND_MESSAGE)
            }
        };

        Reply {
            input: input.to_string(),
            command,
            outcome,
        }
    }

    /// Run an already-parsed command.
    pub async fn execute(&self, command: Command) -> DiagnosticOutcome {
        let kind = match command {
            Command::Help => return DiagnosticOutcome::success(help_text()),
            Command::Diagnostic(kind) => kind,
        };

        if self.requires_approval(kind) {
            debug!(%kind, "Requesting approval");
            if !self.permissions.request_approval(kind).await {
                info!(%kind, "Approval declined");
                return DiagnosticOutcome::declined(format!("{} was not approved.", kind));
            }
        }

        self.events.on_start(kind);
        let outcome = self.registry.run(kind, &self.context).await;
        self.events.on_complete(kind, &outcome);

        outcome
    }
}

/// Builder for constructing a [`Router`].
pub struct RouterBuilder {
    registry: Option<DiagnosticRegistry>,
    context: DiagnosticContext,
    confirm_destructive: bool,
    events: Option<Arc<dyn RouterEventHandler>>,
}

impl RouterBuilder {
    /// Start a builder around an execution context.
    ///
    /// Approval for destructive diagnostics follows
    /// `permissions.confirm_destructive` from the context's configuration.
    pub fn new(context: DiagnosticContext) -> Self {
        let confirm_destructive = context.config.permissions.confirm_destructive;
        Self {
            registry: None,
            context,
            confirm_destructive,
            events: None,
        }
    }

    /// Use a registry with all built-in diagnostics registered.
    pub fn with_builtins(mut self) -> Self {
        self.registry = Some(DiagnosticRegistry::with_builtins());
        self
    }

    /// Use a custom registry.
    pub fn with_registry(mut self, registry: DiagnosticRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Override whether destructive diagnostics need approval.
    pub fn confirm_destructive(mut self, confirm: bool) -> Self {
        self.confirm_destructive = confirm;
        self
    }

    /// Set the lifecycle event handler.
    pub fn event_handler(mut self, handler: Arc<dyn RouterEventHandler>) -> Self {
        self.events = Some(handler);
        self
    }

    /// Build the router with the given permission handler.
    pub fn build(self, permissions: Arc<dyn PermissionHandler>) -> Router {
        let mut router = Router::new(
            self.registry.unwrap_or_default(),
            self.context,
            permissions,
        );
        router.confirm_destructive = self.confirm_destructive;
        if let Some(events) = self.events {
            router.events = events;
        }
        router
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permission::{AutoApproveHandler, DenyAllHandler};
    use async_trait::async_trait;
    use netdiag_core::Config;
    use netdiag_tools::{BandwidthMeter, CommandRunner, Invocation, ProcessOutput, ToolError};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct CountingRunner {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl CommandRunner for CountingRunner {
        async fn run(&self, _invocation: &Invocation) -> Result<ProcessOutput, ToolError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(ProcessOutput {
                exit_code: Some(0),
                ..Default::default()
            })
        }
    }

    struct IdleMeter;

    #[async_trait]
    impl BandwidthMeter for IdleMeter {
        async fn download(&self) -> Result<f64, ToolError> {
            Ok(0.0)
        }

        async fn upload(&self) -> Result<f64, ToolError> {
            Ok(0.0)
        }
    }

    #[derive(Default)]
    struct RecordingEvents {
        events: Mutex<Vec<String>>,
    }

    impl RouterEventHandler for RecordingEvents {
        fn on_start(&self, kind: DiagnosticKind) {
            self.events.lock().unwrap().push(format!("start {}", kind));
        }

        fn on_complete(&self, kind: DiagnosticKind, _outcome: &DiagnosticOutcome) {
            self.events.lock().unwrap().push(format!("complete {}", kind));
        }
    }

    fn router_with(
        runner: Arc<CountingRunner>,
        permissions: Arc<dyn PermissionHandler>,
    ) -> Router {
        let ctx = DiagnosticContext::new(Config::default(), runner, Arc::new(IdleMeter));
        RouterBuilder::new(ctx).with_builtins().build(permissions)
    }

    fn counting_runner() -> Arc<CountingRunner> {
        Arc::new(CountingRunner {
            calls: AtomicUsize::new(0),
        })
    }

    #[tokio::test]
    async fn test_unknown_command() {
        let runner = counting_runner();
        let router = router_with(runner.clone(), Arc::new(AutoApproveHandler));

        let reply = router.dispatch("make coffee").await;
        assert!(!reply.is_recognized());
        assert_eq!(reply.to_string(), UNKNOWN_COMMAND_MESSAGE);
        assert_eq!(runner.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_help() {
        let runner = counting_runner();
        let router = router_with(runner.clone(), Arc::new(AutoApproveHandler));

        let reply = router.dispatch("  HELP ").await;
        assert_eq!(reply.command, Some(Command::Help));
        assert_eq!(reply.to_string(), help_text());
        assert_eq!(runner.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_restart_declined_runs_nothing() {
        let runner = counting_runner();
        let router = router_with(runner.clone(), Arc::new(DenyAllHandler));

        let reply = router.dispatch("Restart Network").await;
        assert_eq!(
            reply.to_string(),
            "Skipped: restart network was not approved."
        );
        assert_eq!(runner.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_confirmation_disabled_skips_handler() {
        let runner = counting_runner();
        let ctx = DiagnosticContext::new(Config::default(), runner.clone(), Arc::new(IdleMeter));
        let router = RouterBuilder::new(ctx)
            .with_builtins()
            .confirm_destructive(false)
            .build(Arc::new(DenyAllHandler));

        assert!(!router.requires_approval(DiagnosticKind::RestartNetwork));
        let reply = router.dispatch("restart network").await;
        assert_eq!(reply.to_string(), "Network adapter restarted successfully.");
        assert_eq!(runner.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_non_destructive_never_asks() {
        let runner = counting_runner();
        let router = router_with(runner.clone(), Arc::new(DenyAllHandler));

        let reply = router.dispatch("check connectivity").await;
        assert_eq!(reply.to_string(), "Network is reachable.");
        assert_eq!(runner.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_event_handler_brackets_diagnostic() {
        let events = Arc::new(RecordingEvents::default());
        let ctx = DiagnosticContext::new(Config::default(), counting_runner(), Arc::new(IdleMeter));
        let router = RouterBuilder::new(ctx)
            .with_builtins()
            .event_handler(events.clone())
            .build(Arc::new(AutoApproveHandler));

        router.dispatch("check routes").await;
        router.dispatch("help").await;

        assert_eq!(
            *events.events.lock().unwrap(),
            vec!["start check routes", "complete check routes"]
        );
    }

    #[tokio::test]
    async fn test_reply_serializes_outcome() {
        let router = router_with(counting_runner(), Arc::new(AutoApproveHandler));
        let reply = router.dispatch("check connectivity").await;

        let value = serde_json::to_value(&reply).unwrap();
        assert_eq!(value["command"]["diagnostic"], "connectivity");
        assert_eq!(value["outcome"]["status"], "success");
        assert_eq!(value["outcome"]["output"], "Network is reachable.");
    }
}
