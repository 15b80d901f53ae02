//! End-to-end routing tests against the built-in diagnostics with fake
//! process and bandwidth backends.

use std::collections::HashMap;
use std::io;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use netdiag_agent::{AutoApproveHandler, DenyAllHandler, Router, RouterBuilder};
use netdiag_core::{
    help_text, Command, Config, DiagnosticKind, DiagnosticOutcome, FailureKind,
    UNKNOWN_COMMAND_MESSAGE,
};
use netdiag_tools::{
    BandwidthMeter, CommandRunner, Diagnostic, DiagnosticContext, DiagnosticRegistry, Invocation,
    Platform, ProcessOutput, ToolError,
};

/// Runner that records invocations and answers with a fixed result.
struct FakeRunner {
    exit_code: i32,
    stdout: String,
    missing: bool,
    calls: Mutex<Vec<String>>,
}

impl FakeRunner {
    fn ok(stdout: &str) -> Arc<Self> {
        Arc::new(Self {
            exit_code: 0,
            stdout: stdout.to_string(),
            missing: false,
            calls: Mutex::new(Vec::new()),
        })
    }

    fn missing() -> Arc<Self> {
        Arc::new(Self {
            exit_code: 0,
            stdout: String::new(),
            missing: true,
            calls: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandRunner for FakeRunner {
    async fn run(&self, invocation: &Invocation) -> Result<ProcessOutput, ToolError> {
        self.calls.lock().unwrap().push(invocation.to_string());
        if self.missing {
            return Err(ToolError::Launch {
                program: invocation.program.clone(),
                source: io::Error::from(io::ErrorKind::NotFound),
            });
        }
        Ok(ProcessOutput {
            exit_code: Some(self.exit_code),
            stdout: self.stdout.clone(),
            stderr: String::new(),
        })
    }
}

struct FakeMeter {
    fail: bool,
}

#[async_trait]
impl BandwidthMeter for FakeMeter {
    async fn download(&self) -> Result<f64, ToolError> {
        if self.fail {
            return Err(ToolError::BadStatus {
                url: "https://speed.test/down".to_string(),
                status: 500,
            });
        }
        Ok(50_000_000.0)
    }

    async fn upload(&self) -> Result<f64, ToolError> {
        Ok(10_000_000.0)
    }
}

fn router(runner: Arc<FakeRunner>, meter_fails: bool) -> Router {
    let ctx = DiagnosticContext::new(
        Config::default(),
        runner,
        Arc::new(FakeMeter { fail: meter_fails }),
    )
    .with_platform(Platform::Linux);
    RouterBuilder::new(ctx)
        .with_builtins()
        .build(Arc::new(AutoApproveHandler))
}

/// Diagnostic that only counts how often it ran.
struct CountingDiagnostic {
    kind: DiagnosticKind,
    counts: Arc<Mutex<HashMap<DiagnosticKind, usize>>>,
}

#[async_trait]
impl Diagnostic for CountingDiagnostic {
    fn kind(&self) -> DiagnosticKind {
        self.kind
    }

    async fn run(&self, _ctx: &DiagnosticContext) -> Result<DiagnosticOutcome, ToolError> {
        *self.counts.lock().unwrap().entry(self.kind).or_default() += 1;
        Ok(DiagnosticOutcome::success(format!("ran {}", self.kind)))
    }
}

#[tokio::test]
async fn test_every_command_routes_once_regardless_of_case() {
    let counts = Arc::new(Mutex::new(HashMap::new()));
    let mut registry = DiagnosticRegistry::new();
    for kind in DiagnosticKind::ALL {
        registry.register(Arc::new(CountingDiagnostic {
            kind,
            counts: counts.clone(),
        }));
    }

    let ctx = DiagnosticContext::new(
        Config::default(),
        FakeRunner::ok(""),
        Arc::new(FakeMeter { fail: false }),
    );
    let router = RouterBuilder::new(ctx)
        .with_registry(registry)
        .build(Arc::new(AutoApproveHandler));

    let inputs = [
        "Check Connectivity",
        "CHECK IP",
        "  check dns  ",
        "Check Latency",
        "check SPEED",
        "Restart Network",
        "check Routes",
        "HeLp",
    ];

    for input in inputs {
        let reply = router.dispatch(input).await;
        assert!(reply.is_recognized(), "{input} should be recognized");
    }

    let counts = counts.lock().unwrap();
    for kind in DiagnosticKind::ALL {
        assert_eq!(counts.get(&kind), Some(&1), "{kind} should run exactly once");
    }
}

#[tokio::test]
async fn test_unknown_input_runs_nothing() {
    let runner = FakeRunner::ok("");
    let router = router(runner.clone(), false);

    for input in ["", "   ", "check", "check dns please", "ping google.com"] {
        let reply = router.dispatch(input).await;
        assert_eq!(reply.command, None);
        assert_eq!(reply.to_string(), UNKNOWN_COMMAND_MESSAGE);
    }

    assert!(runner.calls().is_empty());
}

#[tokio::test]
async fn test_help_lists_all_commands() {
    let router = router(FakeRunner::ok(""), false);

    let reply = router.dispatch("help").await;
    assert_eq!(reply.to_string(), help_text());
    for command in Command::ALL {
        assert!(reply.to_string().contains(&format!("- {}", command)));
    }
}

#[tokio::test]
async fn test_declined_restart_runs_no_process() {
    let runner = FakeRunner::ok("");
    let ctx = DiagnosticContext::new(
        Config::default(),
        runner.clone(),
        Arc::new(FakeMeter { fail: false }),
    );
    let router = RouterBuilder::new(ctx)
        .with_builtins()
        .build(Arc::new(DenyAllHandler));

    let reply = router.dispatch("restart network").await;
    assert_eq!(reply.to_string(), "Skipped: restart network was not approved.");
    assert!(runner.calls().is_empty());
}

#[tokio::test]
async fn test_approved_restart_releases_then_renews() {
    let runner = FakeRunner::ok("");
    let router = router(runner.clone(), false);

    let reply = router.dispatch("restart network").await;
    assert_eq!(reply.to_string(), "Network adapter restarted successfully.");
    assert_eq!(runner.calls(), vec!["dhclient -r", "dhclient"]);
}

#[tokio::test]
async fn test_passthrough_output_is_verbatim() {
    let table = "default via 192.168.1.1 dev eth0\n";
    let runner = FakeRunner::ok(table);
    let router = router(runner.clone(), false);

    assert_eq!(router.dispatch("check routes").await.to_string(), table);
    assert_eq!(router.dispatch("check ip").await.to_string(), table);
    assert_eq!(router.dispatch("check latency").await.to_string(), table);
    assert_eq!(
        runner.calls(),
        vec!["ip route show", "ip addr show", "ping -c 4 google.com"]
    );
}

#[tokio::test]
async fn test_speed_reports_both_directions() {
    let router = router(FakeRunner::ok(""), false);

    let reply = router.dispatch("check speed").await;
    assert_eq!(
        reply.to_string(),
        "Download Speed: 50.00 Mbps\nUpload Speed: 10.00 Mbps"
    );
}

#[tokio::test]
async fn test_execution_faults_become_error_replies() {
    let router = router(FakeRunner::missing(), true);

    for kind in DiagnosticKind::ALL {
        let outcome = router.execute(Command::Diagnostic(kind)).await;
        assert!(outcome.is_failure(), "{kind} should fail");
        assert!(
            outcome.to_string().starts_with("Error: "),
            "{kind} rendered as {outcome}"
        );
    }

    let reply = router.dispatch("check dns").await;
    assert_eq!(reply.outcome.failure_kind(), Some(FailureKind::NotFound));
    let reply = router.dispatch("check speed").await;
    assert_eq!(reply.outcome.failure_kind(), Some(FailureKind::Network));
}
