//! Diagnostic registry and execution context.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use netdiag_core::{Config, DiagnosticKind, DiagnosticOutcome};
use tracing::{debug, warn};

use crate::platform::Platform;
use crate::process::{CommandRunner, Invocation, ProcessOutput, SystemRunner};
use crate::speed::{BandwidthMeter, HttpBandwidthMeter};
use crate::ToolError;

/// Everything a diagnostic needs to run.
#[derive(Clone)]
pub struct DiagnosticContext {
    /// Effective configuration
    pub config: Config,
    /// Platform deciding which utilities to invoke
    pub platform: Platform,
    /// Process runner
    pub runner: Arc<dyn CommandRunner>,
    /// Bandwidth meter
    pub meter: Arc<dyn BandwidthMeter>,
}

impl DiagnosticContext {
    /// Create a context for the current platform.
    pub fn new(
        config: Config,
        runner: Arc<dyn CommandRunner>,
        meter: Arc<dyn BandwidthMeter>,
    ) -> Self {
        Self {
            config,
            platform: Platform::current(),
            runner,
            meter,
        }
    }

    /// Create a context with the system runner and the HTTP meter.
    pub fn from_config(config: &Config) -> Result<Self, ToolError> {
        let runner = SystemRunner::new()
            .with_timeout(config.execution.timeout_secs.map(Duration::from_secs));
        let meter = HttpBandwidthMeter::from_config(&config.speedtest)?;
        Ok(Self::new(config.clone(), Arc::new(runner), Arc::new(meter)))
    }

    /// Override the platform.
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// Run an invocation through the context's runner.
    pub async fn run(&self, invocation: &Invocation) -> Result<ProcessOutput, ToolError> {
        self.runner.run(invocation).await
    }
}

/// Trait for implementing diagnostics.
///
/// A diagnostic performs one external invocation (or one bandwidth
/// measurement) and maps the result to an outcome. Returning `Err` is how a
/// diagnostic reports an execution fault; the registry turns it into an
/// `ExecutionFailed` outcome.
#[async_trait]
pub trait Diagnostic: Send + Sync {
    /// The command this diagnostic answers.
    fn kind(&self) -> DiagnosticKind;

    /// Run the diagnostic.
    async fn run(&self, ctx: &DiagnosticContext) -> Result<DiagnosticOutcome, ToolError>;
}

/// Registry of available diagnostics.
pub struct DiagnosticRegistry {
    diagnostics: HashMap<DiagnosticKind, Arc<dyn Diagnostic>>,
}

impl DiagnosticRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            diagnostics: HashMap::new(),
        }
    }

    /// Register a diagnostic, replacing any previous one of the same kind.
    pub fn register(&mut self, diagnostic: Arc<dyn Diagnostic>) {
        self.diagnostics.insert(diagnostic.kind(), diagnostic);
    }

    /// Get a diagnostic by kind.
    pub fn get(&self, kind: DiagnosticKind) -> Option<Arc<dyn Diagnostic>> {
        self.diagnostics.get(&kind).cloned()
    }

    /// Check if a diagnostic is registered.
    pub fn contains(&self, kind: DiagnosticKind) -> bool {
        self.diagnostics.contains_key(&kind)
    }

    /// Registered kinds, in help order.
    pub fn kinds(&self) -> Vec<DiagnosticKind> {
        DiagnosticKind::ALL
            .into_iter()
            .filter(|kind| self.contains(*kind))
            .collect()
    }

    /// Get the number of registered diagnostics.
    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Run a diagnostic, folding any execution fault into the outcome.
    pub async fn run(&self, kind: DiagnosticKind, ctx: &DiagnosticContext) -> DiagnosticOutcome {
        let Some(diagnostic) = self.get(kind) else {
            warn!(%kind, "No diagnostic registered");
            return ToolError::NotRegistered(kind).into_outcome();
        };

        let start = Instant::now();
        let result = diagnostic.run(ctx).await;
        let elapsed_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(outcome) => {
                debug!(%kind, elapsed_ms, "Diagnostic finished");
                outcome
            }
            Err(e) => {
                warn!(%kind, elapsed_ms, error = %e, "Diagnostic failed");
                e.into_outcome()
            }
        }
    }
}

impl Default for DiagnosticRegistry {
    fn default() -> Self {
        Self::new()
    }
}
