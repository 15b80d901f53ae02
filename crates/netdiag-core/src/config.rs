//! Configuration system for netdiag.

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Main configuration struct for netdiag.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Hosts targeted by the diagnostics
    pub targets: TargetsConfig,
    /// DNS check settings
    pub dns: DnsConfig,
    /// Bandwidth measurement settings
    pub speedtest: SpeedTestConfig,
    /// Network restart settings
    pub restart: RestartConfig,
    /// Process execution settings
    pub execution: ExecutionConfig,
    /// Approval settings
    pub permissions: PermissionsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetsConfig {
    /// Address pinged by `check connectivity`
    pub connectivity_host: String,
    /// Hostname resolved by `check dns`
    pub dns_host: String,
    /// Hostname pinged by `check latency`
    pub latency_host: String,
    /// Echo requests sent per ping
    pub ping_count: u32,
}

impl Default for TargetsConfig {
    fn default() -> Self {
        Self {
            connectivity_host: "8.8.8.8".to_string(),
            dns_host: "google.com".to_string(),
            latency_host: "google.com".to_string(),
            ping_count: 4,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DnsConfig {
    /// Substring of nslookup output that marks a successful lookup
    pub success_marker: String,
}

impl Default for DnsConfig {
    fn default() -> Self {
        Self {
            success_marker: "Non-authoritative answer".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeedTestConfig {
    /// Endpoint streamed for the download measurement
    pub download_url: String,
    /// Endpoint posted to for the upload measurement
    pub upload_url: String,
    /// Bytes requested for the download measurement
    pub download_bytes: u64,
    /// Bytes sent for the upload measurement
    pub upload_bytes: u64,
    /// Seconds allowed for connecting and for each read (idle timeout)
    pub timeout_secs: u64,
}

impl Default for SpeedTestConfig {
    fn default() -> Self {
        Self {
            download_url: "https://speed.cloudflare.com/__down".to_string(),
            upload_url: "https://speed.cloudflare.com/__up".to_string(),
            download_bytes: 25_000_000,
            upload_bytes: 10_000_000,
            timeout_secs: 60,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RestartConfig {
    /// Interface whose lease is renewed (platform default when unset)
    pub interface: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionConfig {
    /// Kill external utilities after this many seconds (no limit when unset)
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PermissionsConfig {
    /// Ask before running diagnostics that change system state
    pub confirm_destructive: bool,
}

impl Default for PermissionsConfig {
    fn default() -> Self {
        Self {
            confirm_destructive: true,
        }
    }
}

/// Validation result with multiple issues.
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    /// List of validation issues
    pub issues: Vec<ValidationIssue>,
}

impl ValidationResult {
    /// Create a new empty validation result.
    pub fn new() -> Self {
        Self { issues: Vec::new() }
    }

    /// Check if validation passed (no errors).
    pub fn is_ok(&self) -> bool {
        !self.issues.iter().any(|i| i.severity == IssueSeverity::Error)
    }

    /// Get only error-level issues.
    pub fn errors(&self) -> Vec<&ValidationIssue> {
        self.issues.iter().filter(|i| i.severity == IssueSeverity::Error).collect()
    }

    /// Get only warning-level issues.
    pub fn warnings(&self) -> Vec<&ValidationIssue> {
        self.issues.iter().filter(|i| i.severity == IssueSeverity::Warning).collect()
    }

    /// Add an error.
    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.issues.push(ValidationIssue {
            severity: IssueSeverity::Error,
            field: field.into(),
            message: message.into(),
        });
    }

    /// Add a warning.
    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.issues.push(ValidationIssue {
            severity: IssueSeverity::Warning,
            field: field.into(),
            message: message.into(),
        });
    }
}

/// A single validation issue.
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    /// Severity of the issue
    pub severity: IssueSeverity,
    /// Field path (e.g., "targets.ping_count")
    pub field: String,
    /// Human-readable message
    pub message: String,
}

/// Severity level for validation issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueSeverity {
    /// Warnings don't prevent loading
    Warning,
    /// Errors prevent loading
    Error,
}

impl Config {
    /// Load configuration from all sources.
    pub fn load() -> Result<Self, figment::Error> {
        Self::load_from(
            &Self::config_file(),
            Path::new(".netdiag/config.toml"),
        )
    }

    /// Load configuration layering a user file and a project file.
    ///
    /// Missing files are skipped. Environment variables prefixed with
    /// `NETDIAG_` win over both, with `__` separating sections
    /// (e.g. `NETDIAG_TARGETS__PING_COUNT=2`).
    pub fn load_from(user_config: &Path, project_config: &Path) -> Result<Self, figment::Error> {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(user_config))
            .merge(Toml::file(project_config))
            .merge(Env::prefixed("NETDIAG_").split("__"))
            .extract()
    }

    /// Load and validate configuration.
    pub fn load_validated() -> Result<Self, Error> {
        let config = Self::load().map_err(|e| Error::Config(e.to_string()))?;
        config.into_validated()
    }

    /// Validate an already-loaded configuration, logging warnings.
    pub fn into_validated(self) -> Result<Self, Error> {
        let result = self.validate();

        if !result.is_ok() {
            let errors: Vec<String> = result
                .errors()
                .iter()
                .map(|e| format!("{}: {}", e.field, e.message))
                .collect();
            return Err(Error::Validation(format!(
                "Configuration validation failed:\n  {}",
                errors.join("\n  ")
            )));
        }

        for warning in result.warnings() {
            tracing::warn!("Config warning - {}: {}", warning.field, warning.message);
        }

        Ok(self)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::new();

        // Targets
        for (field, host) in [
            ("targets.connectivity_host", &self.targets.connectivity_host),
            ("targets.dns_host", &self.targets.dns_host),
            ("targets.latency_host", &self.targets.latency_host),
        ] {
            if host.trim().is_empty() {
                result.add_error(field, "Host cannot be empty");
            } else if host.starts_with('-') {
                result.add_error(field, "Host cannot start with '-'");
            }
        }

        if self.targets.ping_count == 0 {
            result.add_error("targets.ping_count", "ping_count must be greater than 0");
        } else if self.targets.ping_count > 100 {
            result.add_warning(
                "targets.ping_count",
                "ping_count is very high (> 100), checks will take a long time",
            );
        }

        // An empty marker would match every lookup
        if self.dns.success_marker.is_empty() {
            result.add_error("dns.success_marker", "success_marker cannot be empty");
        }

        // Speed test
        for (field, url) in [
            ("speedtest.download_url", &self.speedtest.download_url),
            ("speedtest.upload_url", &self.speedtest.upload_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                result.add_error(field, "URL must start with http:// or https://");
            }
        }

        if self.speedtest.download_bytes == 0 {
            result.add_error("speedtest.download_bytes", "download_bytes must be greater than 0");
        }

        if self.speedtest.upload_bytes == 0 {
            result.add_error("speedtest.upload_bytes", "upload_bytes must be greater than 0");
        }

        if self.speedtest.download_bytes > 1_000_000_000 || self.speedtest.upload_bytes > 1_000_000_000 {
            result.add_warning("speedtest", "transfer sizes above 1 GB make the speed test very slow");
        }

        if self.speedtest.timeout_secs == 0 {
            result.add_error("speedtest.timeout_secs", "timeout_secs must be greater than 0");
        }

        // Restart
        if let Some(ref interface) = self.restart.interface {
            if interface.trim().is_empty() {
                result.add_error("restart.interface", "interface cannot be an empty string");
            }
        }

        // Execution
        if self.execution.timeout_secs == Some(0) {
            result.add_error("execution.timeout_secs", "timeout_secs must be greater than 0");
        }

        result
    }

    /// Render the configuration as TOML.
    pub fn to_toml(&self) -> Result<String, Error> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Get the configuration directory.
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .map(|p| p.join("netdiag"))
            .unwrap_or_else(|| PathBuf::from("~/.config/netdiag"))
    }

    /// Get the user configuration file.
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Get the data directory (REPL history, etc.).
    pub fn data_dir() -> PathBuf {
        dirs::data_local_dir()
            .map(|p| p.join("netdiag"))
            .unwrap_or_else(|| PathBuf::from("~/.local/share/netdiag"))
    }
}
