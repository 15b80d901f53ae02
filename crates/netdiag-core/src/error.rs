//! Error types for netdiag.
//!
//! Errors raised by diagnostics themselves never reach this type: they are
//! folded into a [`DiagnosticOutcome`](crate::DiagnosticOutcome) at the point
//! of invocation. This enum covers configuration loading and serialization.

use thiserror::Error;

/// Main error type for netdiag.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// TOML serialization error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::ser::Error),
}

impl Error {
    /// Get a recovery suggestion for this error.
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            Error::Config(_) | Error::Validation(_) => {
                Some("Check your config file at ~/.config/netdiag/config.toml")
            }
            _ => None,
        }
    }
}

/// Format an error with its recovery suggestion.
pub fn format_error_with_suggestion(error: &Error) -> String {
    let mut output = error.to_string();
    if let Some(suggestion) = error.recovery_suggestion() {
        output.push_str(&format!("\n  Suggestion: {}", suggestion));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_has_suggestion() {
        let err = Error::Config("bad value".to_string());
        assert!(err.to_string().contains("bad value"));
        assert!(err.recovery_suggestion().is_some());
    }

    #[test]
    fn test_format_with_suggestion() {
        let err = Error::Validation("targets.ping_count: must be greater than 0".to_string());
        let formatted = format_error_with_suggestion(&err);
        assert!(formatted.starts_with("Validation error: targets.ping_count"));
        assert!(formatted.contains("\n  Suggestion: "));
    }

    #[test]
    fn test_toml_error_has_no_suggestion() {
        let err = Error::Toml(<toml::ser::Error as serde::ser::Error>::custom("unsupported"));
        assert!(err.recovery_suggestion().is_none());
        assert!(!format_error_with_suggestion(&err).contains("Suggestion:"));
    }
}
