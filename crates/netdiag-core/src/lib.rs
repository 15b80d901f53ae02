//! # netdiag-core
//!
//! Core types and abstractions for netdiag, a chat-style front end for
//! canned network diagnostics.
//!
//! This crate provides:
//! - The fixed command set and its help text
//! - Structured diagnostic outcomes
//! - Chat transcript primitives
//! - Configuration system
//! - Common error types

pub mod command;
pub mod config;
pub mod error;
pub mod message;
pub mod outcome;

pub use command::{help_text, Command, DiagnosticKind, UNKNOWN_COMMAND_MESSAGE};
pub use config::Config;
pub use error::Error;
pub use message::{ChatMessage, Sender, Transcript};
pub use outcome::{DiagnosticOutcome, FailureKind};
