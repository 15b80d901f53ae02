//! # netdiag-cli
//!
//! Command-line interface for netdiag.

use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use netdiag_agent::{PermissionHandler, Router, RouterBuilder, RouterEventHandler};
use netdiag_core::error::format_error_with_suggestion;
use netdiag_core::Config;
use netdiag_tools::DiagnosticContext;

mod commands;
mod tui;

/// Application context containing shared state.
pub struct AppContext {
    pub config: Config,
}

impl AppContext {
    /// Build a router over the built-in diagnostics.
    pub fn router(
        &self,
        permissions: Arc<dyn PermissionHandler>,
        events: Arc<dyn RouterEventHandler>,
    ) -> anyhow::Result<Router> {
        let context = DiagnosticContext::from_config(&self.config)?;
        Ok(RouterBuilder::new(context)
            .with_builtins()
            .event_handler(events)
            .build(permissions))
    }
}

/// netdiag - chat-style network diagnostics
#[derive(Parser)]
#[command(name = "netdiag")]
#[command(author, version, about, long_about = None)]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    /// Run a single command (e.g. "check dns") and exit
    #[arg(value_name = "COMMAND")]
    input: Option<String>,

    /// Approve destructive diagnostics without prompting
    #[arg(short, long)]
    yes: bool,

    /// Print the one-shot reply as JSON
    #[arg(long)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the commands the router understands
    List,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Show version information
    Version,
    /// Check that the required utilities and privileges are available
    Doctor,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show the effective configuration
    Show,
    /// Print the user config file path
    Path,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout carries only replies
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config = Config::load_validated().unwrap_or_else(|e| {
        tracing::warn!(
            "Failed to load config, using defaults: {}",
            format_error_with_suggestion(&e)
        );
        Config::default()
    });

    let ctx = Arc::new(AppContext { config });

    match cli.command {
        Some(Commands::List) => {
            commands::list::run();
        }
        Some(Commands::Config { action }) => {
            commands::config::handle(action, &ctx)?;
        }
        Some(Commands::Version) => {
            println!("netdiag {}", env!("CARGO_PKG_VERSION"));
        }
        Some(Commands::Doctor) => {
            commands::doctor::run(&ctx);
        }
        None => match cli.input {
            Some(ref input) => {
                let succeeded = commands::oneshot::run(input, &cli, &ctx).await?;
                if !succeeded {
                    return Ok(ExitCode::FAILURE);
                }
            }
            None => tui::run(cli, ctx).await?,
        },
    }

    Ok(ExitCode::SUCCESS)
}
