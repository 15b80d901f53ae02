//! Diagnostic command to check installation.

use std::env;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use netdiag_core::config::IssueSeverity;
use netdiag_core::Config;
use netdiag_tools::Platform;

use crate::AppContext;

pub fn run(ctx: &AppContext) {
    println!("Running diagnostics...\n");

    let platform = Platform::current();
    println!("Platform: {}", platform);

    // Check utilities
    println!("\nUtilities:");
    let search_path = env::var_os("PATH");
    for program in platform.required_programs() {
        match find_program(&program, search_path.as_deref()) {
            Some(path) => println!("  ✓ {} ({})", program, path.display()),
            None => println!("  ✗ {} not found on PATH", program),
        }
    }

    // Check privileges
    println!("\nPrivileges:");
    match is_privileged() {
        Some(true) => println!("  ✓ Running with elevated privileges"),
        Some(false) => {
            println!("  ✗ Not elevated ('restart network' will likely fail)");
        }
        None => println!("  ? Unable to determine on this platform"),
    }

    // Check config
    let config_file = Config::config_file();
    println!("\nConfig file: {:?}", config_file);
    if config_file.exists() {
        println!("  ✓ Exists");
    } else {
        println!("  ✗ Does not exist (defaults in use)");
    }

    let project_file = Path::new(".netdiag/config.toml");
    if project_file.exists() {
        println!("Project config: {:?}", project_file);
    }

    let result = ctx.config.validate();
    if result.issues.is_empty() {
        println!("  ✓ Configuration is valid");
    }
    for issue in &result.issues {
        let marker = match issue.severity {
            IssueSeverity::Error => "✗",
            IssueSeverity::Warning => "!",
        };
        println!("  {} {}: {}", marker, issue.field, issue.message);
    }

    // Check data directory
    let data_dir = Config::data_dir();
    println!("\nData directory: {:?}", data_dir);
    if data_dir.exists() {
        println!("  ✓ Exists");
    } else {
        println!("  ✗ Does not exist (will be created on first use)");
    }

    println!("\nDiagnostics complete.");
}

/// Locate `program` in the given `PATH`-style search list.
fn find_program(program: &str, search_path: Option<&OsStr>) -> Option<PathBuf> {
    let cwd = env::current_dir().ok()?;
    which::which_in(program, search_path, cwd).ok()
}

#[cfg(unix)]
fn is_privileged() -> Option<bool> {
    Some(nix::unistd::geteuid().is_root())
}

#[cfg(not(unix))]
fn is_privileged() -> Option<bool> {
    None
}
