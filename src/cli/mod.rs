//! CLI module for run-tests
//!
//! ```text
//! run-tests <TEST_DIR>
//! ```
//!
//! ## Modules
//!
//! - `test_interfaces` - Discovery/execution traits and their filesystem/process implementations
//! - `test_runner` - Data model, reporter, and the sequential run loop
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod test_interfaces;
pub mod test_runner;

use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::Parser;

use crate::version::VERSION;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    /// Every discovered test passed (or there were none).
    pub const SUCCESS: ExitCode = ExitCode(0);
    /// At least one test exited non-zero.
    pub const FAILURE: ExitCode = ExitCode(1);
    /// The run could not complete: bad directory or a test that could not be started. Same value clap uses for
    /// usage errors.
    pub const ABORTED: ExitCode = ExitCode(2);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    /// Create a new CLI error with a message and exit code.
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Run every test executable in a directory and report a pass/fail summary
#[derive(Parser, Debug)]
#[command(name = "run-tests")]
#[command(version = VERSION)]
#[command(about = "Run every test executable in a directory and report a pass/fail summary", long_about = None)]
pub struct Cli {
    /// Directory containing the test executables (test_* files, or *.exe on Windows)
    #[arg(value_name = "TEST_DIR")]
    pub test_dir: PathBuf,
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. Argument errors exit through clap (code 2) before any
/// test output is written.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    test_runner::run_tests(&cli.test_dir)
}

// ============================================================================
// Tests
// ============================================================================
