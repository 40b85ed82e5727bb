//! Test runner implementation
//!
//! ## TestReporter Trait
//!
//! The test runner uses a `TestReporter` trait to separate reporting from execution. `ConsoleReporter` writes the
//! plain-text report to any `io::Write` sink; stdout in the CLI, a buffer in tests.
//!
//! ## I/O Boundaries
//!
//! Discovery and execution go through the traits in `test_interfaces.rs`. The loop in [`run_suite`] is strictly
//! sequential: each test is spawned, waited on, and fully reported before the next one starts.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::test_interfaces::{
    DefaultTestDiscovery, DefaultTestExecutor, ExecutionOutcome, TestDiscovery, TestError, TestExecutor,
};
use super::{CliError, CliResult, ExitCode};

// ============================================================================
// Data model
// ============================================================================

/// A directory entry selected for execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCandidate {
    /// File name as listed in the directory.
    pub name: String,
    /// Full path used to spawn the test.
    pub path: PathBuf,
}

/// Classification of one executed test, derived only from its exit code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunResult {
    Success,
    Failure { code: i32, output: Vec<u8> },
}

impl RunResult {
    pub fn from_outcome(outcome: ExecutionOutcome) -> Self {
        if outcome.code == 0 {
            RunResult::Success
        } else {
            RunResult::Failure {
                code: outcome.code,
                output: outcome.output,
            }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, RunResult::Success)
    }
}

/// Aggregate counts for a run. `succeeded <= total` always holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub succeeded: usize,
}

impl RunSummary {
    pub fn record(&mut self, result: &RunResult) {
        self.total += 1;
        if result.is_success() {
            self.succeeded += 1;
        }
    }

    pub fn failed(&self) -> usize {
        self.total - self.succeeded
    }

    /// True for an empty run as well.
    pub fn all_passed(&self) -> bool {
        self.succeeded == self.total
    }

    pub fn exit_code(&self) -> ExitCode {
        if self.all_passed() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        }
    }
}

// ============================================================================
// Test Reporter Trait
// ============================================================================

/// Trait for reporting test execution results.
pub trait TestReporter {
    /// Called once discovery has produced the candidate list
    fn on_collection_complete(&mut self, _test_count: usize) -> io::Result<()> {
        Ok(())
    }

    /// Called right before a test is spawned
    fn on_test_start(&mut self, test: &TestCandidate) -> io::Result<()>;

    /// Called when a test process has exited
    fn on_test_complete(&mut self, test: &TestCandidate, result: &RunResult) -> io::Result<()>;

    /// Called when all tests have completed
    fn on_run_complete(&mut self, summary: &RunSummary) -> io::Result<()>;
}

/// Plain-text reporter.
///
/// ```text
/// Testing test_a... OK!
/// Testing test_b... Failed with return code 2!
/// Output:
///
/// boom
/// 1 of 2 tests finished sucessfully.
/// ```
///
/// The summary keeps the historical "sucessfully" spelling; scripts match on that line.
pub struct ConsoleReporter<W: Write> {
    out: W,
}

impl ConsoleReporter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> TestReporter for ConsoleReporter<W> {
    fn on_test_start(&mut self, test: &TestCandidate) -> io::Result<()> {
        write!(self.out, "Testing {}... ", test.name)?;
        // A hung test should still show its name.
        self.out.flush()
    }

    fn on_test_complete(&mut self, _test: &TestCandidate, result: &RunResult) -> io::Result<()> {
        match result {
            RunResult::Success => writeln!(self.out, "OK!"),
            RunResult::Failure { code, output } => {
                writeln!(self.out, "Failed with return code {}!", code)?;
                writeln!(self.out, "Output:\n")?;
                self.out.write_all(output)?;
                writeln!(self.out)
            }
        }
    }

    fn on_run_complete(&mut self, summary: &RunSummary) -> io::Result<()> {
        writeln!(
            self.out,
            "{} of {} tests finished sucessfully.",
            summary.succeeded, summary.total
        )?;
        self.out.flush()
    }
}

// ============================================================================
// Running
// ============================================================================

/// Run every candidate in `dir` and report as each one finishes.
///
/// Returns the summary once all tests ran. Any `TestError` (unreadable directory, a test that cannot be spawned,
/// a failed write) aborts the run immediately and no summary is reported.
#[tracing::instrument(skip_all, fields(dir = %dir.display()))]
pub fn run_suite<D, E, R>(dir: &Path, discovery: &D, executor: &E, reporter: &mut R) -> Result<RunSummary, TestError>
where
    D: TestDiscovery + ?Sized,
    E: TestExecutor + ?Sized,
    R: TestReporter + ?Sized,
{
    let candidates = discovery.discover(dir)?;
    tracing::info!(count = candidates.len(), "collected tests");
    reporter.on_collection_complete(candidates.len())?;

    let mut summary = RunSummary::default();
    for candidate in &candidates {
        reporter.on_test_start(candidate)?;
        let result = RunResult::from_outcome(executor.execute(candidate)?);
        summary.record(&result);
        reporter.on_test_complete(candidate, &result)?;
    }

    reporter.on_run_complete(&summary)?;
    tracing::info!(
        total = summary.total,
        succeeded = summary.succeeded,
        "test run complete"
    );
    Ok(summary)
}

/// Run all tests in the given directory with the host defaults, reporting to stdout.
pub fn run_tests(path: &Path) -> CliResult<ExitCode> {
    let discovery = DefaultTestDiscovery::default();
    let mut reporter = ConsoleReporter::stdout();

    let summary = run_suite(path, &discovery, &DefaultTestExecutor, &mut reporter)
        .map_err(|e| CliError::new(format!("Error: {}", e), ExitCode::ABORTED))?;

    if summary.all_passed() {
        Ok(ExitCode::SUCCESS)
    } else {
        // Tests failed - return error with empty message (summary already printed)
        Err(CliError::new("", summary.exit_code()))
    }
}
