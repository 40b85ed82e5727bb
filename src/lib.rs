#![forbid(unsafe_code)]
//! run-tests: a minimal directory test harness
//!
//! Scans one directory for test executables, runs each as a subprocess, and reports a pass/fail summary. The
//! process exit status is non-zero when any test failed.
//!
//! ## Panic Policy
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` module enforces
//!   `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.

pub mod cli;
pub mod version;

pub use cli::test_interfaces::{
    CandidateFilter, DefaultTestDiscovery, DefaultTestExecutor, ExecutionOutcome, TestDiscovery, TestError,
    TestExecutor,
};
pub use cli::test_runner::{
    ConsoleReporter, RunResult, RunSummary, TestCandidate, TestReporter, run_suite, run_tests,
};
