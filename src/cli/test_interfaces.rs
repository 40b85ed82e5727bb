//! Test runner I/O boundary interfaces
//!
//! This module defines trait-based abstractions for the two operations that touch the outside world:
//! - Test discovery (directory listing + candidate predicate)
//! - Test execution (process spawn + output capture)
//!
//! The run loop in `test_runner.rs` only talks to these traits, so it can be driven by in-memory fakes in tests.

use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use thiserror::Error;

use super::test_runner::TestCandidate;

/// Errors that abort a test run.
///
/// A test that runs and exits non-zero is *not* an error; it is a `RunResult::Failure`.
#[derive(Debug, Error)]
pub enum TestError {
    #[error("failed to read test directory '{}': {source}", .path.display())]
    Discovery {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to run '{}': {source}", .path.display())]
    Spawn {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write report: {0}")]
    Report(#[from] io::Error),
}

// ============================================================================
// Candidate predicate
// ============================================================================

/// Decides whether a directory entry is a test to execute.
///
/// Selected once per run (see [`CandidateFilter::for_host`]) and handed to discovery, so the scan loop never
/// branches on the platform itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateFilter {
    /// Regular files whose name ends with the suffix, compared ASCII case-insensitively.
    ExecutableSuffix(&'static str),
    /// Regular files whose name starts with the prefix.
    NamePrefix(&'static str),
}

impl CandidateFilter {
    /// Executable suffix on Windows-style hosts.
    pub const EXE_SUFFIX: &'static str = ".exe";
    /// Test name prefix everywhere else.
    pub const TEST_PREFIX: &'static str = "test_";

    /// The convention for the platform this binary was built for.
    pub fn for_host() -> Self {
        if cfg!(windows) {
            CandidateFilter::ExecutableSuffix(Self::EXE_SUFFIX)
        } else {
            CandidateFilter::NamePrefix(Self::TEST_PREFIX)
        }
    }

    /// Check the file name alone, without touching the filesystem.
    pub fn matches_name(&self, name: &str) -> bool {
        match self {
            CandidateFilter::ExecutableSuffix(suffix) => {
                name.len() >= suffix.len()
                    && name
                        .get(name.len() - suffix.len()..)
                        .is_some_and(|tail| tail.eq_ignore_ascii_case(suffix))
            }
            CandidateFilter::NamePrefix(prefix) => name.starts_with(prefix),
        }
    }

    /// Full predicate: a regular file (symlinks followed) with a matching name.
    pub fn is_candidate(&self, name: &str, path: &Path) -> bool {
        self.matches_name(name) && path.is_file()
    }
}

impl Default for CandidateFilter {
    fn default() -> Self {
        Self::for_host()
    }
}

// ============================================================================
// Test Discovery Interface
// ============================================================================

/// Find the tests directly inside a directory.
pub trait TestDiscovery {
    /// List candidates in `dir` (non-recursive), sorted by name.
    fn discover(&self, dir: &Path) -> Result<Vec<TestCandidate>, TestError>;
}

/// Filesystem-backed discovery.
#[derive(Debug, Clone, Default)]
pub struct DefaultTestDiscovery {
    filter: CandidateFilter,
}

impl DefaultTestDiscovery {
    pub fn new(filter: CandidateFilter) -> Self {
        Self { filter }
    }

    pub fn filter(&self) -> CandidateFilter {
        self.filter
    }
}

impl TestDiscovery for DefaultTestDiscovery {
    fn discover(&self, dir: &Path) -> Result<Vec<TestCandidate>, TestError> {
        let discovery_error = |source| TestError::Discovery {
            path: dir.to_path_buf(),
            source,
        };

        let mut candidates = Vec::new();
        for entry in std::fs::read_dir(dir).map_err(discovery_error)? {
            let entry = entry.map_err(discovery_error)?;
            let file_name = entry.file_name();
            let name = match file_name.to_str() {
                Some(name) => name.to_string(),
                None => {
                    tracing::warn!(name = ?file_name, "directory entry name is not valid UTF-8");
                    file_name.to_string_lossy().into_owned()
                }
            };
            let path = entry.path();

            if !self.filter.is_candidate(&name, &path) {
                tracing::debug!(%name, "skipping non-test entry");
                continue;
            }
            candidates.push(TestCandidate { name, path });
        }

        candidates.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(candidates)
    }
}

// ============================================================================
// Test Executor Interface
// ============================================================================

/// What a test process left behind once it ran to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionOutcome {
    /// Exit code; on Unix a process killed by signal `N` reports `-N`.
    pub code: i32,
    /// Captured stdout followed by captured stderr.
    pub output: Vec<u8>,
}

/// Run one candidate to completion and capture its result.
pub trait TestExecutor {
    /// Only a failure to *start* the process is an error; a non-zero exit is a normal outcome.
    fn execute(&self, candidate: &TestCandidate) -> Result<ExecutionOutcome, TestError>;
}

/// Spawns the candidate with no arguments, the inherited environment, and stdin closed.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTestExecutor;

impl TestExecutor for DefaultTestExecutor {
    fn execute(&self, candidate: &TestCandidate) -> Result<ExecutionOutcome, TestError> {
        tracing::debug!(path = %candidate.path.display(), "spawning test");

        let output = Command::new(&candidate.path)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| TestError::Spawn {
                path: candidate.path.clone(),
                source,
            })?;

        let mut combined = output.stdout;
        combined.extend_from_slice(&output.stderr);

        Ok(ExecutionOutcome {
            code: exit_code(output.status),
            output: combined,
        })
    }
}

fn exit_code(status: ExitStatus) -> i32 {
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(code) = status.code() {
            code
        } else if let Some(signal) = status.signal() {
            -signal
        } else {
            1
        }
    }
    #[cfg(not(unix))]
    {
        status.code().unwrap_or(1)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_prefix_filter_matches_names() {
        let filter = CandidateFilter::NamePrefix("test_");
        assert!(filter.matches_name("test_hooks"));
        assert!(filter.matches_name("test_"));
        assert!(!filter.matches_name("hooks_test"));
        assert!(!filter.matches_name("Test_hooks"));
        assert!(!filter.matches_name("test"));
    }

    #[test]
    fn test_suffix_filter_ignores_ascii_case() {
        let filter = CandidateFilter::ExecutableSuffix(".exe");
        assert!(filter.matches_name("hooks.exe"));
        assert!(filter.matches_name("HOOKS.EXE"));
        assert!(!filter.matches_name("hooks.exe.txt"));
        assert!(!filter.matches_name("exe"));
        assert!(!filter.matches_name("ünï"));
    }

    #[test]
    fn test_host_filter() {
        let filter = CandidateFilter::for_host();
        if cfg!(windows) {
            assert_eq!(filter, CandidateFilter::ExecutableSuffix(".exe"));
        } else {
            assert_eq!(filter, CandidateFilter::NamePrefix("test_"));
        }
    }

    #[test]
    fn test_discovery_skips_directories_and_other_names() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("test_b"), "").unwrap();
        fs::write(dir.path().join("test_a"), "").unwrap();
        fs::write(dir.path().join("README"), "").unwrap();
        fs::create_dir(dir.path().join("test_dir")).unwrap();

        let discovery = DefaultTestDiscovery::new(CandidateFilter::NamePrefix("test_"));
        let candidates = discovery.discover(dir.path()).unwrap();

        let names: Vec<_> = candidates.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["test_a", "test_b"]);
        assert_eq!(candidates[0].path, dir.path().join("test_a"));
    }

    #[test]
    fn test_discovery_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");

        let err = DefaultTestDiscovery::default().discover(&missing).unwrap_err();
        assert!(matches!(&err, TestError::Discovery { path, .. } if path == &missing));
        assert!(err.to_string().contains("failed to read test directory"));
    }

    #[cfg(unix)]
    #[test]
    fn test_discovery_follows_symlinks() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("target_file"), "").unwrap();
        fs::create_dir(dir.path().join("target_dir")).unwrap();
        std::os::unix::fs::symlink(dir.path().join("target_file"), dir.path().join("test_file_link")).unwrap();
        std::os::unix::fs::symlink(dir.path().join("target_dir"), dir.path().join("test_dir_link")).unwrap();
        std::os::unix::fs::symlink(dir.path().join("missing"), dir.path().join("test_dangling")).unwrap();

        let discovery = DefaultTestDiscovery::new(CandidateFilter::NamePrefix("test_"));
        let names: Vec<_> = discovery
            .discover(dir.path())
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, ["test_file_link"]);
    }

    #[test]
    fn test_executor_spawn_failure() {
        let dir = tempfile::tempdir().unwrap();
        let candidate = TestCandidate {
            name: "test_missing".to_string(),
            path: dir.path().join("test_missing"),
        };

        let err = DefaultTestExecutor.execute(&candidate).unwrap_err();
        assert!(matches!(err, TestError::Spawn { .. }));
    }
}
