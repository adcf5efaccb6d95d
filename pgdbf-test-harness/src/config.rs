//! Configuration types for the test harness.

use clap::Parser;
use std::path::PathBuf;

/// Name of the executable under test when no explicit path is given; it
/// is then resolved through the environment's executable search path.
pub const DEFAULT_EXECUTABLE: &str = "pgdbf";

/// The directories searched for test case files when none are named on
/// the command line.
pub const TEST_CASE_DIRS: [&str; 2] = ["cases", "privatecases"];

/// Configuration for the test runner.
#[derive(Clone, Debug)]
pub struct RunnerConfig {
    /// Path or name of the executable under test.
    pub executable: PathBuf,
    /// Directories searched for test case files.
    pub test_case_dirs: Vec<PathBuf>,
}

impl RunnerConfig {
    /// Creates a runner config for the given executable, searching the
    /// well-known test case directories.
    pub fn new(executable: PathBuf) -> Self {
        Self {
            executable,
            test_case_dirs: TEST_CASE_DIRS.iter().map(PathBuf::from).collect(),
        }
    }

    /// Overrides the directories searched for test case files.
    #[must_use]
    pub fn with_test_case_dirs(mut self, dirs: Vec<PathBuf>) -> Self {
        self.test_case_dirs = dirs;
        self
    }
}

/// Command-line options for the test harness.
#[derive(Clone, Parser, Debug)]
#[clap(version, about = "Run a suite of pgdbf test cases")]
pub struct TestOptions {
    /// Path to the pgdbf executable under test.
    #[clap(short = 'p', long = "pgdbf", env = "PGDBF_PATH")]
    pub pgdbf: Option<PathBuf>,

    /// Increase logging verbosity; may be given more than once.
    #[clap(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Test case files to run. When empty, all discovered cases run.
    pub testcases: Vec<PathBuf>,
}

impl TestOptions {
    /// Resolves the executable under test: an explicit path is
    /// absolutized (the child process runs with a different working
    /// directory), otherwise the default name is left for `PATH`
    /// resolution.
    pub fn resolve_executable(&self) -> std::io::Result<PathBuf> {
        match &self.pgdbf {
            Some(path) => std::path::absolute(path),
            None => Ok(PathBuf::from(DEFAULT_EXECUTABLE)),
        }
    }
}
