//! Streaming output-validation harness for the pgdbf converter.
//!
//! Each test case pairs the command-line arguments for the executable
//! under test with the properties its output must satisfy: exact leading
//! bytes, exact total length, exact MD5 digest, exact trailing bytes.
//! The harness spawns the executable, streams its combined stdout/stderr
//! through a set of independent incremental checks in a single pass, and
//! reports every check's verdict at end-of-stream.
//!
//! The checks are fault-isolated: each one observes the entire stream
//! and reports on its own, no matter what its siblings conclude.

mod check;
mod config;
mod error;
mod pipeline;
mod registry;
mod reporting;
mod runner;
mod testcase;

pub use check::{Check, CheckKind, CheckResult, Failure, Outcome};
pub use config::{DEFAULT_EXECUTABLE, RunnerConfig, TEST_CASE_DIRS, TestOptions};
pub use error::HarnessError;
pub use pipeline::ValidationPipeline;
pub use reporting::{ConsoleReporter, Reporter};
pub use runner::{CHUNK_SIZE, TestRunner};
pub use testcase::{CmdArgs, TestCaseConfig};
