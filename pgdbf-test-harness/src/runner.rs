//! Test runner implementation.

use crate::check::CheckResult;
use crate::config::{RunnerConfig, TestOptions};
use crate::error::HarnessError;
use crate::pipeline::ValidationPipeline;
use crate::reporting::Reporter;
use crate::testcase::TestCaseConfig;
use anyhow::{Context, Result};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Size of reads from the subprocess's combined output stream. Large
/// enough to amortize read overhead; chunk boundaries never affect any
/// check's verdict.
pub const CHUNK_SIZE: usize = 128 * 1024;

/// The main test runner.
///
/// Runs one test case at a time: spawns the executable under test with
/// the case's arguments, streams its combined stdout/stderr through the
/// validation pipeline, and reports every check's verdict. Cases run
/// strictly sequentially; each subprocess runs to completion before the
/// next begins.
pub struct TestRunner {
    config: RunnerConfig,
    options: TestOptions,
}

impl TestRunner {
    /// Creates a new test runner with the given configuration and
    /// options.
    pub const fn new(config: RunnerConfig, options: TestOptions) -> Self {
        Self { config, options }
    }

    /// Runs all selected test cases and returns whether every check of
    /// every case passed.
    ///
    /// Validation failures and per-case configuration errors are
    /// reported and do not stop the remaining cases; harness defects and
    /// I/O errors abort the run.
    pub fn run(&self, reporter: &mut dyn Reporter) -> Result<bool> {
        let cases = self.collect_cases()?;

        let mut all_passed = true;
        for case in cases {
            reporter.case_started(&case.to_string_lossy());

            match self.run_case(&case, reporter) {
                Ok(passed) => all_passed &= passed,
                Err(err)
                    if matches!(
                        err.downcast_ref::<HarnessError>(),
                        Some(HarnessError::NoChecksConfigured)
                    ) =>
                {
                    // Fatal for this case only; the rest of the suite
                    // still runs.
                    reporter.error(&format!("{}: {err:#}", case.to_string_lossy()));
                    all_passed = false;
                }
                Err(err) => return Err(err),
            }
        }

        Ok(all_passed)
    }

    /// Collects the test case files to run: the ones named on the
    /// command line, or every case discovered in the well-known
    /// directories.
    fn collect_cases(&self) -> Result<Vec<PathBuf>> {
        if !self.options.testcases.is_empty() {
            return Ok(self.options.testcases.clone());
        }

        let mut cases = Vec::new();
        for dir in &self.config.test_case_dirs {
            let pattern = dir.join("*.json").to_string_lossy().to_string();
            for entry in glob::glob(&pattern).context("building test case glob")? {
                cases.push(entry.context("reading test case directory")?);
            }
        }

        Ok(cases)
    }

    fn run_case(&self, case_path: &Path, reporter: &mut dyn Reporter) -> Result<bool> {
        let config = TestCaseConfig::load(case_path)?;
        let mut pipeline = ValidationPipeline::new(&config)?;
        reporter.debug(&format!("opened {} check(s)", pipeline.check_count()));

        let results = self.drive_subprocess(case_path, &config, &mut pipeline, reporter)?;

        let mut passed = true;
        for result in &results {
            passed &= result.is_pass();
            reporter.report(result);
        }

        Ok(passed)
    }

    /// Spawns the executable under test and feeds its combined output
    /// through the pipeline in fixed-size chunks until end-of-stream.
    fn drive_subprocess(
        &self,
        case_path: &Path,
        config: &TestCaseConfig,
        pipeline: &mut ValidationPipeline,
        reporter: &mut dyn Reporter,
    ) -> Result<Vec<CheckResult>> {
        // A single pipe receives both stdout and stderr, preserving the
        // order in which the subprocess wrote them.
        let (mut reader, writer) = std::io::pipe().context("creating output pipe")?;

        let mut command = Command::new(&self.config.executable);
        command
            .args(config.cmd_args.to_vec())
            .stdin(Stdio::null())
            .stdout(writer.try_clone().context("cloning output pipe")?)
            .stderr(writer);

        // Relative paths in the case's arguments resolve against the
        // directory the case file lives in. Only the child gets that
        // working directory; the runner's own never changes.
        if let Some(dir) = case_path.parent().filter(|d| !d.as_os_str().is_empty()) {
            command.current_dir(dir);
        }

        reporter.debug(&format!("running {command:?}"));
        let mut child = command.spawn().with_context(|| {
            format!("spawning {}", self.config.executable.to_string_lossy())
        })?;

        // The command still holds the parent's copies of the pipe's
        // write ends; they must close or end-of-stream never arrives.
        drop(command);

        let mut buffer = vec![0u8; CHUNK_SIZE];
        loop {
            let read = reader
                .read(&mut buffer)
                .context("reading subprocess output")?;
            if read == 0 {
                break;
            }

            pipeline.forward(&buffer[..read])?;
        }

        let status = child.wait().context("waiting for subprocess")?;
        reporter.debug(&format!("subprocess exited with {status}"));

        Ok(pipeline.finalize()?)
    }
}
