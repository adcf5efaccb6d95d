//! Command-line entry point for the pgdbf test suite runner.

use clap::Parser;
use colored::Colorize;
use pgdbf_test_harness::{ConsoleReporter, RunnerConfig, TestOptions, TestRunner};
use std::process::ExitCode;

fn main() -> ExitCode {
    let options = TestOptions::parse();

    let executable = match options.resolve_executable() {
        Ok(path) => path,
        Err(err) => {
            eprintln!("{} {err:#}", "error:".bright_red());
            return ExitCode::from(2);
        }
    };

    let config = RunnerConfig::new(executable);
    let mut reporter = ConsoleReporter::new(options.verbose);
    let runner = TestRunner::new(config, options);

    match runner.run(&mut reporter) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("{} {err:#}", "error:".bright_red());
            ExitCode::from(2)
        }
    }
}
