//! Reporting of check verdicts and runner progress.
//!
//! The runner never logs through ambient global state; it is handed a
//! [`Reporter`] and routes every user-visible line through it. Tests can
//! substitute a recording implementation.

use crate::check::{CheckResult, Failure, Outcome};
use colored::Colorize;

/// The runner's reporting collaborator.
pub trait Reporter {
    /// Announces that a test case is starting. Always shown.
    fn case_started(&mut self, name: &str);

    /// Progress detail, shown at elevated verbosity.
    fn info(&mut self, message: &str);

    /// Diagnostic detail, shown at the highest verbosity.
    fn debug(&mut self, message: &str);

    /// Reports one finished check: passes at info verbosity, failures
    /// unconditionally with expected/actual detail.
    fn report(&mut self, result: &CheckResult);

    /// Reports a case-level error (for example, a configuration with no
    /// recognized checks). Always shown.
    fn error(&mut self, message: &str);
}

/// Renders reports to the console, colorized, gated on a verbosity
/// level: `0` shows case lines and failures only, `1` adds check passes,
/// `2` adds lifecycle diagnostics.
pub struct ConsoleReporter {
    verbosity: u8,
}

impl ConsoleReporter {
    /// Creates a console reporter with the given verbosity level.
    pub const fn new(verbosity: u8) -> Self {
        Self { verbosity }
    }
}

impl Reporter for ConsoleReporter {
    fn case_started(&mut self, name: &str) {
        println!("{} {}", "Running".blue(), name.italic());
    }

    fn info(&mut self, message: &str) {
        if self.verbosity >= 1 {
            eprintln!("{message}");
        }
    }

    fn debug(&mut self, message: &str) {
        if self.verbosity >= 2 {
            eprintln!("{message}");
        }
    }

    fn report(&mut self, result: &CheckResult) {
        match &result.outcome {
            Outcome::Pass => self.info(&format!("passed the {} check", result.kind)),
            Outcome::Fail(failure) => {
                let description = result.failure_description().unwrap_or("failure");
                println!(
                    "    {} : {} ({} check)",
                    "Failure ".bright_red(),
                    description,
                    result.kind
                );

                match failure {
                    Failure::ShortRead {
                        expected_len,
                        actual_len,
                    } => {
                        println!("    Expected: {} byte(s)", expected_len.to_string().cyan());
                        println!(
                            "    Actual  : {} byte(s)",
                            actual_len.to_string().bright_red()
                        );
                    }
                    Failure::Mismatch { expected, actual } => {
                        println!("    Expected: {}", format!("{expected:?}").cyan());
                        println!("    Actual  : {}", format!("{actual:?}").bright_red());
                    }
                }
            }
        }
    }

    fn error(&mut self, message: &str) {
        eprintln!("{} {}", "error:".bright_red(), message);
    }
}
