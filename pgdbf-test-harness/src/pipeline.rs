//! The validation pipeline: fans one output stream out to every active
//! check and collects their verdicts at end-of-stream.

use crate::check::{Check, CheckResult};
use crate::error::HarnessError;
use crate::registry;
use crate::testcase::TestCaseConfig;

/// Drives the full check set for one test case over a single pass of the
/// subprocess's output stream.
///
/// Fault isolation is the central property here: a failing verdict in one
/// check is ordinary data and never prevents `forward` or `finalize` from
/// reaching the remaining checks. Only harness defects (a check driven
/// outside its lifecycle) surface as errors.
pub struct ValidationPipeline {
    checks: Vec<Check>,
}

impl ValidationPipeline {
    /// Builds the pipeline for one test case, with one check per
    /// recognized configuration key present.
    pub fn new(config: &TestCaseConfig) -> Result<Self, HarnessError> {
        let checks = registry::build_checks(config);
        if checks.is_empty() {
            return Err(HarnessError::NoChecksConfigured);
        }

        Ok(Self { checks })
    }

    /// The number of active checks.
    pub fn check_count(&self) -> usize {
        self.checks.len()
    }

    /// Delivers a chunk of stream data to every open check.
    pub fn forward(&mut self, chunk: &[u8]) -> Result<(), HarnessError> {
        for check in &mut self.checks {
            check.accept(chunk)?;
        }

        Ok(())
    }

    /// Signals end-of-stream: finishes every check exactly once and
    /// returns all verdicts as a batch, regardless of individual
    /// outcomes.
    pub fn finalize(&mut self) -> Result<Vec<CheckResult>, HarnessError> {
        let mut results = Vec::with_capacity(self.checks.len());
        for check in &mut self.checks {
            results.push(check.finish()?);
        }

        // Every check must have closed by now; anything else is a defect
        // in the harness, not bad data from the program under test.
        if let Some(check) = self.checks.iter().find(|c| !c.is_closed()) {
            return Err(HarnessError::CheckNotClosed(check.kind()));
        }

        Ok(results)
    }
}
