//! Mapping from configuration keys to check constructors.
//!
//! The check set is a closed enumeration: each recognized key present in
//! a test case configuration yields exactly one fresh check. Keys that do
//! not name a check (such as `cmd_args`) are simply not consulted here.

use crate::check::Check;
use crate::testcase::TestCaseConfig;

/// Builds the active check set for one test case, one check per
/// recognized key present in the configuration. Returns an empty vector
/// when no check keys are present; the pipeline treats that as a fatal
/// configuration error.
pub(crate) fn build_checks(config: &TestCaseConfig) -> Vec<Check> {
    let mut checks = Vec::new();

    if let Some(expected) = &config.head {
        checks.push(Check::head(expected));
    }
    if let Some(expected) = config.length {
        checks.push(Check::length(expected));
    }
    if let Some(expected) = &config.md5 {
        checks.push(Check::md5(expected));
    }
    if let Some(expected) = &config.tail {
        checks.push(Check::tail(expected));
    }

    checks
}
