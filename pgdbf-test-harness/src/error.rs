//! Harness-level error type.

use crate::check::CheckKind;

/// Errors indicating that the harness itself is misconfigured or
/// defective. Data-validation failures are never represented here; they
/// are reported through [`crate::check::CheckResult`] instead.
#[derive(thiserror::Error, Debug)]
pub enum HarnessError {
    /// A test case configuration contained none of the recognized check
    /// keys, so there is nothing to validate.
    #[error("no checks are configured")]
    NoChecksConfigured,

    /// A chunk was delivered to a check that had already been closed.
    #[error("{0} check was fed data after closing")]
    CheckFedAfterClose(CheckKind),

    /// A check was asked to finish a second time.
    #[error("{0} check was finished more than once")]
    CheckFinishedTwice(CheckKind),

    /// A check failed to reach its closed state after finalization.
    #[error("{0} check did not close cleanly")]
    CheckNotClosed(CheckKind),
}
