//! Incremental checks over the byte stream produced by the executable
//! under test.
//!
//! Each check consumes the stream chunk-by-chunk via [`Check::accept`],
//! holding only the state it needs, and produces its verdict exactly once
//! via [`Check::finish`] at end-of-stream. Memory use stays bounded by the
//! expected value's size regardless of how long the stream runs.

use crate::error::HarnessError;
use md5::{Digest, Md5};

/// The kind of stream property a check validates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CheckKind {
    /// The first bytes of the stream.
    Head,
    /// The total byte count of the stream.
    Length,
    /// The MD5 digest of the entire stream.
    Md5,
    /// The last bytes of the stream.
    Tail,
}

impl CheckKind {
    /// The configuration key naming this check kind.
    pub const fn key(self) -> &'static str {
        match self {
            Self::Head => "head",
            Self::Length => "length",
            Self::Md5 => "md5",
            Self::Tail => "tail",
        }
    }

    /// Short description used when the finalized value differs from the
    /// expected one.
    pub(crate) const fn mismatch_description(self) -> &'static str {
        match self {
            Self::Head => "unequal head",
            Self::Length => "incorrect length",
            Self::Md5 => "bad md5 hash",
            Self::Tail => "incorrect tail",
        }
    }
}

impl std::fmt::Display for CheckKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Why a check failed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Failure {
    /// The stream ended before the check accumulated enough bytes to
    /// perform its comparison.
    ShortRead {
        /// How many bytes the comparison needed.
        expected_len: usize,
        /// How many bytes actually arrived.
        actual_len: usize,
    },
    /// The finalized value differs from the expected one.
    Mismatch {
        /// The expected value, rendered for display.
        expected: String,
        /// The actual value, rendered for display.
        actual: String,
    },
}

/// The verdict of a single finished check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The stream satisfied the expectation.
    Pass,
    /// The stream violated the expectation.
    Fail(Failure),
}

impl Outcome {
    /// Returns whether this outcome is a pass.
    pub const fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }
}

/// The finished verdict of one check over one stream.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CheckResult {
    /// Which check produced this result.
    pub kind: CheckKind,
    /// Whether the check passed, and how it failed if not.
    pub outcome: Outcome,
}

impl CheckResult {
    /// Returns whether the check passed.
    pub const fn is_pass(&self) -> bool {
        self.outcome.is_pass()
    }

    /// Short description of the failure, if the check failed.
    pub const fn failure_description(&self) -> Option<&'static str> {
        match &self.outcome {
            Outcome::Pass => None,
            Outcome::Fail(Failure::ShortRead { .. }) => Some("short read"),
            Outcome::Fail(Failure::Mismatch { .. }) => {
                Some(self.kind.mismatch_description())
            }
        }
    }
}

/// A single incremental validator in its open-or-closed lifecycle.
///
/// A check starts open, accepts any number of chunks, and transitions to
/// closed exactly once when finished. Feeding a closed check or finishing
/// it twice is a harness defect, not a data failure.
pub struct Check {
    kind: CheckKind,
    state: State,
}

enum State {
    Open(Validator),
    Closed,
}

enum Validator {
    Head {
        expected: Vec<u8>,
        buffered: Vec<u8>,
        verdict: Option<Outcome>,
    },
    Length {
        expected: u64,
        counted: u64,
    },
    Md5 {
        expected: String,
        hasher: Md5,
    },
    Tail {
        expected: Vec<u8>,
        window: Vec<u8>,
    },
}

impl Check {
    /// Creates a check of the stream's leading bytes.
    pub fn head(expected: &str) -> Self {
        Self {
            kind: CheckKind::Head,
            state: State::Open(Validator::Head {
                expected: expected.as_bytes().to_vec(),
                buffered: Vec::with_capacity(expected.len()),
                verdict: None,
            }),
        }
    }

    /// Creates a check of the stream's total byte count.
    pub const fn length(expected: u64) -> Self {
        Self {
            kind: CheckKind::Length,
            state: State::Open(Validator::Length {
                expected,
                counted: 0,
            }),
        }
    }

    /// Creates a check of the stream's MD5 digest, given as a hex string.
    pub fn md5(expected: &str) -> Self {
        Self {
            kind: CheckKind::Md5,
            state: State::Open(Validator::Md5 {
                expected: expected.to_owned(),
                hasher: Md5::new(),
            }),
        }
    }

    /// Creates a check of the stream's trailing bytes.
    pub fn tail(expected: &str) -> Self {
        Self {
            kind: CheckKind::Tail,
            state: State::Open(Validator::Tail {
                expected: expected.as_bytes().to_vec(),
                window: Vec::with_capacity(expected.len()),
            }),
        }
    }

    /// Which property this check validates.
    pub const fn kind(&self) -> CheckKind {
        self.kind
    }

    /// Returns whether this check has been finished.
    pub const fn is_closed(&self) -> bool {
        matches!(self.state, State::Closed)
    }

    /// Delivers the next chunk of stream data to this check.
    pub fn accept(&mut self, chunk: &[u8]) -> Result<(), HarnessError> {
        match &mut self.state {
            State::Open(validator) => {
                validator.update(chunk);
                Ok(())
            }
            State::Closed => Err(HarnessError::CheckFedAfterClose(self.kind)),
        }
    }

    /// Signals end-of-stream, closing this check and returning its
    /// verdict. Must be called exactly once.
    pub fn finish(&mut self) -> Result<CheckResult, HarnessError> {
        match std::mem::replace(&mut self.state, State::Closed) {
            State::Open(validator) => Ok(CheckResult {
                kind: self.kind,
                outcome: validator.conclude(),
            }),
            State::Closed => Err(HarnessError::CheckFinishedTwice(self.kind)),
        }
    }
}

impl Validator {
    fn update(&mut self, chunk: &[u8]) {
        match self {
            Self::Head {
                expected,
                buffered,
                verdict,
            } => {
                if verdict.is_some() {
                    return;
                }

                // Buffer only up to the comparison threshold; once it is
                // reached the verdict is computed and buffering stops.
                let needed = expected.len() - buffered.len();
                buffered.extend_from_slice(&chunk[..chunk.len().min(needed)]);
                if buffered.len() >= expected.len() {
                    *verdict = Some(compare_bytes(expected, buffered));
                }
            }
            Self::Length { counted, .. } => {
                *counted += chunk.len() as u64;
            }
            Self::Md5 { hasher, .. } => {
                hasher.update(chunk);
            }
            Self::Tail { expected, window } => {
                let cap = expected.len();
                if chunk.len() >= cap {
                    window.clear();
                    window.extend_from_slice(&chunk[chunk.len() - cap..]);
                } else {
                    window.extend_from_slice(chunk);
                    if window.len() > cap {
                        window.drain(..window.len() - cap);
                    }
                }
            }
        }
    }

    fn conclude(self) -> Outcome {
        match self {
            Self::Head {
                expected,
                buffered,
                verdict,
            } => verdict.unwrap_or_else(|| {
                if buffered.len() >= expected.len() {
                    compare_bytes(&expected, &buffered)
                } else {
                    Outcome::Fail(Failure::ShortRead {
                        expected_len: expected.len(),
                        actual_len: buffered.len(),
                    })
                }
            }),
            Self::Length { expected, counted } => {
                if counted == expected {
                    Outcome::Pass
                } else {
                    Outcome::Fail(Failure::Mismatch {
                        expected: expected.to_string(),
                        actual: counted.to_string(),
                    })
                }
            }
            Self::Md5 { expected, hasher } => {
                let actual = hex::encode(hasher.finalize());
                if actual.eq_ignore_ascii_case(&expected) {
                    Outcome::Pass
                } else {
                    Outcome::Fail(Failure::Mismatch {
                        expected,
                        actual,
                    })
                }
            }
            Self::Tail { expected, window } => compare_bytes(&expected, &window),
        }
    }
}

fn compare_bytes(expected: &[u8], actual: &[u8]) -> Outcome {
    if expected == actual {
        Outcome::Pass
    } else {
        Outcome::Fail(Failure::Mismatch {
            expected: String::from_utf8_lossy(expected).into_owned(),
            actual: String::from_utf8_lossy(actual).into_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STREAM: &[u8] = b"HEADERmiddleTAIL";
    const STREAM_MD5: &str = "ea80868239b256c17a6662288e85e680";

    fn feed(check: &mut Check, stream: &[u8], chunk_size: usize) {
        for chunk in stream.chunks(chunk_size.max(1)) {
            check.accept(chunk).unwrap();
        }
    }

    #[test]
    fn head_passes_on_matching_prefix() {
        for chunk_size in [1, 3, 16, 64] {
            let mut check = Check::head("HEADER");
            feed(&mut check, STREAM, chunk_size);
            assert!(check.finish().unwrap().is_pass(), "chunk size {chunk_size}");
        }
    }

    #[test]
    fn head_fails_on_differing_prefix() {
        let mut check = Check::head("TRAILER");
        feed(&mut check, STREAM, 4);
        let result = check.finish().unwrap();
        assert_eq!(
            result.outcome,
            Outcome::Fail(Failure::Mismatch {
                expected: "TRAILER".into(),
                actual: "HEADERm".into(),
            })
        );
        assert_eq!(result.failure_description(), Some("unequal head"));
    }

    #[test]
    fn head_reports_short_read_not_mismatch() {
        let mut check = Check::head("XX");
        check.accept(b"Y").unwrap();
        let result = check.finish().unwrap();
        assert_eq!(
            result.outcome,
            Outcome::Fail(Failure::ShortRead {
                expected_len: 2,
                actual_len: 1,
            })
        );
        assert_eq!(result.failure_description(), Some("short read"));
    }

    #[test]
    fn head_with_empty_expectation_passes_on_empty_stream() {
        let mut check = Check::head("");
        assert!(check.finish().unwrap().is_pass());
    }

    #[test]
    fn head_stops_buffering_after_threshold() {
        let mut check = Check::head("HE");
        // A chunk far larger than the expectation must not be retained.
        check.accept(STREAM).unwrap();
        check.accept(&[0u8; 1024]).unwrap();
        assert!(check.finish().unwrap().is_pass());
    }

    #[test]
    fn length_counts_bytes_across_any_chunking() {
        for chunk_size in [1, 2, 5, 16] {
            let mut check = Check::length(16);
            feed(&mut check, STREAM, chunk_size);
            assert!(check.finish().unwrap().is_pass(), "chunk size {chunk_size}");
        }
    }

    #[test]
    fn length_mismatch_carries_both_values() {
        let mut check = Check::length(5);
        feed(&mut check, STREAM, 7);
        let result = check.finish().unwrap();
        assert_eq!(
            result.outcome,
            Outcome::Fail(Failure::Mismatch {
                expected: "5".into(),
                actual: "16".into(),
            })
        );
        assert_eq!(result.failure_description(), Some("incorrect length"));
    }

    #[test]
    fn length_of_empty_stream_is_zero() {
        let mut check = Check::length(0);
        assert!(check.finish().unwrap().is_pass());
    }

    #[test]
    fn md5_digest_is_chunking_invariant() {
        for chunk_size in [1, 3, 8, 16, 64] {
            let mut check = Check::md5(STREAM_MD5);
            feed(&mut check, STREAM, chunk_size);
            assert!(check.finish().unwrap().is_pass(), "chunk size {chunk_size}");
        }
    }

    #[test]
    fn md5_comparison_ignores_digest_case() {
        let mut check = Check::md5(&STREAM_MD5.to_uppercase());
        feed(&mut check, STREAM, 16);
        assert!(check.finish().unwrap().is_pass());
    }

    #[test]
    fn md5_of_empty_stream() {
        let mut check = Check::md5("d41d8cd98f00b204e9800998ecf8427e");
        assert!(check.finish().unwrap().is_pass());
    }

    #[test]
    fn md5_mismatch_reports_actual_digest() {
        let mut check = Check::md5("00000000000000000000000000000000");
        check.accept(b"abc").unwrap();
        let result = check.finish().unwrap();
        assert_eq!(
            result.outcome,
            Outcome::Fail(Failure::Mismatch {
                expected: "00000000000000000000000000000000".into(),
                actual: "900150983cd24fb0d6963f7d28e17f72".into(),
            })
        );
        assert_eq!(result.failure_description(), Some("bad md5 hash"));
    }

    #[test]
    fn tail_passes_on_matching_suffix() {
        for chunk_size in [1, 4, 16, 64] {
            let mut check = Check::tail("TAIL");
            feed(&mut check, STREAM, chunk_size);
            assert!(check.finish().unwrap().is_pass(), "chunk size {chunk_size}");
        }
    }

    #[test]
    fn tail_window_stays_bounded() {
        let mut check = Check::tail("TAIL");
        // Chunks both larger and smaller than the window.
        check.accept(&[b'x'; 4096]).unwrap();
        check.accept(b"TA").unwrap();
        check.accept(b"IL").unwrap();
        assert!(check.finish().unwrap().is_pass());
    }

    #[test]
    fn tail_of_short_stream_compares_entire_stream() {
        let mut check = Check::tail("LONGTAIL");
        check.accept(b"TAIL").unwrap();
        let result = check.finish().unwrap();
        assert_eq!(
            result.outcome,
            Outcome::Fail(Failure::Mismatch {
                expected: "LONGTAIL".into(),
                actual: "TAIL".into(),
            })
        );
        assert_eq!(result.failure_description(), Some("incorrect tail"));
    }

    #[test]
    fn accept_after_close_is_a_harness_defect() {
        let mut check = Check::length(0);
        check.finish().unwrap();
        assert!(matches!(
            check.accept(b"late"),
            Err(HarnessError::CheckFedAfterClose(CheckKind::Length))
        ));
    }

    #[test]
    fn second_finish_is_a_harness_defect() {
        let mut check = Check::tail("x");
        check.finish().unwrap();
        assert!(matches!(
            check.finish(),
            Err(HarnessError::CheckFinishedTwice(CheckKind::Tail))
        ));
    }

    #[test]
    fn finish_closes_the_check() {
        let mut check = Check::md5(STREAM_MD5);
        assert!(!check.is_closed());
        check.finish().unwrap();
        assert!(check.is_closed());
    }
}
