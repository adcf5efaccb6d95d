//! Test case definitions and JSON schema.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Arguments for the executable under test. A single bare string is
/// accepted as shorthand for a one-element list.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum CmdArgs {
    /// A single argument.
    Single(String),
    /// An ordered sequence of arguments.
    Multiple(Vec<String>),
}

impl CmdArgs {
    /// Returns the arguments as an ordered list.
    pub fn to_vec(&self) -> Vec<String> {
        match self {
            Self::Single(arg) => vec![arg.clone()],
            Self::Multiple(args) => args.clone(),
        }
    }
}

/// One test case: the expected properties of the converter's output,
/// paired with the arguments used to produce that output.
///
/// Each of the four check fields is optional; any subset may be present.
/// Unrecognized keys in the JSON file are ignored.
#[derive(Clone, Debug, Deserialize)]
pub struct TestCaseConfig {
    /// Expected leading bytes of the output.
    #[serde(default)]
    pub head: Option<String>,

    /// Expected total length of the output, in bytes.
    #[serde(default)]
    pub length: Option<u64>,

    /// Expected MD5 digest of the output, as a hex string.
    #[serde(default)]
    pub md5: Option<String>,

    /// Expected trailing bytes of the output.
    #[serde(default)]
    pub tail: Option<String>,

    /// Arguments to pass to the executable under test.
    pub cmd_args: CmdArgs,
}

impl TestCaseConfig {
    /// Loads a test case configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)
            .with_context(|| format!("opening {}", path.to_string_lossy()))?;
        let config: Self = serde_json::from_reader(file)
            .with_context(|| format!("parsing {}", path.to_string_lossy()))?;
        Ok(config)
    }
}
