use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::record::PrecursorPolicy;

/// What to do with a scan that cannot be decoded or validated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OnError {
    /// Stop at the first malformed scan
    #[default]
    Abort,
    /// Log and count malformed scans, then continue with the next one
    Skip,
}

impl fmt::Display for OnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OnError::Abort => f.write_str("abort"),
            OnError::Skip => f.write_str("skip"),
        }
    }
}

impl FromStr for OnError {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "abort" => Ok(OnError::Abort),
            "skip" => Ok(OnError::Skip),
            _ => Err(format!("unknown on_error mode '{}': expected 'abort' or 'skip'", s)),
        }
    }
}

/// Options for reading scans from a source file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SourceOptions {
    /// Tolerance for malformed scans
    pub on_error: OnError,
    /// Treatment of precursors on MS1 scans
    pub precursor_policy: PrecursorPolicy,
}
