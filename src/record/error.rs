use thiserror::Error;

use crate::error::ErrorKind;

/// A record failed validation at construction time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("scan '{scan_id}': m/z array has {mz_len} values but intensity array has {intensity_len}")]
    ArrayLengthMismatch {
        scan_id: String,
        mz_len: usize,
        intensity_len: usize,
    },

    #[error("scan '{scan_id}': invalid MS level {ms_level} (must be >= 1)")]
    InvalidMsLevel { scan_id: String, ms_level: i16 },

    #[error("scan '{scan_id}': MS1 scan carries {count} precursor(s)")]
    UnexpectedPrecursors { scan_id: String, count: usize },

    #[error("scan id must not be empty")]
    EmptyScanId,
}

impl RecordError {
    /// Every record error is a schema violation.
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::SchemaViolation
    }

    /// The offending scan id, when there is one
    pub fn scan_id(&self) -> Option<&str> {
        match self {
            RecordError::ArrayLengthMismatch { scan_id, .. }
            | RecordError::InvalidMsLevel { scan_id, .. }
            | RecordError::UnexpectedPrecursors { scan_id, .. } => Some(scan_id),
            RecordError::EmptyScanId => None,
        }
    }
}
