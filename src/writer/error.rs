use std::path::PathBuf;

use crate::error::ErrorKind;

/// Errors that can occur during writing
#[derive(Debug, thiserror::Error)]
pub enum WriterError {
    /// I/O error during file operations
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from the Arrow library during array operations
    #[error("Arrow error: {0}")]
    ArrowError(#[from] arrow::error::ArrowError),

    /// Error from the Parquet library during file writing
    #[error("Parquet error: {0}")]
    ParquetError(#[from] parquet::errors::ParquetError),

    /// Error serializing footer metadata
    #[error("Metadata error: {0}")]
    MetadataError(#[from] serde_json::Error),

    /// Invalid data provided to the writer
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// A scan id was written twice
    #[error("duplicate scan id '{scan_id}' in {}", .path.display())]
    DuplicateScanId { scan_id: String, path: PathBuf },

    /// The staging file next to the target could not be created
    #[error("cannot create staging file in {}: {source}", .path.display())]
    CreateTemp {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The finished container could not be moved into place
    #[error("cannot publish container to {}: {source}", .path.display())]
    Publish {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl WriterError {
    /// Every writer error is a write failure.
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::WriteFailure
    }
}
