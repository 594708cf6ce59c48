use std::path::PathBuf;

use crate::error::ErrorKind;
use crate::schema::SchemaValidationError;

/// Errors that can occur during reading and querying
#[derive(Debug, thiserror::Error)]
pub enum ReaderError {
    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The container file could not be opened
    #[error("cannot open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Arrow error
    #[error("Arrow error: {0}")]
    ArrowError(#[from] arrow::error::ArrowError),

    /// Parquet error
    #[error("Parquet error: {0}")]
    ParquetError(#[from] parquet::errors::ParquetError),

    /// The file is Parquet but not an mzParquet container
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// A column or struct field is missing or has an unusable type
    #[error("schema mismatch on {}: {reason}", target_name(.column, .field.as_deref()))]
    SchemaMismatch {
        column: String,
        field: Option<String>,
        reason: String,
    },

    /// The operation was cancelled through its token
    #[error("operation cancelled")]
    Cancelled,
}

fn target_name(column: &str, field: Option<&str>) -> String {
    match field {
        Some(field) => format!("'{column}.{field}'"),
        None => format!("'{column}'"),
    }
}

impl ReaderError {
    pub(crate) fn mismatch(column: &str, field: Option<&str>, reason: impl Into<String>) -> Self {
        ReaderError::SchemaMismatch {
            column: column.to_string(),
            field: field.map(str::to_string),
            reason: reason.into(),
        }
    }

    /// Map onto the crate error taxonomy
    pub fn kind(&self) -> ErrorKind {
        match self {
            ReaderError::SchemaMismatch { .. } => ErrorKind::SchemaMismatch,
            ReaderError::Cancelled => ErrorKind::Cancelled,
            _ => ErrorKind::Io,
        }
    }
}

impl From<SchemaValidationError> for ReaderError {
    fn from(err: SchemaValidationError) -> Self {
        match err {
            SchemaValidationError::MissingColumn(column) => {
                ReaderError::mismatch(&column, None, "column is missing")
            }
            SchemaValidationError::TypeMismatch {
                column,
                expected,
                found,
            } => ReaderError::mismatch(
                &column,
                None,
                format!("expected {expected}, found {found}"),
            ),
        }
    }
}
