//! Crate-wide error type and error taxonomy.

use std::fmt;

use crate::reader::ReaderError;
use crate::record::RecordError;
use crate::writer::WriterError;

#[cfg(feature = "mzml")]
use crate::converter::ConversionError;
#[cfg(feature = "mzml")]
use crate::mzml::MzMLError;

/// Coarse classification of every error the crate reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A record violates the data model
    SchemaViolation,
    /// The source file is not well-formed
    MalformedInput,
    /// A container could not be written or published
    WriteFailure,
    /// A column or field is missing or has an unusable type
    SchemaMismatch,
    /// File system, Parquet or Arrow failure
    Io,
    /// The caller cancelled the operation
    Cancelled,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::SchemaViolation => "schema violation",
            ErrorKind::MalformedInput => "malformed input",
            ErrorKind::WriteFailure => "write failure",
            ErrorKind::SchemaMismatch => "schema mismatch",
            ErrorKind::Io => "I/O error",
            ErrorKind::Cancelled => "cancelled",
        };
        f.write_str(name)
    }
}

/// Any error produced by this crate
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Record validation error
    #[error(transparent)]
    Record(#[from] RecordError),

    /// mzML source error
    #[cfg(feature = "mzml")]
    #[error(transparent)]
    Source(#[from] MzMLError),

    /// Container writer error
    #[error(transparent)]
    Writer(#[from] WriterError),

    /// Container reader or query error
    #[error(transparent)]
    Reader(#[from] ReaderError),

    /// Conversion pipeline error
    #[cfg(feature = "mzml")]
    #[error(transparent)]
    Conversion(#[from] ConversionError),
}

impl Error {
    /// Classify the error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Record(e) => e.kind(),
            #[cfg(feature = "mzml")]
            Error::Source(e) => e.kind(),
            Error::Writer(e) => e.kind(),
            Error::Reader(e) => e.kind(),
            #[cfg(feature = "mzml")]
            Error::Conversion(e) => e.kind(),
        }
    }
}

/// Result alias over [`Error`]
pub type Result<T, E = Error> = std::result::Result<T, E>;
