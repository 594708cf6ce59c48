use crate::error::ErrorKind;

/// Errors that can occur during mzML parsing
#[derive(Debug, thiserror::Error)]
pub enum MzMLError {
    /// Error parsing XML
    #[error("XML parsing error: {0}")]
    XmlError(#[from] quick_xml::Error),

    /// I/O error during file operations
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// A single scan could not be decoded or validated
    #[error("Malformed spectrum #{index} ('{id}'): {reason}")]
    MalformedSpectrum {
        /// Position of the scan in the file (0-based)
        index: usize,
        /// Native id, empty when the attribute is missing
        id: String,
        /// What was wrong
        reason: String,
    },

    /// Invalid mzML document structure
    #[error("Invalid mzML structure: {0}")]
    InvalidStructure(String),

    /// UTF-8 encoding error in attribute content
    #[error("UTF-8 encoding error: {0}")]
    Utf8Error(#[from] std::str::Utf8Error),
}

impl MzMLError {
    /// Position in the error taxonomy
    pub fn kind(&self) -> ErrorKind {
        match self {
            MzMLError::XmlError(_) | MzMLError::IoError(_) => ErrorKind::Io,
            MzMLError::MalformedSpectrum { .. }
            | MzMLError::InvalidStructure(_)
            | MzMLError::Utf8Error(_) => ErrorKind::MalformedInput,
        }
    }

    /// Whether the stream is positioned at the next scan after this error.
    ///
    /// Only per-scan decode failures qualify; structural, XML and I/O errors
    /// leave the cursor in an unknown place.
    pub fn is_skippable(&self) -> bool {
        matches!(self, MzMLError::MalformedSpectrum { .. })
    }
}
