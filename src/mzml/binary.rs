//! Decoding of `<binaryDataArray>` payloads.
//!
//! A payload goes through Base64, then optionally zlib, and is finally read as
//! little-endian floats. The [`ArrayFormat`] of an array is resolved from its
//! cvParams once, and values are produced directly in the record's column
//! type (`f64` for m/z, `f32` for intensity).

use std::io::Read;

use base64::prelude::*;
use byteorder::{ByteOrder, LittleEndian};
use flate2::read::ZlibDecoder;

use super::cv_params::CvParam;

/// Numeric precision of the stored values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Precision {
    /// `MS:1000521`
    Float32,
    /// `MS:1000523`
    #[default]
    Float64,
}

impl Precision {
    fn from_accession(accession: &str) -> Option<Self> {
        match accession {
            "MS:1000521" => Some(Precision::Float32),
            "MS:1000523" => Some(Precision::Float64),
            _ => None,
        }
    }

    /// Bytes per stored value
    pub fn width(self) -> usize {
        match self {
            Precision::Float32 => 4,
            Precision::Float64 => 8,
        }
    }
}

/// Payload compression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Compression {
    /// `MS:1000576`
    #[default]
    None,
    /// `MS:1000574`
    Zlib,
}

/// Upper bound on the inflate buffer reserved from a declared array length
const MAX_PREALLOCATION: usize = 16 * 1024 * 1024;

/// Numpress accessions, recognised so they can be rejected by name
const NUMPRESS: [(&str, &str); 3] = [
    ("MS:1002312", "MS-Numpress linear prediction"),
    ("MS:1002313", "MS-Numpress positive integer"),
    ("MS:1002314", "MS-Numpress short logged float"),
];

/// Errors raised while decoding one array
#[derive(Debug, thiserror::Error)]
pub enum BinaryDecodeError {
    #[error("invalid Base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("zlib inflate failed: {0}")]
    Inflate(#[from] std::io::Error),

    #[error("payload of {bytes} bytes is not a whole number of {width}-byte values")]
    Truncated { bytes: usize, width: usize },

    #[error("expected {expected} values, decoded {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("unsupported compression: {0}")]
    Unsupported(&'static str),
}

/// Column types an array can be decoded into
pub trait ArrayValue: Copy {
    /// Read one value of the given precision from `bytes`
    fn read(bytes: &[u8], precision: Precision) -> Self;
}

impl ArrayValue for f64 {
    fn read(bytes: &[u8], precision: Precision) -> Self {
        match precision {
            Precision::Float32 => f64::from(LittleEndian::read_f32(bytes)),
            Precision::Float64 => LittleEndian::read_f64(bytes),
        }
    }
}

impl ArrayValue for f32 {
    fn read(bytes: &[u8], precision: Precision) -> Self {
        match precision {
            Precision::Float32 => LittleEndian::read_f32(bytes),
            Precision::Float64 => LittleEndian::read_f64(bytes) as f32,
        }
    }
}

/// How an array's payload is stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ArrayFormat {
    /// Stored value width
    pub precision: Precision,
    /// Payload compression
    pub compression: Compression,
}

impl ArrayFormat {
    /// Resolve the format from an array's cvParams.
    ///
    /// Absent terms default to 64-bit, uncompressed. Numpress is rejected.
    pub fn from_cv_params(cv_params: &[CvParam]) -> Result<Self, BinaryDecodeError> {
        let mut format = ArrayFormat::default();
        for param in cv_params {
            let accession = param.accession.as_str();
            if let Some(precision) = Precision::from_accession(accession) {
                format.precision = precision;
            }
            match accession {
                "MS:1000574" => format.compression = Compression::Zlib,
                "MS:1000576" => format.compression = Compression::None,
                _ => {}
            }
            if let Some((_, name)) = NUMPRESS.iter().find(|(acc, _)| *acc == accession) {
                return Err(BinaryDecodeError::Unsupported(*name));
            }
        }
        Ok(format)
    }

    /// Decode the Base64 text of a `<binary>` element.
    ///
    /// `expected` is the declared array length; an empty payload is valid only
    /// when zero values are expected.
    pub fn decode<T: ArrayValue>(
        &self,
        text: &str,
        expected: usize,
    ) -> Result<Vec<T>, BinaryDecodeError> {
        let text = text.trim();
        let values = if text.is_empty() {
            Vec::new()
        } else {
            let raw = BASE64_STANDARD.decode(text)?;
            let bytes = match self.compression {
                Compression::None => raw,
                Compression::Zlib => {
                    // the declared length is untrusted; it only sizes the first allocation
                    let hint = expected
                        .saturating_mul(self.precision.width())
                        .min(MAX_PREALLOCATION);
                    let mut inflated = Vec::with_capacity(hint);
                    ZlibDecoder::new(raw.as_slice()).read_to_end(&mut inflated)?;
                    inflated
                }
            };
            self.read_values(&bytes)?
        };

        if values.len() != expected {
            return Err(BinaryDecodeError::LengthMismatch {
                expected,
                actual: values.len(),
            });
        }
        Ok(values)
    }

    fn read_values<T: ArrayValue>(&self, bytes: &[u8]) -> Result<Vec<T>, BinaryDecodeError> {
        let width = self.precision.width();
        if bytes.len() % width != 0 {
            return Err(BinaryDecodeError::Truncated {
                bytes: bytes.len(),
                width,
            });
        }
        Ok(bytes
            .chunks_exact(width)
            .map(|chunk| T::read(chunk, self.precision))
            .collect())
    }
}
