//! # mzML Parser Module
//!
//! This module provides streaming parsing of mzML files, the XML-based community
//! standard for mass spectrometry data defined by HUPO-PSI, into
//! [`SpectralRecord`](crate::record::SpectralRecord)s.
//!
//! ## Design Goals
//!
//! - **Streaming**: Process arbitrarily large files one scan at a time
//! - **Tolerant**: A malformed scan can be skipped without losing the stream
//!   (see [`OnError`])
//! - **Efficient**: Pull-parsing with quick-xml; Base64 payloads are decoded
//!   only after the whole scan element has been read
//!
//! ## mzML Structure
//!
//! ```text
//! indexedmzML (optional wrapper)
//! └── mzML
//!     ├── cvList, fileDescription, softwareList, ... (skipped)
//!     └── run
//!         └── spectrumList
//!             └── spectrum* (many)
//!                 ├── cvParam* (ms level, total ion current)
//!                 ├── scanList (scan start time, ion injection time)
//!                 ├── precursorList (for MS2+)
//!                 │   └── precursor (isolationWindow, selectedIonList)
//!                 └── binaryDataArrayList
//!                     └── binaryDataArray*
//!                         ├── cvParam* (encoding info)
//!                         └── binary (base64 data)
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use mzparquet::mzml::{MzMLStreamer, OnError, SourceOptions};
//!
//! let streamer = MzMLStreamer::open("run.mzML")?;
//! let mut scans = streamer.scans(SourceOptions {
//!     on_error: OnError::Skip,
//!     ..Default::default()
//! });
//! for record in scans.by_ref() {
//!     let record = record?;
//!     println!("{} ({} peaks)", record.scan_id(), record.peak_count());
//! }
//! println!("skipped {} malformed scans", scans.skipped());
//! # Ok::<(), mzparquet::mzml::MzMLError>(())
//! ```

mod binary;
mod cv_params;
mod models;
mod options;
mod streamer;

pub use binary::{ArrayFormat, ArrayValue, BinaryDecodeError, Compression, Precision};
pub use cv_params::{normalize_retention_time, CvParam, MS_CV_ACCESSIONS};
pub use models::{ArrayKind, MzMLFileMetadata, RawBinaryArray, RawPrecursor, RawScan};
pub use options::{OnError, SourceOptions};
pub use streamer::{MzMLError, MzMLStreamer, ScanIterator, DEFAULT_INPUT_BUFFER_SIZE};
