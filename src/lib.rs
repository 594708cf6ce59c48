//! # mzParquet - Queryable Parquet Containers for Mass Spectrometry
//!
//! `mzparquet` stores mass spectrometry scans in Apache Parquet so that any
//! dataframe engine can read them, and answers nested predicates over them
//! without a dataframe engine.
//!
//! ## Key Features
//!
//! - **Two Layouts**: the *long* layout (`.mzparquet`) stores one row per peak
//!   with scan metadata repeated on every row; the *wide* layout
//!   (`.mzparquetW`) stores one row per scan with peaks as list columns. The
//!   layout is fixed at write time and recorded in the Parquet footer.
//!
//! - **Streaming mzML Conversion**: scans are pulled from mzML one at a time,
//!   with optional skipping of malformed scans.
//!
//! - **Atomic Publish**: a container is written to a staging file and renamed
//!   into place, so readers never observe a partial file.
//!
//! - **Nested Predicates**: "any m/z in a range", "any precursor m/z in a
//!   range" and scalar equalities, answered per scan with identical results on
//!   both layouts.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mzparquet::prelude::*;
//!
//! let record = SpectralRecordBuilder::new("scan=2", 2)
//!     .scan_start_time(91.0)
//!     .peaks(vec![100.0, 267.05], vec![10.0, 20.0])
//!     .precursor(Precursor::new(534.5).with_charge(2))
//!     .build()?;
//!
//! let config = WriterConfig::default();
//! let mut writer = ContainerWriter::create("run.mzparquetW", Layout::Wide, config)?;
//! writer.write_record(&record)?;
//! let stats = writer.finish()?;
//! println!("{stats}");
//!
//! let reader = MzParquetReader::open("run.mzparquetW")?;
//! let ids = reader
//!     .query(Predicate::mz_between(267.0, 267.1).and(Predicate::ms_level(2)))
//!     .scan_ids()?;
//! assert_eq!(ids, vec!["scan=2"]);
//! # Ok::<(), mzparquet::Error>(())
//! ```
//!
//! ## Modules
//!
//! - [`record`]: the in-memory scan model and its validation
//! - [`mzml`]: streaming mzML parser (feature `mzml`)
//! - [`schema`]: column names, Arrow schemas and footer keys of both layouts
//! - [`writer`]: streaming container writer
//! - [`reader`]: container reader, record reconstruction and summaries
//! - [`query`]: predicate construction and evaluation
//! - [`converter`]: mzML to container pipeline (feature `mzml`)

#![warn(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod query;
pub mod reader;
pub mod record;
pub mod schema;
pub mod writer;

#[cfg(feature = "mzml")]
pub mod converter;
#[cfg(feature = "mzml")]
pub mod mzml;

pub use error::{Error, ErrorKind, Result};

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::error::{Error, ErrorKind};
    pub use crate::query::{CancellationToken, Predicate, Range};
    pub use crate::reader::{
        FileMetadata, FileSummary, MzParquetReader, ReaderConfig, ReaderError,
    };
    pub use crate::record::{
        Precursor, PrecursorPolicy, RecordError, SpectralRecord, SpectralRecordBuilder,
    };
    pub use crate::schema::{columns, Layout, MZPARQUET_FORMAT_VERSION};
    pub use crate::writer::{
        CompressionType, ContainerWriter, WriterConfig, WriterError, WriterStats,
    };

    #[cfg(feature = "mzml")]
    pub use crate::converter::{ConversionConfig, ConversionError, ConversionStats, MzMLConverter};
    #[cfg(feature = "mzml")]
    pub use crate::mzml::{MzMLStreamer, OnError, SourceOptions};
}
