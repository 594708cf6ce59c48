//! # mzParquet Writer Module
//!
//! This module writes [`SpectralRecord`](crate::record::SpectralRecord)s to a
//! single mzParquet container in either layout.
//!
//! ## Design Principles
//!
//! 1. **Streaming Architecture**: Records are buffered into Arrow builders and
//!    handed to Parquet in batches, bounded by record and peak counts.
//!
//! 2. **Atomic Publish**: The container is written to a staging file next to
//!    the target and renamed into place only after the footer is synced. An
//!    aborted or dropped writer leaves no partial file behind.
//!
//! 3. **Deterministic Output**: Identical records and configuration produce
//!    byte-identical files; footer metadata is written in a fixed order.
//!
//! 4. **Configurable Compression**: Supports ZSTD (default), Snappy, and uncompressed.
//!
//! ## Example
//!
//! ```rust,no_run
//! use mzparquet::record::SpectralRecordBuilder;
//! use mzparquet::schema::Layout;
//! use mzparquet::writer::{ContainerWriter, WriterConfig};
//!
//! let config = WriterConfig::default();
//! let mut writer = ContainerWriter::create("run.mzparquet", Layout::Long, config)?;
//! let record = SpectralRecordBuilder::new("scan=1", 1)
//!     .scan_start_time(12.5)
//!     .add_peak(400.0, 1.0e4)
//!     .build()?;
//! writer.write_record(&record)?;
//! let stats = writer.finish()?;
//! println!("{stats}");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod config;
mod container;
mod encoder;
mod error;
mod stats;

#[cfg(test)]
mod tests;

pub use config::{CompressionType, WriterConfig};
pub use container::ContainerWriter;
pub use error::WriterError;
pub use stats::WriterStats;
