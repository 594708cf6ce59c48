//! # mzParquet Reader Module
//!
//! This module opens mzParquet containers of either layout and streams their
//! contents back as Arrow record batches or as
//! [`SpectralRecord`](crate::record::SpectralRecord)s.
//!
//! ## Features
//!
//! - **Footer-only open**: layout, format version and schema come from the
//!   Parquet footer; a file without a layout tag is rejected
//! - **Streaming Iteration**: batches and records are decoded on demand
//! - **Projection**: decode only the columns a caller asks for
//! - **In-memory containers**: [`MzParquetReader::from_bytes`]
//!
//! Predicate queries live in [`crate::query`].
//!
//! ## Example
//!
//! ```rust,no_run
//! use mzparquet::reader::MzParquetReader;
//!
//! let reader = MzParquetReader::open("run.mzparquet")?;
//! println!("{} container, format {}", reader.layout(), reader.metadata().format_version);
//!
//! for record in reader.records()? {
//!     let record = record?;
//!     println!("{}: {} peaks", record.scan_id(), record.peak_count());
//! }
//! # Ok::<(), mzparquet::reader::ReaderError>(())
//! ```

mod batches;
mod config;
mod error;
mod metadata;
mod open;
mod records;
mod summary;
pub(crate) mod utils;

#[cfg(test)]
mod tests;

pub use batches::RecordBatchIterator;
pub use config::ReaderConfig;
pub use error::ReaderError;
pub use metadata::FileMetadata;
pub use records::RecordIterator;
pub use summary::FileSummary;

pub(crate) use config::SourceChunk;
use parquet::arrow::arrow_reader::ArrowReaderMetadata;

/// Reader for mzParquet containers
pub struct MzParquetReader {
    source: SourceChunk,
    config: ReaderConfig,
    arrow_metadata: ArrowReaderMetadata,
    file_metadata: FileMetadata,
}
