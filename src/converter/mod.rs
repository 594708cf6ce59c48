//! mzML to mzParquet converter
//!
//! This module provides the high-level conversion pipeline from mzML files to
//! a single mzParquet container. Scans are streamed from the source one at a
//! time and handed to a [`ContainerWriter`](crate::writer::ContainerWriter),
//! so memory is bounded by the writer's batch size rather than the run size.
//!
//! A failed conversion never leaves a container behind: the writer is aborted
//! and its staging file removed.
//!
//! ```rust,no_run
//! use mzparquet::converter::{ConversionConfig, MzMLConverter};
//! use mzparquet::schema::Layout;
//!
//! let config = ConversionConfig::default().with_layout(Layout::Wide);
//! let stats = MzMLConverter::with_config(config).convert("run.mzML", "run.mzparquetW")?;
//! println!("{stats}");
//! # Ok::<(), mzparquet::converter::ConversionError>(())
//! ```

use std::fmt;
use std::path::PathBuf;

use crate::error::ErrorKind;
use crate::mzml::{MzMLError, OnError, SourceOptions};
use crate::record::PrecursorPolicy;
use crate::schema::Layout;
use crate::writer::{WriterConfig, WriterError};

mod pipeline;


/// Errors that can occur during conversion
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    /// Error parsing the input mzML file
    #[error("mzML parsing error: {0}")]
    MzMLError(#[from] MzMLError),

    /// Error writing the output container
    #[error("Writer error: {0}")]
    WriterError(#[from] WriterError),

    /// The input file could not be opened
    #[error("cannot open input {}: {source}", .path.display())]
    Input {
        /// Path of the input
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl ConversionError {
    /// Position in the error taxonomy
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConversionError::MzMLError(e) => e.kind(),
            ConversionError::WriterError(e) => e.kind(),
            ConversionError::Input { .. } => ErrorKind::Io,
        }
    }
}

/// Configuration for the mzML to mzParquet conversion
#[derive(Debug, Clone)]
pub struct ConversionConfig {
    /// Container layout
    pub layout: Layout,

    /// Tolerance and precursor options for reading the source
    pub source: SourceOptions,

    /// Writer configuration
    pub writer_config: WriterConfig,

    /// Progress is logged every this many spectra
    pub progress_interval: usize,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            layout: Layout::default(),
            source: SourceOptions::default(),
            writer_config: WriterConfig::default(),
            progress_interval: 1000,
        }
    }
}

impl ConversionConfig {
    /// Configuration optimized for maximum compression (slower conversion)
    pub fn max_compression() -> Self {
        Self {
            writer_config: WriterConfig::max_compression(),
            ..Self::default()
        }
    }

    /// Configuration optimized for fast conversion (larger files)
    pub fn fast_write() -> Self {
        Self {
            writer_config: WriterConfig::fast_write(),
            ..Self::default()
        }
    }

    /// Balanced configuration (default)
    pub fn balanced() -> Self {
        Self::default()
    }

    /// Select the container layout
    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    /// Select how malformed scans are handled
    pub fn with_on_error(mut self, on_error: OnError) -> Self {
        self.source.on_error = on_error;
        self
    }

    /// Select how precursors on MS1 scans are handled
    pub fn with_precursor_policy(mut self, policy: PrecursorPolicy) -> Self {
        self.source.precursor_policy = policy;
        self
    }
}

/// Statistics from a conversion
#[derive(Debug, Clone, Default)]
pub struct ConversionStats {
    /// Container layout
    pub layout: Layout,
    /// Total spectra converted
    pub spectra_count: usize,
    /// Malformed spectra passed over under [`OnError::Skip`]
    pub spectra_skipped: usize,
    /// Total peaks converted
    pub peak_count: usize,
    /// Number of MS1 spectra
    pub ms1_spectra: usize,
    /// Number of MS2 spectra
    pub ms2_spectra: usize,
    /// Number of MS3+ spectra
    pub msn_spectra: usize,
    /// Physical rows in the container
    pub rows_written: usize,
    /// Parquet row groups in the container
    pub row_groups_written: usize,
    /// Size of source mzML file in bytes (0 when converting from a stream)
    pub source_file_size: u64,
    /// Size of output container in bytes
    pub output_file_size: u64,
    /// Compression ratio (source/output)
    pub compression_ratio: f64,
}

impl ConversionStats {
    fn count_level(&mut self, ms_level: i16) {
        match ms_level {
            1 => self.ms1_spectra += 1,
            2 => self.ms2_spectra += 1,
            _ => self.msn_spectra += 1,
        }
    }

    fn update_ratio(&mut self) {
        self.compression_ratio = if self.output_file_size > 0 {
            self.source_file_size as f64 / self.output_file_size as f64
        } else {
            0.0
        };
    }
}

impl fmt::Display for ConversionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} spectra ({} MS1, {} MS2, {} MSn) with {} peaks into a {} container",
            self.spectra_count,
            self.ms1_spectra,
            self.ms2_spectra,
            self.msn_spectra,
            self.peak_count,
            self.layout
        )?;
        if self.spectra_skipped > 0 {
            write!(f, ", {} malformed spectra skipped", self.spectra_skipped)?;
        }
        if self.source_file_size > 0 {
            write!(
                f,
                "; {} -> {} bytes ({:.2}x)",
                self.source_file_size, self.output_file_size, self.compression_ratio
            )?;
        }
        Ok(())
    }
}

/// Converter from mzML to mzParquet
pub struct MzMLConverter {
    config: ConversionConfig,
}

impl MzMLConverter {
    /// Create a new converter with default configuration
    pub fn new() -> Self {
        Self {
            config: ConversionConfig::default(),
        }
    }

    /// Create a new converter with custom configuration
    pub fn with_config(config: ConversionConfig) -> Self {
        Self { config }
    }

    /// Configuration in use
    pub fn config(&self) -> &ConversionConfig {
        &self.config
    }
}

impl Default for MzMLConverter {
    fn default() -> Self {
        Self::new()
    }
}
