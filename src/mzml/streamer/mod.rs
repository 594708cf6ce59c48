//! Streaming mzML parser using quick-xml
//!
//! This module provides a pull-based streaming parser for mzML files,
//! designed to handle arbitrarily large files with minimal memory usage.
//! Only one scan is held in memory at a time.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use quick_xml::Reader;

use super::models::MzMLFileMetadata;
use super::options::SourceOptions;
use crate::record::PrecursorPolicy;

pub use error::MzMLError;
pub use iterators::ScanIterator;

mod error;
mod helpers;
mod iterators;
mod metadata;
mod spectrum;

#[cfg(test)]
mod tests;

/// Default read buffer for files opened by path
pub const DEFAULT_INPUT_BUFFER_SIZE: usize = 64 * 1024;

/// Streaming parser for mzML files.
///
/// Forward-only and single-pass; iterating consumes the streamer.
pub struct MzMLStreamer<R: BufRead> {
    reader: Reader<R>,
    metadata: MzMLFileMetadata,
    metadata_read: bool,
    in_spectrum_list: bool,
    current_spectrum_index: usize,
    precursor_policy: PrecursorPolicy,
}

impl MzMLStreamer<BufReader<File>> {
    /// Open an mzML file by path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, MzMLError> {
        let file = File::open(path.as_ref())?;
        Self::new(BufReader::with_capacity(DEFAULT_INPUT_BUFFER_SIZE, file))
    }
}

impl<R: BufRead> MzMLStreamer<R> {
    /// Create a new streamer from a BufRead source
    pub fn new(reader: R) -> Result<Self, MzMLError> {
        let mut xml_reader = Reader::from_reader(reader);
        xml_reader.config_mut().trim_text(true);

        Ok(Self {
            reader: xml_reader,
            metadata: MzMLFileMetadata::default(),
            metadata_read: false,
            in_spectrum_list: false,
            current_spectrum_index: 0,
            precursor_policy: PrecursorPolicy::default(),
        })
    }

    /// Set how precursors on MS1 scans are treated by [`Self::next_spectrum`]
    pub fn set_precursor_policy(&mut self, policy: PrecursorPolicy) {
        self.precursor_policy = policy;
    }

    /// Get the file metadata
    pub fn metadata(&self) -> &MzMLFileMetadata {
        &self.metadata
    }

    /// Declared spectrum count, once the metadata has been read
    pub fn spectrum_count(&self) -> Option<usize> {
        self.metadata.spectrum_count
    }

    /// Number of `<spectrum>` elements consumed so far
    pub fn spectra_read(&self) -> usize {
        self.current_spectrum_index
    }

    /// Iterate over all scans with the given tolerance options
    pub fn scans(mut self, options: SourceOptions) -> ScanIterator<R> {
        self.precursor_policy = options.precursor_policy;
        ScanIterator::new(self, options.on_error)
    }
}
