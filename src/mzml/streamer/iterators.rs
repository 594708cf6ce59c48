use std::io::BufRead;

use log::warn;

use super::{MzMLError, MzMLStreamer};
use crate::mzml::models::MzMLFileMetadata;
use crate::mzml::options::OnError;
use crate::record::SpectralRecord;

/// Iterator over the scans of an mzML file.
///
/// Under [`OnError::Skip`], malformed scans are logged, counted and passed
/// over. Any error that is yielded ends the iteration.
pub struct ScanIterator<R: BufRead> {
    streamer: MzMLStreamer<R>,
    on_error: OnError,
    skipped: usize,
    done: bool,
}

impl<R: BufRead> ScanIterator<R> {
    pub(super) fn new(streamer: MzMLStreamer<R>, on_error: OnError) -> Self {
        Self {
            streamer,
            on_error,
            skipped: 0,
            done: false,
        }
    }

    /// Number of malformed scans skipped so far
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// File metadata of the underlying stream
    pub fn metadata(&self) -> &MzMLFileMetadata {
        self.streamer.metadata()
    }
}

impl<R: BufRead> Iterator for ScanIterator<R> {
    type Item = Result<SpectralRecord, MzMLError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            match self.streamer.next_spectrum() {
                Ok(Some(record)) => return Some(Ok(record)),
                Ok(None) => {
                    self.done = true;
                    return None;
                }
                Err(e) if e.is_skippable() && self.on_error == OnError::Skip => {
                    warn!("Skipping scan: {}", e);
                    self.skipped += 1;
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
    }
}
