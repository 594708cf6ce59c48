use std::io::BufRead;

use quick_xml::events::Event;

use super::helpers::get_attribute;
use super::{MzMLError, MzMLStreamer};
use crate::mzml::models::MzMLFileMetadata;

impl<R: BufRead> MzMLStreamer<R> {
    /// Read file-level metadata (everything before spectrumList).
    ///
    /// Leaves the stream positioned at the first spectrum. Calling it again is
    /// a no-op.
    pub fn read_metadata(&mut self) -> Result<&MzMLFileMetadata, MzMLError> {
        if self.metadata_read {
            return Ok(&self.metadata);
        }
        self.metadata_read = true;

        let mut buf = Vec::new();
        loop {
            match self.reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => match e.name().as_ref() {
                    b"mzML" => {
                        self.metadata.version = get_attribute(e, "version")?;
                    }
                    b"run" => {
                        self.metadata.run_id = get_attribute(e, "id")?;
                    }
                    b"spectrumList" => {
                        self.in_spectrum_list = true;
                        self.metadata.spectrum_count =
                            get_attribute(e, "count")?.and_then(|s| s.parse().ok());
                        break;
                    }
                    // Spectra always precede chromatograms
                    b"chromatogramList" => break,
                    _ => {}
                },
                Ok(Event::Empty(ref e)) if e.name().as_ref() == b"spectrumList" => {
                    self.metadata.spectrum_count = Some(0);
                    break;
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(MzMLError::XmlError(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(&self.metadata)
    }
}
