//! Raw (undecoded) scan data captured from mzML.
//!
//! The streamer consumes a whole `<spectrum>` element into a [`RawScan`] before
//! any Base64 payload is decoded. Decoding is a separate step, so a scan that
//! fails to decode never leaves the XML cursor inside the element.

use super::binary::{ArrayFormat, ArrayValue};
use super::cv_params::{CvParam, MS_CV_ACCESSIONS};
use super::streamer::MzMLError;
use crate::record::{Precursor, PrecursorPolicy, SpectralRecord, SpectralRecordBuilder};

/// File-level metadata from mzML
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MzMLFileMetadata {
    /// mzML version
    pub version: Option<String>,

    /// Run ID
    pub run_id: Option<String>,

    /// Declared number of spectra (`spectrumList/@count`)
    pub spectrum_count: Option<usize>,
}

/// Role of a binary data array
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArrayKind {
    /// m/z array (MS:1000514)
    Mz,
    /// Intensity array (MS:1000515)
    Intensity,
    /// Any other array; ignored
    #[default]
    Other,
}

/// A `<binaryDataArray>` with its payload still Base64-encoded
#[derive(Debug, Clone, Default)]
pub struct RawBinaryArray {
    /// Array role
    pub kind: ArrayKind,
    /// Encoding and compression terms
    pub cv_params: Vec<CvParam>,
    /// `arrayLength` override of the spectrum's `defaultArrayLength`
    pub array_length: Option<usize>,
    /// Base64 text of the `<binary>` element
    pub base64_data: String,
}

impl RawBinaryArray {
    pub(crate) fn push_cv_param(&mut self, cv: CvParam) {
        match cv.accession.as_str() {
            MS_CV_ACCESSIONS::MZ_ARRAY => self.kind = ArrayKind::Mz,
            MS_CV_ACCESSIONS::INTENSITY_ARRAY => self.kind = ArrayKind::Intensity,
            _ => {}
        }
        self.cv_params.push(cv);
    }
}

/// Precursor values as found in `<precursor>`
#[derive(Debug, Clone, Default)]
pub struct RawPrecursor {
    pub spectrum_ref: Option<String>,
    pub selected_ion_mz: Option<f64>,
    pub selected_ion_charge: Option<i64>,
    pub selected_ion_intensity: Option<f64>,
    pub isolation_window_target: Option<f64>,
    pub isolation_window_lower: Option<f64>,
    pub isolation_window_upper: Option<f64>,
}

/// A scan consumed from the stream, not yet decoded
#[derive(Debug, Clone, Default)]
pub struct RawScan {
    /// Position of the scan in the file (0-based)
    pub index: usize,
    /// Native id (`spectrum/@id`)
    pub id: Option<String>,
    /// `defaultArrayLength`
    pub default_array_length: usize,
    pub ms_level: Option<i64>,
    /// Seconds
    pub scan_start_time: Option<f64>,
    /// Milliseconds
    pub ion_injection_time: Option<f64>,
    pub total_ion_current: Option<f64>,
    /// Set by the centroid/profile spectrum terms
    pub centroid: bool,
    pub inverse_ion_mobility: Option<f64>,
    pub precursors: Vec<RawPrecursor>,
    pub arrays: Vec<RawBinaryArray>,
}

impl RawScan {
    fn malformed(&self, reason: impl Into<String>) -> MzMLError {
        MzMLError::MalformedSpectrum {
            index: self.index,
            id: self.id.clone().unwrap_or_default(),
            reason: reason.into(),
        }
    }

    fn decode_array<T: ArrayValue>(&self, kind: ArrayKind) -> Result<Vec<T>, MzMLError> {
        let label = match kind {
            ArrayKind::Mz => "m/z",
            ArrayKind::Intensity => "intensity",
            ArrayKind::Other => "auxiliary",
        };

        match self.arrays.iter().find(|a| a.kind == kind) {
            Some(array) => {
                let expected = array.array_length.unwrap_or(self.default_array_length);
                ArrayFormat::from_cv_params(&array.cv_params)
                    .and_then(|format| format.decode(&array.base64_data, expected))
                    .map_err(|e| self.malformed(format!("{} array: {}", label, e)))
            }
            // A scan that declares no peaks may omit its arrays altogether
            None if self.default_array_length == 0 => Ok(Vec::new()),
            None => Err(self.malformed(format!("missing {} array", label))),
        }
    }

    fn decode_precursor(&self, raw: &RawPrecursor) -> Result<Precursor, MzMLError> {
        let selected_ion_mz = raw
            .selected_ion_mz
            .ok_or_else(|| self.malformed("precursor without selected ion m/z"))?;

        let selected_ion_charge = raw
            .selected_ion_charge
            .map(|z| {
                i16::try_from(z)
                    .map_err(|_| self.malformed(format!("charge state {} out of range", z)))
            })
            .transpose()?;

        Ok(Precursor {
            selected_ion_mz,
            selected_ion_charge,
            selected_ion_intensity: raw.selected_ion_intensity.map(|v| v as f32),
            isolation_window_target: raw.isolation_window_target,
            isolation_window_lower: raw.isolation_window_lower,
            isolation_window_upper: raw.isolation_window_upper,
            spectrum_ref: raw.spectrum_ref.clone(),
        })
    }

    /// Decode the binary arrays and validate the scan into a [`SpectralRecord`].
    ///
    /// Every failure is reported as [`MzMLError::MalformedSpectrum`].
    pub fn decode(self, policy: PrecursorPolicy) -> Result<SpectralRecord, MzMLError> {
        let id = match self.id.as_deref() {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => return Err(self.malformed("missing id attribute")),
        };

        let ms_level = self
            .ms_level
            .ok_or_else(|| self.malformed("missing ms level"))?;
        let ms_level = i16::try_from(ms_level)
            .map_err(|_| self.malformed(format!("ms level {} out of range", ms_level)))?;

        let mz: Vec<f64> = self.decode_array(ArrayKind::Mz)?;
        let intensity: Vec<f32> = self.decode_array(ArrayKind::Intensity)?;

        let precursors = self
            .precursors
            .iter()
            .map(|p| self.decode_precursor(p))
            .collect::<Result<Vec<_>, _>>()?;

        let mut builder = SpectralRecordBuilder::new(id, ms_level)
            .peaks(mz, intensity)
            .centroid(self.centroid)
            .precursors(precursors)
            .precursor_policy(policy);
        if let Some(rt) = self.scan_start_time {
            builder = builder.scan_start_time(rt as f32);
        }
        if let Some(it) = self.ion_injection_time {
            builder = builder.ion_injection_time(it as f32);
        }
        if let Some(tic) = self.total_ion_current {
            builder = builder.total_ion_current(tic as f32);
        }
        if let Some(mobility) = self.inverse_ion_mobility {
            builder = builder.inverse_ion_mobility(mobility as f32);
        }

        builder.build().map_err(|e| self.malformed(e.to_string()))
    }
}
