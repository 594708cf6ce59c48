//! # Spectral Record Model
//!
//! One [`SpectralRecord`] per scan: a native scan id, an MS level, positionally
//! paired m/z and intensity arrays, and zero or more [`Precursor`]s.
//!
//! Records validate themselves on construction and are immutable afterwards.
//! Both container layouts store and reconstruct exactly this model, so a record
//! written through either layout reads back equal.
//!
//! ```rust
//! use mzparquet::record::{Precursor, SpectralRecordBuilder};
//!
//! let record = SpectralRecordBuilder::new("scan=2", 2)
//!     .scan_start_time(61.2)
//!     .add_peak(267.05, 1200.0)
//!     .precursor(Precursor::new(534.5).with_charge(2))
//!     .build()?;
//!
//! assert_eq!(record.peak_count(), 1);
//! # Ok::<(), mzparquet::record::RecordError>(())
//! ```

mod builder;
mod error;


pub use builder::SpectralRecordBuilder;
pub use error::RecordError;

use serde::{Deserialize, Serialize};

/// How a precursor list on an MS1 scan is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrecursorPolicy {
    /// Precursors on an `ms_level == 1` scan are a schema violation.
    #[default]
    Strict,
    /// Precursors are accepted on any MS level and stored as given.
    Permissive,
}

/// Precursor ion information of a fragmentation scan.
#[derive(Debug, Clone, PartialEq)]
pub struct Precursor {
    /// Selected ion m/z
    pub selected_ion_mz: f64,
    /// Selected ion charge state
    pub selected_ion_charge: Option<i16>,
    /// Selected ion intensity
    pub selected_ion_intensity: Option<f32>,
    /// Isolation window target m/z
    pub isolation_window_target: Option<f64>,
    /// Isolation window lower offset
    pub isolation_window_lower: Option<f64>,
    /// Isolation window upper offset
    pub isolation_window_upper: Option<f64>,
    /// Native id of the scan the precursor was selected from
    pub spectrum_ref: Option<String>,
}

impl Precursor {
    /// Create a precursor with only a selected ion m/z.
    pub fn new(selected_ion_mz: f64) -> Self {
        Self {
            selected_ion_mz,
            selected_ion_charge: None,
            selected_ion_intensity: None,
            isolation_window_target: None,
            isolation_window_lower: None,
            isolation_window_upper: None,
            spectrum_ref: None,
        }
    }

    /// Set the selected ion charge state
    pub fn with_charge(mut self, charge: i16) -> Self {
        self.selected_ion_charge = Some(charge);
        self
    }

    /// Set the selected ion intensity
    pub fn with_intensity(mut self, intensity: f32) -> Self {
        self.selected_ion_intensity = Some(intensity);
        self
    }

    /// Set the isolation window as target m/z with lower and upper offsets
    pub fn with_isolation_window(mut self, target: f64, lower: f64, upper: f64) -> Self {
        self.isolation_window_target = Some(target);
        self.isolation_window_lower = Some(lower);
        self.isolation_window_upper = Some(upper);
        self
    }

    /// Set the native id of the parent scan
    pub fn with_spectrum_ref(mut self, spectrum_ref: impl Into<String>) -> Self {
        self.spectrum_ref = Some(spectrum_ref.into());
        self
    }
}

/// A single scan.
///
/// Construct with [`SpectralRecord::new`] or [`SpectralRecordBuilder`]; both
/// enforce the record invariants:
///
/// - `scan_id` is non-empty,
/// - `ms_level >= 1`,
/// - `mz` and `intensity` have equal length,
/// - precursors appear only on `ms_level > 1` scans (under [`PrecursorPolicy::Strict`]).
#[derive(Debug, Clone, PartialEq)]
pub struct SpectralRecord {
    scan_id: String,
    ms_level: i16,
    scan_start_time: Option<f32>,
    ion_injection_time: Option<f32>,
    total_ion_current: Option<f32>,
    centroid: bool,
    inverse_ion_mobility: Option<f32>,
    mz: Vec<f64>,
    intensity: Vec<f32>,
    precursors: Vec<Precursor>,
}

impl SpectralRecord {
    /// Create a record without precursors or scan metadata.
    pub fn new(
        scan_id: impl Into<String>,
        ms_level: i16,
        mz: Vec<f64>,
        intensity: Vec<f32>,
    ) -> Result<Self, RecordError> {
        Self::validated(
            SpectralRecord {
                scan_id: scan_id.into(),
                ms_level,
                scan_start_time: None,
                ion_injection_time: None,
                total_ion_current: None,
                centroid: false,
                inverse_ion_mobility: None,
                mz,
                intensity,
                precursors: Vec::new(),
            },
            PrecursorPolicy::Strict,
        )
    }

    pub(crate) fn validated(record: Self, policy: PrecursorPolicy) -> Result<Self, RecordError> {
        if record.scan_id.is_empty() {
            return Err(RecordError::EmptyScanId);
        }
        if record.ms_level < 1 {
            return Err(RecordError::InvalidMsLevel {
                scan_id: record.scan_id,
                ms_level: record.ms_level,
            });
        }
        if record.mz.len() != record.intensity.len() {
            return Err(RecordError::ArrayLengthMismatch {
                scan_id: record.scan_id,
                mz_len: record.mz.len(),
                intensity_len: record.intensity.len(),
            });
        }
        if policy == PrecursorPolicy::Strict
            && record.ms_level == 1
            && !record.precursors.is_empty()
        {
            return Err(RecordError::UnexpectedPrecursors {
                count: record.precursors.len(),
                scan_id: record.scan_id,
            });
        }
        Ok(record)
    }

    /// Native scan id
    pub fn scan_id(&self) -> &str {
        &self.scan_id
    }

    /// MS level (1 for MS1, 2 for MS/MS, ...)
    pub fn ms_level(&self) -> i16 {
        self.ms_level
    }

    /// Scan start time in seconds
    pub fn scan_start_time(&self) -> Option<f32> {
        self.scan_start_time
    }

    /// Ion injection time in milliseconds
    pub fn ion_injection_time(&self) -> Option<f32> {
        self.ion_injection_time
    }

    /// Total ion current as reported by the source
    pub fn total_ion_current(&self) -> Option<f32> {
        self.total_ion_current
    }

    /// Whether the peaks are centroided rather than profile data
    pub fn centroid(&self) -> bool {
        self.centroid
    }

    /// Inverse reduced ion mobility (1/K0, V·s/cm²)
    pub fn inverse_ion_mobility(&self) -> Option<f32> {
        self.inverse_ion_mobility
    }

    /// m/z values
    pub fn mz(&self) -> &[f64] {
        &self.mz
    }

    /// Intensities, positionally paired with [`Self::mz`]
    pub fn intensity(&self) -> &[f32] {
        &self.intensity
    }

    /// Precursors, empty for survey scans
    pub fn precursors(&self) -> &[Precursor] {
        &self.precursors
    }

    /// Number of peaks
    pub fn peak_count(&self) -> usize {
        self.mz.len()
    }

    /// Iterate `(mz, intensity)` pairs
    pub fn peaks(&self) -> impl Iterator<Item = (f64, f32)> + '_ {
        self.mz.iter().copied().zip(self.intensity.iter().copied())
    }
}
