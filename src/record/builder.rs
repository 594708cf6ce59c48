use super::{Precursor, PrecursorPolicy, RecordError, SpectralRecord};

/// Builder for constructing [`SpectralRecord`]s fluently
#[derive(Debug, Clone)]
pub struct SpectralRecordBuilder {
    record: SpectralRecord,
    policy: PrecursorPolicy,
}

impl SpectralRecordBuilder {
    /// Create a new builder with the required scan id and MS level
    pub fn new(scan_id: impl Into<String>, ms_level: i16) -> Self {
        Self {
            record: SpectralRecord {
                scan_id: scan_id.into(),
                ms_level,
                scan_start_time: None,
                ion_injection_time: None,
                total_ion_current: None,
                centroid: false,
                inverse_ion_mobility: None,
                mz: Vec::new(),
                intensity: Vec::new(),
                precursors: Vec::new(),
            },
            policy: PrecursorPolicy::default(),
        }
    }

    /// Set the scan start time in seconds
    pub fn scan_start_time(mut self, seconds: f32) -> Self {
        self.record.scan_start_time = Some(seconds);
        self
    }

    /// Set the ion injection time in milliseconds
    pub fn ion_injection_time(mut self, time_ms: f32) -> Self {
        self.record.ion_injection_time = Some(time_ms);
        self
    }

    /// Set the total ion current
    pub fn total_ion_current(mut self, tic: f32) -> Self {
        self.record.total_ion_current = Some(tic);
        self
    }

    /// Mark the peaks as centroided (`true`) or profile (`false`, the default)
    pub fn centroid(mut self, centroid: bool) -> Self {
        self.record.centroid = centroid;
        self
    }

    /// Set the inverse reduced ion mobility
    pub fn inverse_ion_mobility(mut self, one_over_k0: f32) -> Self {
        self.record.inverse_ion_mobility = Some(one_over_k0);
        self
    }

    /// Add a single peak
    pub fn add_peak(mut self, mz: f64, intensity: f32) -> Self {
        self.record.mz.push(mz);
        self.record.intensity.push(intensity);
        self
    }

    /// Replace all peaks at once. Lengths are checked by [`Self::build`].
    pub fn peaks(mut self, mz: Vec<f64>, intensity: Vec<f32>) -> Self {
        self.record.mz = mz;
        self.record.intensity = intensity;
        self
    }

    /// Append a precursor
    pub fn precursor(mut self, precursor: Precursor) -> Self {
        self.record.precursors.push(precursor);
        self
    }

    /// Replace all precursors at once
    pub fn precursors(mut self, precursors: Vec<Precursor>) -> Self {
        self.record.precursors = precursors;
        self
    }

    /// Choose how precursors on MS1 scans are treated
    pub fn precursor_policy(mut self, policy: PrecursorPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Validate and build the record
    pub fn build(self) -> Result<SpectralRecord, RecordError> {
        SpectralRecord::validated(self.record, self.policy)
    }
}
