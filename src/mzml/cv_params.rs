//! Controlled Vocabulary (CV) parameter handling for mzML
//!
//! mzML uses CV terms from the PSI-MS ontology to describe data semantically.
//! Only the terms that map onto the spectral record are listed here.

/// A controlled vocabulary parameter from mzML
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CvParam {
    /// Accession number (e.g., "MS:1000511")
    pub accession: String,

    /// Human-readable name
    pub name: String,

    /// Optional value
    pub value: Option<String>,

    /// Unit accession
    pub unit_accession: Option<String>,
}

impl CvParam {
    /// Get the value as f64 if possible
    pub fn value_as_f64(&self) -> Option<f64> {
        self.value.as_ref()?.trim().parse().ok()
    }

    /// Get the value as i64 if possible
    pub fn value_as_i64(&self) -> Option<i64> {
        self.value.as_ref()?.trim().parse().ok()
    }
}

/// Common MS CV accessions used in mzML
#[allow(non_snake_case)]
pub mod MS_CV_ACCESSIONS {
    // =========================================================================
    // Spectrum
    // =========================================================================

    /// MS level
    pub const MS_LEVEL: &str = "MS:1000511";

    /// Total ion current
    pub const TOTAL_ION_CURRENT: &str = "MS:1000285";

    /// Centroid spectrum
    pub const CENTROID_SPECTRUM: &str = "MS:1000127";

    /// Profile spectrum
    pub const PROFILE_SPECTRUM: &str = "MS:1000128";

    // =========================================================================
    // Scan
    // =========================================================================

    /// Scan start time (retention time)
    pub const SCAN_START_TIME: &str = "MS:1000016";

    /// Ion injection time
    pub const ION_INJECTION_TIME: &str = "MS:1000927";

    /// Inverse reduced ion mobility (1/K0)
    pub const INVERSE_REDUCED_ION_MOBILITY: &str = "MS:1002815";

    // =========================================================================
    // Precursor/isolation
    // =========================================================================

    /// Selected ion m/z
    pub const SELECTED_ION_MZ: &str = "MS:1000744";

    /// Charge state
    pub const CHARGE_STATE: &str = "MS:1000041";

    /// Peak intensity (selected ion)
    pub const PEAK_INTENSITY: &str = "MS:1000042";

    /// Isolation window target m/z
    pub const ISOLATION_WINDOW_TARGET: &str = "MS:1000827";

    /// Isolation window lower offset
    pub const ISOLATION_WINDOW_LOWER: &str = "MS:1000828";

    /// Isolation window upper offset
    pub const ISOLATION_WINDOW_UPPER: &str = "MS:1000829";

    // =========================================================================
    // Binary data arrays
    // =========================================================================

    /// m/z array
    pub const MZ_ARRAY: &str = "MS:1000514";

    /// Intensity array
    pub const INTENSITY_ARRAY: &str = "MS:1000515";

    // =========================================================================
    // Units
    // =========================================================================

    /// Second
    pub const UNIT_SECOND: &str = "UO:0000010";

    /// Minute
    pub const UNIT_MINUTE: &str = "UO:0000031";

    /// Millisecond
    pub const UNIT_MILLISECOND: &str = "UO:0000028";
}

/// Convert retention time to seconds based on unit
pub fn normalize_retention_time(value: f64, unit_accession: Option<&str>) -> f64 {
    match unit_accession {
        Some(MS_CV_ACCESSIONS::UNIT_MINUTE) => value * 60.0,
        Some(MS_CV_ACCESSIONS::UNIT_MILLISECOND) => value / 1000.0,
        _ => value, // Default to seconds
    }
}
