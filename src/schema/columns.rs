/// Column names as constants for type safety
/// Native scan identifier
pub const SCAN_ID: &str = "scan_id";
/// MS level (1 for MS1, 2 for MS/MS, etc.)
pub const MS_LEVEL: &str = "ms_level";
/// Scan start time in seconds
pub const SCAN_START_TIME: &str = "scan_start_time";
/// Ion injection time in milliseconds
pub const ION_INJECTION_TIME: &str = "ion_injection_time";
/// Total ion current
pub const TOTAL_ION_CURRENT: &str = "total_ion_current";
/// Centroided (true) or profile (false) peak data
pub const CENTROID: &str = "centroid";
/// Inverse reduced ion mobility (MS:1002815)
pub const INVERSE_ION_MOBILITY: &str = "inverse_ion_mobility";
/// Mass-to-charge ratio (MS:1000040)
pub const MZ: &str = "mz";
/// Peak intensity (MS:1000042)
pub const INTENSITY: &str = "intensity";
/// List of precursor structs
pub const PRECURSORS: &str = "precursors";

/// Item field name of every list column
pub const LIST_ITEM: &str = "item";

// Fields of the precursor struct
/// Selected ion m/z (MS:1000744)
pub const SELECTED_ION_MZ: &str = "selected_ion_mz";
/// Selected ion charge state (MS:1000041)
pub const SELECTED_ION_CHARGE: &str = "selected_ion_charge";
/// Selected ion intensity (MS:1000042)
pub const SELECTED_ION_INTENSITY: &str = "selected_ion_intensity";
/// Isolation window target m/z (MS:1000827)
pub const ISOLATION_WINDOW_TARGET: &str = "isolation_window_target";
/// Isolation window lower offset (MS:1000828)
pub const ISOLATION_WINDOW_LOWER: &str = "isolation_window_lower";
/// Isolation window upper offset (MS:1000829)
pub const ISOLATION_WINDOW_UPPER: &str = "isolation_window_upper";
/// Native id of the parent scan
pub const SPECTRUM_REF: &str = "spectrum_ref";
