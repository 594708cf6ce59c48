/// mzParquet format version - follows semantic versioning
pub const MZPARQUET_FORMAT_VERSION: &str = "1.0.0";

/// File extension for long-layout containers
pub const LONG_EXTENSION: &str = "mzparquet";

/// File extension for wide-layout containers
pub const WIDE_EXTENSION: &str = "mzparquetW";

/// Metadata key for format version in Parquet footer
pub const KEY_FORMAT_VERSION: &str = "mzparquet:format_version";

/// Metadata key for the physical layout tag (`long` or `wide`)
pub const KEY_LAYOUT: &str = "mzparquet:layout";

/// Metadata key describing how precursor lists are stored
pub const KEY_PRECURSOR_STORAGE: &str = "mzparquet:precursor_storage";

/// Metadata key for converter software info (JSON)
pub const KEY_CONVERTER_INFO: &str = "mzparquet:converter_info";

/// Precursor list repeated on every peak row of a scan (long layout)
pub const PRECURSOR_STORAGE_REPEATED: &str = "repeated";

/// Precursor list stored once per scan row (wide layout)
pub const PRECURSOR_STORAGE_PER_SCAN: &str = "per_scan";

/// Name recorded as the converter in the footer
pub const CONVERTER_NAME: &str = env!("CARGO_PKG_NAME");

/// Version recorded as the converter in the footer
pub const CONVERTER_VERSION: &str = env!("CARGO_PKG_VERSION");
