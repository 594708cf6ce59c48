//! Conversion profiles for common use cases.
//!
//! Profiles provide sensible defaults for compression and performance tuning,
//! hiding low-level Parquet settings from end users.

use std::fmt;

use clap::ValueEnum;
use mzparquet::converter::ConversionConfig;
use mzparquet::writer::CompressionType;

/// Conversion profiles for common use cases.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Profile {
    /// Prioritize speed over compression (Snappy, smaller row groups).
    Fast,

    /// Balance between speed and compression (ZSTD level 3, default).
    #[default]
    Balanced,

    /// Maximum compression, slower conversion (ZSTD level 22, large row groups).
    MaxCompression,
}

impl Profile {
    /// Conversion configuration preset for this profile.
    pub fn conversion_config(&self) -> ConversionConfig {
        match self {
            Profile::Fast => ConversionConfig::fast_write(),
            Profile::Balanced => ConversionConfig::balanced(),
            Profile::MaxCompression => ConversionConfig::max_compression(),
        }
    }

    /// Human-readable compression setting.
    pub fn compression(&self) -> String {
        match self.conversion_config().writer_config.compression {
            CompressionType::Zstd(level) => format!("ZSTD level {}", level),
            CompressionType::Snappy => "Snappy".to_string(),
            CompressionType::Uncompressed => "none".to_string(),
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Profile::Fast => write!(f, "fast"),
            Profile::Balanced => write!(f, "balanced"),
            Profile::MaxCompression => write!(f, "max-compression"),
        }
    }
}
