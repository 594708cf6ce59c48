//! TOML configuration file support.
//!
//! Instead of passing many CLI flags, settings can be kept in a config file:
//!
//! ```toml
//! # mzparquet.toml
//! [conversion]
//! layout = "wide"
//! on_error = "skip"
//! permissive_precursors = true
//! compression_level = 15
//! row_group_size = 200000
//! batch_size = 2000
//! ```
//!
//! Flags given on the command line take precedence.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use mzparquet::mzml::OnError;
use mzparquet::schema::Layout;

/// Root configuration structure for mzparquet.toml files.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Conversion-specific settings.
    #[serde(default)]
    pub conversion: ConversionSettings,
}

/// Settings for the convert command.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConversionSettings {
    /// Container layout (`long` or `wide`).
    pub layout: Option<Layout>,

    /// Malformed scan handling (`abort` or `skip`).
    pub on_error: Option<OnError>,

    /// Accept precursors on MS1 scans.
    pub permissive_precursors: Option<bool>,

    /// ZSTD compression level (1-22).
    pub compression_level: Option<i32>,

    /// Rows per Parquet row group.
    pub row_group_size: Option<usize>,

    /// Scans buffered per record batch.
    pub batch_size: Option<usize>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }
}
