use parquet::basic::{Compression, Encoding, ZstdLevel};
use parquet::file::properties::{EnabledStatistics, WriterProperties};
use parquet::format::KeyValue;
use parquet::schema::types::ColumnPath;

use super::error::WriterError;
use crate::schema::{columns, Layout};

/// Compression options for mzParquet containers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionType {
    /// ZSTD compression (recommended, best compression ratio)
    Zstd(i32),
    /// Snappy compression (faster, slightly larger files)
    Snappy,
    /// No compression (fastest write, largest files)
    Uncompressed,
}

impl Default for CompressionType {
    fn default() -> Self {
        Self::Zstd(3)
    }
}

/// Configuration for the container writer
#[derive(Debug, Clone)]
pub struct WriterConfig {
    /// Compression type to use
    pub compression: CompressionType,

    /// Maximum rows per row group on the long layout (one row per peak)
    pub row_group_size: usize,

    /// Maximum rows per row group on the wide layout (one row per scan)
    pub wide_row_group_size: usize,

    /// Data page size in bytes
    pub data_page_size: usize,

    /// Whether to write statistics for columns
    pub write_statistics: bool,

    /// Dictionary page size limit in bytes
    pub dictionary_page_size_limit: usize,

    /// Enable BYTE_STREAM_SPLIT encoding for the m/z and intensity values.
    pub use_byte_stream_split: bool,

    /// Records buffered before a record batch is handed to Parquet
    pub batch_size: usize,

    /// Peaks buffered before a record batch is handed to Parquet, whatever the
    /// record count
    pub max_batch_peaks: usize,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            compression: CompressionType::Zstd(3),
            // 2^18 peaks per row group
            row_group_size: 262_144,
            wide_row_group_size: 65_535,
            // 1MB data pages
            data_page_size: 1024 * 1024,
            write_statistics: true,
            // 1MB dictionary page limit
            dictionary_page_size_limit: 1024 * 1024,
            use_byte_stream_split: true,
            batch_size: 1024,
            max_batch_peaks: 1 << 20,
        }
    }
}

impl WriterConfig {
    /// Configuration optimized for maximum compression (slower write)
    pub fn max_compression() -> Self {
        Self {
            compression: CompressionType::Zstd(22),
            row_group_size: 1_048_576, // Larger row groups = better compression
            wide_row_group_size: 65_535,
            data_page_size: 2 * 1024 * 1024, // 2MB pages
            write_statistics: true,
            dictionary_page_size_limit: 2 * 1024 * 1024,
            use_byte_stream_split: true,
            batch_size: 4096,
            max_batch_peaks: 1 << 22,
        }
    }

    /// Configuration optimized for fast writing (larger files)
    pub fn fast_write() -> Self {
        Self {
            compression: CompressionType::Snappy,
            row_group_size: 131_072,
            wide_row_group_size: 16_384,
            data_page_size: 512 * 1024,
            write_statistics: true,
            dictionary_page_size_limit: 512 * 1024,
            use_byte_stream_split: false,
            batch_size: 1024,
            max_batch_peaks: 1 << 20,
        }
    }

    /// Balanced configuration (default)
    pub fn balanced() -> Self {
        Self::default()
    }

    /// Row group bound for a layout
    pub fn row_group_rows(&self, layout: Layout) -> usize {
        match layout {
            Layout::Long => self.row_group_size,
            Layout::Wide => self.wide_row_group_size,
        }
    }

    /// Create writer properties from this configuration.
    ///
    /// `metadata` is written to the footer in the given order. An out-of-range
    /// ZSTD level is rejected rather than replaced.
    pub(super) fn to_writer_properties(
        &self,
        layout: Layout,
        metadata: &[(String, String)],
    ) -> Result<WriterProperties, WriterError> {
        let compression = match self.compression {
            CompressionType::Zstd(level) => {
                let level = ZstdLevel::try_new(level).map_err(|e| {
                    WriterError::InvalidData(format!("ZSTD compression level {level}: {e}"))
                })?;
                Compression::ZSTD(level)
            }
            CompressionType::Snappy => Compression::SNAPPY,
            CompressionType::Uncompressed => Compression::UNCOMPRESSED,
        };

        let statistics = if self.write_statistics {
            EnabledStatistics::Chunk
        } else {
            EnabledStatistics::None
        };

        let mut builder = WriterProperties::builder()
            .set_compression(compression)
            .set_data_page_size_limit(self.data_page_size)
            .set_dictionary_page_size_limit(self.dictionary_page_size_limit)
            .set_statistics_enabled(statistics)
            .set_max_row_group_size(self.row_group_rows(layout).max(1))
            .set_dictionary_enabled(true);

        // Scan ids are unique per row on the wide layout
        if layout == Layout::Wide {
            builder = builder
                .set_column_dictionary_enabled(ColumnPath::from(columns::SCAN_ID), false);
        }

        // Peak values are high-cardinality floats: no dictionary, and
        // BYTE_STREAM_SPLIT when enabled
        for path in peak_value_paths(layout) {
            builder = builder.set_column_dictionary_enabled(path.clone(), false);
            if self.use_byte_stream_split {
                builder = builder.set_column_encoding(path, Encoding::BYTE_STREAM_SPLIT);
            }
        }

        let kv_metadata: Vec<KeyValue> = metadata
            .iter()
            .map(|(k, v)| KeyValue {
                key: k.clone(),
                value: Some(v.clone()),
            })
            .collect();

        builder = builder.set_key_value_metadata(Some(kv_metadata));

        Ok(builder.build())
    }
}

/// Parquet leaf paths of the m/z and intensity values
fn peak_value_paths(layout: Layout) -> Vec<ColumnPath> {
    [columns::MZ, columns::INTENSITY]
        .into_iter()
        .map(|column| match layout {
            Layout::Long => ColumnPath::from(column),
            Layout::Wide => ColumnPath::new(vec![
                column.to_string(),
                "list".to_string(),
                columns::LIST_ITEM.to_string(),
            ]),
        })
        .collect()
}
