use arrow::datatypes::SchemaRef;
use parquet::arrow::arrow_reader::ArrowReaderMetadata;

use crate::schema::{
    ConverterInfo, Layout, KEY_CONVERTER_INFO, KEY_FORMAT_VERSION, KEY_LAYOUT,
    KEY_PRECURSOR_STORAGE,
};

use super::{MzParquetReader, ReaderError};

/// Metadata read from a container footer
#[derive(Debug, Clone)]
pub struct FileMetadata {
    /// Physical layout, from the footer layout tag
    pub layout: Layout,
    /// Format version string
    pub format_version: String,
    /// How precursors are stored, when recorded
    pub precursor_storage: Option<String>,
    /// Software that wrote the container, when recorded
    pub converter: Option<ConverterInfo>,
    /// Total number of physical rows
    pub total_rows: i64,
    /// Number of row groups
    pub num_row_groups: usize,
    /// Arrow schema of the container
    pub schema: SchemaRef,
    /// Raw key-value metadata from the Parquet footer, in file order
    pub key_value_metadata: Vec<(String, String)>,
}

impl FileMetadata {
    /// Look up a raw footer value
    pub fn get(&self, key: &str) -> Option<&str> {
        self.key_value_metadata
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Extract container metadata. `origin` names the source in errors.
    pub(super) fn extract(
        arrow_metadata: &ArrowReaderMetadata,
        origin: &str,
    ) -> Result<Self, ReaderError> {
        let parquet_metadata = arrow_metadata.metadata();
        let file_meta = parquet_metadata.file_metadata();

        let key_value_metadata: Vec<(String, String)> = file_meta
            .key_value_metadata()
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|kv| kv.value.as_ref().map(|v| (kv.key.clone(), v.clone())))
                    .collect()
            })
            .unwrap_or_default();

        let lookup = |key: &str| {
            key_value_metadata
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
        };

        // The layout is never guessed from the schema
        let tag = lookup(KEY_LAYOUT).ok_or_else(|| {
            ReaderError::InvalidFormat(format!("{origin}: footer has no '{KEY_LAYOUT}' tag"))
        })?;
        let layout = Layout::from_tag(tag).ok_or_else(|| {
            ReaderError::InvalidFormat(format!("{origin}: unknown layout tag '{tag}'"))
        })?;

        let format_version = lookup(KEY_FORMAT_VERSION).unwrap_or("unknown").to_string();
        let precursor_storage = lookup(KEY_PRECURSOR_STORAGE).map(str::to_string);
        let converter = lookup(KEY_CONVERTER_INFO).and_then(|json| serde_json::from_str(json).ok());

        Ok(FileMetadata {
            layout,
            format_version,
            precursor_storage,
            converter,
            total_rows: file_meta.num_rows(),
            num_row_groups: parquet_metadata.num_row_groups(),
            schema: arrow_metadata.schema().clone(),
            key_value_metadata,
        })
    }
}

impl MzParquetReader {
    /// Get file metadata
    pub fn metadata(&self) -> &FileMetadata {
        &self.file_metadata
    }

    /// Layout of the container
    pub fn layout(&self) -> Layout {
        self.file_metadata.layout
    }

    /// Get the total number of physical rows in the file
    pub fn total_rows(&self) -> i64 {
        self.file_metadata.total_rows
    }

    /// Get the Arrow schema
    pub fn schema(&self) -> SchemaRef {
        self.file_metadata.schema.clone()
    }
}
