use std::fs::File;
use std::path::Path;

use bytes::Bytes;
use log::debug;
use parquet::arrow::arrow_reader::{ArrowReaderMetadata, ArrowReaderOptions};

use crate::schema::validate_schema;

use super::config::SourceChunk;
use super::metadata::FileMetadata;
use super::{MzParquetReader, ReaderConfig, ReaderError};

impl MzParquetReader {
    /// Open a container file.
    ///
    /// Only the footer is read. The file must carry a known layout tag and a
    /// schema matching that layout.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ReaderError> {
        Self::open_with_config(path, ReaderConfig::default())
    }

    /// Open a container file with custom configuration
    pub fn open_with_config<P: AsRef<Path>>(
        path: P,
        config: ReaderConfig,
    ) -> Result<Self, ReaderError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| ReaderError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_source(SourceChunk::File(file), config, &path.display().to_string())
    }

    /// Read a container held in memory
    pub fn from_bytes(bytes: Bytes) -> Result<Self, ReaderError> {
        Self::from_bytes_with_config(bytes, ReaderConfig::default())
    }

    /// Read a container held in memory with custom configuration
    pub fn from_bytes_with_config(bytes: Bytes, config: ReaderConfig) -> Result<Self, ReaderError> {
        Self::from_source(SourceChunk::Bytes(bytes), config, "<memory>")
    }

    fn from_source(
        source: SourceChunk,
        config: ReaderConfig,
        origin: &str,
    ) -> Result<Self, ReaderError> {
        let arrow_metadata = ArrowReaderMetadata::load(&source, ArrowReaderOptions::default())
            .map_err(|e| {
                ReaderError::InvalidFormat(format!("{origin}: not a Parquet file ({e})"))
            })?;

        let file_metadata = FileMetadata::extract(&arrow_metadata, origin)?;
        validate_schema(&file_metadata.schema, file_metadata.layout)?;

        debug!(
            "Opened {} container {} ({} rows, {} row groups)",
            file_metadata.layout, origin, file_metadata.total_rows, file_metadata.num_row_groups
        );

        Ok(Self {
            source,
            config,
            arrow_metadata,
            file_metadata,
        })
    }
}
