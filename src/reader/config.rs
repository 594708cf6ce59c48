use std::fs::File;
use std::io::Read;

use bytes::Bytes;
use parquet::file::reader::{ChunkReader, Length};

/// Configuration for reading mzParquet containers
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Rows decoded per record batch
    pub batch_size: usize,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self { batch_size: 8192 }
    }
}

/// Backing storage of an open container.
///
/// Each read clones the handle, so independent batch streams can run over
/// the same reader.
#[derive(Debug)]
pub(crate) enum SourceChunk {
    File(File),
    Bytes(Bytes),
}

impl SourceChunk {
    pub(super) fn try_clone(&self) -> std::io::Result<Self> {
        match self {
            SourceChunk::File(file) => Ok(SourceChunk::File(file.try_clone()?)),
            SourceChunk::Bytes(bytes) => Ok(SourceChunk::Bytes(bytes.clone())),
        }
    }
}

impl Length for SourceChunk {
    fn len(&self) -> u64 {
        match self {
            SourceChunk::File(file) => file.len(),
            SourceChunk::Bytes(bytes) => bytes.len() as u64,
        }
    }
}

impl ChunkReader for SourceChunk {
    type T = Box<dyn Read + Send>;

    fn get_read(&self, start: u64) -> parquet::errors::Result<Self::T> {
        match self {
            SourceChunk::File(file) => Ok(Box::new(file.get_read(start)?)),
            SourceChunk::Bytes(bytes) => Ok(Box::new(bytes.get_read(start)?)),
        }
    }

    fn get_bytes(&self, start: u64, length: usize) -> parquet::errors::Result<Bytes> {
        match self {
            SourceChunk::File(file) => file.get_bytes(start, length),
            SourceChunk::Bytes(bytes) => bytes.get_bytes(start, length),
        }
    }
}
