use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::{ParquetRecordBatchReader, ParquetRecordBatchReaderBuilder};
use parquet::arrow::ProjectionMask;

use super::config::SourceChunk;
use super::{MzParquetReader, ReaderError};

/// Streaming iterator over record batches
///
/// Batches are decoded on demand, so memory stays bounded by
/// `batch_size * row_size`.
pub struct RecordBatchIterator {
    inner: ParquetRecordBatchReader,
}

impl RecordBatchIterator {
    pub(crate) fn new(inner: ParquetRecordBatchReader) -> Self {
        Self { inner }
    }
}

impl Iterator for RecordBatchIterator {
    type Item = Result<RecordBatch, ReaderError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|r| r.map_err(ReaderError::from))
    }
}

impl MzParquetReader {
    /// A batch reader builder over this container, sharing the cached footer
    pub(crate) fn builder(
        &self,
    ) -> Result<ParquetRecordBatchReaderBuilder<SourceChunk>, ReaderError> {
        let builder = ParquetRecordBatchReaderBuilder::new_with_metadata(
            self.source.try_clone()?,
            self.arrow_metadata.clone(),
        );
        Ok(builder.with_batch_size(self.config.batch_size.max(1)))
    }

    /// Projection of whole top-level columns, by name
    pub(crate) fn column_mask(&self, columns: &[&str]) -> Result<ProjectionMask, ReaderError> {
        let schema = &self.file_metadata.schema;
        let mut indices = Vec::with_capacity(columns.len());
        for name in columns {
            let index = schema
                .index_of(name)
                .map_err(|_| ReaderError::mismatch(name, None, "column is missing"))?;
            indices.push(index);
        }
        Ok(ProjectionMask::roots(
            self.arrow_metadata.parquet_schema(),
            indices,
        ))
    }

    /// Returns a streaming iterator over record batches.
    ///
    /// With `projection`, only the named top-level columns are decoded; batch
    /// columns follow file order, not the order of `projection`.
    ///
    /// # Example
    /// ```rust,no_run
    /// use mzparquet::reader::MzParquetReader;
    ///
    /// let reader = MzParquetReader::open("run.mzparquetW")?;
    /// for batch in reader.iter_batches(Some(&["scan_id", "ms_level"][..]))? {
    ///     println!("Processing batch with {} rows", batch?.num_rows());
    /// }
    /// # Ok::<(), mzparquet::reader::ReaderError>(())
    /// ```
    pub fn iter_batches(
        &self,
        projection: Option<&[&str]>,
    ) -> Result<RecordBatchIterator, ReaderError> {
        let mut builder = self.builder()?;
        if let Some(columns) = projection {
            builder = builder.with_projection(self.column_mask(columns)?);
        }
        Ok(RecordBatchIterator::new(builder.build()?))
    }

    /// Read all record batches from the file.
    ///
    /// **Warning**: This loads all data into memory. For large files, prefer `iter_batches()`.
    pub fn read_all_batches(&self) -> Result<Vec<RecordBatch>, ReaderError> {
        self.iter_batches(None)?.collect()
    }
}
