use std::collections::HashSet;
use std::fs::File;
use std::path::{Path, PathBuf};

use arrow::datatypes::SchemaRef;
use log::{debug, info};
use parquet::arrow::ArrowWriter;
use tempfile::NamedTempFile;

use crate::record::SpectralRecord;
use crate::schema::{create_schema, footer_metadata, Layout};

use super::config::WriterConfig;
use super::encoder::BatchEncoder;
use super::error::WriterError;
use super::stats::WriterStats;

/// Streaming writer for one mzParquet container.
///
/// Data goes to a staging file in the target directory and is renamed over
/// the target in [`finish`](Self::finish). Dropping the writer, or calling
/// [`abort`](Self::abort), removes the staging file and leaves whatever was
/// at the target untouched.
pub struct ContainerWriter {
    target: PathBuf,
    layout: Layout,
    config: WriterConfig,
    schema: SchemaRef,
    staging: NamedTempFile,
    writer: ArrowWriter<File>,
    encoder: BatchEncoder,
    seen_ids: HashSet<String>,
    scans_written: usize,
    peaks_written: usize,
    rows_written: usize,
}

impl ContainerWriter {
    /// Start a container at `path` with the given layout
    pub fn create<P: AsRef<Path>>(
        path: P,
        layout: Layout,
        config: WriterConfig,
    ) -> Result<Self, WriterError> {
        let target = path.as_ref().to_path_buf();
        let dir = match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let footer = footer_metadata(layout)?;
        let props = config.to_writer_properties(layout, &footer)?;

        let staging = tempfile::Builder::new()
            .prefix(".mzparquet-")
            .suffix(".tmp")
            .tempfile_in(&dir)
            .map_err(|source| WriterError::CreateTemp {
                path: dir.clone(),
                source,
            })?;

        let schema = create_schema(layout);
        let file = staging.as_file().try_clone()?;
        let writer = ArrowWriter::try_new(file, schema.clone(), Some(props))?;

        debug!(
            "Staging {} container for {} at {}",
            layout,
            target.display(),
            staging.path().display()
        );

        Ok(Self {
            target,
            layout,
            encoder: BatchEncoder::new(layout),
            config,
            schema,
            staging,
            writer,
            seen_ids: HashSet::new(),
            scans_written: 0,
            peaks_written: 0,
            rows_written: 0,
        })
    }

    /// Layout of the container being written
    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Final path of the container
    pub fn path(&self) -> &Path {
        &self.target
    }

    /// Scans accepted so far
    pub fn scans_written(&self) -> usize {
        self.scans_written
    }

    /// Append one record.
    ///
    /// A record whose scan id was already written is rejected with
    /// [`WriterError::DuplicateScanId`] and nothing is buffered.
    pub fn write_record(&mut self, record: &SpectralRecord) -> Result<(), WriterError> {
        if self.seen_ids.contains(record.scan_id()) {
            return Err(WriterError::DuplicateScanId {
                scan_id: record.scan_id().to_string(),
                path: self.target.clone(),
            });
        }

        let rows = self.encoder.push(record)?;
        self.seen_ids.insert(record.scan_id().to_string());
        self.scans_written += 1;
        self.peaks_written += record.peak_count();
        self.rows_written += rows;

        if self.encoder.buffered_records() >= self.config.batch_size.max(1)
            || self.encoder.buffered_peaks() >= self.config.max_batch_peaks
        {
            self.flush()?;
        }
        Ok(())
    }

    /// Append several records in order
    pub fn write_records<'a, I>(&mut self, records: I) -> Result<(), WriterError>
    where
        I: IntoIterator<Item = &'a SpectralRecord>,
    {
        for record in records {
            self.write_record(record)?;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), WriterError> {
        if let Some(batch) = self.encoder.finish_batch(&self.schema)? {
            self.writer.write(&batch)?;
        }
        Ok(())
    }

    /// Close the Parquet file and move it into place
    pub fn finish(mut self) -> Result<WriterStats, WriterError> {
        self.flush()?;

        let metadata = self.writer.close()?;
        self.staging.as_file().sync_all()?;
        let file_size_bytes = self.staging.as_file().metadata()?.len();

        self.staging
            .persist(&self.target)
            .map_err(|e| WriterError::Publish {
                path: self.target.clone(),
                source: e.error,
            })?;

        let stats = WriterStats {
            layout: self.layout,
            scans_written: self.scans_written,
            peaks_written: self.peaks_written,
            rows_written: self.rows_written,
            row_groups_written: metadata.row_groups.len(),
            file_size_bytes,
        };
        info!("{} to {}", stats, self.target.display());
        Ok(stats)
    }

    /// Discard everything written so far
    pub fn abort(self) {
        debug!(
            "Aborting container {} after {} scans",
            self.target.display(),
            self.scans_written
        );
    }
}
