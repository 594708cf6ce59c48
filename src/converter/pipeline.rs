use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::info;

use super::{ConversionError, ConversionStats, MzMLConverter};
use crate::mzml::{MzMLStreamer, ScanIterator, DEFAULT_INPUT_BUFFER_SIZE};
use crate::writer::ContainerWriter;

impl MzMLConverter {
    /// Convert an mzML file to an mzParquet container
    pub fn convert<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input_path: P,
        output_path: Q,
    ) -> Result<ConversionStats, ConversionError> {
        let input_path = input_path.as_ref();
        let output_path = output_path.as_ref();

        info!(
            "Converting {} to {}",
            input_path.display(),
            output_path.display()
        );

        let open_error = |source| ConversionError::Input {
            path: input_path.to_path_buf(),
            source,
        };
        let file = File::open(input_path).map_err(open_error)?;
        let source_file_size = file.metadata().map_err(open_error)?.len();

        let streamer =
            MzMLStreamer::new(BufReader::with_capacity(DEFAULT_INPUT_BUFFER_SIZE, file))?;
        let mut stats = self.convert_streamer(streamer, output_path)?;

        stats.source_file_size = source_file_size;
        stats.update_ratio();
        info!("Conversion complete: {}", stats);
        Ok(stats)
    }

    /// Convert an already opened mzML stream
    pub fn convert_streamer<R: BufRead, Q: AsRef<Path>>(
        &self,
        mut streamer: MzMLStreamer<R>,
        output_path: Q,
    ) -> Result<ConversionStats, ConversionError> {
        let metadata = streamer.read_metadata()?;
        info!(
            "mzML version: {}, run: {}",
            metadata.version.as_deref().unwrap_or("unknown"),
            metadata.run_id.as_deref().unwrap_or("unknown")
        );
        let expected_count = streamer.spectrum_count();
        info!(
            "Converting {} spectra...",
            expected_count
                .map(|c| c.to_string())
                .unwrap_or_else(|| "unknown".to_string())
        );

        let mut writer = ContainerWriter::create(
            output_path,
            self.config.layout,
            self.config.writer_config.clone(),
        )?;
        let mut stats = ConversionStats {
            layout: self.config.layout,
            ..Default::default()
        };

        let mut scans = streamer.scans(self.config.source);
        if let Err(e) = self.write_scans(&mut scans, &mut writer, &mut stats, expected_count) {
            writer.abort();
            return Err(e);
        }
        stats.spectra_skipped = scans.skipped();

        let written = writer.finish()?;
        stats.rows_written = written.rows_written;
        stats.row_groups_written = written.row_groups_written;
        stats.output_file_size = written.file_size_bytes;
        stats.update_ratio();
        Ok(stats)
    }

    fn write_scans<R: BufRead>(
        &self,
        scans: &mut ScanIterator<R>,
        writer: &mut ContainerWriter,
        stats: &mut ConversionStats,
        expected_count: Option<usize>,
    ) -> Result<(), ConversionError> {
        let interval = self.config.progress_interval.max(1);

        for record in scans.by_ref() {
            let record = record?;
            writer.write_record(&record)?;

            stats.spectra_count += 1;
            stats.peak_count += record.peak_count();
            stats.count_level(record.ms_level());

            if stats.spectra_count % interval == 0 {
                match expected_count {
                    Some(total) if total > 0 => {
                        let pct = (stats.spectra_count as f64 / total as f64) * 100.0;
                        info!(
                            "Progress: {}/{} spectra ({:.1}%)",
                            stats.spectra_count, total, pct
                        );
                    }
                    _ => info!("Progress: {} spectra", stats.spectra_count),
                }
            }
        }
        Ok(())
    }
}
