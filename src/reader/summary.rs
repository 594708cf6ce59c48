use std::collections::BTreeMap;
use std::fmt;

use arrow::array::{Array, Float64Array};
use arrow::record_batch::RecordBatch;

use crate::schema::{columns, Layout};

use super::utils::{
    get_float32_column, get_float64_column, get_int16_column, get_list_column,
    get_optional_f32, get_string_column, list_range,
};
use super::{MzParquetReader, ReaderError};

/// Summary statistics about a container
#[derive(Debug, Clone, PartialEq)]
pub struct FileSummary {
    /// Layout of the container
    pub layout: Layout,
    /// Format version
    pub format_version: String,
    /// Number of scans
    pub num_scans: usize,
    /// Total number of peaks
    pub total_peaks: usize,
    /// Physical rows in the file
    pub total_rows: i64,
    /// Scan count per MS level
    pub scans_per_level: BTreeMap<i16, usize>,
    /// Scan start time range (min, max) in seconds
    pub rt_range: Option<(f32, f32)>,
    /// m/z range (min, max)
    pub mz_range: Option<(f64, f64)>,
}

#[derive(Default)]
struct SummaryAccumulator {
    num_scans: usize,
    total_peaks: usize,
    scans_per_level: BTreeMap<i16, usize>,
    rt_range: Option<(f32, f32)>,
    mz_range: Option<(f64, f64)>,
    last_scan_id: Option<String>,
}

impl SummaryAccumulator {
    fn add_scan(&mut self, ms_level: i16, rt: Option<f32>) {
        self.num_scans += 1;
        *self.scans_per_level.entry(ms_level).or_insert(0) += 1;
        if let Some(rt) = rt.filter(|t| !t.is_nan()) {
            self.rt_range = Some(match self.rt_range {
                Some((lo, hi)) => (lo.min(rt), hi.max(rt)),
                None => (rt, rt),
            });
        }
    }

    fn add_mz(&mut self, mz: f64) {
        if mz.is_nan() {
            return;
        }
        self.mz_range = Some(match self.mz_range {
            Some((lo, hi)) => (lo.min(mz), hi.max(mz)),
            None => (mz, mz),
        });
    }

    fn add_long_batch(&mut self, batch: &RecordBatch) -> Result<(), ReaderError> {
        let ids = get_string_column(batch, columns::SCAN_ID)?;
        let levels = get_int16_column(batch, columns::MS_LEVEL)?;
        let rts = get_float32_column(batch, columns::SCAN_START_TIME)?;
        let mz = get_float64_column(batch, columns::MZ)?;

        for row in 0..batch.num_rows() {
            let id = ids.value(row);
            if self.last_scan_id.as_deref() != Some(id) {
                self.add_scan(levels.value(row), get_optional_f32(rts, row));
                self.last_scan_id = Some(id.to_string());
            }
            if mz.is_valid(row) {
                self.total_peaks += 1;
                self.add_mz(mz.value(row));
            }
        }
        Ok(())
    }

    fn add_wide_batch(&mut self, batch: &RecordBatch) -> Result<(), ReaderError> {
        let levels = get_int16_column(batch, columns::MS_LEVEL)?;
        let rts = get_float32_column(batch, columns::SCAN_START_TIME)?;
        let mz = get_list_column(batch, columns::MZ)?;
        let values = mz
            .values()
            .as_any()
            .downcast_ref::<Float64Array>()
            .ok_or_else(|| ReaderError::mismatch(columns::MZ, None, "expected List<Float64>"))?;

        for row in 0..batch.num_rows() {
            self.add_scan(levels.value(row), get_optional_f32(rts, row));
            let (start, end) = list_range(mz, row);
            self.total_peaks += end - start;
            for &value in &values.values()[start..end] {
                self.add_mz(value);
            }
        }
        Ok(())
    }
}

impl MzParquetReader {
    /// Get summary statistics about the file.
    ///
    /// Only the scan id, MS level, scan start time and m/z columns are decoded.
    pub fn summary(&self) -> Result<FileSummary, ReaderError> {
        let layout = self.layout();
        let projection = [
            columns::SCAN_ID,
            columns::MS_LEVEL,
            columns::SCAN_START_TIME,
            columns::MZ,
        ];

        let mut acc = SummaryAccumulator::default();
        for batch in self.iter_batches(Some(&projection[..]))? {
            let batch = batch?;
            match layout {
                Layout::Long => acc.add_long_batch(&batch)?,
                Layout::Wide => acc.add_wide_batch(&batch)?,
            }
        }

        Ok(FileSummary {
            layout,
            format_version: self.file_metadata.format_version.clone(),
            num_scans: acc.num_scans,
            total_peaks: acc.total_peaks,
            total_rows: self.file_metadata.total_rows,
            scans_per_level: acc.scans_per_level,
            rt_range: acc.rt_range,
            mz_range: acc.mz_range,
        })
    }
}

impl fmt::Display for FileSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "mzParquet File Summary")?;
        writeln!(f, "======================")?;
        writeln!(f, "Layout: {}", self.layout)?;
        writeln!(f, "Format version: {}", self.format_version)?;
        writeln!(f, "Total scans: {}", self.num_scans)?;
        for (level, count) in &self.scans_per_level {
            writeln!(f, "  MS{} scans: {}", level, count)?;
        }
        writeln!(f, "Total peaks: {}", self.total_peaks)?;
        writeln!(f, "Physical rows: {}", self.total_rows)?;
        if let Some((min_rt, max_rt)) = self.rt_range {
            writeln!(f, "RT range: {:.2} - {:.2} sec", min_rt, max_rt)?;
        }
        if let Some((min_mz, max_mz)) = self.mz_range {
            writeln!(f, "m/z range: {:.4} - {:.4}", min_mz, max_mz)?;
        }
        Ok(())
    }
}
