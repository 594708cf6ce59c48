use std::collections::VecDeque;

use arrow::array::{
    Array, BooleanArray, Float32Array, Float64Array, Int16Array, ListArray, StringArray,
};
use arrow::record_batch::RecordBatch;

use crate::record::{Precursor, PrecursorPolicy, SpectralRecord, SpectralRecordBuilder};
use crate::schema::{columns, Layout};

use super::batches::RecordBatchIterator;
use super::utils::{
    get_boolean_column, get_float32_column, get_float64_column, get_int16_column, get_list_column,
    get_optional_f32, get_optional_f64, get_optional_i16, get_string_column, list_range,
    list_struct_values, struct_child,
};
use super::{MzParquetReader, ReaderError};

/// Column view of a `precursors` list
pub(crate) struct PrecursorView<'a> {
    list: &'a ListArray,
    selected_ion_mz: &'a Float64Array,
    selected_ion_charge: &'a Int16Array,
    selected_ion_intensity: &'a Float32Array,
    isolation_window_target: &'a Float64Array,
    isolation_window_lower: &'a Float64Array,
    isolation_window_upper: &'a Float64Array,
    spectrum_ref: &'a StringArray,
}

impl<'a> PrecursorView<'a> {
    pub(crate) fn try_new(batch: &'a RecordBatch) -> Result<Self, ReaderError> {
        let name = columns::PRECURSORS;
        let list = get_list_column(batch, name)?;
        let values = list_struct_values(list, name)?;
        Ok(Self {
            list,
            selected_ion_mz: struct_child(values, name, columns::SELECTED_ION_MZ, "Float64")?,
            selected_ion_charge: struct_child(values, name, columns::SELECTED_ION_CHARGE, "Int16")?,
            selected_ion_intensity: struct_child(
                values,
                name,
                columns::SELECTED_ION_INTENSITY,
                "Float32",
            )?,
            isolation_window_target: struct_child(
                values,
                name,
                columns::ISOLATION_WINDOW_TARGET,
                "Float64",
            )?,
            isolation_window_lower: struct_child(
                values,
                name,
                columns::ISOLATION_WINDOW_LOWER,
                "Float64",
            )?,
            isolation_window_upper: struct_child(
                values,
                name,
                columns::ISOLATION_WINDOW_UPPER,
                "Float64",
            )?,
            spectrum_ref: struct_child(values, name, columns::SPECTRUM_REF, "Utf8")?,
        })
    }

    pub(crate) fn precursors_at(&self, row: usize) -> Result<Vec<Precursor>, ReaderError> {
        if self.list.is_null(row) {
            return Ok(Vec::new());
        }
        let (start, end) = list_range(self.list, row);
        let mut precursors = Vec::with_capacity(end - start);
        for i in start..end {
            let selected_ion_mz = get_optional_f64(self.selected_ion_mz, i).ok_or_else(|| {
                ReaderError::InvalidFormat(format!(
                    "row {row}: precursor without {}",
                    columns::SELECTED_ION_MZ
                ))
            })?;
            precursors.push(Precursor {
                selected_ion_mz,
                selected_ion_charge: get_optional_i16(self.selected_ion_charge, i),
                selected_ion_intensity: get_optional_f32(self.selected_ion_intensity, i),
                isolation_window_target: get_optional_f64(self.isolation_window_target, i),
                isolation_window_lower: get_optional_f64(self.isolation_window_lower, i),
                isolation_window_upper: get_optional_f64(self.isolation_window_upper, i),
                spectrum_ref: self
                    .spectrum_ref
                    .is_valid(i)
                    .then(|| self.spectrum_ref.value(i).to_string()),
            });
        }
        Ok(precursors)
    }
}

/// Scan-level column view shared by both layouts
struct ScanView<'a> {
    scan_id: &'a StringArray,
    ms_level: &'a Int16Array,
    scan_start_time: &'a Float32Array,
    ion_injection_time: &'a Float32Array,
    total_ion_current: &'a Float32Array,
    centroid: &'a BooleanArray,
    inverse_ion_mobility: &'a Float32Array,
    precursors: PrecursorView<'a>,
}

impl<'a> ScanView<'a> {
    fn try_new(batch: &'a RecordBatch) -> Result<Self, ReaderError> {
        Ok(Self {
            scan_id: get_string_column(batch, columns::SCAN_ID)?,
            ms_level: get_int16_column(batch, columns::MS_LEVEL)?,
            scan_start_time: get_float32_column(batch, columns::SCAN_START_TIME)?,
            ion_injection_time: get_float32_column(batch, columns::ION_INJECTION_TIME)?,
            total_ion_current: get_float32_column(batch, columns::TOTAL_ION_CURRENT)?,
            centroid: get_boolean_column(batch, columns::CENTROID)?,
            inverse_ion_mobility: get_float32_column(batch, columns::INVERSE_ION_MOBILITY)?,
            precursors: PrecursorView::try_new(batch)?,
        })
    }

    fn scan_id(&self, row: usize) -> Result<&'a str, ReaderError> {
        if self.scan_id.is_null(row) {
            return Err(ReaderError::InvalidFormat(format!(
                "row {row}: null {}",
                columns::SCAN_ID
            )));
        }
        Ok(self.scan_id.value(row))
    }

    fn pending(&self, row: usize) -> Result<PendingScan, ReaderError> {
        let ms_level = get_optional_i16(self.ms_level, row).ok_or_else(|| {
            ReaderError::InvalidFormat(format!("row {row}: null {}", columns::MS_LEVEL))
        })?;
        Ok(PendingScan {
            scan_id: self.scan_id(row)?.to_string(),
            ms_level,
            scan_start_time: get_optional_f32(self.scan_start_time, row),
            ion_injection_time: get_optional_f32(self.ion_injection_time, row),
            total_ion_current: get_optional_f32(self.total_ion_current, row),
            centroid: self.centroid.is_valid(row) && self.centroid.value(row),
            inverse_ion_mobility: get_optional_f32(self.inverse_ion_mobility, row),
            mz: Vec::new(),
            intensity: Vec::new(),
            precursors: self.precursors.precursors_at(row)?,
        })
    }
}

/// A scan whose peaks may still be arriving
struct PendingScan {
    scan_id: String,
    ms_level: i16,
    scan_start_time: Option<f32>,
    ion_injection_time: Option<f32>,
    total_ion_current: Option<f32>,
    centroid: bool,
    inverse_ion_mobility: Option<f32>,
    mz: Vec<f64>,
    intensity: Vec<f32>,
    precursors: Vec<Precursor>,
}

impl PendingScan {
    fn into_record(self) -> Result<SpectralRecord, ReaderError> {
        let mut builder = SpectralRecordBuilder::new(self.scan_id, self.ms_level)
            .peaks(self.mz, self.intensity)
            .centroid(self.centroid)
            .precursors(self.precursors)
            // stored containers may legitimately hold MS1 precursors
            .precursor_policy(PrecursorPolicy::Permissive);
        if let Some(time) = self.scan_start_time {
            builder = builder.scan_start_time(time);
        }
        if let Some(time) = self.ion_injection_time {
            builder = builder.ion_injection_time(time);
        }
        if let Some(tic) = self.total_ion_current {
            builder = builder.total_ion_current(tic);
        }
        if let Some(mobility) = self.inverse_ion_mobility {
            builder = builder.inverse_ion_mobility(mobility);
        }
        builder
            .build()
            .map_err(|e| ReaderError::InvalidFormat(format!("stored record is invalid: {e}")))
    }
}

/// Streaming reconstruction of records from a container.
///
/// Long-layout rows are grouped by contiguous `scan_id`; the last scan of a
/// batch is held back until the next batch shows where it ends.
pub struct RecordIterator {
    batches: RecordBatchIterator,
    layout: Layout,
    ready: VecDeque<SpectralRecord>,
    pending: Option<PendingScan>,
    done: bool,
}

impl RecordIterator {
    fn new(batches: RecordBatchIterator, layout: Layout) -> Self {
        Self {
            batches,
            layout,
            ready: VecDeque::new(),
            pending: None,
            done: false,
        }
    }

    fn push_long_batch(&mut self, batch: &RecordBatch) -> Result<(), ReaderError> {
        let scans = ScanView::try_new(batch)?;
        let mz = get_float64_column(batch, columns::MZ)?;
        let intensity = get_float32_column(batch, columns::INTENSITY)?;

        for row in 0..batch.num_rows() {
            let scan_id = scans.scan_id(row)?;
            let continues = matches!(&self.pending, Some(p) if p.scan_id == scan_id);
            if !continues {
                if let Some(done) = self.pending.take() {
                    self.ready.push_back(done.into_record()?);
                }
                self.pending = Some(scans.pending(row)?);
            }

            // marker rows of zero-peak scans carry no peak
            if mz.is_null(row) {
                continue;
            }
            let value = get_optional_f32(intensity, row).ok_or_else(|| {
                ReaderError::InvalidFormat(format!("scan '{scan_id}': m/z without intensity"))
            })?;
            if let Some(pending) = self.pending.as_mut() {
                pending.mz.push(mz.value(row));
                pending.intensity.push(value);
            }
        }
        Ok(())
    }

    fn push_wide_batch(&mut self, batch: &RecordBatch) -> Result<(), ReaderError> {
        let scans = ScanView::try_new(batch)?;
        let mz = get_list_column(batch, columns::MZ)?;
        let intensity = get_list_column(batch, columns::INTENSITY)?;
        let mz_values = mz
            .values()
            .as_any()
            .downcast_ref::<Float64Array>()
            .ok_or_else(|| ReaderError::mismatch(columns::MZ, None, "expected List<Float64>"))?;
        let intensity_values = intensity
            .values()
            .as_any()
            .downcast_ref::<Float32Array>()
            .ok_or_else(|| {
                ReaderError::mismatch(columns::INTENSITY, None, "expected List<Float32>")
            })?;

        for row in 0..batch.num_rows() {
            let mut pending = scans.pending(row)?;
            let (start, end) = list_range(mz, row);
            pending.mz = mz_values.values()[start..end].to_vec();
            let (start, end) = list_range(intensity, row);
            pending.intensity = intensity_values.values()[start..end].to_vec();
            self.ready.push_back(pending.into_record()?);
        }
        Ok(())
    }

    fn fill(&mut self) -> Result<(), ReaderError> {
        while self.ready.is_empty() {
            match self.batches.next() {
                Some(batch) => {
                    let batch = batch?;
                    match self.layout {
                        Layout::Long => self.push_long_batch(&batch)?,
                        Layout::Wide => self.push_wide_batch(&batch)?,
                    }
                }
                None => {
                    if let Some(last) = self.pending.take() {
                        self.ready.push_back(last.into_record()?);
                    }
                    self.done = true;
                    return Ok(());
                }
            }
        }
        Ok(())
    }
}

impl Iterator for RecordIterator {
    type Item = Result<SpectralRecord, ReaderError>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(record) = self.ready.pop_front() {
            return Some(Ok(record));
        }
        if self.done {
            return None;
        }
        if let Err(e) = self.fill() {
            self.done = true;
            self.ready.clear();
            self.pending = None;
            return Some(Err(e));
        }
        self.ready.pop_front().map(Ok)
    }
}

impl MzParquetReader {
    /// Stream every record of the container in physical order
    pub fn records(&self) -> Result<RecordIterator, ReaderError> {
        Ok(RecordIterator::new(self.iter_batches(None)?, self.layout()))
    }

    /// Stream records from already-decoded batches of this container's layout
    pub(crate) fn records_from(&self, batches: RecordBatchIterator) -> RecordIterator {
        RecordIterator::new(batches, self.layout())
    }
}
