//! Record-to-Arrow encoders for the two layouts.
//!
//! Encoders buffer records into Arrow builders and hand out one `RecordBatch`
//! per flush. Column order matches [`create_schema`](crate::schema::create_schema).

use std::mem;
use std::sync::Arc;

use arrow::array::{
    ArrayRef, BooleanBuilder, Float32Builder, Float64Builder, Int16Builder, ListArray,
    StringBuilder, StructArray,
};
use arrow::buffer::{OffsetBuffer, ScalarBuffer};
use arrow::datatypes::{DataType, SchemaRef};
use arrow::record_batch::RecordBatch;

use super::error::WriterError;
use crate::record::{Precursor, SpectralRecord};
use crate::schema::{list_item_field, precursor_fields, precursor_item_field, Layout};

/// Offset following `offsets` after appending `len` values
fn next_offset(offsets: &[i32], len: usize) -> Result<i32, WriterError> {
    let last = offsets.last().copied().unwrap_or(0);
    i32::try_from(len)
        .ok()
        .and_then(|len| last.checked_add(len))
        .ok_or_else(|| {
            WriterError::InvalidData(format!(
                "list offsets overflow: {} buffered values plus {} more",
                last, len
            ))
        })
}

fn offset_buffer(offsets: Vec<i32>) -> OffsetBuffer<i32> {
    OffsetBuffer::new(ScalarBuffer::from(offsets))
}

/// Scan-level columns shared by both layouts
#[derive(Default)]
struct ScanColumns {
    scan_id: StringBuilder,
    ms_level: Int16Builder,
    scan_start_time: Float32Builder,
    ion_injection_time: Float32Builder,
    total_ion_current: Float32Builder,
    centroid: BooleanBuilder,
    inverse_ion_mobility: Float32Builder,
}

impl ScanColumns {
    /// Append the scan values of `record` `rows` times
    fn push_repeated(&mut self, record: &SpectralRecord, rows: usize) {
        for _ in 0..rows {
            self.scan_id.append_value(record.scan_id());
        }
        self.ms_level.append_value_n(record.ms_level(), rows);
        for _ in 0..rows {
            self.scan_start_time.append_option(record.scan_start_time());
            self.ion_injection_time.append_option(record.ion_injection_time());
            self.total_ion_current.append_option(record.total_ion_current());
            self.inverse_ion_mobility
                .append_option(record.inverse_ion_mobility());
        }
        self.centroid.append_n(rows, record.centroid());
    }

    fn finish(&mut self) -> Vec<ArrayRef> {
        vec![
            Arc::new(self.scan_id.finish()),
            Arc::new(self.ms_level.finish()),
            Arc::new(self.scan_start_time.finish()),
            Arc::new(self.ion_injection_time.finish()),
            Arc::new(self.total_ion_current.finish()),
            Arc::new(self.centroid.finish()),
            Arc::new(self.inverse_ion_mobility.finish()),
        ]
    }
}

/// `List<Struct>` builder for the precursors column
pub(super) struct PrecursorColumns {
    offsets: Vec<i32>,
    selected_ion_mz: Float64Builder,
    selected_ion_charge: Int16Builder,
    selected_ion_intensity: Float32Builder,
    isolation_window_target: Float64Builder,
    isolation_window_lower: Float64Builder,
    isolation_window_upper: Float64Builder,
    spectrum_ref: StringBuilder,
}

impl PrecursorColumns {
    pub(super) fn new() -> Self {
        Self {
            offsets: vec![0],
            selected_ion_mz: Float64Builder::new(),
            selected_ion_charge: Int16Builder::new(),
            selected_ion_intensity: Float32Builder::new(),
            isolation_window_target: Float64Builder::new(),
            isolation_window_lower: Float64Builder::new(),
            isolation_window_upper: Float64Builder::new(),
            spectrum_ref: StringBuilder::new(),
        }
    }

    fn append(&mut self, precursor: &Precursor) {
        self.selected_ion_mz.append_value(precursor.selected_ion_mz);
        self.selected_ion_charge
            .append_option(precursor.selected_ion_charge);
        self.selected_ion_intensity
            .append_option(precursor.selected_ion_intensity);
        self.isolation_window_target
            .append_option(precursor.isolation_window_target);
        self.isolation_window_lower
            .append_option(precursor.isolation_window_lower);
        self.isolation_window_upper
            .append_option(precursor.isolation_window_upper);
        self.spectrum_ref.append_option(precursor.spectrum_ref.as_deref());
    }

    /// Append the same precursor list as `rows` consecutive list entries
    pub(super) fn push_repeated(
        &mut self,
        precursors: &[Precursor],
        rows: usize,
    ) -> Result<(), WriterError> {
        let total = precursors.len().checked_mul(rows).ok_or_else(|| {
            WriterError::InvalidData("precursor list too large to repeat".to_string())
        })?;
        // bound check once so a failure leaves the builders untouched
        next_offset(&self.offsets, total)?;

        for _ in 0..rows {
            for precursor in precursors {
                self.append(precursor);
            }
            let next = next_offset(&self.offsets, precursors.len())?;
            self.offsets.push(next);
        }
        Ok(())
    }

    pub(super) fn finish(&mut self) -> Result<ArrayRef, WriterError> {
        let offsets = mem::replace(&mut self.offsets, vec![0]);
        let children: Vec<ArrayRef> = vec![
            Arc::new(self.selected_ion_mz.finish()),
            Arc::new(self.selected_ion_charge.finish()),
            Arc::new(self.selected_ion_intensity.finish()),
            Arc::new(self.isolation_window_target.finish()),
            Arc::new(self.isolation_window_lower.finish()),
            Arc::new(self.isolation_window_upper.finish()),
            Arc::new(self.spectrum_ref.finish()),
        ];
        let values = StructArray::try_new(precursor_fields(), children, None)?;
        let list = ListArray::try_new(
            precursor_item_field(),
            offset_buffer(offsets),
            Arc::new(values),
            None,
        )?;
        Ok(Arc::new(list))
    }
}

/// One row per peak; a zero-peak scan gets a single marker row
pub(super) struct LongEncoder {
    scan: ScanColumns,
    mz: Float64Builder,
    intensity: Float32Builder,
    precursors: PrecursorColumns,
}

impl LongEncoder {
    fn new() -> Self {
        Self {
            scan: ScanColumns::default(),
            mz: Float64Builder::new(),
            intensity: Float32Builder::new(),
            precursors: PrecursorColumns::new(),
        }
    }

    fn push(&mut self, record: &SpectralRecord) -> Result<usize, WriterError> {
        let rows = record.peak_count().max(1);
        self.precursors.push_repeated(record.precursors(), rows)?;
        self.scan.push_repeated(record, rows);

        if record.peak_count() == 0 {
            self.mz.append_null();
            self.intensity.append_null();
        } else {
            self.mz.append_slice(record.mz());
            self.intensity.append_slice(record.intensity());
        }
        Ok(rows)
    }

    fn finish(&mut self) -> Result<Vec<ArrayRef>, WriterError> {
        let mut columns = self.scan.finish();
        columns.push(Arc::new(self.mz.finish()));
        columns.push(Arc::new(self.intensity.finish()));
        columns.push(self.precursors.finish()?);
        Ok(columns)
    }
}

/// One row per scan; m/z and intensity as list columns sharing offsets
pub(super) struct WideEncoder {
    scan: ScanColumns,
    peak_offsets: Vec<i32>,
    mz: Float64Builder,
    intensity: Float32Builder,
    precursors: PrecursorColumns,
}

impl WideEncoder {
    fn new() -> Self {
        Self {
            scan: ScanColumns::default(),
            peak_offsets: vec![0],
            mz: Float64Builder::new(),
            intensity: Float32Builder::new(),
            precursors: PrecursorColumns::new(),
        }
    }

    fn push(&mut self, record: &SpectralRecord) -> Result<usize, WriterError> {
        let next = next_offset(&self.peak_offsets, record.peak_count())?;
        self.precursors.push_repeated(record.precursors(), 1)?;
        self.peak_offsets.push(next);
        self.scan.push_repeated(record, 1);
        self.mz.append_slice(record.mz());
        self.intensity.append_slice(record.intensity());
        Ok(1)
    }

    fn finish(&mut self) -> Result<Vec<ArrayRef>, WriterError> {
        let offsets = offset_buffer(mem::replace(&mut self.peak_offsets, vec![0]));
        let mz = ListArray::try_new(
            list_item_field(DataType::Float64),
            offsets.clone(),
            Arc::new(self.mz.finish()),
            None,
        )?;
        let intensity = ListArray::try_new(
            list_item_field(DataType::Float32),
            offsets,
            Arc::new(self.intensity.finish()),
            None,
        )?;

        let mut columns = self.scan.finish();
        columns.push(Arc::new(mz));
        columns.push(Arc::new(intensity));
        columns.push(self.precursors.finish()?);
        Ok(columns)
    }
}

enum Inner {
    Long(LongEncoder),
    Wide(WideEncoder),
}

/// Buffers records and emits record batches in the chosen layout
pub(super) struct BatchEncoder {
    inner: Inner,
    records: usize,
    peaks: usize,
}

impl BatchEncoder {
    pub(super) fn new(layout: Layout) -> Self {
        let inner = match layout {
            Layout::Long => Inner::Long(LongEncoder::new()),
            Layout::Wide => Inner::Wide(WideEncoder::new()),
        };
        Self {
            inner,
            records: 0,
            peaks: 0,
        }
    }

    /// Buffer a record. Returns the number of physical rows it occupies.
    pub(super) fn push(&mut self, record: &SpectralRecord) -> Result<usize, WriterError> {
        let rows = match &mut self.inner {
            Inner::Long(encoder) => encoder.push(record)?,
            Inner::Wide(encoder) => encoder.push(record)?,
        };
        self.records += 1;
        self.peaks += record.peak_count();
        Ok(rows)
    }

    pub(super) fn buffered_records(&self) -> usize {
        self.records
    }

    pub(super) fn buffered_peaks(&self) -> usize {
        self.peaks
    }

    /// Drain the buffer into a batch; `None` when nothing is buffered
    pub(super) fn finish_batch(
        &mut self,
        schema: &SchemaRef,
    ) -> Result<Option<RecordBatch>, WriterError> {
        if self.records == 0 {
            return Ok(None);
        }

        let columns = match &mut self.inner {
            Inner::Long(encoder) => encoder.finish()?,
            Inner::Wide(encoder) => encoder.finish()?,
        };
        self.records = 0;
        self.peaks = 0;

        Ok(Some(RecordBatch::try_new(schema.clone(), columns)?))
    }
}
