//! Row-level evaluation of bound predicates over Arrow arrays.
//!
//! Values are read in place through list offsets; nothing is copied out of
//! the decoded buffers.

use arrow::array::{Array, ArrayRef, AsArray, BooleanArray, Float32Array, Float64Array, ListArray};
use arrow::datatypes::{DataType, Int16Type, Int32Type, Int64Type, Int8Type};
use arrow::record_batch::RecordBatch;

use crate::reader::utils::{get_list_column, get_string_column, list_range, list_struct_values};
use crate::reader::ReaderError;

use super::bind::{BoundPredicate, Conjunct, ValueShape};
use super::predicate::Range;

/// Float32 or Float64 values, compared as f64
enum FloatView<'a> {
    F64(&'a Float64Array),
    F32(&'a Float32Array),
}

impl<'a> FloatView<'a> {
    fn try_new(
        array: &'a ArrayRef,
        column: &str,
        field: Option<&str>,
    ) -> Result<Self, ReaderError> {
        if let Some(values) = array.as_any().downcast_ref::<Float64Array>() {
            return Ok(FloatView::F64(values));
        }
        if let Some(values) = array.as_any().downcast_ref::<Float32Array>() {
            return Ok(FloatView::F32(values));
        }
        Err(ReaderError::mismatch(
            column,
            field,
            format!("expected float values, found {:?}", array.data_type()),
        ))
    }

    #[inline]
    fn matches(&self, i: usize, range: &Range) -> bool {
        match self {
            FloatView::F64(values) => values.is_valid(i) && range.contains(values.value(i)),
            FloatView::F32(values) => {
                values.is_valid(i) && range.contains(f64::from(values.value(i)))
            }
        }
    }

    fn any_in(&self, start: usize, end: usize, range: &Range) -> bool {
        (start..end).any(|i| self.matches(i, range))
    }
}

fn any_in_lists(list: &ListArray, values: &FloatView<'_>, range: &Range) -> BooleanArray {
    (0..list.len())
        .map(|row| {
            if list.is_null(row) {
                return Some(false);
            }
            let (start, end) = list_range(list, row);
            Some(values.any_in(start, end, range))
        })
        .collect()
}

fn int_matches(array: &ArrayRef, value: i64) -> Option<BooleanArray> {
    fn collect<I: Iterator<Item = Option<i64>>>(values: I, value: i64) -> BooleanArray {
        values.map(|v| Some(v == Some(value))).collect()
    }
    let matches = match array.data_type() {
        DataType::Int8 => {
            let values = array.as_primitive::<Int8Type>();
            collect(values.iter().map(|v| v.map(i64::from)), value)
        }
        DataType::Int16 => {
            let values = array.as_primitive::<Int16Type>();
            collect(values.iter().map(|v| v.map(i64::from)), value)
        }
        DataType::Int32 => {
            let values = array.as_primitive::<Int32Type>();
            collect(values.iter().map(|v| v.map(i64::from)), value)
        }
        DataType::Int64 => collect(array.as_primitive::<Int64Type>().iter(), value),
        _ => return None,
    };
    Some(matches)
}

impl Conjunct {
    /// One non-null boolean per row of `batch`
    pub(crate) fn evaluate(&self, batch: &RecordBatch) -> Result<BooleanArray, ReaderError> {
        if batch.num_rows() == 0 {
            return Ok(BooleanArray::from(Vec::<bool>::new()));
        }

        match self {
            Conjunct::AnyInRange {
                column,
                field,
                shape,
                range,
            } => {
                if range.is_empty() {
                    return Ok(BooleanArray::from(vec![false; batch.num_rows()]));
                }
                match shape {
                    ValueShape::Flat => {
                        let array = batch.column_by_name(column).ok_or_else(|| {
                            ReaderError::mismatch(column, None, "column is missing")
                        })?;
                        let values = FloatView::try_new(array, column, None)?;
                        Ok((0..batch.num_rows())
                            .map(|row| Some(values.matches(row, range)))
                            .collect())
                    }
                    ValueShape::List => {
                        let list = get_list_column(batch, column)?;
                        let values = FloatView::try_new(list.values(), column, None)?;
                        Ok(any_in_lists(list, &values, range))
                    }
                    ValueShape::StructList => {
                        let field = field.as_deref().ok_or_else(|| {
                            ReaderError::mismatch(column, None, "struct field not bound")
                        })?;
                        let list = get_list_column(batch, column)?;
                        let structs = list_struct_values(list, column)?;
                        let child = structs.column_by_name(field).ok_or_else(|| {
                            ReaderError::mismatch(column, Some(field), "field is missing")
                        })?;
                        let values = FloatView::try_new(child, column, Some(field))?;
                        Ok(any_in_lists(list, &values, range))
                    }
                }
            }
            Conjunct::EqualsInt { column, value } => {
                let array = batch
                    .column_by_name(column)
                    .ok_or_else(|| ReaderError::mismatch(column, None, "column is missing"))?;
                int_matches(array, *value).ok_or_else(|| {
                    ReaderError::mismatch(
                        column,
                        None,
                        format!("expected an integer column, found {:?}", array.data_type()),
                    )
                })
            }
            Conjunct::EqualsStr { column, value } => {
                let ids = get_string_column(batch, column)?;
                Ok(ids
                    .iter()
                    .map(|v| Some(v == Some(value.as_str())))
                    .collect())
            }
        }
    }
}

impl BoundPredicate {
    /// Per-row conjunction of all conjuncts.
    ///
    /// On the wide layout a row is a scan, so this is the final answer. On
    /// the long layout it is only meaningful inside a scan group.
    pub(crate) fn evaluate_rows(&self, batch: &RecordBatch) -> Result<BooleanArray, ReaderError> {
        let mut result = BooleanArray::from(vec![true; batch.num_rows()]);
        for conjunct in &self.conjuncts {
            let matches = conjunct.evaluate(batch)?;
            result = arrow::compute::and(&result, &matches)?;
        }
        Ok(result)
    }

    /// One boolean array per conjunct
    pub(crate) fn evaluate_conjuncts(
        &self,
        batch: &RecordBatch,
    ) -> Result<Vec<BooleanArray>, ReaderError> {
        self.conjuncts
            .iter()
            .map(|conjunct| conjunct.evaluate(batch))
            .collect()
    }
}
