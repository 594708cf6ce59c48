use arrow::array::{
    Array, ArrayRef, BooleanArray, Float32Array, Float64Array, Int16Array, ListArray, StringArray,
    StructArray,
};
use arrow::record_batch::RecordBatch;

use super::ReaderError;

fn column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a ArrayRef, ReaderError> {
    batch
        .column_by_name(name)
        .ok_or_else(|| ReaderError::mismatch(name, None, "column is missing"))
}

fn downcast<'a, T: 'static>(
    array: &'a ArrayRef,
    column: &str,
    field: Option<&str>,
    expected: &str,
) -> Result<&'a T, ReaderError> {
    array.as_any().downcast_ref::<T>().ok_or_else(|| {
        ReaderError::mismatch(
            column,
            field,
            format!("expected {expected}, found {:?}", array.data_type()),
        )
    })
}

/// Get a required String column by name.
pub(crate) fn get_string_column<'a>(
    batch: &'a RecordBatch,
    name: &str,
) -> Result<&'a StringArray, ReaderError> {
    downcast(column(batch, name)?, name, None, "Utf8")
}

/// Get a required Int16 column by name.
pub(crate) fn get_int16_column<'a>(
    batch: &'a RecordBatch,
    name: &str,
) -> Result<&'a Int16Array, ReaderError> {
    downcast(column(batch, name)?, name, None, "Int16")
}

/// Get a required Boolean column by name.
pub(crate) fn get_boolean_column<'a>(
    batch: &'a RecordBatch,
    name: &str,
) -> Result<&'a BooleanArray, ReaderError> {
    downcast(column(batch, name)?, name, None, "Boolean")
}

/// Get a required Float32 column by name.
pub(crate) fn get_float32_column<'a>(
    batch: &'a RecordBatch,
    name: &str,
) -> Result<&'a Float32Array, ReaderError> {
    downcast(column(batch, name)?, name, None, "Float32")
}

/// Get a required Float64 column by name.
pub(crate) fn get_float64_column<'a>(
    batch: &'a RecordBatch,
    name: &str,
) -> Result<&'a Float64Array, ReaderError> {
    downcast(column(batch, name)?, name, None, "Float64")
}

/// Get a required List column by name.
pub(crate) fn get_list_column<'a>(
    batch: &'a RecordBatch,
    name: &str,
) -> Result<&'a ListArray, ReaderError> {
    downcast(column(batch, name)?, name, None, "List")
}

/// Struct values of a `List<Struct>` column.
pub(crate) fn list_struct_values<'a>(
    list: &'a ListArray,
    name: &str,
) -> Result<&'a StructArray, ReaderError> {
    downcast(list.values(), name, None, "List<Struct>")
}

/// Child array of a struct, looked up by field name.
pub(crate) fn struct_child<'a, T: 'static>(
    values: &'a StructArray,
    column: &str,
    field: &str,
    expected: &str,
) -> Result<&'a T, ReaderError> {
    let child = values
        .column_by_name(field)
        .ok_or_else(|| ReaderError::mismatch(column, Some(field), "field is missing"))?;
    downcast(child, column, Some(field), expected)
}

/// Read an optional f64 value from a nullable array.
pub(crate) fn get_optional_f64(array: &Float64Array, idx: usize) -> Option<f64> {
    array.is_valid(idx).then(|| array.value(idx))
}

/// Read an optional f32 value from a nullable array.
pub(crate) fn get_optional_f32(array: &Float32Array, idx: usize) -> Option<f32> {
    array.is_valid(idx).then(|| array.value(idx))
}

/// Read an optional i16 value from a nullable array.
pub(crate) fn get_optional_i16(array: &Int16Array, idx: usize) -> Option<i16> {
    array.is_valid(idx).then(|| array.value(idx))
}

/// Value range `[start, end)` of row `idx` in a list array.
pub(crate) fn list_range(list: &ListArray, idx: usize) -> (usize, usize) {
    let offsets = list.value_offsets();
    (offsets[idx] as usize, offsets[idx + 1] as usize)
}
