use std::collections::HashMap;
use std::sync::Arc;

use arrow::datatypes::{DataType, Field, FieldRef, Fields, Schema, SchemaBuilder, SchemaRef};

use super::columns;
use super::layout::Layout;

/// Creates a Field with CV term metadata annotation
fn field_with_cv(name: &str, data_type: DataType, nullable: bool, cv_accession: &str) -> Field {
    let mut metadata = HashMap::new();
    metadata.insert("cv_accession".to_string(), cv_accession.to_string());
    Field::new(name, data_type, nullable).with_metadata(metadata)
}

/// Item field of a list column holding non-null values of `data_type`.
pub fn list_item_field(data_type: DataType) -> FieldRef {
    Arc::new(Field::new(columns::LIST_ITEM, data_type, false))
}

/// Fields of the precursor struct, in storage order.
pub fn precursor_fields() -> Fields {
    Fields::from(vec![
        Field::new(columns::SELECTED_ION_MZ, DataType::Float64, false),
        Field::new(columns::SELECTED_ION_CHARGE, DataType::Int16, true),
        Field::new(columns::SELECTED_ION_INTENSITY, DataType::Float32, true),
        Field::new(columns::ISOLATION_WINDOW_TARGET, DataType::Float64, true),
        Field::new(columns::ISOLATION_WINDOW_LOWER, DataType::Float64, true),
        Field::new(columns::ISOLATION_WINDOW_UPPER, DataType::Float64, true),
        Field::new(columns::SPECTRUM_REF, DataType::Utf8, true),
    ])
}

/// Item field of the `precursors` list column.
pub fn precursor_item_field() -> FieldRef {
    list_item_field(DataType::Struct(precursor_fields()))
}

/// Scan-level columns shared by both layouts.
fn push_scan_columns(builder: &mut SchemaBuilder) {
    builder.push(field_with_cv(
        columns::SCAN_ID,
        DataType::Utf8,
        false,
        "MS:1000767", // native spectrum identifier
    ));

    builder.push(field_with_cv(
        columns::MS_LEVEL,
        DataType::Int16,
        false,
        "MS:1000511", // ms level
    ));

    builder.push(field_with_cv(
        columns::SCAN_START_TIME,
        DataType::Float32,
        true,
        "MS:1000016", // scan start time
    ));

    builder.push(field_with_cv(
        columns::ION_INJECTION_TIME,
        DataType::Float32,
        true,
        "MS:1000927", // ion injection time
    ));

    builder.push(field_with_cv(
        columns::TOTAL_ION_CURRENT,
        DataType::Float32,
        true,
        "MS:1000285", // total ion current
    ));

    builder.push(field_with_cv(
        columns::CENTROID,
        DataType::Boolean,
        false,
        "MS:1000127", // centroid spectrum
    ));

    builder.push(field_with_cv(
        columns::INVERSE_ION_MOBILITY,
        DataType::Float32,
        true,
        "MS:1002815", // inverse reduced ion mobility
    ));
}

fn push_precursor_column(builder: &mut SchemaBuilder) {
    builder.push(field_with_cv(
        columns::PRECURSORS,
        DataType::List(precursor_item_field()),
        false,
        "MS:1000441", // precursor list
    ));
}

/// Creates the long-layout schema: one row per peak.
///
/// Scan metadata and the precursor list are repeated on every peak row, which
/// dictionary/RLE encoding compresses away. `mz` and `intensity` are nullable so
/// that a scan without peaks is still represented by a single marker row.
///
/// ```
/// use mzparquet::schema::create_long_schema;
///
/// let schema = create_long_schema();
/// assert_eq!(schema.fields().len(), 10);
/// ```
pub fn create_long_schema() -> Schema {
    let mut builder = SchemaBuilder::new();
    push_scan_columns(&mut builder);

    builder.push(field_with_cv(
        columns::MZ,
        DataType::Float64,
        true,
        "MS:1000040", // m/z
    ));

    builder.push(field_with_cv(
        columns::INTENSITY,
        DataType::Float32,
        true,
        "MS:1000042", // peak intensity
    ));

    push_precursor_column(&mut builder);
    builder.finish()
}

/// Creates the wide-layout schema: one row per scan with `List<Float64>` m/z
/// and `List<Float32>` intensity arrays.
pub fn create_wide_schema() -> Schema {
    let mut builder = SchemaBuilder::new();
    push_scan_columns(&mut builder);

    builder.push(field_with_cv(
        columns::MZ,
        DataType::List(list_item_field(DataType::Float64)),
        false,
        "MS:1000514", // m/z array
    ));

    builder.push(field_with_cv(
        columns::INTENSITY,
        DataType::List(list_item_field(DataType::Float32)),
        false,
        "MS:1000515", // intensity array
    ));

    push_precursor_column(&mut builder);
    builder.finish()
}

/// Returns the Arc-wrapped schema of a layout
pub fn create_schema(layout: Layout) -> SchemaRef {
    match layout {
        Layout::Long => Arc::new(create_long_schema()),
        Layout::Wide => Arc::new(create_wide_schema()),
    }
}
