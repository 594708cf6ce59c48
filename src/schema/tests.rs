use super::*;
use arrow::datatypes::DataType;

#[test]
fn test_long_schema_creation() {
    let schema = create_long_schema();
    assert_eq!(schema.fields().len(), 10);

    let mz = schema.field_with_name(columns::MZ).unwrap();
    assert_eq!(mz.data_type(), &DataType::Float64);
    assert!(mz.is_nullable());
    assert!(!schema.field_with_name(columns::SCAN_ID).unwrap().is_nullable());
}

#[test]
fn test_wide_schema_list_types() {
    let schema = create_wide_schema();
    assert_eq!(schema.fields().len(), 10);

    let mz = schema.field_with_name(columns::MZ).unwrap();
    match mz.data_type() {
        DataType::List(item) => assert_eq!(item.data_type(), &DataType::Float64),
        other => panic!("unexpected mz type {other:?}"),
    }
    let intensity = schema.field_with_name(columns::INTENSITY).unwrap();
    match intensity.data_type() {
        DataType::List(item) => assert_eq!(item.data_type(), &DataType::Float32),
        other => panic!("unexpected intensity type {other:?}"),
    }
}

#[test]
fn test_scan_flags_in_both_layouts() {
    for schema in [create_long_schema(), create_wide_schema()] {
        let centroid = schema.field_with_name(columns::CENTROID).unwrap();
        assert_eq!(centroid.data_type(), &DataType::Boolean);
        assert!(!centroid.is_nullable());

        let mobility = schema.field_with_name(columns::INVERSE_ION_MOBILITY).unwrap();
        assert_eq!(mobility.data_type(), &DataType::Float32);
        assert!(mobility.is_nullable());
        assert_eq!(
            mobility.metadata().get("cv_accession").map(String::as_str),
            Some("MS:1002815")
        );
    }
}

#[test]
fn test_precursor_struct_fields() {
    let schema = create_wide_schema();
    let precursors = schema.field_with_name(columns::PRECURSORS).unwrap();
    let DataType::List(item) = precursors.data_type() else {
        panic!("precursors must be a list");
    };
    let DataType::Struct(fields) = item.data_type() else {
        panic!("precursor items must be structs");
    };
    let names: Vec<&str> = fields.iter().map(|f| f.name().as_str()).collect();
    assert_eq!(
        names,
        vec![
            columns::SELECTED_ION_MZ,
            columns::SELECTED_ION_CHARGE,
            columns::SELECTED_ION_INTENSITY,
            columns::ISOLATION_WINDOW_TARGET,
            columns::ISOLATION_WINDOW_LOWER,
            columns::ISOLATION_WINDOW_UPPER,
            columns::SPECTRUM_REF,
        ]
    );
}

#[test]
fn test_cv_metadata() {
    let schema = create_long_schema();
    let mz_field = schema.field_with_name(columns::MZ).unwrap();
    let cv = mz_field.metadata().get("cv_accession").unwrap();
    assert_eq!(cv, "MS:1000040");
}

#[test]
fn test_schema_validation() {
    assert!(validate_schema(&create_long_schema(), Layout::Long).is_ok());
    assert!(validate_schema(&create_wide_schema(), Layout::Wide).is_ok());

    // A wide schema is not a valid long schema and vice versa
    assert!(matches!(
        validate_schema(&create_wide_schema(), Layout::Long),
        Err(SchemaValidationError::TypeMismatch { .. })
    ));
    assert!(matches!(
        validate_schema(&create_long_schema(), Layout::Wide),
        Err(SchemaValidationError::TypeMismatch { .. })
    ));
}

#[test]
fn test_layout_tags() {
    assert_eq!(Layout::from_tag(Layout::Long.tag()), Some(Layout::Long));
    assert_eq!(Layout::from_tag(Layout::Wide.tag()), Some(Layout::Wide));
    assert_eq!(Layout::from_tag("LONG"), None);
    assert_eq!("Wide".parse::<Layout>(), Ok(Layout::Wide));
    assert!("columnar".parse::<Layout>().is_err());

    assert_eq!(Layout::Long.extension(), "mzparquet");
    assert_eq!(Layout::Wide.extension(), "mzparquetW");
    assert_eq!(Layout::Long.precursor_storage(), PRECURSOR_STORAGE_REPEATED);
}

#[test]
fn test_footer_metadata_is_ordered_and_tagged() {
    let footer = footer_metadata(Layout::Wide).unwrap();
    let keys: Vec<&str> = footer.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(
        keys,
        vec![
            KEY_FORMAT_VERSION,
            KEY_LAYOUT,
            KEY_PRECURSOR_STORAGE,
            KEY_CONVERTER_INFO
        ]
    );
    assert_eq!(footer[1].1, "wide");
    assert_eq!(footer[2].1, PRECURSOR_STORAGE_PER_SCAN);

    let info: ConverterInfo = serde_json::from_str(&footer[3].1).unwrap();
    assert_eq!(info, ConverterInfo::current());

    // identical calls give identical footers
    assert_eq!(footer, footer_metadata(Layout::Wide).unwrap());
}
