use super::*;
use crate::error::ErrorKind;
use crate::record::{Precursor, PrecursorPolicy, SpectralRecord, SpectralRecordBuilder};
use crate::schema::{columns, create_long_schema, Layout, KEY_LAYOUT};
use crate::writer::{ContainerWriter, WriterConfig};

use std::fs::{self, File};
use std::path::Path;
use std::sync::Arc;

use arrow::array::{Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use bytes::Bytes;
use parquet::arrow::ArrowWriter;
use parquet::file::properties::WriterProperties;
use parquet::format::KeyValue;
use tempfile::tempdir;

fn sample_records() -> Vec<SpectralRecord> {
    vec![
        SpectralRecordBuilder::new("scan=1", 1)
            .scan_start_time(60.0)
            .total_ion_current(3000.0)
            .add_peak(400.0, 1000.0)
            .add_peak(500.0, 2000.0)
            .build()
            .unwrap(),
        SpectralRecordBuilder::new("scan=2", 2)
            .scan_start_time(65.0)
            .ion_injection_time(20.0)
            .centroid(true)
            .inverse_ion_mobility(1.05)
            .peaks(vec![200.0, 250.0, 300.0], vec![500.0, 1500.0, 750.0])
            .precursor(
                Precursor::new(450.0)
                    .with_charge(2)
                    .with_intensity(5000.0)
                    .with_isolation_window(450.0, 0.8, 0.8)
                    .with_spectrum_ref("scan=1"),
            )
            .build()
            .unwrap(),
        SpectralRecordBuilder::new("scan=3", 2)
            .scan_start_time(66.0)
            .precursor(Precursor::new(612.0))
            .precursor(Precursor::new(613.0).with_charge(3))
            .build()
            .unwrap(),
        // MS1 precursor, only storable under the permissive policy
        SpectralRecordBuilder::new("scan=4", 1)
            .add_peak(100.0, 1.0)
            .precursor(Precursor::new(99.0))
            .precursor_policy(PrecursorPolicy::Permissive)
            .build()
            .unwrap(),
    ]
}

fn write(path: &Path, layout: Layout, records: &[SpectralRecord]) {
    let mut writer = ContainerWriter::create(path, layout, WriterConfig::default()).unwrap();
    writer.write_records(records).unwrap();
    writer.finish().unwrap();
}

fn write_plain_parquet(path: &Path, schema: Arc<Schema>, batch: RecordBatch, kv: Vec<KeyValue>) {
    let props = WriterProperties::builder()
        .set_key_value_metadata(Some(kv))
        .build();
    let mut writer =
        ArrowWriter::try_new(File::create(path).unwrap(), schema, Some(props)).unwrap();
    writer.write(&batch).unwrap();
    writer.close().unwrap();
}

#[test]
fn test_read_write_roundtrip() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    for layout in [Layout::Long, Layout::Wide] {
        let path = dir.path().join(format!("run.{}", layout.extension()));
        write(&path, layout, &sample_records());

        let reader = MzParquetReader::open(&path)?;
        assert_eq!(reader.layout(), layout);
        assert_eq!(reader.metadata().format_version, "1.0.0");

        let records: Vec<SpectralRecord> = reader.records()?.collect::<Result<_, _>>()?;
        assert_eq!(records, sample_records());
    }
    Ok(())
}

#[test]
fn test_long_grouping_across_batches() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("run.mzparquet");
    write(&path, Layout::Long, &sample_records());

    // one row per batch splits every multi-peak scan
    let reader = MzParquetReader::open_with_config(&path, ReaderConfig { batch_size: 1 })?;
    let records: Vec<SpectralRecord> = reader.records()?.collect::<Result<_, _>>()?;
    assert_eq!(records.len(), 4);
    assert_eq!(records[1].peak_count(), 3);
    assert_eq!(records[2].peak_count(), 0);
    assert_eq!(records[2].precursors().len(), 2);
    Ok(())
}

#[test]
fn test_from_bytes() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("run.mzparquetW");
    write(&path, Layout::Wide, &sample_records());

    let reader = MzParquetReader::from_bytes(Bytes::from(fs::read(&path)?))?;
    assert_eq!(reader.layout(), Layout::Wide);
    assert_eq!(reader.total_rows(), 4);
    assert_eq!(reader.records()?.count(), 4);
    Ok(())
}

#[test]
fn test_metadata_from_footer() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("run.mzparquet");
    write(&path, Layout::Long, &sample_records());

    let reader = MzParquetReader::open(&path)?;
    let metadata = reader.metadata();
    // 2 + 3 peaks, a marker row and one MS1 peak
    assert_eq!(metadata.total_rows, 7);
    assert_eq!(metadata.num_row_groups, 1);
    assert_eq!(metadata.precursor_storage.as_deref(), Some("repeated"));
    assert_eq!(metadata.get(KEY_LAYOUT), Some("long"));
    let converter = metadata.converter.clone().unwrap();
    assert_eq!(converter.name, env!("CARGO_PKG_NAME"));
    Ok(())
}

#[test]
fn test_missing_layout_tag_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("plain.parquet");
    let schema = Arc::new(Schema::new(vec![Field::new("mz", DataType::Float64, false)]));
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![Arc::new(Float64Array::from(vec![1.0, 2.0]))],
    )
    .unwrap();
    write_plain_parquet(&path, schema, batch, Vec::new());

    let err = MzParquetReader::open(&path).err().unwrap();
    assert!(matches!(err, ReaderError::InvalidFormat(ref msg) if msg.contains(KEY_LAYOUT)));
    assert_eq!(err.kind(), ErrorKind::Io);
}

#[test]
fn test_unknown_layout_tag_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("odd.parquet");
    let schema = Arc::new(Schema::new(vec![Field::new("scan_id", DataType::Utf8, false)]));
    let batch =
        RecordBatch::try_new(schema.clone(), vec![Arc::new(StringArray::from(vec!["a"]))]).unwrap();
    let kv = vec![KeyValue {
        key: KEY_LAYOUT.to_string(),
        value: Some("diagonal".to_string()),
    }];
    write_plain_parquet(&path, schema, batch, kv);

    let err = MzParquetReader::open(&path).err().unwrap();
    assert!(matches!(err, ReaderError::InvalidFormat(ref msg) if msg.contains("diagonal")));
}

#[test]
fn test_schema_not_matching_layout() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.mzparquet");
    let schema = Arc::new(Schema::new(vec![Field::new(
        columns::SCAN_ID,
        DataType::Utf8,
        false,
    )]));
    let batch =
        RecordBatch::try_new(schema.clone(), vec![Arc::new(StringArray::from(vec!["a"]))]).unwrap();
    let kv = vec![KeyValue {
        key: KEY_LAYOUT.to_string(),
        value: Some("long".to_string()),
    }];
    write_plain_parquet(&path, schema, batch, kv);

    let err = MzParquetReader::open(&path).err().unwrap();
    assert_eq!(err.kind(), ErrorKind::SchemaMismatch);
    assert!(matches!(
        err,
        ReaderError::SchemaMismatch { ref column, .. } if column == columns::MS_LEVEL
    ));
}

#[test]
fn test_not_parquet_and_missing_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("garbage.mzparquet");
    fs::write(&path, b"definitely not parquet").unwrap();
    assert!(matches!(
        MzParquetReader::open(&path),
        Err(ReaderError::InvalidFormat(_))
    ));

    let missing = dir.path().join("missing.mzparquet");
    assert!(matches!(
        MzParquetReader::open(&missing),
        Err(ReaderError::Open { .. })
    ));
}

#[test]
fn test_projection() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("run.mzparquet");
    write(&path, Layout::Long, &sample_records());

    let reader = MzParquetReader::open(&path)?;
    let batches: Vec<RecordBatch> = reader
        .iter_batches(Some(&[columns::MZ, columns::SCAN_ID][..]))?
        .collect::<Result<_, _>>()?;
    let schema = batches[0].schema();
    let names: Vec<&str> = schema.fields().iter().map(|f| f.name().as_str()).collect();
    assert_eq!(names, vec![columns::SCAN_ID, columns::MZ]);

    let err = reader.iter_batches(Some(&["retention_time"][..])).err().unwrap();
    assert!(matches!(
        err,
        ReaderError::SchemaMismatch { ref column, .. } if column == "retention_time"
    ));

    let all = reader.read_all_batches()?;
    assert_eq!(all[0].num_columns(), create_long_schema().fields().len());
    Ok(())
}

#[test]
fn test_summary_matches_between_layouts() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let long = dir.path().join("run.mzparquet");
    let wide = dir.path().join("run.mzparquetW");
    write(&long, Layout::Long, &sample_records());
    write(&wide, Layout::Wide, &sample_records());

    let long_summary = MzParquetReader::open(&long)?.summary()?;
    let wide_summary = MzParquetReader::open(&wide)?.summary()?;

    assert_eq!(long_summary.num_scans, 4);
    assert_eq!(long_summary.total_peaks, 6);
    assert_eq!(long_summary.total_rows, 7);
    assert_eq!(long_summary.scans_per_level.get(&1), Some(&2));
    assert_eq!(long_summary.scans_per_level.get(&2), Some(&2));
    assert_eq!(long_summary.rt_range, Some((60.0, 66.0)));
    assert_eq!(long_summary.mz_range, Some((100.0, 500.0)));

    assert_eq!(wide_summary.num_scans, long_summary.num_scans);
    assert_eq!(wide_summary.total_peaks, long_summary.total_peaks);
    assert_eq!(wide_summary.scans_per_level, long_summary.scans_per_level);
    assert_eq!(wide_summary.mz_range, long_summary.mz_range);
    assert_eq!(wide_summary.total_rows, 4);

    assert!(long_summary.to_string().contains("Total scans: 4"));
    Ok(())
}
