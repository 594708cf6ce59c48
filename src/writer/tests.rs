use super::*;
use crate::record::{Precursor, SpectralRecord, SpectralRecordBuilder};
use crate::schema::{columns, Layout, KEY_LAYOUT, KEY_PRECURSOR_STORAGE};

use std::fs::{self, File};
use std::path::Path;

use arrow::array::{Array, BooleanArray, Float32Array, Float64Array, ListArray, StringArray};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::file::reader::{FileReader, SerializedFileReader};
use tempfile::tempdir;

fn sample_records() -> Vec<SpectralRecord> {
    vec![
        SpectralRecordBuilder::new("scan=1", 1)
            .scan_start_time(1.5)
            .total_ion_current(3.0e4)
            .add_peak(100.0, 1.0e4)
            .add_peak(200.0, 2.0e4)
            .build()
            .unwrap(),
        SpectralRecordBuilder::new("scan=2", 2)
            .scan_start_time(1.6)
            .ion_injection_time(35.0)
            .centroid(true)
            .inverse_ion_mobility(0.92)
            .add_peak(267.05, 500.0)
            .precursor(
                Precursor::new(534.5)
                    .with_charge(2)
                    .with_isolation_window(534.5, 1.0, 1.0)
                    .with_spectrum_ref("scan=1"),
            )
            .build()
            .unwrap(),
        // zero peaks
        SpectralRecordBuilder::new("scan=3", 2)
            .precursor(Precursor::new(612.3))
            .build()
            .unwrap(),
    ]
}

fn write_container(path: &Path, layout: Layout, records: &[SpectralRecord]) -> WriterStats {
    let mut writer = ContainerWriter::create(path, layout, WriterConfig::default()).unwrap();
    writer.write_records(records).unwrap();
    writer.finish().unwrap()
}

fn read_batches(path: &Path) -> Vec<arrow::record_batch::RecordBatch> {
    let file = File::open(path).unwrap();
    ParquetRecordBatchReaderBuilder::try_new(file)
        .unwrap()
        .build()
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap()
}

fn staging_files(dir: &Path) -> Vec<String> {
    fs::read_dir(dir)
        .unwrap()
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .filter(|name| name.starts_with(".mzparquet-"))
        .collect()
}

#[test]
fn test_long_layout_rows_and_marker() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("run.mzparquet");
    let stats = write_container(&path, Layout::Long, &sample_records());

    assert_eq!(stats.layout, Layout::Long);
    assert_eq!(stats.scans_written, 3);
    assert_eq!(stats.peaks_written, 3);
    // three peaks plus one marker row
    assert_eq!(stats.rows_written, 4);
    assert!(stats.file_size_bytes > 0);
    assert_eq!(stats.file_size_bytes, fs::metadata(&path).unwrap().len());

    let batches = read_batches(&path);
    let rows: usize = batches.iter().map(|b| b.num_rows()).sum();
    assert_eq!(rows, 4);

    let batch = &batches[0];
    let ids = batch
        .column_by_name(columns::SCAN_ID)
        .unwrap()
        .as_any()
        .downcast_ref::<StringArray>()
        .unwrap();
    let mz = batch
        .column_by_name(columns::MZ)
        .unwrap()
        .as_any()
        .downcast_ref::<Float64Array>()
        .unwrap();
    assert_eq!(ids.value(0), "scan=1");
    assert_eq!(ids.value(1), "scan=1");
    assert_eq!(ids.value(3), "scan=3");
    assert_eq!(mz.value(2), 267.05);
    assert!(mz.is_null(3));

    // precursors repeat on every row of a scan
    let precursors = batch
        .column_by_name(columns::PRECURSORS)
        .unwrap()
        .as_any()
        .downcast_ref::<ListArray>()
        .unwrap();
    assert_eq!(precursors.value_length(0), 0);
    assert_eq!(precursors.value_length(2), 1);
    assert_eq!(precursors.value_length(3), 1);

    let centroid = batch
        .column_by_name(columns::CENTROID)
        .unwrap()
        .as_any()
        .downcast_ref::<BooleanArray>()
        .unwrap();
    let mobility = batch
        .column_by_name(columns::INVERSE_ION_MOBILITY)
        .unwrap()
        .as_any()
        .downcast_ref::<Float32Array>()
        .unwrap();
    assert!(!centroid.value(0));
    assert!(centroid.value(2));
    assert!(mobility.is_null(1));
    assert_eq!(mobility.value(2), 0.92);
}

#[test]
fn test_wide_layout_one_row_per_scan() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("run.mzparquetW");
    let stats = write_container(&path, Layout::Wide, &sample_records());

    assert_eq!(stats.rows_written, 3);
    assert_eq!(stats.peaks_written, 3);

    let batches = read_batches(&path);
    assert_eq!(batches.len(), 1);
    let mz = batches[0]
        .column_by_name(columns::MZ)
        .unwrap()
        .as_any()
        .downcast_ref::<ListArray>()
        .unwrap();
    assert_eq!(mz.value_length(0), 2);
    assert_eq!(mz.value_length(1), 1);
    assert_eq!(mz.value_length(2), 0);
    assert!(!mz.is_null(2));
}

#[test]
fn test_footer_metadata_written() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("run.mzparquetW");
    write_container(&path, Layout::Wide, &sample_records());

    let reader = SerializedFileReader::new(File::open(&path).unwrap()).unwrap();
    let kv = reader
        .metadata()
        .file_metadata()
        .key_value_metadata()
        .cloned()
        .unwrap();
    let lookup = |key: &str| {
        kv.iter()
            .find(|entry| entry.key == key)
            .and_then(|entry| entry.value.clone())
    };
    assert_eq!(lookup(KEY_LAYOUT).as_deref(), Some("wide"));
    assert_eq!(lookup(KEY_PRECURSOR_STORAGE).as_deref(), Some("per_scan"));
}

#[test]
fn test_duplicate_scan_id_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("dup.mzparquet");
    let record = SpectralRecord::new("scan=1", 1, vec![100.0], vec![1.0]).unwrap();

    let mut writer = ContainerWriter::create(&path, Layout::Long, WriterConfig::default()).unwrap();
    writer.write_record(&record).unwrap();
    let err = writer.write_record(&record).unwrap_err();
    assert!(matches!(err, WriterError::DuplicateScanId { ref scan_id, .. } if scan_id == "scan=1"));
    assert_eq!(writer.scans_written(), 1);
    drop(writer);

    assert!(!path.exists());
    assert!(staging_files(dir.path()).is_empty());
}

#[test]
fn test_abort_leaves_no_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("aborted.mzparquet");

    let mut writer = ContainerWriter::create(&path, Layout::Long, WriterConfig::default()).unwrap();
    writer.write_records(&sample_records()).unwrap();
    assert_eq!(staging_files(dir.path()).len(), 1);
    writer.abort();

    assert!(!path.exists());
    assert!(staging_files(dir.path()).is_empty());
}

#[test]
fn test_abort_keeps_prior_container() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("run.mzparquet");
    write_container(&path, Layout::Long, &sample_records());
    let before = fs::read(&path).unwrap();

    let mut writer = ContainerWriter::create(&path, Layout::Long, WriterConfig::default()).unwrap();
    writer
        .write_record(&SpectralRecord::new("other", 1, vec![1.0], vec![1.0]).unwrap())
        .unwrap();
    drop(writer);

    assert_eq!(fs::read(&path).unwrap(), before);
}

#[test]
fn test_identical_input_is_byte_identical() {
    let dir = tempdir().unwrap();
    for layout in [Layout::Long, Layout::Wide] {
        let first = dir.path().join(format!("a.{}", layout.extension()));
        let second = dir.path().join(format!("b.{}", layout.extension()));
        write_container(&first, layout, &sample_records());
        write_container(&second, layout, &sample_records());
        assert_eq!(fs::read(&first).unwrap(), fs::read(&second).unwrap());
    }
}

#[test]
fn test_small_batches_and_row_groups() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("groups.mzparquetW");
    let config = WriterConfig {
        batch_size: 2,
        wide_row_group_size: 2,
        ..WriterConfig::default()
    };

    let records: Vec<SpectralRecord> = (0..5)
        .map(|i| {
            SpectralRecord::new(format!("scan={i}"), 1, vec![100.0 + i as f64], vec![1.0]).unwrap()
        })
        .collect();

    let mut writer = ContainerWriter::create(&path, Layout::Wide, config).unwrap();
    writer.write_records(&records).unwrap();
    let stats = writer.finish().unwrap();

    assert_eq!(stats.scans_written, 5);
    assert_eq!(stats.row_groups_written, 3);
}

#[test]
fn test_empty_container() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("empty.mzparquet");
    let stats = write_container(&path, Layout::Long, &[]);
    assert_eq!(stats.scans_written, 0);
    assert_eq!(stats.rows_written, 0);
    assert!(path.exists());
}

#[test]
fn test_writer_config_presets() {
    let max = WriterConfig::max_compression();
    assert_eq!(max.compression, CompressionType::Zstd(22));
    let fast = WriterConfig::fast_write();
    assert_eq!(fast.compression, CompressionType::Snappy);
    assert!(!fast.use_byte_stream_split);
    assert_eq!(WriterConfig::balanced().row_group_rows(Layout::Long), 262_144);
    assert_eq!(WriterConfig::default().row_group_rows(Layout::Wide), 65_535);
}

#[test]
fn test_out_of_range_zstd_level_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("run.mzparquet");
    let config = WriterConfig {
        compression: CompressionType::Zstd(40),
        ..WriterConfig::default()
    };

    let err = ContainerWriter::create(&path, Layout::Long, config).err().unwrap();
    assert!(matches!(err, WriterError::InvalidData(ref msg) if msg.contains("40")), "{err}");
    assert!(fs::read_dir(dir.path()).unwrap().next().is_none());
}
