//! Query behaviour on concrete runs, through the public API only.

mod common;

use common::{small_batches, write_container};
use mzparquet::prelude::*;
use mzparquet::query::Scalar;
use tempfile::{tempdir, TempDir};

fn scan(id: &str, ms_level: i16, mz: &[f64], precursors: &[f64]) -> SpectralRecord {
    SpectralRecordBuilder::new(id, ms_level)
        .peaks(mz.to_vec(), vec![1.0; mz.len()])
        .precursors(precursors.iter().map(|&mz| Precursor::new(mz)).collect())
        .build()
        .unwrap()
}

fn open_both(records: &[SpectralRecord]) -> (TempDir, [MzParquetReader; 2]) {
    let dir = tempdir().unwrap();
    let open = |layout| {
        MzParquetReader::open_with_config(
            write_container(dir.path(), "q", layout, small_batches(), records),
            ReaderConfig { batch_size: 3 },
        )
        .unwrap()
    };
    let readers = [open(Layout::Long), open(Layout::Wide)];
    (dir, readers)
}

#[test]
fn test_range_with_ms_level() {
    let records = vec![
        scan("ms2_hit", 2, &[267.05], &[]),
        scan("ms1_hit", 1, &[267.05], &[]),
        scan("ms2_above", 2, &[267.15], &[]),
        scan("ms2_low_edge", 2, &[100.0, 267.0], &[]),
        scan("ms2_high_edge", 2, &[267.1, 900.0], &[]),
    ];
    let (_dir, readers) = open_both(&records);
    let predicate = Predicate::mz_between(267.0, 267.1).and(Predicate::ms_level(2));

    for reader in &readers {
        let ids = reader.query(predicate.clone()).scan_ids().unwrap();
        assert_eq!(ids, vec!["ms2_hit", "ms2_low_edge", "ms2_high_edge"]);
    }
}

#[test]
fn test_precursor_struct_predicate() {
    let records = vec![
        scan("a", 2, &[100.0], &[534.5]),
        scan("b", 2, &[100.0], &[]),
        scan("c", 2, &[], &[600.0, 534.0]),
        scan("d", 3, &[100.0, 110.0, 120.0], &[535.0001]),
    ];
    let (_dir, readers) = open_both(&records);

    for reader in &readers {
        let ids = reader
            .query(Predicate::precursor_mz_between(534.0, 535.0))
            .scan_ids()
            .unwrap();
        assert_eq!(ids, vec!["a", "c"], "{} layout", reader.layout());
    }
}

#[test]
fn test_generic_predicates() {
    let records = vec![
        SpectralRecordBuilder::new("x", 2)
            .scan_start_time(10.0)
            .peaks(vec![1.0], vec![1.0])
            .build()
            .unwrap(),
        SpectralRecordBuilder::new("y", 2)
            .scan_start_time(20.0)
            .build()
            .unwrap(),
    ];
    let (_dir, readers) = open_both(&records);

    for reader in &readers {
        // flat float column
        let ids = reader
            .query(Predicate::any_between(columns::SCAN_START_TIME, 15.0, 25.0))
            .scan_ids()
            .unwrap();
        assert_eq!(ids, vec!["y"]);

        // float32 list values
        let count = reader
            .query(Predicate::any_between(columns::INTENSITY, 0.5, 1.5))
            .count()
            .unwrap();
        assert_eq!(count, 1);

        let ids = reader
            .query(Predicate::equals(columns::SCAN_ID, Scalar::from("y")))
            .scan_ids()
            .unwrap();
        assert_eq!(ids, vec!["y"]);
    }
}

#[test]
fn test_schema_mismatch_and_cancellation() {
    let (_dir, readers) = open_both(&[scan("a", 2, &[1.0], &[2.0])]);

    for reader in &readers {
        let err = reader
            .query(Predicate::struct_field_between(columns::PRECURSORS, "drift_time", 0.0, 1.0))
            .scan_ids()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SchemaMismatch);
        assert!(err.to_string().contains("drift_time"), "{err}");

        let token = CancellationToken::new();
        token.cancel();
        let err = reader
            .query(Predicate::mz_between(0.0, 10.0))
            .with_cancellation(token)
            .records()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Cancelled);
    }
}

#[test]
fn test_query_records_match_scan_ids() {
    let records: Vec<SpectralRecord> = (0..30)
        .map(|i| {
            let level = if i % 3 == 0 { 1 } else { 2 };
            let precursors: Vec<f64> = if level == 2 { vec![400.0 + i as f64] } else { vec![] };
            scan(
                &format!("scan={}", i),
                level,
                &[100.0 + i as f64, 500.0 + i as f64],
                &precursors,
            )
        })
        .collect();
    let (_dir, readers) = open_both(&records);
    let predicate = Predicate::mz_between(505.0, 520.0).and(Predicate::ms_level(2));

    for reader in &readers {
        let query = reader.query(predicate.clone());
        let ids = query.scan_ids().unwrap();
        let found = query.records().unwrap();
        let found_ids: Vec<&str> = found.iter().map(|r| r.scan_id()).collect();
        assert_eq!(found_ids, ids);

        let expected: Vec<&SpectralRecord> = records
            .iter()
            .filter(|r| r.ms_level() == 2 && r.mz().iter().any(|&v| (505.0..=520.0).contains(&v)))
            .collect();
        assert_eq!(found.iter().collect::<Vec<_>>(), expected);
    }
}
