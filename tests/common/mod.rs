//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use mzparquet::prelude::*;
use proptest::prelude::*;

/// Write `records` to `<dir>/<name>.<ext>` with the given layout
pub fn write_container(
    dir: &Path,
    name: &str,
    layout: Layout,
    config: WriterConfig,
    records: &[SpectralRecord],
) -> PathBuf {
    let path = dir.join(format!("{}.{}", name, layout.extension()));
    let mut writer = ContainerWriter::create(&path, layout, config).unwrap();
    writer.write_records(records).unwrap();
    writer.finish().unwrap();
    path
}

/// Small batches and row groups so that scans straddle batch boundaries
pub fn small_batches() -> WriterConfig {
    WriterConfig {
        batch_size: 3,
        row_group_size: 16,
        wide_row_group_size: 4,
        ..WriterConfig::default()
    }
}

pub fn read_all(path: &Path, batch_size: usize) -> Vec<SpectralRecord> {
    MzParquetReader::open_with_config(path, ReaderConfig { batch_size })
        .unwrap()
        .records()
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap()
}

fn precursor() -> impl Strategy<Value = Precursor> {
    (
        200.0f64..1500.0,
        proptest::option::of(1i16..6),
        proptest::option::of(0.0f32..1e7),
        proptest::option::of((0.1f64..3.0, 0.1f64..3.0)),
        proptest::option::of("scan=[0-9]{1,4}"),
    )
        .prop_map(|(mz, charge, intensity, window, spectrum_ref)| {
            let mut precursor = Precursor::new(mz);
            precursor.selected_ion_charge = charge;
            precursor.selected_ion_intensity = intensity;
            if let Some((lower, upper)) = window {
                precursor = precursor.with_isolation_window(mz, lower, upper);
            }
            precursor.spectrum_ref = spectrum_ref;
            precursor
        })
}

/// One scan; `index` makes the id unique
fn record(index: usize) -> impl Strategy<Value = SpectralRecord> {
    (
        1i16..4,
        proptest::option::of(0.0f32..7200.0),
        proptest::option::of(0.0f32..200.0),
        any::<bool>(),
        proptest::option::of(0.5f32..1.7),
        proptest::collection::vec((100.0f64..2000.0, 0.0f32..1e6), 0..12),
        proptest::collection::vec(precursor(), 0..3),
    )
        .prop_map(move |(ms_level, rt, injection, centroid, mobility, peaks, precursors)| {
            let (mz, intensity): (Vec<f64>, Vec<f32>) = peaks.into_iter().unzip();
            let mut builder = SpectralRecordBuilder::new(format!("scan={}", index + 1), ms_level)
                .centroid(centroid)
                .peaks(mz, intensity);
            if let Some(mobility) = mobility {
                builder = builder.inverse_ion_mobility(mobility);
            }
            if let Some(rt) = rt {
                builder = builder.scan_start_time(rt);
            }
            if let Some(injection) = injection {
                builder = builder.ion_injection_time(injection);
            }
            if ms_level > 1 {
                builder = builder.precursors(precursors);
            }
            builder.build().unwrap()
        })
}

/// A run of up to `max_len` scans with unique ids
pub fn run(max_len: usize) -> impl Strategy<Value = Vec<SpectralRecord>> {
    (0..=max_len).prop_flat_map(|len| (0..len).map(record).collect::<Vec<_>>())
}
