use super::*;
use crate::error::ErrorKind;
use crate::mzml::options::{OnError, SourceOptions};
use std::io::Cursor;

const MZ_100_200_F64: &str = "AAAAAAAAWUAAAAAAAABpQA==";
const INT_100_200_F32: &str = "AADIQgAASEM=";

fn spectrum_xml(index: usize, id: &str, ms_level: u8, mz_b64: &str, int_b64: &str) -> String {
    format!(
        r#"      <spectrum index="{index}" id="{id}" defaultArrayLength="2">
        <cvParam cvRef="MS" accession="MS:1000511" name="ms level" value="{ms_level}"/>
        <binaryDataArrayList count="2">
          <binaryDataArray encodedLength="24">
            <cvParam cvRef="MS" accession="MS:1000523" name="64-bit float"/>
            <cvParam cvRef="MS" accession="MS:1000576" name="no compression"/>
            <cvParam cvRef="MS" accession="MS:1000514" name="m/z array"/>
            <binary>{mz_b64}</binary>
          </binaryDataArray>
          <binaryDataArray encodedLength="12">
            <cvParam cvRef="MS" accession="MS:1000521" name="32-bit float"/>
            <cvParam cvRef="MS" accession="MS:1000576" name="no compression"/>
            <cvParam cvRef="MS" accession="MS:1000515" name="intensity array"/>
            <binary>{int_b64}</binary>
          </binaryDataArray>
        </binaryDataArrayList>
      </spectrum>
"#
    )
}

fn document(spectra: &[String]) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<mzML xmlns="http://psi.hupo.org/ms/mzml" version="1.1.0">
  <run id="test_run">
    <spectrumList count="{}">
{}    </spectrumList>
  </run>
</mzML>"#,
        spectra.len(),
        spectra.concat()
    )
}

fn streamer(xml: &str) -> MzMLStreamer<Cursor<Vec<u8>>> {
    MzMLStreamer::new(Cursor::new(xml.as_bytes().to_vec())).unwrap()
}

const MINIMAL_MZML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<mzML xmlns="http://psi.hupo.org/ms/mzml" version="1.1.0">
  <run id="test_run">
    <spectrumList count="2">
      <spectrum index="0" id="scan=1" defaultArrayLength="2">
        <cvParam cvRef="MS" accession="MS:1000511" name="ms level" value="1"/>
        <cvParam cvRef="MS" accession="MS:1000285" name="total ion current" value="300.0"/>
        <scanList count="1">
          <scan>
            <cvParam cvRef="MS" accession="MS:1000016" name="scan start time" value="1.5" unitCvRef="UO" unitAccession="UO:0000031" unitName="minute"/>
            <cvParam cvRef="MS" accession="MS:1000927" name="ion injection time" value="25.0" unitCvRef="UO" unitAccession="UO:0000028" unitName="millisecond"/>
          </scan>
        </scanList>
        <binaryDataArrayList count="2">
          <binaryDataArray>
            <cvParam cvRef="MS" accession="MS:1000523" name="64-bit float"/>
            <cvParam cvRef="MS" accession="MS:1000576" name="no compression"/>
            <cvParam cvRef="MS" accession="MS:1000514" name="m/z array"/>
            <binary>AAAAAAAAWUAAAAAAAABpQA==</binary>
          </binaryDataArray>
          <binaryDataArray>
            <cvParam cvRef="MS" accession="MS:1000521" name="32-bit float"/>
            <cvParam cvRef="MS" accession="MS:1000576" name="no compression"/>
            <cvParam cvRef="MS" accession="MS:1000515" name="intensity array"/>
            <binary>AADIQgAASEM=</binary>
          </binaryDataArray>
        </binaryDataArrayList>
      </spectrum>
      <spectrum index="1" id="scan=2" defaultArrayLength="2">
        <cvParam cvRef="MS" accession="MS:1000511" name="ms level" value="2"/>
        <scanList count="1">
          <scan>
            <cvParam cvRef="MS" accession="MS:1000016" name="scan start time" value="91.0" unitCvRef="UO" unitAccession="UO:0000010" unitName="second"/>
          </scan>
        </scanList>
        <precursorList count="1">
          <precursor spectrumRef="scan=1">
            <isolationWindow>
              <cvParam cvRef="MS" accession="MS:1000827" name="isolation window target m/z" value="534.5"/>
              <cvParam cvRef="MS" accession="MS:1000828" name="isolation window lower offset" value="0.8"/>
              <cvParam cvRef="MS" accession="MS:1000829" name="isolation window upper offset" value="0.8"/>
            </isolationWindow>
            <selectedIonList count="1">
              <selectedIon>
                <cvParam cvRef="MS" accession="MS:1000744" name="selected ion m/z" value="534.51"/>
                <cvParam cvRef="MS" accession="MS:1000041" name="charge state" value="2"/>
                <cvParam cvRef="MS" accession="MS:1000042" name="peak intensity" value="15000.0"/>
              </selectedIon>
            </selectedIonList>
            <activation>
              <cvParam cvRef="MS" accession="MS:1000422" name="beam-type collision-induced dissociation"/>
              <cvParam cvRef="MS" accession="MS:1000045" name="collision energy" value="30.0"/>
            </activation>
          </precursor>
        </precursorList>
        <binaryDataArrayList count="2">
          <binaryDataArray>
            <cvParam cvRef="MS" accession="MS:1000523" name="64-bit float"/>
            <cvParam cvRef="MS" accession="MS:1000574" name="zlib compression"/>
            <cvParam cvRef="MS" accession="MS:1000514" name="m/z array"/>
            <binary>eJxjYACBSAcwxZDpAAAG3AFD</binary>
          </binaryDataArray>
          <binaryDataArray>
            <cvParam cvRef="MS" accession="MS:1000521" name="32-bit float"/>
            <cvParam cvRef="MS" accession="MS:1000574" name="zlib compression"/>
            <cvParam cvRef="MS" accession="MS:1000515" name="intensity array"/>
            <binary>eJxjYDjhxMDg4QwABtUBlg==</binary>
          </binaryDataArray>
        </binaryDataArrayList>
      </spectrum>
    </spectrumList>
  </run>
</mzML>"#;

#[test]
fn test_parse_minimal_mzml() {
    let mut streamer = streamer(MINIMAL_MZML);

    let metadata = streamer.read_metadata().unwrap().clone();
    assert_eq!(metadata.version.as_deref(), Some("1.1.0"));
    assert_eq!(metadata.run_id.as_deref(), Some("test_run"));
    assert_eq!(metadata.spectrum_count, Some(2));

    let ms1 = streamer.next_spectrum().unwrap().unwrap();
    assert_eq!(ms1.scan_id(), "scan=1");
    assert_eq!(ms1.ms_level(), 1);
    assert_eq!(ms1.mz(), &[100.0, 200.0]);
    assert_eq!(ms1.intensity(), &[100.0, 200.0]);
    assert_eq!(ms1.total_ion_current(), Some(300.0));
    assert_eq!(ms1.ion_injection_time(), Some(25.0));
    // minutes are normalised to seconds
    assert!((ms1.scan_start_time().unwrap() - 90.0).abs() < 1e-4);
    assert!(ms1.precursors().is_empty());

    let ms2 = streamer.next_spectrum().unwrap().unwrap();
    assert_eq!(ms2.scan_id(), "scan=2");
    assert_eq!(ms2.ms_level(), 2);
    assert_eq!(ms2.mz(), &[100.0, 200.0]);
    assert_eq!(ms2.intensity(), &[100.0, 200.0]);
    assert_eq!(ms2.scan_start_time(), Some(91.0));

    let precursor = &ms2.precursors()[0];
    assert_eq!(precursor.selected_ion_mz, 534.51);
    assert_eq!(precursor.selected_ion_charge, Some(2));
    assert_eq!(precursor.selected_ion_intensity, Some(15000.0));
    assert_eq!(precursor.isolation_window_target, Some(534.5));
    assert_eq!(precursor.isolation_window_lower, Some(0.8));
    assert_eq!(precursor.isolation_window_upper, Some(0.8));
    assert_eq!(precursor.spectrum_ref.as_deref(), Some("scan=1"));

    assert!(streamer.next_spectrum().unwrap().is_none());
    assert_eq!(streamer.spectra_read(), 2);
}

#[test]
fn test_indexed_wrapper_is_transparent() {
    let inner = document(&[spectrum_xml(0, "scan=1", 1, MZ_100_200_F64, INT_100_200_F32)]);
    let body = inner.trim_start_matches(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    let xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<indexedmzML xmlns="http://psi.hupo.org/ms/mzml">{}
  <indexList count="1"><index name="spectrum"><offset idRef="scan=1">0</offset></index></indexList>
</indexedmzML>"#,
        body
    );

    let records: Vec<_> = streamer(&xml)
        .scans(SourceOptions::default())
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(records.len(), 1);
}

#[test]
fn test_empty_spectrum_list() {
    let xml = document(&[]);
    let mut streamer = streamer(&xml);
    assert!(streamer.next_spectrum().unwrap().is_none());
    assert_eq!(streamer.spectrum_count(), Some(0));
}

#[test]
fn test_zero_peak_scan_without_arrays() {
    let xml = document(&[r#"      <spectrum index="0" id="scan=1" defaultArrayLength="0">
        <cvParam cvRef="MS" accession="MS:1000511" name="ms level" value="1"/>
      </spectrum>
"#
    .to_string()]);

    let record = streamer(&xml).next_spectrum().unwrap().unwrap();
    assert_eq!(record.peak_count(), 0);
}

#[test]
fn test_malformed_scan_aborts_by_default() {
    let xml = document(&[
        spectrum_xml(0, "scan=1", 1, MZ_100_200_F64, INT_100_200_F32),
        spectrum_xml(1, "scan=2", 1, "%%%not-base64%%%", INT_100_200_F32),
        spectrum_xml(2, "scan=3", 1, MZ_100_200_F64, INT_100_200_F32),
    ]);

    let mut scans = streamer(&xml).scans(SourceOptions::default());
    assert!(scans.next().unwrap().is_ok());

    let err = scans.next().unwrap().unwrap_err();
    match &err {
        MzMLError::MalformedSpectrum { index, id, reason } => {
            assert_eq!(*index, 1);
            assert_eq!(id, "scan=2");
            assert!(reason.contains("m/z array"), "reason: {reason}");
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert_eq!(err.kind(), ErrorKind::MalformedInput);

    // fused after the first error
    assert!(scans.next().is_none());
}

#[test]
fn test_malformed_scan_skipped_under_skip() {
    let xml = document(&[
        spectrum_xml(0, "scan=1", 1, MZ_100_200_F64, INT_100_200_F32),
        spectrum_xml(1, "scan=2", 1, "%%%not-base64%%%", INT_100_200_F32),
        spectrum_xml(2, "scan=3", 1, MZ_100_200_F64, INT_100_200_F32),
    ]);

    let mut scans = streamer(&xml).scans(SourceOptions {
        on_error: OnError::Skip,
        ..Default::default()
    });
    let ids: Vec<String> = scans
        .by_ref()
        .map(|r| r.map(|rec| rec.scan_id().to_string()))
        .collect::<Result<_, _>>()
        .unwrap();

    assert_eq!(ids, vec!["scan=1", "scan=3"]);
    assert_eq!(scans.skipped(), 1);
}

#[test]
fn test_missing_fields_are_malformed() {
    // missing id
    let no_id = spectrum_xml(0, "", 1, MZ_100_200_F64, INT_100_200_F32);
    let err = streamer(&document(&[no_id])).next_spectrum().unwrap_err();
    assert!(matches!(
        err,
        MzMLError::MalformedSpectrum { ref reason, .. } if reason.contains("id")
    ));

    // missing ms level
    let no_level = spectrum_xml(0, "scan=1", 1, MZ_100_200_F64, INT_100_200_F32)
        .replace(r#"<cvParam cvRef="MS" accession="MS:1000511" name="ms level" value="1"/>"#, "");
    let err = streamer(&document(&[no_level])).next_spectrum().unwrap_err();
    assert!(matches!(
        err,
        MzMLError::MalformedSpectrum { ref reason, .. } if reason.contains("ms level")
    ));

    // declared peaks but no intensity array
    let no_intensity = spectrum_xml(0, "scan=1", 1, MZ_100_200_F64, INT_100_200_F32)
        .replace("MS:1000515", "MS:1000516");
    let err = streamer(&document(&[no_intensity])).next_spectrum().unwrap_err();
    assert!(matches!(
        err,
        MzMLError::MalformedSpectrum { ref reason, .. } if reason.contains("intensity")
    ));
}

#[test]
fn test_array_length_mismatch_is_malformed() {
    let short = spectrum_xml(0, "scan=1", 1, MZ_100_200_F64, INT_100_200_F32)
        .replace(r#"defaultArrayLength="2""#, r#"defaultArrayLength="3""#);
    let err = streamer(&document(&[short])).next_spectrum().unwrap_err();
    assert!(err.is_skippable());
}

#[test]
fn test_ms1_precursor_policy() {
    let xml = MINIMAL_MZML.replace(
        r#"<cvParam cvRef="MS" accession="MS:1000511" name="ms level" value="2"/>"#,
        r#"<cvParam cvRef="MS" accession="MS:1000511" name="ms level" value="1"/>"#,
    );

    let strict: Vec<_> = streamer(&xml).scans(SourceOptions::default()).collect();
    assert_eq!(strict.len(), 2);
    assert!(matches!(strict[1], Err(MzMLError::MalformedSpectrum { .. })));

    let permissive: Vec<_> = streamer(&xml)
        .scans(SourceOptions {
            precursor_policy: crate::record::PrecursorPolicy::Permissive,
            ..Default::default()
        })
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(permissive[1].precursors().len(), 1);
}

#[test]
fn test_truncated_document_is_not_skippable() {
    let full = document(&[spectrum_xml(0, "scan=1", 1, MZ_100_200_F64, INT_100_200_F32)]);
    let cut = &full[..full.find("</binaryDataArrayList>").unwrap()];

    let results: Vec<_> = streamer(cut)
        .scans(SourceOptions {
            on_error: OnError::Skip,
            ..Default::default()
        })
        .collect();
    assert_eq!(results.len(), 1);
    let err = results[0].as_ref().unwrap_err();
    assert!(!err.is_skippable());
}

#[test]
fn test_oversized_declared_length_is_skippable() {
    let xml = MINIMAL_MZML.replace(
        r#"id="scan=2" defaultArrayLength="2""#,
        r#"id="scan=2" defaultArrayLength="4611686018427387904""#,
    );

    let mut scans = streamer(&xml).scans(SourceOptions {
        on_error: OnError::Skip,
        ..Default::default()
    });
    let records: Vec<_> = scans.by_ref().collect::<Result<_, _>>().unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].scan_id(), "scan=1");
    assert_eq!(scans.skipped(), 1);
}

#[test]
fn test_isolation_window_without_selected_ion_is_malformed() {
    let start = MINIMAL_MZML.find("<selectedIonList").unwrap();
    let end = MINIMAL_MZML.find("</selectedIonList>").unwrap() + "</selectedIonList>".len();
    let xml = format!("{}{}", &MINIMAL_MZML[..start], &MINIMAL_MZML[end..]);

    let mut streamer = streamer(&xml);
    assert!(streamer.next_spectrum().unwrap().is_some());
    let err = streamer.next_spectrum().unwrap_err();
    match &err {
        MzMLError::MalformedSpectrum { id, reason, .. } => {
            assert_eq!(id, "scan=2");
            assert!(reason.contains("selected ion m/z"), "reason: {reason}");
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert!(err.is_skippable());
}

#[test]
fn test_centroid_and_ion_mobility_terms() {
    let xml = MINIMAL_MZML
        .replace(
            r#"<cvParam cvRef="MS" accession="MS:1000511" name="ms level" value="1"/>"#,
            r#"<cvParam cvRef="MS" accession="MS:1000511" name="ms level" value="1"/>
        <cvParam cvRef="MS" accession="MS:1000128" name="profile spectrum"/>"#,
        )
        .replace(
            r#"<cvParam cvRef="MS" accession="MS:1000511" name="ms level" value="2"/>"#,
            r#"<cvParam cvRef="MS" accession="MS:1000511" name="ms level" value="2"/>
        <cvParam cvRef="MS" accession="MS:1000127" name="centroid spectrum"/>"#,
        )
        .replace(
            r#"value="91.0" unitCvRef="UO" unitAccession="UO:0000010" unitName="second"/>"#,
            r#"value="91.0" unitCvRef="UO" unitAccession="UO:0000010" unitName="second"/>
            <cvParam cvRef="MS" accession="MS:1002815" name="inverse reduced ion mobility" value="0.875" unitCvRef="MS" unitAccession="MS:1002814" unitName="volt-second per square centimeter"/>"#,
        );

    let mut streamer = streamer(&xml);
    let ms1 = streamer.next_spectrum().unwrap().unwrap();
    assert!(!ms1.centroid());
    assert_eq!(ms1.inverse_ion_mobility(), None);

    let ms2 = streamer.next_spectrum().unwrap().unwrap();
    assert!(ms2.centroid());
    assert_eq!(ms2.inverse_ion_mobility(), Some(0.875));
}
