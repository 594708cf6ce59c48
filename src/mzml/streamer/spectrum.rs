use std::io::BufRead;

use quick_xml::events::{BytesStart, Event};

use super::helpers::{get_attribute, parse_cv_param};
use super::{MzMLError, MzMLStreamer};
use crate::mzml::cv_params::{normalize_retention_time, CvParam, MS_CV_ACCESSIONS};
use crate::mzml::models::{RawBinaryArray, RawPrecursor, RawScan};
use crate::record::SpectralRecord;

/// Where inside a `<spectrum>` element the parser currently is
#[derive(Default)]
struct ScanContext {
    in_scan_list: bool,
    in_isolation_window: bool,
    in_selected_ion: bool,
    in_binary: bool,
    current_precursor: Option<RawPrecursor>,
    current_array: Option<RawBinaryArray>,
}

impl<R: BufRead> MzMLStreamer<R> {
    /// Read and decode the next scan.
    ///
    /// A decode failure is returned as [`MzMLError::MalformedSpectrum`] after the
    /// whole element has been consumed, so the next call continues with the
    /// following scan.
    pub fn next_spectrum(&mut self) -> Result<Option<SpectralRecord>, MzMLError> {
        match self.next_raw_scan()? {
            Some(raw) => raw.decode(self.precursor_policy).map(Some),
            None => Ok(None),
        }
    }

    /// Read the next scan from the stream WITHOUT decoding binary data
    pub fn next_raw_scan(&mut self) -> Result<Option<RawScan>, MzMLError> {
        if !self.metadata_read {
            self.read_metadata()?;
        }
        if !self.in_spectrum_list {
            return Ok(None);
        }

        let mut buf = Vec::new();
        loop {
            match self.reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => {
                    if e.name().as_ref() == b"spectrum" {
                        let scan = self.parse_raw_scan(e, false)?;
                        return Ok(Some(scan));
                    }
                }
                Ok(Event::Empty(ref e)) => {
                    if e.name().as_ref() == b"spectrum" {
                        let scan = self.parse_raw_scan(e, true)?;
                        return Ok(Some(scan));
                    }
                }
                Ok(Event::End(ref e)) => {
                    if e.name().as_ref() == b"spectrumList" {
                        self.in_spectrum_list = false;
                        return Ok(None);
                    }
                }
                Ok(Event::Eof) => {
                    return Err(MzMLError::InvalidStructure(
                        "Unexpected EOF in spectrumList".to_string(),
                    ));
                }
                Err(e) => return Err(MzMLError::XmlError(e)),
                _ => {}
            }
            buf.clear();
        }
    }

    /// Consume a `<spectrum>` element up to its end tag
    fn parse_raw_scan(
        &mut self,
        start_event: &BytesStart,
        empty: bool,
    ) -> Result<RawScan, MzMLError> {
        let index = self.current_spectrum_index;
        self.current_spectrum_index += 1;

        let mut scan = RawScan {
            index,
            id: get_attribute(start_event, "id")?,
            default_array_length: get_attribute(start_event, "defaultArrayLength")?
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(0),
            ..Default::default()
        };
        if empty {
            return Ok(scan);
        }

        let mut depth = 1;
        let mut ctx = ScanContext::default();
        let mut buf = Vec::new();

        loop {
            match self.reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => {
                    depth += 1;
                    match e.name().as_ref() {
                        b"cvParam" => {
                            let cv_param = parse_cv_param(e)?;
                            Self::apply_cv_param(&mut scan, &mut ctx, cv_param);
                        }
                        b"scanList" => ctx.in_scan_list = true,
                        b"precursor" => {
                            ctx.current_precursor = Some(RawPrecursor {
                                spectrum_ref: get_attribute(e, "spectrumRef")?,
                                ..Default::default()
                            });
                        }
                        b"isolationWindow" => ctx.in_isolation_window = true,
                        b"selectedIon" => ctx.in_selected_ion = true,
                        b"binaryDataArray" => {
                            ctx.current_array = Some(RawBinaryArray {
                                array_length: get_attribute(e, "arrayLength")?
                                    .and_then(|s| s.trim().parse().ok()),
                                ..Default::default()
                            });
                        }
                        b"binary" => ctx.in_binary = true,
                        _ => {}
                    }
                }
                Ok(Event::Empty(ref e)) => {
                    if e.name().as_ref() == b"cvParam" {
                        let cv_param = parse_cv_param(e)?;
                        Self::apply_cv_param(&mut scan, &mut ctx, cv_param);
                    }
                }
                Ok(Event::Text(ref t)) => {
                    if ctx.in_binary {
                        if let Some(ref mut array) = ctx.current_array {
                            array.base64_data.push_str(&t.unescape()?);
                        }
                    }
                }
                Ok(Event::End(ref e)) => {
                    depth -= 1;
                    match e.name().as_ref() {
                        b"spectrum" => {
                            if depth == 0 {
                                break;
                            }
                        }
                        b"scanList" => ctx.in_scan_list = false,
                        b"precursor" => {
                            if let Some(prec) = ctx.current_precursor.take() {
                                scan.precursors.push(prec);
                            }
                        }
                        b"isolationWindow" => ctx.in_isolation_window = false,
                        b"selectedIon" => ctx.in_selected_ion = false,
                        b"binaryDataArray" => {
                            if let Some(array) = ctx.current_array.take() {
                                scan.arrays.push(array);
                            }
                        }
                        b"binary" => ctx.in_binary = false,
                        _ => {}
                    }
                }
                Ok(Event::Eof) => {
                    return Err(MzMLError::InvalidStructure(
                        "Unexpected EOF in spectrum".to_string(),
                    ));
                }
                Err(e) => return Err(MzMLError::XmlError(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(scan)
    }

    /// Route a cvParam to the element it describes
    fn apply_cv_param(scan: &mut RawScan, ctx: &mut ScanContext, cv: CvParam) {
        if let Some(ref mut array) = ctx.current_array {
            array.push_cv_param(cv);
        } else if let Some(ref mut prec) = ctx.current_precursor {
            if ctx.in_isolation_window {
                Self::apply_isolation_cv_param(prec, &cv);
            } else if ctx.in_selected_ion {
                Self::apply_selected_ion_cv_param(prec, &cv);
            }
        } else if ctx.in_scan_list {
            Self::apply_scan_cv_param(scan, &cv);
        } else {
            Self::apply_spectrum_cv_param(scan, &cv);
        }
    }

    /// Apply a spectrum-level CV parameter
    fn apply_spectrum_cv_param(scan: &mut RawScan, cv: &CvParam) {
        match cv.accession.as_str() {
            MS_CV_ACCESSIONS::MS_LEVEL => {
                scan.ms_level = cv.value_as_i64();
            }
            MS_CV_ACCESSIONS::TOTAL_ION_CURRENT => {
                scan.total_ion_current = cv.value_as_f64();
            }
            MS_CV_ACCESSIONS::CENTROID_SPECTRUM => {
                scan.centroid = true;
            }
            MS_CV_ACCESSIONS::PROFILE_SPECTRUM => {
                scan.centroid = false;
            }
            _ => {}
        }
    }

    /// Apply a scan-level CV parameter
    fn apply_scan_cv_param(scan: &mut RawScan, cv: &CvParam) {
        match cv.accession.as_str() {
            MS_CV_ACCESSIONS::SCAN_START_TIME => {
                if let Some(val) = cv.value_as_f64() {
                    scan.scan_start_time =
                        Some(normalize_retention_time(val, cv.unit_accession.as_deref()));
                }
            }
            MS_CV_ACCESSIONS::ION_INJECTION_TIME => {
                scan.ion_injection_time = cv.value_as_f64();
            }
            MS_CV_ACCESSIONS::INVERSE_REDUCED_ION_MOBILITY => {
                scan.inverse_ion_mobility = cv.value_as_f64();
            }
            _ => Self::apply_spectrum_cv_param(scan, cv),
        }
    }

    /// Apply a CV parameter inside `<isolationWindow>`
    fn apply_isolation_cv_param(prec: &mut RawPrecursor, cv: &CvParam) {
        match cv.accession.as_str() {
            MS_CV_ACCESSIONS::ISOLATION_WINDOW_TARGET => {
                prec.isolation_window_target = cv.value_as_f64();
            }
            MS_CV_ACCESSIONS::ISOLATION_WINDOW_LOWER => {
                prec.isolation_window_lower = cv.value_as_f64();
            }
            MS_CV_ACCESSIONS::ISOLATION_WINDOW_UPPER => {
                prec.isolation_window_upper = cv.value_as_f64();
            }
            _ => {}
        }
    }

    /// Apply a CV parameter inside `<selectedIon>`; the first selected ion wins
    fn apply_selected_ion_cv_param(prec: &mut RawPrecursor, cv: &CvParam) {
        match cv.accession.as_str() {
            MS_CV_ACCESSIONS::SELECTED_ION_MZ if prec.selected_ion_mz.is_none() => {
                prec.selected_ion_mz = cv.value_as_f64();
            }
            MS_CV_ACCESSIONS::CHARGE_STATE if prec.selected_ion_charge.is_none() => {
                prec.selected_ion_charge = cv.value_as_i64();
            }
            MS_CV_ACCESSIONS::PEAK_INTENSITY if prec.selected_ion_intensity.is_none() => {
                prec.selected_ion_intensity = cv.value_as_f64();
            }
            _ => {}
        }
    }
}
