use std::collections::HashSet;

use arrow::array::{Array, BooleanArray};
use arrow::error::ArrowError;
use log::debug;
use parquet::arrow::arrow_reader::{ArrowPredicateFn, ParquetRecordBatchReaderBuilder, RowFilter};
use parquet::arrow::ProjectionMask;

use crate::reader::utils::get_string_column;
use crate::reader::{MzParquetReader, ReaderError, RecordBatchIterator, SourceChunk};
use crate::record::SpectralRecord;
use crate::schema::{columns, Layout};

use super::bind::BoundPredicate;
use super::cancel::CancellationToken;
use super::predicate::Predicate;

fn to_arrow(err: ReaderError) -> ArrowError {
    match err {
        ReaderError::ArrowError(err) => err,
        other => ArrowError::ExternalError(Box::new(other)),
    }
}

/// Scan group of the long layout whose rows may continue in the next batch
struct OpenGroup {
    scan_id: String,
    hits: Vec<bool>,
}

impl OpenGroup {
    fn matched(&self) -> bool {
        self.hits.iter().all(|hit| *hit)
    }
}

/// A predicate query over one container
pub struct Query<'r> {
    reader: &'r MzParquetReader,
    predicate: Predicate,
    token: Option<CancellationToken>,
}

impl MzParquetReader {
    /// Start a query. Nothing is read until the query is executed.
    ///
    /// ```rust,no_run
    /// use mzparquet::query::Predicate;
    /// use mzparquet::reader::MzParquetReader;
    ///
    /// let reader = MzParquetReader::open("run.mzparquetW")?;
    /// let ids = reader
    ///     .query(Predicate::mz_between(267.0, 267.1).and(Predicate::ms_level(2)))
    ///     .scan_ids()?;
    /// println!("{} matching scans", ids.len());
    /// # Ok::<(), mzparquet::reader::ReaderError>(())
    /// ```
    pub fn query(&self, predicate: Predicate) -> Query<'_> {
        Query {
            reader: self,
            predicate,
            token: None,
        }
    }
}

impl<'r> Query<'r> {
    /// Check `token` between record batches
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.token = Some(token);
        self
    }

    fn check_cancelled(&self) -> Result<(), ReaderError> {
        match &self.token {
            Some(token) => token.check(),
            None => Ok(()),
        }
    }

    fn bind(&self) -> Result<BoundPredicate, ReaderError> {
        self.check_cancelled()?;
        let bound = self
            .predicate
            .bind(&self.reader.schema(), self.reader.layout())?;
        debug!("Executing query {} on {} layout", self.predicate, bound.layout());
        Ok(bound)
    }

    fn scan_id_mask(&self) -> Result<ProjectionMask, ReaderError> {
        self.reader.column_mask(&[columns::SCAN_ID])
    }

    /// Install `bound` as a Parquet row filter so that non-matching rows are
    /// never materialised in the output projection
    fn with_row_filter(
        builder: ParquetRecordBatchReaderBuilder<SourceChunk>,
        bound: BoundPredicate,
    ) -> ParquetRecordBatchReaderBuilder<SourceChunk> {
        if bound.is_trivial() {
            return builder;
        }
        let mask = bound.leaf_mask(builder.parquet_schema(), false);
        let predicate = ArrowPredicateFn::new(mask, move |batch| {
            bound.evaluate_rows(&batch).map_err(to_arrow)
        });
        builder.with_row_filter(RowFilter::new(vec![Box::new(predicate)]))
    }

    /// Ids of the matching scans, in physical order
    pub fn scan_ids(&self) -> Result<Vec<String>, ReaderError> {
        let bound = self.bind()?;
        match bound.layout() {
            Layout::Wide => self.wide_scan_ids(bound),
            Layout::Long => self.long_scan_ids(&bound),
        }
    }

    /// Number of matching scans
    pub fn count(&self) -> Result<usize, ReaderError> {
        Ok(self.scan_ids()?.len())
    }

    fn wide_scan_ids(&self, bound: BoundPredicate) -> Result<Vec<String>, ReaderError> {
        let builder = self
            .reader
            .builder()?
            .with_projection(self.scan_id_mask()?);
        let reader = Self::with_row_filter(builder, bound).build()?;

        let mut ids = Vec::new();
        for batch in RecordBatchIterator::new(reader) {
            self.check_cancelled()?;
            let batch = batch?;
            let scan_ids = get_string_column(&batch, columns::SCAN_ID)?;
            ids.extend(scan_ids.iter().flatten().map(str::to_string));
        }
        self.check_cancelled()?;
        Ok(ids)
    }

    /// Evaluate per physical row, OR within each contiguous scan group and
    /// AND across conjuncts
    fn long_scan_ids(&self, bound: &BoundPredicate) -> Result<Vec<String>, ReaderError> {
        let builder = self.reader.builder()?;
        let mask = bound.leaf_mask(builder.parquet_schema(), true);
        let reader = builder.with_projection(mask).build()?;

        let conjuncts = bound.conjuncts.len();
        let mut ids = Vec::new();
        let mut open: Option<OpenGroup> = None;

        for batch in RecordBatchIterator::new(reader) {
            self.check_cancelled()?;
            let batch = batch?;
            let scan_ids = get_string_column(&batch, columns::SCAN_ID)?;
            let results: Vec<BooleanArray> = bound.evaluate_conjuncts(&batch)?;

            for row in 0..batch.num_rows() {
                if scan_ids.is_null(row) {
                    return Err(ReaderError::InvalidFormat(format!(
                        "row {row}: null {}",
                        columns::SCAN_ID
                    )));
                }
                let scan_id = scan_ids.value(row);
                let same = matches!(&open, Some(group) if group.scan_id == scan_id);
                if !same {
                    if let Some(group) = open.take() {
                        if group.matched() {
                            ids.push(group.scan_id);
                        }
                    }
                    open = Some(OpenGroup {
                        scan_id: scan_id.to_string(),
                        hits: vec![false; conjuncts],
                    });
                }
                if let Some(group) = open.as_mut() {
                    for (hit, result) in group.hits.iter_mut().zip(&results) {
                        *hit |= result.value(row);
                    }
                }
            }
        }

        if let Some(group) = open.take() {
            if group.matched() {
                ids.push(group.scan_id);
            }
        }
        self.check_cancelled()?;
        Ok(ids)
    }

    /// Full records of the matching scans, in physical order
    pub fn records(&self) -> Result<Vec<SpectralRecord>, ReaderError> {
        let bound = self.bind()?;
        let builder = self.reader.builder()?;

        let builder = match bound.layout() {
            Layout::Wide => Self::with_row_filter(builder, bound),
            Layout::Long => {
                // a long row alone cannot decide its scan: resolve ids first
                let matched: HashSet<String> = self.long_scan_ids(&bound)?.into_iter().collect();
                let mask = self.scan_id_mask()?;
                let predicate = ArrowPredicateFn::new(mask, move |batch| {
                    let scan_ids =
                        get_string_column(&batch, columns::SCAN_ID).map_err(to_arrow)?;
                    Ok(scan_ids
                        .iter()
                        .map(|id| Some(id.is_some_and(|id| matched.contains(id))))
                        .collect())
                });
                builder.with_row_filter(RowFilter::new(vec![Box::new(predicate)]))
            }
        };

        let batches = RecordBatchIterator::new(builder.build()?);
        let mut records = Vec::new();
        for record in self.reader.records_from(batches) {
            self.check_cancelled()?;
            records.push(record?);
        }
        self.check_cancelled()?;
        Ok(records)
    }
}
