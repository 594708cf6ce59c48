//! # Predicate Queries
//!
//! Scan-level filtering of mzParquet containers:
//!
//! ```text
//! SELECT scan_id WHERE <nested-range-predicate> AND <scalar-predicate>
//! ```
//!
//! A [`Predicate`] is bound against the container schema before anything is
//! decoded, so a misspelled column fails with
//! [`ReaderError::SchemaMismatch`](crate::reader::ReaderError::SchemaMismatch)
//! instead of returning nothing.
//!
//! ## Semantics
//!
//! Ranges are closed on both ends. NaN and null values never match.
//!
//! - **Wide layout**: every conjunct is evaluated per row (one row per scan)
//!   and the predicate runs as a Parquet row filter, so projected columns of
//!   non-matching rows are never materialised.
//! - **Long layout**: every conjunct is evaluated per physical row, OR-ed over
//!   the rows of each scan and the per-conjunct results AND-ed. Both layouts
//!   therefore return the same scan ids.
//!
//! Only `scan_id` and the leaf columns a predicate references are decoded.

mod bind;
mod cancel;
mod eval;
mod execute;
mod predicate;


pub use bind::BoundPredicate;
pub use cancel::CancellationToken;
pub use execute::Query;
pub use predicate::{Predicate, Range, Scalar, ValueRef};
