//! # mzParquet Schema Definition
//!
//! This module defines the Apache Arrow schemas of the two container layouts.
//!
//! ## Long layout (`.mzparquet`)
//!
//! Every peak is its own row. Scan-level columns repeat on every row of a scan
//! and compress to almost nothing under dictionary and run-length encoding. A
//! scan without peaks keeps exactly one row with null `mz` and `intensity`.
//!
//! ## Wide layout (`.mzparquetW`)
//!
//! One row per scan; `mz` and `intensity` are list columns.
//!
//! ## Schema Columns
//!
//! | Column | Long | Wide | CV Term |
//! |--------|------|------|---------|
//! | scan_id | Utf8 | Utf8 | MS:1000767 |
//! | ms_level | Int16 | Int16 | MS:1000511 |
//! | scan_start_time | Float32 (nullable, s) | Float32 (nullable, s) | MS:1000016 |
//! | ion_injection_time | Float32 (nullable, ms) | Float32 (nullable, ms) | MS:1000927 |
//! | total_ion_current | Float32 (nullable) | Float32 (nullable) | MS:1000285 |
//! | mz | Float64 (nullable) | `List<Float64>` | MS:1000040 |
//! | intensity | Float32 (nullable) | `List<Float32>` | MS:1000042 |
//! | precursors | `List<Struct>` | `List<Struct>` | MS:1000441 |
//!
//! The precursor struct carries `selected_ion_mz` (required), `selected_ion_charge`,
//! `selected_ion_intensity`, `isolation_window_target`, `isolation_window_lower`,
//! `isolation_window_upper` and `spectrum_ref`.
//!
//! The layout tag and format version live in the Parquet footer key-value
//! metadata, see [`KEY_LAYOUT`] and [`KEY_FORMAT_VERSION`].

mod builders;
/// Column name constants.
pub mod columns;
mod constants;
mod footer;
mod layout;
mod validation;

#[cfg(test)]
mod tests;

pub use builders::{
    create_long_schema, create_schema, create_wide_schema, list_item_field, precursor_fields,
    precursor_item_field,
};
pub use columns::*;
pub use constants::*;
pub use footer::{footer_metadata, ConverterInfo};
pub use layout::Layout;
pub use validation::{validate_schema, SchemaValidationError};
