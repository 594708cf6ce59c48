//! # mzParquet Converter
//!
//! A command-line tool for converting mzML to mzParquet containers and for
//! querying them.
//!
//! ## Usage
//!
//! ```bash
//! # Convert mzML to the long layout (run.mzparquet)
//! mzparquet convert run.mzML
//!
//! # Convert to the wide layout, skipping malformed scans
//! mzparquet convert run.mzML --layout wide --on-error skip
//!
//! # Scans with a peak in [267.0, 267.1] at MS level 2
//! mzparquet query run.mzparquetW --mz 267.0 267.1 --ms-level 2
//!
//! # Footer metadata and summary
//! mzparquet info run.mzparquet
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
