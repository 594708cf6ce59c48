use anyhow::{Context, Result};
use clap::Args;
use log::info;
use std::path::PathBuf;

use mzparquet::query::Predicate;
use mzparquet::reader::MzParquetReader;

#[derive(Args)]
pub struct QueryArgs {
    /// Container path
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Any peak m/z in [LO, HI]
    #[arg(long, num_args = 2, value_names = ["LO", "HI"], allow_negative_numbers = true)]
    mz: Option<Vec<f64>>,

    /// Any precursor selected-ion m/z in [LO, HI]
    #[arg(long, num_args = 2, value_names = ["LO", "HI"], allow_negative_numbers = true)]
    precursor_mz: Option<Vec<f64>>,

    /// MS level equal to N
    #[arg(long, value_name = "N")]
    ms_level: Option<i64>,

    /// Print the number of matching scans instead of their ids
    #[arg(long)]
    count: bool,
}

fn range(flag: &str, values: &[f64]) -> Result<(f64, f64)> {
    match values {
        [lo, hi] => Ok((*lo, *hi)),
        _ => anyhow::bail!("--{} takes exactly two values", flag),
    }
}

/// Conjunction of the given filters; no filter matches every scan
fn build_predicate(args: &QueryArgs) -> Result<Predicate> {
    let mut predicate = Predicate::And(Vec::new());
    if let Some(values) = &args.mz {
        let (lo, hi) = range("mz", values)?;
        predicate = predicate.and(Predicate::mz_between(lo, hi));
    }
    if let Some(values) = &args.precursor_mz {
        let (lo, hi) = range("precursor-mz", values)?;
        predicate = predicate.and(Predicate::precursor_mz_between(lo, hi));
    }
    if let Some(level) = args.ms_level {
        predicate = predicate.and(Predicate::ms_level(level));
    }
    Ok(predicate)
}

/// Print the scans of a container that match the given filters
pub fn run(args: QueryArgs) -> Result<()> {
    let predicate = build_predicate(&args)?;
    let reader = MzParquetReader::open(&args.file)
        .with_context(|| format!("Failed to open {}", args.file.display()))?;

    info!(
        "Querying {} container {} for {}",
        reader.layout(),
        args.file.display(),
        predicate
    );

    let query = reader.query(predicate);
    if args.count {
        let count = query.count().context("Query failed")?;
        println!("{}", count);
    } else {
        for scan_id in query.scan_ids().context("Query failed")? {
            println!("{}", scan_id);
        }
    }
    Ok(())
}
