use anyhow::{Context, Result};
use clap::Args;
use log::info;
use std::path::{Path, PathBuf};

use mzparquet::converter::{ConversionConfig, MzMLConverter};
use mzparquet::mzml::OnError;
use mzparquet::record::PrecursorPolicy;
use mzparquet::schema::Layout;
use mzparquet::writer::CompressionType;

use super::config::{Config, ConversionSettings};
use super::profile::Profile;

#[derive(Args)]
pub struct ConvertArgs {
    /// Input mzML file paths, converted one after another
    #[arg(value_name = "INPUT", required = true, num_args = 1..)]
    inputs: Vec<PathBuf>,

    /// Output container path for a single input
    /// (defaults to <stem>.mzparquet or <stem>.mzparquetW next to the input)
    #[arg(long, value_name = "FILE", conflicts_with = "output_directory")]
    output: Option<PathBuf>,

    /// Write every container into this directory, creating it if needed
    #[arg(short = 'o', long, value_name = "DIR")]
    output_directory: Option<PathBuf>,

    /// Container layout: one row per peak (long) or per scan (wide)
    #[arg(short = 'l', long)]
    layout: Option<Layout>,

    /// What to do with malformed scans (abort or skip)
    #[arg(long)]
    on_error: Option<OnError>,

    /// Accept precursors on MS1 scans instead of rejecting the scan
    #[arg(long, conflicts_with = "strict_precursors")]
    permissive_precursors: bool,

    /// Reject scans with MS1 precursors, even if the config file permits them
    #[arg(long)]
    strict_precursors: bool,

    /// Conversion profile (fast, balanced, max-compression)
    #[arg(short = 'p', long, default_value = "balanced", value_enum)]
    profile: Profile,

    /// Load settings from a TOML config file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    // === Advanced tuning flags (hidden from --help) ===
    /// Compression level for ZSTD (1-22, default: profile-dependent)
    #[arg(short = 'c', long, hide = true)]
    compression_level: Option<i32>,

    /// Rows per Parquet row group
    #[arg(short = 'r', long, hide = true)]
    row_group_size: Option<usize>,

    /// Scans buffered per record batch
    #[arg(short = 'b', long, hide = true)]
    batch_size: Option<usize>,
}

/// Default output name next to the input: `<stem>.mzparquet` or
/// `<stem>.mzparquetW`
pub(super) fn default_output_path(input: &Path, layout: Layout) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    input.with_file_name(format!("{}.{}", stem, layout.extension()))
}

/// Output path of `input`: the explicit `--output`, a file in
/// `--output-directory`, or the default name next to the input
fn output_path(args: &ConvertArgs, input: &Path, layout: Layout) -> PathBuf {
    if let Some(output) = &args.output {
        return output.clone();
    }
    let default = default_output_path(input, layout);
    match (&args.output_directory, default.file_name()) {
        (Some(dir), Some(name)) => dir.join(name),
        _ => default,
    }
}

/// `Some` when a precursor flag was given on the command line
fn precursor_flag(args: &ConvertArgs) -> Option<bool> {
    if args.permissive_precursors {
        Some(true)
    } else if args.strict_precursors {
        Some(false)
    } else {
        None
    }
}

/// Merge flags over config file settings over the profile preset
fn build_config(args: &ConvertArgs, settings: &ConversionSettings) -> ConversionConfig {
    let layout = args.layout.or(settings.layout).unwrap_or_default();
    let on_error = args.on_error.or(settings.on_error).unwrap_or_default();

    let mut config = args
        .profile
        .conversion_config()
        .with_layout(layout)
        .with_on_error(on_error);

    let permissive = precursor_flag(args)
        .or(settings.permissive_precursors)
        .unwrap_or(false);
    if permissive {
        config = config.with_precursor_policy(PrecursorPolicy::Permissive);
    }
    if let Some(level) = args.compression_level.or(settings.compression_level) {
        config.writer_config.compression = CompressionType::Zstd(level);
    }
    if let Some(rows) = args.row_group_size.or(settings.row_group_size) {
        match layout {
            Layout::Long => config.writer_config.row_group_size = rows,
            Layout::Wide => config.writer_config.wide_row_group_size = rows,
        }
    }
    if let Some(batch_size) = args.batch_size.or(settings.batch_size) {
        config.writer_config.batch_size = batch_size;
    }
    config
}

/// Convert one or more mzML files to mzParquet containers
pub fn run(args: ConvertArgs) -> Result<()> {
    if args.output.is_some() && args.inputs.len() > 1 {
        anyhow::bail!(
            "--output names a single file but {} inputs were given; use --output-directory",
            args.inputs.len()
        );
    }
    if let Some(missing) = args.inputs.iter().find(|input| !input.exists()) {
        anyhow::bail!("Input file does not exist: {}", missing.display());
    }

    let settings = match &args.config {
        Some(path) => Config::from_file(path)?.conversion,
        None => ConversionSettings::default(),
    };
    let config = build_config(&args, &settings);

    if let Some(dir) = &args.output_directory {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Cannot create output directory {}", dir.display()))?;
    }

    info!("mzParquet Converter - mzML to mzParquet");
    info!("=======================================");
    info!("Layout: {}", config.layout);
    info!("Profile: {} ({})", args.profile, args.profile.compression());
    info!("On error: {}", config.source.on_error);
    info!(
        "Row group size: {}",
        config.writer_config.row_group_rows(config.layout)
    );
    info!("Batch size: {}", config.writer_config.batch_size);

    let converter = MzMLConverter::with_config(config);
    for input in &args.inputs {
        let output = output_path(&args, input, converter.config().layout);
        convert_one(&converter, input, &output)?;
    }
    if args.inputs.len() > 1 {
        info!("Converted {} files", args.inputs.len());
    }
    Ok(())
}

fn convert_one(converter: &MzMLConverter, input: &Path, output: &Path) -> Result<()> {
    info!("Input:  {}", input.display());
    info!("Output: {}", output.display());

    let stats = converter
        .convert(input, output)
        .with_context(|| format!("Conversion of {} failed", input.display()))?;

    info!("Conversion complete!");
    info!("  Spectra converted: {}", stats.spectra_count);
    if stats.spectra_skipped > 0 {
        info!("  Malformed spectra skipped: {}", stats.spectra_skipped);
    }
    info!("  Total peaks: {}", stats.peak_count);
    info!("  Rows: {} in {} row groups", stats.rows_written, stats.row_groups_written);
    info!(
        "  Output file size: {} bytes ({:.2} MB)",
        stats.output_file_size,
        stats.output_file_size as f64 / 1024.0 / 1024.0
    );
    if stats.compression_ratio > 0.0 {
        info!("  Compression ratio: {:.1}x", stats.compression_ratio);
    }

    info!("\nFile can be read with any Parquet-compatible tool:");
    info!(
        "  - Python: pyarrow.parquet.read_table('{}').to_pandas()",
        output.display()
    );
    info!(
        "  - DuckDB: SELECT * FROM read_parquet('{}')",
        output.display()
    );

    println!("{}: {}", input.display(), stats);
    Ok(())
}
