use anyhow::{Context, Result};
use std::path::PathBuf;

use mzparquet::reader::MzParquetReader;

use super::{heading, label};

/// Display information about a container
pub fn run(file: PathBuf) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("File does not exist: {}", file.display());
    }

    let reader = MzParquetReader::open(&file)
        .with_context(|| format!("Failed to open {}", file.display()))?;
    let metadata = reader.metadata();

    println!("{}", heading("mzParquet File Information"));
    println!("{}", heading("=========================="));
    println!("{}: {}", label("File"), file.display());
    println!("{}: {}", label("Layout"), metadata.layout);
    println!("{}: {}", label("Format version"), metadata.format_version);
    if let Some(storage) = &metadata.precursor_storage {
        println!("{}: {}", label("Precursor storage"), storage);
    }
    if let Some(converter) = &metadata.converter {
        println!("{}: {} {}", label("Written by"), converter.name, converter.version);
    }
    println!();

    println!("{}", heading("File Statistics:"));
    println!("  Row groups: {}", metadata.num_row_groups);
    println!("  Total rows: {}", metadata.total_rows);
    println!("  Schema columns: {}", metadata.schema.fields().len());
    println!();

    println!("{}", heading("Metadata Keys:"));
    for (key, value) in &metadata.key_value_metadata {
        let value_preview = if value.len() > 100 {
            let cut = (0..=100).rev().find(|&i| value.is_char_boundary(i)).unwrap_or(0);
            format!("{}... ({} bytes)", &value[..cut], value.len())
        } else {
            value.clone()
        };
        println!("  {}: {}", key, value_preview);
    }
    println!();

    println!("{}", heading("Schema:"));
    for (i, field) in metadata.schema.fields().iter().enumerate() {
        println!("  {:3}. {} ({})", i + 1, field.name(), field.data_type());
    }
    println!();

    let summary = reader.summary().context("Failed to summarise container")?;
    println!("{}", summary);

    Ok(())
}
