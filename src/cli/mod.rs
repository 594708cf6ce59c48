use anyhow::Result;
use clap::{Parser, Subcommand};

#[cfg(feature = "mzml")]
mod config;
#[cfg(feature = "mzml")]
mod convert;
mod info;
#[cfg(feature = "mzml")]
mod profile;
mod query;

/// mzParquet - columnar mass spectrometry containers
#[derive(Parser)]
#[command(name = "mzparquet")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert an mzML file to an mzParquet container
    #[cfg(feature = "mzml")]
    Convert(convert::ConvertArgs),

    /// List the scans of a container that match a predicate
    Query(query::QueryArgs),

    /// Display footer metadata and a summary of a container
    Info {
        /// Container path
        #[arg(value_name = "FILE")]
        file: std::path::PathBuf,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        #[cfg(feature = "mzml")]
        Commands::Convert(args) => convert::run(args),
        Commands::Query(args) => query::run(args),
        Commands::Info { file } => info::run(file),
    }
}

/// Section heading for terminal output
#[cfg(feature = "colorized_output")]
fn heading(text: &str) -> String {
    console::style(text).bold().cyan().to_string()
}

#[cfg(not(feature = "colorized_output"))]
fn heading(text: &str) -> String {
    text.to_string()
}

/// Field label for terminal output
#[cfg(feature = "colorized_output")]
fn label(text: &str) -> String {
    console::style(text).bold().to_string()
}

#[cfg(not(feature = "colorized_output"))]
fn label(text: &str) -> String {
    text.to_string()
}
