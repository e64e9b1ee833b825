use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the bcz binary.
#[derive(Parser, Debug)]
#[command(
    name = "bcz",
    version,
    about = "Validate member access on runtime-named existing resources"
)]
pub struct CliArgs {
    /// Compilation unit JSON files to validate.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Resource type catalog merged over each unit's inline types.
    #[arg(long = "types", value_name = "CATALOG")]
    pub types: Option<PathBuf>,

    /// Diagnostic output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, ignore_case = true)]
    pub format: OutputFormat,

    /// Disable colored output.
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Number of worker threads (defaults to the number of CPUs).
    #[arg(short = 'j', long)]
    pub jobs: Option<usize>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
