use clap::Parser;
use snakify_core::{ScanOptions, DEFAULT_EXCLUDED_DIRS, DEFAULT_EXTENSIONS};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "snakify")]
#[command(version)]
#[command(about = "Interactively convert camelCase identifiers to snake_case")]
#[command(long_about = "A CLI tool that scans a directory tree for camelCase and PascalCase identifiers, proposes a snake_case rename for each, and rewrites the files in place once every rename has been reviewed.")]
pub struct Cli {
    #[arg(help = "Root directory to scan")]
    pub root: PathBuf,

    #[arg(
        short,
        long = "ext",
        value_delimiter = ',',
        default_values_t = DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect::<Vec<_>>(),
        help = "File extensions to scan"
    )]
    pub extensions: Vec<String>,

    #[arg(
        short = 'x',
        long = "exclude",
        value_delimiter = ',',
        default_values_t = DEFAULT_EXCLUDED_DIRS.iter().map(|d| d.to_string()).collect::<Vec<_>>(),
        help = "Directory names to skip wherever they appear"
    )]
    pub excluded_dirs: Vec<String>,

    #[arg(long, help = "Show the changes as diffs without writing any file")]
    pub dry_run: bool,

    #[arg(short, long)]
    pub verbose: bool,

    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions::new(&self.extensions, &self.excluded_dirs)
    }
}
