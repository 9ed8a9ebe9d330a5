//! CLI Argument Parsing
//!
//! This module defines the CLI interface using clap.
//!
//! ## Design Notes
//!
//! - One command: run the deploy file's pipeline
//! - `--json` switches every output to NDJSON events

use std::path::PathBuf;

use clap::Parser;

use crate::application::RunFlags;
use crate::config::DEFAULT_CONFIG_FILE;

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorWhen {
    Auto,
    Always,
    Never,
}

/// ftpdeploy - upload only what changed, then run the post-deploy steps
#[derive(Parser, Debug)]
#[command(name = "ftpdeploy")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Deploy file
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Upload every file without comparing against the server
    #[arg(long)]
    pub fresh: bool,

    /// Print commands that would change something instead of running them
    #[arg(long)]
    pub act: bool,

    /// Show what would be uploaded, then stop
    #[arg(long)]
    pub dry_run: bool,

    /// Log every ignored and compared file
    #[arg(long)]
    pub log_files: bool,

    /// Print the resolved configuration as JSON and exit
    #[arg(long)]
    pub print_config: bool,

    /// Output format for CI
    #[arg(long)]
    pub json: bool,

    /// Color output mode
    #[arg(long, value_enum)]
    pub color: Option<ColorWhen>,
}

impl Cli {
    pub fn run_flags(&self) -> RunFlags {
        RunFlags {
            fresh: self.fresh,
            act: self.act,
            dry_run: self.dry_run,
            log_files: self.log_files,
        }
    }
}
