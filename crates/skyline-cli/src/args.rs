//! Command-line argument definitions for the Skyline CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments select between a one-shot layout of a request
//! file and worker mode, and control configuration and logging.

use clap::Parser;

/// Command-line arguments for the Skyline layout tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input layout request (JSON)
    #[arg(
        help = "Path to the input layout request",
        required_unless_present = "worker"
    )]
    pub input: Option<String>,

    /// Path to the output layout file (JSON)
    #[arg(short, long, default_value = "layout.json")]
    pub output: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Answer line-delimited JSON requests on stdin instead of reading a file
    #[arg(long, conflicts_with = "input")]
    pub worker: bool,
}
