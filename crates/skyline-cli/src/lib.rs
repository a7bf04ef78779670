//! Skyline CLI library
//!
//! This module contains the core CLI logic for the Skyline layout tool.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::{
    fs,
    io::{self, BufWriter},
};

use log::info;

use skyline::{LayoutBuilder, SkylineError, worker};

/// Run the Skyline CLI application
///
/// In file mode, this reads the layout request at `args.input`, computes the
/// city layout and writes it as JSON to `args.output`. In worker mode, it
/// answers line-delimited JSON requests from stdin on stdout until stdin closes.
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `SkylineError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Malformed requests
/// - Inconsistent structure trees
pub fn run(args: &Args) -> Result<(), SkylineError> {
    let app_config = config::load_config(args.config.as_ref())?;

    if args.worker {
        info!("Starting worker mode");
        let stdin = io::stdin().lock();
        let stdout = BufWriter::new(io::stdout().lock());
        return worker::serve(app_config.layout(), stdin, stdout);
    }

    let input = args.input.as_deref().ok_or_else(|| {
        SkylineError::Io(io::Error::new(
            io::ErrorKind::InvalidInput,
            "an input file is required unless --worker is given",
        ))
    })?;

    info!(
        input_path = input,
        output_path = args.output;
        "Processing layout request"
    );

    let source = fs::read_to_string(input)?;

    let builder = LayoutBuilder::new(app_config);
    let request = builder.parse_request(&source)?;
    let city = builder.compute_request(&request)?;

    let json = serde_json::to_string_pretty(&city).map_err(io::Error::from)?;
    fs::write(&args.output, json)?;

    info!(output_file = args.output, boxes = city.len(); "Layout exported successfully");

    Ok(())
}
