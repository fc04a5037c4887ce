//! CLI logic for the Dotscape layout tool.
//!
//! Reads a graph description, lays it out, and writes the positioned graph
//! with its edge geometry as JSON.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::fs;

use log::{info, warn};

use dotscape::{DotscapeError, GraphBuilder, config::AppConfig};

use error_adapter::{diagnostic_reportables, render};

/// Run the Dotscape CLI application
///
/// This function processes the input file through the parse and layout
/// pipeline and writes the resulting JSON to the output file. Parse
/// warnings are rendered at `warn` level and never fail the run.
///
/// # Errors
///
/// Returns `DotscapeError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Parsing errors
/// - Export errors
pub fn run(args: &Args) -> Result<(), DotscapeError> {
    info!(
        input_path = args.input,
        output_path = args.output;
        "Processing graph"
    );

    let app_config = apply_overrides(config::load_config(args.config.as_ref())?, args);

    let source = fs::read_to_string(&args.input)?;

    let builder = GraphBuilder::new(app_config);
    let output = builder.parse_with_diagnostics(&source)?;
    for reportable in diagnostic_reportables(&output.warnings, &source) {
        warn!("{}", render(&reportable));
    }

    let mut graph = output.graph;
    let algorithm = builder.layout(&mut graph);
    let json = builder.render_json(&graph)?;

    fs::write(&args.output, json)?;

    info!(output_file = args.output, algorithm:% = algorithm; "Layout exported successfully");

    Ok(())
}

/// Applies the `--layout` and `--anchor` flags on top of the loaded
/// configuration.
fn apply_overrides(config: AppConfig, args: &Args) -> AppConfig {
    let mut layout = config.layout().clone();
    if let Some(algorithm) = &args.layout {
        layout = layout.with_algorithm(algorithm);
    }
    if let Some(anchor) = &args.anchor {
        layout = layout.with_anchor(anchor);
    }
    AppConfig::new(layout, *config.geometry())
}
