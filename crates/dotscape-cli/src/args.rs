//! Command-line argument definitions for the Dotscape CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control input/output paths, configuration file
//! selection, layout overrides, and logging verbosity.

use clap::Parser;

/// Command-line arguments for the Dotscape layout tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input graph description
    #[arg(help = "Path to the input DOT file")]
    pub input: String,

    /// Path to the output JSON file
    #[arg(short, long, default_value = "out.json")]
    pub output: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Layout algorithm, overriding the configuration and the graph's
    /// `layout` attribute (circular, grid, hierarchical, force, radial, or a
    /// DOT engine name such as dot or neato)
    #[arg(short, long)]
    pub layout: Option<String>,

    /// Id of the node to center or pin
    #[arg(short, long)]
    pub anchor: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
