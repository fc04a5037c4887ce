//! # Dotscape Parser
//!
//! Best-effort parser for DOT-like graph descriptions. The parser accepts
//! the informal subset of DOT found in the wild: it keeps every node and
//! edge it can recognize, skips what it cannot, and reports each skipped
//! fragment as a warning [`Diagnostic`](error::Diagnostic).
//!
//! ## Usage
//!
//! ```
//! # use dotscape_parser::{parse, error::ParseError};
//!
//! fn main() -> Result<(), ParseError> {
//!     let graph = parse(r#"digraph G { A -> B [label="go"]; B -> C; }"#)?;
//!     assert_eq!(graph.node_count(), 3);
//!     assert_eq!(graph.edge_count(), 2);
//!     Ok(())
//! }
//! ```

mod attributes;
pub mod error;
mod parser;
mod scanner;
mod span;

pub use span::Span;

use dotscape_core::model::Graph;

use error::{Diagnostic, ParseError};

/// A parsed graph together with the warnings raised while parsing it.
#[derive(Debug)]
pub struct ParseOutput {
    /// The parsed graph.
    pub graph: Graph,
    /// Warnings for fragments that were skipped.
    pub warnings: Vec<Diagnostic>,
}

/// Parse source text into a [`Graph`].
///
/// Malformed fragments never fail the parse; they are skipped and recorded as
/// warnings. Use [`parse_with_diagnostics`] to receive them.
///
/// # Errors
///
/// Returns a [`ParseError`] only if the input is empty (after removing
/// comments) or nothing in it can be read as a graph.
pub fn parse(source: &str) -> Result<Graph, ParseError> {
    parse_with_diagnostics(source).map(|output| output.graph)
}

/// Parse source text into a [`Graph`], returning the warnings as well.
///
/// # Errors
///
/// See [`parse`].
pub fn parse_with_diagnostics(source: &str) -> Result<ParseOutput, ParseError> {
    parser::parse_source(source)
}
