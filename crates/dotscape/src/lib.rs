//! Dotscape - parse DOT-like graph descriptions and lay them out in 2D.
//!
//! Parsing, layout, and edge geometry for informal DOT text. The result is
//! a positioned node/edge model that any downstream renderer can draw.

pub mod collaborator;
pub mod config;
pub mod export;
pub mod geometry;
pub mod layout;

mod error;

pub use dotscape_core::model;
pub use dotscape_parser::{ParseOutput, Span, error as diagnostics};

pub use error::DotscapeError;

use log::{debug, info, trace};

use config::AppConfig;
use export::{Exporter, JsonExporter, Snapshot};
use geometry::GeometryResolver;
use layout::{LayoutAlgorithm, apply_positions};
use model::Graph;

/// Graph attribute naming the layout engine, as in DOT.
pub const LAYOUT_ATTRIBUTE: &str = "layout";

/// Builder for parsing, laying out and exporting graphs.
///
/// # Examples
///
/// ```
/// use dotscape::{GraphBuilder, config::AppConfig};
///
/// let builder = GraphBuilder::new(AppConfig::default());
///
/// let mut graph = builder
///     .parse("digraph G { A -> B; B -> C; }")
///     .expect("Failed to parse");
///
/// builder.layout(&mut graph);
///
/// let json = builder.render_json(&graph).expect("Failed to export");
/// assert!(json.contains("\"svg_path\""));
/// ```
#[derive(Debug, Default)]
pub struct GraphBuilder {
    config: AppConfig,
}

impl GraphBuilder {
    /// Create a new graph builder with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration of this builder.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Parse source text into a graph.
    ///
    /// # Errors
    ///
    /// Returns [`DotscapeError::Parse`] when the input is empty or nothing
    /// in it can be read as a graph.
    pub fn parse(&self, source: &str) -> Result<Graph, DotscapeError> {
        self.parse_with_diagnostics(source).map(|output| output.graph)
    }

    /// Parse source text into a graph, keeping the warnings for skipped
    /// fragments.
    ///
    /// # Errors
    ///
    /// See [`GraphBuilder::parse`].
    pub fn parse_with_diagnostics(&self, source: &str) -> Result<ParseOutput, DotscapeError> {
        info!("Parsing graph");

        let output = dotscape_parser::parse_with_diagnostics(source)
            .map_err(|err| DotscapeError::new_parse_error(err, source))?;

        debug!(
            nodes = output.graph.node_count(),
            edges = output.graph.edge_count(),
            warnings = output.warnings.len();
            "Graph parsed successfully"
        );
        trace!(graph:? = output.graph; "Parsed graph");

        Ok(output)
    }

    /// Picks the layout algorithm for `graph`.
    ///
    /// The configured algorithm wins, then the graph's `layout` attribute,
    /// then [`LayoutAlgorithm::Circular`].
    pub fn algorithm_for(&self, graph: &Graph) -> LayoutAlgorithm {
        self.config
            .layout()
            .algorithm()
            .or_else(|| graph.attribute(LAYOUT_ATTRIBUTE).map(LayoutAlgorithm::from_name))
            .unwrap_or_default()
    }

    /// Lays out `graph` in place and returns the algorithm that was used.
    pub fn layout(&self, graph: &mut Graph) -> LayoutAlgorithm {
        let algorithm = self.algorithm_for(graph);
        let params = self.config.layout().params();

        info!(algorithm:% = algorithm; "Calculating layout");
        let positions = algorithm.layout(graph, &params);
        let applied = apply_positions(graph, &positions);
        debug!(applied; "Layout applied");

        algorithm
    }

    /// Returns the edge geometry resolver described by the configuration.
    pub fn resolver(&self) -> GeometryResolver {
        self.config.geometry().resolver()
    }

    /// Capture the current edge geometry of `graph`.
    pub fn snapshot<'a>(&self, graph: &'a Graph) -> Snapshot<'a> {
        Snapshot::capture(graph, &self.resolver())
    }

    /// Write `graph` and its edge geometry as JSON to `writer`.
    ///
    /// # Errors
    ///
    /// Returns [`DotscapeError::Export`] if serialization or writing fails.
    pub fn export_json<W: std::io::Write>(
        &self,
        graph: &Graph,
        writer: W,
    ) -> Result<(), DotscapeError> {
        let snapshot = self.snapshot(graph);
        let mut exporter = JsonExporter::new(writer).with_pretty(true);
        exporter.export_snapshot(&snapshot)?;
        Ok(())
    }

    /// Render `graph` and its edge geometry as a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`DotscapeError::Export`] if serialization fails.
    pub fn render_json(&self, graph: &Graph) -> Result<String, DotscapeError> {
        let mut buffer = Vec::new();
        self.export_json(graph, &mut buffer)?;
        let json = String::from_utf8(buffer)
            .map_err(|err| export::Error::Render(err.to_string()))?;

        info!(bytes = json.len(); "JSON rendered successfully");
        Ok(json)
    }
}
