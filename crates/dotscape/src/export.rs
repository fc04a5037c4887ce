//! Export of positioned graphs.
//!
//! An export is a [`Snapshot`]: the positioned graph together with the edge
//! geometry resolved at the moment of export. Geometry is never written
//! back into the graph.

use std::io::Write;

use serde::Serialize;

use dotscape_core::model::Graph;

use crate::geometry::{EdgeGeometry, GeometryResolver};

/// The positioned graph plus per-edge render geometry.
#[derive(Debug, Serialize)]
pub struct Snapshot<'a> {
    pub graph: &'a Graph,
    pub edges: Vec<EdgeSnapshot<'a>>,
}

/// Geometry of one edge at export time.
///
/// `geometry` and `svg_path` are `None` when an endpoint is missing.
#[derive(Debug, Serialize)]
pub struct EdgeSnapshot<'a> {
    pub id: &'a str,
    pub geometry: Option<EdgeGeometry>,
    pub svg_path: Option<String>,
}

impl<'a> Snapshot<'a> {
    /// Resolves the geometry of every edge of `graph` against its current
    /// node rectangles.
    pub fn capture(graph: &'a Graph, resolver: &GeometryResolver) -> Self {
        let edges = graph
            .edges()
            .iter()
            .map(|edge| {
                let geometry = resolver.resolve_edge(graph, edge);
                let svg_path = geometry.as_ref().map(|geometry| geometry.path.to_svg_path());
                EdgeSnapshot {
                    id: edge.id(),
                    geometry,
                    svg_path,
                }
            })
            .collect();

        Self { graph, edges }
    }
}

/// A sink for snapshots.
pub trait Exporter {
    fn export_snapshot(&mut self, snapshot: &Snapshot<'_>) -> Result<(), Error>;
}

/// Writes snapshots as JSON.
pub struct JsonExporter<W> {
    writer: W,
    pretty: bool,
}

impl<W: Write> JsonExporter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            pretty: false,
        }
    }

    /// Indent the output
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Exporter for JsonExporter<W> {
    fn export_snapshot(&mut self, snapshot: &Snapshot<'_>) -> Result<(), Error> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut self.writer, snapshot)?;
        } else {
            serde_json::to_writer(&mut self.writer, snapshot)?;
        }
        self.writer.flush().map_err(Error::Io)
    }
}

#[derive(Debug)]
pub enum Error {
    Render(String),
    Json(serde_json::Error),
    Io(std::io::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Render(msg) => write!(f, "Render error: {msg}"),
            Self::Json(err) => write!(f, "JSON error: {err}"),
            Self::Io(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Render(_) => None,
            Self::Json(err) => Some(err),
            Self::Io(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}
