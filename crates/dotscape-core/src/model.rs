//! The node/edge graph model.
//!
//! A [`Graph`] is produced once per parse and is afterwards only touched by
//! layout, which rewrites node positions. Node identity, labels and styles
//! survive layout untouched.
//!
//! # Ordering
//!
//! Nodes are kept in an [`IndexMap`] keyed by id. Insertion order is the
//! order in which a node was first referenced (by definition or by an edge)
//! and layout strategies rely on it for deterministic tie-breaking. Edges
//! are kept in the order they appeared in the source text.

use std::{fmt, str::FromStr};

use indexmap::IndexMap;
use log::trace;
use serde::{Deserialize, Serialize};

use crate::geometry::{Bounds, Point, Size};

/// Default node width used when a node is created without explicit geometry.
pub const DEFAULT_NODE_WIDTH: f32 = 150.0;

/// Default node height used when a node is created without explicit geometry.
pub const DEFAULT_NODE_HEIGHT: f32 = 40.0;

/// Recognized node style fields plus an opaque map for everything else.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeStyle {
    /// Border color (`color` attribute).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,
    /// Fill color (`fillcolor` attribute).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    /// Raw style marker such as `filled` or `dashed` (`style` attribute).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    /// Shape hint (`shape` attribute).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shape: Option<String>,
    /// Unrecognized attributes, kept verbatim in source order.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub extra: IndexMap<String, String>,
}

impl NodeStyle {
    /// Merges `other` into this style.
    ///
    /// Fields present in `other` win; fields absent in `other` are kept.
    /// Extension entries are merged key by key.
    pub fn merge(&mut self, other: NodeStyle) {
        if other.stroke.is_some() {
            self.stroke = other.stroke;
        }
        if other.background.is_some() {
            self.background = other.background;
        }
        if other.style.is_some() {
            self.style = other.style;
        }
        if other.shape.is_some() {
            self.shape = other.shape;
        }
        self.extra.extend(other.extra);
    }
}

/// A graph node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    id: String,
    label: String,
    size: Size,
    position: Point,
    style: NodeStyle,
}

impl Node {
    /// Creates a node with the default size, placed at the origin and
    /// labeled with its own id.
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            label: id.clone(),
            id,
            size: Size::new(DEFAULT_NODE_WIDTH, DEFAULT_NODE_HEIGHT),
            position: Point::default(),
            style: NodeStyle::default(),
        }
    }

    /// Returns a copy of this node with the given size.
    pub fn with_size(mut self, size: Size) -> Self {
        self.size = size;
        self
    }

    /// Returns a copy of this node placed at `position`.
    pub fn with_position(mut self, position: Point) -> Self {
        self.position = position;
        self
    }

    /// Returns a copy of this node with the given label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn width(&self) -> f32 {
        self.size.width()
    }

    pub fn height(&self) -> f32 {
        self.size.height()
    }

    /// Returns the top-left corner of the node rectangle.
    pub fn position(&self) -> Point {
        self.position
    }

    pub fn style(&self) -> &NodeStyle {
        &self.style
    }

    pub fn style_mut(&mut self) -> &mut NodeStyle {
        &mut self.style
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    pub fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    pub fn set_size(&mut self, size: Size) {
        self.size = size;
    }

    /// Returns the node rectangle at its current position.
    pub fn bounds(&self) -> Bounds {
        self.position.to_bounds(self.size)
    }

    /// Returns the center of the node rectangle.
    pub fn center(&self) -> Point {
        self.bounds().center()
    }

    /// Applies a repeated definition of this node.
    ///
    /// A new label overrides the current one and style fields are merged.
    pub fn merge_definition(&mut self, label: Option<String>, style: NodeStyle) {
        if let Some(label) = label {
            self.label = label;
        }
        self.style.merge(style);
    }
}

/// How an edge is drawn between its endpoints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderKind {
    /// Floating cubic curve between dynamically resolved sides.
    #[default]
    Curved,
    /// Axis-aligned elbow path between fixed sides.
    Orthogonal,
}

impl FromStr for RenderKind {
    type Err = &'static str;

    /// Accepts both our own names and DOT `splines` values.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "curved" | "floating" | "spline" | "splines" | "curve" | "true" => Ok(Self::Curved),
            "orthogonal" | "ortho" | "polyline" | "step" | "elbow" => Ok(Self::Orthogonal),
            _ => Err("Unsupported render kind"),
        }
    }
}

impl From<RenderKind> for &'static str {
    fn from(val: RenderKind) -> Self {
        match val {
            RenderKind::Curved => "curved",
            RenderKind::Orthogonal => "orthogonal",
        }
    }
}

impl fmt::Display for RenderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s: &'static str = (*self).into();
        write!(f, "{s}")
    }
}

/// Recognized edge attributes plus an opaque map for everything else.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EdgeAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Line color (`color` attribute).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,
    /// Raw style marker (`style` attribute).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub extra: IndexMap<String, String>,
}

/// A connection between two nodes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Edge {
    id: String,
    source: String,
    target: String,
    attributes: EdgeAttributes,
    render_kind: RenderKind,
}

impl Edge {
    /// Creates a curved edge without attributes.
    pub fn new(id: impl Into<String>, source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            attributes: EdgeAttributes::default(),
            render_kind: RenderKind::default(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn label(&self) -> Option<&str> {
        self.attributes.label.as_deref()
    }

    pub fn attributes(&self) -> &EdgeAttributes {
        &self.attributes
    }

    pub fn attributes_mut(&mut self) -> &mut EdgeAttributes {
        &mut self.attributes
    }

    pub fn render_kind(&self) -> RenderKind {
        self.render_kind
    }

    pub fn set_attributes(&mut self, attributes: EdgeAttributes) {
        self.attributes = attributes;
    }

    pub fn set_render_kind(&mut self, kind: RenderKind) {
        self.render_kind = kind;
    }

    /// Returns true if the edge starts and ends at the same node.
    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}

/// A parsed graph: ordered nodes, ordered edges and graph-level attributes.
///
/// Every edge endpoint exists in the node collection; [`Graph::connect`]
/// creates missing endpoints on demand.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Graph {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    directed: bool,
    nodes: IndexMap<String, Node>,
    edges: Vec<Edge>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    attributes: IndexMap<String, String>,
    #[serde(skip)]
    edge_counter: usize,
}

impl Graph {
    /// Creates an empty graph.
    pub fn new(directed: bool) -> Self {
        Self {
            directed,
            ..Self::default()
        }
    }

    /// Returns a copy of this graph with the given name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn is_directed(&self) -> bool {
        self.directed
    }

    /// Iterates over nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn nodes_mut(&mut self) -> impl Iterator<Item = &mut Node> {
        self.nodes.values_mut()
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    /// Returns the insertion index of a node.
    pub fn node_index(&self, id: &str) -> Option<usize> {
        self.nodes.get_index_of(id)
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn edges_mut(&mut self) -> impl Iterator<Item = &mut Edge> {
        self.edges.iter_mut()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Graph-level attributes (`rankdir`, `layout`, ...), in source order.
    pub fn attributes(&self) -> &IndexMap<String, String> {
        &self.attributes
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(key.into(), value.into());
    }

    /// Returns the node with `id`, creating it with default geometry if absent.
    pub fn ensure_node(&mut self, id: &str) -> &mut Node {
        self.nodes.entry(id.to_string()).or_insert_with(|| {
            trace!(id; "Creating node");
            Node::new(id)
        })
    }

    /// Inserts a node, merging it into an existing node with the same id.
    ///
    /// On merge the existing position and size are kept.
    pub fn insert_node(&mut self, node: Node) {
        match self.nodes.get_mut(node.id()) {
            Some(existing) => {
                let Node { label, style, .. } = node;
                existing.merge_definition(Some(label), style);
            }
            None => {
                self.nodes.insert(node.id.clone(), node);
            }
        }
    }

    /// Appends an edge between `source` and `target`, creating missing
    /// endpoints, and returns it for further configuration.
    ///
    /// Edge ids are `"{source}{op}{target}#{n}"` where `op` is `->` for
    /// directed graphs and `--` otherwise, and `n` increases with every call.
    pub fn connect(&mut self, source: &str, target: &str) -> &mut Edge {
        self.ensure_node(source);
        self.ensure_node(target);

        let op = if self.directed { "->" } else { "--" };
        let id = format!("{source}{op}{target}#{}", self.edge_counter);
        self.edge_counter += 1;

        self.edges.push(Edge::new(id, source, target));
        let last = self.edges.len() - 1;
        &mut self.edges[last]
    }

    /// Appends a prebuilt edge, creating missing endpoints.
    pub fn push_edge(&mut self, edge: Edge) {
        self.ensure_node(edge.source());
        self.ensure_node(edge.target());
        self.edge_counter += 1;
        self.edges.push(edge);
    }

    /// Returns the rectangle of the node with `id` at its current position.
    pub fn node_bounds(&self, id: &str) -> Option<Bounds> {
        self.nodes.get(id).map(Node::bounds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_defaults() {
        let node = Node::new("A");
        assert_eq!(node.id(), "A");
        assert_eq!(node.label(), "A");
        assert_eq!(node.width(), DEFAULT_NODE_WIDTH);
        assert_eq!(node.height(), DEFAULT_NODE_HEIGHT);
        assert!(node.position().is_zero());
    }

    #[test]
    fn test_node_merge_definition_merges_style() {
        let mut node = Node::new("A");
        node.merge_definition(
            Some("first".to_string()),
            NodeStyle {
                stroke: Some("red".to_string()),
                ..NodeStyle::default()
            },
        );
        node.merge_definition(
            None,
            NodeStyle {
                background: Some("blue".to_string()),
                ..NodeStyle::default()
            },
        );

        assert_eq!(node.label(), "first");
        assert_eq!(node.style().stroke.as_deref(), Some("red"));
        assert_eq!(node.style().background.as_deref(), Some("blue"));
    }

    #[test]
    fn test_render_kind_from_str() {
        assert_eq!("ortho".parse::<RenderKind>(), Ok(RenderKind::Orthogonal));
        assert_eq!("Curved".parse::<RenderKind>(), Ok(RenderKind::Curved));
        assert!("zigzag".parse::<RenderKind>().is_err());
        assert_eq!(RenderKind::Orthogonal.to_string(), "orthogonal");
    }

    #[test]
    fn test_connect_creates_missing_endpoints() {
        let mut graph = Graph::new(true);
        graph.connect("A", "B");

        assert_eq!(graph.node_count(), 2);
        assert!(graph.contains_node("A"));
        assert!(graph.contains_node("B"));
        assert_eq!(graph.edges()[0].render_kind(), RenderKind::Curved);
    }

    #[test]
    fn test_connect_ids_unique_for_parallel_edges() {
        let mut graph = Graph::new(true);
        graph.connect("A", "B");
        graph.connect("A", "B");

        assert_eq!(graph.edges()[0].id(), "A->B#0");
        assert_eq!(graph.edges()[1].id(), "A->B#1");
    }

    #[test]
    fn test_undirected_edge_ids() {
        let mut graph = Graph::new(false);
        let edge = graph.connect("A", "B");
        assert_eq!(edge.id(), "A--B#0");
    }

    #[test]
    fn test_node_order_is_first_reference() {
        let mut graph = Graph::new(true);
        graph.connect("C", "A");
        graph.ensure_node("B");
        graph.ensure_node("C");

        let ids: Vec<&str> = graph.nodes().map(Node::id).collect();
        assert_eq!(ids, ["C", "A", "B"]);
        assert_eq!(graph.node_index("B"), Some(2));
    }

    #[test]
    fn test_insert_node_merges_existing() {
        let mut graph = Graph::new(true);
        graph.ensure_node("A").set_position(Point::new(5.0, 5.0));
        graph.insert_node(Node::new("A").with_label("Alpha"));

        let node = graph.node("A").unwrap();
        assert_eq!(node.label(), "Alpha");
        assert_eq!(node.position(), Point::new(5.0, 5.0));
        assert_eq!(graph.node_count(), 1);
    }
}
