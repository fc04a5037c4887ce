//! Layout engine: five independent strategies that assign every node a
//! position, plus a selector that picks one by name.
//!
//! Strategies are pure. They read a [`Graph`] and [`LayoutParams`] and
//! return a [`Positions`] map; [`apply_positions`] writes that map back into
//! the graph. Each strategy that follows edges builds its own transient
//! [`petgraph`] topology from its input, so the same graph can be laid out
//! repeatedly with different parameters.
//!
//! # Example
//!
//! ```
//! # use dotscape::layout::{LayoutAlgorithm, LayoutParams, apply_positions};
//! # use dotscape::model::Graph;
//! let mut graph = Graph::new(true);
//! graph.connect("a", "b");
//! graph.connect("a", "c");
//!
//! let params = LayoutParams::default();
//! let positions = LayoutAlgorithm::Hierarchical.layout(&graph, &params);
//! apply_positions(&mut graph, &positions);
//! ```

mod engines;
#[cfg(test)]
mod invariants;
mod leveling;
mod params;

pub use engines::{Circular, ForceDirected, Grid, Hierarchical, LayoutAlgorithm, Radial};
pub use params::{ForceParams, LayoutParams, RadialParams};

use indexmap::IndexMap;
use log::trace;
use petgraph::graph::{DiGraph, NodeIndex};

use dotscape_core::{geometry::Point, model::Graph};

/// Node id to position, in node insertion order.
pub type Positions = IndexMap<String, Point>;

/// A layout strategy.
///
/// Implementations must be total: they return a position for every node of
/// the input graph, including the empty and single-node cases.
pub trait LayoutStrategy: Send + Sync {
    /// The canonical name of the strategy.
    fn name(&self) -> &'static str;

    /// Computes positions for every node of `graph`.
    fn layout(&self, graph: &Graph, params: &LayoutParams) -> Positions;
}

/// Writes `positions` into `graph`.
///
/// Ids without a matching node are ignored; nodes without an entry keep
/// their current position. Returns the number of nodes that were moved.
pub fn apply_positions(graph: &mut Graph, positions: &Positions) -> usize {
    let mut applied = 0;
    for node in graph.nodes_mut() {
        if let Some(position) = positions.get(node.id()) {
            node.set_position(*position);
            applied += 1;
        }
    }
    trace!(applied, total = positions.len(); "Applied positions");
    applied
}

/// Minimum distance between neighbouring nodes.
///
/// The larger of the configured spacing and the widest node plus padding,
/// so wide nodes never overlap regardless of the configured spacing.
pub fn min_spacing(graph: &Graph, params: &LayoutParams) -> f32 {
    let widest = graph.nodes().map(|node| node.width()).fold(0.0_f32, f32::max);
    params.spacing.max(widest + params.padding)
}

/// Vertical distance between hierarchy ranks.
pub fn rank_spacing(graph: &Graph, params: &LayoutParams) -> f32 {
    let tallest = graph.nodes().map(|node| node.height()).fold(0.0_f32, f32::max);
    params.rank_spacing.max(tallest + params.padding)
}

/// Edge structure of a graph. Node `i` is the `i`-th node of the graph in
/// insertion order.
pub(crate) type Topology = DiGraph<(), ()>;

/// Builds the topology of `graph`.
///
/// Self loops and edges with a missing endpoint are dropped; parallel edges
/// collapse into one.
pub(crate) fn topology(graph: &Graph) -> Topology {
    let mut topology = Topology::with_capacity(graph.node_count(), graph.edge_count());
    for _ in graph.nodes() {
        topology.add_node(());
    }

    for edge in graph.edges() {
        if edge.is_self_loop() {
            continue;
        }
        let (Some(source), Some(target)) =
            (graph.node_index(edge.source()), graph.node_index(edge.target()))
        else {
            continue;
        };
        topology.update_edge(NodeIndex::new(source), NodeIndex::new(target), ());
    }
    topology
}

/// Index of the caller-designated anchor, or of the highest-degree node.
///
/// Degree counts incoming and outgoing neighbours. Ties go to the earliest
/// inserted node. Returns `None` only for an empty graph.
pub(crate) fn anchor_index(
    graph: &Graph,
    topology: &Topology,
    params: &LayoutParams,
) -> Option<usize> {
    if let Some(index) = params.anchor.as_deref().and_then(|id| graph.node_index(id)) {
        return Some(index);
    }

    topology
        .node_indices()
        .map(|node| (node.index(), topology.neighbors_undirected(node).count()))
        .fold(None, |best: Option<(usize, usize)>, (index, degree)| match best {
            Some((_, best_degree)) if best_degree >= degree => best,
            _ => Some((index, degree)),
        })
        .map(|(index, _)| index)
}

/// Pairs node ids with positions computed by index.
pub(crate) fn collect_positions(graph: &Graph, points: Vec<Point>) -> Positions {
    graph
        .nodes()
        .zip(points)
        .map(|(node, point)| (node.id().to_string(), point))
        .collect()
}
