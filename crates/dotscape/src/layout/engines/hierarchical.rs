//! Layered top-down layout.
//!
//! Nodes are leveled by longest path from the roots, so a node is never
//! drawn above any of its ancestors. Horizontal placement is a greedy
//! parent-centered spread with best-effort de-overlap; it does not attempt
//! crossing minimization.

use std::collections::VecDeque;

use log::trace;
use petgraph::{Direction, graph::NodeIndex};

use dotscape_core::{geometry::Point, model::Graph};

use crate::layout::{
    LayoutParams, LayoutStrategy, Positions, Topology, collect_positions,
    leveling::longest_path_levels, min_spacing, rank_spacing, topology,
};

/// Maximum number of half-spacing shifts tried when a node would overlap.
const MAX_SHIFT_ATTEMPTS: usize = 8;

/// Top-down layered layout.
#[derive(Debug, Clone, Copy, Default)]
pub struct Hierarchical;

impl LayoutStrategy for Hierarchical {
    fn name(&self) -> &'static str {
        "hierarchical"
    }

    fn layout(&self, graph: &Graph, params: &LayoutParams) -> Positions {
        let n = graph.node_count();
        if n == 0 {
            return Positions::new();
        }

        let topology = topology(graph);
        let roots = roots(&topology);
        let levels = longest_path_levels(&topology, &roots);

        let spacing = min_spacing(graph, params);
        let rank = rank_spacing(graph, params);
        let mut placer = Placer {
            positions: vec![None; n],
            levels: &levels,
            spacing,
            clearance: spacing - params.padding,
            rank,
            center: params.center,
        };

        // Roots spread evenly around the center.
        let mut queue = VecDeque::new();
        let offset = (roots.len() - 1) as f32 * spacing / 2.0;
        for (i, &root) in roots.iter().enumerate() {
            let x = params.center.x() - offset + i as f32 * spacing;
            placer.place(root.index(), x);
            queue.push_back(root);
        }

        // Each parent centers its unplaced deeper children under itself.
        while let Some(parent) = queue.pop_front() {
            let (Some(parent_level), Some(parent_position)) =
                (levels[parent.index()], placer.positions[parent.index()])
            else {
                continue;
            };
            let mut children: Vec<NodeIndex> = topology
                .neighbors(parent)
                .filter(|child| {
                    placer.positions[child.index()].is_none()
                        && levels[child.index()].is_some_and(|level| level > parent_level)
                })
                .collect();
            children.sort_unstable();
            if children.is_empty() {
                continue;
            }

            let start = parent_position.x() - (children.len() - 1) as f32 * spacing / 2.0;
            for (i, &child) in children.iter().enumerate() {
                placer.place(child.index(), start + i as f32 * spacing);
                queue.push_back(child);
            }
        }

        // Anything left over goes into a column right of the placed nodes.
        let column_x = placer
            .positions
            .iter()
            .flatten()
            .map(|point| point.x())
            .fold(f32::NEG_INFINITY, f32::max)
            + spacing;
        let mut fallback_counts: Vec<usize> = vec![0; n];
        for index in 0..n {
            if placer.positions[index].is_some() {
                continue;
            }
            let level = levels[index].unwrap_or(0);
            let x = column_x + fallback_counts[level] as f32 * spacing;
            fallback_counts[level] += 1;
            trace!(node:? = graph.nodes().nth(index).map(|node| node.id()), level; "Fallback placement");
            placer.positions[index] = Some(Point::new(x, params.center.y() + level as f32 * rank));
        }

        let points = placer
            .positions
            .into_iter()
            .map(|point| point.unwrap_or(params.center))
            .collect();
        collect_positions(graph, points)
    }
}

/// Zero in-degree nodes, or the first node when every node has a parent.
fn roots(topology: &Topology) -> Vec<NodeIndex> {
    let mut roots: Vec<NodeIndex> = topology.externals(Direction::Incoming).collect();
    if roots.is_empty() {
        roots.extend(topology.node_indices().take(1));
    }
    roots.sort_unstable();
    roots
}

struct Placer<'a> {
    positions: Vec<Option<Point>>,
    levels: &'a [Option<usize>],
    spacing: f32,
    clearance: f32,
    rank: f32,
    center: Point,
}

impl Placer<'_> {
    /// Places `index` at `x` on its level, shifting right while it is too
    /// close to a node already placed on the same level.
    fn place(&mut self, index: usize, mut x: f32) {
        let level = self.levels[index].unwrap_or(0);

        for _ in 0..MAX_SHIFT_ATTEMPTS {
            let crowded = self.positions.iter().enumerate().any(|(other, point)| {
                other != index
                    && self.levels[other].unwrap_or(0) == level
                    && point.is_some_and(|point| (point.x() - x).abs() < self.clearance)
            });
            if !crowded {
                break;
            }
            x += self.spacing / 2.0;
        }

        let y = self.center.y() + level as f32 * self.rank;
        self.positions[index] = Some(Point::new(x, y));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use float_cmp::approx_eq;

    fn tree() -> Graph {
        let mut graph = Graph::new(true);
        graph.connect("root", "a");
        graph.connect("root", "b");
        graph.connect("a", "c");
        graph.connect("b", "c");
        graph
    }

    #[test]
    fn test_levels_follow_longest_path() {
        let params = LayoutParams::default();
        let positions = Hierarchical.layout(&tree(), &params);
        let rank = rank_spacing(&tree(), &params);

        assert_eq!(positions["root"].y(), params.center.y());
        assert_eq!(positions["a"].y(), params.center.y() + rank);
        assert_eq!(positions["b"].y(), params.center.y() + rank);
        assert_eq!(positions["c"].y(), params.center.y() + 2.0 * rank);
    }

    #[test]
    fn test_shortcut_edge_does_not_lift_node() {
        let mut graph = tree();
        graph.connect("root", "c");

        let params = LayoutParams::default();
        let positions = Hierarchical.layout(&graph, &params);
        let rank = rank_spacing(&graph, &params);

        assert_eq!(positions["c"].y(), params.center.y() + 2.0 * rank);
    }

    #[test]
    fn test_children_centered_under_parent() {
        let params = LayoutParams::default();
        let positions = Hierarchical.layout(&tree(), &params);

        let mid = (positions["a"].x() + positions["b"].x()) / 2.0;
        assert!(approx_eq!(f32, mid, positions["root"].x(), epsilon = 0.01));
        assert!(positions["a"].x() < positions["b"].x());
    }

    #[test]
    fn test_same_level_nodes_do_not_overlap() {
        // Two roots whose children would land on the same spot.
        let mut graph = Graph::new(true);
        graph.connect("r1", "x");
        graph.connect("r2", "y");
        graph.connect("r1", "z");

        let params = LayoutParams::default();
        let spacing = min_spacing(&graph, &params);
        let positions = Hierarchical.layout(&graph, &params);

        let level_one: Vec<f32> = ["x", "y", "z"].iter().map(|id| positions[*id].x()).collect();
        for i in 0..level_one.len() {
            for j in i + 1..level_one.len() {
                assert!((level_one[i] - level_one[j]).abs() >= spacing - params.padding);
            }
        }
    }

    #[test]
    fn test_roots_are_zero_in_degree_nodes() {
        let mut graph = Graph::new(true);
        graph.connect("a", "b");
        graph.connect("c", "b");
        assert_eq!(roots(&topology(&graph)), vec![NodeIndex::new(0), NodeIndex::new(2)]);

        let mut cycle = Graph::new(true);
        cycle.connect("x", "y");
        cycle.connect("y", "x");
        assert_eq!(roots(&topology(&cycle)), vec![NodeIndex::new(0)]);
    }

    #[test]
    fn test_cycle_terminates() {
        let mut graph = Graph::new(true);
        graph.connect("a", "b");
        graph.connect("b", "c");
        graph.connect("c", "a");

        let positions = Hierarchical.layout(&graph, &LayoutParams::default());
        assert_eq!(positions.len(), 3);
        assert!(positions.values().all(|p| p.is_finite()));
    }

    #[test]
    fn test_unreached_cycle_goes_to_fallback_column() {
        let mut graph = Graph::new(true);
        graph.connect("root", "leaf");
        graph.connect("p", "q");
        graph.connect("q", "p");

        let params = LayoutParams::default();
        let positions = Hierarchical.layout(&graph, &params);

        assert!(positions["p"].x() > positions["leaf"].x());
        assert!(positions["q"].x() > positions["leaf"].x());
        assert_ne!(positions["p"], positions["q"]);
    }
}
