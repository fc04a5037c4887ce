use std::f32::consts::TAU;

use float_cmp::approx_eq;
use petgraph::graph::NodeIndex;
use proptest::prelude::*;

use dotscape_core::{geometry::Point, model::Graph};

use super::*;
use crate::layout::leveling::longest_path_levels;

// ===================
// Strategies
// ===================

fn graph_from(n: usize, edges: &[(usize, usize)]) -> Graph {
    let mut graph = Graph::new(true);
    for i in 0..n {
        graph.ensure_node(&format!("n{i}"));
    }
    for &(source, target) in edges {
        graph.connect(&format!("n{source}"), &format!("n{target}"));
    }
    graph
}

/// Arbitrary directed graphs, cycles and self loops included.
fn graph_strategy() -> impl Strategy<Value = Graph> {
    (1usize..12)
        .prop_flat_map(|n| (Just(n), prop::collection::vec((0..n, 0..n), 0..24)))
        .prop_map(|(n, edges)| graph_from(n, &edges))
}

/// Directed acyclic graphs: every edge points to a later node.
fn dag_strategy() -> impl Strategy<Value = Graph> {
    (2usize..12)
        .prop_flat_map(|n| (Just(n), prop::collection::vec((0..n, 0..n), 0..24)))
        .prop_map(|(n, edges)| {
            let edges: Vec<(usize, usize)> = edges
                .into_iter()
                .filter(|(a, b)| a != b)
                .map(|(a, b)| (a.min(b), a.max(b)))
                .collect();
            graph_from(n, &edges)
        })
}

fn center_strategy() -> impl Strategy<Value = Point> {
    (-500.0f32..500.0, -500.0f32..500.0).prop_map(|(x, y)| Point::new(x, y))
}

// ===================
// Property Test Functions
// ===================

/// Every strategy returns an empty map for an empty graph and puts a lone
/// node on the center.
fn check_trivial_graphs(center: Point) -> Result<(), TestCaseError> {
    let params = LayoutParams::default().with_center(center);
    let mut single = Graph::new(true);
    single.ensure_node("only");

    for algorithm in LayoutAlgorithm::ALL {
        prop_assert!(algorithm.layout(&Graph::new(true), &params).is_empty());

        let positions = algorithm.layout(&single, &params);
        prop_assert_eq!(positions.len(), 1);
        prop_assert_eq!(positions["only"], center, "{} misplaced the node", algorithm);
    }
    Ok(())
}

/// Every strategy positions every node with finite coordinates.
fn check_total_and_finite(graph: &Graph) -> Result<(), TestCaseError> {
    let params = LayoutParams::default().with_iterations(20);
    for algorithm in LayoutAlgorithm::ALL {
        let positions = algorithm.layout(graph, &params);
        prop_assert_eq!(positions.len(), graph.node_count());
        prop_assert!(
            positions.values().all(|point| point.is_finite()),
            "{} produced a non-finite position",
            algorithm
        );
    }
    Ok(())
}

/// On acyclic graphs every edge goes at least one rank down.
fn check_hierarchical_levels_follow_edges(graph: &Graph) -> Result<(), TestCaseError> {
    let params = LayoutParams::default();
    let rank = rank_spacing(graph, &params);
    let positions = Hierarchical.layout(graph, &params);

    for edge in graph.edges() {
        let source = positions[edge.source()].y();
        let target = positions[edge.target()].y();
        prop_assert!(
            target - source >= rank - 0.01,
            "edge {} -> {} spans {} < {}",
            edge.source(),
            edge.target(),
            target - source,
            rank
        );
    }
    Ok(())
}

/// Every radial ring is at least as wide as its level's stepped radius and
/// its angles are a permutation of evenly spaced slots.
fn check_radial_rings(graph: &Graph) -> Result<(), TestCaseError> {
    let params = LayoutParams::default();
    let positions = Radial.layout(graph, &params);

    let topology = topology(graph);
    let Some(center) = anchor_index(graph, &topology, &params) else {
        return Ok(());
    };
    let levels = longest_path_levels(&topology, &[NodeIndex::new(center)]);
    let deepest = levels.iter().flatten().copied().max().unwrap_or(0);

    let mut rings: Vec<Vec<Point>> = vec![Vec::new(); deepest + 2];
    for (node, level) in graph.nodes().zip(&levels) {
        rings[level.unwrap_or(deepest + 1)].push(positions[node.id()]);
    }
    prop_assert_eq!(rings[0].len(), 1);
    prop_assert_eq!(rings[0][0], params.center);

    for (level, ring) in rings.iter().enumerate().skip(1) {
        let m = ring.len();
        let minimum = params.radial.base_radius + level as f32 * params.radial.radius_step;
        let mut slots = Vec::with_capacity(m);

        for point in ring {
            let delta = point.sub_point(params.center);
            prop_assert!(delta.hypot() >= minimum - 0.1);

            let angle = delta.y().atan2(delta.x()).rem_euclid(TAU);
            let slot = (angle * m as f32 / TAU).round();
            let expected = TAU * slot / m as f32;
            prop_assert!(
                approx_eq!(f32, angle, expected, epsilon = 0.001),
                "angle {angle} is not a slot of {m}"
            );
            slots.push(slot as usize % m);
        }

        slots.sort_unstable();
        prop_assert_eq!(slots, (0..m).collect::<Vec<_>>());
    }
    Ok(())
}

/// The pinned anchor never leaves the center.
fn check_force_anchor_pinned(graph: &Graph, iterations: usize) -> Result<(), TestCaseError> {
    let params = LayoutParams::default()
        .with_center(Point::new(250.0, -75.0))
        .with_anchor("n0")
        .with_iterations(iterations);
    let positions = ForceDirected.layout(graph, &params);

    prop_assert_eq!(positions["n0"], params.center);
    Ok(())
}

// ===================
// Proptest Wrappers
// ===================

proptest! {
    #[test]
    fn trivial_graphs(center in center_strategy()) {
        check_trivial_graphs(center)?;
    }

    #[test]
    fn total_and_finite(graph in graph_strategy()) {
        check_total_and_finite(&graph)?;
    }

    #[test]
    fn hierarchical_levels_follow_edges(graph in dag_strategy()) {
        check_hierarchical_levels_follow_edges(&graph)?;
    }

    #[test]
    fn radial_rings(graph in graph_strategy()) {
        check_radial_rings(&graph)?;
    }

    #[test]
    fn force_anchor_pinned(graph in graph_strategy(), iterations in 0usize..40) {
        check_force_anchor_pinned(&graph, iterations)?;
    }
}

#[test]
fn test_three_cycle_terminates_with_finite_levels() {
    let graph = graph_from(3, &[(0, 1), (1, 2), (2, 0)]);

    let levels = longest_path_levels(&topology(&graph), &[NodeIndex::new(0)]);
    assert_eq!(levels, vec![Some(0), Some(1), Some(2)]);

    for algorithm in LayoutAlgorithm::ALL {
        let positions = algorithm.layout(&graph, &LayoutParams::default());
        assert_eq!(positions.len(), 3);
        assert!(positions.values().all(|point| point.is_finite()));
    }
}
