//! Force-directed layout
//!
//! This module implements a spring-electrical simulation: every pair of
//! nodes repels, every edge pulls its endpoints together. The simulation is
//! deterministic; nodes start evenly spaced on a circle and run for a fixed
//! number of iterations.

use std::f32::consts::TAU;

use log::debug;

use dotscape_core::{
    geometry::{Bounds, Point, Size},
    model::Graph,
};

use crate::layout::{
    ForceParams, LayoutParams, LayoutStrategy, Positions, collect_positions, min_spacing,
    topology,
};

/// Spring-electrical layout.
///
/// The node named by [`LayoutParams::anchor`], if any, is pinned at
/// [`LayoutParams::center`] for the whole run. Non-pinned nodes are kept
/// inside [`LayoutParams::bounds`], or a square around the center sized
/// from the node count when no bounds are given.
#[derive(Debug, Clone, Copy, Default)]
pub struct ForceDirected;

impl LayoutStrategy for ForceDirected {
    fn name(&self) -> &'static str {
        "force-directed"
    }

    fn layout(&self, graph: &Graph, params: &LayoutParams) -> Positions {
        let n = graph.node_count();
        if n == 0 {
            return Positions::new();
        }

        let mut simulation = Simulation::new(graph, params);
        for _ in 0..params.force.iterations {
            simulation.step();
        }
        debug!(iterations = params.force.iterations, nodes = n; "Force simulation finished");

        collect_positions(graph, simulation.positions)
    }
}

/// Per-run working state. Nothing here outlives a single layout call.
struct Simulation {
    positions: Vec<Point>,
    velocities: Vec<Point>,
    pinned: Option<usize>,
    edges: Vec<(usize, usize)>,
    center: Point,
    bounds: Bounds,
    max_step: f32,
    repulsion: f32,
    force: ForceParams,
}

impl Simulation {
    fn new(graph: &Graph, params: &LayoutParams) -> Self {
        let n = graph.node_count();
        let spacing = min_spacing(graph, params);
        let pinned = params.anchor.as_deref().and_then(|id| graph.node_index(id));

        // Even spread on a circle; a single node lands on the center.
        let radius = if n > 1 {
            (spacing * n as f32 / TAU).max(spacing)
        } else {
            0.0
        };
        let positions = (0..n)
            .map(|i| {
                if Some(i) == pinned {
                    params.center
                } else {
                    Point::from_polar(params.center, radius, -TAU / 4.0 + TAU * i as f32 / n as f32)
                }
            })
            .collect();

        let bounds = params.bounds.unwrap_or_else(|| {
            let half = (spacing * n as f32 / TAU).max(spacing) * 2.0;
            Bounds::new_from_center(params.center, Size::new(half * 2.0, half * 2.0))
        });

        let topology = topology(graph);
        let edges = topology
            .edge_indices()
            .filter_map(|edge| topology.edge_endpoints(edge))
            .map(|(source, target)| (source.index(), target.index()))
            .collect();

        let repulsion_distance = spacing * params.force.repulsion_multiplier;

        Self {
            positions,
            velocities: vec![Point::default(); n],
            pinned,
            edges,
            center: params.center,
            bounds,
            max_step: spacing,
            repulsion: repulsion_distance * repulsion_distance,
            force: params.force,
        }
    }

    /// One iteration: fresh velocities, repulsion, attraction, one damped move.
    fn step(&mut self) {
        let n = self.positions.len();
        self.velocities.fill(Point::default());

        // Repulsive forces between all pairs
        for i in 0..n {
            for j in (i + 1)..n {
                let delta = self.positions[i].sub_point(self.positions[j]);
                let distance = delta.hypot();
                let direction = if distance > f32::EPSILON {
                    delta.scale(1.0 / distance)
                } else {
                    // Coincident nodes: separate them along a stable direction.
                    Point::from_polar(Point::default(), 1.0, TAU * i as f32 / n as f32)
                };
                let magnitude = self.repulsion / distance.max(1.0).powi(2);
                let push = direction.scale(magnitude);

                self.velocities[i] = self.velocities[i].add_point(push);
                self.velocities[j] = self.velocities[j].sub_point(push);
            }
        }

        // Attractive forces along edges
        for &(source, target) in &self.edges {
            let delta = self.positions[target].sub_point(self.positions[source]);
            let pull = delta.scale(self.force.attraction);

            self.velocities[source] = self.velocities[source].add_point(pull);
            self.velocities[target] = self.velocities[target].sub_point(pull);
        }

        for i in 0..n {
            if Some(i) == self.pinned {
                self.positions[i] = self.center;
                continue;
            }

            let mut step = self.velocities[i].scale(self.force.damping);
            let length = step.hypot();
            if length > self.max_step {
                step = step.scale(self.max_step / length);
            }
            if !step.is_finite() {
                continue;
            }
            self.positions[i] = self.bounds.clamp_point(self.positions[i].add_point(step));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring(n: usize) -> Graph {
        let mut graph = Graph::new(false);
        for i in 0..n {
            graph.connect(&format!("n{i}"), &format!("n{}", (i + 1) % n));
        }
        graph
    }

    #[test]
    fn test_pinned_anchor_stays_at_center() {
        let center = Point::new(500.0, 500.0);
        for iterations in [0, 1, 10, 100] {
            let params = LayoutParams::default()
                .with_center(center)
                .with_anchor("n3")
                .with_iterations(iterations);
            let positions = ForceDirected.layout(&ring(6), &params);
            assert_eq!(positions["n3"], center);
        }
    }

    #[test]
    fn test_positions_stay_inside_bounds() {
        let bounds = Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(400.0, 300.0));
        let params = LayoutParams::default()
            .with_center(Point::new(200.0, 150.0))
            .with_bounds(bounds);
        let positions = ForceDirected.layout(&ring(12), &params);

        assert!(positions.values().all(|p| bounds.contains(*p)));
    }

    #[test]
    fn test_deterministic() {
        let params = LayoutParams::default().with_iterations(50);
        let first = ForceDirected.layout(&ring(8), &params);
        let second = ForceDirected.layout(&ring(8), &params);
        assert_eq!(first, second);
    }

    #[test]
    fn test_connected_nodes_end_closer_than_unconnected() {
        let mut graph = Graph::new(false);
        graph.connect("a", "b");
        graph.ensure_node("c");
        graph.ensure_node("d");

        let params = LayoutParams::default();
        let positions = ForceDirected.layout(&graph, &params);

        let linked = positions["a"].distance(positions["b"]);
        let unlinked = positions["c"].distance(positions["d"]);
        assert!(linked < unlinked);
    }
}
