//! Concentric-ring layout around a center node.

use std::f32::consts::TAU;

use log::trace;
use petgraph::{Direction, graph::NodeIndex};

use dotscape_core::{geometry::Point, model::Graph};

use crate::layout::{
    LayoutParams, LayoutStrategy, Positions, anchor_index, collect_positions,
    leveling::longest_path_levels, min_spacing, topology,
};

/// Places the center node in the middle and every other node on the ring
/// of its level.
///
/// Levels follow forward edges only, so a reverse edge never pulls a node
/// closer to the center. Within a ring, nodes are ordered by the circular
/// mean of their parents' angles and then handed evenly spaced slots.
/// Nodes not reachable from the center share one extra outer ring.
#[derive(Debug, Clone, Copy, Default)]
pub struct Radial;

impl LayoutStrategy for Radial {
    fn name(&self) -> &'static str {
        "radial"
    }

    fn layout(&self, graph: &Graph, params: &LayoutParams) -> Positions {
        let topology = topology(graph);
        let Some(center) = anchor_index(graph, &topology, params) else {
            return Positions::new();
        };
        let n = graph.node_count();

        let levels = longest_path_levels(&topology, &[NodeIndex::new(center)]);
        let parents: Vec<Vec<usize>> = topology
            .node_indices()
            .map(|node| {
                topology
                    .neighbors_directed(node, Direction::Incoming)
                    .map(|parent| parent.index())
                    .collect()
            })
            .collect();

        // Rings by level; unreachable nodes form the ring after the last one.
        let deepest = levels.iter().flatten().copied().max().unwrap_or(0);
        let mut rings: Vec<Vec<usize>> = vec![Vec::new(); deepest + 2];
        for (index, level) in levels.iter().enumerate() {
            rings[level.unwrap_or(deepest + 1)].push(index);
        }

        let spacing = min_spacing(graph, params);
        let mut angles: Vec<Option<f32>> = vec![None; n];
        let mut points = vec![params.center; n];

        for (level, members) in rings.iter().enumerate().skip(1) {
            if members.is_empty() {
                continue;
            }

            let mut ordered: Vec<(usize, Option<f32>)> = members
                .iter()
                .map(|&index| (index, circular_mean(&parents[index], &angles)))
                .collect();
            // Stable: nodes without a mean first, insertion order among equals.
            ordered.sort_by(|(_, a), (_, b)| match (a, b) {
                (None, None) => std::cmp::Ordering::Equal,
                (None, Some(_)) => std::cmp::Ordering::Less,
                (Some(_), None) => std::cmp::Ordering::Greater,
                (Some(a), Some(b)) => a.total_cmp(b),
            });

            let count = ordered.len();
            let radius = ring_radius(level, count, spacing, params);
            trace!(level, count, radius; "Radial ring");

            for (slot, (index, _)) in ordered.into_iter().enumerate() {
                let angle = TAU * slot as f32 / count as f32;
                angles[index] = Some(angle);
                points[index] = Point::from_polar(params.center, radius, angle);
            }
        }

        collect_positions(graph, points)
    }
}

/// Radius of the ring at `level` holding `count` nodes.
fn ring_radius(level: usize, count: usize, spacing: f32, params: &LayoutParams) -> f32 {
    let stepped = params.radial.base_radius + level as f32 * params.radial.radius_step;
    stepped.max(count as f32 * spacing / TAU)
}

/// Circular mean of the placed parents' angles, in `[0, 2π)`.
///
/// Returns `None` when no parent has an angle yet or the unit vectors
/// cancel out.
fn circular_mean(parents: &[usize], angles: &[Option<f32>]) -> Option<f32> {
    let (sin, cos, count) = parents
        .iter()
        .filter_map(|&parent| angles[parent])
        .fold((0.0_f32, 0.0_f32, 0usize), |(sin, cos, count), angle| {
            (sin + angle.sin(), cos + angle.cos(), count + 1)
        });
    if count == 0 || sin.hypot(cos) < 1e-6 {
        return None;
    }
    Some(sin.atan2(cos).rem_euclid(TAU))
}
