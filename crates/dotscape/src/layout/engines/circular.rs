//! Circular layout: one anchor in the middle, everyone else on a ring.

use std::f32::consts::TAU;

use dotscape_core::{geometry::Point, model::Graph};

use crate::layout::{
    LayoutParams, LayoutStrategy, Positions, anchor_index, collect_positions, min_spacing,
    topology,
};

/// Places the anchor at the center and the remaining nodes evenly around it.
///
/// The anchor is [`LayoutParams::anchor`] when it names an existing node,
/// otherwise the highest-degree node. The ring radius grows with the node
/// count so neighbours stay at least the minimum spacing apart, and never
/// drops below [`LayoutParams::min_radius`]. Ring order is insertion order,
/// starting at the top and going clockwise.
#[derive(Debug, Clone, Copy, Default)]
pub struct Circular;

impl LayoutStrategy for Circular {
    fn name(&self) -> &'static str {
        "circular"
    }

    fn layout(&self, graph: &Graph, params: &LayoutParams) -> Positions {
        let Some(anchor) = anchor_index(graph, &topology(graph), params) else {
            return Positions::new();
        };

        let ring = graph.node_count() - 1;
        let spacing = min_spacing(graph, params);
        let radius = params.min_radius.max(spacing * ring as f32 / TAU);

        let mut slot = 0;
        let points = (0..graph.node_count())
            .map(|index| {
                if index == anchor {
                    return params.center;
                }
                let angle = -TAU / 4.0 + TAU * slot as f32 / ring as f32;
                slot += 1;
                Point::from_polar(params.center, radius, angle)
            })
            .collect();

        collect_positions(graph, points)
    }
}
