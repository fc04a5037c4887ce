//! Grid layout.

use dotscape_core::{geometry::Point, model::Graph};

use crate::layout::{LayoutParams, LayoutStrategy, Positions, collect_positions, min_spacing};

/// Row-major grid centered on [`LayoutParams::center`].
///
/// Uses `ceil(sqrt(n))` columns unless [`LayoutParams::grid_columns`] is set.
/// Every cell is the minimum spacing wide and tall.
#[derive(Debug, Clone, Copy, Default)]
pub struct Grid;

impl LayoutStrategy for Grid {
    fn name(&self) -> &'static str {
        "grid"
    }

    fn layout(&self, graph: &Graph, params: &LayoutParams) -> Positions {
        let n = graph.node_count();
        if n == 0 {
            return Positions::new();
        }

        let columns = params
            .grid_columns
            .filter(|&columns| columns > 0)
            .unwrap_or_else(|| (n as f32).sqrt().ceil() as usize)
            .min(n);
        let rows = n.div_ceil(columns);
        let cell = min_spacing(graph, params);

        let origin = Point::new(
            params.center.x() - (columns - 1) as f32 * cell / 2.0,
            params.center.y() - (rows - 1) as f32 * cell / 2.0,
        );

        let points = (0..n)
            .map(|index| {
                let row = index / columns;
                let column = index % columns;
                origin.add_point(Point::new(column as f32 * cell, row as f32 * cell))
            })
            .collect();

        collect_positions(graph, points)
    }
}
