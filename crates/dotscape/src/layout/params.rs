//! Parameters shared by the layout strategies.

use serde::Deserialize;

use dotscape_core::geometry::{Bounds, Point};

/// Parameters for a single layout run.
///
/// Every strategy reads the fields it needs and ignores the rest.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutParams {
    /// Where the anchor (or the single node) is placed.
    pub center: Point,
    /// Base spacing between neighbouring nodes.
    pub spacing: f32,
    /// Padding added to the widest node when deriving the minimum spacing.
    pub padding: f32,
    /// Base distance between hierarchy ranks.
    pub rank_spacing: f32,
    /// Minimum circle radius of the circular strategy.
    pub min_radius: f32,
    /// Grid column count; `None` means `ceil(sqrt(n))`.
    pub grid_columns: Option<usize>,
    /// Id of the node that is centered or pinned.
    pub anchor: Option<String>,
    /// Bounding rectangle for the force simulation.
    pub bounds: Option<Bounds>,
    pub force: ForceParams,
    pub radial: RadialParams,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            center: Point::default(),
            spacing: 180.0,
            padding: 40.0,
            rank_spacing: 120.0,
            min_radius: 200.0,
            grid_columns: None,
            anchor: None,
            bounds: None,
            force: ForceParams::default(),
            radial: RadialParams::default(),
        }
    }
}

impl LayoutParams {
    /// Set the center point
    pub fn with_center(mut self, center: Point) -> Self {
        self.center = center;
        self
    }

    /// Set the base spacing between nodes
    pub fn with_spacing(mut self, spacing: f32) -> Self {
        self.spacing = spacing;
        self
    }

    /// Set the padding added to the widest node
    pub fn with_padding(mut self, padding: f32) -> Self {
        self.padding = padding;
        self
    }

    /// Set the base distance between ranks
    pub fn with_rank_spacing(mut self, rank_spacing: f32) -> Self {
        self.rank_spacing = rank_spacing;
        self
    }

    /// Set the minimum radius of the circular strategy
    pub fn with_min_radius(mut self, min_radius: f32) -> Self {
        self.min_radius = min_radius;
        self
    }

    /// Override the number of grid columns
    pub fn with_grid_columns(mut self, columns: usize) -> Self {
        self.grid_columns = Some(columns);
        self
    }

    /// Designate the anchor node by id
    pub fn with_anchor(mut self, anchor: impl Into<String>) -> Self {
        self.anchor = Some(anchor.into());
        self
    }

    /// Set the bounding rectangle of the force simulation
    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = Some(bounds);
        self
    }

    /// Set the number of force simulation iterations
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.force.iterations = iterations;
        self
    }

    pub fn with_force(mut self, force: ForceParams) -> Self {
        self.force = force;
        self
    }

    pub fn with_radial(mut self, radial: RadialParams) -> Self {
        self.radial = radial;
        self
    }
}

/// Force simulation settings.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ForceParams {
    /// Fixed number of simulation steps.
    pub iterations: usize,
    /// Spring coefficient applied along every edge.
    pub attraction: f32,
    /// Scales the minimum spacing into the repulsion constant.
    pub repulsion_multiplier: f32,
    /// Fraction of the accumulated force applied per step.
    pub damping: f32,
}

impl Default for ForceParams {
    fn default() -> Self {
        Self {
            iterations: 300,
            attraction: 0.01,
            repulsion_multiplier: 1.5,
            damping: 0.85,
        }
    }
}

/// Radial ring settings.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct RadialParams {
    /// Radius offset shared by all rings.
    pub base_radius: f32,
    /// Radius added per level.
    pub radius_step: f32,
}

impl Default for RadialParams {
    fn default() -> Self {
        Self {
            base_radius: 60.0,
            radius_step: 200.0,
        }
    }
}
