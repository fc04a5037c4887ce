//! Configuration types for Dotscape layout and edge geometry.
//!
//! This module provides configuration structures that control how graphs
//! are laid out and how edge paths are resolved. All types implement
//! [`serde::Deserialize`] for loading from external sources, and every
//! field falls back to its default when absent.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining layout and geometry settings.
//! - [`LayoutConfig`] - Selects the layout algorithm and its parameters.
//! - [`GeometryConfig`] - Controls edge curvature and orthogonal ports.
//!
//! # Example
//!
//! ```
//! # use dotscape::config::AppConfig;
//! let config = AppConfig::default();
//! assert!(config.layout().algorithm().is_none());
//! assert_eq!(config.layout().params().spacing, 180.0);
//! ```

use serde::Deserialize;

use dotscape_core::geometry::Point;

use crate::{
    geometry::{DEFAULT_CURVATURE, GeometryResolver, OrthogonalPorts},
    layout::{ForceParams, LayoutAlgorithm, LayoutParams, RadialParams},
};

/// Top-level application configuration combining layout and geometry
/// settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Layout configuration section.
    #[serde(default)]
    layout: LayoutConfig,

    /// Edge geometry configuration section.
    #[serde(default)]
    geometry: GeometryConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] with the specified layout and geometry configurations.
    pub fn new(layout: LayoutConfig, geometry: GeometryConfig) -> Self {
        Self { layout, geometry }
    }

    /// Returns the layout configuration.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Returns a mutable reference to the layout configuration.
    pub fn layout_mut(&mut self) -> &mut LayoutConfig {
        &mut self.layout
    }

    /// Returns the geometry configuration.
    pub fn geometry(&self) -> &GeometryConfig {
        &self.geometry
    }
}

/// Layout algorithm selection and parameters.
///
/// When no algorithm is configured, the graph's own `layout` attribute
/// decides, then [`LayoutAlgorithm::Circular`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Algorithm name or alias, e.g. `"hierarchical"` or `"neato"`.
    algorithm: Option<String>,
    /// Id of the node to center or pin.
    anchor: Option<String>,
    spacing: f32,
    padding: f32,
    rank_spacing: f32,
    center: Point,
    /// Minimum radius of the circular layout.
    min_radius: f32,
    grid_columns: Option<usize>,
    force: ForceParams,
    radial: RadialParams,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        let params = LayoutParams::default();
        Self {
            algorithm: None,
            anchor: None,
            spacing: params.spacing,
            padding: params.padding,
            rank_spacing: params.rank_spacing,
            center: params.center,
            min_radius: params.min_radius,
            grid_columns: params.grid_columns,
            force: params.force,
            radial: params.radial,
        }
    }
}

impl LayoutConfig {
    /// Returns the configured algorithm, resolving aliases.
    ///
    /// Unknown names resolve to [`LayoutAlgorithm::Circular`].
    pub fn algorithm(&self) -> Option<LayoutAlgorithm> {
        self.algorithm.as_deref().map(LayoutAlgorithm::from_name)
    }

    /// Returns the configured anchor node id.
    pub fn anchor(&self) -> Option<&str> {
        self.anchor.as_deref()
    }

    /// Sets the algorithm by name, replacing the configured one.
    pub fn with_algorithm(mut self, name: impl Into<String>) -> Self {
        self.algorithm = Some(name.into());
        self
    }

    /// Sets the anchor node id, replacing the configured one.
    pub fn with_anchor(mut self, anchor: impl Into<String>) -> Self {
        self.anchor = Some(anchor.into());
        self
    }

    /// Builds the [`LayoutParams`] for a layout run.
    pub fn params(&self) -> LayoutParams {
        LayoutParams {
            center: self.center,
            spacing: self.spacing,
            padding: self.padding,
            rank_spacing: self.rank_spacing,
            min_radius: self.min_radius,
            grid_columns: self.grid_columns,
            anchor: self.anchor.clone(),
            bounds: None,
            force: self.force,
            radial: self.radial,
        }
    }
}

/// Edge geometry settings.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct GeometryConfig {
    /// Control point offset of curved edges, as a fraction of the span.
    curvature: f32,
    /// Sides used by orthogonal edges.
    orthogonal_ports: OrthogonalPorts,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            curvature: DEFAULT_CURVATURE,
            orthogonal_ports: OrthogonalPorts::default(),
        }
    }
}

impl GeometryConfig {
    pub fn curvature(&self) -> f32 {
        self.curvature
    }

    pub fn orthogonal_ports(&self) -> OrthogonalPorts {
        self.orthogonal_ports
    }

    /// Builds the resolver described by this configuration.
    pub fn resolver(&self) -> GeometryResolver {
        GeometryResolver::new(self.curvature, self.orthogonal_ports)
    }
}
