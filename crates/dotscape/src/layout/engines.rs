//! Layout strategy selection.
//!
//! [`LayoutAlgorithm`] names the five built-in strategies and resolves the
//! engine names used in DOT files (`dot`, `neato`, `twopi`, ...) onto them.

mod circular;
mod force;
mod grid;
mod hierarchical;
mod radial;

pub use circular::Circular;
pub use force::ForceDirected;
pub use grid::Grid;
pub use hierarchical::Hierarchical;
pub use radial::Radial;

use std::{fmt, str::FromStr};

use log::{debug, warn};

use dotscape_core::model::Graph;

use crate::layout::{LayoutParams, LayoutStrategy, Positions};

/// The built-in layout strategies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum LayoutAlgorithm {
    #[default]
    Circular,
    Grid,
    Hierarchical,
    ForceDirected,
    Radial,
}

impl LayoutAlgorithm {
    /// All strategies, in declaration order.
    pub const ALL: [LayoutAlgorithm; 5] = [
        LayoutAlgorithm::Circular,
        LayoutAlgorithm::Grid,
        LayoutAlgorithm::Hierarchical,
        LayoutAlgorithm::ForceDirected,
        LayoutAlgorithm::Radial,
    ];

    /// Resolves a strategy name or alias, case-insensitively.
    ///
    /// Unknown names fall back to [`LayoutAlgorithm::Circular`].
    pub fn from_name(name: &str) -> Self {
        name.parse().unwrap_or_else(|_| {
            warn!(name; "Unknown layout algorithm, falling back to circular");
            LayoutAlgorithm::Circular
        })
    }

    /// The strategy implementing this algorithm.
    pub fn strategy(self) -> &'static dyn LayoutStrategy {
        match self {
            LayoutAlgorithm::Circular => &Circular,
            LayoutAlgorithm::Grid => &Grid,
            LayoutAlgorithm::Hierarchical => &Hierarchical,
            LayoutAlgorithm::ForceDirected => &ForceDirected,
            LayoutAlgorithm::Radial => &Radial,
        }
    }

    /// Runs this algorithm's strategy on `graph`.
    pub fn layout(self, graph: &Graph, params: &LayoutParams) -> Positions {
        debug!(
            algorithm = self.strategy().name(),
            nodes = graph.node_count(),
            edges = graph.edge_count();
            "Running layout"
        );
        self.strategy().layout(graph, params)
    }
}

impl FromStr for LayoutAlgorithm {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "circular" | "circle" | "circo" => Ok(Self::Circular),
            "grid" | "osage" | "box" => Ok(Self::Grid),
            "hierarchical" | "tree" | "dot" | "layered" => Ok(Self::Hierarchical),
            "force" | "force-directed" | "forcedirected" | "fdp" | "neato" | "sfdp" | "spring" => {
                Ok(Self::ForceDirected)
            }
            "radial" | "twopi" | "concentric" => Ok(Self::Radial),
            _ => Err("Unsupported layout algorithm"),
        }
    }
}

impl From<LayoutAlgorithm> for &'static str {
    fn from(val: LayoutAlgorithm) -> Self {
        val.strategy().name()
    }
}

impl fmt::Display for LayoutAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s: &'static str = (*self).into();
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_aliases() {
        let cases = [
            ("circular", LayoutAlgorithm::Circular),
            ("circo", LayoutAlgorithm::Circular),
            ("OSAGE", LayoutAlgorithm::Grid),
            ("box", LayoutAlgorithm::Grid),
            ("dot", LayoutAlgorithm::Hierarchical),
            ("layered", LayoutAlgorithm::Hierarchical),
            ("neato", LayoutAlgorithm::ForceDirected),
            ("force-directed", LayoutAlgorithm::ForceDirected),
            ("sfdp", LayoutAlgorithm::ForceDirected),
            ("twopi", LayoutAlgorithm::Radial),
            (" concentric ", LayoutAlgorithm::Radial),
        ];
        for (name, expected) in cases {
            assert_eq!(LayoutAlgorithm::from_name(name), expected, "name: {name}");
        }
    }

    #[test]
    fn test_unknown_name_falls_back_to_circular() {
        assert_eq!(LayoutAlgorithm::from_name("patchwork"), LayoutAlgorithm::Circular);
        assert!("patchwork".parse::<LayoutAlgorithm>().is_err());
    }

    #[test]
    fn test_display_round_trips_through_from_name() {
        for algorithm in LayoutAlgorithm::ALL {
            assert_eq!(LayoutAlgorithm::from_name(&algorithm.to_string()), algorithm);
        }
    }
}
