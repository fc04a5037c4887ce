//! Edge geometry: attachment points and render paths between node
//! rectangles.
//!
//! Geometry is derived from the node rectangles at the time of the call and
//! is never stored in the [`Graph`]. Resolve it again whenever nodes move.
//!
//! # Example
//!
//! ```
//! # use dotscape::geometry::{Bounds, GeometryResolver, Point, Side, Size};
//! # use dotscape::model::RenderKind;
//! let upper = Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(150.0, 40.0));
//! let lower = Bounds::new_from_top_left(Point::new(0.0, 200.0), Size::new(150.0, 40.0));
//!
//! let geometry = GeometryResolver::default().resolve(upper, lower, RenderKind::Curved);
//! assert_eq!(geometry.source_anchor.side, Side::Bottom);
//! assert_eq!(geometry.target_anchor.side, Side::Top);
//! ```

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

pub use dotscape_core::geometry::{Bounds, Point, Size};
use dotscape_core::model::{Edge, Graph, RenderKind};

/// Default control point offset, as a fraction of the anchor span.
pub const DEFAULT_CURVATURE: f32 = 0.25;

/// A side of a node rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

impl Side {
    /// Midpoint of this side of `bounds`.
    pub fn anchor(self, bounds: Bounds) -> Point {
        let center = bounds.center();
        match self {
            Side::Top => Point::new(center.x(), bounds.min_y()),
            Side::Right => Point::new(bounds.max_x(), center.y()),
            Side::Bottom => Point::new(center.x(), bounds.max_y()),
            Side::Left => Point::new(bounds.min_x(), center.y()),
        }
    }

    /// Unit vector pointing away from the rectangle.
    pub fn outward(self) -> Point {
        match self {
            Side::Top => Point::new(0.0, -1.0),
            Side::Right => Point::new(1.0, 0.0),
            Side::Bottom => Point::new(0.0, 1.0),
            Side::Left => Point::new(-1.0, 0.0),
        }
    }

    /// Returns `true` for left and right.
    pub fn is_horizontal(self) -> bool {
        matches!(self, Side::Left | Side::Right)
    }
}

/// An attachment point on a node's boundary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Anchor {
    pub side: Side,
    pub point: Point,
}

impl Anchor {
    fn on(bounds: Bounds, side: Side) -> Self {
        Self {
            side,
            point: side.anchor(bounds),
        }
    }
}

/// The drawable path of an edge.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum EdgePath {
    /// A cubic Bézier curve.
    Cubic {
        start: Point,
        control1: Point,
        control2: Point,
        end: Point,
    },
    /// An axis-aligned polyline.
    Elbow { points: Vec<Point> },
}

impl EdgePath {
    /// Renders the path as an SVG path `d` attribute.
    ///
    /// ```
    /// # use dotscape::geometry::{EdgePath, Point};
    /// let path = EdgePath::Elbow {
    ///     points: vec![Point::new(0.0, 0.0), Point::new(0.0, 10.0), Point::new(5.0, 10.0)],
    /// };
    /// assert_eq!(path.to_svg_path(), "M 0 0 L 0 10 L 5 10");
    /// ```
    pub fn to_svg_path(&self) -> String {
        let mut d = String::new();
        match self {
            EdgePath::Cubic {
                start,
                control1,
                control2,
                end,
            } => {
                let _ = write!(
                    d,
                    "M {} {} C {} {}, {} {}, {} {}",
                    start.x(),
                    start.y(),
                    control1.x(),
                    control1.y(),
                    control2.x(),
                    control2.y(),
                    end.x(),
                    end.y()
                );
            }
            EdgePath::Elbow { points } => {
                for (i, point) in points.iter().enumerate() {
                    let command = if i == 0 { "M" } else { " L" };
                    let _ = write!(d, "{command} {} {}", point.x(), point.y());
                }
            }
        }
        d
    }

    /// First point of the path.
    pub fn start(&self) -> Option<Point> {
        match self {
            EdgePath::Cubic { start, .. } => Some(*start),
            EdgePath::Elbow { points } => points.first().copied(),
        }
    }

    /// Last point of the path.
    pub fn end(&self) -> Option<Point> {
        match self {
            EdgePath::Cubic { end, .. } => Some(*end),
            EdgePath::Elbow { points } => points.last().copied(),
        }
    }
}

/// Anchors and path for one edge.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeGeometry {
    pub source_anchor: Anchor,
    pub target_anchor: Anchor,
    pub path: EdgePath,
}

/// The fixed sides used by orthogonal edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OrthogonalPorts {
    pub source: Side,
    pub target: Side,
}

impl Default for OrthogonalPorts {
    fn default() -> Self {
        Self {
            source: Side::Bottom,
            target: Side::Top,
        }
    }
}

/// Computes edge geometry from node rectangles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometryResolver {
    curvature: f32,
    ports: OrthogonalPorts,
}

impl Default for GeometryResolver {
    fn default() -> Self {
        Self {
            curvature: DEFAULT_CURVATURE,
            ports: OrthogonalPorts::default(),
        }
    }
}

impl GeometryResolver {
    pub fn new(curvature: f32, ports: OrthogonalPorts) -> Self {
        Self { curvature, ports }
    }

    /// Set the control point offset fraction for curved edges
    pub fn with_curvature(mut self, curvature: f32) -> Self {
        self.curvature = curvature;
        self
    }

    /// Set the sides used by orthogonal edges
    pub fn with_ports(mut self, ports: OrthogonalPorts) -> Self {
        self.ports = ports;
        self
    }

    pub fn curvature(&self) -> f32 {
        self.curvature
    }

    pub fn ports(&self) -> OrthogonalPorts {
        self.ports
    }

    /// Picks the facing sides of two rectangles.
    ///
    /// Horizontal displacement between the centers wins only when strictly
    /// larger than the vertical one; ties resolve to top/bottom.
    pub fn facing_sides(source: Bounds, target: Bounds) -> (Side, Side) {
        let delta = target.center().sub_point(source.center());
        if delta.x().abs() > delta.y().abs() {
            if delta.x() > 0.0 {
                (Side::Right, Side::Left)
            } else {
                (Side::Left, Side::Right)
            }
        } else if delta.y() >= 0.0 {
            (Side::Bottom, Side::Top)
        } else {
            (Side::Top, Side::Bottom)
        }
    }

    /// Resolves anchors and a path between two rectangles.
    pub fn resolve(&self, source: Bounds, target: Bounds, kind: RenderKind) -> EdgeGeometry {
        match kind {
            RenderKind::Curved => self.resolve_curved(source, target),
            RenderKind::Orthogonal => self.resolve_orthogonal(source, target),
        }
    }

    /// Resolves geometry for `edge` against the current node rectangles.
    ///
    /// Returns `None` when either endpoint is not in `graph`.
    pub fn resolve_edge(&self, graph: &Graph, edge: &Edge) -> Option<EdgeGeometry> {
        let source = graph.node_bounds(edge.source())?;
        let target = graph.node_bounds(edge.target())?;
        Some(self.resolve(source, target, edge.render_kind()))
    }

    fn resolve_curved(&self, source: Bounds, target: Bounds) -> EdgeGeometry {
        let (source_side, target_side) = Self::facing_sides(source, target);
        let source_anchor = Anchor::on(source, source_side);
        let target_anchor = Anchor::on(target, target_side);

        let delta = target_anchor.point.sub_point(source_anchor.point);
        let span = if source_side.is_horizontal() {
            delta.x().abs()
        } else {
            delta.y().abs()
        };
        let offset = span * self.curvature;

        let path = EdgePath::Cubic {
            start: source_anchor.point,
            control1: source_anchor
                .point
                .add_point(source_side.outward().scale(offset)),
            control2: target_anchor
                .point
                .add_point(target_side.outward().scale(offset)),
            end: target_anchor.point,
        };

        EdgeGeometry {
            source_anchor,
            target_anchor,
            path,
        }
    }

    fn resolve_orthogonal(&self, source: Bounds, target: Bounds) -> EdgeGeometry {
        let source_anchor = Anchor::on(source, self.ports.source);
        let target_anchor = Anchor::on(target, self.ports.target);
        let start = source_anchor.point;
        let end = target_anchor.point;

        let mut points = vec![start];
        match (
            self.ports.source.is_horizontal(),
            self.ports.target.is_horizontal(),
        ) {
            (false, false) => {
                let mid_y = (start.y() + end.y()) / 2.0;
                points.push(Point::new(start.x(), mid_y));
                points.push(Point::new(end.x(), mid_y));
            }
            (true, true) => {
                let mid_x = (start.x() + end.x()) / 2.0;
                points.push(Point::new(mid_x, start.y()));
                points.push(Point::new(mid_x, end.y()));
            }
            (false, true) => points.push(Point::new(start.x(), end.y())),
            (true, false) => points.push(Point::new(end.x(), start.y())),
        }
        points.push(end);
        points.dedup();

        EdgeGeometry {
            source_anchor,
            target_anchor,
            path: EdgePath::Elbow { points },
        }
    }
}
