//! DXF entity model
//!
//! The drawable subset of DXF as a closed enum. All coordinates are 2D (Z is
//! discarded at parse time), all angles are degrees as stored in the file;
//! conversion to radians happens at the trigonometric call site.

use cutkit_core::Point2;
use std::fmt;

/// A straight segment between two points
#[derive(Debug, Clone, PartialEq)]
pub struct DxfLine {
    pub start: Point2,
    pub end: Point2,
    pub layer: String,
}

/// A full circle
#[derive(Debug, Clone, PartialEq)]
pub struct DxfCircle {
    pub center: Point2,
    pub radius: f64,
    pub layer: String,
}

/// A circular arc, counter-clockwise from `start_angle` to `end_angle`
/// (degrees)
#[derive(Debug, Clone, PartialEq)]
pub struct DxfArc {
    pub center: Point2,
    pub radius: f64,
    pub start_angle: f64,
    pub end_angle: f64,
    pub layer: String,
}

impl DxfArc {
    /// Counter-clockwise sweep in degrees, normalized into (0, 360].
    /// A zero-length arc (equal angles) sweeps 0.
    pub fn sweep_degrees(&self) -> f64 {
        let delta = (self.end_angle - self.start_angle).rem_euclid(360.0);
        if delta == 0.0 && (self.end_angle - self.start_angle).abs() > f64::EPSILON {
            360.0
        } else {
            delta
        }
    }

    /// Point on the arc at `angle_deg` degrees
    pub fn point_at(&self, angle_deg: f64) -> Point2 {
        let rad = angle_deg.to_radians();
        Point2::new(
            self.center.x + self.radius * rad.cos(),
            self.center.y + self.radius * rad.sin(),
        )
    }
}

/// An open or closed vertex chain (LWPOLYLINE or legacy POLYLINE).
/// When closed, the last vertex implicitly connects back to the first;
/// the closing point is not duplicated in `vertices`.
#[derive(Debug, Clone, PartialEq)]
pub struct DxfPolyline {
    pub vertices: Vec<Point2>,
    pub closed: bool,
    pub layer: String,
}

/// A B-spline curve, kept as its raw construction data.
///
/// Exact NURBS evaluation is out of scope; the geometry extractor
/// approximates this entity through an ordered fallback chain over these
/// fields.
#[derive(Debug, Clone, PartialEq)]
pub struct DxfSpline {
    pub degree: i32,
    pub control_points: Vec<Point2>,
    pub fit_points: Vec<Point2>,
    pub knots: Vec<f64>,
    pub weights: Vec<f64>,
    pub closed: bool,
    pub layer: String,
}

/// A block reference. Not drawable itself; must be exploded into its
/// block's constituent entities before geometry extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct DxfInsert {
    pub block: String,
    pub insert: Point2,
    pub scale_x: f64,
    pub scale_y: f64,
    /// Rotation in degrees
    pub rotation: f64,
    pub layer: String,
}

/// One CAD drawing primitive
#[derive(Debug, Clone, PartialEq)]
pub enum DxfEntity {
    Line(DxfLine),
    Circle(DxfCircle),
    Arc(DxfArc),
    Polyline(DxfPolyline),
    Spline(DxfSpline),
    Insert(DxfInsert),
}

/// Entity kind tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DxfEntityType {
    Line,
    Circle,
    Arc,
    Polyline,
    Spline,
    Insert,
}

impl fmt::Display for DxfEntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Line => write!(f, "LINE"),
            Self::Circle => write!(f, "CIRCLE"),
            Self::Arc => write!(f, "ARC"),
            Self::Polyline => write!(f, "POLYLINE"),
            Self::Spline => write!(f, "SPLINE"),
            Self::Insert => write!(f, "INSERT"),
        }
    }
}

impl DxfEntity {
    pub fn entity_type(&self) -> DxfEntityType {
        match self {
            Self::Line(_) => DxfEntityType::Line,
            Self::Circle(_) => DxfEntityType::Circle,
            Self::Arc(_) => DxfEntityType::Arc,
            Self::Polyline(_) => DxfEntityType::Polyline,
            Self::Spline(_) => DxfEntityType::Spline,
            Self::Insert(_) => DxfEntityType::Insert,
        }
    }

    pub fn layer(&self) -> &str {
        match self {
            Self::Line(e) => &e.layer,
            Self::Circle(e) => &e.layer,
            Self::Arc(e) => &e.layer,
            Self::Polyline(e) => &e.layer,
            Self::Spline(e) => &e.layer,
            Self::Insert(e) => &e.layer,
        }
    }
}
