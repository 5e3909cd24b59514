//! 2D geometry primitives
//!
//! Points are plain (x, y) pairs in drawing units or millimeters; the scale
//! in effect is tracked by the caller, never baked into stored coordinates.

use serde::{Deserialize, Serialize};

/// A 2D point. Coordinates are drawing units before scaling, millimeters
/// after.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance_to(&self, other: &Point2) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn scaled(&self, factor: f64) -> Point2 {
        Point2::new(self.x * factor, self.y * factor)
    }
}

/// Axis-aligned bounding box in millimeters.
///
/// Invariant: `min_x <= max_x` and `min_y <= max_y`. A drawing with no
/// contributing geometry has no bounding box at all (`Option<BoundingBox>`);
/// this type is never constructed from an empty point set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Bounding box of a single point
    pub fn from_point(p: Point2) -> Self {
        Self {
            min_x: p.x,
            min_y: p.y,
            max_x: p.x,
            max_y: p.y,
        }
    }

    /// Bounding box of a point sequence; `None` when the sequence is empty
    pub fn from_points(points: &[Point2]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut bbox = Self::from_point(*first);
        for p in rest {
            bbox.include(*p);
        }
        Some(bbox)
    }

    /// Grow to contain a point
    pub fn include(&mut self, p: Point2) {
        self.min_x = self.min_x.min(p.x);
        self.min_y = self.min_y.min(p.y);
        self.max_x = self.max_x.max(p.x);
        self.max_y = self.max_y.max(p.y);
    }

    /// Smallest box containing both operands
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Larger of width and height; the extent checked against the target
    /// envelope and fed to the unit-guess heuristic
    pub fn max_extent(&self) -> f64 {
        self.width().max(self.height())
    }

    /// Scale all four bounds uniformly about the origin
    pub fn scaled(&self, factor: f64) -> BoundingBox {
        BoundingBox {
            min_x: self.min_x * factor,
            min_y: self.min_y * factor,
            max_x: self.max_x * factor,
            max_y: self.max_y * factor,
        }
    }
}
