//! CutKit Geometry Crate
//!
//! The geometry extraction and normalization pipeline:
//! - Per-entity point extraction with closed-form circle/arc bounds
//! - Five-stage spline approximation fallback chain over a de Boor
//!   B-spline evaluator
//! - Drawing bounding-box aggregation
//! - Unit-guess plus envelope-clamp rescale controller
//! - Cut length / piercing metrics
//!
//! Two independent consumers share the extractor: the drawing path
//! (bounding box + emission) and the metrics path. They never share
//! mutable state beyond the caller's error tally.

pub mod bspline;
pub mod extract;
pub mod metrics;
pub mod normalize;
pub mod spline;

pub use bspline::BSpline;
pub use extract::{drawing_bbox, entity_bbox};
pub use metrics::{measure, CutMetrics};
pub use normalize::{normalize, NormalizeOutcome};
pub use spline::spline_points;
