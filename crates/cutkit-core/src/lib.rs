//! CutKit Core Crate
//!
//! Shared foundation for the CutKit pipeline:
//! - 2D geometry primitives (points, bounding boxes)
//! - Drawing unit codes and the millimeter lookup table
//! - Unit-guess heuristic for drawings with unspecified units
//! - Conversion configuration defaults
//! - Error types and the batch error tally

pub mod config;
pub mod error;
pub mod geometry;
pub mod tally;
pub mod units;

pub use config::ConversionConfig;
pub use error::{ConvertError, DxfError, Result};
pub use geometry::{BoundingBox, Point2};
pub use tally::ErrorTally;
pub use units::{guess_units, DrawingUnits};
