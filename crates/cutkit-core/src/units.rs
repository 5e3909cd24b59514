//! Drawing unit codes and millimeter conversion
//!
//! DXF headers declare their measurement unit as a small integer code
//! ($INSUNITS). The code governs the initial drawing-unit → millimeter
//! multiplier via a fixed lookup table. Code 0 ("unspecified") maps to 1.0
//! and is the only case where the unit-guess heuristic may run.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Measurement unit declared in a DXF header ($INSUNITS code)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrawingUnits {
    /// Code 0 - no unit declared; candidate for guessing
    Unitless,
    /// Code 1
    Inches,
    /// Code 2
    Feet,
    /// Code 3
    Miles,
    /// Code 4
    Millimeters,
    /// Code 5
    Centimeters,
    /// Code 6
    Meters,
    /// Code 7
    Kilometers,
}

impl Default for DrawingUnits {
    fn default() -> Self {
        Self::Unitless
    }
}

impl fmt::Display for DrawingUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unitless => write!(f, "unitless"),
            Self::Inches => write!(f, "in"),
            Self::Feet => write!(f, "ft"),
            Self::Miles => write!(f, "mi"),
            Self::Millimeters => write!(f, "mm"),
            Self::Centimeters => write!(f, "cm"),
            Self::Meters => write!(f, "m"),
            Self::Kilometers => write!(f, "km"),
        }
    }
}

impl DrawingUnits {
    /// Map an $INSUNITS header code to a unit. Codes outside the table
    /// behave as unitless.
    pub fn from_code(code: i32) -> Self {
        match code {
            1 => Self::Inches,
            2 => Self::Feet,
            3 => Self::Miles,
            4 => Self::Millimeters,
            5 => Self::Centimeters,
            6 => Self::Meters,
            7 => Self::Kilometers,
            _ => Self::Unitless,
        }
    }

    /// Fixed drawing-unit → millimeter multiplier
    pub fn to_mm_factor(&self) -> f64 {
        match self {
            Self::Unitless => 1.0,
            Self::Inches => 25.4,
            Self::Feet => 304.8,
            Self::Miles => 1_609_344.0,
            Self::Millimeters => 1.0,
            Self::Centimeters => 10.0,
            Self::Meters => 1000.0,
            Self::Kilometers => 1_000_000.0,
        }
    }

    /// True for code 0, the only case the guess heuristic applies to
    pub fn is_unspecified(&self) -> bool {
        matches!(self, Self::Unitless)
    }
}

/// Guess a corrective scale factor for a drawing whose declared unit code is
/// unspecified, from its raw bounding-box extent in millimeters.
///
/// Extent below 10 assumes the drawing is in meters mislabeled as unitless
/// (x1000); extent above 5000 assumes inches (x25.4); anything in between is
/// taken as already-correct millimeters. Both comparisons are strict, so an
/// extent of exactly 10 is left alone. The caller must apply this at most
/// once per document.
pub fn guess_units(extent_mm: f64) -> f64 {
    if extent_mm < 10.0 {
        1000.0
    } else if extent_mm > 5000.0 {
        25.4
    } else {
        1.0
    }
}
