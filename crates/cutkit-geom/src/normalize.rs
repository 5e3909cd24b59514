//! Normalization and rescale controller
//!
//! Resolves the final drawing-unit → millimeter scale in a bounded number of
//! passes:
//!
//! 1. Start from the declared unit code's lookup factor times the user scale
//!    and compute the raw bounding box.
//! 2. When the declared code is unspecified, run the unit-guess heuristic
//!    against the raw extent. The guess fires at most once per document: it
//!    is keyed off the originally observed extent and never re-evaluated
//!    against its own correction.
//! 3. When the (possibly corrected) extent still exceeds the target
//!    envelope, clamp it down proportionally.
//!
//! That is at most two rescale operations; this is not a fixed-point loop.

use crate::extract::drawing_bbox;
use cutkit_core::{guess_units, BoundingBox, ConversionConfig, DrawingUnits, ErrorTally};
use cutkit_dxf::DxfEntity;
use tracing::info;

/// Result of scale resolution for one document
#[derive(Debug, Clone, Copy)]
pub struct NormalizeOutcome {
    /// Final drawing-unit → millimeter factor
    pub scale: f64,
    /// Drawing bounds at the final scale, in millimeters
    pub bbox: BoundingBox,
    /// Unit-guess multiplier that was applied (1.0 when it did not fire)
    pub guess_factor: f64,
    /// Envelope clamp multiplier that was applied (1.0 when within bounds)
    pub clamp_factor: f64,
}

/// Resolve the final scale and bounds for a set of exploded entities.
///
/// Returns `None` when no entity produced geometry; the caller must report
/// the document as empty and skip emission.
pub fn normalize(
    entities: &[DxfEntity],
    units: DrawingUnits,
    config: &ConversionConfig,
    tally: &mut ErrorTally,
) -> Option<NormalizeOutcome> {
    let mut scale = units.to_mm_factor() * config.user_scale;
    let mut bbox = drawing_bbox(entities, scale, config.drawing_samples, tally)?;

    let mut guess_factor = 1.0;
    if units.is_unspecified() {
        let factor = guess_units(bbox.max_extent());
        if factor != 1.0 {
            info!(factor, extent_mm = bbox.max_extent(), "unit guess applied");
            guess_factor = factor;
            scale *= factor;
            bbox = drawing_bbox(entities, scale, config.drawing_samples, tally)?;
        }
    }

    let mut clamp_factor = 1.0;
    let extent = bbox.max_extent();
    if extent > config.target_max_mm {
        clamp_factor = config.target_max_mm / extent;
        info!(
            factor = clamp_factor,
            extent_mm = extent,
            "clamping drawing to target envelope"
        );
        scale *= clamp_factor;
        bbox = bbox.scaled(clamp_factor);
    }

    Some(NormalizeOutcome {
        scale,
        bbox,
        guess_factor,
        clamp_factor,
    })
}
