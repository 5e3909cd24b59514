//! Conversion configuration
//!
//! Defaults for the normalization envelope and spline sampling densities.
//! The struct is the single source of defaults; there is no config file.

use serde::{Deserialize, Serialize};

/// Tunables for one conversion or metrics run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionConfig {
    /// Ceiling for the final drawing extent (max of width, height) in mm.
    /// Drawings larger than this are clamped down to fit.
    pub target_max_mm: f64,
    /// Extra user-supplied scale multiplier applied on top of the unit factor
    pub user_scale: f64,
    /// Spline sample count for drawing-quality output
    pub drawing_samples: usize,
    /// Spline sample count for metrics-only use
    pub metrics_samples: usize,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            target_max_mm: 3000.0,
            user_scale: 1.0,
            drawing_samples: 10_000,
            metrics_samples: 1_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ConversionConfig::default();
        assert_eq!(config.target_max_mm, 3000.0);
        assert_eq!(config.user_scale, 1.0);
        assert_eq!(config.drawing_samples, 10_000);
        assert_eq!(config.metrics_samples, 1_000);
    }
}
