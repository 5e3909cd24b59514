//! B-spline evaluation
//!
//! A minimal non-rational B-spline over 2D control points, evaluated with
//! de Boor's algorithm. Rational weights are ignored; spline output is
//! explicitly approximate throughout the pipeline.

use cutkit_core::Point2;

/// Why a spline's construction data cannot form a valid basis
#[derive(Debug, Clone, PartialEq)]
pub enum BasisError {
    DegreeTooSmall,
    TooFewControlPoints { have: usize, need: usize },
    KnotCountMismatch { have: usize, need: usize },
    KnotsNotSorted,
}

impl std::fmt::Display for BasisError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DegreeTooSmall => write!(f, "degree must be at least 1"),
            Self::TooFewControlPoints { have, need } => {
                write!(f, "{} control points, need at least {}", have, need)
            }
            Self::KnotCountMismatch { have, need } => {
                write!(f, "{} knots, expected {}", have, need)
            }
            Self::KnotsNotSorted => write!(f, "knot vector is not non-decreasing"),
        }
    }
}

/// A validated B-spline basis
#[derive(Debug, Clone)]
pub struct BSpline {
    control_points: Vec<Point2>,
    degree: usize,
    knots: Vec<f64>,
}

impl BSpline {
    /// Build from explicit construction data. The knot vector must hold
    /// `control_points + degree + 1` non-decreasing values.
    pub fn new(
        control_points: Vec<Point2>,
        degree: i32,
        knots: Vec<f64>,
    ) -> Result<Self, BasisError> {
        if degree < 1 {
            return Err(BasisError::DegreeTooSmall);
        }
        let degree = degree as usize;
        let n = control_points.len();
        if n < degree + 1 {
            return Err(BasisError::TooFewControlPoints {
                have: n,
                need: degree + 1,
            });
        }
        let expected_knots = n + degree + 1;
        if knots.len() != expected_knots {
            return Err(BasisError::KnotCountMismatch {
                have: knots.len(),
                need: expected_knots,
            });
        }
        if knots.windows(2).any(|w| w[1] < w[0]) {
            return Err(BasisError::KnotsNotSorted);
        }
        Ok(Self {
            control_points,
            degree,
            knots,
        })
    }

    /// Build with a generated clamped uniform knot vector, for splines whose
    /// file-supplied knots are missing or unusable.
    pub fn clamped_uniform(control_points: Vec<Point2>, degree: i32) -> Result<Self, BasisError> {
        if degree < 1 {
            return Err(BasisError::DegreeTooSmall);
        }
        let p = degree as usize;
        let n = control_points.len();
        if n < p + 1 {
            return Err(BasisError::TooFewControlPoints { have: n, need: p + 1 });
        }

        let interior = n - p - 1;
        let mut knots = Vec::with_capacity(n + p + 1);
        knots.extend(std::iter::repeat(0.0).take(p + 1));
        for i in 1..=interior {
            knots.push(i as f64 / (interior + 1) as f64);
        }
        knots.extend(std::iter::repeat(1.0).take(p + 1));

        Self::new(control_points, degree, knots)
    }

    /// Parameter range over which the basis is fully defined
    pub fn domain(&self) -> (f64, f64) {
        (
            self.knots[self.degree],
            self.knots[self.control_points.len()],
        )
    }

    /// Evaluate at parameter `t` (clamped into the domain) via de Boor
    pub fn point(&self, t: f64) -> Point2 {
        let p = self.degree;
        let n = self.control_points.len();
        let (lo, hi) = self.domain();
        let t = t.clamp(lo, hi);

        // Knot span index k with knots[k] <= t < knots[k+1]; the closed end
        // of the domain belongs to the last non-empty span.
        let mut k = n - 1;
        if t < hi {
            for i in p..n {
                if self.knots[i] <= t && t < self.knots[i + 1] {
                    k = i;
                    break;
                }
            }
        }

        let mut d: Vec<Point2> = (0..=p).map(|j| self.control_points[j + k - p]).collect();
        for r in 1..=p {
            for j in (r..=p).rev() {
                let i = j + k - p;
                let denom = self.knots[i + p - r + 1] - self.knots[i];
                let alpha = if denom == 0.0 {
                    0.0
                } else {
                    (t - self.knots[i]) / denom
                };
                d[j] = Point2::new(
                    (1.0 - alpha) * d[j - 1].x + alpha * d[j].x,
                    (1.0 - alpha) * d[j - 1].y + alpha * d[j].y,
                );
            }
        }
        d[p]
    }

    /// Sample `count` points evenly over the domain, endpoints included
    pub fn sample(&self, count: usize) -> Vec<Point2> {
        let count = count.max(2);
        let (lo, hi) = self.domain();
        (0..count)
            .map(|i| {
                let t = lo + (hi - lo) * i as f64 / (count - 1) as f64;
                self.point(t)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_controls() -> Vec<Point2> {
        vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 2.0),
            Point2::new(3.0, 2.0),
            Point2::new(4.0, 0.0),
        ]
    }

    #[test]
    fn test_knot_count_validation() {
        let err = BSpline::new(square_controls(), 3, vec![0.0; 7]).unwrap_err();
        assert_eq!(
            err,
            BasisError::KnotCountMismatch { have: 7, need: 8 }
        );
    }

    #[test]
    fn test_unsorted_knots_rejected() {
        let knots = vec![0.0, 0.0, 0.0, 0.0, 1.0, 0.5, 1.0, 1.0];
        assert_eq!(
            BSpline::new(square_controls(), 3, knots).unwrap_err(),
            BasisError::KnotsNotSorted
        );
    }

    #[test]
    fn test_clamped_endpoints_interpolate() {
        let spline = BSpline::clamped_uniform(square_controls(), 3).unwrap();
        let (lo, hi) = spline.domain();

        let start = spline.point(lo);
        assert!((start.x - 0.0).abs() < 1e-9);
        assert!((start.y - 0.0).abs() < 1e-9);

        let end = spline.point(hi);
        assert!((end.x - 4.0).abs() < 1e-9);
        assert!((end.y - 0.0).abs() < 1e-9);
    }

    #[test]
    fn test_degree_one_is_polyline() {
        let controls = vec![
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(10.0, 10.0),
        ];
        let spline = BSpline::clamped_uniform(controls, 1).unwrap();
        // Midpoint of the first segment
        let p = spline.point(0.25);
        assert!((p.x - 5.0).abs() < 1e-9);
        assert!(p.y.abs() < 1e-9);
    }

    #[test]
    fn test_sample_endpoints_and_count() {
        let spline = BSpline::clamped_uniform(square_controls(), 3).unwrap();
        let samples = spline.sample(100);
        assert_eq!(samples.len(), 100);
        assert!((samples[0].x - 0.0).abs() < 1e-9);
        assert!((samples[99].x - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_curve_stays_in_convex_hull() {
        let spline = BSpline::clamped_uniform(square_controls(), 3).unwrap();
        for p in spline.sample(50) {
            assert!(p.x >= -1e-9 && p.x <= 4.0 + 1e-9);
            assert!(p.y >= -1e-9 && p.y <= 2.0 + 1e-9);
        }
    }
}
