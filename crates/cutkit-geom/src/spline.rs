//! Spline approximation fallback chain
//!
//! SPLINE entities arrive with wildly varying construction data in the wild:
//! some carry a complete basis (control points + knots + degree), some only
//! fit points, some a control net with a broken knot vector. Extraction
//! tries an ordered list of strategies until one yields at least one point:
//!
//! 1. basis from the entity's own control points, knots, and degree;
//! 2. an interpolating curve through the fit points;
//! 3. the raw fit points verbatim;
//! 4. the raw control points verbatim;
//! 5. a basis rebuilt from the control points and degree with a generated
//!    clamped uniform knot vector.
//!
//! Every stage failure is recorded in the tally and is non-fatal; when all
//! five fail the entity contributes no geometry.

use crate::bspline::BSpline;
use cutkit_core::{ErrorTally, Point2};
use cutkit_dxf::DxfSpline;
use tracing::debug;

type Strategy = fn(&DxfSpline, usize) -> Result<Vec<Point2>, String>;

const STRATEGIES: &[(&str, Strategy)] = &[
    ("spline:evaluator", native_basis),
    ("spline:fit-curve", fit_point_curve),
    ("spline:fit-points", raw_fit_points),
    ("spline:control-points", raw_control_points),
    ("spline:rebuilt-basis", rebuilt_basis),
];

/// Approximate a spline as an ordered point sequence.
///
/// `samples` controls approximation density: drawing-quality output uses a
/// higher count than metrics-only use. Returns an empty sequence when every
/// strategy fails; the failures are already tallied.
pub fn spline_points(spline: &DxfSpline, samples: usize, tally: &mut ErrorTally) -> Vec<Point2> {
    for (stage, strategy) in STRATEGIES {
        match strategy(spline, samples) {
            Ok(points) if !points.is_empty() => return points,
            Ok(_) => tally.record(stage, "produced no points"),
            Err(cause) => {
                debug!(stage, %cause, "spline strategy failed");
                tally.record(stage, cause);
            }
        }
    }
    Vec::new()
}

fn native_basis(spline: &DxfSpline, samples: usize) -> Result<Vec<Point2>, String> {
    let basis = BSpline::new(spline.control_points.clone(), spline.degree, spline.knots.clone())
        .map_err(|e| e.to_string())?;
    Ok(basis.sample(samples))
}

fn fit_point_curve(spline: &DxfSpline, samples: usize) -> Result<Vec<Point2>, String> {
    if spline.fit_points.len() < 2 {
        return Err(format!("{} fit points, need at least 2", spline.fit_points.len()));
    }
    Ok(catmull_rom(&spline.fit_points, samples))
}

fn raw_fit_points(spline: &DxfSpline, _samples: usize) -> Result<Vec<Point2>, String> {
    if spline.fit_points.is_empty() {
        return Err("no fit points".to_string());
    }
    Ok(spline.fit_points.clone())
}

fn raw_control_points(spline: &DxfSpline, _samples: usize) -> Result<Vec<Point2>, String> {
    if spline.control_points.is_empty() {
        return Err("no control points".to_string());
    }
    Ok(spline.control_points.clone())
}

fn rebuilt_basis(spline: &DxfSpline, samples: usize) -> Result<Vec<Point2>, String> {
    let basis = BSpline::clamped_uniform(spline.control_points.clone(), spline.degree)
        .map_err(|e| e.to_string())?;
    Ok(basis.sample(samples))
}

/// Uniform Catmull-Rom interpolation through a point chain, `count` samples
/// over the whole chain with both endpoints included.
fn catmull_rom(points: &[Point2], count: usize) -> Vec<Point2> {
    let count = count.max(2);
    let last = points.len() - 1;
    (0..count)
        .map(|s| {
            let t = s as f64 / (count - 1) as f64 * last as f64;
            let i = (t.floor() as usize).min(last - 1);
            let u = t - i as f64;
            let p0 = points[i.saturating_sub(1)];
            let p1 = points[i];
            let p2 = points[i + 1];
            let p3 = points[(i + 2).min(last)];
            catmull_point(p0, p1, p2, p3, u)
        })
        .collect()
}

fn catmull_point(p0: Point2, p1: Point2, p2: Point2, p3: Point2, t: f64) -> Point2 {
    let t2 = t * t;
    let t3 = t2 * t;
    let eval = |a: f64, b: f64, c: f64, d: f64| {
        0.5 * (2.0 * b
            + (c - a) * t
            + (2.0 * a - 5.0 * b + 4.0 * c - d) * t2
            + (3.0 * b - a - 3.0 * c + d) * t3)
    };
    Point2::new(
        eval(p0.x, p1.x, p2.x, p3.x),
        eval(p0.y, p1.y, p2.y, p3.y),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare_spline() -> DxfSpline {
        DxfSpline {
            degree: 3,
            control_points: Vec::new(),
            fit_points: Vec::new(),
            knots: Vec::new(),
            weights: Vec::new(),
            closed: false,
            layer: "0".to_string(),
        }
    }

    #[test]
    fn test_valid_basis_uses_first_strategy() {
        let mut spline = bare_spline();
        spline.control_points = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 2.0),
            Point2::new(3.0, 2.0),
            Point2::new(4.0, 0.0),
        ];
        spline.knots = vec![0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0];

        let mut tally = ErrorTally::new();
        let points = spline_points(&spline, 200, &mut tally);

        assert!(tally.is_empty());
        assert_eq!(points.len(), 200);
        assert!((points[0].x - 0.0).abs() < 1e-9);
        assert!((points[199].x - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_bad_knots_fall_back_to_fit_curve() {
        let mut spline = bare_spline();
        spline.control_points = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 2.0),
            Point2::new(3.0, 2.0),
            Point2::new(4.0, 0.0),
        ];
        spline.knots = vec![0.0, 1.0]; // unusable
        spline.fit_points = vec![
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 2.0),
            Point2::new(4.0, 0.0),
        ];

        let mut tally = ErrorTally::new();
        let points = spline_points(&spline, 50, &mut tally);

        assert_eq!(points.len(), 50);
        assert_eq!(tally.total(), 1); // the evaluator stage failure
        // Interpolating curve passes through the fit endpoints
        assert!((points[0].x - 0.0).abs() < 1e-9);
        assert!((points[49].x - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_single_fit_point_falls_back_to_raw() {
        let mut spline = bare_spline();
        spline.fit_points = vec![Point2::new(7.0, 7.0)];

        let mut tally = ErrorTally::new();
        let points = spline_points(&spline, 50, &mut tally);

        // Stages 1 and 2 fail, stage 3 returns the verbatim fit point
        assert_eq!(points, vec![Point2::new(7.0, 7.0)]);
        assert_eq!(tally.total(), 2);
    }

    #[test]
    fn test_control_points_without_knots_fall_back_to_raw() {
        let mut spline = bare_spline();
        spline.degree = 2;
        spline.control_points = vec![
            Point2::new(0.0, 0.0),
            Point2::new(5.0, 5.0),
            Point2::new(10.0, 0.0),
        ];

        let mut tally = ErrorTally::new();
        let points = spline_points(&spline, 50, &mut tally);

        // Stage 4 (raw control points) wins before the rebuilt basis runs
        assert_eq!(points.len(), 3);
        assert!(!tally.is_empty());
    }

    #[test]
    fn test_all_strategies_fail_yields_no_geometry() {
        let spline = bare_spline();

        let mut tally = ErrorTally::new();
        let points = spline_points(&spline, 50, &mut tally);

        assert!(points.is_empty());
        assert_eq!(tally.total(), 5);
    }

    #[test]
    fn test_catmull_rom_interpolates_waypoints() {
        let waypoints = vec![
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(10.0, 10.0),
        ];
        let points = catmull_rom(&waypoints, 101);
        // Middle waypoint sits at the chain midpoint parameter
        let mid = points[50];
        assert!((mid.x - 10.0).abs() < 1e-9);
        assert!(mid.y.abs() < 1e-9);
    }
}
