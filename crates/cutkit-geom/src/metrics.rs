//! Cut length and piercing metrics
//!
//! A second, independent consumer of the geometry extractor. Lengths are
//! measured in raw drawing units; piercings count one entry point per entity
//! that produced geometry. Entities that fail extraction contribute neither,
//! with the cause recorded in the tally.

use crate::spline::spline_points;
use cutkit_core::{ErrorTally, Point2};
use cutkit_dxf::DxfEntity;
use serde::{Serialize, Serializer};

/// Cutting metrics for one document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CutMetrics {
    /// Total cut path length, rounded to two decimals on serialization
    #[serde(rename = "totalLength", serialize_with = "round2")]
    pub total_length: f64,
    /// Number of cut entry points (one per entity that produced geometry)
    pub piercings: u32,
}

fn round2<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64((value * 100.0).round() / 100.0)
}

fn chain_length(points: &[Point2], closed: bool) -> f64 {
    let mut length: f64 = points.windows(2).map(|w| w[0].distance_to(&w[1])).sum();
    if closed && points.len() > 1 {
        length += points[points.len() - 1].distance_to(&points[0]);
    }
    length
}

/// Measure total cut length and piercing count over exploded entities.
///
/// `samples` is the metrics-grade spline approximation density, lower than
/// drawing quality since only segment sums are needed.
pub fn measure(entities: &[DxfEntity], samples: usize, tally: &mut ErrorTally) -> CutMetrics {
    let mut total_length = 0.0;
    let mut piercings = 0u32;

    for entity in entities {
        match entity {
            DxfEntity::Line(line) => {
                total_length += line.start.distance_to(&line.end);
                piercings += 1;
            }
            DxfEntity::Circle(circle) => {
                total_length += 2.0 * std::f64::consts::PI * circle.radius;
                piercings += 1;
            }
            DxfEntity::Arc(arc) => {
                total_length += arc.radius * arc.sweep_degrees().to_radians();
                piercings += 1;
            }
            DxfEntity::Polyline(poly) => {
                if poly.vertices.is_empty() {
                    continue;
                }
                total_length += chain_length(&poly.vertices, poly.closed);
                piercings += 1;
            }
            DxfEntity::Spline(spline) => {
                let points = spline_points(spline, samples, tally);
                if points.is_empty() {
                    continue;
                }
                // Consecutive sample distances only; a closed spline's
                // samples already traverse its loop.
                total_length += chain_length(&points, false);
                piercings += 1;
            }
            DxfEntity::Insert(insert) => {
                tally.record("metrics", format!("unexpanded insert {}", insert.block));
            }
        }
    }

    CutMetrics {
        total_length,
        piercings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cutkit_dxf::{DxfArc, DxfCircle, DxfLine, DxfPolyline, DxfSpline};

    #[test]
    fn test_line_and_circle_document() {
        let entities = vec![
            DxfEntity::Line(DxfLine {
                start: Point2::new(0.0, 0.0),
                end: Point2::new(100.0, 0.0),
                layer: "0".to_string(),
            }),
            DxfEntity::Circle(DxfCircle {
                center: Point2::new(0.0, 0.0),
                radius: 50.0,
                layer: "0".to_string(),
            }),
        ];
        let mut tally = ErrorTally::new();
        let metrics = measure(&entities, 1000, &mut tally);

        assert_eq!(metrics.piercings, 2);
        assert!((metrics.total_length - 414.159).abs() < 0.001);

        let json = serde_json::to_string(&metrics).unwrap();
        assert_eq!(json, r#"{"totalLength":414.16,"piercings":2}"#);
    }

    #[test]
    fn test_half_arc_length() {
        let entities = vec![DxfEntity::Arc(DxfArc {
            center: Point2::new(0.0, 0.0),
            radius: 10.0,
            start_angle: 0.0,
            end_angle: 180.0,
            layer: "0".to_string(),
        })];
        let mut tally = ErrorTally::new();
        let metrics = measure(&entities, 1000, &mut tally);

        assert_eq!(metrics.piercings, 1);
        assert!((metrics.total_length - std::f64::consts::PI * 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_wrapped_arc_measures_true_sweep() {
        // 350 -> 10 degrees is a 20-degree arc, not 340
        let entities = vec![DxfEntity::Arc(DxfArc {
            center: Point2::new(0.0, 0.0),
            radius: 90.0,
            start_angle: 350.0,
            end_angle: 10.0,
            layer: "0".to_string(),
        })];
        let mut tally = ErrorTally::new();
        let metrics = measure(&entities, 1000, &mut tally);

        let expected = 90.0 * 20.0_f64.to_radians();
        assert!((metrics.total_length - expected).abs() < 1e-9);
    }

    #[test]
    fn test_closed_polyline_includes_closing_segment() {
        let entities = vec![DxfEntity::Polyline(DxfPolyline {
            vertices: vec![
                Point2::new(0.0, 0.0),
                Point2::new(10.0, 0.0),
                Point2::new(10.0, 10.0),
            ],
            closed: true,
            layer: "0".to_string(),
        })];
        let mut tally = ErrorTally::new();
        let metrics = measure(&entities, 1000, &mut tally);

        // 10 + 10 + sqrt(200)
        assert!((metrics.total_length - 34.142).abs() < 0.001);
        assert_eq!(metrics.piercings, 1);
    }

    #[test]
    fn test_open_polyline_has_no_closing_segment() {
        let entities = vec![DxfEntity::Polyline(DxfPolyline {
            vertices: vec![
                Point2::new(0.0, 0.0),
                Point2::new(10.0, 0.0),
                Point2::new(10.0, 10.0),
            ],
            closed: false,
            layer: "0".to_string(),
        })];
        let mut tally = ErrorTally::new();
        let metrics = measure(&entities, 1000, &mut tally);
        assert!((metrics.total_length - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_failed_spline_is_not_a_piercing() {
        let entities = vec![DxfEntity::Spline(DxfSpline {
            degree: 3,
            control_points: Vec::new(),
            fit_points: Vec::new(),
            knots: Vec::new(),
            weights: Vec::new(),
            closed: false,
            layer: "0".to_string(),
        })];
        let mut tally = ErrorTally::new();
        let metrics = measure(&entities, 1000, &mut tally);

        assert_eq!(metrics.piercings, 0);
        assert_eq!(metrics.total_length, 0.0);
        assert!(!tally.is_empty());
    }

    #[test]
    fn test_spline_length_close_to_control_polygon_chord() {
        // A degree-1 spline with a valid basis is exactly its control chain
        let entities = vec![DxfEntity::Spline(DxfSpline {
            degree: 1,
            control_points: vec![Point2::new(0.0, 0.0), Point2::new(30.0, 40.0)],
            fit_points: Vec::new(),
            knots: vec![0.0, 0.0, 1.0, 1.0],
            weights: Vec::new(),
            closed: false,
            layer: "0".to_string(),
        })];
        let mut tally = ErrorTally::new();
        let metrics = measure(&entities, 1000, &mut tally);

        assert!((metrics.total_length - 50.0).abs() < 1e-6);
        assert_eq!(metrics.piercings, 1);
    }
}
