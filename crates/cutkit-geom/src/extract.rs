//! Per-entity geometry extraction and bounding-box aggregation
//!
//! Each entity yields either an ordered point sequence or, for circles and
//! arcs, a closed-form bounding box computed from center and radius without
//! any sampling. Entities that fail to produce geometry are tallied and
//! contribute nothing; the aggregate over a whole drawing is `None` only
//! when no entity contributed at all.

use crate::spline::spline_points;
use cutkit_core::{BoundingBox, ErrorTally, Point2};
use cutkit_dxf::DxfEntity;

/// Bounding box of one entity at the given scale, or `None` when the entity
/// produced no geometry.
pub fn entity_bbox(
    entity: &DxfEntity,
    scale: f64,
    samples: usize,
    tally: &mut ErrorTally,
) -> Option<BoundingBox> {
    match entity {
        DxfEntity::Line(line) => BoundingBox::from_points(&[
            line.start.scaled(scale),
            line.end.scaled(scale),
        ]),
        // Closed form: center +/- radius. Arcs use the full-circle box; the
        // drawing envelope cares about worst-case extent, not tight arcs.
        DxfEntity::Circle(circle) => {
            let c = circle.center.scaled(scale);
            let r = circle.radius * scale;
            Some(BoundingBox {
                min_x: c.x - r,
                min_y: c.y - r,
                max_x: c.x + r,
                max_y: c.y + r,
            })
        }
        DxfEntity::Arc(arc) => {
            let c = arc.center.scaled(scale);
            let r = arc.radius * scale;
            Some(BoundingBox {
                min_x: c.x - r,
                min_y: c.y - r,
                max_x: c.x + r,
                max_y: c.y + r,
            })
        }
        DxfEntity::Polyline(poly) => {
            let scaled: Vec<Point2> = poly.vertices.iter().map(|v| v.scaled(scale)).collect();
            BoundingBox::from_points(&scaled)
        }
        DxfEntity::Spline(spline) => {
            let points = spline_points(spline, samples, tally);
            let scaled: Vec<Point2> = points.iter().map(|p| p.scaled(scale)).collect();
            BoundingBox::from_points(&scaled)
        }
        // Inserts must be exploded before extraction; one reaching this
        // point is dropped, never approximated by a box.
        DxfEntity::Insert(insert) => {
            tally.record("bbox", format!("unexpanded insert {}", insert.block));
            None
        }
    }
}

/// Fold all entity boxes into one drawing box. `None` means the drawing has
/// no drawable geometry and conversion must be skipped for this document.
pub fn drawing_bbox(
    entities: &[DxfEntity],
    scale: f64,
    samples: usize,
    tally: &mut ErrorTally,
) -> Option<BoundingBox> {
    entities
        .iter()
        .filter_map(|e| entity_bbox(e, scale, samples, tally))
        .reduce(|acc, b| acc.union(&b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cutkit_dxf::{DxfArc, DxfCircle, DxfInsert, DxfLine, DxfPolyline};

    fn line(x1: f64, y1: f64, x2: f64, y2: f64) -> DxfEntity {
        DxfEntity::Line(DxfLine {
            start: Point2::new(x1, y1),
            end: Point2::new(x2, y2),
            layer: "0".to_string(),
        })
    }

    #[test]
    fn test_line_bbox_is_endpoint_box() {
        let mut tally = ErrorTally::new();
        let bbox = entity_bbox(&line(10.0, -5.0, 2.0, 8.0), 1.0, 100, &mut tally).unwrap();
        assert_eq!(bbox.min_x, 2.0);
        assert_eq!(bbox.min_y, -5.0);
        assert_eq!(bbox.max_x, 10.0);
        assert_eq!(bbox.max_y, 8.0);
    }

    #[test]
    fn test_circle_bbox_closed_form() {
        let circle = DxfEntity::Circle(DxfCircle {
            center: Point2::new(10.0, 10.0),
            radius: 4.0,
            layer: "0".to_string(),
        });
        let mut tally = ErrorTally::new();
        let bbox = entity_bbox(&circle, 2.0, 100, &mut tally).unwrap();
        assert_eq!(bbox.min_x, 12.0);
        assert_eq!(bbox.max_x, 28.0);
        assert_eq!(bbox.min_y, 12.0);
        assert_eq!(bbox.max_y, 28.0);
    }

    #[test]
    fn test_arc_uses_full_circle_box() {
        let arc = DxfEntity::Arc(DxfArc {
            center: Point2::new(0.0, 0.0),
            radius: 5.0,
            start_angle: 0.0,
            end_angle: 90.0,
            layer: "0".to_string(),
        });
        let mut tally = ErrorTally::new();
        let bbox = entity_bbox(&arc, 1.0, 100, &mut tally).unwrap();
        assert_eq!(bbox.min_x, -5.0);
        assert_eq!(bbox.max_y, 5.0);
    }

    #[test]
    fn test_empty_polyline_contributes_nothing() {
        let poly = DxfEntity::Polyline(DxfPolyline {
            vertices: Vec::new(),
            closed: false,
            layer: "0".to_string(),
        });
        let mut tally = ErrorTally::new();
        assert!(entity_bbox(&poly, 1.0, 100, &mut tally).is_none());
        // Empty geometry at this layer is not an error
        assert!(tally.is_empty());
    }

    #[test]
    fn test_unexpanded_insert_is_tallied() {
        let insert = DxfEntity::Insert(DxfInsert {
            block: "GHOST".to_string(),
            insert: Point2::new(0.0, 0.0),
            scale_x: 1.0,
            scale_y: 1.0,
            rotation: 0.0,
            layer: "0".to_string(),
        });
        let mut tally = ErrorTally::new();
        assert!(entity_bbox(&insert, 1.0, 100, &mut tally).is_none());
        assert_eq!(tally.total(), 1);
    }

    #[test]
    fn test_drawing_bbox_folds_entities() {
        let entities = vec![line(0.0, 0.0, 10.0, 0.0), line(-5.0, 2.0, 0.0, 20.0)];
        let mut tally = ErrorTally::new();
        let bbox = drawing_bbox(&entities, 1.0, 100, &mut tally).unwrap();
        assert_eq!(bbox.min_x, -5.0);
        assert_eq!(bbox.max_x, 10.0);
        assert_eq!(bbox.max_y, 20.0);
    }

    #[test]
    fn test_drawing_bbox_empty_drawing() {
        let mut tally = ErrorTally::new();
        assert!(drawing_bbox(&[], 1.0, 100, &mut tally).is_none());
    }
}
