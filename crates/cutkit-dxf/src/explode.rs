//! Block-insert expansion
//!
//! INSERT entities reference a block definition plus a transform (scale,
//! rotation, translation). They are not drawable themselves; before geometry
//! extraction every insert must be exploded into its block's constituent
//! entities with the transform applied, recursively for nested inserts.
//!
//! Expansion failures (unknown block, reference cycle, a transform the
//! entity kind cannot carry) are recorded in the tally and the affected
//! entity contributes no geometry. A failed insert is never drawn as a
//! placeholder.

use crate::document::{DxfBlock, DxfDocument};
use crate::entities::{DxfArc, DxfCircle, DxfEntity, DxfInsert, DxfLine, DxfPolyline, DxfSpline};
use cutkit_core::{ErrorTally, Point2};
use tracing::debug;

/// Nesting bound for pathological block tables
const MAX_INSERT_DEPTH: usize = 16;

/// Replace every INSERT in the document's modelspace with its block's
/// transformed entities. All other entities pass through unchanged.
pub fn expand_inserts(doc: &DxfDocument, tally: &mut ErrorTally) -> Vec<DxfEntity> {
    let mut out = Vec::new();
    let mut visiting: Vec<String> = Vec::new();
    for entity in doc.modelspace() {
        match entity {
            DxfEntity::Insert(insert) => expand_insert(doc, insert, &mut visiting, tally, &mut out),
            other => out.push(other.clone()),
        }
    }
    out
}

fn expand_insert(
    doc: &DxfDocument,
    insert: &DxfInsert,
    visiting: &mut Vec<String>,
    tally: &mut ErrorTally,
    out: &mut Vec<DxfEntity>,
) {
    if visiting.iter().any(|name| name == &insert.block) {
        tally.record("explode", format!("block cycle through {}", insert.block));
        return;
    }
    if visiting.len() >= MAX_INSERT_DEPTH {
        tally.record("explode", "insert nesting too deep");
        return;
    }
    let Some(block) = doc.block(&insert.block) else {
        tally.record("explode", format!("unknown block {}", insert.block));
        return;
    };

    debug!(block = %insert.block, depth = visiting.len(), "exploding insert");
    visiting.push(insert.block.clone());
    for entity in &block.entities {
        match entity {
            DxfEntity::Insert(nested) => {
                // Resolve the inner reference first, then lift the results
                // through this insert's transform.
                let mut nested_out = Vec::new();
                expand_insert(doc, nested, visiting, tally, &mut nested_out);
                for resolved in nested_out {
                    if let Some(transformed) =
                        transform_entity(&resolved, insert, block.base, tally)
                    {
                        out.push(transformed);
                    }
                }
            }
            other => {
                if let Some(transformed) = transform_entity(other, insert, block.base, tally) {
                    out.push(transformed);
                }
            }
        }
    }
    visiting.pop();
}

/// Shift into base-relative coordinates, scale, rotate, then translate
fn transform_point(p: Point2, insert: &DxfInsert, base: Point2) -> Point2 {
    let x = (p.x - base.x) * insert.scale_x;
    let y = (p.y - base.y) * insert.scale_y;
    let rad = insert.rotation.to_radians();
    let (sin, cos) = rad.sin_cos();
    Point2::new(
        x * cos - y * sin + insert.insert.x,
        x * sin + y * cos + insert.insert.y,
    )
}

fn is_uniform_scale(insert: &DxfInsert) -> bool {
    (insert.scale_x.abs() - insert.scale_y.abs()).abs() < 1e-9
}

/// Apply an insert's transform to one already-resolved entity.
///
/// Point-based entities carry any affine transform. Circles and arcs keep
/// their circular form only under uniform scaling; an anisotropic insert
/// would turn them into ellipses, which this model cannot represent, so the
/// entity is dropped and tallied instead of being drawn wrong. Arcs
/// additionally reject mirroring, which reverses their winding.
fn transform_entity(
    entity: &DxfEntity,
    insert: &DxfInsert,
    base: Point2,
    tally: &mut ErrorTally,
) -> Option<DxfEntity> {
    match entity {
        DxfEntity::Line(line) => Some(DxfEntity::Line(DxfLine {
            start: transform_point(line.start, insert, base),
            end: transform_point(line.end, insert, base),
            layer: line.layer.clone(),
        })),
        DxfEntity::Polyline(poly) => Some(DxfEntity::Polyline(DxfPolyline {
            vertices: poly
                .vertices
                .iter()
                .map(|v| transform_point(*v, insert, base))
                .collect(),
            closed: poly.closed,
            layer: poly.layer.clone(),
        })),
        DxfEntity::Spline(spline) => Some(DxfEntity::Spline(DxfSpline {
            degree: spline.degree,
            control_points: spline
                .control_points
                .iter()
                .map(|p| transform_point(*p, insert, base))
                .collect(),
            fit_points: spline
                .fit_points
                .iter()
                .map(|p| transform_point(*p, insert, base))
                .collect(),
            knots: spline.knots.clone(),
            weights: spline.weights.clone(),
            closed: spline.closed,
            layer: spline.layer.clone(),
        })),
        DxfEntity::Circle(circle) => {
            if !is_uniform_scale(insert) {
                tally.record("explode", format!("anisotropic scale on CIRCLE in {}", insert.block));
                return None;
            }
            Some(DxfEntity::Circle(DxfCircle {
                center: transform_point(circle.center, insert, base),
                radius: circle.radius * insert.scale_x.abs(),
                layer: circle.layer.clone(),
            }))
        }
        DxfEntity::Arc(arc) => {
            if !is_uniform_scale(insert) {
                tally.record("explode", format!("anisotropic scale on ARC in {}", insert.block));
                return None;
            }
            if insert.scale_x < 0.0 || insert.scale_y < 0.0 {
                tally.record("explode", format!("mirrored ARC in {}", insert.block));
                return None;
            }
            Some(DxfEntity::Arc(DxfArc {
                center: transform_point(arc.center, insert, base),
                radius: arc.radius * insert.scale_x,
                start_angle: arc.start_angle + insert.rotation,
                end_angle: arc.end_angle + insert.rotation,
                layer: arc.layer.clone(),
            }))
        }
        // A nested insert is resolved by the caller before transforming;
        // one surviving to this point is a bookkeeping bug upstream.
        DxfEntity::Insert(nested) => {
            tally.record("explode", format!("unresolved nested insert {}", nested.block));
            None
        }
    }
}
