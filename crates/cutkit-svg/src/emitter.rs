//! Entity → SVG primitive emission
//!
//! Each drawable entity maps to one SVG element at the final millimeter
//! scale, with the Y axis flipped for the screen-down convention. Emission
//! failures are tallied and the entity is omitted; a failed entity is never
//! replaced by substitute geometry.

use cutkit_core::{ConversionConfig, ErrorTally};
use cutkit_dxf::{DxfArc, DxfEntity};
use cutkit_geom::spline_points;

/// One drawable SVG primitive, stroke black and fill none throughout
#[derive(Debug, Clone, PartialEq)]
pub enum SvgElement {
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
    },
    Circle {
        cx: f64,
        cy: f64,
        r: f64,
    },
    /// An arc as a path with explicit large-arc and sweep flags
    Path {
        d: String,
    },
    Polyline {
        points: Vec<(f64, f64)>,
    },
    Polygon {
        points: Vec<(f64, f64)>,
    },
}

impl SvgElement {
    /// Render as one SVG tag
    pub fn to_svg(&self) -> String {
        match self {
            Self::Line { x1, y1, x2, y2 } => format!(
                r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="black" fill="none" />"#,
                x1, y1, x2, y2
            ),
            Self::Circle { cx, cy, r } => format!(
                r#"<circle cx="{}" cy="{}" r="{}" stroke="black" fill="none" />"#,
                cx, cy, r
            ),
            Self::Path { d } => {
                format!(r#"<path d="{}" stroke="black" fill="none" />"#, d)
            }
            Self::Polyline { points } => format!(
                r#"<polyline points="{}" stroke="black" fill="none" />"#,
                format_points(points)
            ),
            Self::Polygon { points } => format!(
                r#"<polygon points="{}" stroke="black" fill="none" />"#,
                format_points(points)
            ),
        }
    }
}

fn format_points(points: &[(f64, f64)]) -> String {
    points
        .iter()
        .map(|(x, y)| format!("{},{}", x, y))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Arc path data: a single A command from the start point to the end point.
/// The sweep flag is fixed (one winding direction); the large-arc flag is set
/// iff the normalized sweep exceeds 180 degrees.
fn arc_path(arc: &DxfArc, scale: f64) -> String {
    let r = arc.radius * scale;
    let start = arc.point_at(arc.start_angle).scaled(scale);
    let end = arc.point_at(arc.end_angle).scaled(scale);
    let large_arc = if arc.sweep_degrees() > 180.0 { 1 } else { 0 };
    format!(
        "M {} {} A {} {} 0 {} 0 {} {}",
        start.x, -start.y, r, r, large_arc, end.x, -end.y
    )
}

/// Emit one entity at the final scale. `None` means the entity produced no
/// drawable output (empty point list, failed extraction, or a leftover
/// insert).
pub fn emit_entity(
    entity: &DxfEntity,
    scale: f64,
    samples: usize,
    tally: &mut ErrorTally,
) -> Option<SvgElement> {
    match entity {
        DxfEntity::Line(line) => {
            let start = line.start.scaled(scale);
            let end = line.end.scaled(scale);
            Some(SvgElement::Line {
                x1: start.x,
                y1: -start.y,
                x2: end.x,
                y2: -end.y,
            })
        }
        DxfEntity::Circle(circle) => {
            let center = circle.center.scaled(scale);
            Some(SvgElement::Circle {
                cx: center.x,
                cy: -center.y,
                r: circle.radius * scale,
            })
        }
        DxfEntity::Arc(arc) => Some(SvgElement::Path {
            d: arc_path(arc, scale),
        }),
        DxfEntity::Polyline(poly) => {
            // Empty point lists are skipped silently
            if poly.vertices.is_empty() {
                return None;
            }
            let points: Vec<(f64, f64)> = poly
                .vertices
                .iter()
                .map(|v| (v.x * scale, -v.y * scale))
                .collect();
            Some(if poly.closed {
                SvgElement::Polygon { points }
            } else {
                SvgElement::Polyline { points }
            })
        }
        // Splines are always emitted as open polylines over their
        // approximation; no native curve primitive.
        DxfEntity::Spline(spline) => {
            let approx = spline_points(spline, samples, tally);
            if approx.is_empty() {
                return None;
            }
            let points: Vec<(f64, f64)> =
                approx.iter().map(|p| (p.x * scale, -p.y * scale)).collect();
            Some(SvgElement::Polyline { points })
        }
        DxfEntity::Insert(insert) => {
            tally.record("draw", format!("unexpanded insert {}", insert.block));
            None
        }
    }
}

/// Emit all entities in order, dropping the ones that produce nothing
pub fn emit_document(
    entities: &[DxfEntity],
    scale: f64,
    config: &ConversionConfig,
    tally: &mut ErrorTally,
) -> Vec<SvgElement> {
    entities
        .iter()
        .filter_map(|e| emit_entity(e, scale, config.drawing_samples, tally))
        .collect()
}
