//! ASCII DXF parser
//!
//! DXF files are a flat stream of (group code, value) line pairs. The parser
//! walks SECTION blocks, reading the handful of header variables the
//! pipeline needs, the BLOCKS table for insert expansion, and the ENTITIES
//! section. Entity kinds outside the drawable subset are skipped without
//! error; malformed structure fails the whole document.

use crate::document::{DxfBlock, DxfDocument, DxfHeader};
use crate::entities::{
    DxfArc, DxfCircle, DxfEntity, DxfInsert, DxfLine, DxfPolyline, DxfSpline,
};
use cutkit_core::error::DxfError;
use cutkit_core::{DrawingUnits, Point2};
use std::path::Path;
use tracing::debug;

/// Reader over the (group code, value) pair stream
struct PairReader<'a> {
    lines: std::str::Lines<'a>,
    line_no: usize,
    pushed_back: Option<(i32, String)>,
}

impl<'a> PairReader<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            lines: source.lines(),
            line_no: 0,
            pushed_back: None,
        }
    }

    /// Next (code, value) pair, or `None` at end of input
    fn next_pair(&mut self) -> Result<Option<(i32, String)>, DxfError> {
        if let Some(pair) = self.pushed_back.take() {
            return Ok(Some(pair));
        }

        let code_line = match self.lines.next() {
            Some(line) => line,
            None => return Ok(None),
        };
        self.line_no += 1;

        let code: i32 = code_line.trim().parse().map_err(|_| {
            DxfError::invalid(format!(
                "line {}: expected group code, got {:?}",
                self.line_no, code_line
            ))
        })?;

        let value = self.lines.next().ok_or_else(|| {
            DxfError::invalid(format!("line {}: group code {} has no value", self.line_no, code))
        })?;
        self.line_no += 1;

        Ok(Some((code, value.trim_end().to_string())))
    }

    /// Return a pair to the stream; the next `next_pair` yields it again
    fn put_back(&mut self, pair: (i32, String)) {
        self.pushed_back = Some(pair);
    }
}

/// DXF parser entry points
pub struct DxfParser;

impl DxfParser {
    /// Quick structural sanity check without a full parse
    pub fn validate_header(content: &str) -> Result<(), DxfError> {
        let mut reader = PairReader::new(content);
        while let Some((code, value)) = reader.next_pair()? {
            if code == 0 && (value == "SECTION" || value == "EOF") {
                return Ok(());
            }
        }
        Err(DxfError::invalid("no SECTION marker found"))
    }

    /// Read and parse a DXF file from disk
    pub fn load(path: &Path) -> Result<DxfDocument, DxfError> {
        let content = std::fs::read_to_string(path).map_err(|source| DxfError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Parse DXF content into a document
    pub fn parse(content: &str) -> Result<DxfDocument, DxfError> {
        let mut reader = PairReader::new(content);
        let mut document = DxfDocument::new();

        while let Some((code, value)) = reader.next_pair()? {
            if code != 0 {
                // Stray pairs between sections occur in the wild; ignore them
                continue;
            }
            match value.as_str() {
                "SECTION" => {
                    let (name_code, name) = reader
                        .next_pair()?
                        .ok_or_else(|| DxfError::invalid("SECTION without a name"))?;
                    if name_code != 2 {
                        return Err(DxfError::invalid(format!(
                            "SECTION name used group code {} (expected 2)",
                            name_code
                        )));
                    }
                    match name.as_str() {
                        "HEADER" => parse_header(&mut reader, &mut document.header)?,
                        "BLOCKS" => parse_blocks(&mut reader, &mut document)?,
                        "ENTITIES" => parse_entities(&mut reader, &mut document)?,
                        _ => skip_section(&mut reader)?,
                    }
                }
                "EOF" => break,
                unexpected => {
                    return Err(DxfError::invalid(format!(
                        "unexpected token {} (expected SECTION or EOF)",
                        unexpected
                    )));
                }
            }
        }

        Ok(document)
    }
}

fn skip_section(reader: &mut PairReader) -> Result<(), DxfError> {
    loop {
        match reader.next_pair()? {
            Some((0, value)) if value == "ENDSEC" => return Ok(()),
            Some(_) => continue,
            None => return Err(DxfError::invalid("SECTION without ENDSEC")),
        }
    }
}

fn parse_header(reader: &mut PairReader, header: &mut DxfHeader) -> Result<(), DxfError> {
    let mut current_var: Option<String> = None;
    loop {
        match reader.next_pair()? {
            Some((0, value)) if value == "ENDSEC" => return Ok(()),
            Some((9, name)) => current_var = Some(name),
            Some((code, value)) => match current_var.as_deref() {
                Some("$INSUNITS") if code == 70 => {
                    let units_code = parse_i32(&value, "$INSUNITS")?;
                    header.units = DrawingUnits::from_code(units_code);
                }
                Some("$ACADVER") if code == 1 => {
                    header.version = value.trim().to_string();
                }
                _ => {}
            },
            None => return Err(DxfError::invalid("HEADER section without ENDSEC")),
        }
    }
}

fn parse_blocks(reader: &mut PairReader, document: &mut DxfDocument) -> Result<(), DxfError> {
    loop {
        let (code, value) = reader
            .next_pair()?
            .ok_or_else(|| DxfError::invalid("BLOCKS section ended early"))?;
        if code != 0 {
            continue;
        }
        match value.as_str() {
            "ENDSEC" => return Ok(()),
            "BLOCK" => {
                if let Some((name, block)) = parse_block(reader)? {
                    document.add_block(name, block);
                }
            }
            _ => skip_entity_body(reader)?,
        }
    }
}

/// One BLOCK .. ENDBLK definition. Anonymous blocks (names starting with
/// '*') are model-management artifacts and are dropped.
fn parse_block(reader: &mut PairReader) -> Result<Option<(String, DxfBlock)>, DxfError> {
    let mut name: Option<String> = None;
    let mut keep = true;
    let mut base_x = 0.0;
    let mut base_y = 0.0;
    let mut entities = Vec::new();

    loop {
        match reader.next_pair()? {
            Some((0, value)) => match value.as_str() {
                "ENDBLK" => {
                    skip_entity_body(reader)?;
                    break;
                }
                kind => {
                    if let Some(entity) = parse_entity(reader, kind)? {
                        entities.push(entity);
                    }
                }
            },
            Some((2, value)) => {
                let trimmed = value.trim().to_string();
                keep = !trimmed.starts_with('*');
                name = Some(trimmed);
            }
            Some((10, value)) => base_x = parse_f64(&value, "BLOCK base X")?,
            Some((20, value)) => base_y = parse_f64(&value, "BLOCK base Y")?,
            Some(_) => {}
            None => return Err(DxfError::invalid("BLOCK without ENDBLK")),
        }
    }

    let name = name.ok_or_else(|| DxfError::invalid("BLOCK without a name (group code 2)"))?;
    if keep {
        Ok(Some((
            name,
            DxfBlock {
                base: Point2::new(base_x, base_y),
                entities,
            },
        )))
    } else {
        Ok(None)
    }
}

fn parse_entities(reader: &mut PairReader, document: &mut DxfDocument) -> Result<(), DxfError> {
    loop {
        let (code, value) = reader
            .next_pair()?
            .ok_or_else(|| DxfError::invalid("ENTITIES section ended early"))?;
        if code != 0 {
            return Err(DxfError::invalid(format!(
                "ENTITIES section hit group code {} (expected 0)",
                code
            )));
        }
        match value.as_str() {
            "ENDSEC" => return Ok(()),
            kind => {
                if let Some(entity) = parse_entity(reader, kind)? {
                    document.add_entity(entity);
                }
            }
        }
    }
}

/// Dispatch one entity body. Unsupported kinds are skipped and yield `None`.
fn parse_entity(reader: &mut PairReader, kind: &str) -> Result<Option<DxfEntity>, DxfError> {
    match kind {
        "LINE" => parse_line(reader).map(Some),
        "CIRCLE" => parse_circle(reader).map(Some),
        "ARC" => parse_arc(reader).map(Some),
        "LWPOLYLINE" => parse_lwpolyline(reader).map(Some),
        "POLYLINE" => parse_polyline(reader),
        "SPLINE" => parse_spline(reader).map(Some),
        "INSERT" => parse_insert(reader).map(Some),
        other => {
            debug!(kind = other, "skipping unsupported entity");
            skip_entity_body(reader)?;
            Ok(None)
        }
    }
}

/// Consume pairs until the next entity boundary (group code 0)
fn skip_entity_body(reader: &mut PairReader) -> Result<(), DxfError> {
    loop {
        match reader.next_pair()? {
            Some((0, value)) => {
                reader.put_back((0, value));
                return Ok(());
            }
            Some(_) => continue,
            None => return Ok(()),
        }
    }
}

fn parse_f64(value: &str, what: &str) -> Result<f64, DxfError> {
    value
        .trim()
        .parse()
        .map_err(|_| DxfError::invalid(format!("{}: bad number {:?}", what, value)))
}

fn parse_i32(value: &str, what: &str) -> Result<i32, DxfError> {
    value
        .trim()
        .parse()
        .map_err(|_| DxfError::invalid(format!("{}: bad integer {:?}", what, value)))
}

fn parse_line(reader: &mut PairReader) -> Result<DxfEntity, DxfError> {
    let mut layer = None;
    let mut start_x = None;
    let mut start_y = None;
    let mut end_x = None;
    let mut end_y = None;

    loop {
        match reader.next_pair()? {
            Some((0, value)) => {
                reader.put_back((0, value));
                break;
            }
            Some((code, value)) => match code {
                8 => layer = Some(value.trim().to_string()),
                10 => start_x = Some(parse_f64(&value, "LINE start X")?),
                20 => start_y = Some(parse_f64(&value, "LINE start Y")?),
                11 => end_x = Some(parse_f64(&value, "LINE end X")?),
                21 => end_y = Some(parse_f64(&value, "LINE end Y")?),
                30 | 31 => {} // Z coordinates are discarded
                _ => {}
            },
            None => return Err(DxfError::invalid("LINE entity ended early")),
        }
    }

    let sx = start_x.ok_or_else(|| DxfError::invalid("LINE missing start X (code 10)"))?;
    let sy = start_y.ok_or_else(|| DxfError::invalid("LINE missing start Y (code 20)"))?;
    let ex = end_x.ok_or_else(|| DxfError::invalid("LINE missing end X (code 11)"))?;
    let ey = end_y.ok_or_else(|| DxfError::invalid("LINE missing end Y (code 21)"))?;

    Ok(DxfEntity::Line(DxfLine {
        start: Point2::new(sx, sy),
        end: Point2::new(ex, ey),
        layer: layer.unwrap_or_else(|| "0".to_string()),
    }))
}

fn parse_circle(reader: &mut PairReader) -> Result<DxfEntity, DxfError> {
    let mut layer = None;
    let mut center_x = None;
    let mut center_y = None;
    let mut radius = None;

    loop {
        match reader.next_pair()? {
            Some((0, value)) => {
                reader.put_back((0, value));
                break;
            }
            Some((code, value)) => match code {
                8 => layer = Some(value.trim().to_string()),
                10 => center_x = Some(parse_f64(&value, "CIRCLE center X")?),
                20 => center_y = Some(parse_f64(&value, "CIRCLE center Y")?),
                40 => radius = Some(parse_f64(&value, "CIRCLE radius")?),
                30 => {}
                _ => {}
            },
            None => return Err(DxfError::invalid("CIRCLE entity ended early")),
        }
    }

    let cx = center_x.ok_or_else(|| DxfError::invalid("CIRCLE missing center X (code 10)"))?;
    let cy = center_y.ok_or_else(|| DxfError::invalid("CIRCLE missing center Y (code 20)"))?;
    let radius = radius.ok_or_else(|| DxfError::invalid("CIRCLE missing radius (code 40)"))?;

    Ok(DxfEntity::Circle(DxfCircle {
        center: Point2::new(cx, cy),
        radius,
        layer: layer.unwrap_or_else(|| "0".to_string()),
    }))
}

fn parse_arc(reader: &mut PairReader) -> Result<DxfEntity, DxfError> {
    let mut layer = None;
    let mut center_x = None;
    let mut center_y = None;
    let mut radius = None;
    let mut start_angle = None;
    let mut end_angle = None;

    loop {
        match reader.next_pair()? {
            Some((0, value)) => {
                reader.put_back((0, value));
                break;
            }
            Some((code, value)) => match code {
                8 => layer = Some(value.trim().to_string()),
                10 => center_x = Some(parse_f64(&value, "ARC center X")?),
                20 => center_y = Some(parse_f64(&value, "ARC center Y")?),
                40 => radius = Some(parse_f64(&value, "ARC radius")?),
                50 => start_angle = Some(parse_f64(&value, "ARC start angle")?),
                51 => end_angle = Some(parse_f64(&value, "ARC end angle")?),
                30 => {}
                _ => {}
            },
            None => return Err(DxfError::invalid("ARC entity ended early")),
        }
    }

    Ok(DxfEntity::Arc(DxfArc {
        center: Point2::new(
            center_x.ok_or_else(|| DxfError::invalid("ARC missing center X (code 10)"))?,
            center_y.ok_or_else(|| DxfError::invalid("ARC missing center Y (code 20)"))?,
        ),
        radius: radius.ok_or_else(|| DxfError::invalid("ARC missing radius (code 40)"))?,
        start_angle: start_angle
            .ok_or_else(|| DxfError::invalid("ARC missing start angle (code 50)"))?,
        end_angle: end_angle
            .ok_or_else(|| DxfError::invalid("ARC missing end angle (code 51)"))?,
        layer: layer.unwrap_or_else(|| "0".to_string()),
    }))
}

fn parse_lwpolyline(reader: &mut PairReader) -> Result<DxfEntity, DxfError> {
    let mut layer = None;
    let mut closed = false;
    let mut vertices: Vec<Point2> = Vec::new();
    let mut pending_x: Option<f64> = None;

    loop {
        match reader.next_pair()? {
            Some((0, value)) => {
                reader.put_back((0, value));
                break;
            }
            Some((code, value)) => match code {
                8 => layer = Some(value.trim().to_string()),
                70 => {
                    let flags = parse_i32(&value, "LWPOLYLINE flags")?;
                    closed = flags & 0x01 == 0x01;
                }
                10 => {
                    if pending_x.replace(parse_f64(&value, "LWPOLYLINE vertex X")?).is_some() {
                        return Err(DxfError::invalid(
                            "LWPOLYLINE vertex X without matching Y (code 20)",
                        ));
                    }
                }
                20 => {
                    let y = parse_f64(&value, "LWPOLYLINE vertex Y")?;
                    let x = pending_x.take().ok_or_else(|| {
                        DxfError::invalid("LWPOLYLINE vertex Y without matching X (code 10)")
                    })?;
                    vertices.push(Point2::new(x, y));
                }
                30 | 90 | 42 => {}
                _ => {}
            },
            None => return Err(DxfError::invalid("LWPOLYLINE entity ended early")),
        }
    }

    if pending_x.is_some() {
        return Err(DxfError::invalid("LWPOLYLINE has an incomplete trailing vertex"));
    }

    Ok(DxfEntity::Polyline(DxfPolyline {
        vertices,
        closed,
        layer: layer.unwrap_or_else(|| "0".to_string()),
    }))
}

/// Legacy POLYLINE: a header entity followed by VERTEX records and a SEQEND.
/// Mesh and polyface variants (flag bits 0x10/0x40) are 3D surfaces, not cut
/// paths; their whole sequence is skipped and the entity yields `None`.
fn parse_polyline(reader: &mut PairReader) -> Result<Option<DxfEntity>, DxfError> {
    let mut layer = None;
    let mut flags = 0i32;

    loop {
        match reader.next_pair()? {
            Some((0, value)) => {
                reader.put_back((0, value));
                break;
            }
            Some((code, value)) => match code {
                8 => layer = Some(value.trim().to_string()),
                70 => flags = parse_i32(&value, "POLYLINE flags")?,
                _ => {}
            },
            None => return Err(DxfError::invalid("POLYLINE entity ended early")),
        }
    }

    let is_mesh = flags & 0x10 != 0 || flags & 0x40 != 0;
    let mut vertices: Vec<Point2> = Vec::new();

    loop {
        match reader.next_pair()? {
            Some((0, value)) => match value.as_str() {
                "VERTEX" => {
                    if let Some(vertex) = parse_vertex(reader)? {
                        vertices.push(vertex);
                    }
                }
                "SEQEND" => {
                    skip_entity_body(reader)?;
                    break;
                }
                _ => {
                    reader.put_back((0, value));
                    break;
                }
            },
            Some(_) => continue,
            None => return Err(DxfError::invalid("POLYLINE without SEQEND")),
        }
    }

    if is_mesh {
        debug!("skipping POLYLINE mesh/polyface");
        return Ok(None);
    }

    Ok(Some(DxfEntity::Polyline(DxfPolyline {
        vertices,
        closed: flags & 0x01 == 0x01,
        layer: layer.unwrap_or_else(|| "0".to_string()),
    })))
}

/// One VERTEX record. Records without a complete 2D location (polyface face
/// records) yield `None`.
fn parse_vertex(reader: &mut PairReader) -> Result<Option<Point2>, DxfError> {
    let mut x = None;
    let mut y = None;

    loop {
        match reader.next_pair()? {
            Some((0, value)) => {
                reader.put_back((0, value));
                break;
            }
            Some((code, value)) => match code {
                10 => x = Some(parse_f64(&value, "VERTEX X")?),
                20 => y = Some(parse_f64(&value, "VERTEX Y")?),
                _ => {}
            },
            None => return Err(DxfError::invalid("VERTEX record ended early")),
        }
    }

    match (x, y) {
        (Some(x), Some(y)) => Ok(Some(Point2::new(x, y))),
        _ => Ok(None),
    }
}

fn parse_spline(reader: &mut PairReader) -> Result<DxfEntity, DxfError> {
    let mut layer = None;
    let mut flags = 0i32;
    let mut degree = None;
    let mut knots: Vec<f64> = Vec::new();
    let mut weights: Vec<f64> = Vec::new();
    let mut control_points: Vec<Point2> = Vec::new();
    let mut fit_points: Vec<Point2> = Vec::new();
    let mut pending_control_x: Option<f64> = None;
    let mut pending_fit_x: Option<f64> = None;

    loop {
        match reader.next_pair()? {
            Some((0, value)) => {
                reader.put_back((0, value));
                break;
            }
            Some((code, value)) => match code {
                8 => layer = Some(value.trim().to_string()),
                70 => flags = parse_i32(&value, "SPLINE flags")?,
                71 => degree = Some(parse_i32(&value, "SPLINE degree")?),
                40 => knots.push(parse_f64(&value, "SPLINE knot")?),
                41 => weights.push(parse_f64(&value, "SPLINE weight")?),
                10 => {
                    if pending_control_x
                        .replace(parse_f64(&value, "SPLINE control point X")?)
                        .is_some()
                    {
                        return Err(DxfError::invalid(
                            "SPLINE control point X without matching Y (code 20)",
                        ));
                    }
                }
                20 => {
                    let y = parse_f64(&value, "SPLINE control point Y")?;
                    let x = pending_control_x.take().ok_or_else(|| {
                        DxfError::invalid("SPLINE control point Y without matching X (code 10)")
                    })?;
                    control_points.push(Point2::new(x, y));
                }
                11 => {
                    if pending_fit_x
                        .replace(parse_f64(&value, "SPLINE fit point X")?)
                        .is_some()
                    {
                        return Err(DxfError::invalid(
                            "SPLINE fit point X without matching Y (code 21)",
                        ));
                    }
                }
                21 => {
                    let y = parse_f64(&value, "SPLINE fit point Y")?;
                    let x = pending_fit_x.take().ok_or_else(|| {
                        DxfError::invalid("SPLINE fit point Y without matching X (code 11)")
                    })?;
                    fit_points.push(Point2::new(x, y));
                }
                30 | 31 | 72 | 73 | 74 => {} // Z components and count hints
                _ => {}
            },
            None => return Err(DxfError::invalid("SPLINE entity ended early")),
        }
    }

    if pending_control_x.is_some() || pending_fit_x.is_some() {
        return Err(DxfError::invalid("SPLINE has an incomplete trailing point"));
    }

    Ok(DxfEntity::Spline(DxfSpline {
        degree: degree.ok_or_else(|| DxfError::invalid("SPLINE missing degree (code 71)"))?,
        control_points,
        fit_points,
        knots,
        weights,
        closed: flags & 0x01 != 0,
        layer: layer.unwrap_or_else(|| "0".to_string()),
    }))
}

fn parse_insert(reader: &mut PairReader) -> Result<DxfEntity, DxfError> {
    let mut layer = None;
    let mut block = None;
    let mut insert_x = 0.0;
    let mut insert_y = 0.0;
    let mut scale_x = 1.0;
    let mut scale_y = 1.0;
    let mut rotation = 0.0;

    loop {
        match reader.next_pair()? {
            Some((0, value)) => {
                reader.put_back((0, value));
                break;
            }
            Some((code, value)) => match code {
                8 => layer = Some(value.trim().to_string()),
                2 => block = Some(value.trim().to_string()),
                10 => insert_x = parse_f64(&value, "INSERT X")?,
                20 => insert_y = parse_f64(&value, "INSERT Y")?,
                41 => scale_x = parse_f64(&value, "INSERT X scale")?,
                42 => scale_y = parse_f64(&value, "INSERT Y scale")?,
                50 => rotation = parse_f64(&value, "INSERT rotation")?,
                30 | 43 => {}
                _ => {}
            },
            None => return Err(DxfError::invalid("INSERT entity ended early")),
        }
    }

    Ok(DxfEntity::Insert(DxfInsert {
        block: block.ok_or_else(|| DxfError::invalid("INSERT missing block name (code 2)"))?,
        insert: Point2::new(insert_x, insert_y),
        scale_x,
        scale_y,
        rotation,
        layer: layer.unwrap_or_else(|| "0".to_string()),
    }))
}
