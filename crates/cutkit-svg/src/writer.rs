//! SVG document writer
//!
//! Serializes the emitted primitive list into an SVG document whose view
//! frame is anchored at `(min_x, -max_y)` with width and height in
//! millimeters.

use crate::emitter::SvgElement;
use cutkit_core::error::ConvertError;
use cutkit_core::BoundingBox;
use std::path::Path;
use tracing::debug;

/// A complete SVG document ready for serialization
#[derive(Debug, Clone)]
pub struct SvgDocument {
    view_min_x: f64,
    view_min_y: f64,
    width: f64,
    height: f64,
    elements: Vec<SvgElement>,
}

impl SvgDocument {
    /// Build the document frame from the final drawing bounds (millimeters,
    /// pre-flip). The Y flip maps `[min_y, max_y]` onto `[-max_y, -min_y]`,
    /// so the view frame starts at `-max_y`.
    pub fn new(bbox: BoundingBox, elements: Vec<SvgElement>) -> Self {
        Self {
            view_min_x: bbox.min_x,
            view_min_y: -bbox.max_y,
            width: bbox.width(),
            height: bbox.height(),
            elements,
        }
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    pub fn width_mm(&self) -> f64 {
        self.width
    }

    pub fn height_mm(&self) -> f64 {
        self.height
    }

    /// Serialize to SVG markup
    pub fn to_svg_string(&self) -> String {
        let mut out = String::new();
        out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        out.push_str(&format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" version="1.1" width="{:.3}mm" height="{:.3}mm" viewBox="{} {} {} {}">"#,
            self.width, self.height, self.view_min_x, self.view_min_y, self.width, self.height
        ));
        out.push('\n');
        for element in &self.elements {
            out.push_str("  ");
            out.push_str(&element.to_svg());
            out.push('\n');
        }
        out.push_str("</svg>\n");
        out
    }

    /// Write the document to disk
    pub fn save(&self, path: &Path) -> Result<(), ConvertError> {
        debug!(?path, elements = self.elements.len(), "writing SVG");
        std::fs::write(path, self.to_svg_string()).map_err(|source| ConvertError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_bbox() -> BoundingBox {
        BoundingBox {
            min_x: 10.0,
            min_y: 20.0,
            max_x: 110.0,
            max_y: 70.0,
        }
    }

    #[test]
    fn test_view_frame_is_flipped() {
        let doc = SvgDocument::new(sample_bbox(), Vec::new());
        let svg = doc.to_svg_string();
        assert!(svg.contains(r#"viewBox="10 -70 100 50""#), "svg was {}", svg);
    }

    #[test]
    fn test_size_attributes_in_mm() {
        let doc = SvgDocument::new(sample_bbox(), Vec::new());
        let svg = doc.to_svg_string();
        assert!(svg.contains(r#"width="100.000mm""#));
        assert!(svg.contains(r#"height="50.000mm""#));
    }

    #[test]
    fn test_elements_are_listed_in_order() {
        let elements = vec![
            SvgElement::Circle {
                cx: 0.0,
                cy: 0.0,
                r: 5.0,
            },
            SvgElement::Line {
                x1: 0.0,
                y1: 0.0,
                x2: 1.0,
                y2: 0.0,
            },
        ];
        let doc = SvgDocument::new(sample_bbox(), elements);
        let svg = doc.to_svg_string();
        let circle_at = svg.find("<circle").unwrap();
        let line_at = svg.find("<line").unwrap();
        assert!(circle_at < line_at);
        assert!(svg.ends_with("</svg>\n"));
    }

    #[test]
    fn test_save_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.svg");

        let doc = SvgDocument::new(sample_bbox(), Vec::new());
        doc.save(&path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("<?xml"));
        assert!(written.contains("<svg"));
    }
}
