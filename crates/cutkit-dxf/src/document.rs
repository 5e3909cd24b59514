//! DXF document
//!
//! Holds the parsed header, the modelspace entity list, and the block table
//! used by insert expansion.

use crate::entities::DxfEntity;
use cutkit_core::{DrawingUnits, Point2};
use std::collections::BTreeMap;

/// Header fields the pipeline cares about
#[derive(Debug, Clone, PartialEq)]
pub struct DxfHeader {
    /// $ACADVER string, e.g. "AC1021"
    pub version: String,
    /// $INSUNITS measurement unit
    pub units: DrawingUnits,
}

impl Default for DxfHeader {
    fn default() -> Self {
        Self {
            version: "AC1021".to_string(),
            units: DrawingUnits::Unitless,
        }
    }
}

/// A block definition: constituent entities in block-local coordinates
/// relative to the base point
#[derive(Debug, Clone, Default)]
pub struct DxfBlock {
    pub base: Point2,
    pub entities: Vec<DxfEntity>,
}

/// A parsed DXF document
#[derive(Debug, Clone, Default)]
pub struct DxfDocument {
    pub header: DxfHeader,
    entities: Vec<DxfEntity>,
    blocks: BTreeMap<String, DxfBlock>,
}

impl DxfDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// The primary drawable entity collection, in file order
    pub fn modelspace(&self) -> &[DxfEntity] {
        &self.entities
    }

    pub fn add_entity(&mut self, entity: DxfEntity) {
        self.entities.push(entity);
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Register a block definition
    pub fn add_block(&mut self, name: impl Into<String>, block: DxfBlock) {
        self.blocks.insert(name.into(), block);
    }

    /// Look up a block definition by name
    pub fn block(&self, name: &str) -> Option<&DxfBlock> {
        self.blocks.get(name)
    }

    /// Distinct layer names referenced by modelspace entities, sorted
    pub fn layer_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .entities
            .iter()
            .map(|e| e.layer().to_string())
            .collect();
        names.sort();
        names.dedup();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{DxfCircle, DxfLine};
    use cutkit_core::Point2;

    #[test]
    fn test_header_default() {
        let header = DxfHeader::default();
        assert_eq!(header.version, "AC1021");
        assert_eq!(header.units, DrawingUnits::Unitless);
    }

    #[test]
    fn test_entity_count() {
        let mut doc = DxfDocument::new();
        assert_eq!(doc.entity_count(), 0);

        doc.add_entity(DxfEntity::Line(DxfLine {
            start: Point2::new(0.0, 0.0),
            end: Point2::new(1.0, 1.0),
            layer: "Lines".to_string(),
        }));

        assert_eq!(doc.entity_count(), 1);
    }

    #[test]
    fn test_layer_names() {
        let mut doc = DxfDocument::new();
        doc.add_entity(DxfEntity::Line(DxfLine {
            start: Point2::new(0.0, 0.0),
            end: Point2::new(1.0, 1.0),
            layer: "Layer1".to_string(),
        }));
        doc.add_entity(DxfEntity::Circle(DxfCircle {
            center: Point2::new(0.0, 0.0),
            radius: 1.0,
            layer: "Layer2".to_string(),
        }));
        doc.add_entity(DxfEntity::Circle(DxfCircle {
            center: Point2::new(2.0, 0.0),
            radius: 1.0,
            layer: "Layer1".to_string(),
        }));

        assert_eq!(doc.layer_names(), vec!["Layer1", "Layer2"]);
    }

    #[test]
    fn test_block_lookup() {
        let mut doc = DxfDocument::new();
        doc.add_block(
            "BOLT",
            DxfBlock {
                base: Point2::new(0.0, 0.0),
                entities: vec![DxfEntity::Circle(DxfCircle {
                    center: Point2::new(0.0, 0.0),
                    radius: 4.0,
                    layer: "0".to_string(),
                })],
            },
        );

        assert!(doc.block("BOLT").is_some());
        assert_eq!(doc.block("BOLT").unwrap().entities.len(), 1);
        assert!(doc.block("NUT").is_none());
    }
}
