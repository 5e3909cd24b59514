//! CutKit DXF Crate
//!
//! In-memory DXF document model and reader:
//! - Entity model for the drawable subset the pipeline consumes
//!   (LINE, CIRCLE, ARC, LWPOLYLINE, POLYLINE, SPLINE, INSERT)
//! - Group-code pair parser for ASCII DXF files
//! - Block-insert expansion ("explode") with recursive, cycle-safe
//!   transform composition
//!
//! Everything outside the drawable subset is skipped while reading, not
//! rejected. Entities are immutable once read.

pub mod document;
pub mod entities;
pub mod explode;
pub mod parser;

pub use document::{DxfBlock, DxfDocument, DxfHeader};
pub use entities::{
    DxfArc, DxfCircle, DxfEntity, DxfEntityType, DxfInsert, DxfLine, DxfPolyline, DxfSpline,
};
pub use explode::expand_inserts;
pub use parser::DxfParser;
