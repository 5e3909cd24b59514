//! CutKit SVG Crate
//!
//! Turns normalized entities into SVG primitives and writes the final
//! document. The emitted coordinate system follows the screen-down SVG
//! convention: drawing Y is flipped (`emitted_y = -mm_y`) and the view
//! frame is anchored at `(min_x, -max_y)`.

pub mod emitter;
pub mod writer;

pub use emitter::{emit_document, emit_entity, SvgElement};
pub use writer::SvgDocument;
