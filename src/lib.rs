//! # CutKit
//!
//! A DXF to SVG converter and cut-metrics calculator for laser and plasma
//! cutting workflows.
//!
//! ## Architecture
//!
//! CutKit is organized as a workspace with multiple crates:
//!
//! 1. **cutkit-core** - Geometry primitives, unit codes, config, errors,
//!    batch error tally
//! 2. **cutkit-dxf** - DXF entity model, reader, block-insert expansion
//! 3. **cutkit-geom** - Geometry extraction, spline approximation,
//!    normalization, cut metrics
//! 4. **cutkit-svg** - SVG primitive emission and document writing
//! 5. **cutkit** - Main binary with the conversion pipeline and CLI
//!
//! ## Features
//!
//! - **Robust extraction**: heterogeneous entities reduced to a uniform
//!   point/path representation; per-entity failures never abort a document
//! - **Unit inference**: declared $INSUNITS lookup with a one-shot guess
//!   heuristic for unitless drawings
//! - **Envelope normalization**: drawings rescaled to fit a target extent
//!   while preserving relative geometry
//! - **Cut metrics**: total path length and piercing count as JSON

pub mod pipeline;

pub use cutkit_core::{ConversionConfig, ConvertError, DrawingUnits, ErrorTally};
pub use cutkit_dxf::{DxfDocument, DxfEntity, DxfParser};
pub use cutkit_geom::{measure, normalize, CutMetrics, NormalizeOutcome};
pub use cutkit_svg::{SvgDocument, SvgElement};

pub use pipeline::{
    collect_metrics, convert_file, convert_folder, inspect, BatchSummary, ConvertReport,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output
/// - RUST_LOG environment variable support
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(env_filter)
        .init();

    Ok(())
}
