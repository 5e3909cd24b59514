//! Conversion pipeline
//!
//! Ties the crates together: read → explode inserts → normalize → emit →
//! write, plus the metrics and inspect paths. Document-fatal errors abort
//! only the document at hand; batch runs report them per file and keep
//! going, with every per-entity failure aggregated into one tally.

use anyhow::Context;
use cutkit_core::{ConversionConfig, ConvertError, ErrorTally};
use cutkit_dxf::{expand_inserts, DxfParser};
use cutkit_geom::{measure, normalize, CutMetrics};
use cutkit_svg::{emit_document, SvgDocument};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// What a successful single-file conversion produced
#[derive(Debug, Clone)]
pub struct ConvertReport {
    pub output: PathBuf,
    pub width_mm: f64,
    pub height_mm: f64,
    /// Primitives written to the SVG
    pub element_count: usize,
}

/// Outcome of a batch run over a folder
#[derive(Debug)]
pub struct BatchSummary {
    pub converted: usize,
    pub failed: usize,
    pub tally: ErrorTally,
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Convert one DXF file to SVG.
///
/// A document in which no entity produces geometry is reported as empty and
/// no output file is written.
pub fn convert_file(
    input: &Path,
    output: &Path,
    config: &ConversionConfig,
    tally: &mut ErrorTally,
) -> Result<ConvertReport, ConvertError> {
    let doc = DxfParser::load(input)?;
    debug!(
        entities = doc.entity_count(),
        units = %doc.header.units,
        "loaded {}",
        display_name(input)
    );

    let entities = expand_inserts(&doc, tally);
    let outcome = normalize(&entities, doc.header.units, config, tally).ok_or_else(|| {
        ConvertError::EmptyDrawing {
            name: display_name(input),
        }
    })?;

    let elements = emit_document(&entities, outcome.scale, config, tally);
    let svg = SvgDocument::new(outcome.bbox, elements);
    svg.save(output)?;

    Ok(ConvertReport {
        output: output.to_path_buf(),
        width_mm: svg.width_mm(),
        height_mm: svg.height_mm(),
        element_count: svg.element_count(),
    })
}

/// Convert every `.dxf` file in a folder, deriving each output name by
/// swapping the extension. Prints a per-file pass/fail line and, at the end,
/// the aggregated error table. Per-file failures never abort the batch.
pub fn convert_folder(folder: &Path, config: &ConversionConfig) -> anyhow::Result<BatchSummary> {
    let mut inputs: Vec<PathBuf> = std::fs::read_dir(folder)
        .with_context(|| format!("cannot read folder {}", folder.display()))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension()
                .map(|ext| ext.eq_ignore_ascii_case("dxf"))
                .unwrap_or(false)
        })
        .collect();
    inputs.sort();

    let mut summary = BatchSummary {
        converted: 0,
        failed: 0,
        tally: ErrorTally::new(),
    };

    for input in &inputs {
        let output = input.with_extension("svg");
        match convert_file(input, &output, config, &mut summary.tally) {
            Ok(report) => {
                println!(
                    "{} -> {} ({:.1} x {:.1} mm, {} entities)",
                    display_name(input),
                    display_name(&report.output),
                    report.width_mm,
                    report.height_mm,
                    report.element_count
                );
                summary.converted += 1;
            }
            Err(err) => {
                println!("{}: FAILED: {}", display_name(input), err);
                let stage = match &err {
                    ConvertError::Dxf(_) => "read",
                    ConvertError::EmptyDrawing { .. } => "empty",
                    ConvertError::Write { .. } => "write",
                };
                summary.tally.record(stage, &err);
                summary.failed += 1;
            }
        }
    }

    println!(
        "\n{} converted, {} failed of {} file(s)",
        summary.converted,
        summary.failed,
        inputs.len()
    );
    if !summary.tally.is_empty() {
        println!("error summary:");
        for (cause, count) in summary.tally.iter() {
            println!("  {} : {}", cause, count);
        }
    }

    Ok(summary)
}

/// Cut length and piercing count for one document
pub fn collect_metrics(
    input: &Path,
    config: &ConversionConfig,
) -> Result<CutMetrics, ConvertError> {
    let doc = DxfParser::load(input)?;
    let mut tally = ErrorTally::new();
    let entities = expand_inserts(&doc, &mut tally);
    let metrics = measure(&entities, config.metrics_samples, &mut tally);
    if !tally.is_empty() {
        debug!(failures = tally.total(), "metrics run had extraction failures");
    }
    Ok(metrics)
}

/// Entity-type → count table for one document
pub fn inspect(input: &Path) -> Result<String, ConvertError> {
    let doc = DxfParser::load(input)?;

    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for entity in doc.modelspace() {
        *counts.entry(entity.entity_type().to_string()).or_insert(0) += 1;
    }

    let mut out = String::new();
    out.push_str(&format!("{}:\n", display_name(input)));
    for (kind, count) in &counts {
        out.push_str(&format!("  {}: {}\n", kind, count));
    }
    out.push_str(&format!("  total: {}\n", doc.entity_count()));
    out.push_str(&format!("  layers: {}\n", doc.layer_names().len()));
    Ok(out)
}
