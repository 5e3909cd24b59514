//! Error handling for CutKit
//!
//! Two layers of failure exist in the pipeline:
//! - Document-fatal errors (`DxfError`, empty drawing) abort conversion of
//!   that document only; a batch run reports them and moves on.
//! - Per-entity failures (extraction, emission) are never errors at all;
//!   they are recorded in the [`crate::tally::ErrorTally`] and the entity
//!   contributes no geometry. Omission is the only recovery action.
//!
//! All error types use `thiserror`.

use std::path::PathBuf;
use thiserror::Error;

/// DXF document read error
///
/// Fatal for the document being read; never fatal for a batch run.
#[derive(Error, Debug)]
pub enum DxfError {
    /// The file could not be read at all
    #[error("failed to read {path:?}: {source}")]
    Read {
        /// Path of the file that failed to open.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file content is not parseable DXF
    #[error("invalid DXF: {message}")]
    Invalid {
        /// Description of the structural problem.
        message: String,
    },
}

impl DxfError {
    /// Create an `Invalid` error from a message
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }
}

/// Conversion error type
///
/// Unified error for the convert pipeline. Per-entity failures never appear
/// here; they land in the error tally instead.
#[derive(Error, Debug)]
pub enum ConvertError {
    /// Document read/parse failure
    #[error(transparent)]
    Dxf(#[from] DxfError),

    /// No entity in the document produced any geometry
    #[error("no drawable entities in {name}")]
    EmptyDrawing {
        /// Display name of the offending document.
        name: String,
    },

    /// Output file write failure
    #[error("failed to write {path:?}: {source}")]
    Write {
        /// Path of the output file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Result type using ConvertError
pub type Result<T> = std::result::Result<T, ConvertError>;
