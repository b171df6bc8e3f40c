//! Driver errors.
//!
//! Only filesystem failures on the sweep's own outputs are errors. A tool
//! stage that fails or leaves no report is recorded in the stage outcome and
//! surfaces as sentinel cells, never as a [`DriverError`].

use std::path::PathBuf;

use mpsweep_core::ParamError;
use mpsweep_report::ReportError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DriverError {
    #[error(transparent)]
    Param(#[from] ParamError),

    #[error(transparent)]
    Report(#[from] ReportError),

    #[error("cannot create log directory {}: {source}", path.display())]
    LogDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot write stage log {}: {source}", path.display())]
    StageLog {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot move {} to {}: {source}", from.display(), to.display())]
    Relocate {
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot remove {}: {source}", path.display())]
    Purge {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot write run summary {}: {source}", path.display())]
    Summary {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot encode run summary: {0}")]
    SummaryEncode(#[from] serde_json::Error),
}

/// Result type for driver operations.
pub type Result<T> = std::result::Result<T, DriverError>;
