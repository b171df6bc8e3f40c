//! Result table errors.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while writing the result table.
///
/// Report reading never fails: an unreadable report is treated as missing.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("cannot write result file {}: {source}", path.display())]
    ResultFile {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Result type for report operations.
pub type Result<T> = std::result::Result<T, ReportError>;
