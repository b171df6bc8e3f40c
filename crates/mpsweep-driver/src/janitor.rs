//! Report and byproduct housekeeping around each run.
//!
//! Before a run every well-known report is deleted, so a report found
//! afterwards can only have come from the current combination. After the run
//! the surviving reports move into the run's log directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::ToolchainConfig;
use crate::error::{DriverError, Result};

/// Report and status files the tool writes as `{project}.{suffix}`.
pub const WELL_KNOWN_REPORTS: [&str; 14] = [
    "flow.rpt",
    "map.rpt",
    "map.summary",
    "map.smsg",
    "merge.rpt",
    "merge.summary",
    "fit.rpt",
    "fit.summary",
    "fit.smsg",
    "sta.rpt",
    "sta.summary",
    "pin",
    "done",
    "qws",
];

/// Workspace cleaner bound to one toolchain configuration.
#[derive(Debug, Clone, Copy)]
pub struct Janitor<'a> {
    config: &'a ToolchainConfig,
}

impl<'a> Janitor<'a> {
    pub fn new(config: &'a ToolchainConfig) -> Self {
        Janitor { config }
    }

    fn reports(&self) -> impl Iterator<Item = (&'static str, PathBuf)> + '_ {
        WELL_KNOWN_REPORTS
            .into_iter()
            .map(|suffix| (suffix, self.config.report_path(suffix)))
    }

    /// Delete every well-known report. Returns how many were removed.
    pub fn purge_reports(&self) -> Result<usize> {
        let mut removed = 0;
        for (_, path) in self.reports() {
            if remove_file_if_present(&path)? {
                debug!(path = %path.display(), "removed stale report");
                removed += 1;
            }
        }
        Ok(removed)
    }

    /// Move surviving reports to `{run_dir}/{run_name}.{suffix}`.
    pub fn relocate_reports(&self, run_dir: &Path, run_name: &str) -> Result<Vec<PathBuf>> {
        let mut moved = Vec::new();
        for (suffix, from) in self.reports() {
            if !from.is_file() {
                continue;
            }
            let to = run_dir.join(format!("{run_name}.{suffix}"));
            move_file(&from, &to).map_err(|source| DriverError::Relocate {
                from: from.clone(),
                to: to.clone(),
                source,
            })?;
            debug!(from = %from.display(), to = %to.display(), "relocated report");
            moved.push(to);
        }
        Ok(moved)
    }

    /// Remove build-system directories, extra byproducts and leftover reports.
    pub fn purge_build_artifacts(&self) -> Result<()> {
        for dir in &self.config.purge_dirs {
            let path = self.config.resolve(dir);
            if path.is_dir() {
                fs::remove_dir_all(&path).map_err(|source| DriverError::Purge {
                    path: path.clone(),
                    source,
                })?;
                debug!(path = %path.display(), "removed build directory");
            }
        }
        for file in &self.config.purge_files {
            remove_file_if_present(&self.config.resolve(file))?;
        }
        self.purge_reports()?;
        Ok(())
    }
}

fn remove_file_if_present(path: &Path) -> Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(source) => Err(DriverError::Purge {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Rename, falling back to copy and delete across filesystems.
fn move_file(from: &Path, to: &Path) -> io::Result<()> {
    if fs::rename(from, to).is_ok() {
        return Ok(());
    }
    fs::copy(from, to)?;
    fs::remove_file(from)
}
