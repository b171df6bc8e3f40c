//! The fixed-width result table.
//!
//! Column widths come from the token lengths of [`SEPARATOR`]; the label
//! tiers and every data row are padded to those widths. The header is written
//! only when the file is created, so repeated sweeps append to one table.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::device::DeviceIdentity;
use crate::error::{ReportError, Result};
use crate::metric::METRICS;
use crate::row::{ResultRow, ROW_CELLS};

/// One `=` token per column; a token's length is its column's width.
const SEPARATOR: &str = "====== ====== ======= ===== === === \
    ======= ======= \
    ======= ======= ======= \
    ====== ====== ====== ====== ====== \
    ======= ======= ======= ======= \
    ======= ======= \
    ======= ====== ====== ====== \
    ===== ===== ===== \
    ====== ======== ========= ========= \
    ====== \
    =======";

/// Column groups of the first label tier, with the number of columns spanned.
const GROUPS: [(&str, usize); 11] = [
    ("Design", 6),
    ("Fmax", 2),
    ("ALUTs", 3),
    ("ALUT inputs", 5),
    ("ALUT modes", 4),
    ("Registers", 2),
    ("ALMs/LABs", 4),
    ("Pins", 3),
    ("Memory", 4),
    ("DSP", 1),
    ("Runtime", 1),
];

const PARAMETER_COLUMNS: [(&str, &str); 6] = [
    ("Arch", "type"),
    ("Bypass", "mode"),
    ("Depth", "lines"),
    ("Width", "bits"),
    ("nWP", "ports"),
    ("nRP", "ports"),
];

const RUNTIME_COLUMN: (&str, &str) = ("Elapsed", "min");

/// Print width of every column.
pub fn column_widths() -> Vec<usize> {
    SEPARATOR.split_whitespace().map(str::len).collect()
}

/// The complete header block for a new result file.
pub fn header_text(identity_line: &str) -> String {
    let widths = column_widths();

    let mut group_cells = Vec::with_capacity(GROUPS.len());
    let mut column = 0;
    for (label, span) in GROUPS {
        let width = widths[column..column + span].iter().sum::<usize>() + span - 1;
        group_cells.push(format!("{label:<width$}"));
        column += span;
    }

    let columns: Vec<(&str, &str)> = PARAMETER_COLUMNS
        .into_iter()
        .chain(METRICS.iter().map(|m| (m.column, m.unit)))
        .chain(std::iter::once(RUNTIME_COLUMN))
        .collect();
    let names: Vec<&str> = columns.iter().map(|(name, _)| *name).collect();
    let units: Vec<&str> = columns.iter().map(|(_, unit)| *unit).collect();
    let separator: Vec<&str> = SEPARATOR.split_whitespace().collect();

    let mut text = format!("{identity_line}\n\n");
    text.push_str(group_cells.join(" ").trim_end());
    text.push('\n');
    for tier in [&names, &units, &separator] {
        text.push_str(&pad_cells(tier, &widths));
        text.push('\n');
    }
    text
}

/// Append-only writer for the sweep's result file.
#[derive(Debug, Clone)]
pub struct ResultTable {
    path: PathBuf,
    widths: Vec<usize>,
}

impl ResultTable {
    /// Open the result file, writing the header first if it does not exist.
    pub fn open(path: impl Into<PathBuf>, identity: &DeviceIdentity) -> Result<Self> {
        let path = path.into();
        if !path.exists() {
            fs::write(&path, header_text(&identity.header_line())).map_err(|source| {
                ReportError::ResultFile {
                    path: path.clone(),
                    source,
                }
            })?;
            info!(path = %path.display(), "created result table");
        }
        Ok(ResultTable {
            path,
            widths: column_widths(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A row as it appears in the file, without the trailing newline.
    pub fn format_row(&self, row: &ResultRow) -> String {
        pad_cells(row.cells(), &self.widths)
    }

    /// Append one row.
    pub fn append(&self, row: &ResultRow) -> Result<()> {
        let line = self.format_row(row);
        let err = |source: std::io::Error| ReportError::ResultFile {
            path: self.path.clone(),
            source,
        };
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(err)?;
        writeln!(file, "{line}").map_err(err)
    }
}

fn pad_cells<S: AsRef<str>>(cells: &[S], widths: &[usize]) -> String {
    debug_assert_eq!(widths.len(), ROW_CELLS);
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell.as_ref()))
        .collect();
    padded.join(" ").trim_end().to_string()
}
