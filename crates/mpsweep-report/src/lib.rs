//! Report field extraction and result accumulation for synthesis sweeps.
//!
//! The synthesis tool leaves two semi-structured text reports per run: a
//! timing-analysis report and a fitter report. [`extract`] pulls the metrics
//! listed in [`METRICS`] out of them, leaving [`SENTINEL`] in every slot it
//! cannot fill. [`ResultTable`] appends one fixed-width row per run to the
//! sweep's result file.

pub mod device;
pub mod error;
pub mod extract;
pub mod metric;
pub mod row;
pub mod table;

pub use device::DeviceIdentity;
pub use error::{ReportError, Result};
pub use extract::{
    extract, fitter_window, fmax_for_corner, resource_value, ReportStatus, FITTER_HEADING,
    FITTER_WINDOW_LINES,
};
pub use metric::{Locator, Metric, MetricValues, ReportKind, METRICS, SENTINEL};
pub use row::{format_elapsed, ResultRow, ROW_CELLS};
pub use table::{column_widths, header_text, ResultTable};
