//! The metric table: which report, which heading or label, which column.
//!
//! Adding or removing a metric is a change to [`METRICS`] alone; extraction,
//! row layout and the table header all iterate it.

use serde::Serialize;

/// Placeholder for any value that could not be extracted.
pub const SENTINEL: &str = "N/A";

/// The report a metric is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ReportKind {
    /// Static timing analysis report (`*.sta.rpt`).
    Timing,
    /// Fitter report (`*.fit.rpt`).
    Fitter,
}

/// How a metric is found inside its report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locator {
    /// Frequency from the last data row of an Fmax summary section.
    FmaxSection { heading: &'static str },
    /// Usage value of a row in the fitter resource usage summary.
    ResourceLabel { label: &'static str },
}

/// One extracted metric and its column in the result table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Metric {
    /// Stable key, used in run summaries.
    pub key: &'static str,
    pub source: ReportKind,
    pub locator: Locator,
    /// Column name in the table header.
    pub column: &'static str,
    /// Unit in the table header.
    pub unit: &'static str,
}

const fn fmax(key: &'static str, heading: &'static str, column: &'static str) -> Metric {
    Metric {
        key,
        source: ReportKind::Timing,
        locator: Locator::FmaxSection { heading },
        column,
        unit: "MHz",
    }
}

const fn fit(
    key: &'static str,
    label: &'static str,
    column: &'static str,
    unit: &'static str,
) -> Metric {
    Metric {
        key,
        source: ReportKind::Fitter,
        locator: Locator::ResourceLabel { label },
        column,
        unit,
    }
}

/// Every extracted metric, in result-table column order.
pub const METRICS: [Metric; 28] = [
    fmax("fmax_0c", "Slow 900mV 0C Model Fmax Summary", "0C"),
    fmax("fmax_85c", "Slow 900mV 85C Model Fmax Summary", "85C"),
    fit("aluts_used", "ALUTs Used", "Used", "count"),
    fit("aluts_comb", "Combinational ALUTs", "Comb", "count"),
    fit("aluts_mem", "Memory ALUTs", "Mem", "count"),
    fit("lut_7in", "7 input functions", "7in", "count"),
    fit("lut_6in", "6 input functions", "6in", "count"),
    fit("lut_5in", "5 input functions", "5in", "count"),
    fit("lut_4in", "4 input functions", "4in", "count"),
    fit("lut_3in", "<=3 input functions", "<=3in", "count"),
    fit("mode_normal", "normal mode", "Norm", "count"),
    fit("mode_extended", "extended LUT mode", "Ext", "count"),
    fit("mode_arith", "arithmetic mode", "Arith", "count"),
    fit("mode_shared_arith", "shared arithmetic mode", "ShArith", "count"),
    fit("regs_total", "Total registers", "Total", "count"),
    fit("regs_dedicated", "Dedicated logic registers", "Dedic", "count"),
    fit("alms", "ALMs used", "ALMs", "count"),
    fit("labs_total", "Total LABs", "LABs", "count"),
    fit("labs_logic", "Logic LABs", "Logic", "count"),
    fit("labs_memory", "Memory LABs", "Mem", "count"),
    fit("pins_io", "I/O pins", "I/O", "count"),
    fit("pins_clock", "Clock pins", "Clock", "count"),
    fit("pins_dedicated_input", "Dedicated input pins", "DedIn", "count"),
    fit("m20k_blocks", "M20K blocks", "M20K", "blocks"),
    fit("mlab_bits", "Total MLAB memory bits", "MLAB", "bits"),
    fit("block_memory_bits", "Total block memory bits", "Block", "bits"),
    fit(
        "block_memory_impl_bits",
        "Total block memory implementation bits",
        "BlkImpl",
        "bits",
    ),
    fit("dsp_blocks", "DSP blocks", "DSP", "blocks"),
];

/// One value per entry of [`METRICS`], sentinel until set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MetricValues(Vec<String>);

impl MetricValues {
    /// Every slot holds [`SENTINEL`].
    pub fn sentinel() -> Self {
        MetricValues(vec![SENTINEL.to_string(); METRICS.len()])
    }

    pub fn set(&mut self, index: usize, value: String) {
        self.0[index] = value;
    }

    /// Value of the metric with `key`, if the key exists.
    pub fn get(&self, key: &str) -> Option<&str> {
        METRICS
            .iter()
            .position(|m| m.key == key)
            .map(|i| self.0[i].as_str())
    }

    pub fn values(&self) -> &[String] {
        &self.0
    }

    /// Number of slots that hold a real value.
    pub fn populated(&self) -> usize {
        self.0.iter().filter(|v| v.as_str() != SENTINEL).count()
    }

    pub fn is_complete(&self) -> bool {
        self.populated() == METRICS.len()
    }
}

impl Default for MetricValues {
    fn default() -> Self {
        Self::sentinel()
    }
}
