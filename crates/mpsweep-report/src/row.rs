//! One result row: echoed parameters, extracted metrics, elapsed time.

use mpsweep_core::Combination;

use crate::metric::{MetricValues, METRICS, SENTINEL};

/// Cells per row: 6 parameters, every metric, elapsed minutes.
pub const ROW_CELLS: usize = 6 + METRICS.len() + 1;

/// A fully populated result row.
///
/// No cell is ever empty; anything without a value holds [`SENTINEL`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRow {
    cells: Vec<String>,
}

impl ResultRow {
    pub fn new(combination: &Combination, metrics: &MetricValues, elapsed_minutes: &str) -> Self {
        let cells = combination
            .parameter_cells()
            .into_iter()
            .chain(metrics.values().iter().cloned())
            .chain(std::iter::once(elapsed_minutes.to_string()))
            .map(|cell| {
                if cell.is_empty() {
                    SENTINEL.to_string()
                } else {
                    cell
                }
            })
            .collect();
        ResultRow { cells }
    }

    pub fn cells(&self) -> &[String] {
        &self.cells
    }
}

/// Minutes between two whole-second epoch stamps, with two decimals.
pub fn format_elapsed(start_secs: u64, end_secs: u64) -> String {
    format!("{:.2}", end_secs.saturating_sub(start_secs) as f64 / 60.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mpsweep_core::ParameterSet;

    fn combination() -> Combination {
        ParameterSet::from_args(["REG", "NON", "4", "8", "1", "1"])
            .unwrap()
            .combinations()
            .next()
            .unwrap()
    }

    #[test]
    fn row_has_thirty_five_cells() {
        assert_eq!(ROW_CELLS, 35);
        let row = ResultRow::new(&combination(), &MetricValues::sentinel(), "0.00");
        assert_eq!(row.cells().len(), ROW_CELLS);
    }

    #[test]
    fn parameters_lead_and_runtime_trails() {
        let row = ResultRow::new(&combination(), &MetricValues::sentinel(), "1.50");
        assert_eq!(&row.cells()[..6], ["REG", "NON", "4", "8", "1", "1"]);
        assert!(row.cells()[6..34].iter().all(|c| c == SENTINEL));
        assert_eq!(row.cells()[34], "1.50");
    }

    #[test]
    fn no_cell_is_empty() {
        let row = ResultRow::new(&combination(), &MetricValues::sentinel(), "");
        assert!(row.cells().iter().all(|c| !c.is_empty()));
        assert_eq!(row.cells()[34], SENTINEL);
    }

    #[test]
    fn elapsed_is_minutes_with_two_decimals() {
        assert_eq!(format_elapsed(100, 100), "0.00");
        assert_eq!(format_elapsed(0, 90), "1.50");
        assert_eq!(format_elapsed(0, 61), "1.02");
        assert_eq!(format_elapsed(0, 3600), "60.00");
        assert_eq!(format_elapsed(50, 10), "0.00");
    }
}
