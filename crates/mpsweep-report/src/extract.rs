//! Field extraction from the timing and fitter reports.
//!
//! Reports are tables of `;`-delimited rows. Extraction never fails: any
//! metric whose report, section or row is absent keeps [`SENTINEL`].
//!
//! [`SENTINEL`]: crate::metric::SENTINEL

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::metric::{Locator, MetricValues, ReportKind, METRICS};

/// Heading that opens the fitter's resource usage table.
pub const FITTER_HEADING: &str = "; Fitter Resource Usage Summary";

/// Number of lines after [`FITTER_HEADING`] searched for resource rows.
pub const FITTER_WINDOW_LINES: usize = 96;

/// A report file as observed after the tool stages ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportStatus {
    Present(String),
    Missing,
}

impl ReportStatus {
    /// Read a report, treating any read failure as a missing report.
    ///
    /// Reports may contain stray non-UTF-8 bytes; those are replaced.
    pub fn load(path: &Path) -> Self {
        match fs::read(path) {
            Ok(bytes) => ReportStatus::Present(String::from_utf8_lossy(&bytes).into_owned()),
            Err(_) => ReportStatus::Missing,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            ReportStatus::Present(text) => Some(text),
            ReportStatus::Missing => None,
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, ReportStatus::Present(_))
    }
}

/// Fill every metric of [`METRICS`] that the two reports provide.
pub fn extract(timing: &ReportStatus, fitter: &ReportStatus) -> MetricValues {
    let mut values = MetricValues::sentinel();
    let window = fitter.text().and_then(fitter_window);

    for (index, metric) in METRICS.iter().enumerate() {
        let report = match metric.source {
            ReportKind::Timing => timing,
            ReportKind::Fitter => fitter,
        };
        let found = match metric.locator {
            Locator::FmaxSection { heading } => {
                report.text().and_then(|text| fmax_for_corner(text, heading))
            }
            Locator::ResourceLabel { label } => window
                .as_deref()
                .and_then(|lines| resource_value(lines, label)),
        };
        match found {
            Some(value) => values.set(index, value),
            None if report.is_present() => debug!(metric = metric.key, "metric not found"),
            None => {}
        }
    }
    values
}

/// Frequency in MHz from the last data row of the section under `heading`.
///
/// A section runs from its heading to the next blank line. The heading also
/// appears in the report's table of contents, so every occurrence is scanned
/// and the last value found wins.
pub fn fmax_for_corner(text: &str, heading: &str) -> Option<String> {
    let lines: Vec<&str> = text.lines().collect();
    let mut found = None;
    for (start, _) in lines
        .iter()
        .enumerate()
        .filter(|(_, line)| line.contains(heading))
    {
        let section_value = lines[start + 1..]
            .iter()
            .take_while(|line| !line.trim().is_empty())
            .filter_map(|line| fmax_cell(line))
            .last();
        if section_value.is_some() {
            found = section_value;
        }
    }
    found
}

/// The lines following [`FITTER_HEADING`], at most [`FITTER_WINDOW_LINES`].
pub fn fitter_window(text: &str) -> Option<Vec<&str>> {
    let mut lines = text.lines();
    lines.by_ref().find(|line| line.contains(FITTER_HEADING))?;
    Some(lines.take(FITTER_WINDOW_LINES).collect())
}

/// Usage value of the first row whose label starts with `label`.
///
/// Ratios such as `40 / 234,720` yield the numerator; thousands separators
/// and whitespace are removed.
pub fn resource_value(window: &[&str], label: &str) -> Option<String> {
    let cells = window.iter().find_map(|line| {
        let cells = table_cells(line)?;
        let name = cells.first().copied()?.trim_start_matches('-').trim_start();
        (cells.len() >= 2 && name.starts_with(label)).then_some(cells)
    })?;
    let usage = cells[1].split('/').next().unwrap_or_default();
    let value: String = usage
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();
    (!value.is_empty()).then_some(value)
}

fn fmax_cell(line: &str) -> Option<String> {
    let cells = table_cells(line)?;
    let value = cells.first()?.strip_suffix("MHz")?.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Cells of a `; a ; b ; c ;` table row, trimmed. `None` for non-table lines.
fn table_cells(line: &str) -> Option<Vec<&str>> {
    let inner = line.trim().strip_prefix(';')?;
    let inner = inner.strip_suffix(';').unwrap_or(inner);
    Some(inner.split(';').map(str::trim).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metric::SENTINEL;

    const STA: &str = "\
+--------------------------------------------+
; Table of Contents                          ;
+--------------------------------------------+
;   12. Slow 900mV 85C Model Fmax Summary    ;
;   20. Slow 900mV 0C Model Fmax Summary     ;
+--------------------------------------------+

+--------------------------------------------------+
; Slow 900mV 85C Model Fmax Summary                ;
+-----------+-----------------+------------+------+
; Fmax      ; Restricted Fmax ; Clock Name ; Note ;
+-----------+-----------------+------------+------+
; 401.12 MHz ; 401.12 MHz     ; clk_a      ;      ;
; 352.36 MHz ; 352.36 MHz     ; clk        ;      ;
+-----------+-----------------+------------+------+

+--------------------------------------------------+
; Slow 900mV 0C Model Fmax Summary                 ;
+-----------+-----------------+------------+------+
; Fmax      ; Restricted Fmax ; Clock Name ; Note ;
+-----------+-----------------+------------+------+
; 371.47 MHz ; 371.47 MHz     ; clk        ;      ;
+-----------+-----------------+------------+------+
";

    const FIT: &str = "\
; Fitter Resource Usage Summary                                          ;
+-----------------------------------------------+------------------------+
; Resource                                      ; Usage                  ;
+-----------------------------------------------+------------------------+
; ALMs used                                     ; 1,204 / 234,720        ;
; Total LABs:  partially or completely used     ; 151 / 23,472           ;
;     -- Logic LABs                             ; 140                    ;
;     -- Memory LABs                            ; 11                     ;
; ALUTs Used                                    ; 2,088                  ;
;     -- Combinational ALUTs                    ; 2,000                  ;
;     -- Memory ALUTs                           ; 88                     ;
;         -- 7 input functions                  ; 3                      ;
;         -- 6 input functions                  ; 900                    ;
;         -- 5 input functions                  ; 400                    ;
;         -- 4 input functions                  ; 300                    ;
;         -- <=3 input functions                ; 397                    ;
;     -- normal mode                            ; 1,900                  ;
;     -- extended LUT mode                      ; 3                      ;
;     -- arithmetic mode                        ; 97                     ;
;     -- shared arithmetic mode                 ; 0                      ;
; Total registers                               ; 1,560                  ;
;     -- Dedicated logic registers              ; 1,560 / 469,440        ;
; I/O pins                                      ; 120 / 1,064            ;
;     -- Clock pins                             ; 1 / 28                 ;
;     -- Dedicated input pins                   ; 0 / 56                 ;
; M20K blocks                                   ; 16 / 2,560             ;
; Total MLAB memory bits                        ; 0                      ;
; Total block memory bits                       ; 32,768 / 52,428,800    ;
; Total block memory implementation bits        ; 327,680 / 52,428,800   ;
; DSP blocks                                    ; 0 / 256                ;
+-----------------------------------------------+------------------------+
";

    fn present(text: &str) -> ReportStatus {
        ReportStatus::Present(text.to_string())
    }

    #[test]
    fn fmax_takes_last_row_of_corner_section() {
        assert_eq!(
            fmax_for_corner(STA, "Slow 900mV 85C Model Fmax Summary").as_deref(),
            Some("352.36")
        );
        assert_eq!(
            fmax_for_corner(STA, "Slow 900mV 0C Model Fmax Summary").as_deref(),
            Some("371.47")
        );
    }

    #[test]
    fn fmax_absent_section_is_none() {
        assert_eq!(fmax_for_corner(STA, "Fast 900mV 0C Model Fmax Summary"), None);
        assert_eq!(fmax_for_corner("", "Slow 900mV 0C Model Fmax Summary"), None);
    }

    #[test]
    fn fmax_section_without_data_is_none() {
        let text = "; Slow 900mV 0C Model Fmax Summary ;\n; No paths to report ;\n";
        assert_eq!(fmax_for_corner(text, "Slow 900mV 0C Model Fmax Summary"), None);
    }

    #[test]
    fn resource_values_strip_totals_and_separators() {
        let window = fitter_window(FIT).unwrap();
        assert_eq!(resource_value(&window, "ALMs used").as_deref(), Some("1204"));
        assert_eq!(resource_value(&window, "Total LABs").as_deref(), Some("151"));
        assert_eq!(
            resource_value(&window, "Dedicated logic registers").as_deref(),
            Some("1560")
        );
        assert_eq!(
            resource_value(&window, "Total block memory bits").as_deref(),
            Some("32768")
        );
        assert_eq!(
            resource_value(&window, "Total block memory implementation bits").as_deref(),
            Some("327680")
        );
    }

    #[test]
    fn prefix_labels_do_not_collide() {
        let window = fitter_window(FIT).unwrap();
        assert_eq!(resource_value(&window, "arithmetic mode").as_deref(), Some("97"));
        assert_eq!(
            resource_value(&window, "shared arithmetic mode").as_deref(),
            Some("0")
        );
        assert_eq!(resource_value(&window, "Memory ALUTs").as_deref(), Some("88"));
        assert_eq!(resource_value(&window, "Memory LABs").as_deref(), Some("11"));
    }

    #[test]
    fn window_is_bounded() {
        let mut text = String::from("; Fitter Resource Usage Summary ;\n");
        for _ in 0..FITTER_WINDOW_LINES {
            text.push_str("; filler ; 0 ;\n");
        }
        text.push_str("; DSP blocks ; 4 ;\n");
        let window = fitter_window(&text).unwrap();
        assert_eq!(window.len(), FITTER_WINDOW_LINES);
        assert_eq!(resource_value(&window, "DSP blocks"), None);
    }

    #[test]
    fn missing_heading_has_no_window() {
        assert!(fitter_window("; ALMs used ; 12 ;\n").is_none());
    }

    #[test]
    fn empty_value_is_a_miss() {
        let window = vec!["; DSP blocks ;  ;"];
        assert_eq!(resource_value(&window, "DSP blocks"), None);
    }

    #[test]
    fn both_reports_populate_every_metric() {
        let values = extract(&present(STA), &present(FIT));
        assert!(values.is_complete(), "{values:?}");
        assert_eq!(values.get("fmax_0c"), Some("371.47"));
        assert_eq!(values.get("fmax_85c"), Some("352.36"));
        assert_eq!(values.get("aluts_used"), Some("2088"));
        assert_eq!(values.get("lut_3in"), Some("397"));
        assert_eq!(values.get("pins_clock"), Some("1"));
        assert_eq!(values.get("m20k_blocks"), Some("16"));
        assert_eq!(values.get("dsp_blocks"), Some("0"));
    }

    #[test]
    fn missing_timing_report_only_blanks_timing_metrics() {
        let values = extract(&ReportStatus::Missing, &present(FIT));
        assert_eq!(values.get("fmax_0c"), Some(SENTINEL));
        assert_eq!(values.get("fmax_85c"), Some(SENTINEL));
        assert_eq!(values.get("alms"), Some("1204"));
        assert_eq!(values.populated(), METRICS.len() - 2);
    }

    #[test]
    fn missing_fitter_report_only_blanks_fitter_metrics() {
        let values = extract(&present(STA), &ReportStatus::Missing);
        assert_eq!(values.get("fmax_0c"), Some("371.47"));
        assert_eq!(values.populated(), 2);
    }

    #[test]
    fn truncated_fitter_report_keeps_sentinels() {
        let truncated: String = FIT.lines().take(8).map(|l| format!("{l}\n")).collect();
        let values = extract(&ReportStatus::Missing, &present(&truncated));
        assert_eq!(values.get("alms"), Some("1204"));
        assert_eq!(values.get("labs_memory"), Some("11"));
        assert_eq!(values.get("aluts_mem"), Some(SENTINEL));
        assert_eq!(values.get("dsp_blocks"), Some(SENTINEL));
    }

    #[test]
    fn load_missing_file_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        let status = ReportStatus::load(&dir.path().join("none.fit.rpt"));
        assert_eq!(status, ReportStatus::Missing);
    }

    #[test]
    fn load_tolerates_invalid_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("x.sta.rpt");
        std::fs::write(&path, b"; Slow 900mV 0C Model Fmax Summary ;\n\xff\n; 100.0 MHz ; x ;\n")
            .unwrap();
        let status = ReportStatus::load(&path);
        assert_eq!(
            fmax_for_corner(status.text().unwrap(), "Slow 900mV 0C Model Fmax Summary")
                .as_deref(),
            Some("100.0")
        );
    }
}
