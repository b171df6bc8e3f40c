//! The sweep loop and the per-combination pipeline.
//!
//! Combinations run strictly one after another, in enumeration order:
//! purge stale reports -> emit config -> map -> merge -> fit -> sta ->
//! extract -> append row -> relocate reports -> write run summary.

use std::fs::{self, File};
use std::path::PathBuf;
use std::time::SystemTime;

use mpsweep_core::{write_config, Combination, ParameterSet};
use mpsweep_report::{
    extract, format_elapsed, DeviceIdentity, MetricValues, ReportStatus, ResultRow, ResultTable,
};
use tracing::{info, warn};

use crate::config::ToolchainConfig;
use crate::error::{DriverError, Result};
use crate::janitor::Janitor;
use crate::stage::{Stage, StageOutcome, StageRunner};
use crate::summary::RunSummary;

/// Timing analysis report suffix.
pub const TIMING_REPORT: &str = "sta.rpt";
/// Fitter report suffix.
pub const FITTER_REPORT: &str = "fit.rpt";

/// Everything produced by one combination.
#[derive(Debug, Clone)]
pub struct RunRecord {
    pub combination: Combination,
    pub stages: Vec<(Stage, StageOutcome)>,
    pub metrics: MetricValues,
    pub row: ResultRow,
    /// The row as written to the result file.
    pub line: String,
    pub run_dir: PathBuf,
}

impl RunRecord {
    pub fn any_stage_failed(&self) -> bool {
        self.stages.iter().any(|(_, outcome)| !outcome.is_success())
    }
}

/// Totals for a finished sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepSummary {
    pub attempted: usize,
    /// Runs with every metric populated.
    pub complete: usize,
    /// Runs where at least one stage did not succeed.
    pub with_stage_failures: usize,
    pub result_file: PathBuf,
}

/// Drives a whole sweep against one toolchain.
pub struct Sweep<R> {
    config: ToolchainConfig,
    runner: R,
    purge_at_end: bool,
    echo_rows: bool,
}

impl<R: StageRunner> Sweep<R> {
    pub fn new(config: ToolchainConfig, runner: R) -> Self {
        Sweep {
            config,
            runner,
            purge_at_end: true,
            echo_rows: true,
        }
    }

    /// Keep build-system directories after the sweep.
    pub fn keep_build_artifacts(mut self, keep: bool) -> Self {
        self.purge_at_end = !keep;
        self
    }

    /// Print each row to stdout after its combination.
    pub fn echo_rows(mut self, echo: bool) -> Self {
        self.echo_rows = echo;
        self
    }

    pub fn config(&self) -> &ToolchainConfig {
        &self.config
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Run every combination of `params`, appending one row each.
    pub fn run(&mut self, params: &ParameterSet) -> Result<SweepSummary> {
        let log_dir = self.config.resolve(&self.config.log_dir);
        fs::create_dir_all(&log_dir).map_err(|source| DriverError::LogDir {
            path: log_dir.clone(),
            source,
        })?;

        let identity = DeviceIdentity::load(&self.config.resolve(&self.config.settings_file));
        let table = ResultTable::open(self.config.resolve(&self.config.result_file), &identity)?;

        let mut summary = SweepSummary {
            result_file: table.path().to_path_buf(),
            ..SweepSummary::default()
        };
        info!(
            total = params.total_combinations(),
            result_file = %table.path().display(),
            "starting sweep"
        );

        for combination in params.combinations() {
            info!(
                progress = %combination.progress(),
                run = %combination.run_name(),
                "running combination"
            );
            let record = self.run_combination(&combination, &table)?;
            if self.echo_rows {
                println!("[{}] {}", combination.progress(), combination.run_name());
                println!("{}", record.line);
            }

            summary.attempted += 1;
            if record.metrics.is_complete() {
                summary.complete += 1;
            }
            if record.any_stage_failed() {
                summary.with_stage_failures += 1;
            }
        }

        if self.purge_at_end {
            Janitor::new(&self.config).purge_build_artifacts()?;
        }
        info!(
            attempted = summary.attempted,
            complete = summary.complete,
            with_stage_failures = summary.with_stage_failures,
            "sweep finished"
        );
        Ok(summary)
    }

    /// Run the four stages for one combination and record its row.
    pub fn run_combination(
        &mut self,
        combination: &Combination,
        table: &ResultTable,
    ) -> Result<RunRecord> {
        let config = &self.config;
        let janitor = Janitor::new(config);
        let run_name = combination.run_name();

        janitor.purge_reports()?;
        write_config(&config.resolve(&config.config_file), combination)?;

        let run_dir = config.combination_dir(combination);
        fs::create_dir_all(&run_dir).map_err(|source| DriverError::LogDir {
            path: run_dir.clone(),
            source,
        })?;

        let started = epoch_secs();
        let mut stages = Vec::with_capacity(Stage::ALL.len());
        for stage in Stage::ALL {
            let command = config.stages.get(stage);
            let log_path = run_dir.join(format!("{run_name}.{stage}.log"));
            let mut log = File::create(&log_path).map_err(|source| DriverError::StageLog {
                path: log_path.clone(),
                source,
            })?;

            info!(stage = %stage, program = %command.program, "starting stage");
            let outcome = self
                .runner
                .run(
                    stage,
                    &command.program,
                    &command.resolved_args(&config.project),
                    &config.workdir,
                    &mut log,
                )
                .map_err(|source| DriverError::StageLog {
                    path: log_path.clone(),
                    source,
                })?;
            if outcome.is_success() {
                info!(stage = %stage, "stage succeeded");
            } else {
                warn!(stage = %stage, run = %run_name, "stage {outcome}");
            }
            stages.push((stage, outcome));
        }
        let elapsed = format_elapsed(started, epoch_secs());

        let timing = ReportStatus::load(&config.report_path(TIMING_REPORT));
        let fitter = ReportStatus::load(&config.report_path(FITTER_REPORT));
        for (suffix, status) in [(TIMING_REPORT, &timing), (FITTER_REPORT, &fitter)] {
            if !status.is_present() {
                warn!(run = %run_name, report = suffix, "report missing, metrics set to N/A");
            }
        }
        let metrics = extract(&timing, &fitter);
        let row = ResultRow::new(combination, &metrics, &elapsed);

        // Relocate even when the append fails so the next run starts clean.
        let appended = table.append(&row);
        let relocated = janitor.relocate_reports(&run_dir, &run_name);
        appended?;
        relocated?;

        RunSummary::new(combination, &stages, &metrics, &elapsed).write(&run_dir)?;

        Ok(RunRecord {
            combination: combination.clone(),
            stages,
            metrics,
            line: table.format_row(&row),
            row,
            run_dir,
        })
    }
}

fn epoch_secs() -> u64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Write};
    use std::path::Path;

    /// Writes no reports; every stage "fails to launch".
    struct AbsentToolchain {
        calls: usize,
    }

    impl StageRunner for AbsentToolchain {
        fn run(
            &mut self,
            _stage: Stage,
            program: &str,
            _args: &[String],
            _workdir: &Path,
            log: &mut dyn Write,
        ) -> io::Result<StageOutcome> {
            self.calls += 1;
            writeln!(log, "{program}: not installed")?;
            Ok(StageOutcome::LaunchFailed {
                reason: "not installed".into(),
            })
        }
    }

    #[test]
    fn failed_stages_still_yield_a_sentinel_row() {
        let dir = tempfile::tempdir().unwrap();
        let config = ToolchainConfig::new(dir.path());
        let params = ParameterSet::from_args(["REG", "NON", "4", "8", "1", "1"]).unwrap();
        let mut sweep = Sweep::new(config, AbsentToolchain { calls: 0 }).echo_rows(false);

        let summary = sweep.run(&params).unwrap();
        assert_eq!(summary.attempted, 1);
        assert_eq!(summary.complete, 0);
        assert_eq!(summary.with_stage_failures, 1);
        assert_eq!(sweep.runner().calls, 4);

        let text = fs::read_to_string(&summary.result_file).unwrap();
        let row = text.lines().last().unwrap();
        let cells: Vec<&str> = row.split_whitespace().collect();
        assert_eq!(cells.len(), 35);
        assert_eq!(&cells[..6], ["REG", "NON", "4", "8", "1", "1"]);
        assert!(cells[6..34].iter().all(|c| *c == "N/A"));

        let run_dir = sweep.config().run_dir("REG_4x8-1W1R").join("NON");
        for stage in Stage::ALL {
            let log = run_dir.join(format!("REG_4x8-1W1R.{stage}.log"));
            assert!(fs::read_to_string(log).unwrap().contains("not installed"));
        }
        assert!(run_dir.join("REG_4x8-1W1R.json").exists());
        assert!(dir.path().join("config.vh").exists());
    }

    #[test]
    fn record_carries_row_and_run_directory() {
        let dir = tempfile::tempdir().unwrap();
        let config = ToolchainConfig::new(dir.path());
        let table =
            ResultTable::open(config.resolve(&config.result_file), &DeviceIdentity::default())
                .unwrap();
        let combination = ParameterSet::from_args(["XOR", "WAW", "16", "8", "2", "1"])
            .unwrap()
            .combinations()
            .next()
            .unwrap();
        let mut sweep = Sweep::new(config, AbsentToolchain { calls: 0 }).echo_rows(false);

        let record = sweep.run_combination(&combination, &table).unwrap();
        assert_eq!(record.run_dir, dir.path().join("log/XOR_16x8-2W1R/WAW"));
        assert!(record.run_dir.join("XOR_16x8-2W1R.json").is_file());
        assert_eq!(&record.row.cells()[..6], ["XOR", "WAW", "16", "8", "2", "1"]);
        assert_eq!(record.line, table.format_row(&record.row));
        assert!(record.any_stage_failed());

        let text = fs::read_to_string(table.path()).unwrap();
        assert_eq!(text.lines().last(), Some(record.line.as_str()));
    }

    #[test]
    fn unwritable_log_dir_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("log"), "a file, not a directory").unwrap();
        let config = ToolchainConfig::new(dir.path());
        let params = ParameterSet::from_args(["REG", "NON", "4", "8", "1", "1"]).unwrap();
        let mut sweep = Sweep::new(config, AbsentToolchain { calls: 0 }).echo_rows(false);

        let err = sweep.run(&params).unwrap_err();
        assert!(matches!(err, DriverError::LogDir { .. }));
        assert_eq!(sweep.runner().calls, 0);
    }
}
