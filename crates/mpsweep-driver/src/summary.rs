//! Machine-readable per-run summary written next to the run's logs.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use mpsweep_core::Combination;
use mpsweep_report::{MetricValues, METRICS};
use serde::Serialize;

use crate::error::{DriverError, Result};
use crate::stage::{Stage, StageOutcome};

/// JSON companion of one result row.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub run_name: String,
    pub progress: String,
    pub parameters: Combination,
    pub stages: Vec<(Stage, StageOutcome)>,
    pub metrics: BTreeMap<&'static str, String>,
    pub elapsed_minutes: String,
}

impl RunSummary {
    pub fn new(
        combination: &Combination,
        stages: &[(Stage, StageOutcome)],
        metrics: &MetricValues,
        elapsed_minutes: &str,
    ) -> Self {
        RunSummary {
            run_name: combination.run_name(),
            progress: combination.progress(),
            parameters: combination.clone(),
            stages: stages.to_vec(),
            metrics: METRICS
                .iter()
                .zip(metrics.values())
                .map(|(m, v)| (m.key, v.clone()))
                .collect(),
            elapsed_minutes: elapsed_minutes.to_string(),
        }
    }

    /// Write to `{run_dir}/{run_name}.json`.
    pub fn write(&self, run_dir: &Path) -> Result<PathBuf> {
        let path = run_dir.join(format!("{}.json", self.run_name));
        let json = serde_json::to_string_pretty(self)?;
        fs::write(&path, json).map_err(|source| DriverError::Summary {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }
}
