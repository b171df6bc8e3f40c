//! Toolchain configuration: project name, paths and stage commands.
//!
//! Defaults reproduce the Quartus command-line flow on an `mpram` project.

use std::path::{Path, PathBuf};

use mpsweep_core::Combination;
use serde::{Deserialize, Serialize};

use crate::stage::Stage;

/// Placeholder in stage arguments replaced by the project name.
pub const PROJECT_PLACEHOLDER: &str = "{project}";

/// Program and arguments of one tool stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageCommand {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl StageCommand {
    pub fn new(program: impl Into<String>, args: &[&str]) -> Self {
        StageCommand {
            program: program.into(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    /// Arguments with [`PROJECT_PLACEHOLDER`] substituted.
    pub fn resolved_args(&self, project: &str) -> Vec<String> {
        self.args
            .iter()
            .map(|a| a.replace(PROJECT_PLACEHOLDER, project))
            .collect()
    }
}

/// Commands for the four stages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageCommands {
    pub map: StageCommand,
    pub merge: StageCommand,
    pub fit: StageCommand,
    pub sta: StageCommand,
}

impl StageCommands {
    pub fn get(&self, stage: Stage) -> &StageCommand {
        match stage {
            Stage::Map => &self.map,
            Stage::Merge => &self.merge,
            Stage::Fit => &self.fit,
            Stage::Sta => &self.sta,
        }
    }
}

impl Default for StageCommands {
    fn default() -> Self {
        StageCommands {
            map: StageCommand::new("quartus_map", &["--64bit", PROJECT_PLACEHOLDER]),
            merge: StageCommand::new("quartus_cdb", &["--64bit", PROJECT_PLACEHOLDER, "--merge"]),
            fit: StageCommand::new("quartus_fit", &["--64bit", PROJECT_PLACEHOLDER]),
            sta: StageCommand::new("quartus_sta", &["--64bit", PROJECT_PLACEHOLDER]),
        }
    }
}

/// Everything the driver needs to know about the external toolchain.
///
/// Relative paths are resolved against `workdir`.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolchainConfig {
    /// Directory the tools run in.
    pub workdir: PathBuf,
    /// Project/config name passed to every stage.
    pub project: String,
    /// Generated configuration artifact.
    pub config_file: PathBuf,
    /// Static project settings naming the target device.
    pub settings_file: PathBuf,
    /// Directory the tool writes `{project}.*` reports into.
    pub report_dir: PathBuf,
    pub log_dir: PathBuf,
    pub result_file: PathBuf,
    pub stages: StageCommands,
    /// Build-system directories removed at the end of a sweep.
    pub purge_dirs: Vec<PathBuf>,
    /// Extra byproduct files removed at the end of a sweep.
    pub purge_files: Vec<PathBuf>,
}

impl ToolchainConfig {
    /// Defaults rooted at `workdir`.
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        ToolchainConfig {
            workdir: workdir.into(),
            project: "mpram".into(),
            config_file: "config.vh".into(),
            settings_file: "mpram.qsf".into(),
            report_dir: "output_files".into(),
            log_dir: "log".into(),
            result_file: "syn.res".into(),
            stages: StageCommands::default(),
            purge_dirs: vec!["db".into(), "incremental_db".into()],
            purge_files: Vec::new(),
        }
    }

    pub fn resolve(&self, path: &Path) -> PathBuf {
        self.workdir.join(path)
    }

    pub fn report_path(&self, suffix: &str) -> PathBuf {
        self.resolve(&self.report_dir)
            .join(format!("{}.{suffix}", self.project))
    }

    /// Per-run log directory `{log_dir}/{run_name}`.
    pub fn run_dir(&self, run_name: &str) -> PathBuf {
        self.resolve(&self.log_dir).join(run_name)
    }

    /// Log directory of one combination, `{log_dir}/{run_name}/{bypass}`.
    ///
    /// The run name does not carry the bypass mode, so bypass variants of one
    /// geometry get sibling directories.
    pub fn combination_dir(&self, combination: &Combination) -> PathBuf {
        self.run_dir(&combination.run_name())
            .join(combination.bypass.as_str())
    }
}
